/*!
 * Contiguous Block Allocator
 *
 * Manages a simulated address extent as an ordered sequence of contiguous
 * blocks. Allocation scans the free blocks under the active fit strategy,
 * splitting the chosen block when it is larger than the request; freeing
 * coalesces adjacent free neighbors back into a single block.
 *
 * The block sequence always partitions `[0, total)` with no gaps and no
 * overlaps; every operation preserves that partition or leaves it untouched
 * on failure.
 */

use super::types::{AllocError, AllocResult, AllocStats, Block, FitStrategy};
use crate::core::types::{Address, BlockId, Size};
use log::{debug, info, warn};

/// Simulated contiguous-extent allocator with selectable fit strategy
#[derive(Debug, Default)]
pub struct BlockAllocator {
    blocks: Vec<Block>,
    total: Size,
    strategy: FitStrategy,
    next_id: BlockId,
    allocations: u64,
    failures: u64,
}

impl BlockAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to a single free block spanning the whole extent
    pub fn init(&mut self, total: Size) {
        self.total = total;
        self.blocks.clear();
        self.blocks.push(Block::new_free(0, total));
        self.next_id = 1;
        self.allocations = 0;
        self.failures = 0;
        info!("block allocator initialized with {} bytes", total);
    }

    pub fn is_initialized(&self) -> bool {
        self.total > 0
    }

    /// Strategy used by subsequent `allocate` calls
    pub fn set_strategy(&mut self, strategy: FitStrategy) {
        debug!("fit strategy set to {}", strategy);
        self.strategy = strategy;
    }

    pub fn strategy(&self) -> FitStrategy {
        self.strategy
    }

    /// Allocate `requested` bytes, returning the new block's id
    ///
    /// On failure the block structure is unchanged; only the failure
    /// counter advances.
    pub fn allocate(&mut self, requested: Size) -> AllocResult<BlockId> {
        let idx = match self.strategy {
            FitStrategy::FirstFit => self.find_first(requested),
            FitStrategy::BestFit => self.find_best(requested),
            FitStrategy::WorstFit => self.find_worst(requested),
        };

        let Some(idx) = idx else {
            self.failures += 1;
            warn!(
                "allocation of {} bytes failed: no fitting free block ({})",
                requested, self.strategy
            );
            return Err(AllocError::OutOfMemory { requested });
        };

        self.split(idx, requested);

        let id = self.next_id;
        self.next_id += 1;

        let block = &mut self.blocks[idx];
        block.free = false;
        block.id = id;
        block.requested = requested;
        self.allocations += 1;

        debug!(
            "allocated block id={} addr=0x{:x} size={}",
            id, block.addr, block.size
        );
        Ok(id)
    }

    /// Free the used block carrying `id`, then coalesce
    pub fn free_by_id(&mut self, id: BlockId) -> AllocResult<()> {
        let Some(block) = self.blocks.iter_mut().find(|b| !b.free && b.id == id) else {
            return Err(AllocError::UnknownId(id));
        };
        debug!("freeing block id={} addr=0x{:x}", id, block.addr);
        block.free = true;
        block.id = 0;
        self.coalesce();
        Ok(())
    }

    /// Free the used block starting at `addr`, then coalesce
    pub fn free_by_addr(&mut self, addr: Address) -> AllocResult<()> {
        let Some(block) = self.blocks.iter_mut().find(|b| !b.free && b.addr == addr) else {
            return Err(AllocError::UnknownAddress(addr));
        };
        debug!("freeing block id={} addr=0x{:x}", block.id, addr);
        block.free = true;
        block.id = 0;
        self.coalesce();
        Ok(())
    }

    /// Ordered view of the current partition
    pub fn dump(&self) -> &[Block] {
        &self.blocks
    }

    pub fn stats(&self) -> AllocStats {
        let mut used: Size = 0;
        let mut free: Size = 0;
        let mut largest_free: Size = 0;
        let mut internal: Size = 0;
        for b in &self.blocks {
            if b.free {
                free += b.size;
                largest_free = largest_free.max(b.size);
            } else {
                used += b.size;
                internal += b.size - b.requested;
            }
        }

        let external_pct = if free > 0 {
            100.0 * (1.0 - largest_free as f64 / free as f64)
        } else {
            0.0
        };
        let utilization_pct = if self.total > 0 {
            100.0 * used as f64 / self.total as f64
        } else {
            0.0
        };
        let attempts = self.allocations + self.failures;
        let success_rate_pct = if attempts > 0 {
            100.0 * self.allocations as f64 / attempts as f64
        } else {
            100.0
        };

        AllocStats {
            total: self.total,
            used,
            free,
            internal_fragmentation: internal,
            external_fragmentation_pct: external_pct,
            utilization_pct,
            attempts,
            successes: self.allocations,
            failures: self.failures,
            success_rate_pct,
        }
    }

    fn find_first(&self, requested: Size) -> Option<usize> {
        self.blocks
            .iter()
            .position(|b| b.free && b.size >= requested)
    }

    fn find_best(&self, requested: Size) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut best_size = Size::MAX;
        for (i, b) in self.blocks.iter().enumerate() {
            if b.free && b.size >= requested && b.size < best_size {
                best = Some(i);
                best_size = b.size;
            }
        }
        best
    }

    fn find_worst(&self, requested: Size) -> Option<usize> {
        let mut worst: Option<usize> = None;
        let mut worst_size: Size = 0;
        for (i, b) in self.blocks.iter().enumerate() {
            if b.free && b.size >= requested && b.size > worst_size {
                worst = Some(i);
                worst_size = b.size;
            }
        }
        worst
    }

    /// Split the block at `idx` into a prefix of length `requested` and a
    /// free remainder inserted immediately after it
    fn split(&mut self, idx: usize, requested: Size) {
        let block = &self.blocks[idx];
        if block.size == requested {
            return;
        }
        let remainder = Block::new_free(block.addr + requested, block.size - requested);
        self.blocks[idx].size = requested;
        self.blocks.insert(idx + 1, remainder);
    }

    /// Merge every run of adjacent free blocks into a single block
    ///
    /// Idempotent; never merges across a used block.
    fn coalesce(&mut self) {
        let mut merged: Vec<Block> = Vec::with_capacity(self.blocks.len());
        for block in self.blocks.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.free && block.free => prev.size += block.size,
                _ => merged.push(block),
            }
        }
        self.blocks = merged;
    }
}
