/*!
 * Buddy Allocator
 *
 * Manages a power-of-two extent as a binary hierarchy of blocks with one
 * free list per order. Allocation splits a larger free block down to the
 * requested order, handing out the lower half and pushing each upper half
 * onto the free list for its order; freeing merges a block with its buddy
 * (address XOR block size) as long as the buddy is free.
 */

use super::types::{AllocError, AllocResult, BuddyAllocation, BuddyDump, BuddyStats};
use crate::core::types::{Address, BlockId, Size};
use ahash::AHashMap;
use log::{debug, info};

/// Simulated power-of-two buddy allocator with per-order free lists
#[derive(Debug, Default)]
pub struct BuddyAllocator {
    total: Size,
    /// Free block addresses, indexed by order; every entry is aligned to
    /// its order's size
    free_lists: Vec<Vec<Address>>,
    allocated: AHashMap<BlockId, (Address, Size)>,
    next_id: BlockId,
}

impl BuddyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to a single free block covering the extent, rounded up to the
    /// next power of two
    pub fn init(&mut self, total: Size) {
        let mut rounded: Size = 1;
        let mut max_order: usize = 0;
        while rounded < total {
            rounded <<= 1;
            max_order += 1;
        }
        self.total = rounded;
        self.free_lists.clear();
        self.free_lists.resize(max_order + 1, Vec::new());
        self.free_lists[max_order].push(0);
        self.allocated.clear();
        self.next_id = 1;
        info!(
            "buddy allocator initialized: {} bytes rounded to {} (max order {})",
            total, rounded, max_order
        );
    }

    pub fn is_initialized(&self) -> bool {
        !self.free_lists.is_empty()
    }

    /// Allocate the smallest power-of-two block holding `requested` bytes
    pub fn allocate(&mut self, requested: Size) -> AllocResult<BlockId> {
        if !self.is_initialized() {
            return Err(AllocError::Uninitialized);
        }
        if requested == 0 {
            return Err(AllocError::ZeroSize);
        }

        let order = Self::order_for_size(requested);
        if order >= self.free_lists.len() {
            return Err(AllocError::OutOfMemory { requested });
        }
        if self.free_lists[order].is_empty() {
            self.refill_order(order);
        }
        let Some(addr) = self.free_lists[order].pop() else {
            return Err(AllocError::OutOfMemory { requested });
        };

        let size = 1usize << order;
        let id = self.next_id;
        self.next_id += 1;
        self.allocated.insert(id, (addr, size));

        debug!(
            "buddy allocated id={} addr=0x{:x} size={} (order {})",
            id, addr, size, order
        );
        Ok(id)
    }

    /// Free the allocation carrying `id`, merging with free buddies as far
    /// up the hierarchy as possible
    pub fn free_by_id(&mut self, id: BlockId) -> AllocResult<()> {
        let Some(&(start, size)) = self.allocated.get(&id) else {
            return Err(AllocError::UnknownId(id));
        };

        let mut addr = start;
        let mut order = Self::order_for_size(size);
        while order + 1 < self.free_lists.len() {
            let buddy = addr ^ (1usize << order);
            let list = &mut self.free_lists[order];
            // Exact address match: the list may hold several blocks of this order
            let Some(pos) = list.iter().position(|&a| a == buddy) else {
                break;
            };
            list.remove(pos);
            addr = addr.min(buddy);
            order += 1;
        }
        self.free_lists[order].push(addr);
        self.allocated.remove(&id);

        debug!(
            "buddy freed id={} addr=0x{:x}, merged up to order {}",
            id, addr, order
        );
        Ok(())
    }

    /// Snapshot of the free lists and live allocations
    pub fn dump(&self) -> BuddyDump {
        let mut allocated: Vec<BuddyAllocation> = self
            .allocated
            .iter()
            .map(|(&id, &(addr, size))| BuddyAllocation { id, addr, size })
            .collect();
        allocated.sort_by_key(|a| a.id);
        BuddyDump {
            free_lists: self.free_lists.clone(),
            allocated,
        }
    }

    pub fn stats(&self) -> BuddyStats {
        let used = self.allocated.values().map(|&(_, size)| size).sum();
        BuddyStats {
            total: self.total,
            used,
            live_allocations: self.allocated.len(),
        }
    }

    /// Smallest order whose block size holds `size` bytes
    fn order_for_size(size: Size) -> usize {
        let mut block: Size = 1;
        let mut order = 0;
        while block < size {
            block <<= 1;
            order += 1;
        }
        order
    }

    /// Split a free block from the smallest non-empty higher order down to
    /// `order`, pushing each upper half onto its order's free list and the
    /// surviving lower half onto the target list
    fn refill_order(&mut self, order: usize) {
        for o in order + 1..self.free_lists.len() {
            let Some(addr) = self.free_lists[o].pop() else {
                continue;
            };
            for k in (order..o).rev() {
                self.free_lists[k].push(addr + (1usize << k));
            }
            self.free_lists[order].push(addr);
            return;
        }
    }
}
