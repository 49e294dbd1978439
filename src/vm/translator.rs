/*!
 * Virtual Memory Translator
 *
 * Simulates virtual-to-physical translation through a sparse page table.
 * Pages are assigned frames on demand; when every frame is resident, the
 * least-recently-used page is evicted and its frame reused.
 */

use super::types::{PageTableEntry, VmError, VmResult, VmStats};
use crate::core::types::{Address, Size};
use ahash::AHashMap;
use log::{debug, info, warn};

/// Simulated demand-paging address translator with LRU frame eviction
#[derive(Debug, Default)]
pub struct VirtualMemoryTranslator {
    virt_size: Size,
    page_size: Size,
    phys_size: Size,
    num_pages: usize,
    num_frames: usize,
    /// Sparse page table keyed by virtual page number
    page_table: AHashMap<usize, PageTableEntry>,
    page_faults: u64,
    page_hits: u64,
    /// Next never-used frame; monotonic until frames are exhausted
    next_frame: usize,
    access_counter: u64,
}

impl VirtualMemoryTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the address spaces, clearing the page table and counters
    pub fn init(&mut self, virt_size: Size, page_size: Size, phys_size: Size) {
        if page_size == 0 {
            warn!("rejecting zero page size; translator left uninitialized");
            self.page_size = 0;
            return;
        }
        self.virt_size = virt_size;
        self.page_size = page_size;
        self.phys_size = phys_size;
        self.num_pages = virt_size / page_size;
        self.num_frames = phys_size / page_size;
        self.page_table.clear();
        self.page_faults = 0;
        self.page_hits = 0;
        self.next_frame = 0;
        self.access_counter = 0;
        info!(
            "virtual memory initialized: virt={} page={} phys={} ({} pages, {} frames)",
            virt_size, page_size, phys_size, self.num_pages, self.num_frames
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.page_size > 0
    }

    /// Translate a virtual address, faulting the page in if necessary
    ///
    /// An uninitialized translator fails without touching any counters.
    pub fn translate(&mut self, vaddr: Address) -> VmResult<Address> {
        if !self.is_initialized() {
            return Err(VmError::Uninitialized);
        }

        let vpn = vaddr / self.page_size;
        let offset = vaddr % self.page_size;
        self.access_counter += 1;

        if let Some(entry) = self.page_table.get_mut(&vpn) {
            self.page_hits += 1;
            entry.last_access = self.access_counter;
            return Ok(entry.frame * self.page_size + offset);
        }

        self.page_faults += 1;
        let frame = if self.next_frame < self.num_frames {
            let frame = self.next_frame;
            self.next_frame += 1;
            frame
        } else {
            // Evict the resident page with the smallest last-access time
            let victim = self
                .page_table
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(&vpn, entry)| (vpn, entry.frame));
            let Some((victim_vpn, frame)) = victim else {
                // Frames exhausted but nothing resident to evict
                return Err(VmError::NoFrames);
            };
            self.page_table.remove(&victim_vpn);
            debug!("evicted vpn {} from frame {}", victim_vpn, frame);
            frame
        };

        self.page_table.insert(
            vpn,
            PageTableEntry {
                frame,
                last_access: self.access_counter,
            },
        );
        debug!("page fault: vpn {} -> frame {}", vpn, frame);
        Ok(frame * self.page_size + offset)
    }

    /// Number of currently resident pages
    pub fn resident_pages(&self) -> usize {
        self.page_table.len()
    }

    pub fn stats(&self) -> VmStats {
        VmStats {
            page_hits: self.page_hits,
            page_faults: self.page_faults,
        }
    }
}
