/*!
 * Virtual Memory Simulator
 *
 * Demand-paged virtual-to-physical translation with a sparse page table
 * and LRU frame eviction.
 */

mod translator;
mod types;

pub use translator::VirtualMemoryTranslator;
pub use types::{PageTableEntry, VmError, VmResult, VmStats};
