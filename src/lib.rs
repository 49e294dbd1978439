/*!
 * memsim - Memory Management Simulator Library
 *
 * Didactic simulation engines for contiguous allocation, buddy allocation,
 * set-associative caching, and demand-paged address translation. No real
 * memory is ever touched; all addresses are offsets into simulated extents.
 */

pub mod alloc;
pub mod cache;
pub mod core;
pub mod physical;
pub mod shell;
pub mod vm;

// Re-exports
pub use alloc::{
    AllocError, AllocStats, Block, BlockAllocator, BuddyAllocator, BuddyStats, FitStrategy,
};
pub use cache::{AccessOutcome, CacheLevel, CacheStats, ReplacementPolicy};
pub use physical::PhysicalMemory;
pub use shell::Shell;
pub use vm::{VirtualMemoryTranslator, VmError, VmStats};
