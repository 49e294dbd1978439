/*!
 * Allocation Simulators
 *
 * Two alternative allocation engines over a simulated extent:
 * - `BlockAllocator`: contiguous blocks with first/best/worst-fit placement,
 *   split on allocate and coalesce on free
 * - `BuddyAllocator`: power-of-two hierarchy with per-order free lists and
 *   XOR-buddy merging
 */

mod block;
mod buddy;
mod types;

pub use block::BlockAllocator;
pub use buddy::BuddyAllocator;
pub use types::{
    AllocError, AllocResult, AllocStats, Block, BuddyAllocation, BuddyDump, BuddyStats,
    FitStrategy,
};
