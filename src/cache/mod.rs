/*!
 * Cache Hierarchy Simulator
 *
 * Set-associative cache levels with FIFO/LRU replacement and two-level
 * latency composition.
 */

mod level;
mod types;

pub use level::CacheLevel;
pub use types::{AccessOutcome, CacheError, CacheResult, CacheStats, ReplacementPolicy};
