/*!
 * Virtual Memory Types
 * Domain types for the address translation simulator
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Translation operation result
pub type VmResult<T> = Result<T, VmError>;

/// Translation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("Virtual memory not initialized")]
    Uninitialized,

    #[error("No physical frames available")]
    NoFrames,
}

/// One resident page; presence in the page table means the mapping is valid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTableEntry {
    pub frame: usize,
    /// Access-counter value at the most recent touch; smallest is evicted first
    pub last_access: u64,
}

/// Snapshot of the translator's counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmStats {
    pub page_hits: u64,
    pub page_faults: u64,
}

impl fmt::Display for VmStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page hits={} faults={}", self.page_hits, self.page_faults)
    }
}
