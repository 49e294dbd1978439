/*!
 * Allocator Types
 * Common types for the simulated allocators
 */

use crate::core::types::{Address, BlockId, Size};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Allocator operation result
pub type AllocResult<T> = Result<T, AllocError>;

/// Allocator errors
///
/// All failures leave the allocator's block structure unchanged; the
/// caller decides whether to report and continue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    #[error("Out of memory: no free block can satisfy {requested} bytes")]
    OutOfMemory { requested: Size },

    #[error("Unknown block id: {0}")]
    UnknownId(BlockId),

    #[error("No used block at address 0x{0:x}")]
    UnknownAddress(Address),

    #[error("Zero-sized allocation request")]
    ZeroSize,

    #[error("Allocator not initialized")]
    Uninitialized,
}

/// Placement strategy for the contiguous allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitStrategy {
    /// First free block large enough, in address order
    #[default]
    FirstFit,
    /// Smallest free block large enough (ties: lowest address)
    BestFit,
    /// Largest free block large enough (ties: lowest address)
    WorstFit,
}

impl FitStrategy {
    /// Parse from string representation; unrecognized names fall back to first-fit
    pub fn parse(s: &str) -> Self {
        match s {
            "best_fit" => Self::BestFit,
            "worst_fit" => Self::WorstFit,
            _ => Self::FirstFit,
        }
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstFit => "first_fit",
            Self::BestFit => "best_fit",
            Self::WorstFit => "worst_fit",
        }
    }
}

impl fmt::Display for FitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FitStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FitStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// One contiguous block in the simulated extent
///
/// Blocks partition `[0, total)` with no gaps and no overlaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Allocation id; 0 while the block is free
    pub id: BlockId,
    pub addr: Address,
    pub size: Size,
    /// Originally requested size; `size - requested` is internal fragmentation
    pub requested: Size,
    pub free: bool,
}

impl Block {
    pub fn new_free(addr: Address, size: Size) -> Self {
        Self {
            id: 0,
            addr,
            size,
            requested: 0,
            free: true,
        }
    }

    /// One past the last address covered by this block
    pub fn end(&self) -> Address {
        self.addr + self.size
    }
}

/// Snapshot of contiguous-allocator health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocStats {
    pub total: Size,
    pub used: Size,
    pub free: Size,
    pub internal_fragmentation: Size,
    pub external_fragmentation_pct: f64,
    pub utilization_pct: f64,
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub success_rate_pct: f64,
}

impl fmt::Display for AllocStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total memory: {}", self.total)?;
        writeln!(f, "Used memory: {}", self.used)?;
        writeln!(f, "Free memory: {}", self.free)?;
        writeln!(f, "Internal fragmentation: {} bytes", self.internal_fragmentation)?;
        writeln!(f, "External fragmentation: {}%", self.external_fragmentation_pct)?;
        writeln!(f, "Utilization: {}%", self.utilization_pct)?;
        write!(
            f,
            "Allocation attempts: {} successes: {} failures: {} success rate: {}%",
            self.attempts, self.successes, self.failures, self.success_rate_pct
        )
    }
}

/// One live buddy allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuddyAllocation {
    pub id: BlockId,
    pub addr: Address,
    pub size: Size,
}

/// Snapshot of the buddy allocator's free lists and live allocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuddyDump {
    /// Free block addresses, indexed by order (`size = 2^order`)
    pub free_lists: Vec<Vec<Address>>,
    /// Live allocations, sorted by id
    pub allocated: Vec<BuddyAllocation>,
}

/// Snapshot of buddy-allocator health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuddyStats {
    pub total: Size,
    pub used: Size,
    pub live_allocations: usize,
}

impl fmt::Display for BuddyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} Used: {} Allocations: {}",
            self.total, self.used, self.live_allocations
        )
    }
}
