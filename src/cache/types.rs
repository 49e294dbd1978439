/*!
 * Cache Types
 * Domain types for the set-associative cache simulator
 */

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Cache operation result
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Invalid cache geometry: block_size={block_size}, associativity={associativity}")]
    InvalidGeometry {
        block_size: usize,
        associativity: usize,
    },
}

/// Replacement policy for a cache level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacementPolicy {
    /// Evict the oldest-inserted line
    #[default]
    Fifo,
    /// Evict the line with the smallest last-use time
    Lru,
}

impl ReplacementPolicy {
    /// Parse from string representation; unrecognized names fall back to FIFO
    pub fn parse(s: &str) -> Self {
        match s {
            "lru" => Self::Lru,
            _ => Self::Fifo,
        }
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::Lru => "lru",
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReplacementPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReplacementPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Where in the hierarchy an access was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessOutcome {
    L1Hit,
    L2Hit,
    Memory,
}

impl AccessOutcome {
    /// Cycle cost of an access satisfied at this point in the hierarchy
    pub const fn latency(&self) -> u64 {
        match self {
            Self::L1Hit => 1,
            Self::L2Hit => 5,
            Self::Memory => 100,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::L1Hit => "L1_HIT",
            Self::L2Hit => "L2_HIT",
            Self::Memory => "MEMORY",
        }
    }
}

impl fmt::Display for AccessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one cache level's counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub accesses: u64,
    pub hits: u64,
    pub hit_ratio: f64,
    pub total_latency: u64,
    pub avg_latency: f64,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cache accesses={} hits={} hit_ratio={} total_latency={} avg_latency={}",
            self.accesses, self.hits, self.hit_ratio, self.total_latency, self.avg_latency
        )
    }
}
