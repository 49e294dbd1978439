/*!
 * Cache Level Simulator
 *
 * One level of a set-associative cache. Addresses map to a set and tag via
 * `block = addr / block_size; set = block % sets; tag = block / sets`, with
 * `sets = max(1, cache_size / (block_size * associativity))`. A level can
 * chain to a next level to compose hit/miss latency across a two-level
 * hierarchy.
 */

use super::types::{AccessOutcome, CacheError, CacheResult, CacheStats, ReplacementPolicy};
use crate::core::types::{Address, Size};
use log::{debug, info};
use std::collections::VecDeque;

/// One resident cache line
#[derive(Debug, Clone)]
struct Line {
    tag: usize,
    /// Access-counter value at insertion or last LRU refresh
    time: u64,
}

/// Simulated set-associative cache level with FIFO or LRU replacement
#[derive(Debug, Default)]
pub struct CacheLevel {
    cache_size: Size,
    block_size: Size,
    associativity: usize,
    policy: ReplacementPolicy,
    sets: Vec<VecDeque<Line>>,
    accesses: u64,
    hits: u64,
    total_latency: u64,
}

impl CacheLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure geometry and replacement policy, resetting all counters
    pub fn init(
        &mut self,
        cache_size: Size,
        block_size: Size,
        associativity: usize,
        policy: ReplacementPolicy,
    ) -> CacheResult<()> {
        if block_size == 0 || associativity == 0 {
            return Err(CacheError::InvalidGeometry {
                block_size,
                associativity,
            });
        }
        self.cache_size = cache_size;
        self.block_size = block_size;
        self.associativity = associativity;
        self.policy = policy;

        let num_sets = ((cache_size / block_size) / associativity).max(1);
        self.sets = vec![VecDeque::new(); num_sets];
        self.accesses = 0;
        self.hits = 0;
        self.total_latency = 0;
        info!(
            "cache level initialized: size={} block={} assoc={} policy={} ({} sets)",
            cache_size, block_size, associativity, policy, num_sets
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.cache_size > 0
    }

    /// Access a single level; returns whether the address hit
    ///
    /// An uninitialized cache reports a miss without touching any counters.
    pub fn access(&mut self, addr: Address) -> bool {
        if !self.is_initialized() {
            return false;
        }
        self.accesses += 1;
        let time = self.accesses;

        let block = addr / self.block_size;
        let num_sets = self.sets.len();
        let set_idx = block % num_sets;
        let tag = block / num_sets;

        let pos = self.sets[set_idx].iter().position(|l| l.tag == tag);
        if let Some(pos) = pos {
            self.hits += 1;
            if self.policy == ReplacementPolicy::Lru {
                // Refresh: move the line to the most-recently-used end
                let lines = &mut self.sets[set_idx];
                if let Some(mut line) = lines.remove(pos) {
                    line.time = time;
                    lines.push_back(line);
                }
            }
            return true;
        }

        let associativity = self.associativity;
        let policy = self.policy;
        let lines = &mut self.sets[set_idx];
        if lines.len() >= associativity {
            match policy {
                ReplacementPolicy::Fifo => {
                    lines.pop_front();
                }
                ReplacementPolicy::Lru => {
                    // Smallest time wins; ties broken by insertion order
                    if let Some(victim) = (0..lines.len()).min_by_key(|&i| lines[i].time) {
                        debug!("evicting tag {} from set {}", lines[victim].tag, set_idx);
                        lines.remove(victim);
                    }
                }
            }
        }
        lines.push_back(Line { tag, time });
        false
    }

    /// Access through a two-level hierarchy
    ///
    /// A hit here costs 1 cycle. On a miss, a hit in `next` costs this level
    /// 5 cycles and a miss all the way to memory costs 100; each level that
    /// processes the access accumulates its own cost into its latency total.
    pub fn access_with_level(
        &mut self,
        addr: Address,
        next: Option<&mut CacheLevel>,
    ) -> AccessOutcome {
        if !self.is_initialized() {
            return AccessOutcome::Memory;
        }

        if self.access(addr) {
            self.total_latency += AccessOutcome::L1Hit.latency();
            return AccessOutcome::L1Hit;
        }

        if let Some(next) = next {
            if next.is_initialized() {
                return match next.access_with_level(addr, None) {
                    AccessOutcome::L1Hit => {
                        // The next level hit locally: a second-level hit from here
                        self.total_latency += AccessOutcome::L2Hit.latency();
                        AccessOutcome::L2Hit
                    }
                    _ => {
                        self.total_latency += AccessOutcome::Memory.latency();
                        AccessOutcome::Memory
                    }
                };
            }
        }

        self.total_latency += AccessOutcome::Memory.latency();
        AccessOutcome::Memory
    }

    pub fn stats(&self) -> CacheStats {
        let hit_ratio = if self.accesses > 0 {
            self.hits as f64 / self.accesses as f64
        } else {
            0.0
        };
        let avg_latency = if self.accesses > 0 {
            self.total_latency as f64 / self.accesses as f64
        } else {
            0.0
        };
        CacheStats {
            accesses: self.accesses,
            hits: self.hits,
            hit_ratio,
            total_latency: self.total_latency,
            avg_latency,
        }
    }
}
