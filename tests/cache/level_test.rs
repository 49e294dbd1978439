/*!
 * Cache Level Tests
 * Set/tag mapping, FIFO/LRU eviction, and two-level latency composition
 */

use memsim::cache::{AccessOutcome, CacheError, CacheLevel, ReplacementPolicy};
use pretty_assertions::assert_eq;

fn lru_cache(size: usize, block: usize, assoc: usize) -> CacheLevel {
    let mut cache = CacheLevel::new();
    cache.init(size, block, assoc, ReplacementPolicy::Lru).unwrap();
    cache
}

#[test]
fn repeated_access_hits_after_first_miss() {
    // 2 sets, 2-way, 64-byte blocks
    let mut cache = lru_cache(256, 64, 2);
    for i in 0..5 {
        let hit = cache.access(0x100);
        assert_eq!(hit, i > 0);
    }

    let stats = cache.stats();
    assert_eq!(stats.accesses, 5);
    assert_eq!(stats.hits, 4);
    assert!((stats.hit_ratio - 0.8).abs() < 1e-9);
}

#[test]
fn addresses_in_the_same_block_share_a_line() {
    let mut cache = lru_cache(256, 64, 2);
    assert!(!cache.access(0x40));
    assert!(cache.access(0x41));
    assert!(cache.access(0x7f));
}

#[test]
fn distinct_sets_do_not_conflict() {
    // 2 sets: blocks 0 and 2 map to set 0, block 1 to set 1
    let mut cache = lru_cache(256, 64, 2);
    assert!(!cache.access(0));
    assert!(!cache.access(64));
    assert!(!cache.access(128));
    assert!(cache.access(0));
    assert!(cache.access(64));
}

#[test]
fn lru_evicts_smallest_last_use_time() {
    // Single set, 2-way: tags A=0, B=1, C=2, D=3
    let mut cache = lru_cache(128, 64, 2);
    assert!(!cache.access(0)); // A
    assert!(!cache.access(64)); // B
    assert!(!cache.access(128)); // C evicts A
    assert!(!cache.access(0)); // A again evicts B (B has the oldest time)
    assert!(!cache.access(192)); // D evicts C (A was refreshed at insertion)

    assert!(cache.access(0)); // A survived
    assert!(!cache.access(128)); // C was the victim
}

#[test]
fn lru_hit_refreshes_recency() {
    let mut cache = lru_cache(128, 64, 2);
    cache.access(0); // A
    cache.access(64); // B
    assert!(cache.access(0)); // refresh A
    cache.access(128); // C evicts B, not A
    assert!(cache.access(0));
    assert!(!cache.access(64));
}

#[test]
fn fifo_evicts_oldest_insertion_regardless_of_hits() {
    let mut cache = CacheLevel::new();
    cache.init(128, 64, 2, ReplacementPolicy::Fifo).unwrap();

    assert!(!cache.access(0)); // A
    assert!(!cache.access(64)); // B
    assert!(cache.access(0)); // A hit does not reorder under FIFO
    assert!(!cache.access(128)); // C evicts A (front of the set)
    assert!(!cache.access(0)); // A is gone
}

#[test]
fn two_level_composition_accumulates_per_level_costs() {
    // L1: single direct-mapped line; L2: 2 sets, 2-way
    let mut l1 = lru_cache(64, 64, 1);
    let mut l2 = lru_cache(256, 64, 2);

    let outcome = l1.access_with_level(0, Some(&mut l2));
    assert_eq!(outcome, AccessOutcome::Memory);
    let outcome = l1.access_with_level(64, Some(&mut l2));
    assert_eq!(outcome, AccessOutcome::Memory);

    // 0 was evicted from L1 by 64 but still resides in L2
    let outcome = l1.access_with_level(0, Some(&mut l2));
    assert_eq!(outcome, AccessOutcome::L2Hit);
    assert_eq!(outcome.latency(), 5);

    // Outer level adds its own cost model: 100 + 100 + 5
    assert_eq!(l1.stats().total_latency, 205);
    // Inner level saw two misses and one local hit: 100 + 100 + 1
    assert_eq!(l2.stats().total_latency, 201);
}

#[test]
fn l1_hit_never_consults_next_level() {
    let mut l1 = lru_cache(256, 64, 2);
    let mut l2 = lru_cache(256, 64, 2);

    l1.access_with_level(0, Some(&mut l2));
    let outcome = l1.access_with_level(0, Some(&mut l2));
    assert_eq!(outcome, AccessOutcome::L1Hit);
    assert_eq!(l2.stats().accesses, 1);
}

#[test]
fn miss_without_next_level_goes_to_memory() {
    let mut l1 = lru_cache(64, 64, 1);
    let outcome = l1.access_with_level(0, None);
    assert_eq!(outcome, AccessOutcome::Memory);
    assert_eq!(l1.stats().total_latency, 100);
}

#[test]
fn uninitialized_cache_reports_miss_without_counting() {
    let mut cache = CacheLevel::new();
    assert!(!cache.access(0x1000));
    assert_eq!(cache.access_with_level(0x1000, None), AccessOutcome::Memory);

    let stats = cache.stats();
    assert_eq!(stats.accesses, 0);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.total_latency, 0);
}

#[test]
fn uninitialized_next_level_is_treated_as_memory() {
    let mut l1 = lru_cache(64, 64, 1);
    let mut l2 = CacheLevel::new();
    let outcome = l1.access_with_level(0, Some(&mut l2));
    assert_eq!(outcome, AccessOutcome::Memory);
    assert_eq!(l2.stats().accesses, 0);
}

#[test]
fn zero_block_size_is_rejected() {
    let mut cache = CacheLevel::new();
    let err = cache.init(64, 0, 1, ReplacementPolicy::Fifo).unwrap_err();
    assert_eq!(
        err,
        CacheError::InvalidGeometry {
            block_size: 0,
            associativity: 1
        }
    );
    assert!(!cache.is_initialized());
}

#[test]
fn tiny_cache_still_gets_one_set() {
    // 32 bytes of cache with 64-byte blocks degenerates to a single set
    let mut cache = lru_cache(32, 64, 2);
    assert!(!cache.access(0));
    assert!(cache.access(0));
}

#[test]
fn stats_are_zero_before_any_access() {
    let cache = lru_cache(256, 64, 2);
    let stats = cache.stats();
    assert_eq!(stats.accesses, 0);
    assert_eq!(stats.hit_ratio, 0.0);
    assert_eq!(stats.avg_latency, 0.0);
}
