/*!
 * Buddy Allocator Tests
 * Power-of-two rounding, split-down, and XOR-buddy coalescing
 */

use memsim::alloc::{AllocError, BuddyAllocator};
use pretty_assertions::assert_eq;

#[test]
fn init_rounds_extent_up_to_power_of_two() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(1000);
    assert_eq!(buddy.stats().total, 1024);

    let dump = buddy.dump();
    assert_eq!(dump.free_lists.len(), 11);
    assert_eq!(dump.free_lists[10], vec![0]);
    assert!(dump.free_lists[..10].iter().all(|l| l.is_empty()));
}

#[test]
fn allocation_rounds_request_up_to_order() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(1024);
    let id = buddy.allocate(100).unwrap();

    let dump = buddy.dump();
    assert_eq!(dump.allocated.len(), 1);
    assert_eq!(dump.allocated[0].id, id);
    assert_eq!(dump.allocated[0].size, 128);
    assert_eq!(buddy.stats().used, 128);
}

#[test]
fn split_hands_out_lower_half_and_frees_uppers() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(1024);
    buddy.allocate(1).unwrap();

    let dump = buddy.dump();
    assert_eq!(dump.allocated[0].addr, 0);
    // Each split pushed its upper half: one free block per order below the top
    for order in 0..10 {
        assert_eq!(dump.free_lists[order], vec![1usize << order]);
    }
    assert!(dump.free_lists[10].is_empty());
}

#[test]
fn free_merges_all_the_way_back_up() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(1024);
    let id = buddy.allocate(100).unwrap();
    buddy.free_by_id(id).unwrap();

    let dump = buddy.dump();
    assert!(dump.allocated.is_empty());
    assert_eq!(dump.free_lists[10], vec![0]);
    assert!(dump.free_lists[..10].iter().all(|l| l.is_empty()));
}

#[test]
fn free_does_not_merge_while_buddy_is_allocated() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(16);
    let a = buddy.allocate(8).unwrap();
    let b = buddy.allocate(8).unwrap();

    let dump = buddy.dump();
    assert_eq!(dump.allocated[0].addr, 0);
    assert_eq!(dump.allocated[1].addr, 8);

    buddy.free_by_id(a).unwrap();
    let dump = buddy.dump();
    // Exactly one free entry at order 3; the buddy at 8 is still allocated
    assert_eq!(dump.free_lists[3], vec![0]);
    assert!(dump.free_lists[4].is_empty());
    assert_eq!(dump.allocated.len(), 1);
    assert_eq!(dump.allocated[0].id, b);
}

#[test]
fn freeing_both_buddies_reconstitutes_parent() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(16);
    let a = buddy.allocate(8).unwrap();
    let b = buddy.allocate(8).unwrap();
    buddy.free_by_id(a).unwrap();
    buddy.free_by_id(b).unwrap();

    let dump = buddy.dump();
    assert_eq!(dump.free_lists[4], vec![0]);
    assert!(dump.free_lists[3].is_empty());
}

#[test]
fn zero_size_request_fails() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(64);
    assert_eq!(buddy.allocate(0), Err(AllocError::ZeroSize));
}

#[test]
fn oversized_request_fails_without_mutation() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(64);
    let before = buddy.dump();

    let err = buddy.allocate(128).unwrap_err();
    assert_eq!(err, AllocError::OutOfMemory { requested: 128 });
    assert_eq!(buddy.dump().free_lists, before.free_lists);
}

#[test]
fn exhausted_extent_fails_further_requests() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(16);
    buddy.allocate(16).unwrap();
    assert_eq!(
        buddy.allocate(1),
        Err(AllocError::OutOfMemory { requested: 1 })
    );
}

#[test]
fn free_unknown_id_fails() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(64);
    assert_eq!(buddy.free_by_id(7), Err(AllocError::UnknownId(7)));
}

#[test]
fn uninitialized_allocator_fails() {
    let mut buddy = BuddyAllocator::new();
    assert_eq!(buddy.allocate(8), Err(AllocError::Uninitialized));
}

#[test]
fn free_list_entries_stay_aligned_to_their_order() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(256);
    let ids: Vec<_> = (0..4).map(|_| buddy.allocate(24).unwrap()).collect();
    buddy.free_by_id(ids[1]).unwrap();
    buddy.free_by_id(ids[3]).unwrap();

    let dump = buddy.dump();
    for (order, addrs) in dump.free_lists.iter().enumerate() {
        let size = 1usize << order;
        for &addr in addrs {
            assert_eq!(addr % size, 0, "addr {addr} misaligned for order {order}");
        }
    }
}

#[test]
fn ids_are_monotonic_across_frees() {
    let mut buddy = BuddyAllocator::new();
    buddy.init(64);
    let a = buddy.allocate(8).unwrap();
    buddy.free_by_id(a).unwrap();
    let b = buddy.allocate(8).unwrap();
    assert!(b > a);
}
