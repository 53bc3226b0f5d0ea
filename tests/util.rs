use rmatching::util::arena::Arena;
use rmatching::util::event_heap::EventHeap;
use rmatching::util::varying::*;

// ---- Varying tests ----

#[test]
fn varying_growing() {
    let v = VaryingCT::growing_varying_with_zero_distance_at_time(5);
    assert_eq!(v.get_distance_at_time(5), 0);
    assert_eq!(v.get_distance_at_time(10), 5);
    assert!(v.is_growing());
    assert!(!v.is_frozen());
    assert!(!v.is_shrinking());
}

#[test]
fn varying_frozen() {
    let v = VaryingCT::frozen(10);
    assert_eq!(v.get_distance_at_time(0), 10);
    assert_eq!(v.get_distance_at_time(100), 10);
    assert!(v.is_frozen());
    assert!(!v.is_growing());
    assert!(!v.is_shrinking());
}

#[test]
fn varying_shrinking_intercept() {
    // shrinking, y_intercept = 20 at time 0.
    let v = Varying::new(20, -1, 0);
    assert!(v.is_shrinking());
    assert_eq!(v.y_intercept(), 20);
    assert_eq!(v.time_of_x_intercept(), 20);
    assert_eq!(v.get_distance_at_time(5), 15);
    assert_eq!(v.get_distance_at_time(20), 0);
}

#[test]
fn varying_growing_intercept() {
    // growing with y_intercept = -10 at time 0 => reaches 0 at time 10
    let v = Varying::new(-10, 1, 0);
    assert!(v.is_growing());
    assert_eq!(v.time_of_x_intercept(), 10);
}

#[test]
#[should_panic(expected = "frozen, nonzero")]
fn varying_frozen_intercept_panics() {
    let v = VaryingCT::frozen(10);
    v.time_of_x_intercept();
}

#[test]
fn varying_state_transition() {
    let v = VaryingCT::growing_varying_with_zero_distance_at_time(0);
    assert_eq!(v.get_distance_at_time(5), 5);

    // Freeze at time 5 => stays at distance 5 forever.
    let frozen = v.then_frozen_at_time(5);
    assert!(frozen.is_frozen());
    assert_eq!(frozen.get_distance_at_time(10), 5);
    assert_eq!(frozen.get_distance_at_time(100), 5);

    // Shrink from frozen at time 10 => distance = 5 - (t - 10) = 15 - t
    let shrinking = frozen.then_shrinking_at_time(10);
    assert!(shrinking.is_shrinking());
    assert_eq!(shrinking.get_distance_at_time(10), 5);
    assert_eq!(shrinking.get_distance_at_time(15), 0);
}

#[test]
fn varying_add_sub() {
    let v = VaryingCT::frozen(10);
    let v2 = v + 5i64;
    assert_eq!(v2.y_intercept(), 15);
    assert!(v2.is_frozen());

    let v3 = v2 - 3i64;
    assert_eq!(v3.y_intercept(), 12);
}

#[test]
fn varying_collision_time_via_sum() {
    // Two regions both growing from time 0, weight 10 between them:
    // the remaining gap shrinks at combined slope 2, zeroing at t = 5.
    let a = VaryingCT::growing_varying_with_zero_distance_at_time(0);
    let b = VaryingCT::growing_varying_with_zero_distance_at_time(0);
    let weight = Varying::frozen(10);
    let gap = weight - a - b;
    assert_eq!(gap.time_of_x_intercept(), 5);
}

#[test]
fn varying_zero_intercept_none_when_frozen_nonzero() {
    let frozen = VaryingCT::frozen(10);
    assert_eq!(frozen.zero_intercept(), None);
}

// ---- Arena tests ----

#[test]
fn arena_alloc_free_reuse() {
    let mut arena: Arena<i32> = Arena::new();
    let a = arena.alloc();
    let b = arena.alloc();
    assert_ne!(a, b);

    arena.free(a);
    let c = arena.alloc();
    assert_eq!(c, a); // reused

    // The reused slot should be reset to default.
    assert_eq!(*arena.get(c), 0);
}

#[test]
fn arena_get_set() {
    let mut arena: Arena<String> = Arena::new();
    let idx = arena.alloc();
    *arena.get_mut(idx) = "hello".to_string();
    assert_eq!(arena.get(idx), "hello");
    assert_eq!(&arena[idx], "hello");
}

#[test]
fn arena_clear() {
    let mut arena: Arena<u64> = Arena::new();
    arena.alloc();
    arena.alloc();
    assert_eq!(arena.len(), 2);
    arena.clear();
    assert_eq!(arena.len(), 0);
    assert!(arena.is_empty());
}

// ---- EventHeap tests ----

#[test]
fn event_heap_empty() {
    let mut h: EventHeap<u32> = EventHeap::new();
    assert!(h.is_empty());
    assert!(h.pop().is_none());
    assert!(h.peek_time().is_none());
}

#[test]
fn event_heap_single() {
    let mut h: EventHeap<u32> = EventHeap::new();
    h.schedule(5, 42);
    assert!(!h.is_empty());

    let (time, _id, payload) = h.pop().unwrap();
    assert_eq!(payload, 42);
    assert_eq!(time, 5);
    assert!(h.is_empty());
}

#[test]
fn event_heap_ordering() {
    let mut h: EventHeap<u32> = EventHeap::new();
    for &(t, p) in &[(10i64, 1u32), (3, 2), (7, 3), (1, 4), (20, 5)] {
        h.schedule(t, p);
    }

    let mut prev_time = i64::MIN;
    for _ in 0..5 {
        let (time, _id, _payload) = h.pop().unwrap();
        assert!(time >= prev_time);
        prev_time = time;
    }
    assert!(h.pop().is_none());
}

#[test]
fn event_heap_same_time_breaks_ties_by_id() {
    let mut h: EventHeap<u32> = EventHeap::new();
    for i in 0..5 {
        h.schedule(10, i);
    }
    let mut payloads = Vec::new();
    while let Some((_, _, p)) = h.pop() {
        payloads.push(p);
    }
    assert_eq!(payloads, vec![0, 1, 2, 3, 4]);
}

#[test]
fn event_heap_clear_resets_ids() {
    let mut h: EventHeap<u32> = EventHeap::new();
    let first = h.schedule(5, 1);
    h.clear();
    assert!(h.is_empty());
    let after_clear = h.schedule(5, 1);
    assert_eq!(first, after_clear);
}
