use rmatching::interop::*;
use rmatching::types::*;
use rmatching::util::event_heap::EventHeap;

#[test]
fn compressed_edge_reversed() {
    let e = CompressedEdge {
        loc_from: Some(NodeIdx(0)),
        loc_to: Some(NodeIdx(1)),
        obs_mask: 0b101,
        distance: 7,
    };
    let r = e.reversed();
    assert_eq!(r.loc_from, Some(NodeIdx(1)));
    assert_eq!(r.loc_to, Some(NodeIdx(0)));
    assert_eq!(r.obs_mask, 0b101);
    assert_eq!(r.distance, 7);
}

#[test]
fn compressed_edge_merged() {
    let a = CompressedEdge {
        loc_from: Some(NodeIdx(0)),
        loc_to: Some(NodeIdx(1)),
        obs_mask: 0b101,
        distance: 3,
    };
    let b = CompressedEdge {
        loc_from: Some(NodeIdx(1)),
        loc_to: Some(NodeIdx(2)),
        obs_mask: 0b110,
        distance: 4,
    };
    let m = a.merged_with(&b);
    assert_eq!(m.loc_from, Some(NodeIdx(0)));
    assert_eq!(m.loc_to, Some(NodeIdx(2)));
    assert_eq!(m.obs_mask, 0b011); // XOR
    assert_eq!(m.distance, 7);
}

#[test]
fn compressed_edge_empty() {
    let e = CompressedEdge::empty();
    assert_eq!(e.loc_from, None);
    assert_eq!(e.loc_to, None);
    assert_eq!(e.obs_mask, 0);
    assert_eq!(e.distance, 0);
}

#[test]
fn mwpm_event_variants() {
    let e = MwpmEvent::NoEvent;
    assert!(e.is_no_event());

    let e2 = MwpmEvent::RegionHitBoundary {
        region: RegionIdx(0),
        edge: CompressedEdge::empty(),
    };
    assert!(!e2.is_no_event());

    let e3 = MwpmEvent::RegionHitRegion {
        region1: RegionIdx(0),
        region2: RegionIdx(1),
        edge: CompressedEdge::empty(),
    };
    assert!(!e3.is_no_event());

    let e4 = MwpmEvent::BlossomShatter {
        blossom: RegionIdx(0),
        in_parent: RegionIdx(1),
        in_child: RegionIdx(2),
    };
    assert!(!e4.is_no_event());
}

#[test]
fn region_edge_and_match_construction() {
    let edge = CompressedEdge {
        loc_from: Some(NodeIdx(0)),
        loc_to: Some(NodeIdx(1)),
        obs_mask: 0,
        distance: 0,
    };
    let re = RegionEdge {
        region: RegionIdx(5),
        edge,
    };
    assert_eq!(re.region, RegionIdx(5));

    let m = Match {
        region: None,
        edge: CompressedEdge::empty(),
    };
    assert!(m.region.is_none());
}

// ---- EventSlot + FloodEvent + EventHeap interaction ----
//
// These mirror how `GraphFlooder` actually uses the three types together:
// schedule into the heap, record the id in a slot, and treat a popped entry
// as stale once the slot has moved on to a different id.

#[test]
fn event_slot_validates_matching_id() {
    let mut slot = EventSlot::new();
    let mut queue: EventHeap<FloodEvent> = EventHeap::new();

    let id = queue.schedule(10, FloodEvent::LookAtNode(NodeIdx(0)));
    slot.set(id);

    let (_, popped_id, event) = queue.pop().unwrap();
    assert!(slot.is_valid(popped_id));
    assert_eq!(event, FloodEvent::LookAtNode(NodeIdx(0)));
}

#[test]
fn event_slot_rejects_superseded_event() {
    let mut slot = EventSlot::new();
    let mut queue: EventHeap<FloodEvent> = EventHeap::new();

    let stale_id = queue.schedule(10, FloodEvent::LookAtNode(NodeIdx(0)));
    // Rescheduling overwrites the slot with a new id before the stale one fires.
    let fresh_id = queue.schedule(5, FloodEvent::LookAtNode(NodeIdx(0)));
    slot.set(fresh_id);

    let (_, first_popped, _) = queue.pop().unwrap();
    assert_eq!(first_popped, fresh_id);
    assert!(slot.is_valid(first_popped));

    let (_, second_popped, _) = queue.pop().unwrap();
    assert_eq!(second_popped, stale_id);
    assert!(!slot.is_valid(second_popped));
}

#[test]
fn event_slot_clear_invalidates_everything() {
    let mut slot = EventSlot::new();
    let mut queue: EventHeap<FloodEvent> = EventHeap::new();

    let id = queue.schedule(10, FloodEvent::LookAtShrinkingRegion(RegionIdx(1)));
    slot.set(id);
    slot.clear();

    let (_, popped_id, _) = queue.pop().unwrap();
    assert!(!slot.is_valid(popped_id));
}
