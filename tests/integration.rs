use rmatching::{Decoder, MwpmError};

// ---------------------------------------------------------------------------
// 1. e2e_rep_code_d3
// ---------------------------------------------------------------------------

/// Distance-3 repetition code: 3 data qubits, 2 detectors (D0, D1), 1 observable (L0).
///
/// Graph:
///   boundary --[L0]-- D0 --[L0]-- D1 --[]-- boundary
#[test]
fn e2e_rep_code_d3() {
    let mut d: Decoder<usize> = Decoder::new(1);
    d.add_edge(0, 1, 10, &[0]).unwrap(); // D0-D1, observable L0
    d.add_boundary_edge(0, 10, &[0]).unwrap(); // D0-boundary, observable L0
    d.add_boundary_edge(1, 10, &[]).unwrap(); // D1-boundary, no observable

    // both detectors fire => match D0-D1 => obs L0 toggled
    d.add_detection_event(0).unwrap();
    d.add_detection_event(1).unwrap();
    let result = d.decode().unwrap();
    assert_eq!(result.obs_mask, 1, "D0-D1 match should flip L0");
    d.reset();

    // only D0 fires => boundary match via L0 edge
    d.add_detection_event(0).unwrap();
    let result = d.decode().unwrap();
    assert_eq!(result.obs_mask, 1, "D0-boundary match should flip L0");
    d.reset();

    // only D1 fires => boundary match via no-observable edge
    d.add_detection_event(1).unwrap();
    let result = d.decode().unwrap();
    assert_eq!(result.obs_mask, 0, "D1-boundary match should not flip L0");
    d.reset();

    // no errors
    let result = d.decode().unwrap();
    assert_eq!(result.obs_mask, 0, "no errors => L0 stays 0");
}

// ---------------------------------------------------------------------------
// 2. e2e_same_graph_multiple_rounds
// ---------------------------------------------------------------------------

/// Same detector graph decoded across several independent rounds via reset().
#[test]
fn e2e_same_graph_multiple_rounds() {
    let mut d: Decoder<usize> = Decoder::new(1);
    d.add_edge(0, 1, 10, &[0]).unwrap();
    d.add_boundary_edge(0, 10, &[]).unwrap();
    d.add_boundary_edge(1, 10, &[]).unwrap();

    // Both detectors fire => match D0-D1 => L0 flipped
    d.add_detection_event(0).unwrap();
    d.add_detection_event(1).unwrap();
    assert_eq!(d.decode().unwrap().obs_mask, 1);
    d.reset();

    // Only D0 fires => boundary match (no observable)
    d.add_detection_event(0).unwrap();
    assert_eq!(d.decode().unwrap().obs_mask, 0);
    d.reset();

    // Only D1 fires => boundary match (no observable)
    d.add_detection_event(1).unwrap();
    assert_eq!(d.decode().unwrap().obs_mask, 0);
    d.reset();

    // No errors
    assert_eq!(d.decode().unwrap().obs_mask, 0);
}

// ---------------------------------------------------------------------------
// 3. e2e_add_edge_rejects_negative_weight
// ---------------------------------------------------------------------------

/// Negative-weight edges are rejected outright rather than silently folded
/// into the matching via a sign flip.
#[test]
fn e2e_add_edge_rejects_negative_weight() {
    let mut d: Decoder<usize> = Decoder::new(1);
    let err = d.add_edge(0, 1, -3, &[0]).unwrap_err();
    assert!(matches!(err, MwpmError::NegativeWeight(-3)));

    let err = d.add_boundary_edge(0, -1, &[]).unwrap_err();
    assert!(matches!(err, MwpmError::NegativeWeight(-1)));
}

// ---------------------------------------------------------------------------
// 4. e2e_decode_to_edges_consistency
// ---------------------------------------------------------------------------

/// The matched edges and the combined observable mask agree: the XOR of
/// every matched edge's own obs_mask equals the round's obs_mask.
#[test]
fn e2e_decode_to_edges_consistency() {
    let mut d: Decoder<usize> = Decoder::new(1);
    d.add_edge(0, 1, 10, &[0]).unwrap();
    d.add_edge(1, 2, 10, &[]).unwrap();
    d.add_boundary_edge(0, 5, &[]).unwrap();
    d.add_boundary_edge(2, 5, &[]).unwrap();

    // D0 and D1 fire => should match directly (carries L0)
    d.add_detection_event(0).unwrap();
    d.add_detection_event(1).unwrap();
    let result = d.decode().unwrap();

    assert_eq!(result.matches.len(), 1, "Expected one matched pair");
    let edge = &result.matches[0];
    let from = edge.loc_from.map(|n| n.0);
    let to = edge.loc_to.map(|n| n.0);
    assert!(
        (from == Some(0) && to == Some(1)) || (from == Some(1) && to == Some(0)),
        "Expected D0-D1 match, got ({:?}, {:?})",
        from,
        to
    );
    assert_eq!(result.obs_mask, 1);
    d.reset();

    // Now test a boundary match: only D0 fires
    d.add_detection_event(0).unwrap();
    let result = d.decode().unwrap();

    assert_eq!(result.matches.len(), 1);
    let edge = &result.matches[0];
    assert!(
        edge.loc_from.is_none() || edge.loc_to.is_none(),
        "Expected boundary match, got ({:?}, {:?})",
        edge.loc_from,
        edge.loc_to
    );
    // D0's boundary edge carries no observable, so L0 stays 0.
    assert_eq!(result.obs_mask, 0);
}

// ---------------------------------------------------------------------------
// 5. e2e_surface_code_d3
// ---------------------------------------------------------------------------

/// Simplified distance-3 surface code.
///
/// A d=3 surface code has 8 stabilizers (4 X, 4 Z) but a single-round
/// detector graph here models just the Z-type detectors (4 detectors) and
/// 1 logical observable.
///
/// Detector layout (Z stabilizers):
///   D0  D1
///   D2  D3
///
/// Edges (each data-qubit error triggers two adjacent detectors):
///   D0-D1        (top horizontal)
///   D2-D3        (bottom horizontal)
///   D0-D2        (left vertical)
///   D1-D3        (right vertical)
///   D0-D3  [L0]  (diagonal — logical observable)
///   each detector also has a cheap boundary edge.
#[test]
fn e2e_surface_code_d3() {
    let mut d: Decoder<usize> = Decoder::new(1);
    d.add_edge(0, 1, 10, &[]).unwrap();
    d.add_edge(2, 3, 10, &[]).unwrap();
    d.add_edge(0, 2, 10, &[]).unwrap();
    d.add_edge(1, 3, 10, &[]).unwrap();
    d.add_edge(0, 3, 10, &[0]).unwrap();
    d.add_boundary_edge(0, 5, &[]).unwrap();
    d.add_boundary_edge(1, 5, &[]).unwrap();
    d.add_boundary_edge(2, 5, &[]).unwrap();
    d.add_boundary_edge(3, 5, &[]).unwrap();

    // No errors
    assert_eq!(d.decode().unwrap().obs_mask, 0);
    d.reset();

    // Single detector D0 fires => boundary match, no L0
    d.add_detection_event(0).unwrap();
    let result = d.decode().unwrap();
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.obs_mask, 0);
    d.reset();

    // D0 and D3 fire => match via diagonal edge carrying L0
    d.add_detection_event(0).unwrap();
    d.add_detection_event(3).unwrap();
    let result = d.decode().unwrap();
    assert_eq!(result.obs_mask, 1, "D0-D3 match should flip L0");
    d.reset();

    // D0 and D1 fire => match via top edge, no L0
    d.add_detection_event(0).unwrap();
    d.add_detection_event(1).unwrap();
    let result = d.decode().unwrap();
    assert_eq!(result.obs_mask, 0, "D0-D1 match should not flip L0");
    d.reset();

    // All four fire => two pairs matched, prediction must be a valid 0 or 1
    for k in 0..4usize {
        d.add_detection_event(k).unwrap();
    }
    let result = d.decode().unwrap();
    assert_eq!(result.matches.len(), 2);
    assert!(result.obs_mask == 0 || result.obs_mask == 1);
}
