use crate::types::{NodeIdx, RegionIdx};

/// Payload carried by the graph flooder's internal event heap. Distinct
/// from `MwpmEvent`, which is what the flooder reports *out* to the
/// matcher once a tentative event actually fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodEvent {
    LookAtNode(NodeIdx),
    LookAtShrinkingRegion(RegionIdx),
}
