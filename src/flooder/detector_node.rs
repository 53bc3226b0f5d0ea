use crate::interop::EventSlot;
use crate::types::*;
use crate::util::varying::VaryingCT;

use super::fill_region::GraphFillRegion;

/// One node of the static detector graph, plus the ephemeral bookkeeping
/// the flooder attaches to it while a region's growth front passes
/// through. The ephemeral fields are reset between decodes; the
/// permanent ones (the graph structure) never change after construction.
#[derive(Debug, Clone)]
pub struct DetectorNode {
    pub neighbors: Vec<NodeIdx>,
    pub neighbor_weights: Vec<Weight>,
    pub neighbor_observables: Vec<ObsMask>,
    /// Slot index on the neighbor side that points back at this node;
    /// `NO_NEIGHBOR` for boundary neighbors, which have no mirror slot.
    pub neighbor_back_index: Vec<u32>,

    pub region_that_arrived: Option<RegionIdx>,
    pub region_that_arrived_top: Option<RegionIdx>,
    pub reached_from_source: Option<NodeIdx>,
    pub observables_crossed_from_source: ObsMask,
    pub radius_of_arrival: CumulativeTime,
    pub wrapped_radius_cached: i32,
    pub node_event_slot: EventSlot,
}

impl Default for DetectorNode {
    fn default() -> Self {
        DetectorNode {
            neighbors: Vec::new(),
            neighbor_weights: Vec::new(),
            neighbor_observables: Vec::new(),
            neighbor_back_index: Vec::new(),
            region_that_arrived: None,
            region_that_arrived_top: None,
            reached_from_source: None,
            observables_crossed_from_source: 0,
            radius_of_arrival: 0,
            wrapped_radius_cached: 0,
            node_event_slot: EventSlot::new(),
        }
    }
}

impl DetectorNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// The local radius at this node: the top region's radius plus the
    /// wrapped radius accumulated descending through any blossom nesting.
    pub fn local_radius(&self, regions: &[GraphFillRegion]) -> VaryingCT {
        match self.region_that_arrived_top {
            None => VaryingCT::frozen(0),
            Some(top_idx) => regions[top_idx.0 as usize].radius + self.wrapped_radius_cached as i64,
        }
    }

    /// Walk the blossom-parent chain from `region_that_arrived` up to
    /// `region_that_arrived_top`, summing the intermediate regions'
    /// y-intercepts, to get the extra radius this node has accumulated by
    /// virtue of being nested inside blossoms.
    pub fn compute_wrapped_radius(&self, regions: &[GraphFillRegion]) -> i32 {
        if self.reached_from_source.is_none() {
            return 0;
        }
        let mut total: i32 = 0;
        let mut r = self.region_that_arrived;
        while r != self.region_that_arrived_top {
            if let Some(idx) = r {
                total += regions[idx.0 as usize].radius.y_intercept() as i32;
                r = regions[idx.0 as usize].blossom_parent;
            } else {
                break;
            }
        }
        total - self.radius_of_arrival as i32
    }

    /// When a blossom shatters, each of its former shell nodes still
    /// points at the (now-detached) region it most recently arrived at.
    /// Walk up from there to find the immediate child of `shattering` that
    /// owns this node. Must be called before `blossom_parent` is cleared
    /// on `shattering`'s children.
    pub fn heir_region_on_shatter(
        &self,
        shattering: RegionIdx,
        regions: &[GraphFillRegion],
    ) -> Option<RegionIdx> {
        let mut r = self.region_that_arrived?;
        loop {
            let parent = regions[r.0 as usize].blossom_parent;
            if parent == Some(shattering) {
                return Some(r);
            }
            r = parent?;
        }
    }

    pub fn has_same_owner_as(&self, other: &DetectorNode) -> bool {
        self.region_that_arrived_top.is_some()
            && self.region_that_arrived_top == other.region_that_arrived_top
    }

    pub fn reset(&mut self) {
        self.region_that_arrived = None;
        self.region_that_arrived_top = None;
        self.reached_from_source = None;
        self.observables_crossed_from_source = 0;
        self.radius_of_arrival = 0;
        self.wrapped_radius_cached = 0;
        self.node_event_slot.clear();
    }
}
