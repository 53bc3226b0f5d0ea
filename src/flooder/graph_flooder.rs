use log::trace;

use crate::interop::{CompressedEdge, FloodEvent, MwpmEvent};
use crate::matcher::alt_tree::AltTreeNode;
use crate::types::*;
use crate::util::arena::Arena;
use crate::util::event_heap::EventHeap;
use crate::util::varying::VaryingCT;

use super::detector_node::DetectorNode;
use super::fill_region::GraphFillRegion;
use super::graph::{MatchingGraph, BOUNDARY_NODE};

/// Runs the continuous-time region-growth simulation over a `MatchingGraph`:
/// schedules and fires tentative events, grows/freezes/shrinks regions, and
/// reports collisions up to the matcher as `MwpmEvent`s.
pub struct GraphFlooder {
    pub graph: MatchingGraph,
    pub region_arena: Arena<GraphFillRegion>,
    queue: EventHeap<FloodEvent>,
    pub cur_time: CumulativeTime,
    pub match_edges: Vec<CompressedEdge>,
}

impl GraphFlooder {
    pub fn new(graph: MatchingGraph) -> Self {
        GraphFlooder {
            graph,
            region_arena: Arena::new(),
            queue: EventHeap::new(),
            cur_time: 0,
            match_edges: Vec::new(),
        }
    }

    // ---------------------------------------------------------------
    // Detection event creation
    // ---------------------------------------------------------------

    pub fn create_detection_event(&mut self, node_idx: NodeIdx) -> RegionIdx {
        let region_idx = RegionIdx(self.region_arena.alloc());
        {
            let region = self.region_arena.get_mut(region_idx.0);
            region.radius = VaryingCT::growing_varying_with_zero_distance_at_time(self.cur_time);
            region.shell_area.push(node_idx);
        }

        let node = &mut self.graph.nodes[node_idx.0 as usize];
        node.region_that_arrived = Some(region_idx);
        node.region_that_arrived_top = Some(region_idx);
        node.reached_from_source = Some(node_idx);
        node.observables_crossed_from_source = 0;
        node.radius_of_arrival = 0;
        node.wrapped_radius_cached = 0;

        trace!("detection event at node {:?} -> region {:?}", node_idx, region_idx);
        self.reschedule_events_at_detector_node(node_idx);
        region_idx
    }

    // ---------------------------------------------------------------
    // Main loop
    // ---------------------------------------------------------------

    pub fn run_until_next_mwpm_notification(
        &mut self,
        max_time: Option<CumulativeTime>,
        node_arena: &Arena<AltTreeNode>,
    ) -> MwpmEvent {
        loop {
            let Some(event) = self.dequeue_valid(max_time) else {
                return MwpmEvent::NoEvent;
            };
            let notification = self.process_tentative_event(event, node_arena);
            if !notification.is_no_event() {
                return notification;
            }
        }
    }

    /// Dequeue events, skipping stale ones, until we get a valid one, the
    /// queue is empty, or the next event is past `max_time`.
    fn dequeue_valid(&mut self, max_time: Option<CumulativeTime>) -> Option<FloodEvent> {
        loop {
            let peek_time = self.queue.peek_time()?;
            if let Some(limit) = max_time {
                if peek_time > limit {
                    return None;
                }
            }
            let (time, id, event) = self.queue.pop()?;
            if self.is_valid(&event, id) {
                self.cur_time = time;
                return Some(event);
            }
        }
    }

    fn is_valid(&self, event: &FloodEvent, id: EventId) -> bool {
        match event {
            FloodEvent::LookAtNode(node) => {
                self.graph.nodes[node.0 as usize].node_event_slot.is_valid(id)
            }
            FloodEvent::LookAtShrinkingRegion(region) => {
                self.region_arena[region.0].shrink_event_slot.is_valid(id)
            }
        }
    }

    fn process_tentative_event(
        &mut self,
        event: FloodEvent,
        node_arena: &Arena<AltTreeNode>,
    ) -> MwpmEvent {
        match event {
            FloodEvent::LookAtNode(node) => self.do_look_at_node_event(node),
            FloodEvent::LookAtShrinkingRegion(region) => {
                self.do_region_shrinking(region, node_arena)
            }
        }
    }

    // ---------------------------------------------------------------
    // Core node event processing
    // ---------------------------------------------------------------

    fn do_look_at_node_event(&mut self, node_idx: NodeIdx) -> MwpmEvent {
        let (best_neighbor, best_time) = self.find_next_event_at_node(node_idx);

        if best_time == self.cur_time {
            // Event is happening NOW. Reschedule immediately so we revisit for other edges.
            let id = self.queue.schedule(self.cur_time, FloodEvent::LookAtNode(node_idx));
            self.graph.nodes[node_idx.0 as usize].node_event_slot.set(id);

            let neighbor_node_idx = self.graph.nodes[node_idx.0 as usize].neighbors[best_neighbor];

            if neighbor_node_idx == BOUNDARY_NODE {
                return self.do_region_hit_boundary(node_idx);
            }
            return self.do_neighbor_interaction(node_idx, best_neighbor, neighbor_node_idx);
        } else if best_neighbor != NO_NEIGHBOR {
            let id = self.queue.schedule(best_time, FloodEvent::LookAtNode(node_idx));
            self.graph.nodes[node_idx.0 as usize].node_event_slot.set(id);
        }

        MwpmEvent::NoEvent
    }

    // ---------------------------------------------------------------
    // Neighbor interaction (grow or collide)
    // ---------------------------------------------------------------

    fn do_neighbor_interaction(
        &mut self,
        src_idx: NodeIdx,
        src_to_dst_index: usize,
        dst_idx: NodeIdx,
    ) -> MwpmEvent {
        let src_has_region = self.graph.nodes[src_idx.0 as usize].region_that_arrived.is_some();
        let dst_has_region = self.graph.nodes[dst_idx.0 as usize].region_that_arrived.is_some();

        if src_has_region && !dst_has_region {
            self.do_region_arriving_at_empty_node(dst_idx, src_idx, src_to_dst_index);
            return MwpmEvent::NoEvent;
        } else if dst_has_region && !src_has_region {
            let dst_to_src_index = self.graph.back_index(src_idx, src_to_dst_index);
            self.do_region_arriving_at_empty_node(src_idx, dst_idx, dst_to_src_index);
            return MwpmEvent::NoEvent;
        }

        // Two regions colliding.
        let src = &self.graph.nodes[src_idx.0 as usize];
        let dst = &self.graph.nodes[dst_idx.0 as usize];
        let edge_weight = src.neighbor_weights[src_to_dst_index] as TotalWeight;
        let obs = src.neighbor_observables[src_to_dst_index];
        let edge = CompressedEdge {
            loc_from: src.reached_from_source,
            loc_to: dst.reached_from_source,
            obs_mask: src.observables_crossed_from_source ^ dst.observables_crossed_from_source ^ obs,
            distance: src.radius_of_arrival + edge_weight + dst.radius_of_arrival,
        };
        trace!("region {:?} hit region {:?}", src.region_that_arrived_top, dst.region_that_arrived_top);
        MwpmEvent::RegionHitRegion {
            region1: src.region_that_arrived_top.unwrap(),
            region2: dst.region_that_arrived_top.unwrap(),
            edge,
        }
    }

    fn do_region_hit_boundary(&self, node_idx: NodeIdx) -> MwpmEvent {
        let node = &self.graph.nodes[node_idx.0 as usize];
        let boundary_idx = node
            .neighbors
            .iter()
            .position(|n| *n == BOUNDARY_NODE)
            .expect("do_region_hit_boundary called without a boundary neighbor");
        let edge_weight = node.neighbor_weights[boundary_idx] as TotalWeight;
        let edge = CompressedEdge {
            loc_from: node.reached_from_source,
            loc_to: None,
            obs_mask: node.observables_crossed_from_source ^ node.neighbor_observables[boundary_idx],
            distance: node.radius_of_arrival + edge_weight,
        };
        trace!("region {:?} hit boundary", node.region_that_arrived_top);
        MwpmEvent::RegionHitBoundary {
            region: node.region_that_arrived_top.unwrap(),
            edge,
        }
    }

    // ---------------------------------------------------------------
    // Region growth into an empty node
    // ---------------------------------------------------------------

    fn do_region_arriving_at_empty_node(
        &mut self,
        empty_node_idx: NodeIdx,
        from_node_idx: NodeIdx,
        from_to_empty_index: usize,
    ) {
        let from_node = &self.graph.nodes[from_node_idx.0 as usize];
        let obs = from_node.neighbor_observables[from_to_empty_index];
        let obs_crossed = from_node.observables_crossed_from_source ^ obs;
        let source = from_node.reached_from_source;
        let region = from_node.region_that_arrived;
        let region_top = from_node.region_that_arrived_top;

        let radius_of_arrival = if let Some(top) = region_top {
            self.region_arena[top.0].radius.get_distance_at_time(self.cur_time)
        } else {
            0
        };

        let empty_node = &mut self.graph.nodes[empty_node_idx.0 as usize];
        empty_node.observables_crossed_from_source = obs_crossed;
        empty_node.reached_from_source = source;
        empty_node.radius_of_arrival = radius_of_arrival;
        empty_node.region_that_arrived = region;
        empty_node.region_that_arrived_top = region_top;
        empty_node.wrapped_radius_cached = empty_node.compute_wrapped_radius(self.region_arena.items());

        if let Some(r) = region_top {
            self.region_arena.get_mut(r.0).shell_area.push(empty_node_idx);
        }

        self.reschedule_events_at_detector_node(empty_node_idx);
    }

    // ---------------------------------------------------------------
    // Find next event at a node
    // ---------------------------------------------------------------

    fn find_next_event_at_node(&self, node_idx: NodeIdx) -> (usize, CumulativeTime) {
        let node = &self.graph.nodes[node_idx.0 as usize];
        let rad1 = node.local_radius(self.region_arena.items());

        if rad1.is_growing() {
            self.find_next_event_growing(node, &rad1)
        } else {
            self.find_next_event_not_growing(node, &rad1)
        }
    }

    fn find_next_event_growing(&self, node: &DetectorNode, rad1: &VaryingCT) -> (usize, CumulativeTime) {
        let mut best_time = CumulativeTime::MAX;
        let mut best_neighbor = NO_NEIGHBOR;

        for i in 0..node.neighbors.len() {
            let neighbor_idx = node.neighbors[i];
            let weight = node.neighbor_weights[i] as CumulativeTime;

            if neighbor_idx == BOUNDARY_NODE {
                let collision_time = weight - rad1.y_intercept();
                if collision_time < best_time {
                    best_time = collision_time;
                    best_neighbor = i;
                }
                continue;
            }

            let neighbor = &self.graph.nodes[neighbor_idx.0 as usize];
            if node.has_same_owner_as(neighbor) {
                continue;
            }

            let rad2 = neighbor.local_radius(self.region_arena.items());
            if rad2.is_shrinking() {
                continue;
            }

            let mut collision_time = weight - rad1.y_intercept() - rad2.y_intercept();
            if rad2.is_growing() {
                collision_time >>= 1; // Both growing: combined slope = 2.
            }
            if collision_time < best_time {
                best_time = collision_time;
                best_neighbor = i;
            }
        }

        (best_neighbor, best_time)
    }

    /// When the node's top region is NOT growing (frozen/shrinking): only
    /// look for growing neighbors colliding into this node.
    fn find_next_event_not_growing(&self, node: &DetectorNode, _rad1: &VaryingCT) -> (usize, CumulativeTime) {
        let mut best_time = CumulativeTime::MAX;
        let mut best_neighbor = NO_NEIGHBOR;

        for i in 0..node.neighbors.len() {
            let neighbor_idx = node.neighbors[i];
            if neighbor_idx == BOUNDARY_NODE {
                continue;
            }
            let weight = node.neighbor_weights[i] as CumulativeTime;
            let neighbor = &self.graph.nodes[neighbor_idx.0 as usize];
            let rad2 = neighbor.local_radius(self.region_arena.items());

            if rad2.is_growing() {
                let collision_time = weight - _rad1.y_intercept() - rad2.y_intercept();
                if collision_time < best_time {
                    best_time = collision_time;
                    best_neighbor = i;
                }
            }
        }

        (best_neighbor, best_time)
    }

    // ---------------------------------------------------------------
    // Reschedule events at a detector node
    // ---------------------------------------------------------------

    pub fn reschedule_events_at_detector_node(&mut self, node_idx: NodeIdx) {
        let (best_neighbor, best_time) = self.find_next_event_at_node(node_idx);
        if best_neighbor == NO_NEIGHBOR {
            self.graph.nodes[node_idx.0 as usize].node_event_slot.clear();
        } else {
            let id = self.queue.schedule(best_time, FloodEvent::LookAtNode(node_idx));
            self.graph.nodes[node_idx.0 as usize].node_event_slot.set(id);
        }
    }

    // ---------------------------------------------------------------
    // Region state transitions
    //
    // Each of these always walks the shell and reschedules, even if the
    // slope didn't actually change — after a blossom implosion a region's
    // shell can change out from under it without its own slope changing,
    // so skipping the reschedule on an apparently-unchanged slope would
    // leave stale events in the queue.
    // ---------------------------------------------------------------

    pub fn set_region_growing(&mut self, region_idx: RegionIdx) {
        let region = self.region_arena.get_mut(region_idx.0);
        region.radius = region.radius.then_growing_at_time(self.cur_time);
        region.shrink_event_slot.clear();
        let shell: Vec<NodeIdx> = region.shell_area.clone();
        for node_idx in shell {
            self.reschedule_events_at_detector_node(node_idx);
        }
    }

    pub fn set_region_frozen(&mut self, region_idx: RegionIdx) {
        let region = self.region_arena.get_mut(region_idx.0);
        region.radius = region.radius.then_frozen_at_time(self.cur_time);
        region.shrink_event_slot.clear();
        let shell: Vec<NodeIdx> = region.shell_area.clone();
        for node_idx in shell {
            self.reschedule_events_at_detector_node(node_idx);
        }
    }

    pub fn set_region_shrinking(&mut self, region_idx: RegionIdx) {
        let region = self.region_arena.get_mut(region_idx.0);
        region.radius = region.radius.then_shrinking_at_time(self.cur_time);
        self.schedule_tentative_shrink_event(region_idx);
        let shell: Vec<NodeIdx> = self.region_arena[region_idx.0].shell_area.clone();
        for node_idx in shell {
            self.graph.nodes[node_idx.0 as usize].node_event_slot.clear();
        }
    }

    fn schedule_tentative_shrink_event(&mut self, region_idx: RegionIdx) {
        let region = &self.region_arena[region_idx.0];
        let t = if region.shell_area.is_empty() {
            region.radius.time_of_x_intercept()
        } else {
            let last_node_idx = *region.shell_area.last().unwrap();
            let last_node = &self.graph.nodes[last_node_idx.0 as usize];
            last_node.local_radius(self.region_arena.items()).time_of_x_intercept()
        };
        let id = self.queue.schedule(t, FloodEvent::LookAtShrinkingRegion(region_idx));
        self.region_arena.get_mut(region_idx.0).shrink_event_slot.set(id);
    }

    // ---------------------------------------------------------------
    // Region shrinking
    // ---------------------------------------------------------------

    fn do_region_shrinking(
        &mut self,
        region_idx: RegionIdx,
        node_arena: &Arena<AltTreeNode>,
    ) -> MwpmEvent {
        let region = &self.region_arena[region_idx.0];
        if region.shell_area.is_empty() {
            return self.do_blossom_shattering(region_idx);
        }
        if region.shell_area.len() == 1 && region.blossom_children.is_empty() {
            return self.do_degenerate_implosion(region_idx, node_arena);
        }

        let leaving_node_idx = {
            let region = self.region_arena.get_mut(region_idx.0);
            region.shell_area.pop().unwrap()
        };

        let leaving = &mut self.graph.nodes[leaving_node_idx.0 as usize];
        leaving.region_that_arrived = None;
        leaving.region_that_arrived_top = None;
        leaving.wrapped_radius_cached = 0;
        leaving.reached_from_source = None;
        leaving.radius_of_arrival = 0;
        leaving.observables_crossed_from_source = 0;

        self.reschedule_events_at_detector_node(leaving_node_idx);
        self.schedule_tentative_shrink_event(region_idx);

        MwpmEvent::NoEvent
    }

    /// A shrinking, non-blossom region that reaches zero radius still
    /// anchored at its own detection-event source (rather than emptying out
    /// entirely) was absorbed into the tree before it ever grew past its
    /// source node. Report the collision between its tree parent's outer
    /// region and its own growing sibling so the matcher re-runs
    /// tree-hitting dispatch on it, instead of routing it through blossom
    /// shattering.
    fn do_degenerate_implosion(
        &self,
        region_idx: RegionIdx,
        node_arena: &Arena<AltTreeNode>,
    ) -> MwpmEvent {
        let alt_idx = self.region_arena[region_idx.0]
            .alt_tree_node
            .expect("degenerate implosion requires a region attached to the alternating tree");
        let node = &node_arena[alt_idx.0];
        let parent = node
            .parent
            .as_ref()
            .expect("degenerate implosion requires a non-root alt tree node");
        let parent_outer = node_arena[parent.alt_tree_node.0]
            .outer_region
            .expect("alt tree parent must have an outer region");
        let own_outer = node
            .outer_region
            .expect("alt tree node must have an outer region");
        let edge = parent.edge.reversed().merged_with(&node.inner_to_outer_edge);

        trace!(
            "region {:?} degenerate-imploded (parent {:?}, sibling {:?})",
            region_idx,
            parent_outer,
            own_outer
        );
        MwpmEvent::RegionHitRegion {
            region1: parent_outer,
            region2: own_outer,
            edge,
        }
    }

    /// A plain matched region never reaches an empty shell area: it is
    /// caught one node earlier by `do_degenerate_implosion`, above. So a
    /// shrinking region whose shell area empties out completely is always a
    /// blossom collapsing back into its children.
    fn do_blossom_shattering(&self, region_idx: RegionIdx) -> MwpmEvent {
        let region = &self.region_arena[region_idx.0];
        let parent_loc = region
            .blossom_in_parent_loc
            .expect("shrinking blossom must carry a parent-side anchor node");
        let child_loc = region
            .blossom_in_child_loc
            .expect("shrinking blossom must carry a child-side anchor node");

        let in_parent = self.graph.nodes[parent_loc.0 as usize]
            .heir_region_on_shatter(region_idx, self.region_arena.items())
            .expect("parent anchor must resolve to a surviving blossom child");
        let in_child = self.graph.nodes[child_loc.0 as usize]
            .heir_region_on_shatter(region_idx, self.region_arena.items())
            .expect("child anchor must resolve to a surviving blossom child");

        trace!("blossom {:?} imploding", region_idx);
        MwpmEvent::BlossomShatter {
            blossom: region_idx,
            in_parent,
            in_child,
        }
    }

    // ---------------------------------------------------------------
    // Reset
    // ---------------------------------------------------------------

    pub fn reset(&mut self) {
        for node in &mut self.graph.nodes {
            node.reset();
        }
        self.region_arena.clear();
        self.queue.clear();
        self.cur_time = 0;
        self.match_edges.clear();
    }
}
