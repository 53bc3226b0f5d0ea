//! The public, caller-facing matching API: a `HashMap`-keyed wrapper around
//! the array-indexed `MatchingGraph` + `Mwpm` core, so callers can name
//! detectors with whatever key type makes sense for them (a qubit
//! coordinate, a stim detector index, a string) instead of a raw `NodeIdx`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::MwpmError;
use crate::flooder::graph_flooder::GraphFlooder;
use crate::flooder::graph::MatchingGraph;
use crate::interop::CompressedEdge;
use crate::matcher::{MatchingResult, Mwpm};
use crate::types::*;

/// The outcome of a single `decode()` call: the recovered matching, its
/// total weight, and the combined observable flip mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    pub matches: Vec<CompressedEdge>,
    pub total_weight: TotalWeight,
    pub obs_mask: ObsMask,
}

/// A minimum-weight perfect matching decoder keyed by an opaque,
/// caller-supplied location type `K`. Build the detector graph once with
/// `add_edge`/`add_boundary_edge`, then repeatedly feed a syndrome in with
/// `add_detection_event` and call `decode()`; call `reset()` between rounds
/// to reuse the same graph for the next syndrome.
pub struct Decoder<K: Eq + Hash + Clone + Debug> {
    key_to_node: HashMap<K, NodeIdx>,
    mwpm: Mwpm,
    pending_events: Vec<NodeIdx>,
}

impl<K: Eq + Hash + Clone + Debug> Decoder<K> {
    pub fn new(num_observables: usize) -> Self {
        Decoder {
            key_to_node: HashMap::new(),
            mwpm: Mwpm::new(GraphFlooder::new(MatchingGraph::new(0, num_observables))),
            pending_events: Vec::new(),
        }
    }

    fn node_for(&mut self, key: K) -> NodeIdx {
        if let Some(&idx) = self.key_to_node.get(&key) {
            return idx;
        }
        let idx = NodeIdx(self.key_to_node.len() as u32);
        self.key_to_node.insert(key, idx);
        self.mwpm.flooder.graph.ensure_capacity(idx.0 as usize + 1);
        idx
    }

    fn lookup(&self, key: &K) -> Result<NodeIdx, MwpmError> {
        self.key_to_node
            .get(key)
            .copied()
            .ok_or_else(|| MwpmError::UnknownNode(format!("{:?}", key)))
    }

    /// Add a weighted edge between two detectors, allocating node slots for
    /// keys seen for the first time. Crossing observables are given by
    /// index; `weight` must be non-negative.
    pub fn add_edge(
        &mut self,
        a: K,
        b: K,
        weight: SignedWeight,
        observables: &[usize],
    ) -> Result<(), MwpmError> {
        let a_idx = self.node_for(a);
        let b_idx = self.node_for(b);
        self.mwpm
            .flooder
            .graph
            .add_edge(a_idx.0 as usize, b_idx.0 as usize, weight, observables)
    }

    /// Add a weighted edge from a detector to the boundary.
    pub fn add_boundary_edge(
        &mut self,
        a: K,
        weight: SignedWeight,
        observables: &[usize],
    ) -> Result<(), MwpmError> {
        let a_idx = self.node_for(a);
        self.mwpm
            .flooder
            .graph
            .add_boundary_edge(a_idx.0 as usize, weight, observables)
    }

    /// Record that `key` fired in the current syndrome. Queued up and
    /// applied all at once on the next `decode()` call.
    pub fn add_detection_event(&mut self, key: K) -> Result<(), MwpmError> {
        let idx = self.lookup(&key)?;
        self.pending_events.push(idx);
        Ok(())
    }

    /// Run the matcher to completion over the queued detection events and
    /// extract the resulting matching. Returns `MwpmError::OddParityNoBoundary`
    /// if an odd number of detection events end up with no boundary to pair
    /// against. Clears the queued events regardless of outcome; call
    /// `reset()` afterward to start the next round from an empty graph
    /// state (the static edges/weights are preserved).
    pub fn decode(&mut self) -> Result<DecodeResult, MwpmError> {
        let events = std::mem::take(&mut self.pending_events);
        for node in events {
            self.mwpm.create_detection_event(node);
        }

        loop {
            let event = self
                .mwpm
                .flooder
                .run_until_next_mwpm_notification(None, &self.mwpm.node_arena);
            if event.is_no_event() {
                break;
            }
            self.mwpm.process_event(event);
        }

        let region_count = self.mwpm.flooder.region_arena.len();
        let unmatched = (0..region_count)
            .filter(|&idx| {
                let region = &self.mwpm.flooder.region_arena[idx as u32];
                region.match_.is_none() && region.blossom_parent.is_none()
            })
            .count();
        if unmatched > 0 {
            return Err(MwpmError::OddParityNoBoundary { unmatched });
        }

        let mut processed = vec![false; region_count];
        let mut result = MatchingResult::new();
        for idx in 0..region_count {
            if processed[idx] {
                continue;
            }
            let region = &self.mwpm.flooder.region_arena[idx as u32];
            let Some(m) = region.match_.clone() else {
                continue;
            };
            processed[idx] = true;
            if let Some(partner) = m.region {
                processed[partner.0 as usize] = true;
            }
            result += self
                .mwpm
                .shatter_blossom_and_extract_matches(RegionIdx(idx as u32));
        }

        Ok(DecodeResult {
            matches: result.edges,
            total_weight: result.weight,
            obs_mask: result.obs_mask,
        })
    }

    /// Reset all per-round state (regions, alt trees, the event queue) so
    /// the same graph can be decoded again. Does not forget the key-to-node
    /// mapping or the edges added with `add_edge`/`add_boundary_edge`.
    pub fn reset(&mut self) {
        self.pending_events.clear();
        self.mwpm.reset();
    }
}
