use crate::error::MwpmError;
use crate::types::*;

use super::detector_node::DetectorNode;

/// Sentinel `NodeIdx` used as a neighbor to mean "the boundary".
pub const BOUNDARY_NODE: NodeIdx = NodeIdx(u32::MAX);

/// The static, immutable detector graph: nodes, their weighted edges to
/// each other and to the boundary, and the observables each edge flips.
/// Built once per instance and never mutated once decoding starts.
pub struct MatchingGraph {
    pub nodes: Vec<DetectorNode>,
    pub num_observables: usize,
}

impl MatchingGraph {
    pub fn new(num_nodes: usize, num_observables: usize) -> Self {
        MatchingGraph {
            nodes: (0..num_nodes).map(|_| DetectorNode::new()).collect(),
            num_observables,
        }
    }

    /// Grow `nodes` so that index `len - 1` is valid, padding with fresh
    /// `DetectorNode`s. Used by the keyed `Decoder` wrapper, which doesn't
    /// know the final node count up front.
    pub fn ensure_capacity(&mut self, len: usize) {
        while self.nodes.len() < len {
            self.nodes.push(DetectorNode::new());
        }
    }

    fn obs_mask(&self, observables: &[usize]) -> ObsMask {
        let mut mask: ObsMask = 0;
        if self.num_observables <= 64 {
            for &obs in observables {
                mask ^= 1u64 << obs;
            }
        }
        mask
    }

    /// Add an undirected edge between `u` and `v`. Self-loops are ignored
    /// (they never participate in matching). Each side records the slot
    /// index of its mirror on the other side so neighbor lookups after a
    /// collision are O(1) instead of a linear scan.
    pub fn add_edge(
        &mut self,
        u: usize,
        v: usize,
        weight: SignedWeight,
        observables: &[usize],
    ) -> Result<(), MwpmError> {
        if weight < 0 {
            return Err(MwpmError::NegativeWeight(weight as i64));
        }
        if u == v {
            return Ok(());
        }

        let weight = weight as Weight;
        let obs_mask = self.obs_mask(observables);

        let u_slot = self.nodes[u].neighbors.len() as u32;
        let v_slot = self.nodes[v].neighbors.len() as u32;

        self.nodes[u].neighbors.push(NodeIdx(v as u32));
        self.nodes[u].neighbor_weights.push(weight);
        self.nodes[u].neighbor_observables.push(obs_mask);
        self.nodes[u].neighbor_back_index.push(v_slot);

        self.nodes[v].neighbors.push(NodeIdx(u as u32));
        self.nodes[v].neighbor_weights.push(weight);
        self.nodes[v].neighbor_observables.push(obs_mask);
        self.nodes[v].neighbor_back_index.push(u_slot);

        Ok(())
    }

    /// Add an edge from `u` to the boundary.
    pub fn add_boundary_edge(
        &mut self,
        u: usize,
        weight: SignedWeight,
        observables: &[usize],
    ) -> Result<(), MwpmError> {
        if weight < 0 {
            return Err(MwpmError::NegativeWeight(weight as i64));
        }

        let weight = weight as Weight;
        let obs_mask = self.obs_mask(observables);

        self.nodes[u].neighbors.push(BOUNDARY_NODE);
        self.nodes[u].neighbor_weights.push(weight);
        self.nodes[u].neighbor_observables.push(obs_mask);
        self.nodes[u].neighbor_back_index.push(NO_NEIGHBOR as u32);

        Ok(())
    }

    /// Given a node and the slot-index of one of its neighbors, return the
    /// slot-index that points back at `node` from that neighbor. Panics if
    /// the neighbor is the boundary (the boundary has no slots).
    pub fn back_index(&self, node: NodeIdx, neighbor_slot: usize) -> usize {
        self.nodes[node.0 as usize].neighbor_back_index[neighbor_slot] as usize
    }

    /// Dijkstra's algorithm from `source`, returning a reusable set of
    /// predecessors and distances. Used only to expand a `CompressedEdge`
    /// back into a concrete path; this state is scratch, recomputed on
    /// demand, and never persisted on the graph itself.
    pub fn dijkstra_from(&self, source: NodeIdx) -> DijkstraResult {
        use std::cmp::Reverse;
        use std::collections::BinaryHeap;

        let n = self.nodes.len();
        let mut dist = vec![CumulativeTime::MAX; n];
        let mut predecessor: Vec<Option<(NodeIdx, usize)>> = vec![None; n];
        let mut heap = BinaryHeap::new();

        dist[source.0 as usize] = 0;
        heap.push(Reverse((0i64, source)));

        while let Some(Reverse((d, u))) = heap.pop() {
            if d > dist[u.0 as usize] {
                continue;
            }
            let node = &self.nodes[u.0 as usize];
            for (slot, &neighbor) in node.neighbors.iter().enumerate() {
                if neighbor == BOUNDARY_NODE {
                    continue;
                }
                let nd = d + node.neighbor_weights[slot] as i64;
                if nd < dist[neighbor.0 as usize] {
                    dist[neighbor.0 as usize] = nd;
                    predecessor[neighbor.0 as usize] = Some((u, slot));
                    heap.push(Reverse((nd, neighbor)));
                }
            }
        }

        DijkstraResult { dist, predecessor }
    }
}

pub struct DijkstraResult {
    dist: Vec<CumulativeTime>,
    predecessor: Vec<Option<(NodeIdx, usize)>>,
}

impl DijkstraResult {
    /// Reconstruct the node path and accumulated observable mask from the
    /// Dijkstra source to `target`. Returns `None` if `target` was
    /// unreachable.
    pub fn path_to(&self, graph: &MatchingGraph, target: NodeIdx) -> Option<(Vec<NodeIdx>, ObsMask)> {
        if self.dist[target.0 as usize] == CumulativeTime::MAX {
            return None;
        }
        let mut path = vec![target];
        let mut obs_mask: ObsMask = 0;
        let mut cur = target;
        while let Some((prev, slot)) = self.predecessor[cur.0 as usize] {
            obs_mask ^= graph.nodes[prev.0 as usize].neighbor_observables[slot];
            path.push(prev);
            cur = prev;
        }
        path.reverse();
        Some((path, obs_mask))
    }

    pub fn distance_to(&self, target: NodeIdx) -> Option<CumulativeTime> {
        let d = self.dist[target.0 as usize];
        if d == CumulativeTime::MAX { None } else { Some(d) }
    }

    /// Among the nodes this search reached, find the one whose boundary edge
    /// gives the cheapest total distance to the boundary. Used to expand a
    /// compressed edge whose far end is the boundary rather than a fixed
    /// node.
    pub fn cheapest_boundary_node(&self, graph: &MatchingGraph) -> Option<NodeIdx> {
        let mut best: Option<(CumulativeTime, NodeIdx)> = None;
        for (idx, node) in graph.nodes.iter().enumerate() {
            let d = self.dist[idx];
            if d == CumulativeTime::MAX {
                continue;
            }
            for (slot, &neighbor) in node.neighbors.iter().enumerate() {
                if neighbor != BOUNDARY_NODE {
                    continue;
                }
                let total = d + node.neighbor_weights[slot] as i64;
                if best.is_none_or(|(bd, _)| total < bd) {
                    best = Some((total, NodeIdx(idx as u32)));
                }
            }
        }
        best.map(|(_, idx)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_weight() {
        let mut g = MatchingGraph::new(2, 1);
        assert!(matches!(g.add_edge(0, 1, -1, &[]), Err(MwpmError::NegativeWeight(-1))));
    }

    #[test]
    fn back_index_points_at_mirror_slot() {
        let mut g = MatchingGraph::new(3, 0);
        g.add_edge(0, 1, 5, &[]).unwrap();
        g.add_edge(1, 2, 3, &[]).unwrap();
        // node 1 has neighbors [0, 2] at slots [0, 1]
        assert_eq!(g.nodes[1].neighbors[0], NodeIdx(0));
        assert_eq!(g.back_index(NodeIdx(1), 0), 0); // node 0's slot pointing back at 1
        assert_eq!(g.nodes[0].neighbors[g.back_index(NodeIdx(1), 0)], NodeIdx(1));
    }

    #[test]
    fn dijkstra_finds_shortest_path() {
        let mut g = MatchingGraph::new(4, 0);
        g.add_edge(0, 1, 1, &[]).unwrap();
        g.add_edge(1, 2, 1, &[]).unwrap();
        g.add_edge(0, 2, 5, &[]).unwrap();
        g.add_edge(2, 3, 1, &[]).unwrap();
        let r = g.dijkstra_from(NodeIdx(0));
        assert_eq!(r.distance_to(NodeIdx(3)), Some(3));
        let (path, _) = r.path_to(&g, NodeIdx(3)).unwrap();
        assert_eq!(path, vec![NodeIdx(0), NodeIdx(1), NodeIdx(2), NodeIdx(3)]);
    }
}
