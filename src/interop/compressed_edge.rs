use crate::error::MwpmError;
use crate::flooder::graph::{MatchingGraph, BOUNDARY_NODE};
use crate::types::*;

/// A summarized path between two detection events (or one event and the
/// boundary): its endpoints, the observables flipped along it, and the
/// total weight accumulated. `loc_to == None` means the path terminates
/// at the boundary rather than at another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedEdge {
    pub loc_from: Option<NodeIdx>,
    pub loc_to: Option<NodeIdx>, // None = boundary
    pub obs_mask: ObsMask,
    pub distance: TotalWeight,
}

impl CompressedEdge {
    pub fn empty() -> Self {
        CompressedEdge {
            loc_from: None,
            loc_to: None,
            obs_mask: 0,
            distance: 0,
        }
    }

    pub fn reversed(&self) -> Self {
        CompressedEdge {
            loc_from: self.loc_to,
            loc_to: self.loc_from,
            obs_mask: self.obs_mask,
            distance: self.distance,
        }
    }

    /// Concatenate `self` then `other`, where `self.loc_to == other.loc_from`.
    pub fn merged_with(&self, other: &CompressedEdge) -> Self {
        debug_assert_eq!(
            self.loc_to, other.loc_from,
            "merged_with requires a shared midpoint"
        );
        CompressedEdge {
            loc_from: self.loc_from,
            loc_to: other.loc_to,
            obs_mask: self.obs_mask ^ other.obs_mask,
            distance: self.distance + other.distance,
        }
    }

    /// Recover the chain of primitive graph nodes this edge summarizes, via
    /// a fresh Dijkstra search over `graph` from `loc_from`. If `loc_to` is
    /// the boundary, searches out to whichever reachable node's boundary
    /// edge is cheapest and appends `BOUNDARY_NODE` as the final step.
    pub fn expand(&self, graph: &MatchingGraph) -> Result<Vec<NodeIdx>, MwpmError> {
        let from = self.loc_from.ok_or(MwpmError::NoPath)?;
        let search = graph.dijkstra_from(from);

        match self.loc_to {
            Some(to) => search
                .path_to(graph, to)
                .map(|(path, _)| path)
                .ok_or(MwpmError::NoPath),
            None => {
                let boundary_node = search
                    .cheapest_boundary_node(graph)
                    .ok_or(MwpmError::NoPath)?;
                let (mut path, _) = search
                    .path_to(graph, boundary_node)
                    .ok_or(MwpmError::NoPath)?;
                path.push(BOUNDARY_NODE);
                Ok(path)
            }
        }
    }
}
