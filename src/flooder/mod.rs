pub mod detector_node;
pub mod fill_region;
pub mod graph;
pub mod graph_flooder;

pub use detector_node::DetectorNode;
pub use fill_region::GraphFillRegion;
pub use graph::{MatchingGraph, BOUNDARY_NODE};
pub use graph_flooder::GraphFlooder;
