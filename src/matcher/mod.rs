pub mod alt_tree;
pub mod mwpm;
pub mod region_path;

pub use mwpm::{MatchingResult, Mwpm};
