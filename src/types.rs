//! Shared index newtypes and scalar aliases used throughout the solver.

/// Stable index into the detector-node arena of a `MatchingGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdx(pub u32);

/// Stable index into a `GraphFlooder`'s region arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionIdx(pub u32);

/// Stable index into an `Mwpm`'s alternating-tree-node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AltTreeIdx(pub u32);

/// Monotonically increasing id assigned to each scheduled tentative event,
/// used both to break ties between events firing at the same time and to
/// detect staleness when a slot has since been rescheduled.
pub type EventId = u64;

/// Bitmask of logical observables crossed along a path.
pub type ObsMask = u64;

/// A single edge's weight, already discretized to a non-negative integer.
pub type Weight = u32;

/// A signed variant used transiently while discretizing caller-supplied weights.
pub type SignedWeight = i32;

/// Simulated time / accumulated radius, in the same integer units as `Weight`.
pub type CumulativeTime = i64;

/// Sum of edge weights along a recovered matching.
pub type TotalWeight = i64;

/// Sentinel meaning "no neighbor slot found".
pub const NO_NEIGHBOR: usize = usize::MAX;
