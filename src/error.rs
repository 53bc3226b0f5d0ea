//! Caller-facing error taxonomy.
//!
//! Only the synchronous, input-shaped failures named in the error-handling
//! design get a variant here. Internal consistency violations (an
//! inconsistent tree parent pointer, merging incompatible compressed edges,
//! shattering a region with no match, running the flooder past a stale
//! slot) are programmer errors and stay as `debug_assert!`/`panic!` rather
//! than `Result` plumbing — there is no sensible recovery from them short of
//! discarding the whole instance.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MwpmError {
    #[error("detection event at unknown node {0:?}")]
    UnknownNode(String),

    #[error("edge weight must be non-negative, got {0}")]
    NegativeWeight(i64),

    #[error("no perfect matching exists: {unmatched} detection event(s) left with no boundary to absorb the odd parity")]
    OddParityNoBoundary { unmatched: usize },

    #[error("no path found expanding a compressed edge; the detector graph is not connected")]
    NoPath,
}
