//! Pure index arithmetic for splitting a blossom's cyclic child list into
//! an odd-length path (parent anchor to child anchor) and the even-length
//! remainder, which pairs off into matches.

/// Describes how a blossom's `bsize` children, arranged in a cycle, split
/// around the two anchor indices `parent_idx` (where the blossom attaches
/// to its alternating-tree parent) and `child_idx` (where the shrinking
/// sub-blossom that triggered the implosion sits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSplit {
    /// Cyclic distance from `parent_idx` to `child_idx`, walking forward.
    pub gap: usize,
    /// Start index (inclusive, may exceed `bsize`) of the even-length run
    /// of children that get paired into matches.
    pub evens_start: usize,
    /// End index (exclusive) of that run.
    pub evens_end: usize,
    /// When true, the odd-length path from parent to child is built
    /// walking forward around the cycle; when false, backward.
    pub walk_forward: bool,
}

/// Split a blossom's `bsize`-child cycle around `parent_idx` and
/// `child_idx`. The odd-length arc between them becomes new alternating
/// tree pairs; the even-length remainder becomes matched pairs.
pub fn split_cycle(bsize: usize, parent_idx: usize, child_idx: usize) -> CycleSplit {
    debug_assert!(bsize > 0 && parent_idx < bsize && child_idx < bsize);
    let gap = (child_idx + bsize - parent_idx) % bsize;

    if gap % 2 == 0 {
        CycleSplit {
            gap,
            evens_start: child_idx + 1,
            evens_end: child_idx + bsize - gap,
            walk_forward: true,
        }
    } else {
        CycleSplit {
            gap,
            evens_start: parent_idx + 1,
            evens_end: parent_idx + gap,
            walk_forward: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_gap_splits_forward_from_child() {
        let s = split_cycle(6, 0, 2);
        assert_eq!(s.gap, 2);
        assert!(s.walk_forward);
        assert_eq!(s.evens_start, 3);
        assert_eq!(s.evens_end, 4);
    }

    #[test]
    fn odd_gap_splits_backward_from_parent() {
        let s = split_cycle(6, 0, 3);
        assert_eq!(s.gap, 3);
        assert!(!s.walk_forward);
        assert_eq!(s.evens_start, 1);
        assert_eq!(s.evens_end, 3);
    }

    #[test]
    fn evens_span_is_always_even_length() {
        for bsize in 2..8 {
            for parent_idx in 0..bsize {
                for child_idx in 0..bsize {
                    let s = split_cycle(bsize, parent_idx, child_idx);
                    let span = s.evens_end - s.evens_start;
                    assert_eq!(span % 2, 0, "bsize={bsize} parent={parent_idx} child={child_idx} span={span}");
                }
            }
        }
    }

    #[test]
    fn degenerate_same_anchor_has_zero_gap() {
        let s = split_cycle(4, 1, 1);
        assert_eq!(s.gap, 0);
        assert_eq!(s.evens_end - s.evens_start, 0);
    }
}
