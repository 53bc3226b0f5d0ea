//! A linear function of time, `base + slope * (t - base_time)`, with
//! `slope` restricted to {-1, 0, +1} (shrinking, frozen, growing).
//!
//! Kept as a plain record of three numbers rather than bit-packed into a
//! single machine word: at the sizes this solver runs at there is no
//! pressure to save the handful of bits, and a plain struct is far easier
//! to reason about and test against the algebraic laws in isolation.

use std::ops::{Add, Sub};

use crate::types::CumulativeTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Varying {
    base: CumulativeTime,
    slope: i8,
    base_time: CumulativeTime,
}

/// Cumulative-time varying, used throughout the flooding algorithm.
pub type VaryingCT = Varying;

impl Varying {
    pub fn new(base: CumulativeTime, slope: i8, base_time: CumulativeTime) -> Self {
        debug_assert!((-1..=1).contains(&slope));
        Varying { base, slope, base_time }
    }

    /// A constant function (slope 0), anchored at time 0.
    pub fn frozen(base: CumulativeTime) -> Varying {
        Varying { base, slope: 0, base_time: 0 }
    }

    /// A growing (slope +1) function whose value is zero at `time`.
    pub fn growing_varying_with_zero_distance_at_time(time: CumulativeTime) -> Varying {
        Varying { base: 0, slope: 1, base_time: time }
    }

    /// Evaluate the function at `time`.
    #[inline]
    pub fn get_distance_at_time(&self, time: CumulativeTime) -> CumulativeTime {
        self.base + self.slope as CumulativeTime * (time - self.base_time)
    }

    /// The value this function takes at its own `base_time` — i.e. its
    /// y-intercept relative to `base_time`. Equivalent to `get_distance_at_time(base_time)`.
    #[inline]
    pub fn y_intercept(&self) -> CumulativeTime {
        self.base
    }

    #[inline]
    pub fn is_growing(&self) -> bool {
        self.slope > 0
    }

    #[inline]
    pub fn is_shrinking(&self) -> bool {
        self.slope < 0
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.slope == 0
    }

    /// Time at which this function crosses zero.
    ///
    /// `None` when frozen and already nonzero (no crossing); frozen-at-zero
    /// is treated as crossing at `base_time` itself, matching the contract
    /// that an empty, already-zero blossom radius is ready to implode now.
    pub fn zero_intercept(&self) -> Option<CumulativeTime> {
        if self.slope == 0 {
            return if self.base == 0 { Some(self.base_time) } else { None };
        }
        // base + slope*(t - base_time) == 0  =>  t == base_time - base/slope
        Some(self.base_time - self.base / self.slope as CumulativeTime)
    }

    /// Time at which this function crosses zero; panics if it never does
    /// (frozen and nonzero). Used at call sites where the caller already
    /// knows the function is growing or shrinking.
    pub fn time_of_x_intercept(&self) -> CumulativeTime {
        self.zero_intercept()
            .expect("time_of_x_intercept called on a frozen, nonzero Varying")
    }

    /// Returns a new `Varying` with slope `new_slope`, pivoted at `time` so
    /// that `new(time) == self(time)`.
    pub fn then_slope_at(&self, time: CumulativeTime, new_slope: i8) -> Varying {
        Varying {
            base: self.get_distance_at_time(time),
            slope: new_slope,
            base_time: time,
        }
    }

    pub fn then_growing_at_time(&self, time: CumulativeTime) -> Varying {
        self.then_slope_at(time, 1)
    }

    pub fn then_shrinking_at_time(&self, time: CumulativeTime) -> Varying {
        self.then_slope_at(time, -1)
    }

    pub fn then_frozen_at_time(&self, time: CumulativeTime) -> Varying {
        self.then_slope_at(time, 0)
    }
}

impl Add<CumulativeTime> for Varying {
    type Output = Varying;
    #[inline]
    fn add(self, rhs: CumulativeTime) -> Varying {
        Varying { base: self.base + rhs, slope: self.slope, base_time: self.base_time }
    }
}

impl Sub<CumulativeTime> for Varying {
    type Output = Varying;
    #[inline]
    fn sub(self, rhs: CumulativeTime) -> Varying {
        Varying { base: self.base - rhs, slope: self.slope, base_time: self.base_time }
    }
}

impl Add<Varying> for Varying {
    type Output = Varying;
    /// Sum two Varying values evaluated at a common reference time. Both
    /// must share the same `base_time` (the caller normalizes to "now"
    /// before adding); the result shares that `base_time`.
    fn add(self, rhs: Varying) -> Varying {
        debug_assert_eq!(self.base_time, rhs.base_time, "Varying::add requires a common base_time");
        Varying {
            base: self.base + rhs.base,
            slope: self.slope + rhs.slope,
            base_time: self.base_time,
        }
    }
}

impl Sub<Varying> for Varying {
    type Output = Varying;
    fn sub(self, rhs: Varying) -> Varying {
        debug_assert_eq!(self.base_time, rhs.base_time, "Varying::sub requires a common base_time");
        Varying {
            base: self.base - rhs.base,
            slope: self.slope - rhs.slope,
            base_time: self.base_time,
        }
    }
}
