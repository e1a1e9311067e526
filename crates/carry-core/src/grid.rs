//! # Step Grid
//!
//! Snapping and alignment for slider values.
//!
//! A grid is anchored at the slider minimum and advances in whole steps:
//!
//! ```text
//!   anchor = 0, step = 10
//!
//!   0    10    20    30    40    50
//!   ├─────┼─────┼─────┼─────┼─────┤
//!              ▲
//!              27 ── snap_down ──► 20
//!                 ── snap_up   ──► 30
//! ```
//!
//! ## Unit-count convention
//! Spans are counted **exclusively**: `units(min, max) = (max - min) / step`,
//! the number of whole steps between the two points. `0..50` in steps of 10
//! is 5 units. Every pricing path uses this one rule.

/// A step grid anchored at a slider minimum.
///
/// Internally computed in `i128` so extreme slider bounds cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    anchor: i64,
    step: i64,
}

impl Grid {
    /// Creates a grid; `None` if `step` is not positive.
    pub const fn new(anchor: i64, step: i64) -> Option<Self> {
        if step <= 0 {
            return None;
        }
        Some(Grid { anchor, step })
    }

    #[inline]
    pub const fn anchor(&self) -> i64 {
        self.anchor
    }

    #[inline]
    pub const fn step(&self) -> i64 {
        self.step
    }

    #[inline]
    fn offset(&self, value: i64) -> i128 {
        (value as i128 - self.anchor as i128).rem_euclid(self.step as i128)
    }

    /// Rounds down to the nearest grid point: `v - ((v - anchor) mod step)`.
    ///
    /// ## Example
    /// ```rust
    /// use carry_core::grid::Grid;
    ///
    /// let grid = Grid::new(5, 10).unwrap();
    /// assert_eq!(grid.snap_down(27), 25);
    /// assert_eq!(grid.snap_down(25), 25);
    /// assert_eq!(grid.snap_down(4), -5);
    /// ```
    pub fn snap_down(&self, value: i64) -> i64 {
        (value as i128 - self.offset(value)) as i64
    }

    /// Rounds up to the nearest grid point.
    ///
    /// Saturates at the largest grid point representable in i64.
    pub fn snap_up(&self, value: i64) -> i64 {
        let offset = self.offset(value);
        if offset == 0 {
            return value;
        }
        let up = value as i128 + (self.step as i128 - offset);
        if up > i64::MAX as i128 {
            self.snap_down(i64::MAX)
        } else {
            up as i64
        }
    }

    /// True if the value is exactly on the grid.
    #[inline]
    pub fn is_aligned(&self, value: i64) -> bool {
        self.offset(value) == 0
    }

    /// Whole steps between two points (exclusive count).
    ///
    /// ## Example
    /// ```rust
    /// use carry_core::grid::Grid;
    ///
    /// let grid = Grid::new(0, 10).unwrap();
    /// assert_eq!(grid.units(0, 50), 5);
    /// assert_eq!(grid.units(20, 20), 0);
    /// ```
    pub fn units(&self, from: i64, to: i64) -> i64 {
        ((to as i128 - from as i128) / self.step as i128) as i64
    }

    /// Clamps into `[lo, hi]` and snaps down onto the grid.
    ///
    /// With `lo` on the grid the result stays inside `[lo, hi]`.
    pub fn clamp_snap(&self, value: i64, lo: i64, hi: i64) -> i64 {
        self.snap_down(clamp(value, lo, hi))
    }
}

/// Clamps a value into `[lo, hi]`, tolerating a reversed interval.
#[inline]
pub fn clamp(value: i64, lo: i64, hi: i64) -> i64 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    value.max(lo).min(hi)
}

/// Rounds `value` up to the next multiple of `block` (`block > 0`).
pub fn round_up_to_multiple(value: i64, block: i64) -> i64 {
    if block <= 1 {
        return value;
    }
    let rem = value.rem_euclid(block);
    if rem == 0 {
        value
    } else {
        value.saturating_add(block - rem)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_non_positive_step() {
        assert!(Grid::new(0, 0).is_none());
        assert!(Grid::new(0, -5).is_none());
        assert!(Grid::new(0, 1).is_some());
    }

    #[test]
    fn test_snap_with_offset_anchor() {
        let grid = Grid::new(2, 5).unwrap();
        assert_eq!(grid.snap_down(7), 7);
        assert_eq!(grid.snap_down(11), 7);
        assert_eq!(grid.snap_up(8), 12);
        assert!(grid.is_aligned(17));
        assert!(!grid.is_aligned(18));
    }

    #[test]
    fn test_negative_values() {
        let grid = Grid::new(-100, 25).unwrap();
        assert_eq!(grid.snap_down(-80), -100);
        assert_eq!(grid.snap_up(-80), -75);
        assert_eq!(grid.units(-100, 0), 4);
    }

    #[test]
    fn test_clamp_snap() {
        let grid = Grid::new(0, 10).unwrap();
        assert_eq!(grid.clamp_snap(57, 0, 100), 50);
        assert_eq!(grid.clamp_snap(-3, 0, 100), 0);
        assert_eq!(grid.clamp_snap(500, 0, 95), 90);
    }

    #[test]
    fn test_round_up_to_multiple() {
        assert_eq!(round_up_to_multiple(7, 5), 10);
        assert_eq!(round_up_to_multiple(10, 5), 10);
        assert_eq!(round_up_to_multiple(3, 1), 3);
    }

    proptest! {
        #[test]
        fn prop_snap_down_is_idempotent(anchor in -10_000i64..10_000, step in 1i64..500, v in -100_000i64..100_000) {
            let grid = Grid::new(anchor, step).unwrap();
            let once = grid.snap_down(v);
            prop_assert_eq!(grid.snap_down(once), once);
            prop_assert!(grid.is_aligned(once));
            prop_assert!(once <= v && v - once < step);
        }

        #[test]
        fn prop_snap_up_is_idempotent(anchor in -10_000i64..10_000, step in 1i64..500, v in -100_000i64..100_000) {
            let grid = Grid::new(anchor, step).unwrap();
            let once = grid.snap_up(v);
            prop_assert_eq!(grid.snap_up(once), once);
            prop_assert!(once >= v && once - v < step);
        }
    }
}
