//! Fixed-point time arithmetic.
//!
//! All timeline positions are whole microseconds stored as `i64`, the unit the
//! editor's draft format uses. `TimeRange` is a `(start, duration)` pair and
//! the helpers here cover the handful of operations the timeline needs:
//! even division into scenes, clamping to a bound, and snapping a span's end.

use serde::{Deserialize, Serialize};

/// Microseconds per millisecond.
pub const MICROS_PER_MILLI: i64 = 1_000;

/// Microseconds per second.
pub const MICROS_PER_SECOND: i64 = 1_000_000;

/// Convert seconds (possibly fractional) to whole microseconds.
pub fn secs_to_micros(secs: f64) -> i64 {
    (secs * MICROS_PER_SECOND as f64).round() as i64
}

/// Convert microseconds to seconds for display.
pub fn micros_to_secs(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_SECOND as f64
}

/// A half-open span `[start, start + duration)` in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub duration: i64,
}

impl TimeRange {
    /// Create a range. Negative durations are clamped to zero.
    pub fn new(start: i64, duration: i64) -> Self {
        Self {
            start,
            duration: duration.max(0),
        }
    }

    /// Create a range from `[start, end)`. An end before the start yields an
    /// empty range at `start`.
    pub fn from_bounds(start: i64, end: i64) -> Self {
        Self::new(start, end - start)
    }

    /// Exclusive end of the range.
    pub fn end(&self) -> i64 {
        self.start + self.duration
    }

    pub fn is_empty(&self) -> bool {
        self.duration == 0
    }

    /// True when `next` begins exactly where this range ends.
    pub fn is_contiguous_with(&self, next: &TimeRange) -> bool {
        self.end() == next.start
    }

    /// True when the two ranges share at least one microsecond.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Restrict the range to `[0, limit)`.
    ///
    /// Returns `None` when nothing of the range lies inside the bound.
    pub fn clamp_to(&self, limit: i64) -> Option<TimeRange> {
        let start = self.start.max(0);
        let end = self.end().min(limit);
        if end <= start {
            return None;
        }
        Some(TimeRange::from_bounds(start, end))
    }

    /// Same start, end moved to `end`.
    pub fn with_end(&self, end: i64) -> TimeRange {
        TimeRange::from_bounds(self.start, end)
    }
}

/// Split `[0, total)` into `parts` contiguous ranges of equal length.
///
/// Each part is `total / parts` long except the last, whose end is forced to
/// `total` so the integer-division remainder is absorbed there. The result
/// always tiles `[0, total)` with no gap and no overlap.
///
/// Returns an empty vector when `parts` is zero.
pub fn partition_evenly(total: i64, parts: usize) -> Vec<TimeRange> {
    if parts == 0 {
        return Vec::new();
    }

    let step = total / parts as i64;
    (0..parts)
        .map(|i| {
            let start = i as i64 * step;
            let range = TimeRange::new(start, step);
            if i + 1 == parts {
                range.with_end(total)
            } else {
                range
            }
        })
        .collect()
}

/// True when `ranges` tile `[0, total)` exactly, in order.
pub fn covers_exactly(ranges: &[TimeRange], total: i64) -> bool {
    let Some(first) = ranges.first() else {
        return total == 0;
    };
    if first.start != 0 {
        return false;
    }
    let contiguous = ranges.windows(2).all(|w| w[0].is_contiguous_with(&w[1]));
    contiguous && ranges.last().map(|r| r.end()) == Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_even_division() {
        let ranges = partition_evenly(9_000_000, 3);
        assert_eq!(
            ranges,
            vec![
                TimeRange::new(0, 3_000_000),
                TimeRange::new(3_000_000, 3_000_000),
                TimeRange::new(6_000_000, 3_000_000),
            ]
        );
        assert!(covers_exactly(&ranges, 9_000_000));
    }

    #[test]
    fn partition_ten_scenes_ends_on_total() {
        let ranges = partition_evenly(9_000_000, 10);
        assert_eq!(ranges.len(), 10);
        assert_eq!(ranges[0], TimeRange::new(0, 900_000));
        assert_eq!(ranges[1], TimeRange::new(900_000, 900_000));
        assert_eq!(ranges[9], TimeRange::new(8_100_000, 900_000));
        assert_eq!(ranges[9].end(), 9_000_000);
    }

    #[test]
    fn partition_remainder_goes_to_last() {
        let ranges = partition_evenly(9_000_001, 4);
        assert_eq!(ranges[0].duration, 2_250_000);
        assert_eq!(ranges[1].duration, 2_250_000);
        assert_eq!(ranges[2].duration, 2_250_000);
        assert_eq!(ranges[3], TimeRange::new(6_750_000, 2_250_001));
        assert!(covers_exactly(&ranges, 9_000_001));
    }

    #[test]
    fn partition_covers_for_many_shapes() {
        for total in [1, 7, 999, 1_000_003, 59_999_999] {
            for parts in 1..=13 {
                let ranges = partition_evenly(total, parts);
                assert_eq!(ranges.len(), parts);
                assert!(covers_exactly(&ranges, total), "total={total} parts={parts}");
            }
        }
    }

    #[test]
    fn partition_zero_parts_is_empty() {
        assert!(partition_evenly(1_000, 0).is_empty());
    }

    #[test]
    fn clamp_trims_and_drops() {
        let r = TimeRange::new(8_000_000, 2_000_000);
        assert_eq!(r.clamp_to(9_000_000), Some(TimeRange::new(8_000_000, 1_000_000)));
        assert_eq!(r.clamp_to(8_000_000), None);
        assert_eq!(TimeRange::new(-500, 1_000).clamp_to(10_000), Some(TimeRange::new(0, 500)));
    }

    #[test]
    fn negative_duration_is_clamped() {
        let r = TimeRange::from_bounds(5, 2);
        assert_eq!(r, TimeRange::new(5, 0));
        assert!(r.is_empty());
    }

    #[test]
    fn overlap_and_contiguity() {
        let a = TimeRange::new(0, 10);
        let b = TimeRange::new(10, 5);
        let c = TimeRange::new(9, 5);
        assert!(a.is_contiguous_with(&b));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn seconds_conversion() {
        assert_eq!(secs_to_micros(1.5), 1_500_000);
        assert_eq!(secs_to_micros(0.0000004), 0);
        assert!((micros_to_secs(2_500_000) - 2.5).abs() < 1e-9);
    }
}
