//! Interval consolidation engine for a single station.
//!
//! An [`IntervalStore`] accumulates availability reports and maintains a
//! minimal sorted set of disjoint "up" intervals, fusing any ranges that
//! overlap or touch. Down-time is never stored; it is whatever the merged
//! up-intervals do not cover within the observed span.

use crate::error::{Result, UptimeError};

/// A closed time range `[start, end]` during which a charger was confirmed up.
///
/// Times are opaque monotonic integers (e.g. epoch seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

/// Per-station accumulator of availability reports.
///
/// Invariant: `intervals` is sorted ascending by start and pairwise strictly
/// disjoint (`a.end < b.start` for every adjacent pair). Touching ranges are
/// fused on insert, so equality of an end and the next start never survives.
#[derive(Debug, Default)]
pub struct IntervalStore {
    intervals: Vec<Interval>,
    observed: Option<(i64, i64)>,
}

impl IntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one availability report into the store.
    ///
    /// The observed span widens on every report, up or down. Only `up`
    /// reports contribute an interval to the merged set.
    ///
    /// # Errors
    ///
    /// Returns [`UptimeError::InvalidRange`] when `end < start`, leaving the
    /// store untouched.
    pub fn resolve(&mut self, start: i64, end: i64, up: bool) -> Result<()> {
        if end < start {
            return Err(UptimeError::InvalidRange { start, end });
        }

        self.observed = Some(match self.observed {
            Some((min, max)) => (min.min(start), max.max(end)),
            None => (start, end),
        });

        if up {
            self.insert(Interval { start, end });
        }

        Ok(())
    }

    /// Inserts `new` into the sorted set, fusing the contiguous run of
    /// existing intervals it overlaps or touches into a single interval.
    fn insert(&mut self, new: Interval) {
        // First existing interval whose start is >= new.start.
        let idx = self.intervals.partition_point(|iv| iv.start < new.start);

        // At most one left neighbour can reach new.start: everything before
        // it ends strictly before its start.
        let mut lo = idx;
        if lo > 0 && self.intervals[lo - 1].end >= new.start {
            lo -= 1;
        }

        // Absorb every interval starting within new's range.
        let mut hi = idx;
        while hi < self.intervals.len() && self.intervals[hi].start <= new.end {
            hi += 1;
        }

        if lo == hi {
            // Nothing overlaps or touches.
            self.intervals.insert(idx, new);
        } else {
            let merged = Interval {
                start: new.start.min(self.intervals[lo].start),
                end: new.end.max(self.intervals[hi - 1].end),
            };
            self.intervals.splice(lo..hi, std::iter::once(merged));
        }
    }

    /// The merged, sorted, disjoint up-intervals.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// The `(min, max)` of all times mentioned by any report, or `None` if no
    /// report was ever resolved.
    pub fn observed_span(&self) -> Option<(i64, i64)> {
        self.observed
    }

    /// Total duration covered by the merged up-intervals.
    pub fn up_time(&self) -> i64 {
        self.intervals.iter().map(Interval::duration).sum()
    }

    /// Uptime as an integer percentage of the observed span, rounded down.
    ///
    /// # Errors
    ///
    /// [`UptimeError::NoData`] if no report was ever resolved,
    /// [`UptimeError::DegenerateSpan`] if every report had the same start and
    /// end (zero-width span, percentage undefined).
    pub fn percent_uptime(&self) -> Result<u8> {
        let (min, max) = self.observed.ok_or(UptimeError::NoData)?;
        let span = max - min;
        if span == 0 {
            return Err(UptimeError::DegenerateSpan);
        }

        let percent = 100 * self.up_time() / span;

        // Disjoint intervals bounded by the span cannot exceed 100%; the
        // clamp asserts that rather than papering over a merge bug.
        Ok(percent.clamp(0, 100) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(store: &IntervalStore) -> Vec<(i64, i64)> {
        store.intervals().iter().map(|iv| (iv.start, iv.end)).collect()
    }

    fn assert_disjoint_sorted(store: &IntervalStore) {
        for pair in store.intervals().windows(2) {
            assert!(
                pair[0].end < pair[1].start,
                "intervals not strictly disjoint: {:?}",
                ranges(store)
            );
        }
    }

    #[test]
    fn test_single_up_report_is_full_uptime() {
        let mut store = IntervalStore::new();
        store.resolve(60000, 127823, true).unwrap();
        assert_eq!(store.percent_uptime().unwrap(), 100);
    }

    #[test]
    fn test_single_down_report_is_zero_uptime() {
        let mut store = IntervalStore::new();
        store.resolve(0, 1878, false).unwrap();
        assert_eq!(store.percent_uptime().unwrap(), 0);
    }

    #[test]
    fn test_overlapping_reports_merge() {
        let mut store = IntervalStore::new();
        store.resolve(25000, 50000, true).unwrap();
        store.resolve(27000, 90900, true).unwrap();

        assert_eq!(ranges(&store), vec![(25000, 90900)]);
        assert_eq!(store.percent_uptime().unwrap(), 100);
    }

    #[test]
    fn test_bridging_report_fuses_neighbours() {
        let mut store = IntervalStore::new();
        store.resolve(100, 200, true).unwrap();
        store.resolve(300, 400, true).unwrap();
        store.resolve(150, 350, true).unwrap();

        assert_eq!(ranges(&store), vec![(100, 400)]);
    }

    #[test]
    fn test_touching_reports_fuse() {
        let mut store = IntervalStore::new();
        store.resolve(0, 100, true).unwrap();
        store.resolve(100, 200, true).unwrap();
        assert_eq!(ranges(&store), vec![(0, 200)]);

        // Touching on the left edge as well.
        store.resolve(250, 300, true).unwrap();
        store.resolve(200, 250, true).unwrap();
        assert_eq!(ranges(&store), vec![(0, 300)]);
    }

    #[test]
    fn test_contained_report_is_absorbed() {
        let mut store = IntervalStore::new();
        store.resolve(0, 1000, true).unwrap();
        store.resolve(200, 300, true).unwrap();
        assert_eq!(ranges(&store), vec![(0, 1000)]);

        // And the reverse: a report swallowing existing intervals.
        store.resolve(2000, 2100, true).unwrap();
        store.resolve(3000, 3100, true).unwrap();
        store.resolve(1500, 3500, true).unwrap();
        assert_eq!(ranges(&store), vec![(0, 1000), (1500, 3500)]);
    }

    #[test]
    fn test_disjoint_reports_stay_disjoint() {
        let mut store = IntervalStore::new();
        store.resolve(300, 400, true).unwrap();
        store.resolve(0, 100, true).unwrap();
        store.resolve(600, 700, true).unwrap();

        assert_eq!(ranges(&store), vec![(0, 100), (300, 400), (600, 700)]);
        assert_disjoint_sorted(&store);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut store = IntervalStore::new();
        store.resolve(100, 200, true).unwrap();
        store.resolve(400, 500, true).unwrap();
        let before = ranges(&store);

        store.resolve(100, 200, true).unwrap();
        assert_eq!(ranges(&store), before);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let reports = [(100, 250), (200, 300), (500, 600), (50, 120), (590, 650)];
        let mut orderings = vec![reports.to_vec()];
        let mut reversed = reports.to_vec();
        reversed.reverse();
        orderings.push(reversed);
        let mut rotated = reports.to_vec();
        rotated.rotate_left(2);
        orderings.push(rotated);

        let mut results = Vec::new();
        for ordering in orderings {
            let mut store = IntervalStore::new();
            for (start, end) in ordering {
                store.resolve(start, end, true).unwrap();
            }
            assert_disjoint_sorted(&store);
            results.push(ranges(&store));
        }

        assert_eq!(results[0], vec![(50, 300), (500, 650)]);
        assert_eq!(results[0], results[1]);
        assert_eq!(results[0], results[2]);
    }

    #[test]
    fn test_span_widens_monotonically() {
        let mut store = IntervalStore::new();
        store.resolve(100, 200, false).unwrap();
        assert_eq!(store.observed_span(), Some((100, 200)));

        store.resolve(150, 180, true).unwrap();
        assert_eq!(store.observed_span(), Some((100, 200)));

        store.resolve(50, 300, false).unwrap();
        assert_eq!(store.observed_span(), Some((50, 300)));
    }

    #[test]
    fn test_down_reports_only_widen_span() {
        let mut store = IntervalStore::new();
        store.resolve(0, 100, true).unwrap();
        store.resolve(100, 400, false).unwrap();

        assert_eq!(ranges(&store), vec![(0, 100)]);
        assert_eq!(store.percent_uptime().unwrap(), 25);
    }

    #[test]
    fn test_percent_rounds_down() {
        let mut store = IntervalStore::new();
        store.resolve(0, 1, true).unwrap();
        store.resolve(1, 3, false).unwrap();
        // 1/3 of the span -> 33, not 34
        assert_eq!(store.percent_uptime().unwrap(), 33);
    }

    #[test]
    fn test_inverted_range_is_rejected_without_mutation() {
        let mut store = IntervalStore::new();
        store.resolve(0, 100, true).unwrap();

        let err = store.resolve(100, 50, true).unwrap_err();
        assert!(matches!(err, UptimeError::InvalidRange { start: 100, end: 50 }));

        assert_eq!(ranges(&store), vec![(0, 100)]);
        assert_eq!(store.observed_span(), Some((0, 100)));
    }

    #[test]
    fn test_empty_store_has_no_data() {
        let store = IntervalStore::new();
        assert!(matches!(store.percent_uptime(), Err(UptimeError::NoData)));
    }

    #[test]
    fn test_zero_width_span_is_degenerate() {
        let mut store = IntervalStore::new();
        store.resolve(500, 500, true).unwrap();
        assert!(matches!(
            store.percent_uptime(),
            Err(UptimeError::DegenerateSpan)
        ));
    }

    #[test]
    fn test_percent_stays_in_bounds() {
        let mut store = IntervalStore::new();
        store.resolve(0, 100, true).unwrap();
        store.resolve(20, 80, true).unwrap();
        store.resolve(0, 100, true).unwrap();

        let pct = store.percent_uptime().unwrap();
        assert!(pct <= 100);
        assert_eq!(pct, 100);
    }
}
