use serde::{Deserialize, Serialize};

use crate::InvariantViolation;

/// An inclusive run of columns, `start <= end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn single(col: u32) -> Self {
        Self {
            start: col,
            end: col,
        }
    }

    #[inline]
    pub const fn contains(&self, col: u32) -> bool {
        self.start <= col && col <= self.end
    }

    /// Number of columns covered.
    #[inline]
    pub const fn len(&self) -> u64 {
        (self.end - self.start) as u64 + 1
    }

    /// `true` when `other` starts right after `self` ends.
    #[inline]
    const fn touches(&self, other: &Interval) -> bool {
        self.end < u32::MAX && self.end + 1 == other.start
    }
}

/// Column coverage of one row by one value of one attribute kind.
///
/// Intervals are kept sorted by `start`, pairwise disjoint and never adjacent:
/// two runs that would touch are always merged into one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalList {
    intervals: Vec<Interval>,
}

impl IntervalList {
    pub const fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> + '_ {
        self.intervals.iter()
    }

    /// Total number of columns covered.
    pub fn covered_columns(&self) -> u64 {
        self.intervals.iter().map(Interval::len).sum()
    }

    /// Index of the interval containing `col`, if any.
    pub fn contains_and_locate(&self, col: u32) -> Option<usize> {
        let idx = self.intervals.partition_point(|r| r.end < col);
        match self.intervals.get(idx) {
            Some(r) if r.start <= col => Some(idx),
            _ => None,
        }
    }

    #[inline]
    pub fn contains(&self, col: u32) -> bool {
        self.contains_and_locate(col).is_some()
    }

    /// Covers `col`. Returns `false` if it was already covered.
    pub fn insert(&mut self, col: u32) -> bool {
        // First interval that ends at or after `col`.
        let idx = self.intervals.partition_point(|r| r.end < col);
        if let Some(r) = self.intervals.get(idx) {
            if r.start <= col {
                return false;
            }
        }

        let joins_prev = idx > 0 && self.intervals[idx - 1].end + 1 == col;
        let joins_next = self
            .intervals
            .get(idx)
            .is_some_and(|next| col < u32::MAX && next.start == col + 1);

        match (joins_prev, joins_next) {
            (true, true) => {
                let next = self.intervals.remove(idx);
                self.intervals[idx - 1].end = next.end;
            }
            (true, false) => self.intervals[idx - 1].end = col,
            (false, true) => self.intervals[idx].start = col,
            (false, false) => self.intervals.insert(idx, Interval::single(col)),
        }
        true
    }

    /// Uncovers `col`. Returns `false` if it was not covered.
    pub fn remove(&mut self, col: u32) -> bool {
        let Some(idx) = self.contains_and_locate(col) else {
            return false;
        };
        let r = self.intervals[idx];
        if r.start == col && r.end == col {
            self.intervals.remove(idx);
        } else if r.start == col {
            self.intervals[idx].start = col + 1;
        } else if r.end == col {
            self.intervals[idx].end = col - 1;
        } else {
            self.intervals[idx].end = col - 1;
            self.intervals
                .insert(idx + 1, Interval::new(col + 1, r.end));
        }
        true
    }

    /// Covers every column of `start..=end`, merging with overlapping or
    /// adjacent runs. Returns `false` if the range was already fully covered.
    pub fn insert_range(&mut self, start: u32, end: u32) -> bool {
        debug_assert!(start <= end, "inverted range {start}..={end}");
        // Runs that overlap or touch the new range form the slice `lo..hi`.
        let lo = self
            .intervals
            .partition_point(|r| r.end.saturating_add(1) < start);
        let hi = self
            .intervals
            .partition_point(|r| r.start <= end.saturating_add(1));

        if lo < hi {
            let first = self.intervals[lo];
            if hi - lo == 1 && first.start <= start && end <= first.end {
                return false;
            }
            let merged = Interval::new(
                first.start.min(start),
                self.intervals[hi - 1].end.max(end),
            );
            self.intervals.splice(lo..hi, [merged]);
        } else {
            self.intervals.insert(lo, Interval::new(start, end));
        }
        true
    }

    /// Uncovers every column of `start..=end`. Returns `false` if nothing was
    /// covered there.
    pub fn remove_range(&mut self, start: u32, end: u32) -> bool {
        debug_assert!(start <= end, "inverted range {start}..={end}");
        let lo = self.intervals.partition_point(|r| r.end < start);
        let hi = self.intervals.partition_point(|r| r.start <= end);
        if lo >= hi {
            return false;
        }

        let first = self.intervals[lo];
        let last = self.intervals[hi - 1];
        let mut keep = Vec::with_capacity(2);
        if first.start < start {
            keep.push(Interval::new(first.start, start - 1));
        }
        if last.end > end {
            keep.push(Interval::new(end + 1, last.end));
        }
        self.intervals.splice(lo..hi, keep);
        true
    }

    /// Adds `delta` to both ends of every interval with `start >= threshold`.
    ///
    /// The caller guarantees that shifted runs stay non-negative and do not
    /// collide with the untouched runs below `threshold`.
    pub fn shift_from(&mut self, threshold: u32, delta: i64) {
        let from = self.intervals.partition_point(|r| r.start < threshold);
        for r in &mut self.intervals[from..] {
            r.start = offset(r.start, delta);
            r.end = offset(r.end, delta);
        }
    }

    /// Applies the insertion of `num` blank columns before column `at`.
    ///
    /// | interval position          | result                                 |
    /// |----------------------------|----------------------------------------|
    /// | `end < at` (before)        | untouched                              |
    /// | `start >= at` (at/after)   | shifted by `+num`                      |
    /// | `start < at <= end` (over) | `[start, at-1]` and `[at+num, end+num]` |
    pub fn split_at_insertion(&mut self, at: u32, num: u32) {
        if num == 0 {
            return;
        }
        let first = self.intervals.partition_point(|r| r.end < at);
        if first == self.intervals.len() {
            return;
        }

        let mut out = Vec::with_capacity(self.intervals.len() + 1);
        out.extend_from_slice(&self.intervals[..first]);
        for r in &self.intervals[first..] {
            if r.start >= at {
                out.push(Interval::new(
                    r.start.saturating_add(num),
                    r.end.saturating_add(num),
                ));
            } else {
                out.push(Interval::new(r.start, at - 1));
                out.push(Interval::new(at.saturating_add(num), r.end.saturating_add(num)));
            }
        }
        self.intervals = out;
    }

    /// Applies the deletion of columns `at..at+num`.
    ///
    /// Runs inside the deleted block vanish, runs straddling an edge are
    /// trimmed, runs past the block move left by `num`. Runs that end up
    /// touching across the closed gap are merged.
    pub fn contract_at_deletion(&mut self, at: u32, num: u32) {
        if num == 0 {
            return;
        }
        let first = self.intervals.partition_point(|r| r.end < at);
        if first == self.intervals.len() {
            return;
        }

        let del_end = at.saturating_add(num - 1);
        let resume = del_end.saturating_add(1);
        let shift = |v: u32| if v >= resume { v - num } else { v };

        let mut out: Vec<Interval> = Vec::with_capacity(self.intervals.len());
        out.extend_from_slice(&self.intervals[..first]);
        for r in &self.intervals[first..] {
            if r.start >= at && r.end <= del_end {
                continue;
            }
            let start = if r.start >= at && r.start <= del_end {
                resume
            } else {
                r.start
            };
            let end = if r.end >= at && r.end <= del_end {
                at - 1
            } else {
                r.end
            };
            push_merged(&mut out, Interval::new(shift(start), shift(end)));
        }
        self.intervals = out;
    }

    /// Checks ordering, disjointness and the no-adjacency rule.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for (i, r) in self.intervals.iter().enumerate() {
            if r.start > r.end {
                return Err(InvariantViolation::InvertedInterval {
                    start: r.start,
                    end: r.end,
                });
            }
            if let Some(next) = self.intervals.get(i + 1) {
                if next.start <= r.end {
                    return Err(InvariantViolation::OverlappingIntervals {
                        first: *r,
                        second: *next,
                    });
                }
                if r.touches(next) {
                    return Err(InvariantViolation::AdjacentIntervals {
                        first: *r,
                        second: *next,
                    });
                }
            }
        }
        Ok(())
    }
}

impl FromIterator<Interval> for IntervalList {
    /// Builds a list from arbitrary (possibly overlapping, unsorted) runs.
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        let mut list = IntervalList::new();
        for r in iter {
            list.insert_range(r.start, r.end);
        }
        list
    }
}

fn push_merged(out: &mut Vec<Interval>, next: Interval) {
    if let Some(last) = out.last_mut() {
        if last.touches(&next) || next.start <= last.end {
            last.end = last.end.max(next.end);
            return;
        }
    }
    out.push(next);
}

fn offset(v: u32, delta: i64) -> u32 {
    let shifted = i64::from(v) + delta;
    debug_assert!(
        (0..=i64::from(u32::MAX)).contains(&shifted),
        "column shift out of range: {v} + {delta}"
    );
    shifted.clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn list(runs: &[(u32, u32)]) -> IntervalList {
        IntervalList {
            intervals: runs.iter().map(|&(s, e)| Interval::new(s, e)).collect(),
        }
    }

    fn runs(list: &IntervalList) -> Vec<(u32, u32)> {
        list.iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn insert_into_empty_creates_singleton() {
        let mut l = IntervalList::new();
        assert!(l.insert(4));
        assert_eq!(runs(&l), vec![(4, 4)]);
        assert!(!l.insert(4));
    }

    #[test]
    fn insert_extends_and_bridges() {
        let mut l = list(&[(2, 3), (6, 8)]);
        assert!(l.insert(4));
        assert_eq!(runs(&l), vec![(2, 4), (6, 8)]);
        assert!(l.insert(5));
        assert_eq!(runs(&l), vec![(2, 8)]);
        assert!(l.insert(1));
        assert_eq!(runs(&l), vec![(1, 8)]);
        assert!(l.insert(0));
        assert!(l.insert(20));
        assert!(l.insert(12));
        assert_eq!(runs(&l), vec![(0, 8), (12, 12), (20, 20)]);
        l.validate().unwrap();
    }

    #[test]
    fn insert_at_column_max_does_not_overflow() {
        let mut l = list(&[(u32::MAX - 2, u32::MAX - 1)]);
        assert!(l.insert(u32::MAX));
        assert_eq!(runs(&l), vec![(u32::MAX - 2, u32::MAX)]);
    }

    #[test]
    fn locate_finds_containing_interval() {
        let l = list(&[(0, 2), (5, 9), (12, 12)]);
        assert_eq!(l.contains_and_locate(0), Some(0));
        assert_eq!(l.contains_and_locate(7), Some(1));
        assert_eq!(l.contains_and_locate(12), Some(2));
        assert_eq!(l.contains_and_locate(3), None);
        assert_eq!(l.contains_and_locate(13), None);
    }

    #[test]
    fn remove_covers_all_four_cases() {
        let mut l = list(&[(3, 3), (5, 10)]);
        assert!(l.remove(3));
        assert_eq!(runs(&l), vec![(5, 10)]);
        assert!(l.remove(5));
        assert_eq!(runs(&l), vec![(6, 10)]);
        assert!(l.remove(10));
        assert_eq!(runs(&l), vec![(6, 9)]);
        assert!(l.remove(7));
        assert_eq!(runs(&l), vec![(6, 6), (8, 9)]);
        assert!(!l.remove(7));
        l.validate().unwrap();
    }

    #[test]
    fn insert_range_merges_overlapping_and_adjacent_runs() {
        let mut l = list(&[(0, 1), (4, 5), (9, 9), (20, 22)]);
        assert!(l.insert_range(2, 8));
        assert_eq!(runs(&l), vec![(0, 9), (20, 22)]);
        assert!(!l.insert_range(20, 21));
        assert!(l.insert_range(15, 16));
        assert_eq!(runs(&l), vec![(0, 9), (15, 16), (20, 22)]);
        l.validate().unwrap();
    }

    #[test]
    fn remove_range_trims_edges() {
        let mut l = list(&[(0, 4), (6, 8), (10, 15)]);
        assert!(l.remove_range(3, 11));
        assert_eq!(runs(&l), vec![(0, 2), (12, 15)]);
        assert!(!l.remove_range(5, 10));
        assert!(l.remove_range(13, 13));
        assert_eq!(runs(&l), vec![(0, 2), (12, 12), (14, 15)]);
    }

    #[test]
    fn shift_from_moves_runs_at_or_after_threshold() {
        let mut l = list(&[(0, 1), (5, 6), (9, 9)]);
        l.shift_from(5, 3);
        assert_eq!(runs(&l), vec![(0, 1), (8, 9), (12, 12)]);
        l.shift_from(8, -2);
        assert_eq!(runs(&l), vec![(0, 1), (6, 7), (10, 10)]);
    }

    #[test]
    fn insertion_boundary_cases() {
        // (insertion point, expected runs) for the run [5, 10] and 3 new columns.
        let cases: &[(u32, &[(u32, u32)])] = &[
            (2, &[(8, 13)]),           // before the run
            (5, &[(8, 13)]),           // at its start
            (7, &[(5, 6), (10, 13)]),  // inside
            (10, &[(5, 9), (13, 13)]), // at its end
            (11, &[(5, 10)]),          // just after
        ];
        for (at, expected) in cases {
            let mut l = list(&[(5, 10)]);
            l.split_at_insertion(*at, 3);
            assert_eq!(runs(&l), expected.to_vec(), "insert at {at}");
            l.validate().unwrap();
        }
    }

    #[test]
    fn deletion_boundary_cases() {
        // (at, num, expected runs) for the run [5, 10].
        let cases: &[(u32, u32, &[(u32, u32)])] = &[
            (0, 2, &[(3, 8)]),   // entirely before the run
            (3, 4, &[(3, 6)]),   // straddles the left edge
            (5, 6, &[]),         // exactly the run
            (4, 8, &[]),         // swallows the run
            (6, 2, &[(5, 8)]),   // strictly inside
            (8, 5, &[(5, 7)]),   // straddles the right edge
            (11, 3, &[(5, 10)]), // after the run
        ];
        for (at, num, expected) in cases {
            let mut l = list(&[(5, 10)]);
            l.contract_at_deletion(*at, *num);
            assert_eq!(runs(&l), expected.to_vec(), "delete {num} at {at}");
        }
    }

    #[test]
    fn deletion_merges_runs_across_the_closed_gap() {
        let mut l = list(&[(0, 2), (6, 8), (12, 14)]);
        l.contract_at_deletion(3, 3);
        assert_eq!(runs(&l), vec![(0, 5), (9, 11)]);
        l.validate().unwrap();
    }

    #[test]
    fn insert_then_delete_restores_layout() {
        let original = list(&[(0, 0), (2, 4), (7, 12), (30, 31)]);
        for at in 0..35 {
            for num in 1..5 {
                let mut l = original.clone();
                l.split_at_insertion(at, num);
                l.validate().unwrap();
                l.contract_at_deletion(at, num);
                assert_eq!(l, original, "insert/delete {num} at {at}");
            }
        }
    }

    #[test]
    fn validate_reports_adjacency() {
        let l = list(&[(0, 2), (3, 4)]);
        assert_eq!(
            l.validate(),
            Err(InvariantViolation::AdjacentIntervals {
                first: Interval::new(0, 2),
                second: Interval::new(3, 4),
            })
        );
        assert!(matches!(
            list(&[(0, 5), (4, 6)]).validate(),
            Err(InvariantViolation::OverlappingIntervals { .. })
        ));
    }
}
