use std::collections::BTreeMap;

use gridattr_model::{AttributeKind, AttributeValue};

use crate::{Interval, IntervalList, InvariantViolation};

/// Row-indexed interval lists for one value of one attribute kind.
///
/// Rows are allocated lazily; rows past the end (or empty lists inside it)
/// simply have no coverage. Equality ignores how many rows are allocated.
#[derive(Clone, Debug, Default)]
pub struct RowArray {
    rows: Vec<IntervalList>,
    intervals: usize,
}

impl RowArray {
    /// Number of allocated row slots (covered or not).
    pub fn allocated_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: u32) -> Option<&IntervalList> {
        self.rows.get(row as usize)
    }

    /// Total number of intervals across all rows.
    pub fn interval_count(&self) -> usize {
        self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals == 0
    }

    /// Rows holding at least one interval.
    pub fn covered_rows(&self) -> impl Iterator<Item = (u32, &IntervalList)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, list)| !list.is_empty())
            .map(|(row, list)| (row as u32, list))
    }

    /// Runs `f` on `row`, allocating it (plus `growth` slack rows) first.
    pub(crate) fn update_row<R>(
        &mut self,
        row: u32,
        growth: u32,
        f: impl FnOnce(&mut IntervalList) -> R,
    ) -> R {
        let idx = row as usize;
        if self.rows.len() <= idx {
            self.rows
                .resize_with(idx + 1 + growth as usize, IntervalList::new);
        }
        let list = &mut self.rows[idx];
        let before = list.len();
        let out = f(list);
        let after = list.len();
        self.intervals = self.intervals - before + after;
        out
    }

    /// Runs `f` on `row` if it is allocated.
    pub(crate) fn update_existing<R>(
        &mut self,
        row: u32,
        f: impl FnOnce(&mut IntervalList) -> R,
    ) -> Option<R> {
        let list = self.rows.get_mut(row as usize)?;
        let before = list.len();
        let out = f(list);
        let after = list.len();
        self.intervals = self.intervals - before + after;
        Some(out)
    }

    /// Runs `f` on every allocated row.
    pub(crate) fn update_all(&mut self, mut f: impl FnMut(&mut IntervalList)) {
        let mut count = 0;
        for list in &mut self.rows {
            if !list.is_empty() {
                f(list);
            }
            count += list.len();
        }
        self.intervals = count;
    }

    pub(crate) fn insert_rows(&mut self, at: u32, num: u32) {
        let at = at as usize;
        if at >= self.rows.len() {
            return;
        }
        self.rows.splice(
            at..at,
            std::iter::repeat_with(IntervalList::new).take(num as usize),
        );
    }

    pub(crate) fn delete_rows(&mut self, at: u32, num: u32) {
        let at = at as usize;
        if at >= self.rows.len() {
            return;
        }
        let end = at.saturating_add(num as usize).min(self.rows.len());
        let removed: usize = self.rows.drain(at..end).map(|list| list.len()).sum();
        self.intervals -= removed;
    }

    fn recount(&self) -> usize {
        self.rows.iter().map(IntervalList::len).sum()
    }
}

impl PartialEq for RowArray {
    fn eq(&self, other: &Self) -> bool {
        self.intervals == other.intervals && self.covered_rows().eq(other.covered_rows())
    }
}

impl Eq for RowArray {}

/// All stored values of one attribute kind, each with its own rows of
/// interval lists.
///
/// Equality ignores buckets left empty when pruning is off.
#[derive(Clone, Debug, Default)]
pub struct ValueIndex {
    buckets: BTreeMap<AttributeValue, RowArray>,
}

impl PartialEq for ValueIndex {
    fn eq(&self, other: &Self) -> bool {
        self.live_buckets().eq(other.live_buckets())
    }
}

impl Eq for ValueIndex {}

impl ValueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(RowArray::is_empty)
    }

    /// Number of distinct values with a bucket.
    pub fn value_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn interval_count(&self) -> usize {
        self.buckets.values().map(RowArray::interval_count).sum()
    }

    pub fn values(&self) -> impl Iterator<Item = &AttributeValue> + '_ {
        self.buckets.keys()
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&AttributeValue, &RowArray)> + '_ {
        self.buckets.iter()
    }

    /// Buckets holding at least one interval.
    pub fn live_buckets(&self) -> impl Iterator<Item = (&AttributeValue, &RowArray)> + '_ {
        self.buckets.iter().filter(|(_, rows)| !rows.is_empty())
    }

    pub fn bucket(&self, value: &AttributeValue) -> Option<&RowArray> {
        self.buckets.get(value)
    }

    /// Intervals of `row` covered by `value`.
    pub fn intervals(&self, row: u32, value: &AttributeValue) -> &[Interval] {
        self.buckets
            .get(value)
            .and_then(|rows| rows.row(row))
            .map(IntervalList::as_slice)
            .unwrap_or(&[])
    }

    /// The value covering `(row, col)`, if any.
    pub fn find(&self, row: u32, col: u32) -> Option<&AttributeValue> {
        self.buckets.iter().find_map(|(value, rows)| {
            rows.row(row)
                .is_some_and(|list| list.contains(col))
                .then_some(value)
        })
    }

    /// Adds `(row, col)` to `value`'s coverage.
    ///
    /// Does not touch other values; callers clear the cell first.
    pub fn set(&mut self, row: u32, col: u32, value: AttributeValue, growth: u32) -> bool {
        self.buckets
            .entry(value)
            .or_default()
            .update_row(row, growth, |list| list.insert(col))
    }

    /// Adds `row`, `start..=end` to `value`'s coverage. Callers clear first.
    pub fn set_range(
        &mut self,
        row: u32,
        start: u32,
        end: u32,
        value: AttributeValue,
        growth: u32,
    ) -> bool {
        self.buckets
            .entry(value)
            .or_default()
            .update_row(row, growth, |list| list.insert_range(start, end))
    }

    /// Removes whatever value covers `(row, col)` and returns it.
    pub fn clear(&mut self, row: u32, col: u32, prune: bool) -> Option<AttributeValue> {
        let mut hit = None;
        for (value, rows) in self.buckets.iter_mut() {
            if rows.update_existing(row, |list| list.remove(col)) == Some(true) {
                hit = Some((value.clone(), rows.is_empty()));
                break;
            }
        }

        let (value, emptied) = hit?;
        if prune && emptied {
            log::trace!("pruning empty bucket for {value}");
            self.buckets.remove(&value);
        }
        Some(value)
    }

    /// Removes every value's coverage of `row`, `start..=end`.
    pub fn clear_range(&mut self, row: u32, start: u32, end: u32, prune: bool) -> bool {
        let mut changed = false;
        for rows in self.buckets.values_mut() {
            changed |= rows
                .update_existing(row, |list| list.remove_range(start, end))
                .unwrap_or(false);
        }
        if changed && prune {
            self.prune_empty();
        }
        changed
    }

    /// Splits `row`, `start..=end` into consecutive runs, each either covered
    /// by one value or uncovered.
    pub fn segments(
        &self,
        row: u32,
        start: u32,
        end: u32,
    ) -> Vec<(Interval, Option<AttributeValue>)> {
        let mut covered: Vec<(Interval, &AttributeValue)> = Vec::new();
        for (value, rows) in &self.buckets {
            let Some(list) = rows.row(row) else {
                continue;
            };
            for r in list.iter() {
                if r.end < start || r.start > end {
                    continue;
                }
                covered.push((Interval::new(r.start.max(start), r.end.min(end)), value));
            }
        }
        covered.sort_by_key(|(r, _)| r.start);

        let mut out = Vec::with_capacity(covered.len() * 2 + 1);
        let mut next = Some(start);
        for (r, value) in covered {
            let Some(cursor) = next else {
                break;
            };
            if r.start > cursor {
                out.push((Interval::new(cursor, r.start - 1), None));
            }
            out.push((r, Some(value.clone())));
            next = r.end.checked_add(1).filter(|c| *c <= end);
        }
        if let Some(cursor) = next {
            out.push((Interval::new(cursor, end), None));
        }
        out
    }

    /// Drops buckets with no intervals; returns how many were dropped.
    pub(crate) fn prune_empty(&mut self) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|value, rows| {
            let keep = !rows.is_empty();
            if !keep {
                log::trace!("pruning empty bucket for {value}");
            }
            keep
        });
        before - self.buckets.len()
    }

    pub(crate) fn for_each_row_array(&mut self, mut f: impl FnMut(&mut RowArray)) {
        for rows in self.buckets.values_mut() {
            f(rows);
        }
    }

    /// Checks every invariant of this kind's index against a `rows` x `cols` grid.
    pub(crate) fn validate(
        &self,
        kind: AttributeKind,
        rows: u32,
        cols: u32,
        pruned: bool,
    ) -> Result<(), InvariantViolation> {
        if kind.is_virtual() && !self.buckets.is_empty() {
            return Err(InvariantViolation::VirtualKindStored { kind });
        }

        let mut max_rows = 0;
        for (value, row_array) in &self.buckets {
            if value.value_type() != kind.value_type() {
                return Err(InvariantViolation::WrongValueType {
                    kind,
                    found: value.value_type(),
                });
            }
            let actual = row_array.recount();
            if actual != row_array.interval_count() {
                return Err(InvariantViolation::IntervalCountDrift {
                    kind,
                    value: value.clone(),
                    cached: row_array.interval_count(),
                    actual,
                });
            }
            if pruned && actual == 0 {
                return Err(InvariantViolation::EmptyBucket {
                    kind,
                    value: value.clone(),
                });
            }
            for (row, list) in row_array.covered_rows() {
                list.validate()?;
                let (Some(first), Some(last)) = (list.as_slice().first(), list.as_slice().last())
                else {
                    continue;
                };
                if row >= rows {
                    return Err(InvariantViolation::OutOfGrid {
                        kind,
                        row,
                        col: first.start,
                    });
                }
                if last.end >= cols {
                    return Err(InvariantViolation::OutOfGrid {
                        kind,
                        row,
                        col: last.end,
                    });
                }
            }
            max_rows = max_rows.max(row_array.allocated_rows());
        }

        // At most one value may claim any cell.
        let mut claims: Vec<(Interval, &AttributeValue)> = Vec::new();
        for row in 0..max_rows as u32 {
            claims.clear();
            for (value, row_array) in &self.buckets {
                if let Some(list) = row_array.row(row) {
                    claims.extend(list.iter().map(|r| (*r, value)));
                }
            }
            claims.sort_by_key(|(r, _)| r.start);
            for pair in claims.windows(2) {
                let (a, va) = pair[0];
                let (b, vb) = pair[1];
                if b.start <= a.end {
                    return Err(InvariantViolation::SharedCell {
                        kind,
                        row,
                        col: b.start,
                        first: va.clone(),
                        second: vb.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
