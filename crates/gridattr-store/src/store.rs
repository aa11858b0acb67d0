use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use gridattr_model::{AttributeKind, AttributeValue, CellRegion, Font, ValueTypeError};

use crate::{
    DefaultAttributes, Interval, InvariantViolation, StoreConfig, StoreError, StructuralEdit,
    ValueIndex,
};

/// Sparse per-cell attribute storage for a `rows` x `cols` grid.
///
/// Each attribute kind owns a [`ValueIndex`]; each value in it owns one
/// [`IntervalList`](crate::IntervalList) per row. A cell costs nothing until an
/// attribute is set on it, and a whole row (or any contiguous column run)
/// set to one value costs a single interval.
///
/// For any `(kind, row, col)` at most one value covers the cell: every write
/// clears the cell's current value before inserting the new one.
///
/// The store only answers for the cell level. Hosts layer row, column and
/// grid defaults on top by falling through when [`get`](Self::get) returns
/// `None`.
#[derive(Clone, Debug)]
pub struct AttributeStore {
    attrs: BTreeMap<AttributeKind, ValueIndex>,
    rows: u32,
    cols: u32,
    defaults: DefaultAttributes,
    config: StoreConfig,
}

/// One stored run, as yielded by [`AttributeStore::spans`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind: AttributeKind,
    pub value: &'a AttributeValue,
    pub row: u32,
    pub interval: Interval,
}

/// Kinds whose index holds nothing compare as absent, so stores built with
/// pruning off still equal their restored snapshots.
impl PartialEq for AttributeStore {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.defaults == other.defaults
            && self.config == other.config
            && self.live_indexes().eq(other.live_indexes())
    }
}

impl Eq for AttributeStore {}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl AttributeStore {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self::with_config(rows, cols, StoreConfig::default())
    }

    pub fn with_config(rows: u32, cols: u32, config: StoreConfig) -> Self {
        Self {
            attrs: BTreeMap::new(),
            rows,
            cols,
            defaults: DefaultAttributes::new(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Drops every cell attribute and adopts a new grid shape.
    ///
    /// Grid-wide defaults are kept.
    pub fn reinit(&mut self, rows: u32, cols: u32) {
        log::debug!(
            "reinitialising attribute store: {}x{} -> {rows}x{cols}, dropping {} intervals",
            self.rows,
            self.cols,
            self.interval_count()
        );
        self.attrs.clear();
        self.rows = rows;
        self.cols = cols;
    }

    pub fn defaults(&self) -> &DefaultAttributes {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut DefaultAttributes {
        &mut self.defaults
    }

    /// Grid-wide default of `kind` (virtual kinds read the default font).
    pub fn default_property(&self, kind: AttributeKind) -> Option<AttributeValue> {
        self.defaults.get(kind)
    }

    pub fn set_default_property(
        &mut self,
        kind: AttributeKind,
        value: AttributeValue,
    ) -> Result<(), StoreError> {
        self.defaults.set(kind, value)
    }

    /// The value of `kind` set on `(row, col)`.
    ///
    /// Virtual font kinds read the matching field of the cell's font; they
    /// are `None` when the cell has no font of its own.
    pub fn get(
        &self,
        row: u32,
        col: u32,
        kind: AttributeKind,
    ) -> Result<Option<AttributeValue>, StoreError> {
        check_kind(kind)?;
        self.check_cell(row, col)?;
        Ok(match kind.font_property() {
            Some(property) => self
                .cell_font(row, col)
                .map(|font| font.property(property)),
            None => self.cell_value(row, col, kind).cloned(),
        })
    }

    /// Borrowing lookup for the paint path.
    ///
    /// Only stored kinds resolve; virtual kinds and cells outside the grid
    /// yield `None`.
    pub fn cell_value(&self, row: u32, col: u32, kind: AttributeKind) -> Option<&AttributeValue> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.attrs.get(&kind)?.find(row, col)
    }

    fn cell_font(&self, row: u32, col: u32) -> Option<&Font> {
        self.cell_value(row, col, AttributeKind::Font)
            .and_then(AttributeValue::as_font)
    }

    /// Sets `kind` on `(row, col)` and returns the value it replaces.
    ///
    /// A `NoPen` border pen or a null pixmap clears the cell instead of
    /// being stored. A virtual font kind rewrites one field of the cell's
    /// font, starting from the default font when the cell has none.
    pub fn set(
        &mut self,
        row: u32,
        col: u32,
        kind: AttributeKind,
        value: AttributeValue,
    ) -> Result<Option<AttributeValue>, StoreError> {
        check_kind(kind)?;
        self.check_cell(row, col)?;
        check_value(kind, &value)?;

        let Some(property) = kind.font_property() else {
            return Ok(self.write_cell(row, col, kind, value));
        };
        let current = self.cell_font(row, col);
        let previous = current.map(|font| font.property(property));
        let mut font = current
            .cloned()
            .unwrap_or_else(|| self.base_font());
        font.apply(property, &value)
            .map_err(|err| type_error(kind, err))?;
        self.write_cell(row, col, AttributeKind::Font, AttributeValue::Font(font));
        Ok(previous)
    }

    /// `Some` sets, `None` clears.
    ///
    /// `None` for a virtual font kind drops the cell's whole font.
    pub fn set_or_clear(
        &mut self,
        row: u32,
        col: u32,
        kind: AttributeKind,
        value: Option<AttributeValue>,
    ) -> Result<(), StoreError> {
        match value {
            Some(value) => self.set(row, col, kind, value).map(|_| ()),
            None => self.clear(row, col, storage_kind(kind)).map(|_| ()),
        }
    }

    /// Clears `kind` on `(row, col)`. Returns whether anything was removed.
    ///
    /// A font field cannot be unset on its own, so clearing a virtual font
    /// kind changes nothing and returns `false`.
    pub fn clear(&mut self, row: u32, col: u32, kind: AttributeKind) -> Result<bool, StoreError> {
        self.take(row, col, kind).map(|removed| removed.is_some())
    }

    /// Clears `kind` on `(row, col)` and returns the removed value.
    pub fn take(
        &mut self,
        row: u32,
        col: u32,
        kind: AttributeKind,
    ) -> Result<Option<AttributeValue>, StoreError> {
        check_kind(kind)?;
        self.check_cell(row, col)?;
        if kind.is_virtual() {
            return Ok(None);
        }
        let Some(index) = self.attrs.get_mut(&kind) else {
            return Ok(None);
        };
        let removed = index.clear(row, col, self.config.prune_empty_buckets);
        self.tidy(kind);
        self.after_mutation();
        Ok(removed)
    }

    /// Sets `kind` on one row's column run, stored as a single interval.
    pub fn set_range(
        &mut self,
        row: u32,
        cols: RangeInclusive<u32>,
        kind: AttributeKind,
        value: AttributeValue,
    ) -> Result<(), StoreError> {
        check_kind(kind)?;
        let (start, end) = (*cols.start(), *cols.end());
        self.check_span(row, start, end)?;
        check_value(kind, &value)?;
        self.write_span(row, start, end, kind, &value)?;
        self.after_mutation();
        Ok(())
    }

    /// Clears `kind` on one row's column run. Returns whether anything was removed.
    ///
    /// Virtual font kinds are left alone, as in [`clear`](Self::clear).
    pub fn clear_range(
        &mut self,
        row: u32,
        cols: RangeInclusive<u32>,
        kind: AttributeKind,
    ) -> Result<bool, StoreError> {
        check_kind(kind)?;
        let (start, end) = (*cols.start(), *cols.end());
        self.check_span(row, start, end)?;
        if kind.is_virtual() {
            return Ok(false);
        }
        let removed = self.clear_span(row, start, end, kind);
        self.after_mutation();
        Ok(removed)
    }

    /// Sets `kind` on every cell of `region` (one interval per row).
    pub fn set_region(
        &mut self,
        region: CellRegion,
        kind: AttributeKind,
        value: AttributeValue,
    ) -> Result<(), StoreError> {
        check_kind(kind)?;
        self.check_region(region)?;
        check_value(kind, &value)?;
        for row in region.rows() {
            self.write_span(row, region.start.col, region.end.col, kind, &value)?;
        }
        self.after_mutation();
        Ok(())
    }

    /// Clears `kind` on every cell of `region`.
    pub fn clear_region(
        &mut self,
        region: CellRegion,
        kind: AttributeKind,
    ) -> Result<bool, StoreError> {
        check_kind(kind)?;
        self.check_region(region)?;
        if kind.is_virtual() {
            return Ok(false);
        }
        let mut removed = false;
        for row in region.rows() {
            removed |= self.clear_span(row, region.start.col, region.end.col, kind);
        }
        self.after_mutation();
        Ok(removed)
    }

    /// Inserts `num` empty rows before row `at`.
    pub fn insert_rows(&mut self, num: u32, at: u32) -> Result<(), StoreError> {
        self.apply_edit(StructuralEdit::InsertRows { at, count: num })
    }

    /// Deletes rows `at..at+num` and everything stored in them.
    pub fn delete_rows(&mut self, num: u32, at: u32) -> Result<(), StoreError> {
        self.apply_edit(StructuralEdit::DeleteRows { at, count: num })
    }

    /// Inserts `num` blank columns before column `at`, splitting any run
    /// that spans the insertion point.
    pub fn insert_columns(&mut self, num: u32, at: u32) -> Result<(), StoreError> {
        self.apply_edit(StructuralEdit::InsertColumns { at, count: num })
    }

    /// Deletes columns `at..at+num`, trimming and renumbering every run.
    pub fn delete_columns(&mut self, num: u32, at: u32) -> Result<(), StoreError> {
        self.apply_edit(StructuralEdit::DeleteColumns { at, count: num })
    }

    /// Applies a structural edit to every kind and value.
    ///
    /// The edit is checked against the grid shape first; a rejected edit
    /// changes nothing.
    pub fn apply_edit(&mut self, edit: StructuralEdit) -> Result<(), StoreError> {
        let (rows, cols) = edit.resize(self.rows, self.cols)?;
        let prune = self.config.prune_empty_buckets;
        let mut touched = 0;
        for index in self.attrs.values_mut() {
            touched += index.apply_edit(edit);
            if prune {
                index.prune_empty();
            }
        }
        if prune {
            self.attrs.retain(|_, index| index.value_count() > 0);
        }
        log::debug!(
            "applied {edit:?}: grid {}x{} -> {rows}x{cols}, {touched} intervals visited",
            self.rows,
            self.cols
        );
        self.rows = rows;
        self.cols = cols;
        self.after_mutation();
        Ok(())
    }

    /// Runs of `row` covered by `value` for `kind`.
    pub fn intervals(&self, row: u32, kind: AttributeKind, value: &AttributeValue) -> &[Interval] {
        self.attrs
            .get(&kind)
            .map(|index| index.intervals(row, value))
            .unwrap_or(&[])
    }

    /// Distinct values currently stored for `kind`.
    pub fn values(&self, kind: AttributeKind) -> impl Iterator<Item = &AttributeValue> + '_ {
        self.attrs
            .get(&kind)
            .into_iter()
            .flat_map(|index| index.live_buckets().map(|(value, _)| value))
    }

    pub fn value_index(&self, kind: AttributeKind) -> Option<&ValueIndex> {
        self.attrs.get(&kind)
    }

    /// Kinds with at least one stored interval.
    pub fn kinds(&self) -> impl Iterator<Item = AttributeKind> + '_ {
        self.live_indexes().map(|(kind, _)| kind)
    }

    fn live_indexes(&self) -> impl Iterator<Item = (AttributeKind, &ValueIndex)> + '_ {
        self.attrs
            .iter()
            .filter(|(_, index)| !index.is_empty())
            .map(|(kind, index)| (*kind, index))
    }

    /// Total number of stored intervals.
    pub fn interval_count(&self) -> usize {
        self.attrs.values().map(ValueIndex::interval_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.values().all(ValueIndex::is_empty)
    }

    /// Every stored `(kind, value, row, interval)`.
    ///
    /// Re-applying the spans with [`set_range`](Self::set_range), in any
    /// order, rebuilds an equivalent store.
    pub fn spans(&self) -> impl Iterator<Item = Span<'_>> + '_ {
        self.attrs.iter().flat_map(|(kind, index)| {
            let kind = *kind;
            index.buckets().flat_map(move |(value, rows)| {
                rows.covered_rows().flat_map(move |(row, list)| {
                    list.iter().map(move |interval| Span {
                        kind,
                        value,
                        row,
                        interval: *interval,
                    })
                })
            })
        })
    }

    /// Checks the compression and exclusivity invariants of every kind.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for (kind, index) in &self.attrs {
            index.validate(*kind, self.rows, self.cols, self.config.prune_empty_buckets)?;
        }
        Ok(())
    }

    fn after_mutation(&self) {
        if cfg!(debug_assertions) && self.config.validate_after_edits {
            let result = self.validate();
            debug_assert!(
                result.is_ok(),
                "attribute store invariant violated: {result:?}"
            );
        }
    }

    fn base_font(&self) -> Font {
        self.defaults.font().cloned().unwrap_or_default()
    }

    /// Replaces whatever `kind` holds at `(row, col)` with `value`.
    fn write_cell(
        &mut self,
        row: u32,
        col: u32,
        kind: AttributeKind,
        value: AttributeValue,
    ) -> Option<AttributeValue> {
        let prune = self.config.prune_empty_buckets;
        let growth = self.config.row_growth_chunk;
        let index = self.attrs.entry(kind).or_default();
        if let Some(stored) = index.find(row, col).filter(|stored| **stored == value) {
            return Some(stored.clone());
        }
        let previous = index.clear(row, col, prune);
        if !value.is_clearing() {
            index.set(row, col, value, growth);
        }
        self.tidy(kind);
        self.after_mutation();
        previous
    }

    /// Writes `value` over `row`, `start..=end`. Arguments are already checked.
    fn write_span(
        &mut self,
        row: u32,
        start: u32,
        end: u32,
        kind: AttributeKind,
        value: &AttributeValue,
    ) -> Result<(), StoreError> {
        let Some(property) = kind.font_property() else {
            self.replace_span(row, start, end, kind, value.clone());
            return Ok(());
        };

        // Each run keeps its own font with one field rewritten.
        let segments = match self.attrs.get(&AttributeKind::Font) {
            Some(index) => index.segments(row, start, end),
            None => vec![(Interval::new(start, end), None)],
        };
        let base = self.base_font();
        let mut fonts = Vec::with_capacity(segments.len());
        for (span, current) in segments {
            let mut font = match current {
                Some(AttributeValue::Font(font)) => font,
                _ => base.clone(),
            };
            font.apply(property, value)
                .map_err(|err| type_error(kind, err))?;
            fonts.push((span, font));
        }
        for (span, font) in fonts {
            self.replace_span(
                row,
                span.start,
                span.end,
                AttributeKind::Font,
                AttributeValue::Font(font),
            );
        }
        Ok(())
    }

    fn replace_span(
        &mut self,
        row: u32,
        start: u32,
        end: u32,
        kind: AttributeKind,
        value: AttributeValue,
    ) {
        let prune = self.config.prune_empty_buckets;
        let growth = self.config.row_growth_chunk;
        let index = self.attrs.entry(kind).or_default();
        index.clear_range(row, start, end, prune);
        if !value.is_clearing() {
            index.set_range(row, start, end, value, growth);
        }
        self.tidy(kind);
    }

    fn clear_span(&mut self, row: u32, start: u32, end: u32, kind: AttributeKind) -> bool {
        let prune = self.config.prune_empty_buckets;
        let Some(index) = self.attrs.get_mut(&kind) else {
            return false;
        };
        let removed = index.clear_range(row, start, end, prune);
        self.tidy(kind);
        removed
    }

    /// Forgets `kind`'s index once it holds no value at all.
    fn tidy(&mut self, kind: AttributeKind) {
        if self.config.prune_empty_buckets
            && self
                .attrs
                .get(&kind)
                .is_some_and(|index| index.value_count() == 0)
        {
            self.attrs.remove(&kind);
        }
    }

    fn check_cell(&self, row: u32, col: u32) -> Result<(), StoreError> {
        if row >= self.rows {
            return Err(StoreError::row(row, self.rows));
        }
        if col >= self.cols {
            return Err(StoreError::column(col, self.cols));
        }
        Ok(())
    }

    fn check_span(&self, row: u32, start: u32, end: u32) -> Result<(), StoreError> {
        if start > end {
            return Err(StoreError::InvalidRange { start, end });
        }
        self.check_cell(row, end)
    }

    fn check_region(&self, region: CellRegion) -> Result<(), StoreError> {
        self.check_cell(region.end.row, region.end.col)
    }
}

/// The kind whose index actually holds `kind`'s data.
fn storage_kind(kind: AttributeKind) -> AttributeKind {
    if kind.is_virtual() {
        AttributeKind::Font
    } else {
        kind
    }
}

fn check_kind(kind: AttributeKind) -> Result<(), StoreError> {
    if kind.is_cell_attribute() {
        Ok(())
    } else {
        Err(StoreError::UnsupportedKind(kind))
    }
}

fn check_value(kind: AttributeKind, value: &AttributeValue) -> Result<(), StoreError> {
    let expected = kind.value_type();
    let found = value.value_type();
    if expected == found {
        Ok(())
    } else {
        Err(StoreError::TypeMismatch {
            kind,
            expected,
            found,
        })
    }
}

fn type_error(kind: AttributeKind, err: ValueTypeError) -> StoreError {
    StoreError::TypeMismatch {
        kind,
        expected: err.expected,
        found: err.found,
    }
}
