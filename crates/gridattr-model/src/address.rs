use core::fmt;
use core::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// A single cell within the grid.
///
/// Rows and columns are **0-indexed**.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// 0-indexed row.
    pub row: u32,
    /// 0-indexed column.
    pub col: u32,
}

impl CellRef {
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}C{}", self.row, self.col)
    }
}

/// A rectangular block of cells.
///
/// The region is inclusive and always normalized such that:
/// - `start.row <= end.row`
/// - `start.col <= end.col`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRegion {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRegion {
    /// Construct a new region, normalizing coordinates if needed.
    pub const fn new(a: CellRef, b: CellRef) -> Self {
        let start_row = if a.row <= b.row { a.row } else { b.row };
        let end_row = if a.row <= b.row { b.row } else { a.row };
        let start_col = if a.col <= b.col { a.col } else { b.col };
        let end_col = if a.col <= b.col { b.col } else { a.col };
        Self {
            start: CellRef::new(start_row, start_col),
            end: CellRef::new(end_row, end_col),
        }
    }

    /// The single-cell region.
    pub const fn cell(cell: CellRef) -> Self {
        Self {
            start: cell,
            end: cell,
        }
    }

    /// Every column of one row, `0..cols`. `cols` must be non-zero.
    pub const fn row_span(row: u32, cols: u32) -> Self {
        Self::new(CellRef::new(row, 0), CellRef::new(row, cols.saturating_sub(1)))
    }

    pub fn rows(&self) -> RangeInclusive<u32> {
        self.start.row..=self.end.row
    }

    pub fn cols(&self) -> RangeInclusive<u32> {
        self.start.col..=self.end.col
    }

    #[must_use]
    pub fn contains(&self, cell: CellRef) -> bool {
        self.rows().contains(&cell.row) && self.cols().contains(&cell.col)
    }

    /// Number of cells covered, saturating at `u64::MAX`.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        let rows = u64::from(self.end.row - self.start.row) + 1;
        let cols = u64::from(self.end.col - self.start.col) + 1;
        rows.saturating_mul(cols)
    }
}

impl fmt::Display for CellRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
