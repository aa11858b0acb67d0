use core::fmt;

use gridattr_model::{AttributeKind, AttributeValue, ValueType};
use thiserror::Error;

use crate::Interval;

/// Grid axis named by an [`StoreError::InvalidIndex`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Row => "row",
            Axis::Column => "column",
        })
    }
}

/// Errors returned by [`AttributeStore`](crate::AttributeStore) operations.
///
/// Every failing operation leaves the store untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{axis} {index} is out of bounds (grid has {len} {axis}s)")]
    InvalidIndex { axis: Axis, index: u32, len: u32 },
    #[error("invalid column range {start}..={end}")]
    InvalidRange { start: u32, end: u32 },
    #[error("structural edit count must be positive and keep the grid within u32 bounds")]
    InvalidCount,
    #[error("attribute {0} cannot be stored per cell")]
    UnsupportedKind(AttributeKind),
    #[error("attribute {kind} expects a {expected} value, got a {found} value")]
    TypeMismatch {
        kind: AttributeKind,
        expected: ValueType,
        found: ValueType,
    },
}

impl StoreError {
    pub(crate) fn row(index: u32, len: u32) -> Self {
        StoreError::InvalidIndex {
            axis: Axis::Row,
            index,
            len,
        }
    }

    pub(crate) fn column(index: u32, len: u32) -> Self {
        StoreError::InvalidIndex {
            axis: Axis::Column,
            index,
            len,
        }
    }

    /// `true` for coordinate errors (out-of-bounds rows/columns, bad ranges).
    #[must_use]
    pub fn is_invalid_index(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidIndex { .. } | StoreError::InvalidRange { .. }
        )
    }
}

/// A broken structural invariant.
///
/// These indicate a bug in the store itself, never bad input; they are
/// surfaced by [`AttributeStore::validate`](crate::AttributeStore::validate)
/// for assertions and tests.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("interval {start}..={end} is inverted")]
    InvertedInterval { start: u32, end: u32 },
    #[error("intervals {first:?} and {second:?} overlap or are out of order")]
    OverlappingIntervals { first: Interval, second: Interval },
    #[error("intervals {first:?} and {second:?} are adjacent but not merged")]
    AdjacentIntervals { first: Interval, second: Interval },
    #[error("{kind} at row {row}, column {col} is claimed by both {first} and {second}")]
    SharedCell {
        kind: AttributeKind,
        row: u32,
        col: u32,
        first: AttributeValue,
        second: AttributeValue,
    },
    #[error("{kind} stores a {found} value")]
    WrongValueType { kind: AttributeKind, found: ValueType },
    #[error("{kind} is virtual and must not be stored")]
    VirtualKindStored { kind: AttributeKind },
    #[error("{kind} bucket for {value} has no intervals")]
    EmptyBucket {
        kind: AttributeKind,
        value: AttributeValue,
    },
    #[error("{kind} bucket for {value} caches {cached} intervals but holds {actual}")]
    IntervalCountDrift {
        kind: AttributeKind,
        value: AttributeValue,
        cached: usize,
        actual: usize,
    },
    #[error("{kind} row {row} has coverage at column {col}, outside the grid")]
    OutOfGrid {
        kind: AttributeKind,
        row: u32,
        col: u32,
    },
}
