//! `gridattr-store` is a sparse, run-length compressed store for per-cell
//! grid attributes.
//!
//! Attributes are overwhelmingly set on whole rows, whole columns or
//! contiguous column runs, so instead of a slot per cell the store keeps, for
//! every `(kind, value, row)`, a sorted list of inclusive column intervals:
//!
//! ```text
//! AttributeStore: kind  -> ValueIndex
//! ValueIndex:     value -> RowArray
//! RowArray:       row   -> IntervalList  ([start, end], ...)
//! ```
//!
//! Two invariants hold after every operation:
//! - intervals in one list are sorted, disjoint and never adjacent
//! - at most one value of a kind covers any given cell
//!
//! Structural edits (row/column insertion and deletion) renumber every
//! interval so stored attributes keep following their cells.
//!
//! The store is single-threaded: hosts that share it across threads wrap the
//! whole store in one lock, since interval updates are multi-step.

mod config;
mod defaults;
mod error;
mod interval;
mod snapshot;
mod store;
mod structural;
mod value_index;

pub use config::StoreConfig;
pub use defaults::DefaultAttributes;
pub use error::{Axis, InvariantViolation, StoreError};
pub use interval::{Interval, IntervalList};
pub use snapshot::{DefaultRecord, SpanRecord, StoreSnapshot, SNAPSHOT_VERSION};
pub use store::{AttributeStore, Span};
pub use structural::StructuralEdit;
pub use value_index::{RowArray, ValueIndex};

pub use gridattr_model as model;
