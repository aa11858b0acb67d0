//! `gridattr-model` defines the value vocabulary for per-cell grid attributes.
//!
//! The crate is intentionally free of storage concerns so it can be shared by:
//! - the sparse regional attribute store (`gridattr-store`)
//! - rendering/query layers that consume attribute values
//! - hosts that persist attribute snapshots via `serde`

mod address;
mod color;
mod font;
mod handle;
mod kind;
mod pen;
mod value;

pub use address::{CellRef, CellRegion};
pub use color::Color;
pub use font::{Font, FontProperty, FONT_WEIGHT_BOLD, FONT_WEIGHT_NORMAL};
pub use handle::{OpaqueHandle, PixmapHandle};
pub use kind::{AttributeKind, ValueType, ValueTypeError};
pub use pen::{Pen, PenStyle};
pub use value::AttributeValue;
