use gridattr_model::{AttributeKind, AttributeValue};
use serde::{Deserialize, Serialize};

use crate::{AttributeStore, StoreConfig, StoreError};

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Flat, order-independent description of a store's contents.
///
/// The store has no file format of its own; hosts that persist attributes
/// serialize this with whatever `serde` format they already use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub rows: u32,
    pub cols: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaults: Vec<DefaultRecord>,
    #[serde(default)]
    pub spans: Vec<SpanRecord>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultRecord {
    pub kind: AttributeKind,
    pub value: AttributeValue,
}

/// One run of columns in one row sharing one value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanRecord {
    pub kind: AttributeKind,
    pub row: u32,
    pub start: u32,
    pub end: u32,
    pub value: AttributeValue,
}

impl AttributeStore {
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            version: SNAPSHOT_VERSION,
            rows: self.rows(),
            cols: self.cols(),
            defaults: self
                .defaults()
                .iter()
                .map(|(kind, value)| DefaultRecord {
                    kind,
                    value: value.clone(),
                })
                .collect(),
            spans: self
                .spans()
                .map(|span| SpanRecord {
                    kind: span.kind,
                    row: span.row,
                    start: span.interval.start,
                    end: span.interval.end,
                    value: span.value.clone(),
                })
                .collect(),
        }
    }

    /// Rebuilds a store from a snapshot. Spans may come in any order; where
    /// two overlap, the later one wins.
    pub fn restore(snapshot: &StoreSnapshot, config: StoreConfig) -> Result<Self, StoreError> {
        let mut store = AttributeStore::with_config(snapshot.rows, snapshot.cols, config);
        for record in &snapshot.defaults {
            store.set_default_property(record.kind, record.value.clone())?;
        }
        for span in &snapshot.spans {
            store.set_range(span.row, span.start..=span.end, span.kind, span.value.clone())?;
        }
        Ok(store)
    }
}
