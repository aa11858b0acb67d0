use serde::{Deserialize, Serialize};

/// Tuning knobs for an [`AttributeStore`](crate::AttributeStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Extra empty rows appended whenever a value's row array has to grow to
    /// reach a row, so a run of writes down a column reallocates rarely.
    pub row_growth_chunk: u32,
    /// Drop a value from its kind's index once no interval references it.
    ///
    /// Keeps lookups proportional to the values actually in use.
    pub prune_empty_buckets: bool,
    /// In debug builds, run [`AttributeStore::validate`](crate::AttributeStore::validate)
    /// after every mutation and panic on the first violation.
    pub validate_after_edits: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            row_growth_chunk: 10,
            prune_empty_buckets: true,
            validate_after_edits: false,
        }
    }
}

impl StoreConfig {
    /// Configuration used by the test suites: every mutation is validated.
    #[must_use]
    pub fn checked() -> Self {
        Self {
            validate_after_edits: true,
            ..Self::default()
        }
    }
}
