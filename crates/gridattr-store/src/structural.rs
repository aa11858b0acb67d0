use serde::{Deserialize, Serialize};

use crate::{AttributeStore, StoreError, ValueIndex};

/// A row/column insertion or deletion in the grid's coordinate space.
///
/// The grid's data model raises one of these whenever its own shape changes;
/// applying it keeps every stored interval aligned with the cells it
/// described before the edit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StructuralEdit {
    /// `count` empty rows appear before row `at`.
    InsertRows { at: u32, count: u32 },
    /// Rows `at..at+count` disappear, along with everything stored in them.
    DeleteRows { at: u32, count: u32 },
    /// `count` blank columns appear before column `at`.
    InsertColumns { at: u32, count: u32 },
    /// Columns `at..at+count` disappear.
    DeleteColumns { at: u32, count: u32 },
}

impl StructuralEdit {
    pub const fn at(self) -> u32 {
        match self {
            StructuralEdit::InsertRows { at, .. }
            | StructuralEdit::DeleteRows { at, .. }
            | StructuralEdit::InsertColumns { at, .. }
            | StructuralEdit::DeleteColumns { at, .. } => at,
        }
    }

    pub const fn count(self) -> u32 {
        match self {
            StructuralEdit::InsertRows { count, .. }
            | StructuralEdit::DeleteRows { count, .. }
            | StructuralEdit::InsertColumns { count, .. }
            | StructuralEdit::DeleteColumns { count, .. } => count,
        }
    }

    pub const fn is_row_edit(self) -> bool {
        matches!(
            self,
            StructuralEdit::InsertRows { .. } | StructuralEdit::DeleteRows { .. }
        )
    }

    /// The edit that restores the grid's shape.
    ///
    /// Undoing a deletion restores the shape only; deleted attributes are gone.
    pub const fn inverse(self) -> Self {
        match self {
            StructuralEdit::InsertRows { at, count } => StructuralEdit::DeleteRows { at, count },
            StructuralEdit::DeleteRows { at, count } => StructuralEdit::InsertRows { at, count },
            StructuralEdit::InsertColumns { at, count } => {
                StructuralEdit::DeleteColumns { at, count }
            }
            StructuralEdit::DeleteColumns { at, count } => {
                StructuralEdit::InsertColumns { at, count }
            }
        }
    }

    /// Checks the edit against a `rows` x `cols` grid and returns the grid's
    /// shape after it.
    pub fn resize(self, rows: u32, cols: u32) -> Result<(u32, u32), StoreError> {
        let count = self.count();
        if count == 0 {
            return Err(StoreError::InvalidCount);
        }
        let at = self.at();
        match self {
            StructuralEdit::InsertRows { .. } => {
                if at > rows {
                    return Err(StoreError::row(at, rows));
                }
                let rows = rows.checked_add(count).ok_or(StoreError::InvalidCount)?;
                Ok((rows, cols))
            }
            StructuralEdit::DeleteRows { .. } => match at.checked_add(count) {
                Some(end) if end <= rows => Ok((rows - count, cols)),
                _ => Err(StoreError::row(at.saturating_add(count - 1), rows)),
            },
            StructuralEdit::InsertColumns { .. } => {
                if at > cols {
                    return Err(StoreError::column(at, cols));
                }
                let cols = cols.checked_add(count).ok_or(StoreError::InvalidCount)?;
                Ok((rows, cols))
            }
            StructuralEdit::DeleteColumns { .. } => match at.checked_add(count) {
                Some(end) if end <= cols => Ok((rows, cols - count)),
                _ => Err(StoreError::column(at.saturating_add(count - 1), cols)),
            },
        }
    }

    /// Applies one edit to several stores sharing a grid.
    ///
    /// Every store is checked before any is touched, so either all of them
    /// are edited or none is.
    pub fn apply_all<'a>(
        self,
        stores: impl IntoIterator<Item = &'a mut AttributeStore>,
    ) -> Result<(), StoreError> {
        let mut stores: Vec<&'a mut AttributeStore> = stores.into_iter().collect();
        for store in &stores {
            self.resize(store.rows(), store.cols())?;
        }
        for store in &mut stores {
            store.apply_edit(self)?;
        }
        Ok(())
    }
}

impl ValueIndex {
    /// Renumbers every interval of every value for `edit`.
    ///
    /// Row edits splice whole interval lists; column edits visit every
    /// interval. Returns the number of intervals inspected.
    pub(crate) fn apply_edit(&mut self, edit: StructuralEdit) -> usize {
        let mut touched = 0;
        self.for_each_row_array(|rows| {
            touched += rows.interval_count();
            match edit {
                StructuralEdit::InsertRows { at, count } => rows.insert_rows(at, count),
                StructuralEdit::DeleteRows { at, count } => rows.delete_rows(at, count),
                StructuralEdit::InsertColumns { at, count } => {
                    rows.update_all(|list| list.split_at_insertion(at, count))
                }
                StructuralEdit::DeleteColumns { at, count } => {
                    rows.update_all(|list| list.contract_at_deletion(at, count))
                }
            }
        });
        touched
    }
}
