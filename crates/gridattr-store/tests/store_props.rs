use std::collections::HashMap;

use gridattr_store::model::{AttributeKind, AttributeValue, Color};
use gridattr_store::{AttributeStore, StoreConfig, StructuralEdit};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const ROWS: u32 = 6;
const COLS: u32 = 12;
const KINDS: [AttributeKind; 3] = [
    AttributeKind::ForeColor,
    AttributeKind::BackColor,
    AttributeKind::Label,
];

fn value_for(kind: AttributeKind, n: u8) -> AttributeValue {
    match kind {
        AttributeKind::Label => AttributeValue::from(format!("label-{n}")),
        _ => AttributeValue::Color(Color::rgb(n.wrapping_mul(80), 0, 255 - n)),
    }
}

#[derive(Clone, Debug)]
enum Op {
    Set { row: u32, col: u32, kind: usize, value: u8 },
    Clear { row: u32, col: u32, kind: usize },
    SetRange { row: u32, start: u32, end: u32, kind: usize, value: u8 },
    ClearRange { row: u32, start: u32, end: u32, kind: usize },
    Edit(StructuralEdit),
}

fn op() -> impl Strategy<Value = Op> {
    let row = 0u32..ROWS + 2;
    let col = 0u32..COLS + 2;
    let kind = 0usize..KINDS.len();
    let value = 0u8..3;
    prop_oneof![
        4 => (row.clone(), col.clone(), kind.clone(), value.clone())
            .prop_map(|(row, col, kind, value)| Op::Set { row, col, kind, value }),
        2 => (row.clone(), col.clone(), kind.clone())
            .prop_map(|(row, col, kind)| Op::Clear { row, col, kind }),
        3 => (row.clone(), col.clone(), col.clone(), kind.clone(), value)
            .prop_map(|(row, start, end, kind, value)| Op::SetRange { row, start, end, kind, value }),
        1 => (row, col.clone(), col.clone(), kind)
            .prop_map(|(row, start, end, kind)| Op::ClearRange { row, start, end, kind }),
        2 => (0u8..4, 0u32..COLS + 2, 0u32..4).prop_map(|(which, at, count)| Op::Edit(match which {
            0 => StructuralEdit::InsertRows { at, count },
            1 => StructuralEdit::DeleteRows { at, count },
            2 => StructuralEdit::InsertColumns { at, count },
            _ => StructuralEdit::DeleteColumns { at, count },
        })),
    ]
}

/// One entry per set cell; the obvious, slow reference.
#[derive(Debug)]
struct Model {
    rows: u32,
    cols: u32,
    cells: HashMap<(AttributeKind, u32, u32), AttributeValue>,
}

impl Model {
    fn new() -> Self {
        Self {
            rows: ROWS,
            cols: COLS,
            cells: HashMap::new(),
        }
    }

    fn in_grid(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.cols
    }

    /// Applies `op` and returns whether it was valid.
    fn apply(&mut self, op: &Op) -> bool {
        match *op {
            Op::Set { row, col, kind, value } => {
                if !self.in_grid(row, col) {
                    return false;
                }
                let kind = KINDS[kind];
                self.cells.insert((kind, row, col), value_for(kind, value));
                true
            }
            Op::Clear { row, col, kind } => {
                if !self.in_grid(row, col) {
                    return false;
                }
                self.cells.remove(&(KINDS[kind], row, col));
                true
            }
            Op::SetRange { row, start, end, kind, value } => {
                if start > end || !self.in_grid(row, end) {
                    return false;
                }
                let kind = KINDS[kind];
                for col in start..=end {
                    self.cells.insert((kind, row, col), value_for(kind, value));
                }
                true
            }
            Op::ClearRange { row, start, end, kind } => {
                if start > end || !self.in_grid(row, end) {
                    return false;
                }
                for col in start..=end {
                    self.cells.remove(&(KINDS[kind], row, col));
                }
                true
            }
            Op::Edit(edit) => self.apply_edit(edit),
        }
    }

    fn apply_edit(&mut self, edit: StructuralEdit) -> bool {
        let (at, count) = (edit.at(), edit.count());
        if count == 0 {
            return false;
        }
        let len = if edit.is_row_edit() { self.rows } else { self.cols };
        let inserting = matches!(
            edit,
            StructuralEdit::InsertRows { .. } | StructuralEdit::InsertColumns { .. }
        );
        if (inserting && at > len) || (!inserting && at + count > len) {
            return false;
        }

        let remap = |pos: u32| -> Option<u32> {
            if pos < at {
                Some(pos)
            } else if inserting {
                Some(pos + count)
            } else if pos < at + count {
                None
            } else {
                Some(pos - count)
            }
        };
        let row_edit = edit.is_row_edit();
        self.cells = std::mem::take(&mut self.cells)
            .into_iter()
            .filter_map(|((kind, row, col), value)| {
                let (row, col) = if row_edit {
                    (remap(row)?, col)
                } else {
                    (row, remap(col)?)
                };
                Some(((kind, row, col), value))
            })
            .collect();

        let len = if inserting { len + count } else { len - count };
        if row_edit {
            self.rows = len;
        } else {
            self.cols = len;
        }
        true
    }

    /// Number of maximal same-value column runs, which is what a fully
    /// merged store must hold.
    fn run_count(&self) -> usize {
        let mut runs = 0;
        for (&(kind, row, col), value) in &self.cells {
            let continues = col > 0 && self.cells.get(&(kind, row, col - 1)) == Some(value);
            if !continues {
                runs += 1;
            }
        }
        runs
    }
}

fn apply(store: &mut AttributeStore, op: &Op) -> bool {
    match *op {
        Op::Set { row, col, kind, value } => {
            let kind = KINDS[kind];
            store.set(row, col, kind, value_for(kind, value)).is_ok()
        }
        Op::Clear { row, col, kind } => store.clear(row, col, KINDS[kind]).is_ok(),
        Op::SetRange { row, start, end, kind, value } => {
            let kind = KINDS[kind];
            store
                .set_range(row, start..=end, kind, value_for(kind, value))
                .is_ok()
        }
        Op::ClearRange { row, start, end, kind } => {
            store.clear_range(row, start..=end, KINDS[kind]).is_ok()
        }
        Op::Edit(edit) => store.apply_edit(edit).is_ok(),
    }
}

fn assert_matches_model(store: &AttributeStore, model: &Model) {
    assert_eq!((store.rows(), store.cols()), (model.rows, model.cols));
    for kind in KINDS {
        for row in 0..model.rows {
            for col in 0..model.cols {
                assert_eq!(
                    store.get(row, col, kind).unwrap(),
                    model.cells.get(&(kind, row, col)).cloned(),
                    "{kind} at R{row}C{col}"
                );
            }
        }
    }
    assert_eq!(store.interval_count(), model.run_count());
}

fn filled_store() -> impl Strategy<Value = AttributeStore> {
    prop::collection::vec(op(), 0..40).prop_map(|ops| {
        let mut store = AttributeStore::new(ROWS, COLS);
        for op in ops.iter().filter(|op| !matches!(op, Op::Edit(_))) {
            apply(&mut store, op);
        }
        store
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn store_agrees_with_cell_map(ops in prop::collection::vec(op(), 1..60)) {
        let mut store = AttributeStore::with_config(ROWS, COLS, StoreConfig::checked());
        let mut model = Model::new();
        for op in &ops {
            let expected = model.apply(op);
            prop_assert_eq!(apply(&mut store, op), expected, "{:?}", op);
            prop_assert!(store.validate().is_ok(), "{:?}", store.validate());
        }
        assert_matches_model(&store, &model);
    }

    #[test]
    fn column_insert_then_delete_is_identity(
        store in filled_store(),
        at in 0u32..=COLS,
        count in 1u32..5,
    ) {
        let mut edited = store.clone();
        edited.insert_columns(count, at).unwrap();
        prop_assert!(edited.validate().is_ok());
        edited.delete_columns(count, at).unwrap();
        prop_assert_eq!(edited, store);
    }

    #[test]
    fn row_insert_then_delete_is_identity(
        store in filled_store(),
        at in 0u32..=ROWS,
        count in 1u32..5,
    ) {
        let mut edited = store.clone();
        edited.insert_rows(count, at).unwrap();
        edited.delete_rows(count, at).unwrap();
        prop_assert_eq!(edited, store);
    }

    #[test]
    fn snapshot_restore_is_identity(store in filled_store()) {
        let restored = AttributeStore::restore(&store.snapshot(), StoreConfig::default()).unwrap();
        prop_assert_eq!(restored, store);
    }
}
