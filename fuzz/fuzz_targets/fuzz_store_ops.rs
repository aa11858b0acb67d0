#![no_main]

use gridattr_store::model::{AttributeKind, AttributeValue, Color, Pen, PenStyle, PixmapHandle};
use gridattr_store::{AttributeStore, StoreConfig, StructuralEdit};
use libfuzzer_sys::fuzz_target;

/// Keep the harness bounded: each op consumes 5 bytes.
const MAX_OPS: usize = 512;
const ROWS: u32 = 16;
const COLS: u32 = 64;

const KINDS: [AttributeKind; 6] = [
    AttributeKind::BackColor,
    AttributeKind::ForeColor,
    AttributeKind::TopBorderPen,
    AttributeKind::Pixmap,
    AttributeKind::FontBold,
    AttributeKind::FontSize,
];

fn value(kind: AttributeKind, byte: u8) -> AttributeValue {
    match kind {
        AttributeKind::TopBorderPen => {
            let style = if byte % 4 == 0 {
                PenStyle::NoPen
            } else {
                PenStyle::Solid
            };
            Pen::new(style, u32::from(byte % 3), Color::black()).into()
        }
        AttributeKind::Pixmap => PixmapHandle::new(u64::from(byte % 4), 8, 8).into(),
        AttributeKind::FontBold => AttributeValue::Bool(byte % 2 == 0),
        AttributeKind::FontSize => AttributeValue::Int(i32::from(byte % 5) + 8),
        _ => Color::rgb(byte % 3, 0, 0).into(),
    }
}

fuzz_target!(|data: &[u8]| {
    let mut store = AttributeStore::with_config(ROWS, COLS, StoreConfig::checked());

    for chunk in data.chunks_exact(5).take(MAX_OPS) {
        let [op, a, b, c, d] = [chunk[0], chunk[1], chunk[2], chunk[3], chunk[4]];
        // Coordinates may fall outside the grid; those calls must fail cleanly.
        let row = u32::from(a) % (store.rows() + 2);
        let col = u32::from(b) % (store.cols() + 2);
        let kind = KINDS[usize::from(c) % KINDS.len()];

        let _ = match op % 8 {
            0 | 1 => store.set(row, col, kind, value(kind, d)).map(|_| ()),
            2 => store.clear(row, col, kind).map(|_| ()),
            3 => {
                let end = col.saturating_add(u32::from(d) % 16);
                store.set_range(row, col..=end, kind, value(kind, d))
            }
            4 => {
                let end = col.saturating_add(u32::from(d) % 16);
                store.clear_range(row, col..=end, kind).map(|_| ())
            }
            5 => {
                // Keep the grid from growing without bound.
                let count = u32::from(d % 4);
                let edit = if c % 2 == 0 && store.cols() < 4 * COLS {
                    StructuralEdit::InsertColumns { at: col, count }
                } else if store.rows() < 4 * ROWS {
                    StructuralEdit::InsertRows { at: row, count }
                } else {
                    continue;
                };
                store.apply_edit(edit)
            }
            6 => {
                let count = u32::from(d % 4);
                let edit = if c % 2 == 0 {
                    StructuralEdit::DeleteColumns { at: col, count }
                } else {
                    StructuralEdit::DeleteRows { at: row, count }
                };
                store.apply_edit(edit)
            }
            _ => {
                let restored = AttributeStore::restore(&store.snapshot(), StoreConfig::checked())
                    .expect("snapshot of a valid store restores");
                assert_eq!(restored, store);
                Ok(())
            }
        };

        if let Err(violation) = store.validate() {
            panic!("invariant violated: {violation}");
        }
    }
});
