use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FontProperty;

/// Payload type carried by an attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Int,
    Color,
    Pen,
    Font,
    String,
    Pixmap,
    Opaque,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Color => "color",
            ValueType::Pen => "pen",
            ValueType::Font => "font",
            ValueType::String => "string",
            ValueType::Pixmap => "pixmap",
            ValueType::Opaque => "opaque handle",
        };
        f.write_str(name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("expected a {expected} value, got a {found} value")]
pub struct ValueTypeError {
    pub expected: ValueType,
    pub found: ValueType,
}

/// What a cell attribute describes.
///
/// Kinds before [`AttributeKind::FontFamily`] are stored directly. The font
/// sub-field kinds (`FontFamily..=FontStretch`) are virtual: they are read and
/// written through the [`AttributeKind::Font`] value of the same cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    BorderWidth,
    TopBorderPen,
    LeftBorderPen,
    RightBorderPen,
    BottomBorderPen,
    CellMargin,
    Enabled,
    Selected,
    ReadOnly,
    Alignment,
    TextFlags,
    Font,
    Cursor,
    CellDisplayer,
    Formatter,
    Pixmap,
    PixmapName,
    PixmapSpacing,
    Validator,
    Label,
    MaxLength,
    UserData,
    ToolTipText,
    EditBackgroundColor,
    EditForegroundColor,
    PasteValidator,
    AutoRecognition,
    CanAcceptDrops,
    ForeColor,
    BackColor,
    WindowTextColor,
    WindowColor,
    SelForeColor,
    SelBackColor,
    SelectedFont,
    HighlightForeColor,
    HighlightBackColor,

    FontFamily,
    FontSize,
    FontWeight,
    FontBold,
    FontItalic,
    FontUnderline,
    FontOverline,
    FontStrikeOut,
    FontFixed,
    FontKerning,
    FontStretch,
}

impl AttributeKind {
    /// Every kind, in declaration order.
    pub const ALL: [AttributeKind; 48] = [
        AttributeKind::BorderWidth,
        AttributeKind::TopBorderPen,
        AttributeKind::LeftBorderPen,
        AttributeKind::RightBorderPen,
        AttributeKind::BottomBorderPen,
        AttributeKind::CellMargin,
        AttributeKind::Enabled,
        AttributeKind::Selected,
        AttributeKind::ReadOnly,
        AttributeKind::Alignment,
        AttributeKind::TextFlags,
        AttributeKind::Font,
        AttributeKind::Cursor,
        AttributeKind::CellDisplayer,
        AttributeKind::Formatter,
        AttributeKind::Pixmap,
        AttributeKind::PixmapName,
        AttributeKind::PixmapSpacing,
        AttributeKind::Validator,
        AttributeKind::Label,
        AttributeKind::MaxLength,
        AttributeKind::UserData,
        AttributeKind::ToolTipText,
        AttributeKind::EditBackgroundColor,
        AttributeKind::EditForegroundColor,
        AttributeKind::PasteValidator,
        AttributeKind::AutoRecognition,
        AttributeKind::CanAcceptDrops,
        AttributeKind::ForeColor,
        AttributeKind::BackColor,
        AttributeKind::WindowTextColor,
        AttributeKind::WindowColor,
        AttributeKind::SelForeColor,
        AttributeKind::SelBackColor,
        AttributeKind::SelectedFont,
        AttributeKind::HighlightForeColor,
        AttributeKind::HighlightBackColor,
        AttributeKind::FontFamily,
        AttributeKind::FontSize,
        AttributeKind::FontWeight,
        AttributeKind::FontBold,
        AttributeKind::FontItalic,
        AttributeKind::FontUnderline,
        AttributeKind::FontOverline,
        AttributeKind::FontStrikeOut,
        AttributeKind::FontFixed,
        AttributeKind::FontKerning,
        AttributeKind::FontStretch,
    ];

    /// Position in [`AttributeKind::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`AttributeKind::index`]; `None` for unknown indices.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Payload type accepted for this kind.
    pub const fn value_type(self) -> ValueType {
        use AttributeKind::*;
        match self {
            BorderWidth | CellMargin | Alignment | TextFlags | PixmapSpacing | MaxLength => {
                ValueType::Int
            }
            TopBorderPen | LeftBorderPen | RightBorderPen | BottomBorderPen => ValueType::Pen,
            Enabled | Selected | ReadOnly | AutoRecognition | CanAcceptDrops => ValueType::Bool,
            Font | SelectedFont => ValueType::Font,
            Cursor | CellDisplayer | Formatter | Validator | PasteValidator | UserData => {
                ValueType::Opaque
            }
            Pixmap => ValueType::Pixmap,
            PixmapName | Label | ToolTipText => ValueType::String,
            EditBackgroundColor | EditForegroundColor | ForeColor | BackColor
            | WindowTextColor | WindowColor | SelForeColor | SelBackColor
            | HighlightForeColor | HighlightBackColor => ValueType::Color,
            FontFamily | FontSize | FontWeight | FontBold | FontItalic | FontUnderline
            | FontOverline | FontStrikeOut | FontFixed | FontKerning | FontStretch => {
                match self.font_property() {
                    Some(property) => property.value_type(),
                    None => ValueType::Font,
                }
            }
        }
    }

    /// The [`Font`](crate::Font) sub-field a virtual kind addresses.
    pub const fn font_property(self) -> Option<FontProperty> {
        Some(match self {
            AttributeKind::FontFamily => FontProperty::Family,
            AttributeKind::FontSize => FontProperty::Size,
            AttributeKind::FontWeight => FontProperty::Weight,
            AttributeKind::FontBold => FontProperty::Bold,
            AttributeKind::FontItalic => FontProperty::Italic,
            AttributeKind::FontUnderline => FontProperty::Underline,
            AttributeKind::FontOverline => FontProperty::Overline,
            AttributeKind::FontStrikeOut => FontProperty::StrikeOut,
            AttributeKind::FontFixed => FontProperty::FixedPitch,
            AttributeKind::FontKerning => FontProperty::Kerning,
            AttributeKind::FontStretch => FontProperty::Stretch,
            _ => return None,
        })
    }

    #[inline]
    pub const fn is_virtual(self) -> bool {
        self.font_property().is_some()
    }

    /// Whether the cell level can hold this kind.
    ///
    /// Cursors are a row/column/grid level attribute only.
    #[inline]
    pub const fn is_cell_attribute(self) -> bool {
        !matches!(self, AttributeKind::Cursor)
    }

    /// Border pen kinds; a `NoPen` pen clears instead of being stored.
    #[inline]
    pub const fn is_border_pen(self) -> bool {
        matches!(
            self,
            AttributeKind::TopBorderPen
                | AttributeKind::LeftBorderPen
                | AttributeKind::RightBorderPen
                | AttributeKind::BottomBorderPen
        )
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrips_for_every_kind() {
        for (i, kind) in AttributeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(AttributeKind::from_index(i), Some(*kind));
        }
        assert_eq!(AttributeKind::from_index(AttributeKind::ALL.len()), None);
    }

    #[test]
    fn virtual_kinds_are_exactly_the_font_subfields() {
        let virtual_kinds: Vec<_> = AttributeKind::ALL
            .iter()
            .copied()
            .filter(|k| k.is_virtual())
            .collect();
        assert_eq!(virtual_kinds.len(), FontProperty::ALL.len());
        assert_eq!(virtual_kinds.first(), Some(&AttributeKind::FontFamily));
        assert_eq!(virtual_kinds.last(), Some(&AttributeKind::FontStretch));
        assert_eq!(AttributeKind::FontBold.value_type(), ValueType::Bool);
        assert_eq!(AttributeKind::FontFamily.value_type(), ValueType::String);
        assert_eq!(AttributeKind::FontSize.value_type(), ValueType::Int);
    }

    #[test]
    fn cursor_is_not_a_cell_attribute() {
        assert!(!AttributeKind::Cursor.is_cell_attribute());
        assert!(AttributeKind::Validator.is_cell_attribute());
    }
}
