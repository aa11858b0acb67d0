use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{Color, Font, OpaqueHandle, Pen, PixmapHandle, ValueType};

/// A single attribute payload.
///
/// Values are keys of the per-kind value index, so equality and ordering are
/// total and consistent:
/// - `String` compares lexicographically
/// - `Pixmap` compares by cache key, never pixel content
/// - `Font` and `Pen` compare by full value
/// - scalars compare as integers
///
/// Values of different variants order by variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Bool(bool),
    Int(i32),
    Color(Color),
    Pen(Pen),
    Font(Font),
    String(String),
    Pixmap(PixmapHandle),
    Opaque(OpaqueHandle),
}

impl AttributeValue {
    pub const fn value_type(&self) -> ValueType {
        match self {
            AttributeValue::Bool(_) => ValueType::Bool,
            AttributeValue::Int(_) => ValueType::Int,
            AttributeValue::Color(_) => ValueType::Color,
            AttributeValue::Pen(_) => ValueType::Pen,
            AttributeValue::Font(_) => ValueType::Font,
            AttributeValue::String(_) => ValueType::String,
            AttributeValue::Pixmap(_) => ValueType::Pixmap,
            AttributeValue::Opaque(_) => ValueType::Opaque,
        }
    }

    /// Whether storing this value is equivalent to clearing the cell
    /// (a `NoPen` pen or a null pixmap).
    #[must_use]
    pub fn is_clearing(&self) -> bool {
        match self {
            AttributeValue::Pen(pen) => pen.is_none(),
            AttributeValue::Pixmap(pixmap) => pixmap.is_null(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            AttributeValue::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_pen(&self) -> Option<&Pen> {
        match self {
            AttributeValue::Pen(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_font(&self) -> Option<&Font> {
        match self {
            AttributeValue::Font(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_pixmap(&self) -> Option<PixmapHandle> {
        match self {
            AttributeValue::Pixmap(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<OpaqueHandle> {
        match self {
            AttributeValue::Opaque(v) => Some(*v),
            _ => None,
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            AttributeValue::Bool(_) => 0,
            AttributeValue::Int(_) => 1,
            AttributeValue::Color(_) => 2,
            AttributeValue::Pen(_) => 3,
            AttributeValue::Font(_) => 4,
            AttributeValue::String(_) => 5,
            AttributeValue::Pixmap(_) => 6,
            AttributeValue::Opaque(_) => 7,
        }
    }
}

impl PartialOrd for AttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttributeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use AttributeValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Color(a), Color(b)) => a.argb.cmp(&b.argb),
            (Pen(a), Pen(b)) => a.cmp(b),
            (Font(a), Font(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Pixmap(a), Pixmap(b)) => a.cache_key.cmp(&b.cache_key),
            (Opaque(a), Opaque(b)) => a.id().cmp(&b.id()),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Color(v) => write!(f, "{v}"),
            AttributeValue::Pen(v) => write!(f, "pen({:?}, {}, {})", v.style, v.width, v.color),
            AttributeValue::Font(v) => write!(f, "font({:?}, {}pt)", v.family, v.point_size),
            AttributeValue::String(v) => write!(f, "{v:?}"),
            AttributeValue::Pixmap(v) => write!(f, "pixmap#{}", v.cache_key),
            AttributeValue::Opaque(v) => write!(f, "handle#{}", v.id()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<Color> for AttributeValue {
    fn from(value: Color) -> Self {
        AttributeValue::Color(value)
    }
}

impl From<Pen> for AttributeValue {
    fn from(value: Pen) -> Self {
        AttributeValue::Pen(value)
    }
}

impl From<Font> for AttributeValue {
    fn from(value: Font) -> Self {
        AttributeValue::Font(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<PixmapHandle> for AttributeValue {
    fn from(value: PixmapHandle) -> Self {
        AttributeValue::Pixmap(value)
    }
}

impl From<OpaqueHandle> for AttributeValue {
    fn from(value: OpaqueHandle) -> Self {
        AttributeValue::Opaque(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PenStyle;

    #[test]
    fn ordering_is_consistent_with_equality() {
        let values = vec![
            AttributeValue::Bool(false),
            AttributeValue::Bool(true),
            AttributeValue::Int(-3),
            AttributeValue::Int(7),
            AttributeValue::Color(Color::rgb(255, 0, 0)),
            AttributeValue::Pen(Pen::solid(Color::black())),
            AttributeValue::Pen(Pen::new(PenStyle::Dash, 2, Color::black())),
            AttributeValue::Font(Font::new("Arial", 10)),
            AttributeValue::Font(Font::new("Arial", 12)),
            AttributeValue::String("a".into()),
            AttributeValue::String("b".into()),
            AttributeValue::Pixmap(PixmapHandle::new(1, 0, 0)),
            AttributeValue::Opaque(OpaqueHandle(9)),
        ];
        for a in &values {
            for b in &values {
                assert_eq!(a == b, a.cmp(b) == Ordering::Equal, "{a:?} vs {b:?}");
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
            }
        }
    }

    #[test]
    fn pixmap_values_ignore_size_hint() {
        let a = AttributeValue::Pixmap(PixmapHandle::new(5, 10, 10));
        let b = AttributeValue::Pixmap(PixmapHandle::new(5, 20, 20));
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn clearing_values() {
        assert!(AttributeValue::Pen(Pen::none()).is_clearing());
        assert!(AttributeValue::Pixmap(PixmapHandle::null()).is_clearing());
        assert!(!AttributeValue::Pen(Pen::default()).is_clearing());
        assert!(!AttributeValue::Int(0).is_clearing());
    }

    #[test]
    fn serde_uses_tagged_layout() {
        let json = serde_json::to_value(AttributeValue::Color(Color::new_argb(0xFF0000FF))).unwrap();
        assert_eq!(json, serde_json::json!({"type": "color", "value": "#FF0000FF"}));
        let back: AttributeValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, AttributeValue::Color(Color::new_argb(0xFF0000FF)));
    }
}
