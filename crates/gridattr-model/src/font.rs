use serde::{Deserialize, Serialize};

use crate::{AttributeValue, ValueType, ValueTypeError};

/// Weight used by [`Font::set_bold`] when turning bold on.
pub const FONT_WEIGHT_BOLD: i32 = 700;
/// Weight used by [`Font::set_bold`] when turning bold off.
pub const FONT_WEIGHT_NORMAL: i32 = 400;

/// Font description.
///
/// Fonts are compared by full value (every field), never by identity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: String,
    /// Size in points.
    pub point_size: i32,
    /// CSS-style numeric weight (100..=900). `bold` is derived from it.
    pub weight: i32,
    pub italic: bool,
    pub underline: bool,
    pub overline: bool,
    pub strike_out: bool,
    pub fixed_pitch: bool,
    pub kerning: bool,
    /// Stretch factor in percent (100 = unstretched).
    pub stretch: i32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: String::new(),
            point_size: 10,
            weight: FONT_WEIGHT_NORMAL,
            italic: false,
            underline: false,
            overline: false,
            strike_out: false,
            fixed_pitch: false,
            kerning: true,
            stretch: 100,
        }
    }
}

impl Font {
    pub fn new(family: impl Into<String>, point_size: i32) -> Self {
        Self {
            family: family.into(),
            point_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bold(&self) -> bool {
        self.weight > FONT_WEIGHT_NORMAL
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.weight = if bold {
            FONT_WEIGHT_BOLD
        } else {
            FONT_WEIGHT_NORMAL
        };
    }

    /// Reads one sub-field as an attribute value.
    pub fn property(&self, property: FontProperty) -> AttributeValue {
        match property {
            FontProperty::Family => AttributeValue::String(self.family.clone()),
            FontProperty::Size => AttributeValue::Int(self.point_size),
            FontProperty::Weight => AttributeValue::Int(self.weight),
            FontProperty::Bold => AttributeValue::Bool(self.bold()),
            FontProperty::Italic => AttributeValue::Bool(self.italic),
            FontProperty::Underline => AttributeValue::Bool(self.underline),
            FontProperty::Overline => AttributeValue::Bool(self.overline),
            FontProperty::StrikeOut => AttributeValue::Bool(self.strike_out),
            FontProperty::FixedPitch => AttributeValue::Bool(self.fixed_pitch),
            FontProperty::Kerning => AttributeValue::Bool(self.kerning),
            FontProperty::Stretch => AttributeValue::Int(self.stretch),
        }
    }

    /// Writes one sub-field. The font is left untouched if `value` has the wrong type.
    pub fn apply(
        &mut self,
        property: FontProperty,
        value: &AttributeValue,
    ) -> Result<(), ValueTypeError> {
        let mismatch = || ValueTypeError {
            expected: property.value_type(),
            found: value.value_type(),
        };
        match (property, value) {
            (FontProperty::Family, AttributeValue::String(family)) => {
                self.family.clone_from(family)
            }
            (FontProperty::Size, AttributeValue::Int(v)) => self.point_size = *v,
            (FontProperty::Weight, AttributeValue::Int(v)) => self.weight = *v,
            (FontProperty::Stretch, AttributeValue::Int(v)) => self.stretch = *v,
            (FontProperty::Bold, AttributeValue::Bool(v)) => self.set_bold(*v),
            (FontProperty::Italic, AttributeValue::Bool(v)) => self.italic = *v,
            (FontProperty::Underline, AttributeValue::Bool(v)) => self.underline = *v,
            (FontProperty::Overline, AttributeValue::Bool(v)) => self.overline = *v,
            (FontProperty::StrikeOut, AttributeValue::Bool(v)) => self.strike_out = *v,
            (FontProperty::FixedPitch, AttributeValue::Bool(v)) => self.fixed_pitch = *v,
            (FontProperty::Kerning, AttributeValue::Bool(v)) => self.kerning = *v,
            _ => return Err(mismatch()),
        }
        Ok(())
    }
}

/// A single sub-field of [`Font`] addressable as a virtual attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontProperty {
    Family,
    Size,
    Weight,
    Bold,
    Italic,
    Underline,
    Overline,
    StrikeOut,
    FixedPitch,
    Kerning,
    Stretch,
}

impl FontProperty {
    pub const ALL: [FontProperty; 11] = [
        FontProperty::Family,
        FontProperty::Size,
        FontProperty::Weight,
        FontProperty::Bold,
        FontProperty::Italic,
        FontProperty::Underline,
        FontProperty::Overline,
        FontProperty::StrikeOut,
        FontProperty::FixedPitch,
        FontProperty::Kerning,
        FontProperty::Stretch,
    ];

    pub const fn value_type(self) -> ValueType {
        match self {
            FontProperty::Family => ValueType::String,
            FontProperty::Size | FontProperty::Weight | FontProperty::Stretch => ValueType::Int,
            _ => ValueType::Bool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_tracks_weight() {
        let mut font = Font::default();
        assert!(!font.bold());
        font.set_bold(true);
        assert_eq!(font.weight, FONT_WEIGHT_BOLD);
        assert!(font.bold());

        font.weight = 900;
        assert!(font.bold());
        font.set_bold(false);
        assert_eq!(font.weight, FONT_WEIGHT_NORMAL);
    }

    #[test]
    fn apply_then_read_every_property() {
        let mut font = Font::new("Courier", 9);
        for property in FontProperty::ALL {
            let value = match property.value_type() {
                ValueType::Bool => AttributeValue::Bool(true),
                ValueType::Int => AttributeValue::Int(42),
                ValueType::String => AttributeValue::String("Mono".into()),
                other => panic!("unexpected font property type {other:?}"),
            };
            font.apply(property, &value).unwrap();
            let read = font.property(property);
            match property {
                // Weight 42 is not bold; bold writes its own weight.
                FontProperty::Weight => assert_eq!(read, AttributeValue::Int(42)),
                _ => assert_eq!(read, value, "{property:?}"),
            }
        }
    }

    #[test]
    fn apply_rejects_wrong_type_without_mutation() {
        let mut font = Font::default();
        let err = font
            .apply(FontProperty::Size, &AttributeValue::Bool(true))
            .unwrap_err();
        assert_eq!(err.expected, ValueType::Int);
        assert_eq!(err.found, ValueType::Bool);
        assert_eq!(font, Font::default());
    }
}
