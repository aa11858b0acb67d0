use serde::{Deserialize, Serialize};

use crate::Color;

/// Border line style.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenStyle {
    /// No line is drawn. A pen with this style is never stored per cell.
    NoPen,
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
}

/// A border pen: line style, width in device pixels and color.
///
/// Pens are compared by full value, so two pens built independently with the
/// same fields share one bucket in the store.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pen {
    #[serde(default)]
    pub style: PenStyle,
    #[serde(default = "default_width")]
    pub width: u32,
    pub color: Color,
}

fn default_width() -> u32 {
    1
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            style: PenStyle::Solid,
            width: default_width(),
            color: Color::black(),
        }
    }
}

impl Pen {
    pub fn new(style: PenStyle, width: u32, color: Color) -> Self {
        Self {
            style,
            width,
            color,
        }
    }

    pub fn solid(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// The pen that draws nothing.
    pub fn none() -> Self {
        Self {
            style: PenStyle::NoPen,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.style == PenStyle::NoPen
    }
}
