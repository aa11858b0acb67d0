use core::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A packed ARGB color.
///
/// Serialized as a `#AARRGGBB` hex string so snapshots stay readable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color {
    pub argb: u32,
}

impl Color {
    pub const fn new_argb(argb: u32) -> Self {
        Self { argb }
    }

    /// Opaque color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xFF)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            argb: ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32),
        }
    }

    pub const fn black() -> Self {
        Self { argb: 0xFF000000 }
    }

    pub const fn white() -> Self {
        Self { argb: 0xFFFFFFFF }
    }

    pub const fn alpha(self) -> u8 {
        (self.argb >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.argb >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.argb >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.argb as u8
    }

    fn to_hex(self) -> String {
        format!("#{:08X}", self.argb)
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Self::new_argb(argb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| D::Error::custom("color must be a #AARRGGBB hex string (missing '#')"))?;
        if hex.len() != 8 {
            return Err(D::Error::custom(
                "color must be a #AARRGGBB hex string (8 hex digits)",
            ));
        }
        let argb = u32::from_str_radix(hex, 16).map_err(|_| D::Error::custom("invalid hex"))?;
        Ok(Color { argb })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_pack_as_argb() {
        let c = Color::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.argb, 0x78123456);
        assert_eq!(
            (c.alpha(), c.red(), c.green(), c.blue()),
            (0x78, 0x12, 0x34, 0x56)
        );
        assert_eq!(Color::rgb(255, 0, 0).argb, 0xFFFF0000);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color::new_argb(0xFF00FF00)).unwrap();
        assert_eq!(json, "\"#FF00FF00\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::new_argb(0xFF00FF00));

        assert!(serde_json::from_str::<Color>("\"FF00FF00\"").is_err());
        assert!(serde_json::from_str::<Color>("\"#FFF\"").is_err());
    }
}
