//! Accent color helpers used by the widget stylesheet.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color '{0}': expected #rrggbb")]
    InvalidHex(String),
}

/// An opaque sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Shift every channel by `amount`, saturating at 0 and 255.
    pub fn shade(self, amount: i16) -> Self {
        let shift = |c: u8| (i16::from(c) + amount).clamp(0, 255) as u8;
        Self::new(shift(self.r), shift(self.g), shift(self.b))
    }

    pub fn rgba(self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::InvalidHex(s.to_string());
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Lighten (positive) or darken (negative) a `#rrggbb` color.
pub fn adjust_color(hex: &str, amount: i16) -> Result<String, ColorError> {
    Ok(hex.parse::<Rgb>()?.shade(amount).to_string())
}

/// Translucent `rgba(...)` variant of a `#rrggbb` color.
pub fn hex_to_rgba(hex: &str, alpha: f32) -> Result<String, ColorError> {
    Ok(hex.parse::<Rgb>()?.rgba(alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darkens_default_accent() {
        assert_eq!(adjust_color("#4a6cf7", -20).unwrap(), "#3658e3");
    }

    #[test]
    fn shade_saturates_at_bounds() {
        assert_eq!(adjust_color("#0a0a0a", -20).unwrap(), "#000000");
        assert_eq!(adjust_color("#f0f0f0", 40).unwrap(), "#ffffff");
    }

    #[test]
    fn accepts_missing_hash_and_uppercase() {
        assert_eq!(adjust_color("4A6CF7", 0).unwrap(), "#4a6cf7");
    }

    #[test]
    fn rgba_formats_alpha_like_css() {
        assert_eq!(hex_to_rgba("#4a6cf7", 0.4).unwrap(), "rgba(74, 108, 247, 0.4)");
        assert_eq!(hex_to_rgba("#4a6cf7", 0.0).unwrap(), "rgba(74, 108, 247, 0)");
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "#fff", "#12345g", "#1234567", "blue"] {
            assert_eq!(
                hex_to_rgba(bad, 1.0),
                Err(ColorError::InvalidHex(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn helpers_are_deterministic_for_every_channel_value() {
        for v in (0..=255u16).step_by(17) {
            let hex = format!("#{v:02x}{v:02x}{v:02x}");
            let shaded = adjust_color(&hex, -20).unwrap();
            assert_eq!(shaded, adjust_color(&hex, -20).unwrap());
            assert!(shaded.parse::<Rgb>().is_ok());
            assert!(hex_to_rgba(&hex, 0.2).unwrap().starts_with("rgba("));
        }
    }
}
