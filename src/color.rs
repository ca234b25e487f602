//! Hex colors and the brightness adjustment shared by every glyph.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SpecError;

// ============================================================================
// HexColor
// ============================================================================

/// An opaque sRGB color written as `#rrggbb`.
///
/// Parsing accepts an optional leading `#` followed by exactly six hex digits.
/// Formatting always produces the lower-case `#rrggbb` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);

    /// Creates a color from its channels.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Srgb::new(r, g, b))
    }

    /// Parses a `#rrggbb` (or `rrggbb`) string.
    pub fn parse(hex: &str) -> Result<Self, SpecError> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        // palette also accepts the 3-digit shorthand, which the icon model does not.
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SpecError::InvalidColor(hex.to_string()));
        }
        let rgb = Srgb::<u8>::from_str(digits)
            .map_err(|_| SpecError::InvalidColor(hex.to_string()))?;
        Ok(Self(rgb))
    }

    pub fn red(&self) -> u8 {
        self.0.red
    }

    pub fn green(&self) -> u8 {
        self.0.green
    }

    pub fn blue(&self) -> u8 {
        self.0.blue
    }

    /// Returns the channels as an `(r, g, b)` tuple.
    pub fn channels(&self) -> (u8, u8, u8) {
        (self.0.red, self.0.green, self.0.blue)
    }

    /// Returns the color as an opaque RGBA quad.
    pub fn to_rgba(&self) -> [u8; 4] {
        [self.0.red, self.0.green, self.0.blue, 255]
    }

    /// Returns the color with the given opacity as a tiny-skia color.
    pub fn to_skia(&self, alpha: f32) -> resvg::tiny_skia::Color {
        resvg::tiny_skia::Color::from_rgba8(
            self.0.red,
            self.0.green,
            self.0.blue,
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }

    /// Shifts all three channels by `round(2.55 * amount)`.
    ///
    /// See [`adjust_brightness`].
    pub fn adjust_brightness(&self, amount: f64) -> Self {
        let delta = brightness_delta(amount);
        let shift = |c: u8| (c as i32 + delta).clamp(0, 255) as u8;
        Self::from_rgb(shift(self.0.red), shift(self.0.green), shift(self.0.blue))
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

impl FromStr for HexColor {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for HexColor {
    fn schema_name() -> String {
        "HexColor".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}

// ============================================================================
// Brightness Adjustment
// ============================================================================

/// Converts a percentage in `[-100, 100]` to the additive channel delta.
///
/// Halves round towards positive infinity, so `-30` maps to `-76`.
fn brightness_delta(amount: f64) -> i32 {
    (2.55 * amount.clamp(-100.0, 100.0) + 0.5).floor() as i32
}

/// Lightens (positive `amount`) or darkens (negative `amount`) a `#rrggbb`
/// color by adding `round(2.55 * amount)` to each channel, clamped to 0..=255.
///
/// Returns `None` if `hex` is not a valid color.
///
/// ```
/// use iconmaker::adjust_brightness;
///
/// assert_eq!(adjust_brightness("#6366f1", -30).as_deref(), Some("#171aa5"));
/// assert_eq!(adjust_brightness("#ffffff", 40).as_deref(), Some("#ffffff"));
/// ```
pub fn adjust_brightness(hex: &str, amount: i32) -> Option<String> {
    let color = HexColor::parse(hex).ok()?;
    Some(color.adjust_brightness(amount as f64).to_string())
}

// ============================================================================
// Tests
// ============================================================================
