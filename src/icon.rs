//! Icon types: the user's request and the rendered raster.
//!
//! An [`IconSpec`] describes what to draw; a [`RasterImage`] is what the
//! renderer (or the remote generator) hands back. Rasters are always square
//! and are resampled to the requested export size right before encoding.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::error::{EncodeError, SpecError};

/// Side length of the canvas every icon is rendered on.
pub const WORKING_SIZE: u32 = 512;

/// Smallest export size accepted by [`IconSpec`].
pub const MIN_ICON_SIZE: u32 = 16;

/// Largest export size accepted by [`IconSpec`].
pub const MAX_ICON_SIZE: u32 = 1024;

/// Sizes shown side by side in the preview strip.
pub const PREVIEW_SIZES: [u32; 4] = [16, 32, 48, 64];

// ============================================================================
// Size Presets
// ============================================================================

/// The export sizes offered to the user, with their labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconSize {
    Favicon,
    Small,
    Medium,
    Large,
    Retina,
    Standard,
    HighRes,
    Ultra,
}

impl IconSize {
    /// All presets, smallest first.
    pub const ALL: [IconSize; 8] = [
        Self::Favicon,
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::Retina,
        Self::Standard,
        Self::HighRes,
        Self::Ultra,
    ];

    /// Side length in pixels.
    pub fn pixels(&self) -> u32 {
        match self {
            Self::Favicon => 16,
            Self::Small => 32,
            Self::Medium => 48,
            Self::Large => 64,
            Self::Retina => 128,
            Self::Standard => 256,
            Self::HighRes => 512,
            Self::Ultra => 1024,
        }
    }

    /// Human readable label, e.g. `"256x256 (Standard)"`.
    pub fn label(&self) -> String {
        let name = match self {
            Self::Favicon => "Favicon",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::Retina => "Retina",
            Self::Standard => "Standard",
            Self::HighRes => "High-res",
            Self::Ultra => "Ultra",
        };
        let px = self.pixels();
        format!("{px}x{px} ({name})")
    }

    /// Finds the preset with exactly this side length.
    pub fn from_pixels(pixels: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.pixels() == pixels)
    }
}

// ============================================================================
// Color and Prompt Presets
// ============================================================================

/// Swatches offered next to the color inputs, five per row.
pub const PRESET_COLORS: [HexColor; 15] = [
    HexColor::from_rgb(0x63, 0x66, 0xf1),
    HexColor::from_rgb(0x8b, 0x5c, 0xf6),
    HexColor::from_rgb(0x06, 0xb6, 0xd4),
    HexColor::from_rgb(0x10, 0xb9, 0x81),
    HexColor::from_rgb(0xf5, 0x9e, 0x0b),
    HexColor::from_rgb(0xef, 0x44, 0x44),
    HexColor::from_rgb(0xec, 0x48, 0x99),
    HexColor::from_rgb(0x84, 0xcc, 0x16),
    HexColor::from_rgb(0xf9, 0x73, 0x16),
    HexColor::from_rgb(0x6b, 0x72, 0x80),
    HexColor::BLACK,
    HexColor::WHITE,
    HexColor::from_rgb(0x1f, 0x29, 0x37),
    HexColor::from_rgb(0x37, 0x41, 0x51),
    HexColor::from_rgb(0x9c, 0xa3, 0xaf),
];

/// A named group of example descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptCategory {
    pub name: &'static str,
    pub prompts: &'static [&'static str],
}

/// Example descriptions, grouped for the suggestion list.
pub const EXAMPLE_PROMPTS: [PromptCategory; 5] = [
    PromptCategory {
        name: "Business",
        prompts: &[
            "Modern briefcase with clean lines",
            "Minimalist chart with upward arrow",
            "Simple handshake silhouette",
            "Abstract dollar sign in circle",
        ],
    },
    PromptCategory {
        name: "Technology",
        prompts: &[
            "Stylized smartphone with rounded corners",
            "Clean wifi signal icon",
            "Modern cloud with data points",
            "Simple rocket ship pointing up",
        ],
    },
    PromptCategory {
        name: "Social",
        prompts: &[
            "Two overlapping chat bubbles",
            "Stylized group of people",
            "Heart with rounded edges",
            "Simple thumbs up gesture",
        ],
    },
    PromptCategory {
        name: "Creative",
        prompts: &[
            "Artist palette with brush",
            "Musical note with flowing lines",
            "Camera lens with aperture",
            "Pen and paper illustration",
        ],
    },
    PromptCategory {
        name: "Utility",
        prompts: &[
            "Minimalist gear wheel",
            "Simple magnifying glass",
            "Clean calendar grid",
            "Modern lock with keyhole",
        ],
    },
];

impl PromptCategory {
    /// Looks up a category by name, ignoring case.
    pub fn find(name: &str) -> Option<&'static PromptCategory> {
        EXAMPLE_PROMPTS
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

// ============================================================================
// IconSpec
// ============================================================================

/// What the user asked for: a description, two colors and an export size.
///
/// Serializes with camelCase keys so it can be posted to the remote
/// generator as-is:
///
/// ```json
/// {
///   "description": "white star",
///   "backgroundColor": "#6366f1",
///   "foregroundColor": "#ffffff",
///   "size": 256
/// }
/// ```
///
/// Deserialization runs [`validate`](IconSpec::validate), so a spec read from
/// JSON is always in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "IconSpecFields")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconSpec {
    /// Free text, matched against the glyph keyword table.
    pub description: String,

    /// Canvas color; the edges are darkened from it.
    pub background_color: HexColor,

    /// Glyph color.
    pub foreground_color: HexColor,

    /// Export side length in pixels (`16..=1024`).
    pub size: u32,
}

/// Wire form of [`IconSpec`], checked on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
struct IconSpecFields {
    description: String,
    background_color: HexColor,
    foreground_color: HexColor,
    size: u32,
}

impl TryFrom<IconSpecFields> for IconSpec {
    type Error = SpecError;

    fn try_from(fields: IconSpecFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.description,
            fields.background_color,
            fields.foreground_color,
            fields.size,
        )
    }
}

impl Default for IconSpec {
    fn default() -> Self {
        Self {
            description: String::new(),
            background_color: HexColor::from_rgb(0x63, 0x66, 0xf1),
            foreground_color: HexColor::WHITE,
            size: IconSize::Standard.pixels(),
        }
    }
}

impl IconSpec {
    /// Creates a spec, validating the size range.
    pub fn new(
        description: impl Into<String>,
        background_color: HexColor,
        foreground_color: HexColor,
        size: u32,
    ) -> Result<Self, SpecError> {
        let spec = Self {
            description: description.into(),
            background_color,
            foreground_color,
            size,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Creates a spec from `#rrggbb` color strings.
    pub fn from_hex(
        description: impl Into<String>,
        background: &str,
        foreground: &str,
        size: u32,
    ) -> Result<Self, SpecError> {
        Self::new(
            description,
            HexColor::parse(background)?,
            HexColor::parse(foreground)?,
            size,
        )
    }

    /// Checks that the size is within `MIN_ICON_SIZE..=MAX_ICON_SIZE`.
    pub fn validate(&self) -> Result<(), SpecError> {
        if !(MIN_ICON_SIZE..=MAX_ICON_SIZE).contains(&self.size) {
            return Err(SpecError::SizeOutOfRange {
                size: self.size,
                min: MIN_ICON_SIZE,
                max: MAX_ICON_SIZE,
            });
        }
        Ok(())
    }

    /// Returns a copy with a different description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// ============================================================================
// RasterImage
// ============================================================================

/// A square RGBA image.
///
/// Renders are produced at [`WORKING_SIZE`] and resampled with
/// [`resized`](Self::resized) for previews and exports.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    data: RgbaImage,
}

impl RasterImage {
    /// Wraps an existing square image.
    pub fn new(data: RgbaImage) -> Result<Self, EncodeError> {
        if data.width() != data.height() {
            return Err(EncodeError::NotSquare {
                width: data.width(),
                height: data.height(),
            });
        }
        if data.width() == 0 {
            return Err(EncodeError::EmptyImage);
        }
        Ok(Self { data })
    }

    /// Creates a raster filled with one color.
    pub fn filled(size: u32, rgba: [u8; 4]) -> Result<Self, EncodeError> {
        Self::new(RgbaImage::from_pixel(size, size, image::Rgba(rgba)))
    }

    /// Builds a raster from raw RGBA bytes, row-major.
    pub fn from_rgba(size: u32, pixels: Vec<u8>) -> Result<Self, EncodeError> {
        let expected = size as usize * size as usize * 4;
        let actual = pixels.len();
        let data = RgbaImage::from_raw(size, size, pixels).ok_or(EncodeError::BufferSize {
            size,
            expected,
            actual,
        })?;
        Self::new(data)
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.data.width()
    }

    /// Borrow the underlying image.
    pub fn as_image(&self) -> &RgbaImage {
        &self.data
    }

    /// Raw RGBA bytes, row-major, top row first.
    pub fn pixels(&self) -> &[u8] {
        self.data.as_raw()
    }

    /// Consumes the raster, returning the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.data
    }

    /// Returns the RGBA quad at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.data.get_pixel(x, y).0
    }

    /// Resamples to `size x size`. Returns a clone when the size already matches.
    ///
    /// A size of 0 is treated as 1 so the result stays non-empty.
    pub fn resized(&self, size: u32) -> RasterImage {
        let size = size.max(1);
        if size == self.size() {
            return self.clone();
        }
        let filter = if size < self.size() {
            FilterType::Lanczos3
        } else {
            FilterType::CatmullRom
        };
        Self {
            data: imageops::resize(&self.data, size, size, filter),
        }
    }

    /// Resamples to every size in [`PREVIEW_SIZES`].
    pub fn previews(&self) -> Vec<RasterImage> {
        PREVIEW_SIZES.iter().map(|&s| self.resized(s)).collect()
    }

    /// Encodes the raster as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Cursor::new(Vec::new());
        self.data.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// Encodes the raster as a `data:image/png;base64,...` URL for display.
    pub fn to_data_url(&self) -> Result<String, EncodeError> {
        let png = self.to_png()?;
        Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
    }

    /// Decodes any supported image (PNG, JPEG) and rasterizes it at `size`.
    ///
    /// Non-square sources are stretched to fill the square, matching how a
    /// canvas `drawImage(img, 0, 0, size, size)` behaves.
    pub fn decode(bytes: &[u8], size: u32) -> Result<RasterImage, EncodeError> {
        if size == 0 {
            return Err(EncodeError::EmptyImage);
        }
        let img = image::load_from_memory(bytes)
            .map_err(|e| EncodeError::UnreadableSource(e.to_string()))?
            .to_rgba8();
        if img.width() == 0 || img.height() == 0 {
            return Err(EncodeError::EmptyImage);
        }
        let data = if img.width() == size && img.height() == size {
            img
        } else {
            imageops::resize(&img, size, size, FilterType::Lanczos3)
        };
        Self::new(data)
    }

    /// Decodes a base64 `data:` URL produced by [`to_data_url`](Self::to_data_url)
    /// or by the remote generator.
    pub fn from_data_url(url: &str, size: u32) -> Result<RasterImage, EncodeError> {
        let bytes = decode_data_url(url)?;
        Self::decode(&bytes, size)
    }
}

/// Extracts the payload of a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, EncodeError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| EncodeError::UnreadableSource("not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| EncodeError::UnreadableSource("data URL has no payload".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(EncodeError::UnreadableSource(
            "only base64 data URLs are supported".to_string(),
        ));
    }
    BASE64
        .decode(payload.trim())
        .map_err(|e| EncodeError::UnreadableSource(e.to_string()))
}
