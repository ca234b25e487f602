//! iconmaker: procedural icon rendering and ICO encoding
//!
//! This crate turns a short description plus two colors into a 512x512
//! raster icon, and exports it as PNG or as a single-image ICO file.
//!
//! A keyword table picks one of eleven glyph routines from the description;
//! the glyph is painted over a radial background gradient with a drop shadow
//! and a soft highlight. An optional remote generator can be consulted first,
//! with the procedural renderer as the fallback.
//!
//! # Example
//!
//! ```
//! use iconmaker::{export, ExportFormat, IconRenderer, IconSpec};
//!
//! let spec = IconSpec::from_hex("settings gear", "#6366f1", "#ffffff", 32).unwrap();
//! let raster = IconRenderer::new().render(&spec);
//!
//! let ico = export(&raster, spec.size, "gear", ExportFormat::Ico).unwrap();
//! assert_eq!(ico.file_name, "gear_32x32.ico");
//! assert_eq!(ico.bytes.len(), 4286);
//! ```
//!
//! # Configurable Rendering
//!
//! Renderer settings travel as [`RenderOptions`], applied through the
//! [`Configurable`] trait:
//!
//! ```
//! use iconmaker::{Configurable, IconRenderer, RenderOptions};
//!
//! let mut renderer = IconRenderer::new();
//! renderer.apply_options(&RenderOptions::default().with_grain(7));
//!
//! let json = renderer.export_options().to_json().unwrap();
//! assert!(json.contains("\"seed\":7"));
//! ```
//!
//! # Brightness
//!
//! ```
//! assert_eq!(iconmaker::adjust_brightness("#6366f1", 0).as_deref(), Some("#6366f1"));
//! assert_eq!(iconmaker::adjust_brightness("#ffffff", 40).as_deref(), Some("#ffffff"));
//! ```

mod color;
mod error;
mod export;
mod generator;
mod glyph;
mod ico;
mod icon;
mod layer;
mod library;
mod renderer;

#[cfg(feature = "canvas")]
mod canvas;
#[cfg(feature = "remote")]
mod remote;

#[cfg(feature = "canvas")]
pub use canvas::IconStudio;
pub use color::{HexColor, adjust_brightness};
pub use error::{EncodeError, GenerationError, LibraryError, SpecError};
pub use export::{Export, ExportFormat, export, file_name};
pub use generator::{
    Generated, GenerationSource, IconGenerator, ProceduralGenerator, classify_status,
    generate_with_fallback,
};
pub use glyph::{GLYPH_RULES, GlyphKind, GlyphRule, Painter, select_glyph};
pub use ico::{
    BitmapInfoHeader, IcoHeader, IconDirEntry, IconDirHeader, encode_ico, encode_ico_image,
    ico_len, read_ico_header,
};
pub use icon::{
    EXAMPLE_PROMPTS, IconSize, IconSpec, MAX_ICON_SIZE, MIN_ICON_SIZE, PRESET_COLORS,
    PREVIEW_SIZES, PromptCategory, RasterImage, WORKING_SIZE, decode_data_url,
};
pub use layer::{
    BackdropConfig, GlyphLayerConfig, GrainConfig, HighlightStyle, Layer, LayerConfig,
    LayerEffect, LayerPipeline, RenderContext, SelectedGlyph, ShadowStyle,
};
pub use library::{IconLibrary, KeyValueStore, LIBRARY_KEY, MemoryStore, SavedIcon};
#[cfg(feature = "remote")]
pub use remote::{GenerateResponse, RemoteConfig, RemoteGenerator, interpret_response};
pub use renderer::{Configurable, GrainSettings, IconRenderer, RenderOptions};
