//! Layer infrastructure for procedural icon rendering.
//!
//! A render is a fixed sequence of layers painting onto one working canvas.
//! Each layer pairs an optional configuration with an enabled flag, so a layer
//! can be switched off without losing its settings.
//!
//! # Architecture
//!
//! Each layer config implements [`LayerEffect`], which defines:
//! - How the layer paints onto the canvas
//! - What properties it emits for downstream layers and the caller
//!
//! Properties flow through the pipeline via [`RenderContext`], so layers
//! never reference each other directly.

pub mod backdrop;
pub mod glyph;
pub mod grain;
pub mod raster;

pub use backdrop::BackdropConfig;
pub use glyph::{GlyphLayerConfig, HighlightStyle, ShadowStyle};
pub use grain::GrainConfig;

use std::any::{Any, TypeId};
use std::collections::HashMap;

use resvg::tiny_skia::Pixmap;

use crate::glyph::GlyphKind;
use crate::icon::{IconSpec, RasterImage, WORKING_SIZE};

// ============================================================================
// Render Context
// ============================================================================

/// Context that flows through the rendering pipeline.
///
/// Holds the request being rendered, the working canvas, and a typed property
/// bag that layers use to pass facts downstream.
///
/// # Example
///
/// ```ignore
/// // The glyph layer records which routine it picked
/// ctx.set(SelectedGlyph(GlyphKind::Star));
///
/// // The renderer reads it back after the pipeline ran
/// if let Some(SelectedGlyph(kind)) = ctx.get::<SelectedGlyph>() {
///     // ...
/// }
/// ```
pub struct RenderContext {
    /// The request being rendered.
    pub spec: IconSpec,

    /// The working canvas, [`WORKING_SIZE`] pixels square.
    pub canvas: Pixmap,

    /// Typed property bag for inter-layer communication.
    properties: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RenderContext {
    /// Creates a context with a transparent working canvas.
    pub fn new(spec: IconSpec) -> Self {
        Self {
            spec,
            canvas: working_canvas(),
            properties: HashMap::new(),
        }
    }

    /// Sets a typed property that downstream layers can read.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.properties.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Gets a typed property set by an upstream layer.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.properties
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    /// Checks if a property has been set.
    pub fn has<T: Any + Send + Sync>(&self) -> bool {
        self.properties.contains_key(&TypeId::of::<T>())
    }

    /// Converts the working canvas into a straight-alpha raster.
    pub fn to_raster(&self) -> RasterImage {
        raster::pixmap_to_raster(&self.canvas)
    }
}

/// Allocates an empty working canvas.
pub(crate) fn working_canvas() -> Pixmap {
    // Only fails for zero or overflowing dimensions.
    Pixmap::new(WORKING_SIZE, WORKING_SIZE).expect("working canvas size is valid")
}

// ============================================================================
// Common Properties
// ============================================================================

/// The glyph routine the keyword table selected for this render.
///
/// Emitted by the glyph layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedGlyph(pub GlyphKind);

// ============================================================================
// Layer Traits
// ============================================================================

/// Trait for layer configuration types.
///
/// Implementations decide when two configurations would paint differently,
/// which is what [`Layer::set_config`] reports back to the caller.
pub trait LayerConfig: Clone {
    /// Returns true if this config differs from another in a way that
    /// would produce different rendering output.
    fn differs_from(&self, other: &Self) -> bool;
}

/// Trait for layer configurations that know how to paint themselves.
///
/// The separation of [`transform`](Self::transform) and [`emit`](Self::emit)
/// gives property emission one canonical place.
pub trait LayerEffect: LayerConfig {
    /// Paint onto `ctx.canvas`.
    fn transform(&self, ctx: &mut RenderContext);

    /// Emit properties for downstream layers to consume.
    ///
    /// Called after [`transform`](Self::transform). The default implementation
    /// emits nothing.
    fn emit(&self, _ctx: &mut RenderContext) {}
}

// ============================================================================
// Generic Layer
// ============================================================================

/// A layer slot: optional configuration plus an enabled flag.
pub struct Layer<C: LayerConfig> {
    config: Option<C>,
    enabled: bool,
}

impl<C: LayerConfig> Default for Layer<C> {
    fn default() -> Self {
        Self {
            config: None,
            enabled: true,
        }
    }
}

impl<C: LayerConfig> Layer<C> {
    /// Creates an enabled layer with the given config.
    pub fn with_config(config: C) -> Self {
        Self {
            config: Some(config),
            enabled: true,
        }
    }

    /// Returns the current configuration, if any.
    pub fn config(&self) -> Option<&C> {
        self.config.as_ref()
    }

    /// Returns true if this layer is active (has config AND is enabled).
    pub fn is_active(&self) -> bool {
        self.enabled && self.config.is_some()
    }

    /// Returns true if the layer has a configuration set.
    pub fn has_config(&self) -> bool {
        self.config.is_some()
    }

    /// Returns whether the layer is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets whether the layer is enabled.
    ///
    /// Returns true if the enabled state changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }

    /// Sets the configuration. Returns true if it changed.
    pub fn set_config(&mut self, config: Option<C>) -> bool {
        let differs = match (&self.config, &config) {
            (None, None) => false,
            (Some(_), None) | (None, Some(_)) => true,
            (Some(old), Some(new)) => old.differs_from(new),
        };
        if differs {
            self.config = config;
        }
        differs
    }
}

impl<C: LayerEffect> Layer<C> {
    /// Apply this layer to the render context.
    ///
    /// Inactive layers leave the context untouched.
    pub fn apply(&self, ctx: &mut RenderContext) {
        let Some(config) = self.config.as_ref().filter(|_| self.enabled) else {
            return;
        };
        config.transform(ctx);
        config.emit(ctx);
    }
}

// ============================================================================
// Layer Pipeline
// ============================================================================

/// The fixed layer order of a procedural render.
///
/// ```text
/// ┌──────────┐
/// │ Backdrop │  radial gradient from the background color
/// └────┬─────┘
///      ▼
/// ┌──────────┐
/// │  Grain   │  seeded noise (disabled by default)
/// └────┬─────┘
///      ▼
/// ┌──────────┐
/// │  Glyph   │  shadow, keyword-selected glyph, highlight
/// └──────────┘
/// ```
pub struct LayerPipeline {
    /// Background gradient.
    pub backdrop: Layer<BackdropConfig>,

    /// Cosmetic noise over the background.
    pub grain: Layer<GrainConfig>,

    /// The glyph with its shadow and highlight.
    pub glyph: Layer<GlyphLayerConfig>,
}

impl Default for LayerPipeline {
    fn default() -> Self {
        let mut grain = Layer::with_config(GrainConfig::default());
        grain.set_enabled(false);
        Self {
            backdrop: Layer::with_config(BackdropConfig::default()),
            grain,
            glyph: Layer::with_config(GlyphLayerConfig::default()),
        }
    }
}

impl LayerPipeline {
    /// Runs every layer in order and returns the finished context.
    pub fn run(&self, spec: &IconSpec) -> RenderContext {
        let mut ctx = RenderContext::new(spec.clone());
        self.backdrop.apply(&mut ctx);
        self.grain.apply(&mut ctx);
        self.glyph.apply(&mut ctx);
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(description: &str) -> IconSpec {
        IconSpec::from_hex(description, "#6366f1", "#ffffff", 256).unwrap()
    }

    #[test]
    fn layer_set_config_reports_changes() {
        let mut layer: Layer<GrainConfig> = Layer::default();
        assert!(layer.is_enabled());
        assert!(!layer.is_active());

        assert!(layer.set_config(Some(GrainConfig::new(7, 8))));
        assert!(layer.is_active());

        assert!(!layer.set_config(Some(GrainConfig::new(7, 8))));
        assert!(layer.set_config(Some(GrainConfig::new(8, 8))));
        assert!(layer.set_config(None));
        assert!(!layer.has_config());
    }

    #[test]
    fn layer_toggle_keeps_config() {
        let mut layer = Layer::with_config(GrainConfig::new(42, 6));
        assert!(layer.set_enabled(false));
        assert!(!layer.is_active());
        assert_eq!(layer.config().unwrap().seed, 42);
        assert!(!layer.set_enabled(false));
        assert!(layer.set_enabled(true));
        assert!(layer.is_active());
    }

    #[test]
    fn default_pipeline_disables_grain() {
        let pipeline = LayerPipeline::default();
        assert!(pipeline.backdrop.is_active());
        assert!(pipeline.glyph.is_active());
        assert!(pipeline.grain.has_config());
        assert!(!pipeline.grain.is_active());
    }

    #[test]
    fn glyph_layer_emits_selection() {
        let ctx = LayerPipeline::default().run(&spec("a golden star"));
        assert_eq!(ctx.get::<SelectedGlyph>(), Some(&SelectedGlyph(GlyphKind::Star)));
    }

    #[test]
    fn disabled_glyph_layer_emits_nothing() {
        let mut pipeline = LayerPipeline::default();
        pipeline.glyph.set_enabled(false);
        let ctx = pipeline.run(&spec("heart"));
        assert!(!ctx.has::<SelectedGlyph>());

        // Only the backdrop was painted: the center is the background color.
        let center = ctx.to_raster().pixel(256, 256);
        for (got, want) in center.iter().zip([0x63u8, 0x66, 0xf1, 255]) {
            assert!(got.abs_diff(want) <= 1, "{center:?}");
        }
    }

    #[test]
    fn empty_pipeline_leaves_canvas_transparent() {
        let mut pipeline = LayerPipeline::default();
        pipeline.backdrop.set_config(None);
        pipeline.glyph.set_enabled(false);
        let raster = pipeline.run(&spec("anything")).to_raster();
        assert_eq!(raster.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(raster.size(), WORKING_SIZE);
    }
}
