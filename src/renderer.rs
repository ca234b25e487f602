//! Procedural icon renderer with a layered pipeline.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::glyph::GlyphKind;
use crate::icon::{IconSpec, RasterImage};
use crate::layer::{
    BackdropConfig, GlyphLayerConfig, GrainConfig, HighlightStyle, LayerPipeline, SelectedGlyph,
    ShadowStyle,
};

// ============================================================================
// Render Options
// ============================================================================

/// Serializable settings for the grain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct GrainSettings {
    /// Noise seed. Equal seeds give equal textures.
    pub seed: u64,

    /// Maximum per-channel offset.
    pub amplitude: u8,

    /// Whether this layer is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for GrainSettings {
    fn default() -> Self {
        let config = GrainConfig::default();
        Self {
            seed: config.seed,
            amplitude: config.amplitude,
            enabled: false,
        }
    }
}

/// Renderer options in a form that can cross a process or wasm boundary.
///
/// ```json
/// {
///   "edgeDarkening": -30.0,
///   "grain": { "seed": 448, "amplitude": 6, "enabled": false },
///   "shadow": true,
///   "highlight": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify), tsify(into_wasm_abi, from_wasm_abi))]
pub struct RenderOptions {
    /// Brightness adjustment at the rim of the background gradient.
    #[serde(default = "default_edge_darkening")]
    pub edge_darkening: f64,

    #[serde(default)]
    pub grain: GrainSettings,

    /// Drop shadow beneath the glyph.
    #[serde(default = "default_true")]
    pub shadow: bool,

    /// White sheen over the top half of the glyph.
    #[serde(default = "default_true")]
    pub highlight: bool,
}

fn default_true() -> bool {
    true
}

fn default_edge_darkening() -> f64 {
    BackdropConfig::default().edge_darkening
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            edge_darkening: default_edge_darkening(),
            grain: GrainSettings::default(),
            shadow: true,
            highlight: true,
        }
    }
}

impl RenderOptions {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Enables grain with the given seed.
    pub fn with_grain(mut self, seed: u64) -> Self {
        self.grain.seed = seed;
        self.grain.enabled = true;
        self
    }
}

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from [`RenderOptions`].
pub trait Configurable {
    /// Applies the options to this instance.
    fn apply_options(&mut self, options: &RenderOptions);

    /// Exports the current settings as options.
    fn export_options(&self) -> RenderOptions;
}

// ============================================================================
// IconRenderer
// ============================================================================

/// The procedural icon renderer.
///
/// Renders an [`IconSpec`] onto a fresh 512x512 canvas through a fixed
/// [`LayerPipeline`] and returns the working-resolution raster. Resampling to
/// the export size happens at export time.
///
/// Rendering never fails, and the same spec with the same options always
/// produces the same pixels.
///
/// # Example
///
/// ```
/// use iconmaker::{IconRenderer, IconSpec, GlyphKind};
///
/// let renderer = IconRenderer::new();
/// let spec = IconSpec::from_hex("gold star", "#6366f1", "#ffd700", 64).unwrap();
/// let (raster, glyph) = renderer.render_with_glyph(&spec);
///
/// assert_eq!(glyph, GlyphKind::Star);
/// assert_eq!(raster.size(), 512);
/// ```
pub struct IconRenderer {
    /// The layer pipeline. Access layers directly to configure them.
    pub pipeline: LayerPipeline,
}

impl Default for IconRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl IconRenderer {
    /// Creates a renderer with the default pipeline (grain off).
    pub fn new() -> Self {
        Self {
            pipeline: LayerPipeline::default(),
        }
    }

    /// Creates a renderer configured from options.
    pub fn with_options(options: &RenderOptions) -> Self {
        let mut renderer = Self::new();
        renderer.apply_options(options);
        renderer
    }

    /// Renders the spec at working resolution.
    pub fn render(&self, spec: &IconSpec) -> RasterImage {
        self.render_with_glyph(spec).0
    }

    /// Renders the spec and reports which glyph routine was drawn.
    ///
    /// With the glyph layer disabled the keyword table is still consulted, so
    /// the reported glyph is what would have been drawn.
    pub fn render_with_glyph(&self, spec: &IconSpec) -> (RasterImage, GlyphKind) {
        let ctx = self.pipeline.run(spec);
        let glyph = ctx
            .get::<SelectedGlyph>()
            .map(|selected| selected.0)
            .unwrap_or_else(|| crate::glyph::select_glyph(&spec.description));
        debug!(
            "rendered {} glyph on {} (fg {})",
            glyph.name(),
            spec.background_color,
            spec.foreground_color
        );
        (ctx.to_raster(), glyph)
    }
}

impl Configurable for IconRenderer {
    fn apply_options(&mut self, options: &RenderOptions) {
        self.pipeline.backdrop.set_config(Some(BackdropConfig {
            edge_darkening: options.edge_darkening,
        }));

        self.pipeline.grain.set_config(Some(GrainConfig::new(
            options.grain.seed,
            options.grain.amplitude,
        )));
        self.pipeline.grain.set_enabled(options.grain.enabled);

        self.pipeline.glyph.set_config(Some(GlyphLayerConfig {
            shadow: options.shadow.then(ShadowStyle::default),
            highlight: options.highlight.then(HighlightStyle::default),
        }));
    }

    fn export_options(&self) -> RenderOptions {
        let edge_darkening = self
            .pipeline
            .backdrop
            .config()
            .map(|c| c.edge_darkening)
            .unwrap_or(0.0);

        let grain = self
            .pipeline
            .grain
            .config()
            .map(|c| GrainSettings {
                seed: c.seed,
                amplitude: c.amplitude,
                enabled: self.pipeline.grain.is_enabled(),
            })
            .unwrap_or(GrainSettings {
                enabled: false,
                ..GrainSettings::default()
            });

        let glyph = self.pipeline.glyph.config();
        RenderOptions {
            edge_darkening,
            grain,
            shadow: glyph.is_some_and(|c| c.shadow.is_some()),
            highlight: glyph.is_some_and(|c| c.highlight.is_some()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(description: &str) -> IconSpec {
        IconSpec::from_hex(description, "#6366f1", "#ffffff", 256).unwrap()
    }

    #[test]
    fn render_is_deterministic() {
        let renderer = IconRenderer::new();
        let a = renderer.render(&spec("music note"));
        let b = renderer.render(&spec("music note"));
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn seeded_grain_is_deterministic() {
        let options = RenderOptions::default().with_grain(77);
        let a = IconRenderer::with_options(&options).render(&spec("lock"));
        let b = IconRenderer::with_options(&options).render(&spec("lock"));
        assert_eq!(a.pixels(), b.pixels());

        let plain = IconRenderer::new().render(&spec("lock"));
        assert_ne!(a.pixels(), plain.pixels());
    }

    #[test]
    fn keyword_priority_reaches_the_canvas() {
        let renderer = IconRenderer::new();
        let (_, glyph) = renderer.render_with_glyph(&spec("round star icon"));
        assert_eq!(glyph, GlyphKind::Circle);
    }

    #[test]
    fn unmatched_description_draws_geometric() {
        let renderer = IconRenderer::new();
        let (raster, glyph) = renderer.render_with_glyph(&spec("xyz nonsense"));
        assert_eq!(glyph, GlyphKind::Geometric);
        // The innermost square is a background-colored cut-out.
        let center = raster.pixel(256, 256);
        assert!(center[2] > 200 && center[0] < 120, "{center:?}");
    }

    #[test]
    fn disabled_glyph_still_reports_selection() {
        let mut renderer = IconRenderer::new();
        renderer.pipeline.glyph.set_enabled(false);
        let (_, glyph) = renderer.render_with_glyph(&spec("envelope"));
        assert_eq!(glyph, GlyphKind::Envelope);
    }

    #[test]
    fn options_round_trip_through_renderer() {
        let options = RenderOptions {
            edge_darkening: -50.0,
            grain: GrainSettings {
                seed: 5,
                amplitude: 3,
                enabled: true,
            },
            shadow: false,
            highlight: true,
        };
        let renderer = IconRenderer::with_options(&options);
        assert_eq!(renderer.export_options(), options);
        assert!(renderer.pipeline.grain.is_active());
        assert!(renderer.pipeline.glyph.config().unwrap().shadow.is_none());
    }

    #[test]
    fn default_options_match_default_pipeline() {
        assert_eq!(IconRenderer::new().export_options(), RenderOptions::default());
    }

    #[test]
    fn options_json_fills_defaults() {
        let options = RenderOptions::from_json(r#"{"shadow": false}"#).unwrap();
        assert!(!options.shadow);
        assert!(options.highlight);
        assert_eq!(options.edge_darkening, -30.0);
        assert!(!options.grain.enabled);

        let json = options.to_json().unwrap();
        assert!(json.contains("\"edgeDarkening\""));
        assert_eq!(RenderOptions::from_json(&json).unwrap(), options);
    }
}
