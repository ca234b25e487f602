//! Glyph layer: the keyword-selected symbol with its drop shadow and sheen.
//!
//! The glyph is painted onto its own transparent pixmap first. That pixmap's
//! coverage drives both the shadow (blurred, tinted, offset and composited
//! beneath) and the highlight (clipped to the glyph with `SourceAtop`).

use log::debug;
use resvg::tiny_skia::{
    BlendMode, GradientStop, LinearGradient, Paint, Pixmap, PixmapPaint, Point, Rect, SpreadMode,
    Transform,
};

use super::raster::{alpha_plane, blur_alpha};
use super::{working_canvas, LayerConfig, LayerEffect, RenderContext, SelectedGlyph};
use crate::color::HexColor;
use crate::glyph::{select_glyph, Painter};
use crate::icon::WORKING_SIZE;

// ============================================================================
// Styles
// ============================================================================

/// A drop shadow cast by the glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowStyle {
    pub color: HexColor,

    /// Shadow opacity in `[0, 1]`.
    pub opacity: f32,

    /// Blur radius in canvas units; the Gaussian sigma is half of it.
    pub blur: f32,

    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            color: HexColor::BLACK,
            opacity: 0.3,
            blur: 10.0,
            offset_x: 0.0,
            offset_y: 5.0,
        }
    }
}

/// A white vertical sheen over the top of the glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightStyle {
    /// Opacity at the top of the canvas.
    pub opacity: f32,

    /// Fraction of the canvas height over which the sheen fades out.
    pub extent: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            opacity: 0.25,
            extent: 0.5,
        }
    }
}

// ============================================================================
// Layer Config
// ============================================================================

/// Configuration for the glyph layer.
///
/// The glyph itself always comes from the description; shadow and highlight
/// can each be turned off by setting them to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphLayerConfig {
    pub shadow: Option<ShadowStyle>,
    pub highlight: Option<HighlightStyle>,
}

impl Default for GlyphLayerConfig {
    fn default() -> Self {
        Self {
            shadow: Some(ShadowStyle::default()),
            highlight: Some(HighlightStyle::default()),
        }
    }
}

impl LayerConfig for GlyphLayerConfig {
    fn differs_from(&self, other: &Self) -> bool {
        self != other
    }
}

impl LayerEffect for GlyphLayerConfig {
    fn transform(&self, ctx: &mut RenderContext) {
        let kind = select_glyph(&ctx.spec.description);
        debug!("drawing {} glyph for {:?}", kind.name(), ctx.spec.description);

        let mut glyph = working_canvas();
        let mut painter = Painter::new(
            &mut glyph,
            ctx.spec.foreground_color,
            ctx.spec.background_color,
        );
        kind.draw(&mut painter);

        if let Some(highlight) = &self.highlight {
            apply_highlight(&mut glyph, highlight);
        }

        if let Some(shadow) = &self.shadow {
            let cast = cast_shadow(&glyph, shadow);
            ctx.canvas.draw_pixmap(
                shadow.offset_x.round() as i32,
                shadow.offset_y.round() as i32,
                cast.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }

        ctx.canvas.draw_pixmap(
            0,
            0,
            glyph.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn emit(&self, ctx: &mut RenderContext) {
        let kind = select_glyph(&ctx.spec.description);
        ctx.set(SelectedGlyph(kind));
    }
}

// ============================================================================
// Effects
// ============================================================================

/// Paints the sheen onto existing glyph pixels only.
fn apply_highlight(glyph: &mut Pixmap, style: &HighlightStyle) {
    let side = WORKING_SIZE as f32;
    let bottom = side * style.extent.clamp(0.0, 1.0);
    let Some(rect) = Rect::from_xywh(0.0, 0.0, side, bottom) else {
        return;
    };

    let top = HexColor::WHITE.to_skia(style.opacity);
    let shader = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(0.0, bottom),
        vec![
            GradientStop::new(0.0, top),
            GradientStop::new(1.0, HexColor::WHITE.to_skia(0.0)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    );
    let Some(shader) = shader else {
        return;
    };

    let mut paint = Paint::default();
    paint.shader = shader;
    paint.blend_mode = BlendMode::SourceAtop;
    glyph.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Builds the shadow pixmap from the glyph's blurred coverage.
fn cast_shadow(glyph: &Pixmap, style: &ShadowStyle) -> Pixmap {
    let (width, height) = (glyph.width() as usize, glyph.height() as usize);
    let mut plane = alpha_plane(glyph);
    blur_alpha(&mut plane, width, height, style.blur / 2.0);

    let opacity = style.opacity.clamp(0.0, 1.0);
    let (r, g, b) = style.color.channels();
    let mut shadow = working_canvas();
    for (px, &coverage) in shadow.data_mut().chunks_exact_mut(4).zip(&plane) {
        let a = (coverage as f32 * opacity).round();
        let premultiply = |c: u8| (c as f32 * a / 255.0).round() as u8;
        px[0] = premultiply(r);
        px[1] = premultiply(g);
        px[2] = premultiply(b);
        px[3] = a as u8;
    }
    shadow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphKind;
    use crate::icon::IconSpec;
    use crate::layer::BackdropConfig;
    use resvg::tiny_skia::Color;

    fn render(description: &str, config: &GlyphLayerConfig) -> RenderContext {
        let spec = IconSpec::from_hex(description, "#6366f1", "#ffffff", 256).unwrap();
        let mut ctx = RenderContext::new(spec);
        let backdrop = BackdropConfig { edge_darkening: 0.0 };
        backdrop.transform(&mut ctx);
        config.transform(&mut ctx);
        config.emit(&mut ctx);
        ctx
    }

    #[test]
    fn emits_selected_glyph() {
        let ctx = render("cog wheel", &GlyphLayerConfig::default());
        assert_eq!(ctx.get::<SelectedGlyph>(), Some(&SelectedGlyph(GlyphKind::Gear)));
    }

    #[test]
    fn shadow_darkens_below_the_glyph() {
        // Geometric glyph: bottom edge of the outer square at y=362.
        let plain = GlyphLayerConfig {
            shadow: None,
            highlight: None,
        };
        let with_shadow = GlyphLayerConfig {
            highlight: None,
            ..GlyphLayerConfig::default()
        };
        let a = render("xyz", &plain).to_raster();
        let b = render("xyz", &with_shadow).to_raster();

        let below_plain = a.pixel(256, 364);
        let below_shadow = b.pixel(256, 364);
        assert_eq!(below_plain, [0x63, 0x66, 0xf1, 255]);
        assert!(below_shadow[2] < below_plain[2], "{below_shadow:?}");

        // Far away from the glyph nothing changes.
        assert_eq!(a.pixel(20, 20), b.pixel(20, 20));
    }

    #[test]
    fn highlight_only_touches_glyph_pixels() {
        let plain = GlyphLayerConfig {
            shadow: None,
            highlight: None,
        };
        let lit = GlyphLayerConfig {
            shadow: None,
            ..GlyphLayerConfig::default()
        };
        let spec_fg = "#808080";
        let paint = |config: &GlyphLayerConfig| {
            let spec = IconSpec::from_hex("xyz", "#6366f1", spec_fg, 256).unwrap();
            let mut ctx = RenderContext::new(spec);
            BackdropConfig { edge_darkening: 0.0 }.transform(&mut ctx);
            config.transform(&mut ctx);
            ctx.to_raster()
        };
        let a = paint(&plain);
        let b = paint(&lit);

        // Top of the outer square is brightened.
        assert!(b.pixel(256, 160)[0] > a.pixel(256, 160)[0]);
        // Background above the glyph is untouched.
        assert_eq!(a.pixel(256, 100), b.pixel(256, 100));
        // Lower half is untouched.
        assert_eq!(a.pixel(160, 350), b.pixel(160, 350));
    }

    #[test]
    fn shadow_pixmap_is_tinted_and_faded() {
        let mut glyph = working_canvas();
        glyph.fill(Color::WHITE);
        let shadow = cast_shadow(&glyph, &ShadowStyle::default());
        let center = shadow.pixel(256, 256).unwrap();
        // 255 * 0.3 rounds to 77.
        assert_eq!(center.alpha(), 77);
        assert_eq!(center.red(), 0);
    }
}
