//! Backdrop layer: the background gradient every icon sits on.

use resvg::tiny_skia::{GradientStop, Paint, Point, RadialGradient, Rect, SpreadMode, Transform};

use super::{LayerConfig, LayerEffect, RenderContext};
use crate::icon::WORKING_SIZE;

/// Configuration for the background fill.
///
/// The canvas is filled with a radial gradient centered on the canvas: the
/// background color at the center, darkened by `edge_darkening` percent
/// (see [`HexColor::adjust_brightness`](crate::HexColor::adjust_brightness))
/// at the edge. An `edge_darkening` of zero yields a flat fill.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropConfig {
    /// Brightness adjustment applied at the gradient's outer stop.
    pub edge_darkening: f64,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            edge_darkening: -30.0,
        }
    }
}

impl LayerConfig for BackdropConfig {
    fn differs_from(&self, other: &Self) -> bool {
        (self.edge_darkening - other.edge_darkening).abs() > 0.001
    }
}

impl LayerEffect for BackdropConfig {
    fn transform(&self, ctx: &mut RenderContext) {
        let center = ctx.spec.background_color;
        let edge = center.adjust_brightness(self.edge_darkening);

        if center == edge {
            ctx.canvas.fill(center.to_skia(1.0));
            return;
        }

        let mid = WORKING_SIZE as f32 / 2.0;
        let shader = RadialGradient::new(
            Point::from_xy(mid, mid),
            Point::from_xy(mid, mid),
            mid,
            vec![
                GradientStop::new(0.0, center.to_skia(1.0)),
                GradientStop::new(1.0, edge.to_skia(1.0)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        );

        let Some(shader) = shader else {
            ctx.canvas.fill(center.to_skia(1.0));
            return;
        };

        let mut paint = Paint::default();
        paint.shader = shader;
        let side = WORKING_SIZE as f32;
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, side, side) {
            ctx.canvas.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
}
