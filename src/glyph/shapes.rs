//! Glyph programs for the 512x512 working canvas.
//!
//! Every routine paints at fixed coordinates. Foreground paths use the icon's
//! foreground color (or a brightness-adjusted shade of it); cut-outs use the
//! background color so they read as holes once composited.

use std::f32::consts::PI;

use resvg::tiny_skia::{FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use super::path;
use crate::color::HexColor;

// ============================================================================
// Painter
// ============================================================================

/// A drawing surface plus the two colors of the icon being rendered.
pub struct Painter<'a> {
    pixmap: &'a mut Pixmap,
    foreground: HexColor,
    background: HexColor,
}

impl<'a> Painter<'a> {
    pub fn new(pixmap: &'a mut Pixmap, foreground: HexColor, background: HexColor) -> Self {
        Self {
            pixmap,
            foreground,
            background,
        }
    }

    pub fn foreground(&self) -> HexColor {
        self.foreground
    }

    pub fn background(&self) -> HexColor {
        self.background
    }

    /// Fills a path with a solid color. `None` paths are skipped.
    pub fn fill(&mut self, path: Option<Path>, color: HexColor) {
        let Some(path) = path else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &solid(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Strokes a path with butt caps and miter joins.
    pub fn stroke(&mut self, path: Option<Path>, color: HexColor, width: f32) {
        let Some(path) = path else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
    }

    /// Fills an axis-aligned rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: HexColor) {
        self.fill(path::rect(x, y, w, h), color);
    }
}

fn solid(color: HexColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia(1.0));
    paint.anti_alias = true;
    paint
}

// ============================================================================
// Glyphs
// ============================================================================

/// A disc with a background-colored ring inside it.
pub fn circle(p: &mut Painter<'_>) {
    let (fg, bg) = (p.foreground(), p.background());
    p.fill(path::circle(256.0, 256.0, 180.0), fg);
    p.stroke(path::circle(256.0, 256.0, 120.0), bg, 30.0);
}

pub fn star(p: &mut Painter<'_>) {
    let fg = p.foreground();
    p.fill(path::star(256.0, 256.0, 5, 180.0, 90.0), fg);
}

/// A heart whose upper dip sits on the canvas center.
pub fn heart(p: &mut Painter<'_>) {
    let fg = p.foreground();
    p.fill(path::heart(256.0, 256.0, 180.0), fg);
}

/// An arrow pointing left, tip at x=150.
pub fn arrow(p: &mut Painter<'_>) {
    let fg = p.foreground();
    p.fill(
        path::polygon(&[
            (150.0, 256.0),
            (320.0, 180.0),
            (320.0, 220.0),
            (380.0, 220.0),
            (380.0, 292.0),
            (320.0, 292.0),
            (320.0, 332.0),
        ]),
        fg,
    );
}

/// Eight pointed teeth around a central hole.
pub fn gear(p: &mut Painter<'_>) {
    let (fg, bg) = (p.foreground(), p.background());
    p.fill(path::radial_polygon(256.0, 256.0, 8, 160.0, 80.0, 0.0), fg);
    p.fill(path::circle(256.0, 256.0, 50.0), bg);
}

pub fn house(p: &mut Painter<'_>) {
    let (fg, bg) = (p.foreground(), p.background());
    p.fill_rect(150.0, 250.0, 212.0, 180.0, fg);
    p.fill(
        path::polygon(&[(256.0, 150.0), (120.0, 270.0), (392.0, 270.0)]),
        fg,
    );
    // Door and windows.
    p.fill_rect(220.0, 350.0, 72.0, 80.0, bg);
    p.fill_rect(180.0, 280.0, 40.0, 40.0, bg);
    p.fill_rect(292.0, 280.0, 40.0, 40.0, bg);
}

pub fn envelope(p: &mut Painter<'_>) {
    let (fg, bg) = (p.foreground(), p.background());
    p.fill_rect(120.0, 200.0, 272.0, 200.0, fg);
    p.fill(
        path::polygon(&[(120.0, 200.0), (256.0, 300.0), (392.0, 200.0)]),
        fg,
    );

    let mut fold = PathBuilder::new();
    fold.move_to(140.0, 220.0);
    fold.line_to(256.0, 320.0);
    fold.line_to(372.0, 220.0);
    p.stroke(fold.finish(), bg, 4.0);
}

/// An eighth note: tilted head, stem and a curled flag.
pub fn music_note(p: &mut Painter<'_>) {
    let fg = p.foreground();
    p.fill(path::ellipse(200.0, 350.0, 30.0, 20.0, -PI / 6.0), fg);
    p.fill_rect(225.0, 180.0, 8.0, 170.0, fg);

    let mut flag = PathBuilder::new();
    flag.move_to(233.0, 180.0);
    flag.quad_to(280.0, 160.0, 300.0, 200.0);
    flag.quad_to(280.0, 180.0, 233.0, 200.0);
    flag.close();
    p.fill(flag.finish(), fg);
}

pub fn camera(p: &mut Painter<'_>) {
    let (fg, bg) = (p.foreground(), p.background());
    p.fill_rect(150.0, 200.0, 212.0, 150.0, fg);
    // Lens ring and flash are shaded so they stand out from the body.
    p.fill(path::circle(256.0, 275.0, 60.0), fg.adjust_brightness(-20.0));
    p.fill(path::circle(256.0, 275.0, 35.0), bg);
    p.fill_rect(320.0, 210.0, 30.0, 20.0, fg.adjust_brightness(20.0));
}

/// A padlock: body, arched shackle and keyhole.
pub fn lock(p: &mut Painter<'_>) {
    let (fg, bg) = (p.foreground(), p.background());
    p.fill_rect(180.0, 280.0, 152.0, 120.0, fg);

    let mut shackle = PathBuilder::new();
    path::arc(&mut shackle, 256.0, 240.0, 50.0, PI, PI);
    p.stroke(shackle.finish(), fg, 16.0);

    p.fill(path::circle(256.0, 330.0, 15.0), bg);
    p.fill_rect(251.0, 330.0, 10.0, 25.0, bg);
}

/// Three nested rounded squares, the middle one a lighter shade.
pub fn geometric(p: &mut Painter<'_>) {
    let (fg, bg) = (p.foreground(), p.background());
    p.fill(path::rounded_rect(150.0, 150.0, 212.0, 212.0, 20.0), fg);
    p.fill(
        path::rounded_rect(180.0, 180.0, 152.0, 152.0, 20.0),
        fg.adjust_brightness(40.0),
    );
    p.fill(path::rounded_rect(210.0, 210.0, 92.0, 92.0, 20.0), bg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphKind;

    const FG: HexColor = HexColor::from_rgb(255, 255, 255);
    const BG: HexColor = HexColor::from_rgb(0x63, 0x66, 0xf1);

    fn draw(kind: GlyphKind) -> Pixmap {
        let mut pixmap = Pixmap::new(512, 512).unwrap();
        kind.draw(&mut Painter::new(&mut pixmap, FG, BG));
        pixmap
    }

    fn rgba(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let px = pixmap.pixel(x, y).unwrap().demultiply();
        [px.red(), px.green(), px.blue(), px.alpha()]
    }

    #[test]
    fn every_glyph_paints_something() {
        for kind in [
            GlyphKind::Circle,
            GlyphKind::Star,
            GlyphKind::Heart,
            GlyphKind::Arrow,
            GlyphKind::Gear,
            GlyphKind::House,
            GlyphKind::Envelope,
            GlyphKind::Music,
            GlyphKind::Camera,
            GlyphKind::Lock,
            GlyphKind::Geometric,
        ] {
            let pixmap = draw(kind);
            assert!(
                pixmap.pixels().iter().any(|p| p.alpha() == 255),
                "{} drew nothing",
                kind.name()
            );
            // Corners are never touched.
            assert_eq!(rgba(&pixmap, 0, 0)[3], 0, "{}", kind.name());
        }
    }

    #[test]
    fn circle_has_background_ring() {
        let pixmap = draw(GlyphKind::Circle);
        assert_eq!(rgba(&pixmap, 256, 256), [255, 255, 255, 255]);
        // On the ring at radius 120.
        assert_eq!(rgba(&pixmap, 376, 256), [0x63, 0x66, 0xf1, 255]);
        // Between the ring and the rim.
        assert_eq!(rgba(&pixmap, 256, 256 + 160), [255, 255, 255, 255]);
    }

    #[test]
    fn gear_has_center_hole() {
        let pixmap = draw(GlyphKind::Gear);
        assert_eq!(rgba(&pixmap, 256, 256), [0x63, 0x66, 0xf1, 255]);
        // Tooth tip pointing right.
        assert_eq!(rgba(&pixmap, 400, 256)[3], 255);
    }

    #[test]
    fn house_door_is_cut_out() {
        let pixmap = draw(GlyphKind::House);
        assert_eq!(rgba(&pixmap, 256, 400), [0x63, 0x66, 0xf1, 255]);
        assert_eq!(rgba(&pixmap, 256, 200), [255, 255, 255, 255]);
    }

    #[test]
    fn geometric_layers_nest() {
        let pixmap = draw(GlyphKind::Geometric);
        assert_eq!(rgba(&pixmap, 160, 256), [255, 255, 255, 255]);
        assert_eq!(rgba(&pixmap, 256, 256), [0x63, 0x66, 0xf1, 255]);
        // White cannot get brighter.
        assert_eq!(rgba(&pixmap, 190, 256), [255, 255, 255, 255]);
    }

    #[test]
    fn lock_shackle_is_an_arch() {
        let pixmap = draw(GlyphKind::Lock);
        // Top of the shackle.
        assert_eq!(rgba(&pixmap, 256, 190)[3], 255);
        // Inside the arch stays empty.
        assert_eq!(rgba(&pixmap, 256, 240)[3], 0);
    }
}
