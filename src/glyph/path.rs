//! Path construction helpers for the glyph programs.

use std::f32::consts::{FRAC_PI_2, PI};

use resvg::tiny_skia::{Path, PathBuilder, Rect, Transform};

/// Appends a circular arc from angle `start` sweeping by `sweep` radians.
///
/// Angles follow canvas conventions: 0 points right, positive sweeps turn
/// clockwise on screen. If the builder is empty the arc starts with a
/// `move_to`, otherwise a line joins the current point to the arc start.
pub fn arc(pb: &mut PathBuilder, cx: f32, cy: f32, r: f32, start: f32, sweep: f32) {
    let (sx, sy) = (cx + r * start.cos(), cy + r * start.sin());
    if pb.is_empty() {
        pb.move_to(sx, sy);
    } else {
        pb.line_to(sx, sy);
    }

    let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / segments as f32;
    // Control point distance for a cubic approximating `step` radians.
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut a0 = start;
    for _ in 0..segments {
        let a1 = a0 + step;
        let (c0, s0) = (a0.cos(), a0.sin());
        let (c1, s1) = (a1.cos(), a1.sin());
        pb.cubic_to(
            cx + r * (c0 - k * s0),
            cy + r * (s0 + k * c0),
            cx + r * (c1 + k * s1),
            cy + r * (s1 - k * c1),
            cx + r * c1,
            cy + r * s1,
        );
        a0 = a1;
    }
}

/// A full circle.
pub fn circle(cx: f32, cy: f32, r: f32) -> Option<Path> {
    PathBuilder::from_circle(cx, cy, r)
}

/// An axis-aligned rectangle.
pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Option<Path> {
    Rect::from_xywh(x, y, w, h).map(PathBuilder::from_rect)
}

/// A rectangle with quadratic rounded corners.
pub fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<Path> {
    let r = radius.min(w / 2.0).min(h / 2.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

/// An ellipse centered on `(cx, cy)` rotated by `rotation` radians.
pub fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32) -> Option<Path> {
    let oval = PathBuilder::from_oval(Rect::from_xywh(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry)?)?;
    oval.transform(Transform::from_rotate_at(rotation.to_degrees(), cx, cy))
}

/// A closed polygon through `points`.
pub fn polygon(points: &[(f32, f32)]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish()
}

/// Alternates `count` outer and inner vertices around `(cx, cy)`, starting at
/// angle `start` on the outer radius.
pub fn radial_polygon(cx: f32, cy: f32, count: usize, outer: f32, inner: f32, start: f32) -> Option<Path> {
    let step = PI / count as f32;
    let points: Vec<(f32, f32)> = (0..count * 2)
        .map(|i| {
            let angle = start + i as f32 * step;
            let radius = if i % 2 == 0 { outer } else { inner };
            (cx + angle.cos() * radius, cy + angle.sin() * radius)
        })
        .collect();
    polygon(&points)
}

/// A star with `spikes` points, the first pointing straight up.
pub fn star(cx: f32, cy: f32, spikes: usize, outer: f32, inner: f32) -> Option<Path> {
    radial_polygon(cx, cy, spikes, outer, inner, 1.5 * PI)
}

/// A heart whose top dip sits at `(x, y)` and whose point is `size` below it.
pub fn heart(x: f32, y: f32, size: f32) -> Option<Path> {
    let top = size * 0.3;
    let half = size / 2.0;
    let mid = y + (size + top) / 2.0;
    let mut pb = PathBuilder::new();
    pb.move_to(x, y + top);
    pb.cubic_to(x, y, x - half, y, x - half, y + top);
    pb.cubic_to(x - half, mid, x, mid, x, y + size);
    pb.cubic_to(x, mid, x + half, mid, x + half, y + top);
    pb.cubic_to(x + half, y, x, y, x, y + top);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.5
    }

    #[test]
    fn arc_spans_expected_bounds() {
        let mut pb = PathBuilder::new();
        // Upper half circle, left to right.
        arc(&mut pb, 100.0, 100.0, 50.0, PI, PI);
        let path = pb.finish().unwrap();
        let b = path.bounds();
        assert!(close(b.left(), 50.0));
        assert!(close(b.right(), 150.0));
        assert!(close(b.top(), 50.0));
        assert!(close(b.bottom(), 100.0));
    }

    #[test]
    fn star_fits_outer_radius() {
        let path = star(256.0, 256.0, 5, 180.0, 90.0).unwrap();
        let b = path.bounds();
        assert!(close(b.top(), 76.0));
        assert!(b.bottom() < 256.0 + 180.0);
        assert!(close(b.left() + b.right(), 512.0));
    }

    #[test]
    fn ellipse_rotation_changes_bounds() {
        let flat = ellipse(0.0, 0.0, 30.0, 20.0, 0.0).unwrap().bounds();
        let tilted = ellipse(0.0, 0.0, 30.0, 20.0, -PI / 6.0).unwrap().bounds();
        assert!(close(flat.width(), 60.0));
        assert!(tilted.width() < flat.width());
        assert!(tilted.height() > flat.height());
    }

    #[test]
    fn polygon_requires_points() {
        assert!(polygon(&[]).is_none());
        assert!(polygon(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]).is_some());
    }

    #[test]
    fn radial_polygon_starts_on_outer_radius() {
        // Teeth of a gear: the first vertex points right.
        let b = radial_polygon(256.0, 256.0, 8, 160.0, 80.0, 0.0).unwrap().bounds();
        assert!(close(b.right(), 416.0));
        assert!(close(b.left(), 96.0));
        assert!(close(b.top(), 96.0));
    }
}
