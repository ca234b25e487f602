//! Pixel-level helpers shared by the layers.
//!
//! tiny-skia stores premultiplied RGBA; everything leaving the renderer is
//! straight alpha, so conversion happens once at the end of a render.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::Pixmap;

use crate::icon::RasterImage;

// ============================================================================
// Conversion
// ============================================================================

/// Converts a tiny-skia pixmap into a straight-alpha raster.
pub fn pixmap_to_raster(pixmap: &Pixmap) -> RasterImage {
    let image = pixmap_to_rgba_image(pixmap);
    // Pixmaps in this crate are always square and non-empty.
    RasterImage::new(image).expect("working canvas is square")
}

/// Converts a tiny-skia pixmap to an `image::RgbaImage`.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let (r, g, b, a) = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
        *dst = Rgba([r, g, b, a]);
    }
    img
}

/// Unpremultiplies a premultiplied alpha pixel, rounding to nearest.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    match a {
        0 => (0, 0, 0, 0),
        255 => (r, g, b, 255),
        _ => {
            let alpha = a as u32;
            let channel = |c: u8| ((c as u32 * 255 + alpha / 2) / alpha).min(255) as u8;
            (channel(r), channel(g), channel(b), a)
        }
    }
}

// ============================================================================
// Blur
// ============================================================================

/// Extracts the alpha channel of a pixmap.
pub fn alpha_plane(pixmap: &Pixmap) -> Vec<u8> {
    pixmap.pixels().iter().map(|p| p.alpha()).collect()
}

/// Approximates a Gaussian blur of an alpha plane with three box passes.
///
/// `sigma` follows the canvas convention of `shadowBlur / 2`.
pub fn blur_alpha(plane: &mut [u8], width: usize, height: usize, sigma: f32) {
    if sigma <= 0.0 || width == 0 || height == 0 {
        return;
    }
    let radius = box_radius(sigma);
    let mut scratch = vec![0u8; plane.len()];
    for _ in 0..3 {
        box_blur_horizontal(plane, &mut scratch, width, height, radius);
        box_blur_vertical(&scratch, plane, width, height, radius);
    }
}

/// Box radius whose three-fold repetition matches a Gaussian of `sigma`.
fn box_radius(sigma: f32) -> usize {
    // Three boxes of width w have variance 3 * (w^2 - 1) / 12.
    let width = (4.0 * sigma * sigma + 1.0).sqrt();
    ((width - 1.0) / 2.0).round().max(1.0) as usize
}

fn box_blur_horizontal(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize) {
    let span = (2 * radius + 1) as u32;
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        let out = &mut dst[y * width..(y + 1) * width];
        let mut sum: u32 = 0;
        for x in 0..=radius.min(width - 1) {
            sum += row[x] as u32;
        }
        for (x, px) in out.iter_mut().enumerate() {
            *px = ((sum + span / 2) / span) as u8;
            if x + radius + 1 < width {
                sum += row[x + radius + 1] as u32;
            }
            if x >= radius {
                sum -= row[x - radius] as u32;
            }
        }
    }
}

fn box_blur_vertical(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize) {
    let span = (2 * radius + 1) as u32;
    for x in 0..width {
        let mut sum: u32 = 0;
        for y in 0..=radius.min(height - 1) {
            sum += src[y * width + x] as u32;
        }
        for y in 0..height {
            dst[y * width + x] = ((sum + span / 2) / span) as u8;
            if y + radius + 1 < height {
                sum += src[(y + radius + 1) * width + x] as u32;
            }
            if y >= radius {
                sum -= src[(y - radius) * width + x] as u32;
            }
        }
    }
}
