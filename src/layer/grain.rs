//! Grain layer: a faint per-pixel noise over the background.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{LayerConfig, LayerEffect, RenderContext};

/// Configuration for the grain texture.
///
/// Each opaque pixel's R, G and B channels are shifted by an independent
/// offset in `-amplitude..=amplitude`. The generator is seeded, so the same
/// seed always produces the same texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrainConfig {
    /// Seed for the noise generator.
    pub seed: u64,

    /// Maximum per-channel offset.
    pub amplitude: u8,
}

impl GrainConfig {
    pub fn new(seed: u64, amplitude: u8) -> Self {
        Self { seed, amplitude }
    }
}

impl Default for GrainConfig {
    fn default() -> Self {
        Self {
            seed: 0x1c0,
            amplitude: 6,
        }
    }
}

impl LayerConfig for GrainConfig {
    fn differs_from(&self, other: &Self) -> bool {
        self != other
    }
}

impl LayerEffect for GrainConfig {
    fn transform(&self, ctx: &mut RenderContext) {
        if self.amplitude == 0 {
            return;
        }
        let amp = self.amplitude as i16;
        let mut rng = StdRng::seed_from_u64(self.seed);

        // Premultiplied data equals straight data for opaque pixels; the
        // backdrop is fully opaque, anything else is skipped.
        for px in ctx.canvas.data_mut().chunks_exact_mut(4) {
            if px[3] != 255 {
                continue;
            }
            for channel in &mut px[..3] {
                let offset = rng.gen_range(-amp..=amp);
                *channel = (*channel as i16 + offset).clamp(0, 255) as u8;
            }
        }
    }
}
