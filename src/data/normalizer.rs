// ============================================================
// Layer 4 — Pixel Normaliser
// ============================================================
// MNIST pixels arrive as raw intensities in [0, 255].
// Each pixel is scaled to [0, 1] and then standardised:
//
//   x' = (x / 255 - mean) / std
//
// With the default mean = std = 0.5 the result lies in [-1, 1].
//
// Reference: Rust Book §13 (Iterators)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Largest raw pixel intensity in the MNIST files
pub const PIXEL_MAX: f32 = 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalizer {
    pub mean: f32,
    pub std:  f32,
}

impl Normalizer {
    pub fn new(mean: f32, std: f32) -> Result<Self> {
        ensure!(mean.is_finite(), "normalisation mean must be finite, got {mean}");
        ensure!(
            std.is_finite() && std > 0.0,
            "normalisation std must be positive and finite, got {std}"
        );
        Ok(Self { mean, std })
    }

    /// Normalise a single raw pixel intensity
    pub fn apply(&self, pixel: f32) -> f32 {
        (pixel / PIXEL_MAX - self.mean) / self.std
    }

    /// Flatten a row-major image into normalised pixels
    pub fn flatten<'a, const W: usize, const H: usize>(
        &self,
        image: &'a [[f32; W]; H],
    ) -> impl Iterator<Item = f32> + 'a {
        let normalizer = *self;
        image
            .iter()
            .flat_map(|row| row.iter())
            .map(move |&pixel| normalizer.apply(pixel))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self { mean: 0.5, std: 0.5 }
    }
}
