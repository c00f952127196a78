//! Flattens colored artwork into a single-hue alpha mask ("ink where dark").

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::background::remove_background_flood;
use crate::crop::crop_to_alpha;
use crate::pixel::{clamp_to_u8, PixelBuffer};

const STRETCH_LOW_PERCENTILE: f64 = 0.05;
const STRETCH_HIGH_PERCENTILE: f64 = 0.95;
/// Below this percentile spread the stretch falls back to the full min/max.
const STRETCH_MIN_RANGE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SilhouetteOptions {
    /// Number of discrete tonal bands, including fully transparent.
    pub levels: u32,
    /// Quantized mask values below this become fully transparent.
    pub floor: f64,
    /// RGB distance used when an opaque source needs its background flooded away.
    pub flood_threshold: u32,
    /// Alpha threshold for the final trim.
    pub trim_threshold: u8,
    /// Fill color of the silhouette.
    pub color: [u8; 3],
}

impl Default for SilhouetteOptions {
    fn default() -> Self {
        Self {
            levels: 4,
            floor: 0.10,
            flood_threshold: 26,
            trim_threshold: 8,
            color: [255, 255, 255],
        }
    }
}

impl SilhouetteOptions {
    pub fn with_color(mut self, color: Rgb<u8>) -> Self {
        self.color = color.0;
        self
    }

    pub fn with_levels(mut self, levels: u32) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }
}

/// Perceptual luma in `[0, 1]`.
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    (0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64) / 255.0
}

/// Snaps `value` in `[0, 1]` to one of `steps` evenly spaced levels.
pub fn quantize(value: f64, steps: u32) -> f64 {
    if steps <= 1 {
        return 0.0;
    }
    let v = value.clamp(0.0, 1.0);
    let top = (steps - 1) as f64;
    (v * top).round() / top
}

/// Contrast-stretch range for a set of raw mask samples.
///
/// Uses the 5th/95th percentiles, widening to the full min/max when they
/// collapse, and `[0, 1]` when even that range is degenerate.
pub fn stretch_range(samples: &mut [f64]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 1.0);
    }

    samples.sort_by(|a, b| a.total_cmp(b));
    let n = samples.len();
    let percentile = |q: f64| samples[(((n - 1) as f64) * q).round().clamp(0.0, (n - 1) as f64) as usize];

    let mut lo = percentile(STRETCH_LOW_PERCENTILE);
    let mut hi = percentile(STRETCH_HIGH_PERCENTILE);

    if hi - lo < STRETCH_MIN_RANGE {
        lo = samples[0];
        hi = samples[n - 1];
    }
    if hi - lo < 1e-6 {
        lo = 0.0;
        hi = 1.0;
    }

    (lo, hi)
}

/// Derives a trimmed, flat-color silhouette from a colored buffer.
///
/// Opaque sources first have their border-connected background flooded away.
/// The darkness mask `1 - luma` is contrast-stretched, quantized into
/// `options.levels` bands and written as alpha over `options.color`.
pub fn extract_silhouette(buf: &PixelBuffer, options: &SilhouetteOptions) -> PixelBuffer {
    let mut out = if buf.has_transparency() {
        buf.clone()
    } else {
        remove_background_flood(buf, options.flood_threshold)
    };

    let mut samples: Vec<f64> = out
        .as_raw()
        .chunks_exact(4)
        .filter(|px| px[3] > 0)
        .map(|px| 1.0 - luma(px[0], px[1], px[2]))
        .collect();
    let (lo, hi) = stretch_range(&mut samples);
    log::debug!("silhouette: stretch range [{:.3}, {:.3}]", lo, hi);

    let [r, g, b] = options.color;
    for px in out.as_raw_mut().chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let src_alpha = px[3] as f64 / 255.0;

        let mask = (1.0 - luma(px[0], px[1], px[2]) - lo) / (hi - lo);
        let mask = quantize(mask.clamp(0.0, 1.0), options.levels);

        if mask < options.floor {
            px[3] = 0;
            continue;
        }

        px[0] = r;
        px[1] = g;
        px[2] = b;
        px[3] = clamp_to_u8(255.0 * src_alpha * mask);
    }

    crop_to_alpha(&out, options.trim_threshold)
}
