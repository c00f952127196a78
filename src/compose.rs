//! Places a badge onto a base icon.
//!
//! Two layouts exist: `Overlay` stamps the badge on a rounded plaque in one
//! corner of the base, `SideBySide` widens the canvas and puts the base and a
//! silhouette of the badge next to each other at the same size.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::blur::blur_alpha;
use crate::composite::blend_over;
use crate::pixel::PixelBuffer;
use crate::resample::{resize_bilinear, resize_contain_square};
use crate::shape::fill_rounded_rect;
use crate::silhouette::{extract_silhouette, SilhouetteOptions};

const PLAQUE_PADDING_RATIO: f64 = 0.12;
const PLAQUE_CORNER_RATIO: f64 = 0.28;
const PLAQUE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const SUPERSAMPLE: u32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl Corner {
    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ComposeOptions {
    Overlay(OverlayOptions),
    SideBySide(SideBySideOptions),
}

impl Default for ComposeOptions {
    fn default() -> Self {
        ComposeOptions::SideBySide(SideBySideOptions::default())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OverlayOptions {
    pub badge_size_ratio: f64,
    pub margin_ratio: f64,
    pub placement: Corner,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            badge_size_ratio: 0.30,
            margin_ratio: 0.04,
            placement: Corner::BottomRight,
        }
    }
}

impl OverlayOptions {
    pub fn badge_size_ratio(mut self, ratio: f64) -> Self {
        self.badge_size_ratio = ratio;
        self
    }

    pub fn margin_ratio(mut self, ratio: f64) -> Self {
        self.margin_ratio = ratio;
        self
    }

    pub fn placement(mut self, placement: Corner) -> Self {
        self.placement = placement;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SideBySideOptions {
    pub base_size_ratio: f64,
    pub badge_size_ratio: f64,
    pub gap_ratio: f64,
    pub margin_ratio: f64,
    /// Output width relative to the base height.
    pub output_width_ratio: f64,
    /// Accepted for symmetry with `Overlay`; both parts are vertically centered.
    pub placement: Corner,
}

impl Default for SideBySideOptions {
    fn default() -> Self {
        Self {
            base_size_ratio: 0.90,
            badge_size_ratio: 0.90,
            gap_ratio: 0.14,
            margin_ratio: 0.06,
            output_width_ratio: 2.05,
            placement: Corner::BottomRight,
        }
    }
}

impl SideBySideOptions {
    pub fn base_size_ratio(mut self, ratio: f64) -> Self {
        self.base_size_ratio = ratio;
        self
    }

    pub fn badge_size_ratio(mut self, ratio: f64) -> Self {
        self.badge_size_ratio = ratio;
        self
    }

    pub fn gap_ratio(mut self, ratio: f64) -> Self {
        self.gap_ratio = ratio;
        self
    }

    pub fn margin_ratio(mut self, ratio: f64) -> Self {
        self.margin_ratio = ratio;
        self
    }

    pub fn output_width_ratio(mut self, ratio: f64) -> Self {
        self.output_width_ratio = ratio;
        self
    }

    pub fn placement(mut self, placement: Corner) -> Self {
        self.placement = placement;
        self
    }
}

/// Top-left position of an `item`-sized square inset by `margin` from the
/// edges named by `corner`.
pub fn corner_offset(
    base_w: u32,
    base_h: u32,
    item: u32,
    margin: u32,
    corner: Corner,
) -> (i64, i64) {
    let (item, margin) = (item as i64, margin as i64);
    let left = if corner.is_left() {
        margin
    } else {
        base_w as i64 - item - margin
    };
    let top = if corner.is_top() {
        margin
    } else {
        base_h as i64 - item - margin
    };
    (left, top)
}

pub fn compose(base: &PixelBuffer, badge: &PixelBuffer, options: &ComposeOptions) -> PixelBuffer {
    compose_with(base, badge, options, &SilhouetteOptions::default())
}

pub fn compose_with(
    base: &PixelBuffer,
    badge: &PixelBuffer,
    options: &ComposeOptions,
    silhouette: &SilhouetteOptions,
) -> PixelBuffer {
    match options {
        ComposeOptions::Overlay(opts) => compose_overlay(base, badge, opts),
        ComposeOptions::SideBySide(opts) => compose_side_by_side(base, badge, opts, silhouette),
    }
}

/// Stamps the badge, on a white rounded plaque, into a corner of the base.
pub fn compose_overlay(base: &PixelBuffer, badge: &PixelBuffer, options: &OverlayOptions) -> PixelBuffer {
    let mut out = base.clone();
    if base.is_empty() {
        return out;
    }

    let base_size = base.height() as f64;
    let badge_size = ((base_size * options.badge_size_ratio).round() as u32).max(1);
    let margin = (base_size * options.margin_ratio).round().max(0.0) as u32;

    let padding = ((badge_size as f64 * PLAQUE_PADDING_RATIO).round() as u32).max(1);
    let plaque_size = badge_size + padding * 2;

    let mut plaque = PixelBuffer::new(plaque_size, plaque_size);
    let extent = plaque_size as f64;
    fill_rounded_rect(
        &mut plaque,
        0.0,
        0.0,
        extent,
        extent,
        (extent * PLAQUE_CORNER_RATIO).round(),
        PLAQUE_COLOR,
    );

    let fitted = resize_contain_square(badge, badge_size);
    blend_over(&mut plaque, &fitted, padding as i64, padding as i64);

    let (left, top) = corner_offset(
        base.width(),
        base.height(),
        plaque_size,
        margin,
        options.placement,
    );
    log::debug!(
        "overlay: plaque {}px at ({}, {}) on {}x{}",
        plaque_size,
        left,
        top,
        base.width(),
        base.height()
    );
    blend_over(&mut out, &plaque, left, top);
    out
}

/// Square size shared by the base and the badge in side-by-side layout.
pub fn side_by_side_part(base_size: u32, out_w: u32, options: &SideBySideOptions) -> u32 {
    let base = base_size as f64;
    let margin = (base * options.margin_ratio).round().max(0.0) as i64;
    let gap = (base * options.gap_ratio).round().max(0.0) as i64;

    let desired = (base * options.base_size_ratio.min(options.badge_size_ratio))
        .round()
        .max(1.0) as i64;
    let max_by_height = (base_size as i64 - margin * 2).max(1);
    let max_by_width = ((out_w as i64 - margin * 2 - gap).div_euclid(2)).max(1);

    desired.min(max_by_height).min(max_by_width).max(1) as u32
}

/// Widens the canvas to `output_width_ratio` and puts the resized base and a
/// silhouette of the badge next to each other, vertically centered.
///
/// The silhouette is rendered at 4x, alpha-blurred and downsampled so its
/// edges stay smooth at tray sizes.
pub fn compose_side_by_side(
    base: &PixelBuffer,
    badge: &PixelBuffer,
    options: &SideBySideOptions,
    silhouette: &SilhouetteOptions,
) -> PixelBuffer {
    if base.is_empty() {
        return base.clone();
    }

    let base_size = base.height();
    let out_w = ((base_size as f64 * options.output_width_ratio).round() as u32).max(1);
    let mut out = PixelBuffer::new(out_w, base_size);

    let margin = (base_size as f64 * options.margin_ratio).round().max(0.0) as i64;
    let gap = (base_size as f64 * options.gap_ratio).round().max(0.0) as i64;
    let part = side_by_side_part(base_size, out_w, options);

    let base_x = margin;
    let base_y = ((base_size as f64 - part as f64) / 2.0).round() as i64;
    let badge_x = margin + part as i64 + gap;
    log::debug!(
        "side-by-side: {}x{} canvas, part {}px, base at {}, badge at {}",
        out_w,
        base_size,
        part,
        base_x,
        badge_x
    );

    let base_part = resize_bilinear(base, part, part);

    let glyph = extract_silhouette(badge, silhouette);
    let hi = part.max(part * SUPERSAMPLE);
    let hi_res = resize_contain_square(&glyph, hi);
    let blur_radius = ((SUPERSAMPLE as f64 * 0.25).round() as u32).max(1);
    let hi_res = blur_alpha(&hi_res, blur_radius);
    let badge_part = resize_bilinear(&hi_res, part, part);

    blend_over(&mut out, &base_part, base_x, base_y);
    blend_over(&mut out, &badge_part, badge_x, base_y);
    out
}

/// A 1x/2x pair of independently composed buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalePair {
    pub x1: PixelBuffer,
    pub x2: PixelBuffer,
}
