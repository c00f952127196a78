//! Square icon preparation: one arbitrary raster logo in, one clean
//! `size`x`size` icon out.

use image::Rgb;

use crate::background::{remove_background_ramp, RampThresholds};
use crate::crop::crop_to_alpha;
use crate::pixel::PixelBuffer;
use crate::resample::{resize_contain_padded, resize_contain_square};
use crate::tray::{apply_monochrome, binarize_alpha, dilate_alpha};

/// A decoded source image and whether its file format carried alpha at all.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub buffer: PixelBuffer,
    pub has_alpha: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrayEnhance {
    pub intermediate_size: u32,
    pub alpha_cut: u8,
    pub dilate: u32,
}

impl Default for TrayEnhance {
    fn default() -> Self {
        Self {
            intermediate_size: 256,
            alpha_cut: 6,
            dilate: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SquareIconOptions {
    pub alpha_threshold: u8,
    pub background: RampThresholds,
    /// Blacken RGB during background removal, keeping only the alpha shape.
    pub force_monochrome: bool,
    pub enhance: Option<TrayEnhance>,
    pub monochrome: Option<Rgb<u8>>,
    pub padding_ratio: f64,
}

impl SquareIconOptions {
    pub fn new(alpha_threshold: u8, background: RampThresholds) -> Self {
        Self {
            alpha_threshold,
            background,
            force_monochrome: false,
            enhance: None,
            monochrome: None,
            padding_ratio: 0.0,
        }
    }
}

/// Background-free, trimmed copy of the source, shared by every output size.
pub fn normalize_source(source: &SourceImage, options: &SquareIconOptions) -> PixelBuffer {
    let cut = if source.has_alpha {
        source.buffer.clone()
    } else {
        remove_background_ramp(&source.buffer, options.background, options.force_monochrome)
    };
    crop_to_alpha(&cut, options.alpha_threshold)
}

/// Renders the normalized glyph into a `size`x`size` icon.
pub fn render_square(glyph: &PixelBuffer, size: u32, options: &SquareIconOptions) -> PixelBuffer {
    let mut image = glyph.clone();

    if let Some(enhance) = options.enhance {
        let color = options.monochrome.unwrap_or(Rgb([255, 255, 255]));
        let staged = resize_contain_square(&image, enhance.intermediate_size);
        let staged = binarize_alpha(&staged, enhance.alpha_cut);
        let staged = dilate_alpha(&staged, enhance.dilate);
        image = apply_monochrome(&staged, color, true);
    }

    if let Some(color) = options.monochrome {
        image = apply_monochrome(&image, color, false);
    }

    resize_contain_padded(&image, size, options.padding_ratio)
}

pub fn prepare_square_icon(source: &SourceImage, size: u32, options: &SquareIconOptions) -> PixelBuffer {
    render_square(&normalize_source(source, options), size, options)
}
