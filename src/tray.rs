//! Glyph enhancement for tiny monochrome tray icons.
//!
//! Thin silhouettes disappear when downscaled to 16-36px, so the alpha is
//! hardened to a binary mask and grown by a pixel before the final resize.

use image::Rgb;

use crate::pixel::PixelBuffer;

/// Alpha above `cut` becomes 255, everything else 0.
pub fn binarize_alpha(buf: &PixelBuffer, cut: u8) -> PixelBuffer {
    let mut out = buf.clone();
    for px in out.as_raw_mut().chunks_exact_mut(4) {
        px[3] = if px[3] > cut { 255 } else { 0 };
    }
    out
}

/// Grows fully opaque regions with a 3x3 structuring element, `iterations` times.
pub fn dilate_alpha(buf: &PixelBuffer, iterations: u32) -> PixelBuffer {
    let (w, h) = buf.dimensions();
    let mut out = buf.clone();

    for _ in 0..iterations {
        let src = out.clone();
        for y in 0..h {
            for x in 0..w {
                if src.alpha(x, y) == 255 {
                    continue;
                }
                if touches_opaque(&src, x, y) {
                    let i = out.index(x, y);
                    out.as_raw_mut()[i + 3] = 255;
                }
            }
        }
    }

    out
}

fn touches_opaque(src: &PixelBuffer, x: u32, y: u32) -> bool {
    let (w, h) = src.dimensions();
    (x.saturating_sub(1)..=(x + 1).min(w - 1)).any(|xx| {
        (y.saturating_sub(1)..=(y + 1).min(h - 1)).any(|yy| src.alpha(xx, yy) == 255)
    })
}

/// Paints every visible pixel `color`, alpha untouched.
///
/// With `clear_hidden`, fully transparent pixels get black RGB so no stray
/// color leaks through later resampling.
pub fn apply_monochrome(buf: &PixelBuffer, color: Rgb<u8>, clear_hidden: bool) -> PixelBuffer {
    let mut out = buf.clone();
    for px in out.as_raw_mut().chunks_exact_mut(4) {
        if px[3] > 0 {
            px[..3].copy_from_slice(&color.0);
        } else if clear_hidden {
            px[..3].fill(0);
        }
    }
    out
}
