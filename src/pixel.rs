//! Owned RGBA8 pixel storage shared by every stage of the icon pipeline.

use image::{Rgb, Rgba, RgbaImage};

/// Row-major RGBA8 buffer. `pixels.len() == width * height * 4` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; byte_len(width, height)],
        }
    }

    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        let mut pixels = Vec::with_capacity(byte_len(width, height));
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&color.0);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wraps raw RGBA bytes.
    ///
    /// Panics when the byte length does not match the dimensions: that is a
    /// caller bug, not a runtime condition.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            byte_len(width, height),
            "pixel data length does not match {}x{} RGBA",
            width,
            height
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        let i = self.index(x, y);
        Rgba([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        let i = self.index(x, y);
        self.pixels[i..i + 4].copy_from_slice(&color.0);
    }

    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixels[self.index(x, y) + 3]
    }

    pub fn rgb(&self, x: u32, y: u32) -> Rgb<u8> {
        let i = self.index(x, y);
        Rgb([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// True when any pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.pixels.chunks_exact(4).any(|px| px[3] != 255)
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, img.into_raw())
    }
}

impl From<PixelBuffer> for RgbaImage {
    fn from(buf: PixelBuffer) -> Self {
        let (width, height) = buf.dimensions();
        // Length is guaranteed by the PixelBuffer invariant.
        RgbaImage::from_raw(width, height, buf.into_raw())
            .unwrap_or_else(|| RgbaImage::new(width, height))
    }
}

/// Inclusive bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BBox {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Grows the box by `margin` on every side, clamped to a `width`x`height` buffer.
    pub fn expand(self, margin: u32, width: u32, height: u32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(margin),
            min_y: self.min_y.saturating_sub(margin),
            max_x: (self.max_x + margin).min(width.saturating_sub(1)),
            max_y: (self.max_y + margin).min(height.saturating_sub(1)),
        }
    }
}

/// Squared Euclidean RGB distance.
pub fn color_distance_sq(a: Rgb<u8>, b: Rgb<u8>) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Rounded channel-wise mean of `samples`.
pub fn average_color(samples: &[Rgb<u8>]) -> Rgb<u8> {
    let n = samples.len().max(1) as f64;
    let mut sum = [0u32; 3];
    for c in samples {
        sum[0] += c[0] as u32;
        sum[1] += c[1] as u32;
        sum[2] += c[2] as u32;
    }
    Rgb([
        (sum[0] as f64 / n).round() as u8,
        (sum[1] as f64 / n).round() as u8,
        (sum[2] as f64 / n).round() as u8,
    ])
}

pub(crate) fn clamp_to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}
