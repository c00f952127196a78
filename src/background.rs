//! Turns a flat, near-uniform background into transparency.
//!
//! Two strategies are offered. The distance ramp is a single pass over every
//! pixel and is meant for fully opaque exports. The border flood fill only
//! clears background that is connected to the image edge, which keeps
//! enclosed regions that happen to share the background color.

use std::collections::VecDeque;

use bit_vec::BitVec;
use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::pixel::{average_color, color_distance_sq, PixelBuffer};

/// Distance thresholds (RGB Euclidean, roughly 0..441) for the ramp remover.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RampThresholds {
    /// At or below this distance a pixel becomes fully transparent.
    pub start: f64,
    /// At or above this distance a pixel stays fully opaque.
    pub end: f64,
}

impl RampThresholds {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Alpha assigned to a pixel at squared distance `d2` from the background.
    pub fn alpha_for(&self, d2: f64) -> u8 {
        let start2 = self.start * self.start;
        let end2 = self.end * self.end;

        if d2 <= start2 {
            0
        } else if d2 >= end2 {
            255
        } else {
            (255.0 * (d2 - start2) / (end2 - start2)).round() as u8
        }
    }
}

/// Mean of the four corner pixels.
pub fn estimate_corner_color(buf: &PixelBuffer) -> Rgb<u8> {
    let (w, h) = buf.dimensions();
    let (r, b) = (w - 1, h - 1);
    let samples = [buf.rgb(0, 0), buf.rgb(r, 0), buf.rgb(0, b), buf.rgb(r, b)];
    average_color(&samples)
}

/// Mean of the four corners and the four edge midpoints.
pub fn estimate_border_color(buf: &PixelBuffer) -> Rgb<u8> {
    let (w, h) = buf.dimensions();
    let (r, b) = (w - 1, h - 1);
    let (mx, my) = (w / 2, h / 2);
    let samples = [
        buf.rgb(0, 0),
        buf.rgb(r, 0),
        buf.rgb(0, b),
        buf.rgb(r, b),
        buf.rgb(mx, 0),
        buf.rgb(mx, b),
        buf.rgb(0, my),
        buf.rgb(r, my),
    ];
    average_color(&samples)
}

/// Replaces every pixel's alpha with a ramp over its distance to the corner
/// color. Not connectivity-aware: background-colored pixels inside the glyph
/// are cleared too.
///
/// With `force_monochrome` the RGB of every pixel is set to black, leaving
/// only the alpha shape.
pub fn remove_background_ramp(
    buf: &PixelBuffer,
    thresholds: RampThresholds,
    force_monochrome: bool,
) -> PixelBuffer {
    if buf.is_empty() {
        return buf.clone();
    }

    let bg = estimate_corner_color(buf);
    log::debug!("ramp: background estimate {:?}", bg.0);

    let mut out = buf.clone();
    for px in out.as_raw_mut().chunks_exact_mut(4) {
        let d2 = color_distance_sq(Rgb([px[0], px[1], px[2]]), bg) as f64;
        px[3] = thresholds.alpha_for(d2);

        if force_monochrome {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
        }
    }

    out
}

/// Clears background reachable from the border through 4-connected pixels
/// within `threshold` RGB distance of the estimated border color.
pub fn remove_background_flood(buf: &PixelBuffer, threshold: u32) -> PixelBuffer {
    if buf.is_empty() {
        return buf.clone();
    }

    let (w, h) = buf.dimensions();
    let bg = estimate_border_color(buf);
    let threshold_sq = u64::from(threshold).pow(2);
    log::debug!("flood: background estimate {:?}, threshold {}", bg.0, threshold);

    let mut out = buf.clone();
    let mut visited = Mask2::new(w, h);
    let mut to_visit = VecDeque::new();

    let mut seed = |x: u32, y: u32, to_visit: &mut VecDeque<(u32, u32)>| {
        if !visited.get(x, y) {
            visited.set(x, y);
            to_visit.push_back((x, y));
        }
    };

    for x in 0..w {
        seed(x, 0, &mut to_visit);
        seed(x, h - 1, &mut to_visit);
    }
    for y in 0..h {
        seed(0, y, &mut to_visit);
        seed(w - 1, y, &mut to_visit);
    }

    while let Some((x, y)) = to_visit.pop_front() {
        let i = out.index(x, y);
        if out.as_raw()[i + 3] == 0 {
            continue;
        }
        if u64::from(color_distance_sq(out.rgb(x, y), bg)) > threshold_sq {
            continue;
        }

        out.as_raw_mut()[i + 3] = 0;

        for (nx, ny) in neighbors(x, y, w, h) {
            seed(nx, ny, &mut to_visit);
        }
    }

    out
}

fn neighbors(x: u32, y: u32, w: u32, h: u32) -> impl Iterator<Item = (u32, u32)> {
    DIRECTIONS.iter().filter_map(move |(dx, dy)| {
        let nx = x as i64 + *dx as i64;
        let ny = y as i64 + *dy as i64;

        if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
            return None;
        }

        Some((nx as u32, ny as u32))
    })
}

const DIRECTIONS: &[(i32, i32)] = &[(1, 0), (0, 1), (-1, 0), (0, -1)];

/// One bit per pixel.
struct Mask2 {
    size: (u32, u32),
    data: BitVec,
}

impl Mask2 {
    fn new(w: u32, h: u32) -> Self {
        Self {
            size: (w, h),
            data: BitVec::from_elem(w as usize * h as usize, false),
        }
    }

    fn get(&self, x: u32, y: u32) -> bool {
        let index = x as usize + y as usize * self.size.0 as usize;
        self.data.get(index).unwrap_or(false)
    }

    fn set(&mut self, x: u32, y: u32) {
        let index = x as usize + y as usize * self.size.0 as usize;
        self.data.set(index, true);
    }
}
