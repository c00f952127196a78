//! Analytic antialiased fills.
//!
//! Coverage is 1 within `radius - 0.5` of the shape core, ramps linearly to 0
//! at `radius + 0.5`, and is sampled at pixel centers. Pixels are written
//! directly, so the destination is expected to be empty.

use image::Rgba;

use crate::pixel::{clamp_to_u8, PixelBuffer};

/// Coverage of a pixel at distance `dist` from the core of a shape whose
/// boundary lies `radius` away.
pub fn edge_coverage(dist: f64, radius: f64) -> f64 {
    let r_min = (radius - 0.5).max(0.0);
    let r_max = radius + 0.5;

    if dist <= r_min {
        1.0
    } else if dist < r_max {
        1.0 - (dist - r_min) / (r_max - r_min)
    } else {
        0.0
    }
}

pub fn fill_circle(dst: &mut PixelBuffer, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
    if dst.is_empty() {
        return;
    }
    let r = radius.max(0.0);
    let reach = r + 1.5;
    let (w, h) = dst.dimensions();

    let x0 = (cx - reach).floor().max(0.0) as u32;
    let y0 = (cy - reach).floor().max(0.0) as u32;
    let x1 = (cx + reach).ceil().min((w - 1) as f64).max(0.0) as u32;
    let y1 = (cy + reach).ceil().min((h - 1) as f64).max(0.0) as u32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            let coverage = edge_coverage(dx.hypot(dy), r);
            write_covered(dst, x, y, color, coverage);
        }
    }
}

/// Fills a `w`x`h` rectangle at `(x, y)` with corners rounded by
/// `corner_radius`, clamped to half the shorter side.
///
/// Distance is measured to the rectangle inset by the corner radius, so a
/// zero radius gives a plain rectangle and `w == h == 2 * radius` a circle.
pub fn fill_rounded_rect(
    dst: &mut PixelBuffer,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    corner_radius: f64,
    color: Rgba<u8>,
) {
    if dst.is_empty() || w <= 0.0 || h <= 0.0 {
        return;
    }
    let r = corner_radius.clamp(0.0, w.min(h) / 2.0);
    let (dst_w, dst_h) = dst.dimensions();

    let px0 = x.floor().max(0.0) as u32;
    let py0 = y.floor().max(0.0) as u32;
    let px1 = (x + w).ceil().min(dst_w as f64).max(0.0) as u32;
    let py1 = (y + h).ceil().min(dst_h as f64).max(0.0) as u32;

    let (core_left, core_right) = (x + r, x + w - r);
    let (core_top, core_bottom) = (y + r, y + h - r);

    for py in py0..py1 {
        for px in px0..px1 {
            let cx = px as f64 + 0.5;
            let cy = py as f64 + 0.5;

            let nx = cx.clamp(core_left, core_right);
            let ny = cy.clamp(core_top, core_bottom);
            let dist = (cx - nx).hypot(cy - ny);

            let coverage = if dist == 0.0 { 1.0 } else { edge_coverage(dist, r) };
            write_covered(dst, px, py, color, coverage);
        }
    }
}

fn write_covered(dst: &mut PixelBuffer, x: u32, y: u32, color: Rgba<u8>, coverage: f64) {
    if coverage <= 0.0 {
        return;
    }
    let alpha = color[3] as f64 / 255.0 * coverage;
    dst.put_pixel(
        x,
        y,
        Rgba([color[0], color[1], color[2], clamp_to_u8(alpha * 255.0)]),
    );
}
