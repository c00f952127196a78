use crate::pixel::{clamp_to_u8, PixelBuffer};

/// Porter-Duff source-over of `overlay` onto `base` with its top-left corner
/// at `(dx, dy)`. The footprint is clipped to `base`; fully transparent
/// overlay pixels leave the base untouched.
pub fn blend_over(base: &mut PixelBuffer, overlay: &PixelBuffer, dx: i64, dy: i64) {
    let (bw, bh) = (base.width() as i64, base.height() as i64);

    for y in 0..overlay.height() {
        let by = dy + y as i64;
        if by < 0 || by >= bh {
            continue;
        }

        for x in 0..overlay.width() {
            let bx = dx + x as i64;
            if bx < 0 || bx >= bw {
                continue;
            }

            let o = overlay.pixel(x, y);
            if o[3] == 0 {
                continue;
            }

            let bi = base.index(bx as u32, by as u32);
            let dst = &mut base.as_raw_mut()[bi..bi + 4];

            let oa = o[3] as f64 / 255.0;
            let ba = dst[3] as f64 / 255.0;
            let out_a = oa + ba * (1.0 - oa);
            let norm = if out_a > 0.0 { out_a } else { 1.0 };

            for c in 0..3 {
                let v = (o[c] as f64 * oa + dst[c] as f64 * ba * (1.0 - oa)) / norm;
                dst[c] = clamp_to_u8(v);
            }
            dst[3] = clamp_to_u8(out_a * 255.0);
        }
    }
}
