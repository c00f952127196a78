use crate::pixel::{clamp_to_u8, PixelBuffer};

/// Bilinear resize, every channel (alpha included) blended independently.
///
/// Destination pixel centers map to `(d + 0.5) * src / dst - 0.5` in source
/// space, clamped to the edge pixels.
pub fn resize_bilinear(buf: &PixelBuffer, dst_w: u32, dst_h: u32) -> PixelBuffer {
    let (src_w, src_h) = buf.dimensions();
    if (src_w, src_h) == (dst_w, dst_h) {
        return buf.clone();
    }

    let mut out = PixelBuffer::new(dst_w, dst_h);
    if buf.is_empty() || out.is_empty() {
        return out;
    }

    let x_ratio = src_w as f64 / dst_w as f64;
    let y_ratio = src_h as f64 / dst_h as f64;
    let src = buf.as_raw();

    for y in 0..dst_h {
        let (y0, y1, wy) = sample_axis(y, y_ratio, src_h);

        for x in 0..dst_w {
            let (x0, x1, wx) = sample_axis(x, x_ratio, src_w);

            let i00 = buf.index(x0, y0);
            let i10 = buf.index(x1, y0);
            let i01 = buf.index(x0, y1);
            let i11 = buf.index(x1, y1);
            let di = out.index(x, y);
            let dst = out.as_raw_mut();

            for c in 0..4 {
                let v00 = src[i00 + c] as f64;
                let v10 = src[i10 + c] as f64;
                let v01 = src[i01 + c] as f64;
                let v11 = src[i11 + c] as f64;

                let v0 = v00 + (v10 - v00) * wx;
                let v1 = v01 + (v11 - v01) * wx;
                dst[di + c] = clamp_to_u8(v0 + (v1 - v0) * wy);
            }
        }
    }

    out
}

/// Two neighbouring source indices and the weight of the second one.
fn sample_axis(d: u32, ratio: f64, src_len: u32) -> (u32, u32, f64) {
    let last = (src_len - 1) as f64;
    let s = (d as f64 + 0.5) * ratio - 0.5;
    let i0 = s.floor().clamp(0.0, last);
    let i1 = (i0 + 1.0).min(last);
    let weight = (s - i0).clamp(0.0, 1.0);
    (i0 as u32, i1 as u32, weight)
}

/// Scales to fit inside a transparent `size`x`size` square, centered.
pub fn resize_contain_square(buf: &PixelBuffer, size: u32) -> PixelBuffer {
    let size = size.max(1);
    let mut out = PixelBuffer::new(size, size);
    if buf.is_empty() {
        return out;
    }

    let (src_w, src_h) = buf.dimensions();
    let scale = (size as f64 / src_w as f64).min(size as f64 / src_h as f64);
    let dw = ((src_w as f64 * scale).round() as u32).clamp(1, size);
    let dh = ((src_h as f64 * scale).round() as u32).clamp(1, size);
    let dx = ((size - dw) as f64 / 2.0).round() as u32;
    let dy = ((size - dh) as f64 / 2.0).round() as u32;

    let resized = resize_bilinear(buf, dw, dh);
    copy_into(&mut out, &resized, dx, dy);
    out
}

/// Contain-fit into `size` leaving a transparent border of
/// `max(1, round(size * padding_ratio))` pixels on every side.
pub fn resize_contain_padded(buf: &PixelBuffer, size: u32, padding_ratio: f64) -> PixelBuffer {
    if padding_ratio <= 0.0 {
        return resize_contain_square(buf, size);
    }

    let size = size.max(1);
    let pad = ((size as f64 * padding_ratio).round() as u32).max(1);
    let inner = size.saturating_sub(pad * 2).max(1);

    let mut out = PixelBuffer::new(size, size);
    let fitted = resize_contain_square(buf, inner);
    copy_into(&mut out, &fitted, pad.min(size - inner), pad.min(size - inner));
    out
}

/// Straight copy of `src` into `dst` at `(dx, dy)`, clipped to `dst`.
/// Only valid when the destination region is empty.
fn copy_into(dst: &mut PixelBuffer, src: &PixelBuffer, dx: u32, dy: u32) {
    let (dst_w, dst_h) = dst.dimensions();
    if dx >= dst_w || dy >= dst_h {
        return;
    }
    let cols = src.width().min(dst_w - dx) as usize;

    for y in 0..src.height().min(dst_h - dy) {
        let si = src.index(0, y);
        let di = dst.index(dx, dy + y);
        dst.as_raw_mut()[di..di + cols * 4].copy_from_slice(&src.as_raw()[si..si + cols * 4]);
    }
}
