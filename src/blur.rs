use crate::pixel::PixelBuffer;

/// Separable box blur of the alpha channel only (horizontal, then vertical).
///
/// Each output alpha is the mean of the in-bounds samples in a `2 * radius + 1`
/// window; samples outside the image are left out of both sum and count.
/// RGB passes through untouched.
pub fn blur_alpha(buf: &PixelBuffer, radius: u32) -> PixelBuffer {
    if radius == 0 || buf.is_empty() {
        return buf.clone();
    }

    let (w, h) = buf.dimensions();
    let horizontal = alpha_pass(buf, radius, |x, y, k| {
        let xx = x as i64 + k;
        (xx >= 0 && xx < w as i64).then(|| (xx as u32, y))
    });
    alpha_pass(&horizontal, radius, |x, y, k| {
        let yy = y as i64 + k;
        (yy >= 0 && yy < h as i64).then(|| (x, yy as u32))
    })
}

fn alpha_pass<F>(src: &PixelBuffer, radius: u32, sample: F) -> PixelBuffer
where
    F: Fn(u32, u32, i64) -> Option<(u32, u32)>,
{
    let (w, h) = src.dimensions();
    let r = radius as i64;
    let mut out = src.clone();

    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            let mut count = 0u32;
            for k in -r..=r {
                if let Some((sx, sy)) = sample(x, y, k) {
                    sum += src.alpha(sx, sy) as u32;
                    count += 1;
                }
            }
            let i = out.index(x, y);
            out.as_raw_mut()[i + 3] = (sum as f64 / count.max(1) as f64).round() as u8;
        }
    }

    out
}
