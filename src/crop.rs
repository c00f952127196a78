use crate::pixel::{BBox, PixelBuffer};

/// Safety margin kept around the visible content so antialiased edges survive.
const CROP_MARGIN: u32 = 1;

/// Bounding box of pixels whose alpha is strictly above `alpha_threshold`.
pub fn alpha_bbox(buf: &PixelBuffer, alpha_threshold: u8) -> Option<BBox> {
    let (w, h) = buf.dimensions();
    let mut bbox: Option<BBox> = None;

    for y in 0..h {
        for x in 0..w {
            if buf.alpha(x, y) <= alpha_threshold {
                continue;
            }
            bbox = Some(match bbox {
                None => BBox {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => BBox {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            });
        }
    }

    bbox
}

/// Copies the `bbox` sub-rectangle into a new buffer.
pub fn extract(buf: &PixelBuffer, bbox: BBox) -> PixelBuffer {
    let mut out = PixelBuffer::new(bbox.width(), bbox.height());
    let row_bytes = bbox.width() as usize * 4;

    for y in 0..bbox.height() {
        let src = buf.index(bbox.min_x, bbox.min_y + y);
        let dst = out.index(0, y);
        out.as_raw_mut()[dst..dst + row_bytes].copy_from_slice(&buf.as_raw()[src..src + row_bytes]);
    }

    out
}

/// Trims to the visible content plus a 1px margin.
///
/// When nothing qualifies the input comes back unchanged, so the result is
/// never a zero-size buffer.
pub fn crop_to_alpha(buf: &PixelBuffer, alpha_threshold: u8) -> PixelBuffer {
    let Some(bbox) = alpha_bbox(buf, alpha_threshold) else {
        log::debug!(
            "crop: no pixel above alpha {}, keeping {}x{}",
            alpha_threshold,
            buf.width(),
            buf.height()
        );
        return buf.clone();
    };

    let bbox = bbox.expand(CROP_MARGIN, buf.width(), buf.height());
    log::debug!("crop: {:?} of {}x{}", bbox, buf.width(), buf.height());
    extract(buf, bbox)
}
