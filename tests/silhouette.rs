use image::{Rgb, Rgba};
use iconforge::pixel::PixelBuffer;
use iconforge::silhouette::{
    extract_silhouette, luma, quantize, stretch_range, SilhouetteOptions,
};

fn fill_rect(buf: &mut PixelBuffer, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    for y in y0..y1 {
        for x in x0..x1 {
            buf.put_pixel(x, y, color);
        }
    }
}

/// White card with three bands of different darkness.
fn banded_artwork() -> PixelBuffer {
    let mut buf = PixelBuffer::filled(16, 16, Rgba([255, 255, 255, 255]));
    fill_rect(&mut buf, 4, 4, 12, 6, Rgba([0, 0, 0, 255]));
    fill_rect(&mut buf, 4, 6, 12, 9, Rgba([100, 100, 100, 255]));
    fill_rect(&mut buf, 4, 9, 12, 12, Rgba([180, 180, 180, 255]));
    buf
}

#[test]
fn alpha_takes_only_quantized_levels() {
    let out = extract_silhouette(&banded_artwork(), &SilhouetteOptions::default());
    let allowed = [0u8, 85, 170, 255];

    for px in out.as_raw().chunks_exact(4) {
        assert!(allowed.contains(&px[3]), "unexpected alpha {}", px[3]);
        if px[3] > 0 {
            assert_eq!(&px[..3], &[255, 255, 255]);
        }
    }
    assert!(out.as_raw().chunks_exact(4).any(|px| px[3] == 255));
}

#[test]
fn opaque_background_is_flooded_and_trimmed() {
    let out = extract_silhouette(&banded_artwork(), &SilhouetteOptions::default());
    // The lightest band falls under the floor; the remaining 8x5 ink keeps a
    // 1px crop margin.
    assert_eq!(out.dimensions(), (10, 7));
    assert_eq!(out.alpha(1, 1), 255);
    assert_eq!(out.alpha(1, 3), 85);
    assert_eq!(out.alpha(0, 0), 0);
}

#[test]
fn transparent_source_skips_background_removal() {
    let mut buf = PixelBuffer::new(10, 10);
    fill_rect(&mut buf, 4, 4, 6, 6, Rgba([0, 0, 0, 255]));

    let out = extract_silhouette(&buf, &SilhouetteOptions::default());
    assert_eq!(out.dimensions(), (4, 4));
    assert_eq!(out.pixel(1, 1), Rgba([255, 255, 255, 255]));
    assert_eq!(out.alpha(0, 0), 0);
}

#[test]
fn custom_color_is_applied() {
    let options = SilhouetteOptions::default().with_color(Rgb([10, 20, 30]));
    let out = extract_silhouette(&banded_artwork(), &options);

    for px in out.as_raw().chunks_exact(4).filter(|px| px[3] > 0) {
        assert_eq!(&px[..3], &[10, 20, 30]);
    }
}

#[test]
fn faint_ink_below_floor_is_dropped() {
    let options = SilhouetteOptions::default().with_levels(2).with_floor(0.5);
    let out = extract_silhouette(&banded_artwork(), &options);

    for px in out.as_raw().chunks_exact(4) {
        assert!(px[3] == 0 || px[3] == 255);
    }
}

#[test]
fn quantize_snaps_to_even_steps() {
    assert_eq!(quantize(0.0, 4), 0.0);
    assert_eq!(quantize(1.0, 4), 1.0);
    assert_eq!(quantize(0.5, 4), 2.0 / 3.0);
    assert_eq!(quantize(0.1, 4), 0.0);
    assert_eq!(quantize(1.7, 4), 1.0);
    assert_eq!(quantize(0.9, 1), 0.0);
}

#[test]
fn luma_is_normalized() {
    assert_eq!(luma(0, 0, 0), 0.0);
    assert!((luma(255, 255, 255) - 1.0).abs() < 1e-9);
    assert!(luma(0, 255, 0) > luma(255, 0, 0));
}

#[test]
fn stretch_uses_percentiles() {
    let mut samples: Vec<f64> = (0..=100).rev().map(|i| i as f64 / 100.0).collect();
    let (lo, hi) = stretch_range(&mut samples);
    assert!((lo - 0.05).abs() < 1e-9);
    assert!((hi - 0.95).abs() < 1e-9);
}

#[test]
fn stretch_falls_back_on_collapsed_ranges() {
    assert_eq!(stretch_range(&mut []), (0.0, 1.0));
    assert_eq!(stretch_range(&mut [0.4, 0.4, 0.4]), (0.0, 1.0));

    // Percentiles collapse onto the majority value; min/max still spread.
    let mut samples = vec![0.5; 98];
    samples.push(0.1);
    samples.push(0.9);
    assert_eq!(stretch_range(&mut samples), (0.1, 0.9));
}
