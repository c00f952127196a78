use image::{Rgb, Rgba};
use iconforge::background::{
    estimate_border_color, estimate_corner_color, remove_background_flood,
    remove_background_ramp, RampThresholds,
};
use iconforge::pixel::{color_distance_sq, PixelBuffer};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn fill_rect(buf: &mut PixelBuffer, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    for y in y0..y1 {
        for x in x0..x1 {
            buf.put_pixel(x, y, color);
        }
    }
}

#[test]
fn flood_fill_keeps_island_not_connected_to_border() {
    let mut buf = PixelBuffer::filled(10, 10, WHITE);
    fill_rect(&mut buf, 3, 3, 7, 7, BLUE);

    let out = remove_background_flood(&buf, 26);

    for y in 0..10 {
        for x in 0..10 {
            let on_island = (3..7).contains(&x) && (3..7).contains(&y);
            let expected = if on_island { 255 } else { 0 };
            assert_eq!(out.alpha(x, y), expected, "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn flood_fill_preserves_enclosed_background_color() {
    // Blue ring with a white hole in the middle.
    let mut buf = PixelBuffer::filled(12, 12, WHITE);
    fill_rect(&mut buf, 2, 2, 10, 10, BLUE);
    fill_rect(&mut buf, 5, 5, 7, 7, WHITE);

    let flooded = remove_background_flood(&buf, 26);
    assert_eq!(flooded.alpha(0, 0), 0);
    assert_eq!(flooded.alpha(5, 5), 255);
    assert_eq!(flooded.alpha(6, 6), 255);

    // The ramp has no notion of connectivity and clears the hole too.
    let ramped = remove_background_ramp(&buf, RampThresholds::new(10.0, 60.0), false);
    assert_eq!(ramped.alpha(5, 5), 0);
    assert_eq!(ramped.alpha(3, 3), 255);
}

#[test]
fn flood_fill_leaves_rgb_untouched() {
    let mut buf = PixelBuffer::filled(6, 6, WHITE);
    fill_rect(&mut buf, 2, 2, 4, 4, BLUE);

    let out = remove_background_flood(&buf, 26);
    assert_eq!(out.rgb(0, 0), Rgb([255, 255, 255]));
    assert_eq!(out.pixel(2, 2), BLUE);
}

#[test]
fn ramp_endpoints_and_midpoint() {
    let ramp = RampThresholds::new(10.0, 60.0);
    assert_eq!(ramp.alpha_for(0.0), 0);
    assert_eq!(ramp.alpha_for(100.0), 0);
    assert_eq!(ramp.alpha_for(1850.0), 128);
    assert_eq!(ramp.alpha_for(3600.0), 255);
    assert_eq!(ramp.alpha_for(100_000.0), 255);
}

#[test]
fn ramp_alpha_never_decreases_with_distance() {
    let ramp = RampThresholds::new(32.0, 78.0);
    let mut previous = 0;
    for d2 in 0..(3 * 255 * 255) {
        let alpha = ramp.alpha_for(d2 as f64);
        assert!(alpha >= previous, "alpha dropped at d2 = {}", d2);
        previous = alpha;
    }
}

#[test]
fn ramp_alpha_is_monotonic_over_an_image() {
    let mut buf = PixelBuffer::filled(16, 3, WHITE);
    for x in 1..15 {
        let v = 255 - (x as u8) * 18;
        buf.put_pixel(x, 1, Rgba([v, v, v, 255]));
    }

    let out = remove_background_ramp(&buf, RampThresholds::new(10.0, 200.0), false);
    let bg = estimate_corner_color(&buf);

    let mut samples: Vec<(u32, u8)> = (0..3)
        .flat_map(|y| (0..16).map(move |x| (x, y)))
        .map(|(x, y)| (color_distance_sq(buf.rgb(x, y), bg), out.alpha(x, y)))
        .collect();
    samples.sort();

    for pair in samples.windows(2) {
        assert!(pair[1].1 >= pair[0].1, "{:?}", pair);
    }
}

#[test]
fn ramp_force_monochrome_blackens_rgb() {
    let mut buf = PixelBuffer::filled(4, 4, WHITE);
    buf.put_pixel(1, 1, Rgba([200, 30, 30, 255]));

    let out = remove_background_ramp(&buf, RampThresholds::new(10.0, 60.0), true);
    assert_eq!(out.pixel(1, 1), Rgba([0, 0, 0, 255]));
    assert_eq!(out.pixel(0, 0), Rgba([0, 0, 0, 0]));
}

#[test]
fn corner_and_border_estimates() {
    let mut buf = PixelBuffer::filled(5, 5, Rgba([100, 100, 100, 255]));
    buf.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
    buf.put_pixel(2, 0, Rgba([0, 0, 0, 255]));

    // (0 + 3 * 100) / 4 = 75
    assert_eq!(estimate_corner_color(&buf), Rgb([75, 75, 75]));
    // (0 + 0 + 6 * 100) / 8 = 75
    assert_eq!(estimate_border_color(&buf), Rgb([75, 75, 75]));
}

#[test]
fn empty_buffers_pass_through() {
    let empty = PixelBuffer::new(0, 0);
    assert_eq!(remove_background_flood(&empty, 26), empty);
    assert_eq!(
        remove_background_ramp(&empty, RampThresholds::new(1.0, 2.0), false),
        empty
    );
}

#[test]
fn flood_fill_with_huge_threshold_clears_everything() {
    let mut buf = PixelBuffer::filled(10, 10, WHITE);
    fill_rect(&mut buf, 3, 3, 7, 7, BLUE);

    for threshold in [442, 70_000, u32::MAX] {
        let out = remove_background_flood(&buf, threshold);
        assert!(
            (0..10).all(|y| (0..10).all(|x| out.alpha(x, y) == 0)),
            "threshold {}",
            threshold
        );
    }
}
