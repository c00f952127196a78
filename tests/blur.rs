use image::Rgba;
use iconforge::blur::blur_alpha;
use iconforge::pixel::PixelBuffer;

#[test]
fn dot_spreads_to_neighbors_and_rgb_is_kept() {
    let mut buf = PixelBuffer::filled(5, 5, Rgba([10, 20, 30, 0]));
    buf.put_pixel(2, 2, Rgba([10, 20, 30, 255]));

    let out = blur_alpha(&buf, 1);

    for y in 1..=3 {
        for x in 1..=3 {
            assert!(out.alpha(x, y) > 0, "pixel ({}, {})", x, y);
        }
    }
    // 255 / 3 per axis.
    assert_eq!(out.alpha(2, 2), 28);
    assert_eq!(out.alpha(0, 0), 0);

    for px in out.as_raw().chunks_exact(4) {
        assert_eq!(&px[..3], &[10, 20, 30]);
    }
}

#[test]
fn out_of_bounds_samples_are_excluded() {
    let mut buf = PixelBuffer::new(3, 1);
    buf.put_pixel(0, 0, Rgba([0, 0, 0, 255]));

    let out = blur_alpha(&buf, 1);
    let alphas: Vec<u8> = (0..3).map(|x| out.alpha(x, 0)).collect();
    assert_eq!(alphas, vec![128, 85, 0]);
}

#[test]
fn zero_radius_is_a_no_op() {
    let mut buf = PixelBuffer::new(4, 4);
    buf.put_pixel(1, 2, Rgba([1, 2, 3, 200]));
    assert_eq!(blur_alpha(&buf, 0), buf);
}

#[test]
fn opaque_buffer_stays_opaque() {
    let buf = PixelBuffer::filled(6, 4, Rgba([9, 9, 9, 255]));
    assert_eq!(blur_alpha(&buf, 2), buf);
}
