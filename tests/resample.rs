use image::Rgba;
use iconforge::pixel::PixelBuffer;
use iconforge::resample::{resize_bilinear, resize_contain_padded, resize_contain_square};

const OPAQUE: Rgba<u8> = Rgba([10, 20, 30, 255]);

#[test]
fn same_size_is_a_copy() {
    let mut buf = PixelBuffer::new(3, 2);
    buf.put_pixel(1, 1, OPAQUE);
    assert_eq!(resize_bilinear(&buf, 3, 2), buf);
}

#[test]
fn uniform_color_stays_uniform() {
    let buf = PixelBuffer::filled(4, 4, OPAQUE);
    let out = resize_bilinear(&buf, 7, 3);

    assert_eq!(out.dimensions(), (7, 3));
    assert!(out.as_raw().chunks_exact(4).all(|px| px == OPAQUE.0));
}

#[test]
fn upscale_interpolates_between_pixel_centers() {
    let mut buf = PixelBuffer::new(2, 1);
    buf.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
    buf.put_pixel(1, 0, Rgba([255, 255, 255, 255]));

    let out = resize_bilinear(&buf, 4, 1);
    let reds: Vec<u8> = (0..4).map(|x| out.pixel(x, 0)[0]).collect();
    assert_eq!(reds, vec![0, 64, 191, 255]);
}

#[test]
fn alpha_is_interpolated_like_color() {
    let mut buf = PixelBuffer::new(2, 1);
    buf.put_pixel(1, 0, Rgba([0, 0, 0, 255]));

    let out = resize_bilinear(&buf, 4, 1);
    let alphas: Vec<u8> = (0..4).map(|x| out.alpha(x, 0)).collect();
    assert_eq!(alphas, vec![0, 64, 191, 255]);
}

#[test]
fn contain_square_centers_wide_images() {
    let buf = PixelBuffer::filled(4, 2, OPAQUE);
    let out = resize_contain_square(&buf, 8);

    assert_eq!(out.dimensions(), (8, 8));
    for y in 0..8 {
        let expected = if (2..6).contains(&y) { 255 } else { 0 };
        for x in 0..8 {
            assert_eq!(out.alpha(x, y), expected, "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn contain_square_of_empty_source_is_transparent() {
    let out = resize_contain_square(&PixelBuffer::new(0, 0), 5);
    assert_eq!(out, PixelBuffer::new(5, 5));

    let out = resize_contain_square(&PixelBuffer::filled(3, 3, OPAQUE), 0);
    assert_eq!(out.dimensions(), (1, 1));
}

#[test]
fn padded_contain_leaves_transparent_border() {
    let buf = PixelBuffer::filled(10, 10, OPAQUE);
    let out = resize_contain_padded(&buf, 20, 0.1);

    assert_eq!(out.dimensions(), (20, 20));
    assert_eq!(out.alpha(1, 10), 0);
    assert_eq!(out.alpha(2, 10), 255);
    assert_eq!(out.alpha(17, 17), 255);
    assert_eq!(out.alpha(18, 10), 0);
}

#[test]
fn zero_padding_is_plain_contain() {
    let buf = PixelBuffer::filled(3, 6, OPAQUE);
    assert_eq!(
        resize_contain_padded(&buf, 12, 0.0),
        resize_contain_square(&buf, 12)
    );
}
