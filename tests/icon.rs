use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage, Rgba};
use iconforge::icon::{
    encode_ico, encode_png, find_badge, load_buffer, load_source, scaled_path, write_png,
};
use iconforge::pixel::PixelBuffer;

fn sample() -> PixelBuffer {
    let mut buf = PixelBuffer::new(3, 2);
    buf.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    buf.put_pixel(2, 1, Rgba([0, 0, 255, 128]));
    buf
}

#[test]
fn png_write_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.png");

    write_png(&sample(), &path).unwrap();
    assert_eq!(load_buffer(&path).unwrap(), sample());

    let source = load_source(&path).unwrap();
    assert!(source.has_alpha);
}

#[test]
fn encoded_png_is_decodable() {
    let bytes = encode_png(&sample()).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(PixelBuffer::from(decoded), sample());
}

#[test]
fn rgb_png_has_no_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("opaque.png");
    RgbImage::from_pixel(4, 4, Rgb([10, 20, 30])).save(&path).unwrap();

    let source = load_source(&path).unwrap();
    assert!(!source.has_alpha);
    assert_eq!(source.buffer.pixel(3, 3), Rgba([10, 20, 30, 255]));
}

#[test]
fn missing_image_is_an_error() {
    let err = load_source(Path::new("/definitely/not/here.png")).unwrap_err();
    assert!(err.to_string().contains("Failed to open image"));
}

#[test]
fn ico_contains_every_frame() {
    let frames: Vec<PixelBuffer> = [16, 32, 48]
        .iter()
        .map(|&s| PixelBuffer::filled(s, s, Rgba([0, 128, 255, 255])))
        .collect();

    let bytes = encode_ico(&frames).unwrap();
    let icon_dir = ico::IconDir::read(Cursor::new(bytes)).unwrap();

    let sizes: Vec<(u32, u32)> = icon_dir
        .entries()
        .iter()
        .map(|e| (e.width(), e.height()))
        .collect();
    assert_eq!(sizes, vec![(16, 16), (32, 32), (48, 48)]);

    let image = icon_dir.entries()[1].decode().unwrap();
    assert_eq!(&image.rgba_data()[..4], &[0, 128, 255, 255]);
}

#[test]
fn badge_lookup_prefers_badge_png() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(find_badge(dir.path()), None);

    std::fs::write(dir.path().join("icon.png"), b"x").unwrap();
    assert_eq!(find_badge(dir.path()), Some(dir.path().join("icon.png")));

    std::fs::write(dir.path().join("badge.png"), b"x").unwrap();
    assert_eq!(find_badge(dir.path()), Some(dir.path().join("badge.png")));
}

#[test]
fn scaled_paths() {
    assert_eq!(
        scaled_path(Path::new("assets/tray.png"), 2),
        PathBuf::from("assets/tray@2x.png")
    );
    assert_eq!(scaled_path(Path::new("tray"), 2), PathBuf::from("tray@2x.png"));
}
