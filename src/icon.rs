use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::{ImageFormat, RgbaImage};

use crate::pixel::PixelBuffer;
use crate::pipeline::SourceImage;

/// File names probed, in order, when looking for a badge in a directory.
pub const BADGE_CANDIDATES: &[&str] = &["badge.png", "icon.png"];

/// Decodes an image from disk into RGBA8, remembering whether it had alpha.
pub fn load_source(path: &Path) -> Result<SourceImage> {
    let img =
        image::open(path).with_context(|| format!("Failed to open image: {}", path.display()))?;
    let has_alpha = img.color().has_alpha();

    Ok(SourceImage {
        buffer: PixelBuffer::from(img.to_rgba8()),
        has_alpha,
    })
}

/// Decodes an image from disk straight into a pixel buffer.
pub fn load_buffer(path: &Path) -> Result<PixelBuffer> {
    Ok(load_source(path)?.buffer)
}

pub fn encode_png(buf: &PixelBuffer) -> Result<Vec<u8>> {
    let img = RgbaImage::from(buf.clone());
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(out)
}

/// Packs square frames into a multi-resolution `.ico`.
pub fn encode_ico(frames: &[PixelBuffer]) -> Result<Vec<u8>> {
    let mut icon_dir = IconDir::new(ResourceType::Icon);

    for frame in frames {
        let (w, h) = frame.dimensions();
        let image = IconImage::from_rgba_data(w, h, frame.as_raw().to_vec());
        let entry = IconDirEntry::encode(&image)
            .with_context(|| format!("Failed to encode {}x{} ICO entry", w, h))?;
        icon_dir.add_entry(entry);
    }

    let mut out = Vec::new();
    icon_dir.write(&mut out).context("Failed to write ICO")?;
    Ok(out)
}

pub fn write_png(buf: &PixelBuffer, path: &Path) -> Result<()> {
    let bytes = encode_png(buf)?;
    write_bytes(&bytes, path)
}

pub fn write_bytes(bytes: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

/// First badge candidate present in `dir`.
pub fn find_badge(dir: &Path) -> Option<PathBuf> {
    BADGE_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// `tray.png` -> `tray@2x.png`.
pub fn scaled_path(path: &Path, scale: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    path.with_file_name(format!("{}@{}x.{}", stem, scale, ext))
}
