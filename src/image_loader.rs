//! Image loading utilities
//!
//! Decodes files, byte buffers and clipboard images into [`PixelBuffer`]s.

use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use log::debug;

use crate::pixel_buffer::PixelBuffer;

/// Load an image from a file path
///
/// Supports PNG, JPEG, GIF, BMP, and WebP formats.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path).with_context(|| format!("Failed to load image: {:?}", path))?;
    debug!("decoded {:?} ({}x{})", path, img.width(), img.height());
    Ok(img)
}

/// Load an image from bytes
pub fn load_image_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes).context("Failed to decode image from memory")?;
    Ok(img)
}

/// Decode a file straight into a pixel buffer
pub fn load_pixels(path: &Path) -> Result<PixelBuffer> {
    Ok(PixelBuffer::from_image(&load_image(path)?))
}

/// Read an image from the system clipboard
pub fn read_clipboard_image() -> Result<PixelBuffer> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    let data = clipboard
        .get_image()
        .context("Clipboard does not hold an image")?;
    debug!("clipboard image {}x{}", data.width, data.height);

    let width = u32::try_from(data.width).context("Clipboard image too wide")?;
    let height = u32::try_from(data.height).context("Clipboard image too tall")?;
    let pixels = PixelBuffer::from_raw(width, height, data.bytes.into_owned())
        .context("Clipboard image has an unexpected layout")?;
    Ok(pixels)
}

/// Get supported image format extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["png", "jpg", "jpeg", "gif", "bmp", "webp"]
}

/// Check if a file extension is a supported image format
pub fn is_supported_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            supported_extensions().iter().any(|&e| e == ext_lower)
        })
        .unwrap_or(false)
}

/// Get image dimensions
pub fn get_image_dimensions(path: &Path) -> Result<(u32, u32)> {
    let reader = image::ImageReader::open(path)
        .with_context(|| format!("Failed to open image: {:?}", path))?;
    let dimensions = reader
        .with_guessed_format()?
        .into_dimensions()
        .with_context(|| format!("Failed to read dimensions: {:?}", path))?;
    Ok(dimensions)
}
