//! RGBA pixel storage
//!
//! The buffer handed between pipeline stages.

use image::DynamicImage;

use crate::error::{ConvertError, Result};

/// Bytes per RGBA pixel
pub const CHANNELS: usize = 4;

/// Row-major RGBA pixels, 4 bytes per pixel.
///
/// Either dimension may be zero; such a buffer is rejected by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled (transparent black) buffer
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * CHANNELS;
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Wrap raw RGBA bytes. The length must equal `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as u64)
            .checked_mul(height as u64)
            .and_then(|n| n.checked_mul(CHANNELS as u64))
            .ok_or_else(|| ConvertError::invalid("pixel buffer dimensions overflow"))?;
        if data.len() as u64 != expected {
            return Err(ConvertError::invalid(format!(
                "pixel buffer holds {} bytes, expected {} for {}x{} RGBA",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel in row-major order.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Convert a decoded image to RGBA8
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            data: rgba.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at (x, y) as `[r, g, b, a]`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds for {}x{}",
            x,
            y,
            self.width,
            self.height
        );
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Iterate over rows as byte slices of `width * 4` bytes
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact panics on a zero chunk size
        let stride = (self.width as usize * CHANNELS).max(1);
        self.data.chunks_exact(stride).take(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_new_is_zeroed() {
        let buf = PixelBuffer::new(3, 2);
        assert_eq!(buf.as_raw().len(), 24);
        assert!(buf.as_raw().iter().all(|&b| b == 0));
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_from_raw_length_mismatch() {
        let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidInput(_)));
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_zero_sized_is_empty() {
        assert!(PixelBuffer::new(0, 5).is_empty());
        assert!(PixelBuffer::from_raw(4, 0, Vec::new()).unwrap().is_empty());
        assert_eq!(PixelBuffer::new(0, 5).rows().count(), 0);
    }

    #[test]
    fn test_from_fn_row_major() {
        let buf = PixelBuffer::from_fn(2, 2, |x, y| [x as u8, y as u8, 0, 255]);
        assert_eq!(buf.pixel(1, 0), [1, 0, 0, 255]);
        assert_eq!(buf.pixel(0, 1), [0, 1, 0, 255]);
        let rows: Vec<&[u8]> = buf.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[0, 1, 0, 255, 1, 1, 0, 255]);
    }

    #[test]
    fn test_from_image_adds_opaque_alpha() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(1, 0, Rgb([10, 20, 30]));
        let buf = PixelBuffer::from_image(&DynamicImage::ImageRgb8(img));
        assert_eq!(buf.width(), 2);
        assert_eq!(buf.height(), 1);
        assert_eq!(buf.pixel(1, 0), [10, 20, 30, 255]);
    }
}
