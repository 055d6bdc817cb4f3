//! Resampler
//!
//! Reshapes a source buffer to the requested column count, correcting the row
//! count for character cells being taller than wide.
//!
//! The filter is nearest-neighbor: every output pixel maps its center back to
//! source coordinates, `sx = floor((2x + 1) * src_w / (2 * out_w))`, computed in
//! integer arithmetic so identical inputs always give identical outputs.

use log::debug;

use crate::error::{ConvertError, Result};
use crate::pixel_buffer::{PixelBuffer, CHANNELS};

/// Default ratio of character cell width to height
pub const DEFAULT_ASPECT_CORRECTION: f64 = 0.55;

/// Default ceiling on resampled pixels (4096 x 4096)
pub const DEFAULT_MAX_PIXELS: u64 = 16_777_216;

/// Resample with the default pixel ceiling
pub fn resample(
    source: &PixelBuffer,
    target_width: u32,
    aspect_correction: f64,
) -> Result<PixelBuffer> {
    resample_with_limit(source, target_width, aspect_correction, DEFAULT_MAX_PIXELS)
}

/// Resample `source` to `target_width` columns.
///
/// Fails with `ResourceLimitExceeded` when the output would hold more than
/// `max_pixels` pixels; nothing is allocated in that case.
pub fn resample_with_limit(
    source: &PixelBuffer,
    target_width: u32,
    aspect_correction: f64,
    max_pixels: u64,
) -> Result<PixelBuffer> {
    let (out_width, out_height) = output_dimensions(
        source.width(),
        source.height(),
        target_width,
        aspect_correction,
        max_pixels,
    )?;

    debug!(
        "resampling {}x{} -> {}x{}",
        source.width(),
        source.height(),
        out_width,
        out_height
    );

    if out_width == source.width() && out_height == source.height() {
        return Ok(source.clone());
    }

    let src_cols: Vec<usize> = (0..out_width)
        .map(|x| center_to_source(x, out_width, source.width()) as usize * CHANNELS)
        .collect();

    let mut data = Vec::with_capacity(out_width as usize * out_height as usize * CHANNELS);
    let src = source.as_raw();
    let stride = source.width() as usize * CHANNELS;

    for y in 0..out_height {
        let row_start = center_to_source(y, out_height, source.height()) as usize * stride;
        for &col in &src_cols {
            let idx = row_start + col;
            data.extend_from_slice(&src[idx..idx + CHANNELS]);
        }
    }

    PixelBuffer::from_raw(out_width, out_height, data)
}

/// Compute the resampled `(width, height)` without touching pixel data.
///
/// `height = max(1, round(src_h * target_width / src_w * aspect_correction))`
pub fn output_dimensions(
    src_width: u32,
    src_height: u32,
    target_width: u32,
    aspect_correction: f64,
    max_pixels: u64,
) -> Result<(u32, u32)> {
    if src_width == 0 || src_height == 0 {
        return Err(ConvertError::invalid("empty source image"));
    }
    if target_width == 0 {
        return Err(ConvertError::invalid("target width must be at least 1"));
    }
    if !aspect_correction.is_finite() || aspect_correction <= 0.0 {
        return Err(ConvertError::invalid(format!(
            "aspect correction must be a positive number, got {}",
            aspect_correction
        )));
    }

    let scale = f64::from(target_width) / f64::from(src_width);
    // `as` saturates, so an absurd height still reaches the limit check below
    let height = (f64::from(src_height) * scale * aspect_correction)
        .round()
        .max(1.0) as u64;

    let over_limit = || ConvertError::ResourceLimitExceeded {
        width: u64::from(target_width),
        height,
        limit: max_pixels,
    };

    match u64::from(target_width).checked_mul(height) {
        Some(pixels) if pixels <= max_pixels => {}
        _ => return Err(over_limit()),
    }
    let height = u32::try_from(height).map_err(|_| over_limit())?;

    Ok((target_width, height))
}

/// Source index under the center of output cell `i`
#[inline]
fn center_to_source(i: u32, out_len: u32, src_len: u32) -> u32 {
    let pos = (2 * u64::from(i) + 1) * u64::from(src_len) / (2 * u64::from(out_len));
    (pos as u32).min(src_len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            let v = if (x + y) % 2 == 0 { 0 } else { 255 };
            [v, v, v, 255]
        })
    }

    #[test]
    fn test_identity_copy() {
        let src = checker(4, 3);
        let out = resample(&src, 4, 1.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_dimensions_with_aspect() {
        assert_eq!(
            output_dimensions(100, 100, 80, 0.55, DEFAULT_MAX_PIXELS).unwrap(),
            (80, 44)
        );
        // 200 * 0.5 * 0.55 = 55
        assert_eq!(
            output_dimensions(200, 200, 100, 0.55, DEFAULT_MAX_PIXELS).unwrap(),
            (100, 55)
        );
    }

    #[test]
    fn test_height_clamped_to_one() {
        let src = PixelBuffer::new(1000, 1);
        let out = resample(&src, 10, 0.55).unwrap();
        assert_eq!(out.width(), 10);
        assert_eq!(out.height(), 1);
    }

    #[test]
    fn test_rejects_empty_source() {
        let err = resample(&PixelBuffer::new(0, 10), 10, 0.55).unwrap_err();
        assert_eq!(err, ConvertError::invalid("empty source image"));
        assert!(resample(&PixelBuffer::new(10, 0), 10, 0.55).is_err());
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let src = checker(4, 4);
        assert!(matches!(
            resample(&src, 0, 0.55),
            Err(ConvertError::InvalidInput(_))
        ));
        for aspect in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                resample(&src, 4, aspect),
                Err(ConvertError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_resource_limit() {
        let src = checker(2, 2);
        let err = resample_with_limit(&src, 100, 1.0, 5_000).unwrap_err();
        assert_eq!(
            err,
            ConvertError::ResourceLimitExceeded {
                width: 100,
                height: 100,
                limit: 5_000,
            }
        );
        assert!(resample_with_limit(&src, 100, 1.0, 10_000).is_ok());
    }

    #[test]
    fn test_huge_width_hits_limit() {
        let src = checker(1, 1000);
        let err = resample(&src, u32::MAX, 1.0).unwrap_err();
        assert!(matches!(err, ConvertError::ResourceLimitExceeded { .. }));
    }

    #[test]
    fn test_downscale_samples_centers() {
        // Columns 0..4 carry their index as red; halving picks columns 1 and 3
        let src = PixelBuffer::from_fn(4, 1, |x, _| [x as u8, 0, 0, 255]);
        let out = resample(&src, 2, 2.0).unwrap();
        assert_eq!((out.width(), out.height()), (2, 1));
        assert_eq!(out.pixel(0, 0)[0], 1);
        assert_eq!(out.pixel(1, 0)[0], 3);
    }

    #[test]
    fn test_upscale_repeats_pixels() {
        let src = PixelBuffer::from_fn(2, 1, |x, _| [x as u8 * 255, 0, 0, 255]);
        let out = resample(&src, 4, 0.25).unwrap();
        assert_eq!((out.width(), out.height()), (4, 1));
        let reds: Vec<u8> = (0..4).map(|x| out.pixel(x, 0)[0]).collect();
        assert_eq!(reds, vec![0, 0, 255, 255]);
    }

    #[test]
    fn test_source_untouched() {
        let src = checker(8, 8);
        let before = src.clone();
        let _ = resample(&src, 3, 0.55).unwrap();
        assert_eq!(src, before);
    }
}
