//! Luminance mapper
//!
//! Turns every pixel of a resampled buffer into one character of an ordered
//! ramp. Index 0 receives the lowest luminance unless `invert` is set.

use rayon::prelude::*;

use crate::color_space::{invert_scaled, ramp_index, scaled_luminance};
use crate::error::{ConvertError, Result};
use crate::grid::CharacterGrid;
use crate::pixel_buffer::{PixelBuffer, CHANNELS};

/// Buffers with at least this many pixels map their rows on the rayon pool
const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Map every pixel to a character of `charset`, one output row per pixel row.
pub fn to_character_grid(
    pixels: &PixelBuffer,
    charset: &[char],
    invert: bool,
) -> Result<CharacterGrid> {
    if charset.is_empty() {
        return Err(ConvertError::invalid("empty charset"));
    }
    if pixels.is_empty() {
        return Err(ConvertError::invalid(format!(
            "empty pixel buffer ({}x{})",
            pixels.width(),
            pixels.height()
        )));
    }

    let width = pixels.width() as usize;
    let map_row = |row: &[u8]| -> String {
        row.chunks_exact(CHANNELS)
            .map(|px| map_pixel_to_char(px[0], px[1], px[2], charset, invert))
            .collect()
    };

    let rows: Vec<String> = if width * pixels.height() as usize >= PARALLEL_THRESHOLD {
        // Indexed collect keeps rows in source order
        pixels
            .as_raw()
            .par_chunks_exact(width * CHANNELS)
            .map(map_row)
            .collect()
    } else {
        pixels.rows().map(map_row).collect()
    };

    Ok(CharacterGrid::from_rows(width, rows))
}

/// Map a single RGB value to a ramp character. `charset` must be non-empty.
#[inline]
pub fn map_pixel_to_char(r: u8, g: u8, b: u8, charset: &[char], invert: bool) -> char {
    let luminance = scaled_luminance(r, g, b);
    let luminance = if invert {
        invert_scaled(luminance)
    } else {
        luminance
    };
    charset[ramp_index(luminance, charset.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |_, _| [value, value, value, 255])
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_black_and_white() {
        let pixels = PixelBuffer::from_fn(2, 1, |x, _| {
            let v = if x == 0 { 0 } else { 255 };
            [v, v, v, 255]
        });
        let grid = to_character_grid(&pixels, &chars("01"), false).unwrap();
        assert_eq!(grid.rows(), &["01".to_string()]);
    }

    #[test]
    fn test_invert_flips() {
        let pixels = solid(3, 2, 255);
        let ramp = chars(" .:-=+*#%@");
        let normal = to_character_grid(&pixels, &ramp, false).unwrap();
        let inverted = to_character_grid(&pixels, &ramp, true).unwrap();
        assert_eq!(normal.rows()[0], "@@@");
        assert_eq!(inverted.rows()[0], "   ");
    }

    #[test]
    fn test_single_char_ramp() {
        let pixels = PixelBuffer::from_fn(5, 3, |x, y| [x as u8 * 50, y as u8 * 80, 7, 0]);
        let grid = to_character_grid(&pixels, &['#'], false).unwrap();
        assert!(grid.rows().iter().all(|row| row == "#####"));
    }

    #[test]
    fn test_alpha_ignored() {
        let opaque = PixelBuffer::from_fn(1, 1, |_, _| [200, 200, 200, 255]);
        let clear = PixelBuffer::from_fn(1, 1, |_, _| [200, 200, 200, 0]);
        let ramp = chars(" .:-=+*#%@");
        assert_eq!(
            to_character_grid(&opaque, &ramp, false).unwrap(),
            to_character_grid(&clear, &ramp, false).unwrap()
        );
    }

    #[test]
    fn test_errors() {
        let pixels = solid(2, 2, 10);
        assert_eq!(
            to_character_grid(&pixels, &[], false).unwrap_err(),
            ConvertError::invalid("empty charset")
        );
        assert!(matches!(
            to_character_grid(&PixelBuffer::new(0, 3), &['a'], false),
            Err(ConvertError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parallel_path_matches_rows() {
        // 512 x 160 crosses the parallel threshold
        let pixels = PixelBuffer::from_fn(512, 160, |x, y| {
            let v = ((x + y * 3) % 256) as u8;
            [v, v, v, 255]
        });
        let ramp = chars(" .:-=+*#%@");
        let grid = to_character_grid(&pixels, &ramp, false).unwrap();
        assert_eq!(grid.height(), 160);
        for (y, row) in grid.rows().iter().enumerate() {
            let expected: String = (0..512u32)
                .map(|x| {
                    let [r, g, b, _] = pixels.pixel(x, y as u32);
                    map_pixel_to_char(r, g, b, &ramp, false)
                })
                .collect();
            assert_eq!(row, &expected, "row {} out of place", y);
        }
    }
}
