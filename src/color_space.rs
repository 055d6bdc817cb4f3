//! Luminance calculations
//!
//! RGB to grayscale using ITU-R BT.709 weights on raw 0-255 sRGB channels.
//! No gamma correction or alpha blending is applied.

/// BT.709 weights scaled by [`LUMA_SCALE`]. They sum to exactly `LUMA_SCALE`.
const WEIGHT_R: u32 = 2126;
const WEIGHT_G: u32 = 7152;
const WEIGHT_B: u32 = 722;

/// Fixed-point scale applied to the BT.709 coefficients.
pub const LUMA_SCALE: u32 = 10_000;

/// Scaled luminance of a pure white pixel.
pub const SCALED_LUMA_MAX: u32 = 255 * LUMA_SCALE;

/// Convert RGB to luminance on the 0.0 to 255.0 scale
///
/// `0.2126 * r + 0.7152 * g + 0.0722 * b`
pub fn rgb_to_luminance(r: u8, g: u8, b: u8) -> f64 {
    f64::from(scaled_luminance(r, g, b)) / f64::from(LUMA_SCALE)
}

/// Luminance multiplied by [`LUMA_SCALE`], computed without rounding.
///
/// Ranges over `0..=SCALED_LUMA_MAX`.
#[inline]
pub fn scaled_luminance(r: u8, g: u8, b: u8) -> u32 {
    WEIGHT_R * u32::from(r) + WEIGHT_G * u32::from(g) + WEIGHT_B * u32::from(b)
}

/// `255 - L` on the scaled representation
#[inline]
pub fn invert_scaled(luminance: u32) -> u32 {
    SCALED_LUMA_MAX.saturating_sub(luminance)
}

/// Map a scaled luminance to an index into a ramp of `len` characters.
///
/// Computes `floor(L / 255 * (len - 1))` exactly and clamps to the last index.
/// `len` must be non-zero.
#[inline]
pub fn ramp_index(scaled: u32, len: usize) -> usize {
    debug_assert!(len > 0, "ramp must not be empty");
    let steps = (len - 1) as u64;
    let index = u64::from(scaled) * steps / u64::from(SCALED_LUMA_MAX);
    (index as usize).min(len - 1)
}
