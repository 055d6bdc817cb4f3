//! ASCII conversion
//!
//! Character ramps, conversion parameters and the `convert` entry point that
//! chains the resampler and the luminance mapper.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use super::luminance::to_character_grid;
use super::resample::{
    output_dimensions, resample_with_limit, DEFAULT_ASPECT_CORRECTION, DEFAULT_MAX_PIXELS,
};
use crate::error::{ConvertError, Result};
use crate::grid::CharacterGrid;
use crate::pixel_buffer::PixelBuffer;

/// Character ramp used for mapping, ordered from lowest to highest luminance
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterSet {
    /// Simple 10-character set: " .:-=+*#%@"
    #[default]
    Standard,
    /// Extended 70-character set for more detail
    Extended,
    /// Unicode block elements: " ░▒▓█"
    Blocks,
    /// Custom user-defined character set
    Custom(String),
}

impl CharacterSet {
    /// Named presets
    pub const PRESETS: [CharacterSet; 3] = [
        CharacterSet::Standard,
        CharacterSet::Extended,
        CharacterSet::Blocks,
    ];

    pub fn name(&self) -> &str {
        match self {
            CharacterSet::Standard => "standard",
            CharacterSet::Extended => "extended",
            CharacterSet::Blocks => "blocks",
            CharacterSet::Custom(_) => "custom",
        }
    }

    pub fn chars(&self) -> &str {
        match self {
            CharacterSet::Standard => " .:-=+*#%@",
            CharacterSet::Extended => {
                " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$"
            }
            CharacterSet::Blocks => " ░▒▓█",
            CharacterSet::Custom(chars) => chars,
        }
    }

    /// The ramp as individual characters
    pub fn to_vec(&self) -> Vec<char> {
        self.chars().chars().collect()
    }
}

/// Parses a preset name (case-insensitive) or `custom:<chars>`
impl FromStr for CharacterSet {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(chars) = s.strip_prefix("custom:") {
            if chars.is_empty() {
                return Err(ConvertError::invalid("empty charset"));
            }
            return Ok(CharacterSet::Custom(chars.to_string()));
        }
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(CharacterSet::Standard),
            "extended" => Ok(CharacterSet::Extended),
            "blocks" => Ok(CharacterSet::Blocks),
            other => Err(ConvertError::invalid(format!(
                "unknown charset '{}', expected standard, extended, blocks or custom:<chars>",
                other
            ))),
        }
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterSet::Custom(chars) => write!(f, "custom:{}", chars),
            preset => f.write_str(preset.name()),
        }
    }
}

/// Parameters for one conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionParams {
    /// Output columns
    pub target_width: u32,
    pub charset: CharacterSet,
    /// Map high luminance to the start of the ramp instead of the end
    pub invert: bool,
    /// Character cell width / height
    pub aspect_correction: f64,
    /// Ceiling on resampled pixels
    pub max_pixels: u64,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            target_width: 100,
            charset: CharacterSet::Standard,
            invert: false,
            aspect_correction: DEFAULT_ASPECT_CORRECTION,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl ConversionParams {
    /// Check every parameter against `source` without doing any pixel work.
    ///
    /// Returns the resampled dimensions on success.
    pub fn validate(&self, source: &PixelBuffer) -> Result<(u32, u32)> {
        if self.charset.chars().is_empty() {
            return Err(ConvertError::invalid("empty charset"));
        }
        output_dimensions(
            source.width(),
            source.height(),
            self.target_width,
            self.aspect_correction,
            self.max_pixels,
        )
    }
}

/// Convert an image to a character grid.
///
/// All parameters are validated before any pixel is touched; an error never
/// leaves a partial grid behind.
pub fn convert(source: &PixelBuffer, params: &ConversionParams) -> Result<CharacterGrid> {
    let (width, height) = params.validate(source)?;

    let ramp = params.charset.to_vec();
    if ramp.iter().any(|&c| c.width() != Some(1)) {
        warn!(
            "charset '{}' contains characters that are not one column wide; rows will look ragged",
            params.charset
        );
    }

    debug!(
        "converting {}x{} image to {}x{} grid with {} charset",
        source.width(),
        source.height(),
        width,
        height,
        params.charset.name()
    );

    let resampled = resample_with_limit(
        source,
        params.target_width,
        params.aspect_correction,
        params.max_pixels,
    )?;
    to_character_grid(&resampled, &ramp, params.invert)
}
