//! Conversion errors
//!
//! Every failure of the conversion pipeline is reported through [`ConvertError`].
//! A failed conversion never produces a partial grid.

use thiserror::Error;

/// Errors produced by the resampler, the luminance mapper and `convert`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Empty image, empty charset, zero width or a malformed parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The resampled grid would exceed the configured pixel ceiling.
    #[error("resampled size {width}x{height} exceeds the limit of {limit} pixels")]
    ResourceLimitExceeded {
        /// Requested output width.
        width: u64,
        /// Computed output height.
        height: u64,
        /// Configured maximum pixel count.
        limit: u64,
    },
}

impl ConvertError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ConvertError::InvalidInput(msg.into())
    }
}

/// Result alias for the conversion pipeline.
pub type Result<T> = std::result::Result<T, ConvertError>;
