//! Render engines module
//!
//! The conversion pipeline: resampling, luminance mapping and the `convert`
//! entry point that chains them.

pub mod ascii;
pub mod luminance;
pub mod resample;
