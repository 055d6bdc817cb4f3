//! asciigen - image to ASCII character grid conversion
//!
//! The core turns a decoded [`PixelBuffer`] and a set of [`ConversionParams`]
//! into a [`CharacterGrid`]. Image decoding, settings, clipboard and export
//! live in the surrounding modules.

pub mod color_space;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod image_loader;
pub mod pixel_buffer;
pub mod render_engines;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use error::ConvertError;
pub use grid::CharacterGrid;
pub use pixel_buffer::PixelBuffer;
pub use render_engines::ascii::{convert, CharacterSet, ConversionParams};
