//! Configuration management
//!
//! Load and save user preferences to a TOML config file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::export::LineEnding;
use crate::render_engines::ascii::{CharacterSet, ConversionParams};
use crate::render_engines::resample::{DEFAULT_ASPECT_CORRECTION, DEFAULT_MAX_PIXELS};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub conversion: ConversionPreferences,
    pub output: OutputPreferences,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {:?}, using defaults", path);
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {:?}", path))?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "asciigen", "asciigen") {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            // Fallback to current directory
            Ok(PathBuf::from("asciigen.toml"))
        }
    }

    /// Check the stored values against the UI-level bounds
    pub fn validate(&self) -> Result<()> {
        let c = &self.conversion;
        if c.width == 0 || c.width > c.max_width {
            bail!("width must be between 1 and {}, got {}", c.max_width, c.width);
        }
        if !c.aspect_correction.is_finite() || c.aspect_correction <= 0.0 {
            bail!(
                "aspect_correction must be a positive number, got {}",
                c.aspect_correction
            );
        }
        if c.charset.chars().is_empty() {
            bail!("charset must not be empty");
        }
        Ok(())
    }

    /// Conversion parameters built from the stored preferences
    pub fn to_params(&self) -> ConversionParams {
        let c = &self.conversion;
        ConversionParams {
            target_width: c.width,
            charset: c.charset.clone(),
            invert: c.invert,
            aspect_correction: c.aspect_correction,
            max_pixels: c.max_pixels,
        }
    }
}

/// Conversion preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionPreferences {
    pub width: u32,
    pub charset: CharacterSet,
    pub invert: bool,
    pub aspect_correction: f64,
    /// Largest width a user may request
    pub max_width: u32,
    pub max_pixels: u64,
}

impl Default for ConversionPreferences {
    fn default() -> Self {
        Self {
            width: 100,
            charset: CharacterSet::Standard,
            invert: false,
            aspect_correction: DEFAULT_ASPECT_CORRECTION,
            max_width: 1000,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// Text output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPreferences {
    pub line_ending: LineEnding,
    pub trailing_newline: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Lf,
            trailing_newline: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.conversion.width, 100);
        assert_eq!(config.conversion.aspect_correction, 0.55);
        assert!(!config.conversion.invert);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.conversion.charset = CharacterSet::Custom(" .oO@".to_string());
        config.output.line_ending = LineEnding::CrLf;
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[conversion]\nwidth = 42\ninvert = true\n").unwrap();
        assert_eq!(parsed.conversion.width, 42);
        assert!(parsed.conversion.invert);
        assert_eq!(parsed.conversion.charset, CharacterSet::Standard);
        assert!(parsed.output.trailing_newline);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.conversion.width = 64;
        config.conversion.charset = CharacterSet::Blocks;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "conversion = 5").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let mut config = Config::default();
        config.conversion.width = config.conversion.max_width + 1;
        assert!(config.validate().is_err());

        config.conversion.width = 0;
        assert!(config.validate().is_err());

        config.conversion.width = 10;
        config.conversion.aspect_correction = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_params() {
        let mut config = Config::default();
        config.conversion.width = 33;
        config.conversion.invert = true;
        let params = config.to_params();
        assert_eq!(params.target_width, 33);
        assert!(params.invert);
        assert_eq!(params.max_pixels, DEFAULT_MAX_PIXELS);
    }
}
