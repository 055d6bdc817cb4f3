//! Main entry point for asciigen

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use log::{error, info, warn, LevelFilter};

use asciigen::{
    config::Config,
    export::{copy_to_clipboard, render_with, write_to_file},
    image_loader::{is_supported_format, load_pixels, read_clipboard_image},
    render_engines::ascii::CharacterSet,
    worker::{default_worker_count, spawn_workers},
    CharacterGrid, PixelBuffer,
};

/// How long to wait for a single conversion before giving up
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(60);

/// Convert images to ASCII art.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Images to convert (PNG, JPEG, GIF, BMP, WebP).
    images: Vec<PathBuf>,

    /// Read the image from the system clipboard.
    #[arg(long, default_value_t = false)]
    clipboard: bool,

    /// Output width in characters.
    #[arg(short, long)]
    width: Option<u32>,

    /// Character ramp: standard, extended, blocks or custom:<chars>.
    #[arg(short, long)]
    charset: Option<CharacterSet>,

    /// Map bright pixels to the start of the ramp (`--invert=false` turns it off).
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    invert: Option<bool>,

    /// Character cell width / height ratio.
    #[arg(long)]
    aspect: Option<f64>,

    /// Write the result to a file instead of stdout (single input only).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Copy the result to the clipboard.
    #[arg(long, default_value_t = false)]
    copy: bool,

    /// Settings file. Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Persist the effective settings before converting.
    #[arg(long, default_value_t = false)]
    save_config: bool,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new().filter_level(cli.log_level).init();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let (mut config, loaded) = load_settings(&config_path);

    apply_overrides(&cli, &mut config);
    config.validate()?;

    if cli.save_config {
        save_settings(&config, &config_path, loaded)?;
    }

    let sources = collect_sources(&cli)?;
    if cli.output.is_some() && sources.len() > 1 {
        bail!("--output accepts a single input, got {}", sources.len());
    }

    let grids = convert_all(sources, &config)?;

    let text: String = grids
        .iter()
        .map(|grid| render_with(grid, &config.output))
        .collect::<Vec<_>>()
        .join(config.output.line_ending.as_str());

    match &cli.output {
        Some(path) => write_to_file(&grids[0], path, &config.output)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }

    if cli.copy {
        copy_to_clipboard(&text)?;
    }

    Ok(())
}

/// Load the settings file; the flag is false when it exists but could not be read
fn load_settings(path: &Path) -> (Config, bool) {
    match Config::load_from(path) {
        Ok(config) => (config, true),
        Err(e) => {
            warn!("Failed to load config, using defaults: {:#}", e);
            (Config::default(), false)
        }
    }
}

/// Persist settings unless the existing file failed to load
fn save_settings(config: &Config, path: &Path, loaded: bool) -> Result<()> {
    if !loaded {
        bail!(
            "Refusing to overwrite {:?}: it could not be read. Fix or remove it first.",
            path
        );
    }
    config.save_to(path)?;
    info!("saved settings to {:?}", path);
    Ok(())
}

/// Command-line flags take precedence over the settings file
fn apply_overrides(cli: &Cli, config: &mut Config) {
    let c = &mut config.conversion;
    if let Some(width) = cli.width {
        c.width = width;
    }
    if let Some(charset) = &cli.charset {
        c.charset = charset.clone();
    }
    if let Some(invert) = cli.invert {
        c.invert = invert;
    }
    if let Some(aspect) = cli.aspect {
        c.aspect_correction = aspect;
    }
}

/// Decode every requested input, in command-line order
fn collect_sources(cli: &Cli) -> Result<Vec<(String, PixelBuffer)>> {
    let mut sources = Vec::new();

    for path in &cli.images {
        if !is_supported_format(path) {
            warn!("{:?} does not have a known image extension, trying anyway", path);
        }
        sources.push((path.display().to_string(), load_pixels(path)?));
    }
    if cli.clipboard {
        sources.push(("<clipboard>".to_string(), read_clipboard_image()?));
    }

    if sources.is_empty() {
        bail!("No input given. Pass image paths or --clipboard.");
    }
    Ok(sources)
}

/// Convert all sources on the worker pool and return the grids in input order
fn convert_all(sources: Vec<(String, PixelBuffer)>, config: &Config) -> Result<Vec<CharacterGrid>> {
    let workers = spawn_workers(default_worker_count().min(sources.len()))?;

    let (names, images): (Vec<String>, Vec<PixelBuffer>) = sources.into_iter().unzip();
    let sent = workers.submit_all(images, &config.to_params())?;
    let outcomes = workers.collect_ordered(sent, RESPONSE_TIMEOUT);
    workers.shutdown();

    let mut grids = Vec::with_capacity(sent);
    let mut failures = 0;
    for (name, outcome) in names.iter().zip(outcomes?) {
        match outcome {
            Ok(grid) => {
                info!("{}: {}x{}", name, grid.width(), grid.height());
                grids.push(grid);
            }
            Err(e) => {
                error!("{}: {}", name, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} conversions failed", failures, names.len());
    }
    Ok(grids)
}
