//! Export of converted grids
//!
//! Joins grid rows into text and hands it to a file, stdout or the clipboard.
//! Grid characters are never altered; only the row separator is chosen here.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::OutputPreferences;
use crate::grid::CharacterGrid;

/// Row separator for exported text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Join the grid rows, optionally terminating the last row as well
pub fn render_text(grid: &CharacterGrid, line_ending: LineEnding, trailing_newline: bool) -> String {
    let separator = line_ending.as_str();
    let mut text = grid.join(separator);
    if trailing_newline {
        text.push_str(separator);
    }
    text
}

/// Render with the stored output preferences
pub fn render_with(grid: &CharacterGrid, prefs: &OutputPreferences) -> String {
    render_text(grid, prefs.line_ending, prefs.trailing_newline)
}

/// Write the rendered grid to `path`
pub fn write_to_file(grid: &CharacterGrid, path: &Path, prefs: &OutputPreferences) -> Result<()> {
    std::fs::write(path, render_with(grid, prefs))
        .with_context(|| format!("Failed to write output: {:?}", path))?;
    info!("saved {}x{} grid to {:?}", grid.width(), grid.height(), path);
    Ok(())
}

/// Place `text` on the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    clipboard
        .set_text(text.to_owned())
        .context("Copy to clipboard failed")?;
    info!("copied {} bytes to clipboard", text.len());
    Ok(())
}
