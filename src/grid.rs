//! Character grid produced by a conversion

use std::fmt;

/// Rectangular grid of characters, one `String` per row.
///
/// Every row holds exactly `width` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterGrid {
    width: usize,
    rows: Vec<String>,
}

impl CharacterGrid {
    /// Assemble a grid from rows. Callers guarantee equal row lengths.
    pub(crate) fn from_rows(width: usize, rows: Vec<String>) -> Self {
        debug_assert!(
            rows.iter().all(|row| row.chars().count() == width),
            "ragged character grid"
        );
        Self { width, rows }
    }

    /// Characters per row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Join the rows with `separator` (no trailing separator)
    pub fn join(&self, separator: &str) -> String {
        self.rows.join(separator)
    }
}

/// Writes every row followed by `\n`
impl fmt::Display for CharacterGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
