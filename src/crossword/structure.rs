//! Blocked/open cell layout of a crossword

use super::PuzzleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default character marking a fillable cell in a structure file
pub const DEFAULT_OPEN_CELL: char = '_';

/// Rectangular grid of open (fillable) and blocked cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<bool>,
}

impl Structure {
    /// Create a structure from rows of open flags. Short rows are padded with blocked cells.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, PuzzleError> {
        if rows.is_empty() {
            return Err(PuzzleError::EmptyStructure);
        }

        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(PuzzleError::EmptyStructure);
        }

        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            let padding = width - row.len();
            cells.extend(row);
            cells.extend(std::iter::repeat(false).take(padding));
        }

        let structure = Self { width, height, cells };
        if structure.open_count() == 0 {
            return Err(PuzzleError::NoOpenCells { open_cell: DEFAULT_OPEN_CELL });
        }
        Ok(structure)
    }

    /// Parse a structure where `open_cell` marks fillable cells and anything else is blocked.
    /// Height is the number of lines; width is the longest line.
    pub fn parse(content: &str, open_cell: char) -> Result<Self, PuzzleError> {
        if open_cell.is_whitespace() {
            return Err(PuzzleError::InvalidOpenCell(open_cell));
        }

        let rows: Vec<Vec<bool>> = content
            .lines()
            .map(|line| line.chars().map(|ch| ch == open_cell).collect())
            .collect();

        match Self::from_rows(rows) {
            Err(PuzzleError::NoOpenCells { .. }) => Err(PuzzleError::NoOpenCells { open_cell }),
            other => other,
        }
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Whether the cell can hold a letter. Out of bounds cells are blocked.
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[self.index(row, col)]
    }

    /// Count open cells
    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|&&open| open).count()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let symbol = if self.is_open(row, col) { DEFAULT_OPEN_CELL } else { '█' };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
