//! Errors raised while building a crossword model

use thiserror::Error;

/// Problems with the structure or word list that make a puzzle impossible to build
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    /// The structure has no rows at all.
    #[error("Structure is empty or contains no rows")]
    EmptyStructure,

    /// The structure has rows, but none of its cells can hold a letter.
    #[error("Structure has no open cells (open cell character is '{open_cell}')")]
    NoOpenCells { open_cell: char },

    /// The structure has open cells but no run of two or more of them.
    #[error("Structure contains no slots of length two or more")]
    NoSlots,

    /// The word list was empty after trimming blank lines.
    #[error("Word list contains no words")]
    EmptyWordList,

    /// The open cell character would be stripped or never appear in a line.
    #[error("Invalid open cell character {0:?}")]
    InvalidOpenCell(char),
}
