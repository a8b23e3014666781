//! Crossword puzzle model: structure, slots, words and overlaps

pub mod error;
pub mod structure;
pub mod slot;
pub mod puzzle;
pub mod io;

pub use error::PuzzleError;
pub use structure::{Structure, DEFAULT_OPEN_CELL};
pub use slot::{Direction, Slot};
pub use puzzle::{Crossword, Overlap, Word, WordId};
pub use io::{load_crossword, load_structure_from_file, load_words_from_file, create_example_files};
