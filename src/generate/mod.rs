//! Puzzle generation: solving, solution representation and validation

pub mod creator;
pub mod solution;
pub mod validator;

pub use creator::{CrosswordCreator, PuzzleAnalysis, SlotAnalysis, SolveOutcome, SolveStatistics, Stage};
pub use solution::{Entry, Solution};
pub use validator::{SolutionValidator, ValidationResult, Violation};
