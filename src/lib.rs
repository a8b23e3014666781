//! Crossword Generator
//!
//! Fills a crossword grid from a word list by treating each slot as a constraint-satisfaction
//! variable: node consistency, AC-3 arc consistency, then backtracking search with
//! minimum-remaining-values, degree and least-constraining-value heuristics.

pub mod config;
pub mod crossword;
pub mod csp;
pub mod generate;
pub mod utils;

pub use config::Settings;
pub use crossword::Crossword;
pub use generate::{CrosswordCreator, Solution, SolveOutcome};

use anyhow::Result;

/// Main entry point: load the configured inputs and solve them
pub fn solve_crossword(settings: &Settings) -> Result<SolveOutcome> {
    let mut creator = CrosswordCreator::from_settings(settings)?;
    creator.solve()
}
