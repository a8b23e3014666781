//! Filled crossword representation

use crate::crossword::{Crossword, Slot, Structure};
use crate::csp::Assignment;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One filled slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub slot: Slot,
    pub word: String,
}

/// A complete filling of a crossword
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub width: usize,
    pub height: usize,
    /// Filled slots, in slot order
    pub entries: Vec<Entry>,
    /// Grid rows with `#` for blocked cells
    pub rows: Vec<String>,
    #[serde(skip)]
    structure: Option<Structure>,
    /// Time taken to find this solution
    #[serde(skip)]
    pub solve_time: Duration,
}

impl Solution {
    /// Create a solution from an assignment over `crossword`
    pub fn new(crossword: &Crossword, assignment: &Assignment, solve_time: Duration) -> Self {
        let entries = assignment
            .iter()
            .map(|(slot, id)| Entry {
                slot,
                word: crossword.word(id).as_str().to_string(),
            })
            .collect();

        let mut solution = Self {
            width: crossword.width(),
            height: crossword.height(),
            entries,
            rows: Vec::new(),
            structure: Some(crossword.structure().clone()),
            solve_time,
        };
        solution.rows = solution
            .letter_grid()
            .iter()
            .map(|row| row.iter().map(|cell| cell.unwrap_or('#')).collect())
            .collect();
        solution
    }

    /// Letters per cell: `None` for a blocked cell, `Some(' ')` for an open cell no entry covers.
    pub fn letter_grid(&self) -> Vec<Vec<Option<char>>> {
        let mut letters = vec![vec![None; self.width]; self.height];

        match &self.structure {
            Some(structure) => {
                for (row, cells) in letters.iter_mut().enumerate() {
                    for (col, cell) in cells.iter_mut().enumerate() {
                        if structure.is_open(row, col) {
                            *cell = Some(' ');
                        }
                    }
                }
            }
            // Deserialized solutions only know their rows
            None => {
                for (row, line) in self.rows.iter().enumerate().take(self.height) {
                    for (col, ch) in line.chars().enumerate().take(self.width) {
                        if ch != '#' {
                            letters[row][col] = Some(' ');
                        }
                    }
                }
            }
        }

        for entry in &self.entries {
            for ((row, col), letter) in entry.slot.cells().zip(entry.word.chars()) {
                if row < self.height && col < self.width {
                    letters[row][col] = Some(letter);
                }
            }
        }

        letters
    }

    /// Word placed in `slot`, if any
    pub fn word_for(&self, slot: &Slot) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.slot == *slot)
            .map(|entry| entry.word.as_str())
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
