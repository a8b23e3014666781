//! Slots: maximal runs of open cells that each take one word

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction that a slot runs in. Across sorts before Down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Across,
    Down,
}

/// A fillable slot, identified by its start cell, direction and length.
///
/// The derived ordering is row, then column, then direction, then length. It is the final
/// tie-break wherever the solver has to choose between otherwise equal slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Self {
        Self { row, col, direction, length }
    }

    /// Grid coordinate of the `k`th letter of this slot
    pub fn cell(&self, k: usize) -> (usize, usize) {
        match self.direction {
            Direction::Across => (self.row, self.col + k),
            Direction::Down => (self.row + k, self.col),
        }
    }

    /// All covered cells, in word order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.length).map(move |k| self.cell(k))
    }

    /// Offsets `(i, j)` such that `self.cell(i) == other.cell(j)`, if the two slots cross.
    pub fn intersection(&self, other: &Slot) -> Option<(usize, usize)> {
        if self == other {
            return None;
        }
        self.cells().enumerate().find_map(|(i, cell)| {
            other
                .cells()
                .position(|other_cell| other_cell == cell)
                .map(|j| (i, j))
        })
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Across => "across",
            Direction::Down => "down",
        };
        write!(f, "({}, {}) {} {}", self.row, self.col, direction, self.length)
    }
}
