//! Crossword model: slots, word table and the overlap table between slots

use super::{Direction, PuzzleError, Slot, Structure};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a word in the crossword's word table. Ids follow lexical order.
pub type WordId = usize;

/// Character offsets `(i, j)` at which two slots share a cell
pub type Overlap = (usize, usize);

/// A candidate word, with its letters split out for offset lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    text: String,
    letters: Vec<char>,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let letters = text.chars().collect();
        Self { text, letters }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn letter(&self, index: usize) -> Option<char> {
        self.letters.get(index).copied()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Immutable description of a puzzle: which cells are open, which slots exist, which words may
/// be used and where slots cross.
#[derive(Debug, Clone)]
pub struct Crossword {
    structure: Structure,
    slots: Vec<Slot>,
    words: Vec<Word>,
    overlaps: HashMap<(Slot, Slot), Overlap>,
    neighbors: HashMap<Slot, Vec<Slot>>,
}

impl Crossword {
    /// Build the model from a structure and a word set. Duplicate and empty words are dropped.
    pub fn new<I, S>(structure: Structure, words: I) -> Result<Self, PuzzleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = Self::find_slots(&structure);
        if slots.is_empty() {
            return Err(PuzzleError::NoSlots);
        }

        let mut texts: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|word| !word.is_empty())
            .collect();
        texts.sort();
        texts.dedup();
        let words: Vec<Word> = texts.into_iter().map(Word::new).collect();

        let mut overlaps = HashMap::new();
        let mut neighbors: HashMap<Slot, Vec<Slot>> =
            slots.iter().map(|&slot| (slot, Vec::new())).collect();

        for (a_idx, a) in slots.iter().enumerate() {
            for b in &slots[a_idx + 1..] {
                if let Some((i, j)) = a.intersection(b) {
                    overlaps.insert((*a, *b), (i, j));
                    overlaps.insert((*b, *a), (j, i));
                    if let Some(list) = neighbors.get_mut(a) {
                        list.push(*b);
                    }
                    if let Some(list) = neighbors.get_mut(b) {
                        list.push(*a);
                    }
                }
            }
        }
        for list in neighbors.values_mut() {
            list.sort();
        }

        debug!(
            "Built crossword {}x{}: {} slots, {} words, {} crossings",
            structure.width,
            structure.height,
            slots.len(),
            words.len(),
            overlaps.len() / 2
        );

        Ok(Self { structure, slots, words, overlaps, neighbors })
    }

    /// Every maximal run of two or more open cells, across and down, in slot order
    fn find_slots(structure: &Structure) -> Vec<Slot> {
        let mut slots = Vec::new();

        for row in 0..structure.height {
            for col in 0..structure.width {
                if !structure.is_open(row, col) {
                    continue;
                }

                if col == 0 || !structure.is_open(row, col - 1) {
                    let length = (col..structure.width)
                        .take_while(|&c| structure.is_open(row, c))
                        .count();
                    if length > 1 {
                        slots.push(Slot::new(row, col, Direction::Across, length));
                    }
                }

                if row == 0 || !structure.is_open(row - 1, col) {
                    let length = (row..structure.height)
                        .take_while(|&r| structure.is_open(r, col))
                        .count();
                    if length > 1 {
                        slots.push(Slot::new(row, col, Direction::Down, length));
                    }
                }
            }
        }

        slots.sort();
        slots
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn width(&self) -> usize {
        self.structure.width
    }

    pub fn height(&self) -> usize {
        self.structure.height
    }

    /// All slots, in slot order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn contains_slot(&self, slot: &Slot) -> bool {
        self.neighbors.contains_key(slot)
    }

    /// Word table, in lexical order
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word(&self, id: WordId) -> &Word {
        &self.words[id]
    }

    /// Look up a word's id by its text
    pub fn word_id(&self, text: &str) -> Option<WordId> {
        self.words.binary_search_by(|word| word.as_str().cmp(text)).ok()
    }

    /// Overlap offsets for the ordered pair `(x, y)`, or `None` if they do not cross
    pub fn overlap(&self, x: &Slot, y: &Slot) -> Option<Overlap> {
        self.overlaps.get(&(*x, *y)).copied()
    }

    /// Slots crossing `slot`, in slot order
    pub fn neighbors(&self, slot: &Slot) -> &[Slot] {
        self.neighbors.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of crossing slots
    pub fn degree(&self, slot: &Slot) -> usize {
        self.neighbors(slot).len()
    }

    /// Number of distinct crossing cells
    pub fn crossing_count(&self) -> usize {
        self.overlaps.len() / 2
    }
}
