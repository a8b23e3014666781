//! Independent validation of finished assignments

use crate::crossword::{Crossword, Slot, WordId};
use crate::csp::Assignment;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A rule broken by an assignment
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("Slot {0} has no word")]
    Unassigned(Slot),

    #[error("Slot {slot} is not part of this crossword")]
    UnknownSlot { slot: Slot },

    #[error("Word {word:?} has length {actual}, slot {slot} needs {}", .slot.length)]
    LengthMismatch { slot: Slot, word: String, actual: usize },

    #[error("Word {word:?} is used by both {first} and {second}")]
    DuplicateWord { word: String, first: Slot, second: Slot },

    #[error("Slots {first} and {second} disagree on a shared cell: {first_letter:?} vs {second_letter:?}")]
    OverlapConflict {
        first: Slot,
        second: Slot,
        first_letter: Option<char>,
        second_letter: Option<char>,
    },
}

/// Result of validating an assignment
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub slots_checked: usize,
    pub crossings_checked: usize,
    pub violations: Vec<Violation>,
}

/// Checks a complete assignment against every rule, collecting all violations
pub struct SolutionValidator<'a> {
    crossword: &'a Crossword,
}

impl<'a> SolutionValidator<'a> {
    pub fn new(crossword: &'a Crossword) -> Self {
        Self { crossword }
    }

    pub fn validate(&self, assignment: &Assignment) -> ValidationResult {
        let mut violations = Vec::new();
        let mut crossings_checked = 0;
        let mut first_use: HashMap<WordId, Slot> = HashMap::new();

        for slot in self.crossword.slots() {
            if !assignment.contains(slot) {
                violations.push(Violation::Unassigned(*slot));
            }
        }

        for (slot, id) in assignment.iter() {
            if !self.crossword.contains_slot(&slot) {
                violations.push(Violation::UnknownSlot { slot });
                continue;
            }

            let word = self.crossword.word(id);
            if word.len() != slot.length {
                violations.push(Violation::LengthMismatch {
                    slot,
                    word: word.as_str().to_string(),
                    actual: word.len(),
                });
            }

            if let Some(&first) = first_use.get(&id) {
                violations.push(Violation::DuplicateWord {
                    word: word.as_str().to_string(),
                    first,
                    second: slot,
                });
            } else {
                first_use.insert(id, slot);
            }

            // Each crossing once, from its smaller slot
            for neighbor in self.crossword.neighbors(&slot).iter().filter(|n| **n > slot) {
                let (Some(other), Some((i, j))) =
                    (assignment.get(neighbor), self.crossword.overlap(&slot, neighbor))
                else {
                    continue;
                };
                crossings_checked += 1;

                let first_letter = word.letter(i);
                let second_letter = self.crossword.word(other).letter(j);
                if first_letter != second_letter {
                    violations.push(Violation::OverlapConflict {
                        first: slot,
                        second: *neighbor,
                        first_letter,
                        second_letter,
                    });
                }
            }
        }

        ValidationResult {
            is_valid: violations.is_empty(),
            slots_checked: assignment.len(),
            crossings_checked,
            violations,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Valid: {}", if self.is_valid { "Yes" } else { "No" })?;
        writeln!(f, "  Slots checked: {}", self.slots_checked)?;
        writeln!(f, "  Crossings checked: {}", self.crossings_checked)?;
        for violation in &self.violations {
            writeln!(f, "    - {}", violation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::{Direction, Structure};

    fn corner(words: &[&str]) -> Crossword {
        let structure = Structure::parse("___\n_##\n_##\n", '_').unwrap();
        Crossword::new(structure, words.iter().copied()).unwrap()
    }

    fn across() -> Slot {
        Slot::new(0, 0, Direction::Across, 3)
    }

    fn down() -> Slot {
        Slot::new(0, 0, Direction::Down, 3)
    }

    fn assign(crossword: &Crossword, pairs: &[(Slot, &str)]) -> Assignment {
        pairs
            .iter()
            .map(|&(slot, text)| (slot, crossword.word_id(text).unwrap()))
            .collect()
    }

    #[test]
    fn test_valid_assignment() {
        let crossword = corner(&["cat", "car", "dog"]);
        let validator = SolutionValidator::new(&crossword);

        let result = validator.validate(&assign(&crossword, &[(across(), "cat"), (down(), "car")]));
        assert!(result.is_valid);
        assert_eq!(result.slots_checked, 2);
        assert_eq!(result.crossings_checked, 1);
    }

    #[test]
    fn test_reports_every_violation() {
        let crossword = corner(&["cat", "dog", "goat"]);
        let validator = SolutionValidator::new(&crossword);

        let result = validator.validate(&assign(&crossword, &[(across(), "cat"), (down(), "dog")]));
        assert!(!result.is_valid);
        assert_eq!(
            result.violations,
            vec![Violation::OverlapConflict {
                first: across(),
                second: down(),
                first_letter: Some('c'),
                second_letter: Some('d'),
            }]
        );

        let result = validator.validate(&assign(&crossword, &[(across(), "goat")]));
        assert_eq!(result.violations.len(), 2);
        assert!(result.violations.contains(&Violation::Unassigned(down())));
        assert!(matches!(result.violations[1], Violation::LengthMismatch { actual: 4, .. }));
    }

    #[test]
    fn test_duplicate_words() {
        let crossword = corner(&["cat"]);
        let validator = SolutionValidator::new(&crossword);

        let result = validator.validate(&assign(&crossword, &[(across(), "cat"), (down(), "cat")]));
        assert_eq!(
            result.violations,
            vec![Violation::DuplicateWord {
                word: "cat".to_string(),
                first: across(),
                second: down(),
            }]
        );
        assert!(result.to_string().contains("used by both"));
    }
}
