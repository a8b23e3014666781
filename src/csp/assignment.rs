//! Partial assignments of words to slots

use crate::crossword::{Crossword, Slot, WordId};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// Partial mapping from slot to the word chosen for it, iterated in slot order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    bindings: BTreeMap<Slot, WordId>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `slot` to `word`, returning the previous binding
    pub fn bind(&mut self, slot: Slot, word: WordId) -> Option<WordId> {
        self.bindings.insert(slot, word)
    }

    pub fn unbind(&mut self, slot: &Slot) -> Option<WordId> {
        self.bindings.remove(slot)
    }

    pub fn get(&self, slot: &Slot) -> Option<WordId> {
        self.bindings.get(slot).copied()
    }

    pub fn contains(&self, slot: &Slot) -> bool {
        self.bindings.contains_key(slot)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Whether every slot of `crossword` is bound
    pub fn is_complete(&self, crossword: &Crossword) -> bool {
        crossword.slots().iter().all(|slot| self.contains(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, WordId)> + '_ {
        self.bindings.iter().map(|(slot, word)| (*slot, *word))
    }
}

impl FromIterator<(Slot, WordId)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (Slot, WordId)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

/// Scoped binding of one slot.
///
/// The slot is unbound when the guard drops, on every path, unless [`Binding::commit`] was
/// called first.
pub struct Binding<'a> {
    assignment: &'a mut Assignment,
    slot: Slot,
    committed: bool,
}

impl<'a> Binding<'a> {
    pub fn new(assignment: &'a mut Assignment, slot: Slot, word: WordId) -> Self {
        assignment.bind(slot, word);
        Self {
            assignment,
            slot,
            committed: false,
        }
    }

    /// Keep the binding past the guard's lifetime
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Deref for Binding<'_> {
    type Target = Assignment;

    fn deref(&self) -> &Assignment {
        self.assignment
    }
}

impl DerefMut for Binding<'_> {
    fn deref_mut(&mut self) -> &mut Assignment {
        self.assignment
    }
}

impl Drop for Binding<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.assignment.unbind(&self.slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::{Direction, Structure};

    #[test]
    fn test_bind_and_unbind() {
        let slot = Slot::new(0, 0, Direction::Across, 3);
        let mut assignment = Assignment::new();

        assert_eq!(assignment.bind(slot, 4), None);
        assert_eq!(assignment.get(&slot), Some(4));
        assert_eq!(assignment.bind(slot, 2), Some(4));
        assert_eq!(assignment.unbind(&slot), Some(2));
        assert!(assignment.is_empty());
    }

    #[test]
    fn test_binding_guard_rolls_back() {
        let slot = Slot::new(0, 0, Direction::Across, 3);
        let mut assignment = Assignment::new();

        {
            let binding = Binding::new(&mut assignment, slot, 1);
            assert_eq!(binding.get(&slot), Some(1));
        }
        assert!(!assignment.contains(&slot));

        Binding::new(&mut assignment, slot, 1).commit();
        assert_eq!(assignment.get(&slot), Some(1));
    }

    #[test]
    fn test_nested_bindings_unwind_in_order() {
        let a = Slot::new(0, 0, Direction::Across, 3);
        let b = Slot::new(0, 0, Direction::Down, 3);
        let mut assignment = Assignment::new();

        {
            let mut outer = Binding::new(&mut assignment, a, 0);
            {
                let inner = Binding::new(&mut outer, b, 1);
                assert_eq!(inner.len(), 2);
            }
            assert_eq!(outer.len(), 1);
        }
        assert!(assignment.is_empty());
    }

    #[test]
    fn test_is_complete() {
        let structure = Structure::parse("___\n_##\n_##\n", '_').unwrap();
        let crossword = Crossword::new(structure, ["cat", "car"]).unwrap();
        let slots = crossword.slots().to_vec();

        let mut assignment = Assignment::new();
        assignment.bind(slots[0], 0);
        assert!(!assignment.is_complete(&crossword));
        assignment.bind(slots[1], 1);
        assert!(assignment.is_complete(&crossword));
    }
}
