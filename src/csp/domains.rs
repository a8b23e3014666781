//! Domain store: the candidate words still possible for each slot

use crate::crossword::{Crossword, Slot, WordId};
use log::debug;
use std::collections::BTreeMap;

/// Mutable mapping from slot to its candidate word ids.
///
/// Each domain is kept sorted by word id, which is lexical order. Domains only shrink once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStore {
    domains: BTreeMap<Slot, Vec<WordId>>,
}

impl DomainStore {
    /// Give every slot the full word set
    pub fn new(crossword: &Crossword) -> Self {
        let all_words: Vec<WordId> = (0..crossword.words().len()).collect();
        let domains = crossword
            .slots()
            .iter()
            .map(|&slot| (slot, all_words.clone()))
            .collect();
        Self { domains }
    }

    /// Remove every candidate whose length differs from its slot's length.
    /// Returns the number of words removed.
    pub fn enforce_node_consistency(&mut self, crossword: &Crossword) -> usize {
        let mut removed = 0;

        for (slot, domain) in self.domains.iter_mut() {
            let before = domain.len();
            domain.retain(|&id| crossword.word(id).len() == slot.length);
            removed += before - domain.len();

            if domain.is_empty() {
                debug!("Node consistency emptied the domain of {}", slot);
            }
        }

        removed
    }

    /// Candidates for `slot`, in lexical order
    pub fn domain(&self, slot: &Slot) -> &[WordId] {
        self.domains.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of candidates left for `slot`
    pub fn len(&self, slot: &Slot) -> usize {
        self.domain(slot).len()
    }

    pub fn contains(&self, slot: &Slot, word: WordId) -> bool {
        self.domain(slot).binary_search(&word).is_ok()
    }

    /// Keep only the candidates of `slot` for which `keep` holds. Returns whether anything went.
    pub fn retain<F>(&mut self, slot: &Slot, keep: F) -> bool
    where
        F: FnMut(&WordId) -> bool,
    {
        match self.domains.get_mut(slot) {
            Some(domain) => {
                let before = domain.len();
                domain.retain(keep);
                domain.len() != before
            }
            None => false,
        }
    }

    pub fn is_wiped_out(&self, slot: &Slot) -> bool {
        self.len(slot) == 0
    }

    /// First slot, in slot order, whose domain is empty
    pub fn first_empty(&self) -> Option<Slot> {
        self.domains
            .iter()
            .find(|(_, domain)| domain.is_empty())
            .map(|(slot, _)| *slot)
    }

    /// Sum of all domain sizes
    pub fn total_candidates(&self) -> usize {
        self.domains.values().map(Vec::len).sum()
    }

    /// Slots with their domain sizes, in slot order
    pub fn sizes(&self) -> impl Iterator<Item = (Slot, usize)> + '_ {
        self.domains.iter().map(|(slot, domain)| (*slot, domain.len()))
    }
}
