//! Node and arc consistency for crossword domains
//!
//! Node consistency is the unary length filter. Arc consistency is AC-3 over directed arcs: the
//! arc `(x, y)` filters the domain of `x` against the domain of `y`, and is a different arc from
//! `(y, x)`.

use super::DomainStore;
use crate::crossword::{Crossword, Slot};
use log::{debug, info, trace};
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// Directed arc: revise `from` against `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arc {
    pub from: Slot,
    pub to: Slot,
}

impl Arc {
    pub fn new(from: Slot, to: Slot) -> Self {
        Self { from, to }
    }
}

/// Result of running AC-3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcConsistency {
    /// The worklist drained without emptying any domain
    Consistent,
    /// Revising this slot left it with no candidates
    WipedOut(Slot),
}

impl ArcConsistency {
    pub fn is_consistent(&self) -> bool {
        matches!(self, ArcConsistency::Consistent)
    }
}

/// Counters collected while establishing arc consistency
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcConsistencyStatistics {
    pub initial_arcs: usize,
    pub arcs_processed: usize,
    pub revisions: usize,
    pub words_removed: usize,
}

/// Prunes a domain store against one crossword's constraints
pub struct ConsistencyEngine<'a> {
    crossword: &'a Crossword,
    statistics: ArcConsistencyStatistics,
}

impl<'a> ConsistencyEngine<'a> {
    pub fn new(crossword: &'a Crossword) -> Self {
        Self {
            crossword,
            statistics: ArcConsistencyStatistics::default(),
        }
    }

    /// Apply the unary length constraint to every slot. Returns the number of words removed.
    pub fn enforce_node_consistency(&self, domains: &mut DomainStore) -> usize {
        let removed = domains.enforce_node_consistency(self.crossword);
        info!("Node consistency removed {} candidate(s)", removed);
        removed
    }

    /// Every ordered pair of crossing slots, in slot order
    pub fn all_arcs(&self) -> Vec<Arc> {
        self.crossword
            .slots()
            .iter()
            .flat_map(|&x| {
                self.crossword
                    .neighbors(&x)
                    .iter()
                    .map(move |&y| Arc::new(x, y))
            })
            .collect()
    }

    /// Make `x` arc consistent with `y`: drop every candidate of `x` with no candidate of `y`
    /// agreeing on the shared cell. Returns whether the domain of `x` changed.
    pub fn revise(&self, domains: &mut DomainStore, x: &Slot, y: &Slot) -> bool {
        let Some((ox, oy)) = self.crossword.overlap(x, y) else {
            return false;
        };

        let supported: HashSet<char> = domains
            .domain(y)
            .iter()
            .filter_map(|&id| self.crossword.word(id).letter(oy))
            .collect();

        domains.retain(x, |&id| {
            self.crossword
                .word(id)
                .letter(ox)
                .is_some_and(|letter| supported.contains(&letter))
        })
    }

    /// Run AC-3 from `initial_arcs`, or from every arc when `None`.
    ///
    /// Arcs are processed first in, first out. Whenever `x` loses candidates, every arc `(z, x)`
    /// with `z` a neighbor of `x` other than `y` goes back on the worklist.
    pub fn ac3(&mut self, domains: &mut DomainStore, initial_arcs: Option<Vec<Arc>>) -> ArcConsistency {
        let arcs = initial_arcs.unwrap_or_else(|| self.all_arcs());
        self.statistics = ArcConsistencyStatistics {
            initial_arcs: arcs.len(),
            ..Default::default()
        };

        let mut pending: HashSet<Arc> = HashSet::with_capacity(arcs.len());
        let mut queue: VecDeque<Arc> = VecDeque::with_capacity(arcs.len());
        for arc in arcs {
            if pending.insert(arc) {
                queue.push_back(arc);
            }
        }

        while let Some(arc) = queue.pop_front() {
            pending.remove(&arc);
            self.statistics.arcs_processed += 1;

            let before = domains.len(&arc.from);
            if !self.revise(domains, &arc.from, &arc.to) {
                continue;
            }

            let after = domains.len(&arc.from);
            self.statistics.revisions += 1;
            self.statistics.words_removed += before - after;
            trace!("Revised {} against {}: {} -> {}", arc.from, arc.to, before, after);

            if after == 0 {
                debug!("AC-3 wiped out the domain of {}", arc.from);
                info!("Arc consistency failed after {} arc(s)", self.statistics.arcs_processed);
                return ArcConsistency::WipedOut(arc.from);
            }

            for &z in self.crossword.neighbors(&arc.from) {
                if z == arc.to {
                    continue;
                }
                let requeued = Arc::new(z, arc.from);
                if pending.insert(requeued) {
                    queue.push_back(requeued);
                }
            }
        }

        info!(
            "Arc consistency reached after {} arc(s), {} candidate(s) removed",
            self.statistics.arcs_processed, self.statistics.words_removed
        );
        ArcConsistency::Consistent
    }

    pub fn statistics(&self) -> &ArcConsistencyStatistics {
        &self.statistics
    }
}

impl fmt::Display for ArcConsistencyStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Arc Consistency Statistics:")?;
        writeln!(f, "  Initial arcs: {}", self.initial_arcs)?;
        writeln!(f, "  Arcs processed: {}", self.arcs_processed)?;
        writeln!(f, "  Revisions: {}", self.revisions)?;
        writeln!(f, "  Words removed: {}", self.words_removed)?;
        Ok(())
    }
}
