//! Backtracking search over arc-consistent domains

use super::{Assignment, Binding, DomainStore};
use crate::config::{SolverConfig, ValueOrdering, VariableOrdering};
use crate::crossword::{Crossword, Slot, WordId};
use itertools::Itertools;
use log::{debug, info, trace};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Optional limits that abort the search early
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of tentative bindings
    pub max_nodes: Option<u64>,
    pub timeout: Option<Duration>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }
}

/// How a search ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A complete, consistent assignment
    Solved(Assignment),
    /// Every branch was explored; no assignment exists
    Exhausted,
    /// A limit was hit before the search could finish
    BudgetExhausted,
}

/// Counters collected during the search
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Tentative bindings tried
    pub nodes: u64,
    /// Bindings undone after their subtree failed
    pub backtracks: u64,
    pub max_depth: usize,
    pub elapsed: Duration,
}

enum Step {
    Solved,
    Failed,
    Aborted,
}

/// Depth-first search with MRV/degree variable ordering and least-constraining-value ordering.
///
/// The domains are read only here: candidates are checked against the current assignment, never
/// re-pruned per branch.
pub struct BacktrackingSearch<'a> {
    crossword: &'a Crossword,
    domains: &'a DomainStore,
    variable_ordering: VariableOrdering,
    value_ordering: ValueOrdering,
    limits: SearchLimits,
    statistics: SearchStatistics,
    started: Option<Instant>,
}

impl<'a> BacktrackingSearch<'a> {
    pub fn new(crossword: &'a Crossword, domains: &'a DomainStore) -> Self {
        Self {
            crossword,
            domains,
            variable_ordering: VariableOrdering::MrvDegree,
            value_ordering: ValueOrdering::LeastConstraining,
            limits: SearchLimits::unlimited(),
            statistics: SearchStatistics::default(),
            started: None,
        }
    }

    /// Take orderings and limits from solver settings
    pub fn with_config(mut self, config: &SolverConfig) -> Self {
        self.variable_ordering = config.variable_ordering;
        self.value_ordering = config.value_ordering;
        self.limits = SearchLimits {
            max_nodes: config.max_nodes,
            timeout: config.timeout(),
        };
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_ordering(mut self, variables: VariableOrdering, values: ValueOrdering) -> Self {
        self.variable_ordering = variables;
        self.value_ordering = values;
        self
    }

    /// Search from the empty assignment
    pub fn search(&mut self) -> SearchOutcome {
        self.statistics = SearchStatistics::default();
        let started = Instant::now();
        self.started = Some(started);

        let mut assignment = Assignment::new();
        let step = self.backtrack(&mut assignment);
        self.statistics.elapsed = started.elapsed();

        let outcome = match step {
            Step::Solved => SearchOutcome::Solved(assignment),
            Step::Failed => SearchOutcome::Exhausted,
            Step::Aborted => SearchOutcome::BudgetExhausted,
        };

        info!(
            "Search finished after {} node(s), {} backtrack(s): {}",
            self.statistics.nodes,
            self.statistics.backtracks,
            match outcome {
                SearchOutcome::Solved(_) => "solved",
                SearchOutcome::Exhausted => "no solution",
                SearchOutcome::BudgetExhausted => "budget exhausted",
            }
        );
        outcome
    }

    fn backtrack(&mut self, assignment: &mut Assignment) -> Step {
        if assignment.is_complete(self.crossword) {
            return if self.consistent(assignment) { Step::Solved } else { Step::Failed };
        }

        let Some(var) = self.select_unassigned_variable(assignment) else {
            return Step::Failed;
        };
        self.statistics.max_depth = self.statistics.max_depth.max(assignment.len() + 1);

        for word in self.order_domain_values(&var, assignment) {
            if self.budget_exceeded() {
                debug!("Search budget exhausted after {} node(s)", self.statistics.nodes);
                return Step::Aborted;
            }
            self.statistics.nodes += 1;

            let mut binding = Binding::new(assignment, var, word);
            if !self.consistent(&binding) {
                continue;
            }
            trace!("Bound {} to {}", var, self.crossword.word(word).as_str());

            match self.backtrack(&mut binding) {
                Step::Solved => {
                    binding.commit();
                    return Step::Solved;
                }
                Step::Aborted => return Step::Aborted,
                Step::Failed => {
                    self.statistics.backtracks += 1;
                    trace!("Backtracking from {}", var);
                }
            }
        }

        Step::Failed
    }

    fn budget_exceeded(&self) -> bool {
        if let Some(max_nodes) = self.limits.max_nodes {
            if self.statistics.nodes >= max_nodes {
                return true;
            }
        }
        match (self.limits.timeout, self.started) {
            (Some(timeout), Some(started)) => started.elapsed() >= timeout,
            _ => false,
        }
    }

    /// An assignment is consistent when its words are pairwise distinct, each word fits its
    /// slot's length, and crossing slots agree on their shared letters.
    pub fn consistent(&self, assignment: &Assignment) -> bool {
        let mut seen = HashSet::with_capacity(assignment.len());

        for (slot, id) in assignment.iter() {
            if !seen.insert(id) {
                return false;
            }

            let word = self.crossword.word(id);
            if word.len() != slot.length {
                return false;
            }

            for neighbor in self.crossword.neighbors(&slot) {
                let Some(other) = assignment.get(neighbor) else {
                    continue;
                };
                let Some((i, j)) = self.crossword.overlap(&slot, neighbor) else {
                    continue;
                };
                if word.letter(i) != self.crossword.word(other).letter(j) {
                    return false;
                }
            }
        }

        true
    }

    /// Pick the next slot to fill: fewest remaining candidates, then most neighbors, then the
    /// smallest slot in slot order. Returns `None` once every slot is bound.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<Slot> {
        let mut unassigned = self
            .crossword
            .slots()
            .iter()
            .filter(|slot| !assignment.contains(slot));

        match self.variable_ordering {
            VariableOrdering::Static => unassigned.next().copied(),
            VariableOrdering::MrvDegree => unassigned
                .min_by_key(|&&slot| {
                    (self.domains.len(&slot), Reverse(self.crossword.degree(&slot)), slot)
                })
                .copied(),
        }
    }

    /// Candidates for `slot`, fewest ruled-out neighbor candidates first. Ties keep lexical order.
    pub fn order_domain_values(&self, slot: &Slot, assignment: &Assignment) -> Vec<WordId> {
        let candidates = self.domains.domain(slot).iter().copied();

        match self.value_ordering {
            ValueOrdering::Lexical => candidates.collect(),
            ValueOrdering::LeastConstraining => candidates
                .sorted_by_cached_key(|&word| self.conflict_count(slot, word, assignment))
                .collect(),
        }
    }

    /// How many candidates of unassigned neighbors choosing `word` for `slot` would rule out
    pub fn conflict_count(&self, slot: &Slot, word: WordId, assignment: &Assignment) -> usize {
        let word = self.crossword.word(word);

        self.crossword
            .neighbors(slot)
            .iter()
            .filter(|neighbor| !assignment.contains(neighbor))
            .filter_map(|neighbor| {
                let (i, j) = self.crossword.overlap(slot, neighbor)?;
                let letter = word.letter(i);
                Some(
                    self.domains
                        .domain(neighbor)
                        .iter()
                        .filter(|&&other| self.crossword.word(other).letter(j) != letter)
                        .count(),
                )
            })
            .sum()
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Nodes: {}", self.nodes)?;
        writeln!(f, "  Backtracks: {}", self.backtracks)?;
        writeln!(f, "  Max depth: {}", self.max_depth)?;
        writeln!(f, "  Search time: {:.3}s", self.elapsed.as_secs_f64())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::{Direction, Structure};

    const CORNER: &str = "___\n_##\n_##\n";
    const FRAME: &str = "#___#\n#_#_#\n#___#\n";

    fn build(structure: &str, words: &[&str]) -> (Crossword, DomainStore) {
        let structure = Structure::parse(structure, '_').unwrap();
        let crossword = Crossword::new(structure, words.iter().copied()).unwrap();
        let mut domains = DomainStore::new(&crossword);
        domains.enforce_node_consistency(&crossword);
        (crossword, domains)
    }

    fn assign(crossword: &Crossword, pairs: &[(Slot, &str)]) -> Assignment {
        pairs
            .iter()
            .map(|&(slot, text)| (slot, crossword.word_id(text).unwrap()))
            .collect()
    }

    fn across() -> Slot {
        Slot::new(0, 0, Direction::Across, 3)
    }

    fn down() -> Slot {
        Slot::new(0, 0, Direction::Down, 3)
    }

    #[test]
    fn test_consistent_accepts_matching_overlap() {
        let (crossword, domains) = build(CORNER, &["cat", "car", "dog"]);
        let search = BacktrackingSearch::new(&crossword, &domains);

        assert!(search.consistent(&Assignment::new()));
        assert!(search.consistent(&assign(&crossword, &[(across(), "cat"), (down(), "car")])));
    }

    #[test]
    fn test_consistent_rejects_mismatched_overlap() {
        let (crossword, domains) = build(CORNER, &["cat", "car", "dog"]);
        let search = BacktrackingSearch::new(&crossword, &domains);

        assert!(!search.consistent(&assign(&crossword, &[(across(), "cat"), (down(), "dog")])));
    }

    #[test]
    fn test_consistent_rejects_duplicates_and_bad_lengths() {
        let (crossword, domains) = build(CORNER, &["cat", "car", "goat"]);
        let search = BacktrackingSearch::new(&crossword, &domains);

        assert!(!search.consistent(&assign(&crossword, &[(across(), "cat"), (down(), "cat")])));
        assert!(!search.consistent(&assign(&crossword, &[(across(), "goat")])));
    }

    #[test]
    fn test_select_prefers_fewest_values_then_degree() {
        // ____
        // #_#_
        // #___
        let (crossword, mut domains) =
            build("____\n#_#_\n#___\n", &["abcd", "bxc", "dxd", "cxd", "bzd", "dyd"]);
        let top = Slot::new(0, 0, Direction::Across, 4);
        let left = Slot::new(0, 1, Direction::Down, 3);
        let right = Slot::new(0, 3, Direction::Down, 3);
        let bottom = Slot::new(2, 1, Direction::Across, 3);

        // top has one candidate; it wins outright
        let search = BacktrackingSearch::new(&crossword, &domains);
        assert_eq!(search.select_unassigned_variable(&Assignment::new()), Some(top));

        // With top bound, the three-letter slots tie on size and degree, so slot order decides
        let bound = assign(&crossword, &[(top, "abcd")]);
        assert_eq!(search.select_unassigned_variable(&bound), Some(left));

        // Shrink bottom so it becomes the minimum
        domains.retain(&bottom, |&id| crossword.word(id).as_str() == "dyd");
        let search = BacktrackingSearch::new(&crossword, &domains);
        assert_eq!(search.select_unassigned_variable(&bound), Some(bottom));

        let full = assign(
            &crossword,
            &[(top, "abcd"), (left, "bxc"), (right, "dxd"), (bottom, "dyd")],
        );
        assert_eq!(search.select_unassigned_variable(&full), None);
    }

    #[test]
    fn test_select_breaks_size_ties_by_degree() {
        // The across slot crosses both downs but comes last in slot order
        // _#_
        // ___
        let (crossword, domains) = build("_#_\n___\n", &["abc", "xyz", "ab", "cd"]);
        let search = BacktrackingSearch::new(&crossword, &domains);
        let bottom = Slot::new(1, 0, Direction::Across, 3);
        assert_eq!(crossword.slots().last(), Some(&bottom));

        // Every slot has two candidates after node consistency
        for slot in crossword.slots() {
            assert_eq!(domains.len(slot), 2);
        }
        assert_eq!(search.select_unassigned_variable(&Assignment::new()), Some(bottom));
    }

    #[test]
    fn test_select_never_returns_bound_slot() {
        let (crossword, domains) = build(FRAME, &["cat", "car", "tan", "run"]);
        let search = BacktrackingSearch::new(&crossword, &domains);
        let mut assignment = Assignment::new();

        while let Some(slot) = search.select_unassigned_variable(&assignment) {
            assert!(!assignment.contains(&slot));
            assignment.bind(slot, 0);
        }
        assert!(assignment.is_complete(&crossword));
    }

    #[test]
    fn test_static_ordering_follows_slot_order() {
        let (crossword, domains) = build(FRAME, &["cat", "car", "tan", "run"]);
        let search = BacktrackingSearch::new(&crossword, &domains)
            .with_ordering(VariableOrdering::Static, ValueOrdering::Lexical);

        assert_eq!(
            search.select_unassigned_variable(&Assignment::new()),
            Some(crossword.slots()[0])
        );
    }

    #[test]
    fn test_least_constraining_value_first() {
        let (crossword, domains) = build(CORNER, &["cat", "car", "cow", "dog"]);
        let search = BacktrackingSearch::new(&crossword, &domains);

        // Each 'c' word rules out only 'dog' below it; 'dog' rules out all three 'c' words
        let ordered = search.order_domain_values(&across(), &Assignment::new());
        let texts: Vec<_> = ordered.iter().map(|&id| crossword.word(id).as_str()).collect();
        assert_eq!(texts, vec!["car", "cat", "cow", "dog"]);

        let dog = crossword.word_id("dog").unwrap();
        assert_eq!(search.conflict_count(&across(), dog, &Assignment::new()), 3);

        // Assigned neighbors do not count
        let bound = assign(&crossword, &[(down(), "cat")]);
        assert_eq!(search.conflict_count(&across(), dog, &bound), 0);
    }

    #[test]
    fn test_lexical_value_ordering() {
        let (crossword, domains) = build(CORNER, &["dog", "cat", "dye"]);
        let search = BacktrackingSearch::new(&crossword, &domains)
            .with_ordering(VariableOrdering::MrvDegree, ValueOrdering::Lexical);

        let ordered = search.order_domain_values(&across(), &Assignment::new());
        let texts: Vec<_> = ordered.iter().map(|&id| crossword.word(id).as_str()).collect();
        assert_eq!(texts, vec!["cat", "dog", "dye"]);
    }

    #[test]
    fn test_search_solves_corner() {
        let (crossword, domains) = build(CORNER, &["cat", "car", "dog"]);
        let mut search = BacktrackingSearch::new(&crossword, &domains);

        let SearchOutcome::Solved(assignment) = search.search() else {
            panic!("expected a solution");
        };
        assert!(assignment.is_complete(&crossword));
        assert!(search.consistent(&assignment));

        let a = crossword.word(assignment.get(&across()).unwrap());
        let b = crossword.word(assignment.get(&down()).unwrap());
        assert_eq!(a.letter(0), b.letter(0));
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_search_solves_frame() {
        let (crossword, domains) =
            build(FRAME, &["ant", "art", "car", "cat", "dog", "net", "one", "rat", "run", "tan", "tar", "ten"]);
        let mut search = BacktrackingSearch::new(&crossword, &domains);

        match search.search() {
            SearchOutcome::Solved(assignment) => {
                assert!(assignment.is_complete(&crossword));
                assert!(search.consistent(&assignment));
            }
            other => panic!("expected a solution, got {:?}", other),
        }
        assert!(search.statistics().nodes >= 4);
    }

    #[test]
    fn test_search_exhausts_unsatisfiable_puzzle() {
        // Only one word fits both slots, and words must be distinct
        let (crossword, domains) = build(CORNER, &["cat"]);
        let mut search = BacktrackingSearch::new(&crossword, &domains);

        assert_eq!(search.search(), SearchOutcome::Exhausted);
        assert!(search.statistics().backtracks <= search.statistics().nodes);
    }

    #[test]
    fn test_node_budget_aborts_search() {
        let (crossword, domains) = build(CORNER, &["cat", "car", "dog"]);
        let mut search = BacktrackingSearch::new(&crossword, &domains).with_limits(SearchLimits {
            max_nodes: Some(1),
            timeout: None,
        });

        assert_eq!(search.search(), SearchOutcome::BudgetExhausted);
        assert_eq!(search.statistics().nodes, 1);
    }

    #[test]
    fn test_timeout_aborts_search() {
        let (crossword, domains) = build(FRAME, &["cat", "car", "tan", "run"]);
        let mut search = BacktrackingSearch::new(&crossword, &domains).with_limits(SearchLimits {
            max_nodes: None,
            timeout: Some(Duration::ZERO),
        });

        // Satisfiable, so only the clock can stop it
        assert_eq!(search.search(), SearchOutcome::BudgetExhausted);
        assert_eq!(search.statistics().nodes, 0);

        let mut unlimited = BacktrackingSearch::new(&crossword, &domains).with_limits(SearchLimits::unlimited());
        assert!(matches!(unlimited.search(), SearchOutcome::Solved(_)));
    }
}
