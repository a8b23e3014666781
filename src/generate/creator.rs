//! Crossword creation: consistency passes followed by search

use super::{Solution, SolutionValidator};
use crate::config::{Settings, SolverConfig};
use crate::crossword::{load_crossword, Crossword, Slot};
use crate::csp::{
    ArcConsistency, ArcConsistencyStatistics, BacktrackingSearch, ConsistencyEngine, DomainStore,
    SearchOutcome, SearchStatistics,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fmt;
use std::time::{Duration, Instant};

/// Stage that proved a puzzle unsatisfiable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NodeConsistency,
    ArcConsistency,
    Search,
}

/// Outcome of [`CrosswordCreator::solve`]
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Solved(Solution),
    /// No filling exists; `slot` is the slot whose domain emptied, when one did
    Unsatisfiable { stage: Stage, slot: Option<Slot> },
    /// The search budget ran out before a filling was found or ruled out
    BudgetExhausted,
}

impl SolveOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }
}

/// Counters from one call to `solve`
#[derive(Debug, Clone, Default)]
pub struct SolveStatistics {
    pub slots: usize,
    pub words: usize,
    pub node_consistency_removed: usize,
    pub arc_consistency: ArcConsistencyStatistics,
    /// Absent when the search never ran
    pub search: Option<SearchStatistics>,
    pub elapsed: Duration,
}

/// Domain size and degree of one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAnalysis {
    pub slot: Slot,
    pub degree: usize,
    pub after_node_consistency: usize,
    pub after_arc_consistency: usize,
}

/// Consistency-only view of a puzzle, without any search
#[derive(Debug, Clone)]
pub struct PuzzleAnalysis {
    pub slots: Vec<SlotAnalysis>,
    pub crossings: usize,
    pub words: usize,
    pub arc_consistency: ArcConsistency,
}

/// Fills a crossword: node consistency, then AC-3, then backtracking search
pub struct CrosswordCreator {
    crossword: Crossword,
    domains: DomainStore,
    solver: SolverConfig,
    statistics: SolveStatistics,
}

impl CrosswordCreator {
    /// Every slot starts with the full word set
    pub fn new(crossword: Crossword, solver: SolverConfig) -> Self {
        let domains = DomainStore::new(&crossword);
        Self {
            crossword,
            domains,
            solver,
            statistics: SolveStatistics::default(),
        }
    }

    /// Load the input files named in `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let crossword = load_crossword(&settings.input).context("Failed to load crossword")?;
        Ok(Self::new(crossword, settings.solver.clone()))
    }

    pub fn enforce_node_consistency(&mut self) -> usize {
        ConsistencyEngine::new(&self.crossword).enforce_node_consistency(&mut self.domains)
    }

    pub fn ac3(&mut self) -> ArcConsistency {
        let mut engine = ConsistencyEngine::new(&self.crossword);
        let result = engine.ac3(&mut self.domains, None);
        self.statistics.arc_consistency = engine.statistics().clone();
        result
    }

    /// Enforce node and arc consistency, then search.
    ///
    /// An empty domain after either consistency pass ends the solve before any search. A solved
    /// assignment is re-validated, and a failure there is an error rather than an answer.
    pub fn solve(&mut self) -> Result<SolveOutcome> {
        let started = Instant::now();
        self.domains = DomainStore::new(&self.crossword);
        self.statistics = SolveStatistics {
            slots: self.crossword.slots().len(),
            words: self.crossword.words().len(),
            ..Default::default()
        };

        self.statistics.node_consistency_removed = self.enforce_node_consistency();
        if let Some(slot) = self.domains.first_empty() {
            info!("No candidates of length {} for {}", slot.length, slot);
            return Ok(self.finish(started, SolveOutcome::Unsatisfiable {
                stage: Stage::NodeConsistency,
                slot: Some(slot),
            }));
        }

        if let ArcConsistency::WipedOut(slot) = self.ac3() {
            return Ok(self.finish(started, SolveOutcome::Unsatisfiable {
                stage: Stage::ArcConsistency,
                slot: Some(slot),
            }));
        }
        debug!("{} candidate(s) left after consistency", self.domains.total_candidates());

        let mut search = BacktrackingSearch::new(&self.crossword, &self.domains).with_config(&self.solver);
        let outcome = search.search();
        let search_statistics = search.statistics().clone();

        let outcome = match outcome {
            SearchOutcome::Solved(assignment) => {
                let validation = SolutionValidator::new(&self.crossword).validate(&assignment);
                if !validation.is_valid {
                    anyhow::bail!("Search produced an invalid assignment:\n{}", validation);
                }
                SolveOutcome::Solved(Solution::new(&self.crossword, &assignment, started.elapsed()))
            }
            SearchOutcome::Exhausted => SolveOutcome::Unsatisfiable {
                stage: Stage::Search,
                slot: None,
            },
            SearchOutcome::BudgetExhausted => SolveOutcome::BudgetExhausted,
        };

        self.statistics.search = Some(search_statistics);
        Ok(self.finish(started, outcome))
    }

    fn finish(&mut self, started: Instant, outcome: SolveOutcome) -> SolveOutcome {
        self.statistics.elapsed = started.elapsed();
        info!("Solve finished in {:.3}s: {}", self.statistics.elapsed.as_secs_f64(), outcome);
        outcome
    }

    /// Run both consistency passes on fresh domains and report per-slot sizes
    pub fn analyze(&mut self) -> PuzzleAnalysis {
        self.domains = DomainStore::new(&self.crossword);
        self.enforce_node_consistency();
        let after_node: Vec<usize> = self.domains.sizes().map(|(_, size)| size).collect();

        let arc_consistency = self.ac3();

        let slots = self
            .domains
            .sizes()
            .zip(after_node)
            .map(|((slot, after_arc), after_node)| SlotAnalysis {
                slot,
                degree: self.crossword.degree(&slot),
                after_node_consistency: after_node,
                after_arc_consistency: after_arc,
            })
            .collect();

        PuzzleAnalysis {
            slots,
            crossings: self.crossword.crossing_count(),
            words: self.crossword.words().len(),
            arc_consistency,
        }
    }

    pub fn crossword(&self) -> &Crossword {
        &self.crossword
    }

    pub fn domains(&self) -> &DomainStore {
        &self.domains
    }

    pub fn statistics(&self) -> &SolveStatistics {
        &self.statistics
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::NodeConsistency => write!(f, "node consistency"),
            Stage::ArcConsistency => write!(f, "arc consistency"),
            Stage::Search => write!(f, "search"),
        }
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::Solved(solution) => write!(f, "solved ({} entries)", solution.entries.len()),
            SolveOutcome::Unsatisfiable { stage, slot: Some(slot) } => {
                write!(f, "unsatisfiable ({} emptied {})", stage, slot)
            }
            SolveOutcome::Unsatisfiable { stage, slot: None } => {
                write!(f, "unsatisfiable (proven by {})", stage)
            }
            SolveOutcome::BudgetExhausted => write!(f, "search budget exhausted"),
        }
    }
}

impl fmt::Display for SolveStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solve Statistics:")?;
        writeln!(f, "  Slots: {}", self.slots)?;
        writeln!(f, "  Words: {}", self.words)?;
        writeln!(f, "  Removed by node consistency: {}", self.node_consistency_removed)?;
        write!(f, "{}", self.arc_consistency)?;
        match &self.search {
            Some(search) => write!(f, "{}", search)?,
            None => writeln!(f, "Search: not run")?,
        }
        writeln!(f, "Total time: {:.3}s", self.elapsed.as_secs_f64())?;
        Ok(())
    }
}

impl fmt::Display for PuzzleAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Puzzle Analysis:")?;
        writeln!(f, "  Slots: {}", self.slots.len())?;
        writeln!(f, "  Crossings: {}", self.crossings)?;
        writeln!(f, "  Words: {}", self.words)?;
        writeln!(
            f,
            "  Arc consistency: {}",
            match self.arc_consistency {
                ArcConsistency::Consistent => "consistent".to_string(),
                ArcConsistency::WipedOut(slot) => format!("wiped out {}", slot),
            }
        )?;
        writeln!(f, "  {:<22} | Degree | Node | Arc", "Slot")?;
        for analysis in &self.slots {
            writeln!(
                f,
                "  {:<22} | {:6} | {:4} | {}",
                analysis.slot.to_string(),
                analysis.degree,
                analysis.after_node_consistency,
                analysis.after_arc_consistency
            )?;
        }
        Ok(())
    }
}
