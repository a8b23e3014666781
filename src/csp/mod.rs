//! Constraint satisfaction components: domains, consistency and search

pub mod domains;
pub mod consistency;
pub mod assignment;
pub mod search;

pub use domains::DomainStore;
pub use consistency::{Arc, ArcConsistency, ArcConsistencyStatistics, ConsistencyEngine};
pub use assignment::{Assignment, Binding};
pub use search::{BacktrackingSearch, SearchLimits, SearchOutcome, SearchStatistics};
