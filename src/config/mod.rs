//! Configuration management for the crossword generator

pub mod settings;

pub use settings::{
    Settings, InputConfig, SolverConfig, OutputConfig, CaseNormalization, VariableOrdering,
    ValueOrdering, OutputFormat, CliOverrides
};
