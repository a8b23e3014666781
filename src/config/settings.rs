//! Configuration settings for the crossword generator

use crate::crossword::DEFAULT_OPEN_CELL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub structure_file: PathBuf,
    pub words_file: PathBuf,
    /// Character marking a fillable cell in the structure file
    pub open_cell: char,
    pub case: CaseNormalization,
}

/// How words are normalized when the word list is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseNormalization {
    Upper,
    Lower,
    Preserve,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of tentative bindings before the search gives up
    pub max_nodes: Option<u64>,
    pub timeout_seconds: Option<u64>,
    pub variable_ordering: VariableOrdering,
    pub value_ordering: ValueOrdering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableOrdering {
    /// Fewest remaining values, then most neighbors, then slot order
    MrvDegree,
    /// First unassigned slot in slot order
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrdering {
    /// Fewest ruled-out neighbor candidates first
    LeastConstraining,
    /// Domain order (lexical)
    Lexical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Explicit format; inferred from the output path when absent
    pub format: Option<OutputFormat>,
    pub path: Option<PathBuf>,
    /// Pixel size of one cell in SVG output
    pub cell_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Svg,
}

impl OutputFormat {
    /// Pick a format from a file extension; unknown extensions are plain text
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => OutputFormat::Json,
            Some("svg") => OutputFormat::Svg,
            _ => OutputFormat::Text,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            structure_file: PathBuf::from("data/structure0.txt"),
            words_file: PathBuf::from("data/words0.txt"),
            open_cell: DEFAULT_OPEN_CELL,
            case: CaseNormalization::Upper,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_nodes: None,
            timeout_seconds: None,
            variable_ordering: VariableOrdering::MrvDegree,
            value_ordering: ValueOrdering::LeastConstraining,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            path: None,
            cell_size: 100,
        }
    }
}

impl SolverConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl OutputConfig {
    /// Format to write `path` with: the configured one, or the one its extension implies
    pub fn resolve_format(&self, path: &Path) -> OutputFormat {
        self.format.unwrap_or_else(|| OutputFormat::from_path(path))
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.max_nodes == Some(0) {
            anyhow::bail!("Node limit must be positive");
        }

        if self.solver.timeout_seconds == Some(0) {
            anyhow::bail!("Timeout must be positive");
        }

        if self.input.open_cell.is_whitespace() {
            anyhow::bail!("Open cell character cannot be whitespace");
        }

        if self.output.cell_size < 10 {
            anyhow::bail!("Cell size must be at least 10 pixels");
        }

        Ok(())
    }

    /// Check that the configured input files exist
    pub fn validate_inputs(&self) -> Result<()> {
        if !self.input.structure_file.exists() {
            anyhow::bail!("Structure file does not exist: {}", self.input.structure_file.display());
        }
        if !self.input.words_file.exists() {
            anyhow::bail!("Words file does not exist: {}", self.input.words_file.display());
        }
        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref structure_file) = cli_overrides.structure_file {
            self.input.structure_file = structure_file.clone();
        }
        if let Some(ref words_file) = cli_overrides.words_file {
            self.input.words_file = words_file.clone();
        }
        if let Some(ref output) = cli_overrides.output {
            self.output.path = Some(output.clone());
        }
        if let Some(max_nodes) = cli_overrides.max_nodes {
            self.solver.max_nodes = Some(max_nodes);
        }
        if let Some(timeout_seconds) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = Some(timeout_seconds);
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub structure_file: Option<PathBuf>,
    pub words_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub max_nodes: Option<u64>,
    pub timeout_seconds: Option<u64>,
}
