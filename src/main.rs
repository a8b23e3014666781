//! Command line interface for the crossword generator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossword_generator::{
    config::{CliOverrides, Settings},
    crossword::create_example_files,
    generate::{CrosswordCreator, SolveOutcome},
    utils::{ColorOutput, SolutionFormatter},
};
use env_logger::Env;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "crossword_generator")]
#[command(about = "Fill crossword grids from a word list")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a crossword structure with words
    Solve {
        /// Structure file (overrides config)
        structure: Option<PathBuf>,

        /// Word list file (overrides config)
        words: Option<PathBuf>,

        /// Output file; `.json` and `.svg` select those formats (overrides config)
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Maximum number of search nodes (overrides config)
        #[arg(long)]
        max_nodes: Option<u64>,

        /// Search timeout in seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report slots and domain sizes after consistency, without searching
    Analyze {
        /// Structure file
        structure: PathBuf,

        /// Word list file
        words: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Solve { verbose: true, .. });
    env_logger::Builder::from_env(Env::default().default_filter_or(if verbose { "debug" } else { "warn" }))
        .init();

    match cli.command {
        Commands::Solve {
            structure,
            words,
            output,
            config,
            max_nodes,
            timeout,
            verbose,
        } => {
            let overrides = CliOverrides {
                structure_file: structure,
                words_file: words,
                output,
                max_nodes,
                timeout_seconds: timeout,
            };
            solve_command(config, overrides, verbose)
        }
        Commands::Analyze { structure, words, config } => analyze_command(config, structure, words),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

/// Load configuration, falling back to defaults when the file is missing
fn load_settings(config_path: &Path) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!("Config file {} not found, using defaults", config_path.display()))
        );
        Ok(Settings::default())
    }
}

fn solve_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;
    settings.validate_inputs()?;

    if verbose {
        println!("Configuration:");
        println!("  Structure file: {}", settings.input.structure_file.display());
        println!("  Words file: {}", settings.input.words_file.display());
        println!("  Node limit: {}", display_limit(settings.solver.max_nodes));
        println!("  Timeout (s): {}", display_limit(settings.solver.timeout_seconds));
        println!();
    }

    let mut creator = CrosswordCreator::from_settings(&settings)?;
    let outcome = creator.solve().context("Failed to solve crossword")?;

    if verbose {
        println!("{}", creator.statistics());
    }

    let solution = match outcome {
        SolveOutcome::Solved(solution) => solution,
        SolveOutcome::Unsatisfiable { .. } => {
            println!("No solution.");
            return Ok(());
        }
        SolveOutcome::BudgetExhausted => {
            println!(
                "{}",
                ColorOutput::warning("Search budget exhausted before a solution was found or ruled out.")
            );
            return Ok(());
        }
    };

    if verbose {
        print!("{}", SolutionFormatter::format_solution(&solution));
    } else {
        print!("{}", SolutionFormatter::format_grid_compact(&solution));
    }

    if let Some(path) = &settings.output.path {
        let format = settings.output.resolve_format(path);
        SolutionFormatter::save_solution(&solution, path, format, settings.output.cell_size)
            .context("Failed to save solution")?;
        println!("{}", ColorOutput::success(&format!("Solution saved to {}", path.display())));
    }

    Ok(())
}

fn display_limit(limit: Option<u64>) -> String {
    limit.map_or_else(|| "none".to_string(), |value| value.to_string())
}

fn analyze_command(config_path: PathBuf, structure: PathBuf, words: PathBuf) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&CliOverrides {
        structure_file: Some(structure),
        words_file: Some(words),
        ..Default::default()
    });
    settings.validate_inputs()?;

    let mut creator = CrosswordCreator::from_settings(&settings)?;
    println!("Structure ({}x{}):", creator.crossword().width(), creator.crossword().height());
    println!("{}", creator.crossword().structure());

    let analysis = creator.analyze();
    println!("{}", analysis);

    if analysis.arc_consistency.is_consistent() {
        println!("{}", ColorOutput::success("Consistency passes left every slot with candidates"));
    } else {
        println!("{}", ColorOutput::error("Consistency alone proves the puzzle unsatisfiable"));
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let data_dir = directory.join("data");

    for dir in [&config_dir, &data_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let mut default_settings = Settings::default();
        default_settings.input.structure_file = data_dir.join("structure0.txt");
        default_settings.input.words_file = data_dir.join("words0.txt");
        default_settings
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_files(&data_dir).context("Failed to create example files")?;
    println!("Created example structures and words in: {}", data_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!("2. Run: crossword_generator solve --config {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "crossword_generator",
            "solve",
            "data/structure1.txt",
            "data/words0.txt",
            "out.svg",
            "--max-nodes",
            "500",
        ])
        .unwrap();

        match cli.command {
            Commands::Solve {
                structure,
                output,
                max_nodes,
                verbose,
                ..
            } => {
                assert_eq!(structure, Some(PathBuf::from("data/structure1.txt")));
                assert_eq!(output, Some(PathBuf::from("out.svg")));
                assert_eq!(max_nodes, Some(500));
                assert!(!verbose);
            }
            _ => panic!("expected solve"),
        }

        assert!(Cli::try_parse_from(["crossword_generator", "analyze", "s.txt"]).is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        let config_path = temp_dir.path().join("config/default.yaml");
        assert!(config_path.exists());
        assert!(temp_dir.path().join("data/structure0.txt").exists());

        let settings = Settings::from_file(&config_path).unwrap();
        assert!(settings.validate_inputs().is_ok());
    }

    #[test]
    fn test_solve_command_writes_output() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        let output = temp_dir.path().join("solution.json");
        let overrides = CliOverrides {
            output: Some(output.clone()),
            ..Default::default()
        };
        solve_command(temp_dir.path().join("config/default.yaml"), overrides, false).unwrap();

        assert!(std::fs::read_to_string(&output).unwrap().contains("\"entries\""));

        let verbose_output = temp_dir.path().join("verbose.svg");
        let overrides = CliOverrides {
            output: Some(verbose_output.clone()),
            ..Default::default()
        };
        solve_command(temp_dir.path().join("config/default.yaml"), overrides, true).unwrap();
        assert!(std::fs::read_to_string(&verbose_output).unwrap().starts_with("<svg"));
    }

    #[test]
    fn test_analyze_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        let config = temp_dir.path().join("config/default.yaml");
        let data = temp_dir.path().join("data");
        analyze_command(config.clone(), data.join("structure1.txt"), data.join("words0.txt")).unwrap();

        let missing = analyze_command(config, data.join("missing.txt"), data.join("words0.txt"));
        assert!(missing.is_err());
    }
}
