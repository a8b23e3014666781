//! Loading structure and word list files

use super::{Crossword, PuzzleError, Structure};
use crate::config::{CaseNormalization, InputConfig};
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Load a structure from a text file.
/// Format: each line is a row; `open_cell` marks fillable cells, anything else is blocked.
pub fn load_structure_from_file<P: AsRef<Path>>(path: P, open_cell: char) -> Result<Structure> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read structure file: {}", path.as_ref().display()))?;

    Structure::parse(&content, open_cell)
        .with_context(|| format!("Failed to parse structure file: {}", path.as_ref().display()))
}

/// Load a word list, one word per line
pub fn load_words_from_file<P: AsRef<Path>>(path: P, case: CaseNormalization) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read words file: {}", path.as_ref().display()))?;

    parse_words(&content, case)
        .with_context(|| format!("Failed to parse words file: {}", path.as_ref().display()))
}

/// Split a word list into trimmed, normalized, non-empty words
pub fn parse_words(content: &str, case: CaseNormalization) -> Result<Vec<String>, PuzzleError> {
    let words: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match case {
            CaseNormalization::Upper => line.to_uppercase(),
            CaseNormalization::Lower => line.to_lowercase(),
            CaseNormalization::Preserve => line.to_string(),
        })
        .collect();

    if words.is_empty() {
        return Err(PuzzleError::EmptyWordList);
    }
    Ok(words)
}

/// Load both input files named by `input` and build the crossword model
pub fn load_crossword(input: &InputConfig) -> Result<Crossword> {
    let structure = load_structure_from_file(&input.structure_file, input.open_cell)?;
    let words = load_words_from_file(&input.words_file, input.case)?;
    let word_count = words.len();

    let crossword = Crossword::new(structure, words).with_context(|| {
        format!("Failed to build crossword from {}", input.structure_file.display())
    })?;

    info!(
        "Loaded {}x{} crossword with {} slots and {} distinct words ({} lines)",
        crossword.width(),
        crossword.height(),
        crossword.slots().len(),
        crossword.words().len(),
        word_count
    );
    Ok(crossword)
}

/// Create example structure and word files
pub fn create_example_files<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Two crossing slots sharing their first letter
    let corner = "___\n_##\n_##\n";
    std::fs::write(dir.join("structure0.txt"), corner)
        .context("Failed to write structure0.txt")?;

    // Closed loop of four slots
    let frame = "#___#\n#_#_#\n#___#\n";
    std::fs::write(dir.join("structure1.txt"), frame)
        .context("Failed to write structure1.txt")?;

    let words = "cat\ncar\ndog\nten\nnet\ntan\nant\nrat\nart\ntar\none\nrun\n";
    std::fs::write(dir.join("words0.txt"), words)
        .context("Failed to write words0.txt")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_words_normalizes_case() {
        let words = parse_words("  Cat\n\ndog \nDOG\n", CaseNormalization::Upper).unwrap();
        assert_eq!(words, vec!["CAT", "DOG", "DOG"]);

        let words = parse_words("Cat\n", CaseNormalization::Lower).unwrap();
        assert_eq!(words, vec!["cat"]);

        let words = parse_words("Cat\n", CaseNormalization::Preserve).unwrap();
        assert_eq!(words, vec!["Cat"]);
    }

    #[test]
    fn test_empty_word_list() {
        assert_eq!(
            parse_words("\n  \n", CaseNormalization::Upper),
            Err(PuzzleError::EmptyWordList)
        );
    }

    #[test]
    fn test_load_crossword() {
        let temp_dir = tempdir().unwrap();
        create_example_files(temp_dir.path()).unwrap();

        let input = InputConfig {
            structure_file: temp_dir.path().join("structure1.txt"),
            words_file: temp_dir.path().join("words0.txt"),
            ..Default::default()
        };
        let crossword = load_crossword(&input).unwrap();

        assert_eq!(crossword.width(), 5);
        assert_eq!(crossword.height(), 3);
        assert_eq!(crossword.slots().len(), 4);
        assert_eq!(crossword.words().len(), 12);
        assert_eq!(crossword.word_id("CAT"), Some(3));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        let result = load_structure_from_file(temp_dir.path().join("nope.txt"), '_');
        assert!(result.is_err());
    }
}
