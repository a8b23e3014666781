//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::generate::Solution;
use anyhow::{Context, Result};
use std::path::Path;

/// Border drawn around each open cell in SVG output
const CELL_BORDER: u32 = 2;

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Letter grid with `█` for blocked cells and a space for open cells without a letter
    pub fn format_grid_compact(solution: &Solution) -> String {
        let mut output = String::new();
        for row in solution.letter_grid() {
            for cell in row {
                output.push(cell.unwrap_or('█'));
            }
            output.push('\n');
        }
        output
    }

    /// Format a single solution for console output
    pub fn format_solution(solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Solution {}x{} ===\n", solution.width, solution.height));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!("Entries: {}\n\n", solution.entries.len()));
        output.push_str(&Self::format_grid_compact(solution));
        output.push('\n');

        output.push_str("Slot                   | Word\n");
        output.push_str("-----------------------|----------\n");
        for entry in &solution.entries {
            output.push_str(&format!("{:<22} | {}\n", entry.slot.to_string(), entry.word));
        }

        output
    }

    /// Render `solution` as an SVG image: black background, white open cells, centered letters.
    /// Pixel coordinates are `u64`.
    pub fn render_svg(solution: &Solution, cell_size: u32) -> String {
        let cell = u64::from(cell_size);
        let border = u64::from(CELL_BORDER);
        let width = (solution.width as u64).saturating_mul(cell);
        let height = (solution.height as u64).saturating_mul(cell);
        let inner = cell.saturating_sub(2 * border);
        let font_size = cell * 3 / 5;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        svg.push('\n');
        svg.push_str(&format!(r#"  <rect width="{width}" height="{height}" fill="black"/>"#));
        svg.push('\n');

        for (row, cells) in solution.letter_grid().iter().enumerate() {
            let top = (row as u64).saturating_mul(cell);
            for (col, cell_letter) in cells.iter().enumerate() {
                let Some(letter) = cell_letter else { continue };
                let left = (col as u64).saturating_mul(cell);
                let (x, y) = (left + border, top + border);
                svg.push_str(&format!(
                    r#"  <rect x="{x}" y="{y}" width="{inner}" height="{inner}" fill="white"/>"#
                ));
                svg.push('\n');

                if !letter.is_whitespace() {
                    let (cx, cy) = (left + cell / 2, top + cell / 2);
                    svg.push_str(&format!(
                        r#"  <text x="{cx}" y="{cy}" font-family="sans-serif" font-size="{font_size}" text-anchor="middle" dominant-baseline="central" fill="black">{}</text>"#,
                        escape_xml(*letter)
                    ));
                    svg.push('\n');
                }
            }
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Render `solution` in `format`
    pub fn render(solution: &Solution, format: OutputFormat, cell_size: u32) -> Result<String> {
        Ok(match format {
            OutputFormat::Text => Self::format_grid_compact(solution),
            OutputFormat::Json => solution.to_json().context("Failed to serialize solution")?,
            OutputFormat::Svg => Self::render_svg(solution, cell_size),
        })
    }

    /// Save a solution to `path`, creating parent directories as needed
    pub fn save_solution<P: AsRef<Path>>(
        solution: &Solution,
        path: P,
        format: OutputFormat,
        cell_size: u32,
    ) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = Self::render(solution, format, cell_size)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write solution: {}", path.display()))?;
        Ok(())
    }
}

fn escape_xml(letter: char) -> String {
    match letter {
        '&' => "&amp;".to_string(),
        '<' => "&lt;".to_string(),
        '>' => "&gt;".to_string(),
        '"' => "&quot;".to_string(),
        '\'' => "&apos;".to_string(),
        other => other.to_string(),
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
