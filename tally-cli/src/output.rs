//! Leaderboard presentation
//!
//! Renders only the canonical columns the source schema populated, in
//! canonical order.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use tally_core::domain::leaderboard::Leaderboard;
use tally_core::domain::record::CanonicalField;

/// Longest cell printed in the terminal table
const MAX_CELL_WIDTH: usize = 48;

/// Print the leaderboard as a table
pub fn print_leaderboard(board: &Leaderboard) {
    if board.is_empty() {
        println!("{}", "No listings matched the filters.".yellow());
        return;
    }

    if board.fields().is_empty() {
        println!(
            "{}",
            "None of the dataset's columns matched a leaderboard field.".yellow()
        );
        return;
    }

    let header: Vec<String> = std::iter::once("#".to_string())
        .chain(board.fields().iter().map(|f| f.name().to_string()))
        .collect();

    let rows: Vec<Vec<String>> = board
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            std::iter::once((idx + 1).to_string())
                .chain(
                    board
                        .fields()
                        .iter()
                        .map(|&f| clip(&record.cell(f).unwrap_or_default())),
                )
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!(
        "{}",
        format!("Leaderboard ({} listing(s)):", board.len()).bold()
    );
    println!();
    println!("{}", format_row(&header, &widths).bold());
    println!(
        "{}",
        "─".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)).dimmed()
    );
    for row in &rows {
        println!("{}", format_row(row, &widths));
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}

/// Render the leaderboard as CSV
pub fn to_csv(board: &Leaderboard) -> String {
    let mut out = String::new();

    let header: Vec<&str> = board.fields().iter().map(CanonicalField::name).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for record in board.rows() {
        let line: Vec<String> = board
            .fields()
            .iter()
            .map(|&f| escape_csv(&record.cell(f).unwrap_or_default()))
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

/// Write the leaderboard to a CSV file
pub fn write_csv(path: &Path, board: &Leaderboard) -> Result<()> {
    fs::write(path, to_csv(board))
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;

    println!(
        "{} {}",
        "✓ Wrote".green(),
        format!("{} row(s) to {}", board.len(), path.display()).dimmed()
    );
    Ok(())
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
