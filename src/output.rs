//! Output formatting and styling module.
//!
//! All terminal output of the binary goes through here. A successful run
//! prints nothing unless a summary or JSON report was asked for.

use crate::organizer::OrganizeReport;
use colored::*;
use indexmap::IndexMap;

/// Prints errors, summaries and reports with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsweep::output::OutputFormatter;
    /// OutputFormatter::error("Failed to organize directory");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Counts moves per destination folder, in order of first appearance.
    pub fn folder_counts(report: &OrganizeReport) -> IndexMap<&str, usize> {
        let mut counts = IndexMap::new();
        for m in &report.moves {
            *counts.entry(m.destination_dir.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Prints a table of moved entries per destination folder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsweep::organizer::DirectoryOrganizer;
    /// use dirsweep::output::OutputFormatter;
    ///
    /// let report = DirectoryOrganizer::default().organize().unwrap();
    /// OutputFormatter::summary_table(&report);
    /// ```
    pub fn summary_table(report: &OrganizeReport) {
        Self::header(&format!("SUMMARY: {}", report.target_dir.display()));

        let counts = Self::folder_counts(report);
        if counts.is_empty() {
            println!("{}", "Nothing to organize.".cyan());
            return;
        }

        let width = counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(6); // "Folder"

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Entries".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (folder, count) in &counts {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                entry_word(*count),
                width = width
            );
        }

        let total = report.moves.len();
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            entry_word(total),
            width = width
        );
    }

    /// Renders the report as pretty-printed JSON.
    pub fn json(report: &OrganizeReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }
}

fn entry_word(count: usize) -> &'static str {
    if count == 1 { "entry" } else { "entries" }
}
