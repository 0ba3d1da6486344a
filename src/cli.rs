//! Command-line interface module for dirsweep.
//!
//! This module handles:
//! - Argument parsing (target directory, custom categories, output flags)
//! - Building the organizer from those arguments
//! - Running the organization and printing what was asked for

use crate::categories::CategoryMap;
use crate::organizer::DirectoryOrganizer;
use crate::output::OutputFormatter;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

/// Sort the files of a directory into folders by extension.
///
/// Recognized files go into one folder per category, other files with an
/// extension into `Other`, and foreign subfolders into `FOLDERS`.
#[derive(Debug, Parser)]
#[command(name = "dirsweep", version, about)]
pub struct Cli {
    /// Directory to organize [default: ~/Downloads]
    pub target_dir: Option<PathBuf>,

    /// Custom category as NAME=EXT[,EXT...]; repeat to add more.
    /// Replaces the built-in table when given.
    #[arg(short = 'c', long = "category", value_name = "NAME=EXTS", value_parser = parse_category)]
    pub categories: Vec<(String, Vec<String>)>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print a table of moved entries per folder
    #[arg(long)]
    pub summary: bool,

    /// Print the run report as JSON
    #[arg(long, conflicts_with = "summary")]
    pub json: bool,
}

impl Cli {
    /// Log level selected by the `-v` count.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    /// The custom category table, or `None` to use the built-in one.
    pub fn category_map(&self) -> Option<CategoryMap> {
        if self.categories.is_empty() {
            return None;
        }
        Some(
            self.categories
                .iter()
                .map(|(name, exts)| (name.as_str(), exts.iter()))
                .collect(),
        )
    }
}

/// Parses `NAME=EXT[,EXT...]` into a category name and its extensions.
///
/// Extensions given without a leading dot get one.
pub fn parse_category(value: &str) -> Result<(String, Vec<String>), String> {
    let (name, exts) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=EXTS, got '{}'", value))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing category name in '{}'", value));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(format!("'{}' is not a valid folder name", name));
    }

    let extensions: Vec<String> = exts
        .split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(|ext| {
            if ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{}", ext)
            }
        })
        .collect();
    if extensions.is_empty() {
        return Err(format!("no extensions given for category '{}'", name));
    }

    Ok((name.to_string(), extensions))
}

/// Runs one organization pass as described by `cli`.
///
/// Prints nothing on success unless `--summary` or `--json` was given.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use dirsweep::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["dirsweep", "/path/to/directory", "--summary"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    let organizer = DirectoryOrganizer::new(cli.target_dir.as_deref(), cli.category_map());
    let report = organizer.organize().map_err(|e| e.to_string())?;

    if cli.json {
        let json = OutputFormatter::json(&report)
            .map_err(|e| format!("Error serializing report: {}", e))?;
        println!("{}", json);
    } else if cli.summary {
        OutputFormatter::summary_table(&report);
    }

    Ok(())
}
