//! dirsweep - sort a download folder into subfolders by file extension
//!
//! This library moves the direct children of a directory into one folder per
//! extension category, sweeps leftover files into `Other` and leftover
//! folders into `FOLDERS`.

pub mod categories;
pub mod cli;
pub mod organizer;
pub mod output;

pub use categories::{CategoryMap, FOLDERS_DIR, OTHER_DIR};
pub use organizer::{DirectoryOrganizer, Move, OrganizeError, OrganizeReport, OrganizeResult};

pub use cli::{Cli, run_cli};
