/// Directory organization by file extension.
///
/// This module moves the direct children of a target directory into
/// subfolders: recognized files into their category folder, leftover files
/// with an extension into [`OTHER_DIR`], and leftover foreign folders into
/// [`FOLDERS_DIR`]. Each step lists the directory afresh, so entries moved by
/// an earlier step are never seen again.
use crate::categories::{CategoryMap, FOLDERS_DIR, OTHER_DIR};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory organized when no target is given, relative to the home directory.
pub const DEFAULT_TARGET_DIR: &str = "~/Downloads";

/// A single relocation performed by the organizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    /// Where the entry was before the move.
    #[serde(serialize_with = "serialize_path_lossy")]
    pub source: PathBuf,
    /// Where the entry is now.
    #[serde(serialize_with = "serialize_path_lossy")]
    pub destination: PathBuf,
    /// Name of the folder it was moved into (a category, `Other` or `FOLDERS`).
    pub destination_dir: String,
}

/// Everything `organize` moved during one run.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizeReport {
    pub started_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_path_lossy")]
    pub target_dir: PathBuf,
    pub moves: Vec<Move>,
}

impl OrganizeReport {
    fn new(target_dir: PathBuf) -> Self {
        Self {
            started_at: Utc::now(),
            target_dir,
            moves: Vec::new(),
        }
    }

    /// Number of entries moved into `dir_name`.
    pub fn count_in(&self, dir_name: &str) -> usize {
        self.moves
            .iter()
            .filter(|m| m.destination_dir == dir_name)
            .count()
    }
}

/// Writes a path as a string, replacing invalid UTF-8 with U+FFFD.
///
/// File names are not guaranteed to be UTF-8, and a report must still render
/// after the files were moved.
fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Errors that can occur while organizing a directory.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target directory is missing or not a directory.
    InvalidTargetDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Listing the target directory failed.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category or sweep directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Something already exists at the destination; nothing is overwritten.
    DestinationExists {
        source: PathBuf,
        destination: PathBuf,
    },
    /// The rename itself failed.
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTargetDir { path, source } => {
                write!(f, "Invalid target directory {}: {}", path.display(), source)
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::DestinationExists {
                source,
                destination,
            } => {
                write!(
                    f,
                    "Refusing to move {}: {} already exists",
                    source.display(),
                    destination.display()
                )
            }
            Self::MoveFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidTargetDir { source, .. }
            | Self::ReadDirFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => Some(source),
            Self::MoveFailed { source_error, .. } => Some(source_error),
            Self::DestinationExists { .. } => None,
        }
    }
}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Expands a leading `~` using `home` and makes the result absolute.
///
/// Only `~` and `~/...` are expanded. `~user` forms are deliberately left
/// alone, unlike a shell or Python's `expanduser`: resolving another user's
/// home needs a passwd lookup, and such a path is then taken relative to the
/// current directory. Paths without a tilde are untouched. Without a home
/// directory the path is returned unexpanded.
pub fn expand_target_dir(path: &Path, home: Option<&Path>) -> PathBuf {
    let expanded = match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        (Ok(_), None) => {
            warn!(
                "Could not determine the home directory; using {} as given",
                path.display()
            );
            path.to_path_buf()
        }
        (Err(_), _) => path.to_path_buf(),
    };

    std::path::absolute(&expanded).unwrap_or(expanded)
}

/// Returns the dot-prefixed suffix of a file name, if it has one.
///
/// Mirrors [`Path::extension`]: `archive.tar.gz` gives `.gz`, while `.bashrc`
/// and `notes.` have no suffix.
fn suffix_of(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy();
    if ext.is_empty() {
        None
    } else {
        Some(format!(".{}", ext))
    }
}

/// Sorts the direct children of one directory into subfolders.
///
/// The target directory and category mapping are fixed at construction.
/// Call [`organize`](Self::organize) to run the whole routine, or the
/// individual steps to run them one at a time.
///
/// # Examples
///
/// ```no_run
/// use dirsweep::organizer::DirectoryOrganizer;
///
/// let organizer = DirectoryOrganizer::default();
/// match organizer.organize() {
///     Ok(report) => println!("Moved {} entries", report.moves.len()),
///     Err(e) => eprintln!("Organization failed: {}", e),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryOrganizer {
    target_dir: PathBuf,
    categories: CategoryMap,
}

impl DirectoryOrganizer {
    /// Creates an organizer for `target_dir` using `categories`.
    ///
    /// `None` selects `~/Downloads` and the built-in category table. The
    /// target is expanded and made absolute here, once.
    pub fn new(target_dir: Option<&Path>, categories: Option<CategoryMap>) -> Self {
        let target_dir = target_dir.unwrap_or_else(|| Path::new(DEFAULT_TARGET_DIR));
        let home = dirs::home_dir();

        Self {
            target_dir: expand_target_dir(target_dir, home.as_deref()),
            categories: categories.unwrap_or_default(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    /// Creates one subdirectory per category, leaving existing ones alone.
    ///
    /// `Other` and `FOLDERS` are not created here; the sweep steps create
    /// them when they first have something to move.
    pub fn create_folders(&self) -> OrganizeResult<()> {
        self.check_target_dir()?;

        for name in self.categories.names() {
            ensure_dir(&self.target_dir.join(name))?;
        }
        info!(
            "Ensured {} category folders in {}",
            self.categories.len(),
            self.target_dir.display()
        );
        Ok(())
    }

    /// Moves each file with a recognized extension into its category folder.
    ///
    /// When several categories list the extension, the first one wins.
    pub fn organize_files(&self) -> OrganizeResult<Vec<Move>> {
        let mut moves = Vec::new();

        for path in self.entries()? {
            if !path.is_file() {
                continue;
            }
            let Some(suffix) = suffix_of(&path) else {
                continue;
            };
            if let Some(category) = self.categories.category_for(&suffix) {
                moves.push(self.move_into(&path, category)?);
            }
        }

        info!("Sorted {} files into categories", moves.len());
        Ok(moves)
    }

    /// Moves every remaining file that has an extension into `Other`.
    ///
    /// Files without an extension stay where they are.
    pub fn organize_remaining_files(&self) -> OrganizeResult<Vec<Move>> {
        let mut moves = Vec::new();

        for path in self.entries()? {
            if path.is_file() && suffix_of(&path).is_some() {
                moves.push(self.move_into(&path, OTHER_DIR)?);
            }
        }

        info!("Moved {} remaining files into {}", moves.len(), OTHER_DIR);
        Ok(moves)
    }

    /// Moves every foreign subdirectory into `FOLDERS`.
    ///
    /// Category folders, `Other` and `FOLDERS` itself are never moved.
    pub fn organize_remaining_folders(&self) -> OrganizeResult<Vec<Move>> {
        let mut moves = Vec::new();

        for path in self.entries()? {
            if path.is_dir() && !self.is_reserved(&path) {
                moves.push(self.move_into(&path, FOLDERS_DIR)?);
            }
        }

        info!("Moved {} folders into {}", moves.len(), FOLDERS_DIR);
        Ok(moves)
    }

    /// Runs the full routine: create folders, sort files, sweep leftover
    /// files, sweep leftover folders.
    ///
    /// Stops at the first error. Moves already made stay made and are
    /// logged at warn level before the error is returned.
    pub fn organize(&self) -> OrganizeResult<OrganizeReport> {
        let mut report = OrganizeReport::new(self.target_dir.clone());
        info!("Organizing {}", self.target_dir.display());

        if let Err(e) = self.run_steps(&mut report.moves) {
            if !report.moves.is_empty() {
                warn!(
                    "Stopped after moving {} entries in {}:",
                    report.moves.len(),
                    self.target_dir.display()
                );
                for m in &report.moves {
                    warn!("  {} -> {}", m.source.display(), m.destination.display());
                }
            }
            return Err(e);
        }

        Ok(report)
    }

    fn run_steps(&self, moves: &mut Vec<Move>) -> OrganizeResult<()> {
        self.create_folders()?;
        moves.extend(self.organize_files()?);
        moves.extend(self.organize_remaining_files()?);
        moves.extend(self.organize_remaining_folders()?);
        Ok(())
    }

    fn check_target_dir(&self) -> OrganizeResult<()> {
        match fs::metadata(&self.target_dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(OrganizeError::InvalidTargetDir {
                path: self.target_dir.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "target is not a directory",
                ),
            }),
            Err(e) => Err(OrganizeError::InvalidTargetDir {
                path: self.target_dir.clone(),
                source: e,
            }),
        }
    }

    /// Lists the direct children of the target directory.
    ///
    /// The listing is collected before the caller moves anything.
    fn entries(&self) -> OrganizeResult<Vec<PathBuf>> {
        let read_error = |e| OrganizeError::ReadDirFailed {
            path: self.target_dir.clone(),
            source: e,
        };

        fs::read_dir(&self.target_dir)
            .map_err(read_error)?
            .map(|entry| entry.map(|e| e.path()).map_err(read_error))
            .collect()
    }

    fn is_reserved(&self, path: &Path) -> bool {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => {
                name == FOLDERS_DIR || name == OTHER_DIR || self.categories.contains(name)
            }
            None => false,
        }
    }

    /// Renames `path` into `<target>/<dir_name>/`, keeping its file name.
    ///
    /// The destination folder is created if missing. An existing entry at the
    /// destination aborts the move.
    fn move_into(&self, path: &Path, dir_name: &str) -> OrganizeResult<Move> {
        let dest_dir = self.target_dir.join(dir_name);
        ensure_dir(&dest_dir)?;

        let file_name = path.file_name().ok_or_else(|| OrganizeError::MoveFailed {
            source: path.to_path_buf(),
            destination: dest_dir.clone(),
            source_error: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "entry has no name component",
            ),
        })?;
        let destination = dest_dir.join(file_name);

        // symlink_metadata also catches dangling links at the destination
        if fs::symlink_metadata(&destination).is_ok() {
            return Err(OrganizeError::DestinationExists {
                source: path.to_path_buf(),
                destination,
            });
        }

        fs::rename(path, &destination).map_err(|e| OrganizeError::MoveFailed {
            source: path.to_path_buf(),
            destination: destination.clone(),
            source_error: e,
        })?;
        debug!("{} -> {}", path.display(), destination.display());

        Ok(Move {
            source: path.to_path_buf(),
            destination,
            destination_dir: dir_name.to_string(),
        })
    }
}

impl Default for DirectoryOrganizer {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Creates `path` as a directory unless one is already there.
fn ensure_dir(path: &Path) -> OrganizeResult<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
