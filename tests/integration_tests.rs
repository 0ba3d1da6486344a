use clap::Parser;
use dirsweep::categories::{CategoryMap, FOLDERS_DIR, OTHER_DIR};
use dirsweep::cli::{Cli, run_cli};
use dirsweep::organizer::{DirectoryOrganizer, OrganizeError};
/// Integration tests for dirsweep
///
/// These tests run the organizer against throwaway directories and check
/// where every entry ends up.
///
/// Test categories:
/// 1. Full organization runs
/// 2. Classification of the built-in table
/// 3. Leftover files and folders
/// 4. Error scenarios
/// 5. Command-line entry point
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory with helpers to populate and inspect it.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn organizer(&self) -> DirectoryOrganizer {
        DirectoryOrganizer::new(Some(self.path()), None)
    }

    fn create_file(&self, name: &str) {
        let mut file = File::create(self.path().join(name)).expect("Failed to create file");
        file.write_all(name.as_bytes())
            .expect("Failed to write file content");
    }

    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_file(name);
        }
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir(self.path().join(name)).expect("Failed to create subdirectory");
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Should not exist: {}", path.display());
    }

    /// Names of the direct children, sorted.
    fn top_level(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

// ============================================================================
// Test Suite 1: Full Organization
// ============================================================================

#[test]
fn test_end_to_end_with_prepared_sweep_folders() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        "photo.JPG",
        "notes.txt",
        "archive.zip",
        "mystery.xyz",
        "no_ext_file",
    ]);
    fixture.create_subdir("OldStuff");
    fixture.create_subdir(OTHER_DIR);
    fixture.create_subdir(FOLDERS_DIR);

    fixture.organizer().organize().expect("organize failed");

    fixture.assert_file_exists("Images/photo.JPG");
    fixture.assert_file_exists("Plaintext/notes.txt");
    fixture.assert_file_exists("Archives/archive.zip");
    fixture.assert_file_exists("Other/mystery.xyz");
    fixture.assert_file_exists("no_ext_file");
    fixture.assert_dir_exists("FOLDERS/OldStuff");
    fixture.assert_not_exists("OldStuff");
}

#[test]
fn test_first_run_on_pristine_directory() {
    let fixture = TestFixture::new();
    fixture.create_files(&["report.pdf", "weird.abc"]);
    fixture.create_subdir("Projects");

    let report = fixture.organizer().organize().expect("organize failed");

    fixture.assert_file_exists("PDFs/report.pdf");
    fixture.assert_file_exists("Other/weird.abc");
    fixture.assert_dir_exists("FOLDERS/Projects");
    assert_eq!(report.moves.len(), 3);
}

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let report = fixture.organizer().organize().expect("organize failed");

    assert!(report.moves.is_empty());
    let mut expected: Vec<String> = CategoryMap::builtin()
        .names()
        .map(str::to_string)
        .collect();
    expected.sort();
    assert_eq!(fixture.top_level(), expected);
}

#[test]
fn test_organize_twice_is_stable() {
    let fixture = TestFixture::new();
    fixture.create_files(&["song.mp3", "thing.qqq", "LICENSE"]);
    fixture.create_subdir("Stuff");

    fixture.organizer().organize().expect("first run failed");
    let after_first = fixture.top_level();
    let second = fixture.organizer().organize().expect("second run failed");

    assert!(second.moves.is_empty());
    assert_eq!(fixture.top_level(), after_first);
    fixture.assert_file_exists("Audio/song.mp3");
    fixture.assert_file_exists("Other/thing.qqq");
    fixture.assert_dir_exists("FOLDERS/Stuff");
}

#[test]
fn test_moved_files_are_not_rescanned() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_file("Images/old.weird");
    fixture.create_file("new.png");

    fixture.organizer().organize().expect("organize failed");

    // Contents of category folders are never touched
    fixture.assert_file_exists("Images/old.weird");
    fixture.assert_file_exists("Images/new.png");
    fixture.assert_not_exists("Other");
}

// ============================================================================
// Test Suite 2: Classification
// ============================================================================

#[test]
fn test_every_builtin_extension_is_classified() {
    let categories = CategoryMap::builtin();

    for (category, extensions) in categories.iter() {
        // Dot-less tokens can never match a real suffix
        for ext in extensions.iter().filter(|ext| ext.starts_with('.')) {
            assert_eq!(categories.category_for(ext), Some(category));

            let fixture = TestFixture::new();
            let name = format!("sample{}", ext.to_uppercase());
            fixture.create_file(&name);

            fixture.organizer().organize().expect("organize failed");

            fixture.assert_file_exists(&format!("{}/{}", category, name));
            for other in categories.names().filter(|n| *n != category) {
                fixture.assert_not_exists(&format!("{}/{}", other, name));
            }
            fixture.assert_not_exists(&format!("Other/{}", name));
        }
    }
}

#[test]
fn test_dotless_builtin_tokens_fall_through_to_other() {
    let fixture = TestFixture::new();
    fixture.create_files(&["deck.pptx", "logo.svg"]);

    fixture.organizer().organize().expect("organize failed");

    fixture.assert_file_exists("Other/deck.pptx");
    fixture.assert_file_exists("Other/logo.svg");
}

#[test]
fn test_tie_break_follows_category_order() {
    let categories: CategoryMap = [
        ("Raw", vec![".raw"]),
        ("Audio", vec![".raw", ".wav"]),
    ]
    .into_iter()
    .collect();

    for _ in 0..3 {
        let fixture = TestFixture::new();
        fixture.create_file("capture.RAW");

        DirectoryOrganizer::new(Some(fixture.path()), Some(categories.clone()))
            .organize()
            .expect("organize failed");

        fixture.assert_file_exists("Raw/capture.RAW");
        fixture.assert_not_exists("Audio/capture.RAW");
    }
}

#[test]
fn test_multi_dot_names_use_last_suffix() {
    let fixture = TestFixture::new();
    fixture.create_files(&["backup.tar.gz", "v1.2.notes"]);

    fixture.organizer().organize().expect("organize failed");

    fixture.assert_file_exists("Archives/backup.tar.gz");
    fixture.assert_file_exists("Other/v1.2.notes");
}

// ============================================================================
// Test Suite 3: Leftovers
// ============================================================================

#[test]
fn test_files_without_extension_are_untouched() {
    let fixture = TestFixture::new();
    fixture.create_files(&["README", ".bashrc", "trailing."]);

    fixture.organizer().organize().expect("organize failed");

    fixture.assert_file_exists("README");
    fixture.assert_file_exists(".bashrc");
    fixture.assert_file_exists("trailing.");
    fixture.assert_not_exists("Other");
}

#[test]
fn test_category_named_folders_are_never_swept() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_subdir("MyProject");

    fixture.organizer().organize().expect("organize failed");

    fixture.assert_dir_exists("Images");
    fixture.assert_dir_exists("FOLDERS/MyProject");
    fixture.assert_not_exists("FOLDERS/Images");
}

#[test]
fn test_custom_categories_are_reserved_folders() {
    let fixture = TestFixture::new();
    fixture.create_file("book.epub");
    fixture.create_subdir("Images");

    let categories: CategoryMap = [("Books", vec![".epub"])].into_iter().collect();
    DirectoryOrganizer::new(Some(fixture.path()), Some(categories))
        .organize()
        .expect("organize failed");

    fixture.assert_file_exists("Books/book.epub");
    // Not a category in this table, so it gets swept
    fixture.assert_dir_exists("FOLDERS/Images");
}

// ============================================================================
// Test Suite 4: Errors
// ============================================================================

#[test]
fn test_missing_target_directory() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("does-not-exist");

    let result = DirectoryOrganizer::new(Some(&missing), None).organize();

    assert!(matches!(result, Err(OrganizeError::InvalidTargetDir { .. })));
    assert!(!missing.exists());
}

#[test]
fn test_target_is_a_file() {
    let fixture = TestFixture::new();
    fixture.create_file("plain.txt");

    let result = DirectoryOrganizer::new(Some(&fixture.path().join("plain.txt")), None).organize();

    assert!(matches!(result, Err(OrganizeError::InvalidTargetDir { .. })));
}

#[test]
fn test_collision_aborts_without_overwrite() {
    let fixture = TestFixture::new();
    fixture.create_subdir(OTHER_DIR);
    fs::write(fixture.path().join("Other/dup.xyz"), "older").expect("Failed to write");
    fs::write(fixture.path().join("dup.xyz"), "newer").expect("Failed to write");
    fixture.create_subdir("Leftover");

    let result = fixture.organizer().organize();

    assert!(matches!(
        result,
        Err(OrganizeError::DestinationExists { .. })
    ));
    let kept = fs::read_to_string(fixture.path().join("Other/dup.xyz")).expect("read failed");
    assert_eq!(kept, "older");
    fixture.assert_file_exists("dup.xyz");
    // The run stopped before the folder sweep
    fixture.assert_dir_exists("Leftover");
}

#[test]
fn test_sweep_folder_occupied_by_file() {
    let fixture = TestFixture::new();
    fixture.create_file(FOLDERS_DIR);
    fixture.create_subdir("Loose");

    let result = fixture.organizer().organize();

    assert!(matches!(
        result,
        Err(OrganizeError::DirectoryCreationFailed { .. })
    ));
    fixture.assert_dir_exists("Loose");
}

// ============================================================================
// Test Suite 5: Command Line
// ============================================================================

fn cli_for(target: &Path, extra: &[&str]) -> Cli {
    let mut args: Vec<OsString> = vec!["dirsweep".into(), target.into()];
    args.extend(extra.iter().map(OsString::from));
    Cli::try_parse_from(args).expect("parse failed")
}

#[test]
fn test_run_cli_with_defaults() {
    let fixture = TestFixture::new();
    fixture.create_files(&["clip.mp4", "script.sh"]);

    let cli = cli_for(fixture.path(), &[]);
    run_cli(&cli).expect("run_cli failed");

    fixture.assert_file_exists("Videos/clip.mp4");
    fixture.assert_file_exists("Scripts/script.sh");
}

#[test]
fn test_run_cli_custom_categories_replace_builtin() {
    let fixture = TestFixture::new();
    fixture.create_files(&["book.epub", "photo.png"]);

    let cli = cli_for(fixture.path(), &["--category", "Books=epub,mobi", "--json"]);
    run_cli(&cli).expect("run_cli failed");

    fixture.assert_file_exists("Books/book.epub");
    fixture.assert_file_exists("Other/photo.png");
    fixture.assert_not_exists("Images");
}

#[test]
fn test_run_cli_reports_missing_directory() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("gone");

    let cli = cli_for(&missing, &[]);
    let err = run_cli(&cli).expect_err("run_cli should fail");

    assert!(err.contains("Invalid target directory"));
}

#[cfg(unix)]
#[test]
fn test_run_cli_json_with_non_utf8_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = TestFixture::new();
    let name = OsStr::from_bytes(b"bad\xff.xyz");
    fs::write(fixture.path().join(name), "x").expect("Failed to write file");

    let cli = cli_for(fixture.path(), &["--json"]);
    run_cli(&cli).expect("run_cli failed");

    assert!(fixture.path().join(OTHER_DIR).join(name).is_file());
}
