//! Category table for extension-based organization.
//!
//! A category is nothing more than a folder name paired with the file
//! extensions that belong in it. The mapping keeps insertion order, which
//! doubles as the tie-break when an extension is listed under more than one
//! category.
//!
//! # Examples
//!
//! ```
//! use dirsweep::categories::CategoryMap;
//!
//! let categories = CategoryMap::default();
//! assert_eq!(categories.category_for(".JPG"), Some("Images"));
//! assert_eq!(categories.category_for(".txt"), Some("Plaintext"));
//! assert_eq!(categories.category_for(".xyz"), None);
//! ```

use indexmap::IndexMap;

/// Folder receiving loose files whose extension matched no category.
pub const OTHER_DIR: &str = "Other";

/// Folder receiving loose subdirectories.
pub const FOLDERS_DIR: &str = "FOLDERS";

/// Built-in categories, in lookup order.
///
/// Two tokens are missing their leading dot (`pptx` under Documents, `svg`
/// under Images). They are kept as-is and never match a real suffix, so such
/// files end up in [`OTHER_DIR`].
const BUILTIN_CATEGORIES: &[(&str, &str)] = &[
    (
        "Documents",
        ".oxps .epub .pages .docx .doc .fdf .ods .odt .pwi .xsn .xps .dotx .docm .dox \
         .rvg .rtf .rtfd .wpd .csv .xls .xlsx .ppt pptx",
    ),
    ("Plaintext", ".txt .in .out"),
    ("PDFs", ".pdf"),
    (
        "Images",
        ".jpeg .jpg .tif .tiff .gif .bmp .png .bpg svg .heif .psd",
    ),
    (
        "Audio",
        ".aac .aa .aac .dvf .m4a .m4b .m4p .mp3 .msv .ogg .oga .raw .vox .wav .wma",
    ),
    (
        "Videos",
        ".avi .flv .wmv .mov .mp4 .webm .vob .mng .qt .mpg .mpeg .3gp .mkv",
    ),
    (
        "Archives",
        ".a .ar .cpio .iso .tar .gz .rz .7z .dmg .rar .xar .zip",
    ),
    ("Scripts", ".sh .zsh .py"),
];

/// Ordered mapping from category name to the extensions it collects.
///
/// Names are used verbatim as subfolder names. Extensions are stored
/// lowercased and compared against a lowercased, dot-prefixed suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    entries: IndexMap<String, Vec<String>>,
}

impl CategoryMap {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Creates a mapping holding the built-in table.
    ///
    /// Every call returns a fresh value; nothing is shared between instances.
    pub fn builtin() -> Self {
        BUILTIN_CATEGORIES
            .iter()
            .map(|(name, extensions)| (*name, extensions.split_whitespace()))
            .collect()
    }

    /// Adds a category, or replaces the extensions of an existing one.
    ///
    /// Replacing keeps the category at its original position.
    pub fn insert<N, I, E>(&mut self, name: N, extensions: I)
    where
        N: Into<String>,
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().to_lowercase())
            .collect();
        self.entries.insert(name.into(), extensions);
    }

    /// Returns the first category listing `suffix`, compared case-insensitively.
    ///
    /// `suffix` includes its leading dot (`".png"`). An empty suffix never
    /// matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsweep::categories::CategoryMap;
    ///
    /// let mut categories = CategoryMap::new();
    /// categories.insert("Pictures", [".png"]);
    /// categories.insert("Screenshots", [".png"]);
    /// assert_eq!(categories.category_for(".PNG"), Some("Pictures"));
    /// ```
    pub fn category_for(&self, suffix: &str) -> Option<&str> {
        if suffix.is_empty() {
            return None;
        }
        let suffix = suffix.to_lowercase();
        self.entries
            .iter()
            .find(|(_, extensions)| extensions.iter().any(|ext| *ext == suffix))
            .map(|(name, _)| name.as_str())
    }

    /// Returns true if `name` is one of the category names.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Category names in lookup order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Categories and their extensions in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, extensions)| (name.as_str(), extensions.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<N, I, E> FromIterator<(N, I)> for CategoryMap
where
    N: Into<String>,
    I: IntoIterator<Item = E>,
    E: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (name, extensions) in iter {
            map.insert(name, extensions);
        }
        map
    }
}
