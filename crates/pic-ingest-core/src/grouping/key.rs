use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Separator between the directory label and the base name in a key label.
pub const KEY_DELIMITER: char = '_';

/// A discovered file split into the parts the planner needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub directory: PathBuf,
    pub stem: OsString,
    pub extension: Option<OsString>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let stem = path
            .file_stem()
            .map(OsStr::to_os_string)
            .unwrap_or_default();
        let extension = path.extension().map(OsStr::to_os_string);
        Self {
            path,
            directory,
            stem,
            extension,
        }
    }

    pub fn key(&self) -> GroupKey {
        GroupKey {
            directory: self.directory.clone(),
            stem: self.stem.clone(),
        }
    }
}

/// Identity of a capture event: the containing directory plus the base name
/// with its extension stripped.
///
/// Equality uses the real directory and stem, so two distinct
/// (directory, stem) pairs never compare equal even when their sanitized
/// labels happen to coincide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    directory: PathBuf,
    stem: OsString,
}

impl GroupKey {
    pub fn for_path(path: &Path) -> Self {
        SourceFile::new(path).key()
    }

    /// Flat string form: the directory with separators and drive designators
    /// removed, the delimiter, then the stem.
    pub fn label(&self) -> String {
        let directory: String = self
            .directory
            .to_string_lossy()
            .chars()
            .filter(|c| !matches!(c, '/' | '\\' | ':'))
            .collect();
        format!(
            "{}{}{}",
            directory,
            KEY_DELIMITER,
            self.stem.to_string_lossy()
        )
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
