use crate::error::Error;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_BLOCK_SIZE: usize = 65536;

/// Which file's creation time becomes the timestamp of a capture group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimestampPolicy {
    /// The first file discovered for the group wins.
    #[default]
    FirstSeen,
    /// The oldest creation time across the group, regardless of discovery order.
    Earliest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecksumAlgorithm {
    #[default]
    Adler32,
    Xxhash32,
}

/// Settings for one ingest run. Read once at start and never changed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub source_root: PathBuf,
    pub archive_root: PathBuf,
    /// When false the run is a dry run: nothing is copied.
    pub copy_files: bool,
    /// Remove source files whose copy verified.
    pub remove_verified: bool,
    pub ignore_patterns: Vec<String>,
    pub timestamp_policy: TimestampPolicy,
    pub checksum: ChecksumAlgorithm,
    pub block_size: usize,
    /// Abort the batch on the first copy failure instead of collecting failures.
    pub stop_on_copy_error: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::new(),
            archive_root: PathBuf::new(),
            copy_files: true,
            remove_verified: false,
            ignore_patterns: Vec::new(),
            timestamp_policy: TimestampPolicy::default(),
            checksum: ChecksumAlgorithm::default(),
            block_size: DEFAULT_BLOCK_SIZE,
            stop_on_copy_error: false,
        }
    }
}

impl IngestConfig {
    pub fn new(source_root: impl Into<PathBuf>, archive_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            archive_root: archive_root.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.source_root.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("source_root is not set".to_string()));
        }
        if self.archive_root.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("archive_root is not set".to_string()));
        }
        if self.block_size == 0 {
            return Err(Error::InvalidConfig(
                "block_size must be greater than zero".to_string(),
            ));
        }
        let source = resolve_root(&self.source_root)?;
        let archive = resolve_root(&self.archive_root)?;
        if archive.starts_with(&source) {
            return Err(Error::InvalidConfig(format!(
                "archive_root {} must not be inside source_root {}",
                self.archive_root.display(),
                self.source_root.display()
            )));
        }
        if source.starts_with(&archive) {
            return Err(Error::InvalidConfig(format!(
                "source_root {} must not be inside archive_root {}",
                self.source_root.display(),
                self.archive_root.display()
            )));
        }
        Ok(())
    }
}

/// Absolute, symlink-free form of a root that may not exist yet: the longest
/// existing ancestor is canonicalized and the missing tail re-appended.
fn resolve_root(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    let mut missing: Vec<OsString> = Vec::new();
    let mut existing = normalized.as_path();
    loop {
        if let Ok(resolved) = existing.canonicalize() {
            return Ok(missing
                .iter()
                .rev()
                .fold(resolved, |acc, part| acc.join(part)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(normalized),
        }
    }
}

/// Load configuration from an optional `Config` file (any format the `config`
/// crate understands) overlaid with `PIC_INGEST_*` environment variables.
pub fn load_configuration(file: Option<&Path>) -> Result<IngestConfig, ConfigError> {
    let file_source = match file {
        Some(path) => ConfigFile::from(path).required(true),
        None => ConfigFile::with_name("Config").required(false),
    };
    let builder = Config::builder()
        .add_source(file_source)
        .add_source(
            Environment::with_prefix("PIC_INGEST")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    builder.try_deserialize::<IngestConfig>()
}
