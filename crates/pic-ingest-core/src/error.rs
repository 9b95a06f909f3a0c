use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot read source directory {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read creation time of {path}: {source}")]
    TimestampRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was not part of the timestamp resolution input.
    #[error("No group timestamp planned for {path}")]
    Unplanned { path: PathBuf },

    #[error("Copy aborted: {0}")]
    Copy(JobError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures scoped to a single job. These are recorded in the run report and
/// never cause the source file to be removed.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Failed to copy {from} to {to}: {error}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("File missing at verification: {path}")]
    MissingAtVerify { path: PathBuf },

    #[error("Failed to checksum {path}: {error}")]
    Checksum {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

impl JobError {
    pub fn copy(from: PathBuf, to: PathBuf, error: std::io::Error) -> Self {
        Self::Copy { from, to, error }
    }
}
