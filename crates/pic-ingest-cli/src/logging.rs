use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "./logs/pic-ingest.log";

/// Console and file logging. The file keeps a plain-text record of the run,
/// including per-file `debug!` lines when the filter allows them.
///
/// `TRACING_LEVEL` sets the filter (default `info`), `LOG_FILE_PATH` the log
/// file. The returned guard flushes the file writer when dropped.
pub fn init_logger() -> impl Drop {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::new(filter);

    let log_file = env::var_os("LOG_FILE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let (directory, file_name) = split_log_path(&log_file);

    let file_appender = tracing_appender::rolling::never(&directory, &file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .without_time()
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    debug!("Ingest log written to {}", log_file.display());

    guard
}

/// Directory and file name of the log file. A bare name lands in the working
/// directory; a path without a file name falls back to the default name.
fn split_log_path(path: &Path) -> (PathBuf, OsString) {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    match path.file_name() {
        Some(name) => (directory, name.to_os_string()),
        None => (path.to_path_buf(), OsString::from("pic-ingest.log")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path(Path::new(DEFAULT_LOG_FILE)),
            (PathBuf::from("./logs"), OsString::from("pic-ingest.log"))
        );
        assert_eq!(
            split_log_path(Path::new("ingest.log")),
            (PathBuf::from("."), OsString::from("ingest.log"))
        );
        assert_eq!(
            split_log_path(Path::new("/var/log/pics/")),
            (PathBuf::from("/var/log"), OsString::from("pics"))
        );
    }
}
