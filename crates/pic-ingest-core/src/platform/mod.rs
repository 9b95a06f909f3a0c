use filetime::FileTime;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

/// Filesystem operations the ingest pipeline depends on.
///
/// [`LocalFs`] talks to the real filesystem; tests wrap it to inject
/// fixed creation times or faulty copies.
pub trait Filesystem {
    /// Creation (birth) time of a file.
    fn created(&self, path: &Path) -> io::Result<SystemTime>;

    /// Create a directory and all of its parents. No-op if it already exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy file contents, mirroring permissions and access/modification times.
    /// Returns the number of bytes copied.
    fn copy_with_metadata(&self, from: &Path, to: &Path) -> io::Result<u64>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn created(&self, path: &Path) -> io::Result<SystemTime> {
        let metadata = fs::metadata(path)?;
        match metadata.created() {
            Ok(time) => Ok(time),
            Err(e) => {
                debug!(
                    "No birth time for {} ({}), using modification time",
                    path.display(),
                    e
                );
                metadata.modified()
            }
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_with_metadata(&self, from: &Path, to: &Path) -> io::Result<u64> {
        // fs::copy carries the permission bits over
        let bytes = fs::copy(from, to)?;
        let metadata = fs::metadata(from)?;
        filetime::set_file_times(
            to,
            FileTime::from_last_access_time(&metadata),
            FileTime::from_last_modification_time(&metadata),
        )?;
        Ok(bytes)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }
}
