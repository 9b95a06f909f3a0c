use crate::error::{Error, JobError};
use crate::plan::Job;
use crate::platform::Filesystem;
use crate::progress::ProgressReporter;
use std::time::Instant;
use tracing::{debug, error, info};

/// Result of the copy phase, one entry per job in plan order.
/// `Ok` carries the number of bytes copied (0 on a dry run).
#[derive(Debug, Default)]
pub struct CopyBatch {
    pub outcomes: Vec<Result<u64, JobError>>,
}

impl CopyBatch {
    pub fn copied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.copied()
    }

    pub fn bytes(&self) -> u64 {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok()).sum()
    }
}

/// Realizes jobs on disk.
pub struct Mover<'a> {
    fs: &'a dyn Filesystem,
    copy_enabled: bool,
}

impl<'a> Mover<'a> {
    /// With `copy_enabled` false the mover touches nothing; it still walks the
    /// jobs and reports progress so a dry run looks like a real one.
    pub fn new(fs: &'a dyn Filesystem, copy_enabled: bool) -> Self {
        Self { fs, copy_enabled }
    }

    /// Create the destination directory if needed, then copy with metadata.
    pub fn realize(&self, job: &Job) -> Result<u64, JobError> {
        if !self.copy_enabled {
            return Ok(0);
        }

        if let Some(parent) = job.destination.parent() {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| JobError::copy(job.source.clone(), job.destination.clone(), e))?;
        }

        self.fs
            .copy_with_metadata(&job.source, &job.destination)
            .map_err(|e| JobError::copy(job.source.clone(), job.destination.clone(), e))
    }

    /// Copy every job in order.
    ///
    /// A failed job is recorded and the batch carries on, unless
    /// `stop_on_error` is set, in which case the first failure aborts the batch
    /// with [`Error::Copy`].
    pub fn copy_all(
        &self,
        jobs: &[Job],
        stop_on_error: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<CopyBatch, Error> {
        let total = jobs.len();
        if self.copy_enabled {
            info!("Copying {} files", total);
        } else {
            info!("Copy disabled, walking {} jobs without copying", total);
        }
        reporter.on_copy_start(total);
        let start = Instant::now();

        let mut batch = CopyBatch {
            outcomes: Vec::with_capacity(total),
        };
        for (index, job) in jobs.iter().enumerate() {
            debug!(
                "Copying {} to {} - {}/{}",
                job.source.display(),
                job.destination.display(),
                index + 1,
                total
            );
            let outcome = self.realize(job);
            if let Err(e) = &outcome {
                error!("{}", e);
            }
            match outcome {
                Err(e) if stop_on_error => return Err(Error::Copy(e)),
                outcome => batch.outcomes.push(outcome),
            }
            reporter.on_copy_progress(index + 1, total, &job.source, &job.destination);
        }

        reporter.on_copy_complete(
            batch.copied(),
            batch.failed(),
            start.elapsed().as_secs_f64(),
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::LocalFs;
    use crate::progress::SilentReporter;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn job(source: &Path, destination: &Path) -> Job {
        Job {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        }
    }

    #[test]
    fn test_realize_creates_directories_and_copies() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("IMG_0001.JPG");
        fs::write(&source, b"jpeg").unwrap();
        let destination = tmp.path().join("archive/2024/03/09/IMG_0001_07-05-03.JPG");

        let bytes = Mover::new(&LocalFs, true)
            .realize(&job(&source, &destination))
            .unwrap();
        assert_eq!(bytes, 4);
        assert_eq!(fs::read(&destination).unwrap(), b"jpeg");
        assert!(source.exists());
    }

    #[test]
    fn test_realize_overwrites_existing_destination() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("IMG_0001.JPG");
        let destination = tmp.path().join("out/IMG_0001_00-00-00.JPG");
        fs::write(&source, b"new").unwrap();
        fs::create_dir_all(destination.parent().unwrap()).unwrap();
        fs::write(&destination, b"stale contents").unwrap();

        Mover::new(&LocalFs, true)
            .realize(&job(&source, &destination))
            .unwrap();
        assert_eq!(fs::read(&destination).unwrap(), b"new");
    }

    #[test]
    fn test_disabled_copy_touches_nothing() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("IMG_0001.JPG");
        fs::write(&source, b"jpeg").unwrap();
        let destination = tmp.path().join("archive/2024/IMG_0001.JPG");

        let batch = Mover::new(&LocalFs, false)
            .copy_all(&[job(&source, &destination)], false, &SilentReporter)
            .unwrap();
        assert_eq!(batch.copied(), 1);
        assert_eq!(batch.bytes(), 0);
        assert!(!tmp.path().join("archive").exists());
    }

    #[test]
    fn test_failed_job_does_not_stop_batch() {
        let tmp = tempdir().unwrap();
        let good = tmp.path().join("IMG_0002.JPG");
        fs::write(&good, b"ok").unwrap();
        let jobs = vec![
            job(
                &tmp.path().join("vanished.JPG"),
                &tmp.path().join("out/a.JPG"),
            ),
            job(&good, &tmp.path().join("out/b.JPG")),
        ];

        let batch = Mover::new(&LocalFs, true)
            .copy_all(&jobs, false, &SilentReporter)
            .unwrap();
        assert_eq!(batch.failed(), 1);
        assert!(matches!(batch.outcomes[0], Err(JobError::Copy { .. })));
        assert!(batch.outcomes[1].is_ok());
        assert!(tmp.path().join("out/b.JPG").exists());
    }

    #[test]
    fn test_stop_on_error_aborts_batch() {
        let tmp = tempdir().unwrap();
        let good = tmp.path().join("IMG_0002.JPG");
        fs::write(&good, b"ok").unwrap();
        let jobs = vec![
            job(
                &tmp.path().join("vanished.JPG"),
                &tmp.path().join("out/a.JPG"),
            ),
            job(&good, &tmp.path().join("out/b.JPG")),
        ];

        let result = Mover::new(&LocalFs, true).copy_all(&jobs, true, &SilentReporter);
        assert!(matches!(result, Err(Error::Copy(_))));
        assert!(!tmp.path().join("out/b.JPG").exists());
    }
}
