use crate::error::JobError;
use crate::hasher::Verifier;
use crate::mover::CopyBatch;
use crate::plan::Job;
use crate::platform::Filesystem;
use crate::progress::ProgressReporter;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Verification verdict for one job.
#[derive(Debug)]
pub enum JobOutcome {
    Matched,
    Mismatched,
    Failed(JobError),
}

/// Partitioned results of a run. Relative job order is preserved inside each
/// partition.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub matched: Vec<Job>,
    pub mismatched: Vec<Job>,
    pub failed: Vec<(Job, JobError)>,
    pub removal_enabled: bool,
    pub removed: usize,
    pub removal_failures: Vec<(PathBuf, std::io::Error)>,
}

impl ReconcileReport {
    /// Matched sources left in place because removal is disabled.
    pub fn would_remove(&self) -> usize {
        if self.removal_enabled {
            0
        } else {
            self.matched.len()
        }
    }

    /// Jobs whose source was kept because the copy could not be verified.
    pub fn needs_attention(&self) -> usize {
        self.mismatched.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.needs_attention() == 0 && self.removal_failures.is_empty()
    }
}

/// Verifies copied jobs and removes the sources of verified ones.
pub struct Reconciler<'a> {
    fs: &'a dyn Filesystem,
    verifier: Verifier<'a>,
    remove_verified: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(fs: &'a dyn Filesystem, verifier: Verifier<'a>, remove_verified: bool) -> Self {
        Self {
            fs,
            verifier,
            remove_verified,
        }
    }

    pub fn classify(&self, job: &Job) -> JobOutcome {
        match self.verifier.files_match(&job.source, &job.destination) {
            Ok(true) => JobOutcome::Matched,
            Ok(false) => JobOutcome::Mismatched,
            Err(e) => JobOutcome::Failed(e),
        }
    }

    /// Verify every job, then delete matched sources if removal is enabled.
    ///
    /// A source is only ever removed when its own job matched; mismatched and
    /// failed jobs never lose their source.
    pub fn reconcile(
        &self,
        jobs: &[Job],
        copies: CopyBatch,
        reporter: &dyn ProgressReporter,
    ) -> ReconcileReport {
        let mut report = ReconcileReport {
            removal_enabled: self.remove_verified,
            ..ReconcileReport::default()
        };

        let total = jobs.len();
        info!("Comparing {} files", total);
        reporter.on_verify_start(total);
        let start = Instant::now();

        for (index, (job, copied)) in jobs.iter().zip(copies.outcomes).enumerate() {
            let outcome = match copied {
                Ok(_) => self.classify(job),
                Err(e) => JobOutcome::Failed(e),
            };
            let matched = matches!(outcome, JobOutcome::Matched);
            match outcome {
                JobOutcome::Matched => {
                    debug!(
                        "OK {} -> {}",
                        job.source.display(),
                        job.destination.display()
                    );
                    report.matched.push(job.clone());
                }
                JobOutcome::Mismatched => {
                    error!(
                        "Checksum mismatch {} -> {}",
                        job.source.display(),
                        job.destination.display()
                    );
                    report.mismatched.push(job.clone());
                }
                JobOutcome::Failed(e) => {
                    error!("{}", e);
                    report.failed.push((job.clone(), e));
                }
            }
            reporter.on_verify_progress(index + 1, total, &job.source, matched);
        }
        reporter.on_verify_complete(
            report.matched.len(),
            report.needs_attention(),
            start.elapsed().as_secs_f64(),
        );

        self.remove_sources(&mut report, reporter);
        report
    }

    fn remove_sources(&self, report: &mut ReconcileReport, reporter: &dyn ProgressReporter) {
        let candidates = report.matched.len();
        reporter.on_remove_start(candidates, self.remove_verified);
        if !self.remove_verified {
            info!(
                "Skipping removal of {} files from source directory",
                candidates
            );
            reporter.on_remove_complete(0);
            return;
        }

        info!("Removing {} files from source directory", candidates);
        for job in &report.matched {
            if !self.fs.exists(&job.source) {
                warn!(
                    "{} no longer exists, nothing to remove",
                    job.source.display()
                );
                continue;
            }
            match self.fs.remove_file(&job.source) {
                Ok(()) => {
                    debug!("Removed {}", job.source.display());
                    report.removed += 1;
                    reporter.on_remove_file(&job.source);
                }
                Err(e) => {
                    error!("Failed to remove '{}': {}", job.source.display(), e);
                    report.removal_failures.push((job.source.clone(), e));
                }
            }
        }
        reporter.on_remove_complete(report.removed);
    }
}
