use crate::config::IngestConfig;
use crate::error::{Error, JobError};
use crate::grouping;
use crate::hasher::Verifier;
use crate::mover::Mover;
use crate::plan::{self, Plan};
use crate::platform::{Filesystem, LocalFs};
use crate::progress::ProgressReporter;
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::scanner;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct IngestEngine<F: Filesystem = LocalFs> {
    config: IngestConfig,
    fs: F,
}

#[derive(Debug)]
pub struct IngestReport {
    pub plan_duration: Duration,
    pub copy_duration: Duration,
    pub verify_duration: Duration,
    pub total_duration: Duration,
    pub total_files_discovered: usize,
    pub groups: usize,
    pub jobs: usize,
    pub copy_enabled: bool,
    pub bytes_copied: u64,
    pub reconcile: ReconcileReport,
}

impl IngestReport {
    /// Jobs whose source was kept for a reason worth looking at. In a dry run
    /// a destination that was never written is expected and does not count.
    pub fn needs_attention(&self) -> usize {
        self.reconcile.mismatched.len()
            + self
                .reconcile
                .failed
                .iter()
                .filter(|(_, err)| self.copy_enabled || !is_not_yet_archived(err))
                .count()
    }

    /// Dry-run jobs whose destination does not exist yet.
    pub fn pending(&self) -> usize {
        if self.copy_enabled {
            return 0;
        }
        self.reconcile
            .failed
            .iter()
            .filter(|(_, err)| is_not_yet_archived(err))
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.needs_attention() == 0 && self.reconcile.removal_failures.is_empty()
    }
}

fn is_not_yet_archived(err: &JobError) -> bool {
    matches!(err, JobError::MissingAtVerify { .. })
}

impl IngestEngine<LocalFs> {
    pub fn new(config: IngestConfig) -> Self {
        Self::with_filesystem(config, LocalFs)
    }
}

impl<F: Filesystem> IngestEngine<F> {
    pub fn with_filesystem(config: IngestConfig, fs: F) -> Self {
        Self { config, fs }
    }

    /// Discovery, timestamp resolution and job compilation. Touches nothing
    /// on disk.
    pub fn plan(&self, reporter: &dyn ProgressReporter) -> Result<Plan, Error> {
        self.config.validate()?;

        info!(
            "Loading new file list for {}",
            self.config.source_root.display()
        );
        reporter.on_discovery_start(&self.config.source_root);
        let scan_start = Instant::now();
        let files =
            scanner::discover_files(&self.config.source_root, &self.config.ignore_patterns)?;
        let scan_duration = scan_start.elapsed();
        info!("Loaded {} files", files.len());
        reporter.on_discovery_complete(files.len(), scan_duration.as_secs_f64());

        let timestamps =
            grouping::resolve_timestamps(&self.fs, &files, self.config.timestamp_policy)?;
        if timestamps.is_empty() {
            warn!(
                "Nothing to ingest under {}",
                self.config.source_root.display()
            );
        }
        let jobs = plan::compile_jobs(&self.config.archive_root, &files, &timestamps)?;
        reporter.on_plan_complete(jobs.len(), timestamps.len());

        Ok(Plan {
            jobs,
            groups: timestamps.len(),
        })
    }

    /// Run the full ingest:
    /// 1. Plan (discover, group, timestamp, compile jobs)
    /// 2. Copy every job into the archive
    /// 3. Verify each copy, then remove verified sources if enabled
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<IngestReport, Error> {
        let run_start = Instant::now();

        let plan = self.plan(reporter)?;
        let plan_duration = run_start.elapsed();
        debug!(
            "Planned {} jobs in {} groups in {:.2}s",
            plan.jobs.len(),
            plan.groups,
            plan_duration.as_secs_f64()
        );

        let copy_start = Instant::now();
        let mover = Mover::new(&self.fs, self.config.copy_files);
        let copies = mover.copy_all(&plan.jobs, self.config.stop_on_copy_error, reporter)?;
        let bytes_copied = copies.bytes();
        let copy_duration = copy_start.elapsed();

        let verify_start = Instant::now();
        let verifier = Verifier::new(&self.fs, self.config.checksum, self.config.block_size);
        let reconciler = Reconciler::new(&self.fs, verifier, self.config.remove_verified);
        let reconcile = reconciler.reconcile(&plan.jobs, copies, reporter);
        let verify_duration = verify_start.elapsed();

        let total_duration = run_start.elapsed();
        info!(
            "Run finished in {:.2}s: {} matched, {} need attention, {} removed",
            total_duration.as_secs_f64(),
            reconcile.matched.len(),
            reconcile.needs_attention(),
            reconcile.removed
        );

        Ok(IngestReport {
            plan_duration,
            copy_duration,
            verify_duration,
            total_duration,
            total_files_discovered: plan.jobs.len(),
            groups: plan.groups,
            jobs: plan.jobs.len(),
            copy_enabled: self.config.copy_files,
            bytes_copied,
            reconcile,
        })
    }
}
