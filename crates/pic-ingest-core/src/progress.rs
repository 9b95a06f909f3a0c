use std::path::Path;

/// Trait for reporting ingest progress.
///
/// The CLI implements it with indicatif progress bars; tests use [`SilentReporter`]
/// or a recording implementation. All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_discovery_start(&self, _root: &Path) {}
    fn on_discovery_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_plan_complete(&self, _jobs: usize, _groups: usize) {}
    fn on_copy_start(&self, _total_jobs: usize) {}
    fn on_copy_progress(&self, _done: usize, _total: usize, _source: &Path, _destination: &Path) {}
    fn on_copy_complete(&self, _copied: usize, _failed: usize, _duration_secs: f64) {}
    fn on_verify_start(&self, _total_jobs: usize) {}
    fn on_verify_progress(&self, _done: usize, _total: usize, _source: &Path, _matched: bool) {}
    fn on_verify_complete(&self, _matched: usize, _mismatched: usize, _duration_secs: f64) {}
    fn on_remove_start(&self, _candidates: usize, _enabled: bool) {}
    fn on_remove_file(&self, _path: &Path) {}
    fn on_remove_complete(&self, _removed: usize) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
