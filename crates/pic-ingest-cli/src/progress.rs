use indicatif::{ProgressBar, ProgressStyle};
use pic_ingest_core::ProgressReporter;
use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Discovery: spinner (file count unknown upfront)
/// - Copy and verify: progress bar with running ETA
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            f(pb);
        }
    }

    fn spinner(message: String) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(TICK_CHARS),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn job_bar(verb: &str, total: usize) -> ProgressBar {
        let pb = ProgressBar::new(total as u64);
        let template = format!(
            "  {{spinner:.cyan}} {} [{{bar:30.cyan/dim}}] {{pos}}/{{len}} files (est. {{eta}} remaining) {{wide_msg:.dim}}",
            verb
        );
        pb.set_style(
            ProgressStyle::with_template(&template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━╸─")
                .tick_chars(TICK_CHARS),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

impl ProgressReporter for CliReporter {
    fn on_discovery_start(&self, root: &Path) {
        self.set_bar(Self::spinner(format!("Scanning {}...", root.display())));
    }

    fn on_discovery_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Discovery complete: {} files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_plan_complete(&self, jobs: usize, groups: usize) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Planned {} jobs across {} capture groups",
            jobs, groups
        );
    }

    fn on_copy_start(&self, total_jobs: usize) {
        self.set_bar(Self::job_bar("Copying", total_jobs));
    }

    fn on_copy_progress(&self, done: usize, _total: usize, source: &Path, _destination: &Path) {
        self.with_bar(|pb| {
            pb.set_position(done as u64);
            pb.set_message(source.display().to_string());
        });
    }

    fn on_copy_complete(&self, copied: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        if failed == 0 {
            eprintln!(
                "  \x1b[32m✓\x1b[0m Copy complete: {} files in {:.2}s",
                copied, duration_secs
            );
        } else {
            eprintln!(
                "  \x1b[31m✗\x1b[0m Copy complete: {} files, {} failed in {:.2}s",
                copied, failed, duration_secs
            );
        }
    }

    fn on_verify_start(&self, total_jobs: usize) {
        self.set_bar(Self::job_bar("Comparing", total_jobs));
    }

    fn on_verify_progress(&self, done: usize, _total: usize, source: &Path, matched: bool) {
        self.with_bar(|pb| {
            pb.set_position(done as u64);
            if !matched {
                pb.println(format!("  \x1b[31mERROR MISMATCH\x1b[0m {}", source.display()));
            }
        });
    }

    fn on_verify_complete(&self, matched: usize, mismatched: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Verification complete: {} OK, {} not verified in {:.2}s",
            matched, mismatched, duration_secs
        );
    }

    fn on_remove_start(&self, candidates: usize, enabled: bool) {
        if enabled {
            self.set_bar(Self::spinner(format!(
                "Removing {} files from source directory",
                candidates
            )));
        }
    }

    fn on_remove_file(&self, path: &Path) {
        self.with_bar(|pb| pb.set_message(format!("Removing {}", path.display())));
    }

    fn on_remove_complete(&self, _removed: usize) {
        self.finish_bar();
    }
}
