mod commands;
mod logging;
mod progress;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, IngestArgs, PlanArgs, RootArgs};
use console::Term;
use dotenv::dotenv;
use pic_ingest_core::grouping::GroupKey;
use pic_ingest_core::{IngestConfig, IngestEngine, IngestReport, Job, JobError};
use progress::CliReporter;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let guard = logging::init_logger();

    let args = Cli::parse();

    let config = match pic_ingest_core::config::load_configuration(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            drop(guard);
            process::exit(1);
        }
    };

    let exit_code = match args.command {
        Some(Commands::Ingest(ingest_args)) => {
            let term = Term::stdout();
            let _ = term.hide_cursor();
            let result = run_ingest(config, &ingest_args);
            let _ = term.show_cursor();
            match result {
                Ok(true) => 0,
                Ok(false) => 2,
                Err(err) => {
                    error!("Error: {:#}", err);
                    1
                }
            }
        }
        Some(Commands::Plan(plan_args)) => match run_plan(config, &plan_args) {
            Ok(()) => 0,
            Err(err) => {
                error!("Error: {:#}", err);
                1
            }
        },
        Some(Commands::PrintConfig) => {
            let rendered =
                toml::to_string_pretty(&config).context("rendering configuration as TOML")?;
            println!("{}", rendered);
            0
        }
        None => {
            let _ = Cli::command().print_long_help();
            0
        }
    };

    // Flush the file log before a non-zero exit skips destructors.
    drop(guard);
    if exit_code != 0 {
        process::exit(exit_code);
    }
    Ok(())
}

fn apply_roots(config: &mut IngestConfig, roots: &RootArgs) {
    if let Some(source) = &roots.source {
        config.source_root = source.clone();
    }
    if let Some(archive) = &roots.archive {
        config.archive_root = archive.clone();
    }
}

/// Returns `Ok(false)` when the run finished but some jobs need attention.
fn run_ingest(mut config: IngestConfig, args: &IngestArgs) -> anyhow::Result<bool> {
    apply_roots(&mut config, &args.roots);
    if args.dry_run {
        config.copy_files = false;
    }
    if args.remove_verified {
        config.remove_verified = true;
    }

    if config.remove_verified && !args.yes {
        let prompt = format!(
            "Files under {} will be REMOVED once their copy in {} verifies. Continue?",
            config.source_root.display(),
            config.archive_root.display()
        );
        let stdin = io::stdin();
        if !prompt_confirm(&prompt, Some(false), &mut stdin.lock(), &mut io::stdout())? {
            info!("Aborted by user");
            return Ok(true);
        }
    }

    let engine = IngestEngine::new(config);
    let reporter = CliReporter::new();
    let report = engine.run(&reporter)?;

    print_summary(&report);
    Ok(report.is_clean())
}

fn print_summary(report: &IngestReport) {
    let reconcile = &report.reconcile;

    println!();
    info!(
        "Plan: {}, Copy: {}, Verify: {}",
        format!("{:.2}s", report.plan_duration.as_secs_f64()).green(),
        format!("{:.2}s", report.copy_duration.as_secs_f64()).green(),
        format!("{:.2}s", report.verify_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files in {} groups, {} matched, {} mismatched, {} failed",
        report.jobs,
        report.groups,
        format!("{}", reconcile.matched.len()).green(),
        format!("{}", reconcile.mismatched.len()).red(),
        format!("{}", reconcile.failed.len()).red(),
    );
    if reconcile.removal_enabled {
        info!("{} files removed from source", reconcile.removed);
    } else {
        info!(
            "Removal disabled: {} verified files left in source",
            reconcile.would_remove()
        );
    }

    if !report.copy_enabled {
        let line = format!(
            "Dry run: {} files would be copied, {} already archived",
            report.pending(),
            reconcile.matched.len()
        );
        println!("{}", line.yellow());
    }

    let attention = report.needs_attention();
    if attention == 0 {
        if report.copy_enabled {
            let line = "All files copied and compared successfully";
            println!("{}", line.green());
        }
    } else {
        let line = format!("{} jobs require manual attention", attention);
        println!("{}", line.red());
        for job in &reconcile.mismatched {
            println!(
                "{} {} -> {}",
                "Mismatch:".red(),
                job.source.display(),
                job.destination.display()
            );
        }
        for (job, err) in &reconcile.failed {
            if !report.copy_enabled && matches!(err, JobError::MissingAtVerify { .. }) {
                continue;
            }
            println!(
                "{} {} -> {} ({})",
                "Failed:".red(),
                job.source.display(),
                job.destination.display(),
                err
            );
        }
        println!("These files have not been removed from the source directory");
    }
    for (path, err) in &reconcile.removal_failures {
        println!("{} {} ({})", "Not removed:".yellow(), path.display(), err);
    }

    println!(
        "Total time taken: {:.2} seconds",
        report.total_duration.as_secs_f64()
    );
}

fn run_plan(mut config: IngestConfig, args: &PlanArgs) -> anyhow::Result<()> {
    apply_roots(&mut config, &args.roots);

    let engine = IngestEngine::new(config);
    let plan = engine.plan(&CliReporter::new())?;

    match &args.csv {
        Some(path) => {
            write_plan_csv(path, &plan.jobs)
                .with_context(|| format!("writing plan to {}", path.display()))?;
            info!("Wrote {} jobs to {}", plan.jobs.len(), path.display());
        }
        None => {
            for job in &plan.jobs {
                println!("{} -> {}", job.source.display(), job.destination.display());
            }
        }
    }
    Ok(())
}

fn write_plan_csv(path: &Path, jobs: &[Job]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["source", "destination", "group"])?;
    for job in jobs {
        wtr.write_record(&[
            job.source.to_string_lossy().into_owned(),
            job.destination.to_string_lossy().into_owned(),
            GroupKey::for_path(&job.source).label(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Ask a yes/no question. End of input counts as the default answer, or as
/// "no" when there is none.
fn prompt_confirm<R: BufRead, W: Write>(
    prompt: &str,
    default: Option<bool>,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    let hint = match default {
        Some(true) => "(Y/n)",
        Some(false) | None => "(y/N)",
    };
    let mut answer = String::new();

    loop {
        answer.clear();
        write!(output, "{} {}: ", prompt, hint)?;
        output.flush()?;

        if input.read_line(&mut answer)? == 0 {
            writeln!(output)?;
            return Ok(default.unwrap_or(false));
        }

        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            "" => {
                if let Some(default) = default {
                    return Ok(default);
                }
            }
            _ => {}
        }
    }
}
