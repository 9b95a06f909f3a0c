use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pic-ingest")]
#[command(about = "Copy photos off a card into a dated archive, verify, and clean up", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./Config.* if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Copy, verify and (optionally) remove sources
    Ingest(IngestArgs),
    /// Print the planned source -> destination jobs without touching anything
    Plan(PlanArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct RootArgs {
    /// Source directory to ingest from
    #[arg(long)]
    pub source: Option<PathBuf>,
    /// Archive root to copy into
    #[arg(long)]
    pub archive: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    #[command(flatten)]
    pub roots: RootArgs,
    /// Walk the jobs without copying anything
    #[arg(long)]
    pub dry_run: bool,
    /// Remove source files whose copy verified
    #[arg(long)]
    pub remove_verified: bool,
    /// Do not ask for confirmation before removing sources
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub roots: RootArgs,
    /// Write the plan as CSV instead of printing it
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
