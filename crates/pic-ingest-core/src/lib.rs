pub mod config;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod hasher;
pub mod mover;
pub mod plan;
pub mod platform;
pub mod progress;
pub mod reconcile;
pub mod scanner;

pub use config::IngestConfig;
pub use engine::{IngestEngine, IngestReport};
pub use error::{Error, JobError};
pub use plan::{Job, Plan};
pub use progress::{ProgressReporter, SilentReporter};
pub use reconcile::{JobOutcome, ReconcileReport};
