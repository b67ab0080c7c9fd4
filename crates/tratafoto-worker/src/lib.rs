//! Tratafoto Worker - async task layer for the photo pipeline
//!
//! The core pipeline is synchronous and CPU/I-O bound. This crate is what a UI
//! layer talks to: every decode and encode call is shipped to tokio's blocking
//! pool and handed back as a future, so the thread driving the interface never
//! waits on a codec.
//!
//! # Module Structure
//!
//! - `config` - Worker configuration (pipeline settings plus timeouts)
//! - `error` - Errors surfaced by worker tasks
//! - `save` - Save commands, tickets and per-artifact reports
//! - `worker` - The [`PipelineWorker`] task dispatcher
//!
//! # Usage
//!
//! ```ignore
//! use tratafoto_worker::{PipelineWorker, SaveCommand, WorkerConfig};
//! use tratafoto_core::{CaptureVariant, DecodeBudget, ImageSource};
//!
//! let worker = PipelineWorker::new(WorkerConfig::default());
//! let budget = DecodeBudget::new(1080, 2340);
//!
//! let with = worker
//!     .decode_variant(CaptureVariant::WithEntrapment, ImageSource::from_path(&a), budget)
//!     .await?;
//! let without = worker
//!     .decode_variant(CaptureVariant::NoEntrapment, ImageSource::from_path(&b), budget)
//!     .await?;
//!
//! let command = SaveCommand::new()
//!     .with_variant(CaptureVariant::WithEntrapment, with, a, worker.pipeline())
//!     .with_variant(CaptureVariant::NoEntrapment, without, b, worker.pipeline());
//! let report = worker.dispatch_save(command).wait().await;
//! ```

mod config;
mod error;
mod logging;
mod save;
mod worker;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use logging::init_logging;
pub use save::{ArtifactOutcome, SaveArtifact, SaveCommand, SaveReport, SaveTicket};
pub use worker::PipelineWorker;

/// Get the version of the worker crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
