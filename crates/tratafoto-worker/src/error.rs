//! Errors surfaced by worker tasks.

use std::time::Duration;

use thiserror::Error;
use tratafoto_core::{DecodeError, EncodeError, FailureBucket};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The blocking task panicked or was torn down with the runtime.
    #[error("Worker task failed: {0}")]
    TaskFailed(String),

    #[error("Timed out after {0:?}")]
    TimedOut(Duration),
}

impl WorkerError {
    /// Broad classification for the UI: input/IO problem or something else.
    pub fn bucket(&self) -> FailureBucket {
        match self {
            WorkerError::Decode(e) => e.bucket(),
            WorkerError::Encode(EncodeError::IoFailure(_)) => FailureBucket::InputOutput,
            WorkerError::Encode(EncodeError::Source(e)) => e.bucket(),
            WorkerError::Encode(_) | WorkerError::TaskFailed(_) | WorkerError::TimedOut(_) => {
                FailureBucket::Unexpected
            }
        }
    }
}
