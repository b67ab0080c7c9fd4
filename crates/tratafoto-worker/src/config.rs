//! Worker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tratafoto_core::PipelineConfig;

/// Settings for a [`PipelineWorker`](crate::PipelineWorker).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Settings passed through to every pipeline call.
    pub pipeline: PipelineConfig,
    /// Give up waiting on a decode after this many milliseconds.
    ///
    /// The blocking task itself runs to completion; only the caller stops
    /// waiting. `None` waits indefinitely.
    pub decode_timeout_ms: Option<u64>,
}

impl WorkerConfig {
    pub fn decode_timeout(&self) -> Option<Duration> {
        self.decode_timeout_ms.map(Duration::from_millis)
    }
}
