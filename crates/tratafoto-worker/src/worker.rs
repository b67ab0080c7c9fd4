//! Dispatch of pipeline calls onto tokio's blocking pool.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tratafoto_core::encode::encode_file_as_base64;
use tratafoto_core::{
    decode_variant, decode_with_config, encode, CaptureVariant, DecodeBudget, Destination,
    EncodeOptions, EncodedArtifact, ImageSource, PipelineConfig, Raster,
};

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::save::{SaveCommand, SaveTicket};

/// Runs decode, encode and save work off the calling thread.
///
/// Cloning is cheap; clones share the same configuration.
#[derive(Debug, Clone)]
pub struct PipelineWorker {
    config: Arc<WorkerConfig>,
    runtime: Option<Handle>,
}

impl PipelineWorker {
    /// Worker that spawns onto the runtime current at each call.
    ///
    /// Every method must then be called from inside a tokio runtime.
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config: Arc::new(config),
            runtime: None,
        }
    }

    /// Worker bound to an explicit runtime, for hosts calling from plain threads.
    pub fn with_runtime(config: WorkerConfig, runtime: Handle) -> Self {
        Self {
            config: Arc::new(config),
            runtime: Some(runtime),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &PipelineConfig {
        &self.config.pipeline
    }

    /// Decode `source` downsampled to `budget` and oriented upright.
    pub async fn decode(&self, source: ImageSource, budget: DecodeBudget) -> Result<Raster, WorkerError> {
        let config = Arc::clone(&self.config);
        let timeout = self.config.decode_timeout();
        self.run_blocking(timeout, move || {
            decode_with_config(&source, budget, &config.pipeline).map_err(WorkerError::from)
        })
        .await
    }

    /// Decode `source` the way `variant` is configured.
    pub async fn decode_variant(
        &self,
        variant: CaptureVariant,
        source: ImageSource,
        budget: DecodeBudget,
    ) -> Result<Raster, WorkerError> {
        let config = Arc::clone(&self.config);
        let timeout = self.config.decode_timeout();
        self.run_blocking(timeout, move || {
            log::debug!("Decoding {} capture from {}", variant.as_str(), source);
            decode_variant(variant, &source, budget, &config.pipeline).map_err(WorkerError::from)
        })
        .await
    }

    /// Encode `raster` with the configured codec.
    pub async fn encode(
        &self,
        raster: Raster,
        destination: Destination,
        quality: u8,
    ) -> Result<EncodedArtifact, WorkerError> {
        let options = EncodeOptions::from_config(&self.config.pipeline, quality);
        self.run_blocking(None, move || {
            encode(&raster, &destination, options).map_err(WorkerError::from)
        })
        .await
    }

    /// Base64 text of the file at `path`, re-encoded as JPEG.
    pub async fn encode_base64(&self, path: impl Into<PathBuf>) -> Result<String, WorkerError> {
        let path = path.into();
        self.run_blocking(None, move || encode_file_as_base64(&path).map_err(WorkerError::from))
            .await
    }

    /// Start persisting every artifact in `command`.
    ///
    /// Returns immediately. The command is consumed, so the same batch cannot
    /// be dispatched twice.
    pub fn dispatch_save(&self, command: SaveCommand) -> SaveTicket {
        let paths = command.paths();
        let config = Arc::clone(&self.config);
        log::debug!("Dispatching save of {} artifact(s)", command.len());

        let handle = self.spawn(move || command.run(&config.pipeline));
        SaveTicket::new(handle, paths)
    }

    fn spawn<F, T>(&self, task: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        match &self.runtime {
            Some(runtime) => runtime.spawn_blocking(task),
            None => tokio::task::spawn_blocking(task),
        }
    }

    /// Run `task` on the blocking pool and wait for it, optionally bounded.
    ///
    /// On timeout the task keeps running to completion; its result is dropped.
    pub(crate) async fn run_blocking<F, T>(
        &self,
        timeout: Option<Duration>,
        task: F,
    ) -> Result<T, WorkerError>
    where
        F: FnOnce() -> Result<T, WorkerError> + Send + 'static,
        T: Send + 'static,
    {
        let handle = self.spawn(task);

        let joined = match timeout {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    log::warn!("Pipeline task exceeded {:?}", limit);
                    return Err(WorkerError::TimedOut(limit));
                }
            },
            None => handle.await,
        };

        joined.map_err(|e| {
            log::error!("Pipeline task failed: {}", e);
            WorkerError::TaskFailed(e.to_string())
        })?
    }
}
