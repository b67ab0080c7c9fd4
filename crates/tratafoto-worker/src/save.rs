//! Save commands and their results.
//!
//! A [`SaveCommand`] is a one-shot request: dispatching it consumes it, so a
//! given set of rasters is persisted exactly once no matter how often the UI
//! re-renders. The returned [`SaveTicket`] resolves to a [`SaveReport`] with
//! one outcome per artifact.

use std::path::{Path, PathBuf};

use tokio::task::JoinHandle;
use tratafoto_core::{save_raster, CaptureVariant, PipelineConfig, Raster};

/// One raster to write, with its destination and quality.
#[derive(Debug, Clone)]
pub struct SaveArtifact {
    pub raster: Raster,
    pub path: PathBuf,
    pub quality: u8,
}

/// An ordered batch of rasters to persist.
#[derive(Debug, Default)]
pub struct SaveCommand {
    artifacts: Vec<SaveArtifact>,
}

impl SaveCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raster with an explicit quality.
    pub fn with_artifact(mut self, raster: Raster, path: impl Into<PathBuf>, quality: u8) -> Self {
        self.artifacts.push(SaveArtifact {
            raster,
            path: path.into(),
            quality,
        });
        self
    }

    /// Add a raster using the quality configured for `variant`.
    pub fn with_variant(
        self,
        variant: CaptureVariant,
        raster: Raster,
        path: impl Into<PathBuf>,
        config: &PipelineConfig,
    ) -> Self {
        let quality = config.profile(variant).quality;
        self.with_artifact(raster, path, quality)
    }

    pub fn artifacts(&self) -> &[SaveArtifact] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Write every artifact in order. A failure does not stop later writes.
    pub(crate) fn run(self, config: &PipelineConfig) -> SaveReport {
        let outcomes = self
            .artifacts
            .into_iter()
            .map(|artifact| ArtifactOutcome {
                saved: save_raster(&artifact.raster, &artifact.path, artifact.quality, config),
                path: artifact.path,
            })
            .collect();
        SaveReport { outcomes }
    }

    pub(crate) fn paths(&self) -> Vec<PathBuf> {
        self.artifacts.iter().map(|a| a.path.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub path: PathBuf,
    pub saved: bool,
}

/// Per-artifact results of a dispatched [`SaveCommand`], in command order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub outcomes: Vec<ArtifactOutcome>,
}

impl SaveReport {
    /// Every artifact marked failed, used when the task itself died.
    pub(crate) fn all_failed(paths: Vec<PathBuf>) -> Self {
        Self {
            outcomes: paths
                .into_iter()
                .map(|path| ArtifactOutcome { path, saved: false })
                .collect(),
        }
    }

    /// True when every artifact was written. Vacuously true for an empty command.
    pub fn all_saved(&self) -> bool {
        self.outcomes.iter().all(|o| o.saved)
    }

    pub fn any_saved(&self) -> bool {
        self.outcomes.iter().any(|o| o.saved)
    }

    pub fn saved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.saved).count()
    }

    pub fn failed_paths(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|o| !o.saved)
            .map(|o| o.path.as_path())
    }
}

/// Handle to an in-flight save.
///
/// Dropping the ticket does not cancel the save; the writes still complete.
#[derive(Debug)]
pub struct SaveTicket {
    handle: JoinHandle<SaveReport>,
    paths: Vec<PathBuf>,
}

impl SaveTicket {
    pub(crate) fn new(handle: JoinHandle<SaveReport>, paths: Vec<PathBuf>) -> Self {
        Self { handle, paths }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the save to finish.
    ///
    /// If the task panicked, every artifact is reported as not saved.
    pub async fn wait(self) -> SaveReport {
        match self.handle.await {
            Ok(report) => report,
            Err(e) => {
                log::error!("Save task failed: {}", e);
                SaveReport::all_failed(self.paths)
            }
        }
    }
}
