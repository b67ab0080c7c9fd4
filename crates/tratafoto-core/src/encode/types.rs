//! Core types for image encoding.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::decode::{DecodeError, Raster};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero, or the pixel buffer does not match them.
    #[error("Invalid input raster: {0}")]
    InvalidInput(String),

    /// Writing, flushing or syncing the destination failed.
    #[error("I/O failure: {0}")]
    IoFailure(String),

    /// The codec rejected the data.
    #[error("{codec} encoding failed: {message}")]
    EncodingFailed { codec: OutputCodec, message: String },

    /// The codec is not compiled into this build.
    #[error("{0} encoding is not available in this build")]
    UnsupportedCodec(OutputCodec),

    /// The source file for a re-encode could not be decoded.
    #[error(transparent)]
    Source(#[from] DecodeError),
}

/// Lossy output codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputCodec {
    /// AVIF (AV1 intra frame), the modern codec.
    Avif,
    /// Baseline JPEG, supported everywhere.
    Jpeg,
}

impl std::fmt::Display for OutputCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputCodec::Avif => "AVIF",
            OutputCodec::Jpeg => "JPEG",
        })
    }
}

impl OutputCodec {
    /// Whether this build can produce the codec.
    pub fn is_available(self) -> bool {
        match self {
            OutputCodec::Avif => cfg!(feature = "avif"),
            OutputCodec::Jpeg => true,
        }
    }

    /// Pick the output codec for this build and configuration.
    ///
    /// The choice never depends on image content.
    pub fn select(config: &PipelineConfig) -> OutputCodec {
        if config.prefer_modern_codec && OutputCodec::Avif.is_available() {
            OutputCodec::Avif
        } else {
            OutputCodec::Jpeg
        }
    }
}

/// Encoder settings for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub codec: OutputCodec,
    /// Lossy quality, 0-100 (100 = best). Clamped to 1-100 by the codecs.
    pub quality: u8,
    /// rav1e speed preset, 1-10. Ignored by JPEG.
    pub avif_speed: u8,
}

impl EncodeOptions {
    pub fn new(codec: OutputCodec, quality: u8) -> Self {
        Self {
            codec,
            quality,
            avif_speed: crate::config::DEFAULT_AVIF_SPEED,
        }
    }

    /// Options using the configured codec preference and speed.
    pub fn from_config(config: &PipelineConfig, quality: u8) -> Self {
        Self {
            codec: OutputCodec::select(config),
            quality,
            avif_speed: config.avif_speed,
        }
    }
}

/// Where encoded bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Create or truncate this file.
    File(PathBuf),
    /// Return the bytes to the caller.
    Memory,
}

/// Result of a successful encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedArtifact {
    File {
        path: PathBuf,
        codec: OutputCodec,
        bytes_written: u64,
    },
    Memory {
        codec: OutputCodec,
        bytes: Vec<u8>,
    },
}

impl EncodedArtifact {
    pub fn codec(&self) -> OutputCodec {
        match self {
            EncodedArtifact::File { codec, .. } | EncodedArtifact::Memory { codec, .. } => *codec,
        }
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> u64 {
        match self {
            EncodedArtifact::File { bytes_written, .. } => *bytes_written,
            EncodedArtifact::Memory { bytes, .. } => bytes.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reject rasters the codecs cannot take.
pub(crate) fn validate_raster(raster: &Raster) -> Result<(), EncodeError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(EncodeError::InvalidInput(format!(
            "width ({}) and height ({}) must be non-zero",
            raster.width, raster.height
        )));
    }

    let expected = Raster::expected_len(raster.width, raster.height);
    if raster.pixels.len() != expected {
        return Err(EncodeError::InvalidInput(format!(
            "expected {} bytes (width * height * 4), got {}",
            expected,
            raster.pixels.len()
        )));
    }

    Ok(())
}
