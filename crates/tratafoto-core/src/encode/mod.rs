//! Image encoding for Tratafoto.
//!
//! Provides:
//! - Runtime codec selection: AVIF when compiled in and preferred, else JPEG
//! - Quality-controlled encoding to a file or to memory
//! - [`save_raster`], the boolean-returning boundary used by the UI
//! - Base64 text transport of an original file
//!
//! File destinations are written through a buffered writer that is flushed
//! and synced before success is reported. A failed write removes the partial
//! file.

#[cfg(feature = "avif")]
mod avif;
mod jpeg;
mod transport;
mod types;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use image::ImageError;

pub use jpeg::{encode_jpeg, write_jpeg};
pub use transport::{encode_file_as_base64, to_transport_text, TRANSPORT_QUALITY};
pub use types::{Destination, EncodeError, EncodeOptions, EncodedArtifact, OutputCodec};

use crate::config::PipelineConfig;
use crate::decode::Raster;
use types::validate_raster;

/// Encode a raster to `destination`.
///
/// # Errors
///
/// Returns `EncodeError::InvalidInput` for an empty or inconsistent raster
/// (checked before the destination is touched), `EncodeError::IoFailure` for
/// any write, flush or sync error, and `EncodeError::EncodingFailed` when the
/// codec rejects the data.
pub fn encode(
    raster: &Raster,
    destination: &Destination,
    options: EncodeOptions,
) -> Result<EncodedArtifact, EncodeError> {
    validate_raster(raster)?;

    match destination {
        Destination::Memory => Ok(EncodedArtifact::Memory {
            codec: options.codec,
            bytes: encode_to_vec(raster, options)?,
        }),
        Destination::File(path) => {
            let bytes_written = write_file(raster, path, options)?;
            Ok(EncodedArtifact::File {
                path: path.clone(),
                codec: options.codec,
                bytes_written,
            })
        }
    }
}

/// Encode a raster to an in-memory buffer.
pub fn encode_to_vec(raster: &Raster, options: EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();
    encode_into(raster, options, &mut buffer)?;
    Ok(buffer)
}

/// Save a raster to `path` with the configured codec.
///
/// Returns whether the file was written. Failures are logged, never
/// propagated, so a failed save cannot take the host down.
pub fn save_raster(raster: &Raster, path: &Path, quality: u8, config: &PipelineConfig) -> bool {
    let options = EncodeOptions::from_config(config, quality);
    match encode(raster, &Destination::File(path.to_path_buf()), options) {
        Ok(artifact) => {
            log::info!(
                "Saved {}x{} {} to {} ({} bytes, quality {})",
                raster.width,
                raster.height,
                artifact.codec(),
                path.display(),
                artifact.len(),
                quality
            );
            true
        }
        Err(e) => {
            log::error!("Failed to save image to {}: {}", path.display(), e);
            false
        }
    }
}

/// Write to `path`. Once the file has been created, any later failure
/// removes it so no truncated image is left behind.
fn write_file(raster: &Raster, path: &Path, options: EncodeOptions) -> Result<u64, EncodeError> {
    let file = File::create(path).map_err(|e| io_failure(path, e))?;

    fill_file(raster, file, path, options).inspect_err(|_| {
        let _ = fs::remove_file(path);
    })
}

fn fill_file(raster: &Raster, file: File, path: &Path, options: EncodeOptions) -> Result<u64, EncodeError> {
    let fail = |e: std::io::Error| io_failure(path, e);

    let mut writer = BufWriter::new(file);
    encode_into(raster, options, &mut writer)?;

    let file = writer
        .into_inner()
        .map_err(|e| EncodeError::IoFailure(format!("{}: {}", path.display(), e.error())))?;
    file.sync_all().map_err(fail)?;

    Ok(file.metadata().map_err(fail)?.len())
}

fn io_failure(path: &Path, error: std::io::Error) -> EncodeError {
    EncodeError::IoFailure(format!("{}: {}", path.display(), error))
}

fn encode_into<W: Write>(raster: &Raster, options: EncodeOptions, writer: W) -> Result<(), EncodeError> {
    match options.codec {
        OutputCodec::Jpeg => write_jpeg(raster, options.quality, writer),
        #[cfg(feature = "avif")]
        OutputCodec::Avif => avif::write_avif(raster, options.quality, options.avif_speed, writer),
        #[cfg(not(feature = "avif"))]
        OutputCodec::Avif => {
            drop(writer);
            Err(EncodeError::UnsupportedCodec(OutputCodec::Avif))
        }
    }
}

pub(crate) fn map_image_error(codec: OutputCodec, error: ImageError) -> EncodeError {
    match error {
        ImageError::IoError(e) => EncodeError::IoFailure(e.to_string()),
        other => EncodeError::EncodingFailed {
            codec,
            message: other.to_string(),
        },
    }
}
