//! Base64 text transport of a photo.
//!
//! The transport always re-decodes the original file from disk (no downsampling,
//! no orientation correction) and re-encodes it as JPEG at quality 100,
//! whatever quality the caller uses elsewhere.

use std::path::Path;

use base64::{engine::general_purpose, Engine as _};

use super::jpeg::encode_jpeg;
use super::EncodeError;
use crate::config::PipelineConfig;
use crate::decode::{decode_raw, ImageSource};

/// JPEG quality used for text transport.
pub const TRANSPORT_QUALITY: u8 = 100;

/// Re-encode the image at `path` as JPEG and return it as single-line base64.
///
/// # Errors
///
/// Returns `EncodeError::Source` if the file cannot be read or decoded.
pub fn encode_file_as_base64(path: impl AsRef<Path>) -> Result<String, EncodeError> {
    let source = ImageSource::from_path(path.as_ref());
    let raster = decode_raw(&source, &PipelineConfig::default())?;
    let jpeg = encode_jpeg(&raster, TRANSPORT_QUALITY)?;

    log::debug!(
        "Base64 transport of {}: {} JPEG bytes",
        source,
        jpeg.len()
    );
    Ok(to_transport_text(&jpeg))
}

/// Standard-alphabet base64 with every line break removed.
pub fn to_transport_text(bytes: &[u8]) -> String {
    let mut text = general_purpose::STANDARD.encode(bytes);
    text.retain(|c| c != '\n' && c != '\r');
    text
}
