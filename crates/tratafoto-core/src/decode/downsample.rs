//! Downsampling decoder.
//!
//! Decodes a source so that it fits a [`DecodeBudget`], then turns it upright
//! using its EXIF orientation. The sample size `s` comes from the header alone
//! (see [`compute_sample_size`]). JPEG sources are decoded directly at the
//! largest DCT scale not above `s`; the rest of the reduction to
//! `max(1, w / s) x max(1, h / s)` is an area-averaging resample. Other formats
//! have no reduced-scale decoder and are decoded whole under the configured
//! allocation limit.

use image::{imageops, DynamicImage, ImageError, ImageFormat, ImageReader, RgbaImage};

use super::bounds::{compute_sample_size, probe_bounds};
use super::jpeg::decode_scaled;
use super::orientation::read_orientation;
use super::{DecodeBudget, DecodeError, ImageSource, Raster};
use crate::config::{CaptureVariant, PipelineConfig};
use crate::transform::apply_orientation;

/// Decode a source to fit `budget`, applying EXIF orientation correction.
///
/// Uses the default [`PipelineConfig`] allocation limits.
///
/// # Errors
///
/// Returns `DecodeError::InvalidBudget` for a zero-sized budget,
/// `DecodeError::InvalidSource` if the source cannot be read and
/// `DecodeError::CorruptSource` if it holds no decodable image.
pub fn decode(source: &ImageSource, budget: DecodeBudget) -> Result<Raster, DecodeError> {
    decode_with_config(source, budget, &PipelineConfig::default())
}

/// Decode a source to fit `budget` under the limits in `config`.
pub fn decode_with_config(
    source: &ImageSource,
    budget: DecodeBudget,
    config: &PipelineConfig,
) -> Result<Raster, DecodeError> {
    budget.validate()?;

    let bounds = probe_bounds(source)?;
    let sample_size = compute_sample_size(&bounds, budget)?;
    log::debug!(
        "Decoding {} ({}x{}) for budget {}x{} with sample size {}",
        source,
        bounds.width,
        bounds.height,
        budget.width,
        budget.height,
        sample_size
    );

    let (width, height) = reduced_dimensions(bounds.width, bounds.height, sample_size);
    let image = decode_reduced(source, sample_size, config)?;
    let raster = Raster::from_rgba_image(resample_to(image, width, height));

    if raster.is_empty() {
        return Err(DecodeError::CorruptSource(format!("{} decoded to no pixels", source)));
    }

    let orientation = read_orientation(source);
    let oriented = apply_orientation(raster, orientation);

    log::info!(
        "Decoded {}: {}x{} -> {}x{} ({:?})",
        source,
        bounds.width,
        bounds.height,
        oriented.width,
        oriented.height,
        orientation
    );
    Ok(oriented)
}

/// Decode a source at full resolution without orientation correction.
///
/// Use this when the image should be kept exactly as the camera stored it.
pub fn decode_raw(source: &ImageSource, config: &PipelineConfig) -> Result<Raster, DecodeError> {
    let raster = Raster::from_rgba_image(decode_native(source, config)?.into_rgba8());
    if raster.is_empty() {
        return Err(DecodeError::CorruptSource(format!("{} decoded to no pixels", source)));
    }
    log::debug!("Raw decode of {}: {}x{}", source, raster.width, raster.height);
    Ok(raster)
}

/// Decode a source the way `variant` is configured to be decoded.
pub fn decode_variant(
    variant: CaptureVariant,
    source: &ImageSource,
    budget: DecodeBudget,
    config: &PipelineConfig,
) -> Result<Raster, DecodeError> {
    if config.profile(variant).normalize {
        decode_with_config(source, budget, config)
    } else {
        decode_raw(source, config)
    }
}

/// Output size for a `width x height` source at `sample_size`; never zero.
pub(crate) fn reduced_dimensions(width: u32, height: u32, sample_size: u32) -> (u32, u32) {
    let s = sample_size.max(1);
    ((width / s).max(1), (height / s).max(1))
}

/// Decode at the smallest size the format allows for `sample_size`.
fn decode_reduced(
    source: &ImageSource,
    sample_size: u32,
    config: &PipelineConfig,
) -> Result<RgbaImage, DecodeError> {
    if sample_size > 1 {
        let reader = ImageReader::new(source.open()?)
            .with_guessed_format()
            .map_err(|e| DecodeError::InvalidSource(e.to_string()))?;
        if reader.format() == Some(ImageFormat::Jpeg) {
            if let Some(image) = decode_scaled(reader.into_inner(), sample_size, config.max_decode_alloc)? {
                return Ok(image);
            }
        }
    }
    Ok(decode_native(source, config)?.into_rgba8())
}

/// Area-average `image` down to exactly `width x height`.
fn resample_to(image: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        image
    } else {
        imageops::thumbnail(&image, width, height)
    }
}

/// Run the image crate decoder with the configured allocation limits.
fn decode_native(source: &ImageSource, config: &PipelineConfig) -> Result<DynamicImage, DecodeError> {
    let mut reader = ImageReader::new(source.open()?)
        .with_guessed_format()
        .map_err(|e| DecodeError::InvalidSource(e.to_string()))?;
    reader.limits(config.decode_limits());

    reader.decode().map_err(map_image_error)
}

fn map_image_error(error: ImageError) -> DecodeError {
    match error {
        ImageError::Limits(e) => DecodeError::LimitExceeded(e.to_string()),
        ImageError::IoError(e) => DecodeError::InvalidSource(e.to_string()),
        other => DecodeError::CorruptSource(other.to_string()),
    }
}
