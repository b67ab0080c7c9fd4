//! Header-only bounds probe and decimation factor selection.
//!
//! The factor is chosen from declared dimensions alone, before any pixel
//! buffer exists:
//!
//! ```text
//! s = min(round(H / budget.h), round(W / budget.w))        (at least 1)
//! while (W * H) / s² > budget.w * budget.h * 2:  s += 1
//! ```
//!
//! The ratio estimate alone undershoots for sources whose aspect ratio differs
//! from the budget's, so the loop caps the decoded area at twice the budget.

use image::ImageReader;

use super::{BoundsProbe, DecodeBudget, DecodeError, ImageSource};

/// Read declared width and height without decoding pixel data.
///
/// # Errors
///
/// Returns `DecodeError::InvalidSource` if the source cannot be opened, and
/// `DecodeError::CorruptSource` if no known image header is present.
pub fn probe_bounds(source: &ImageSource) -> Result<BoundsProbe, DecodeError> {
    let reader = ImageReader::new(source.open()?)
        .with_guessed_format()
        .map_err(|e| DecodeError::InvalidSource(e.to_string()))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptSource(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(DecodeError::CorruptSource(format!(
            "header declares {}x{}",
            width, height
        )));
    }

    Ok(BoundsProbe { width, height })
}

/// Compute the integer decimation factor for a probed source.
///
/// # Errors
///
/// Returns `DecodeError::InvalidBudget` if either budget dimension is zero.
pub fn compute_sample_size(probe: &BoundsProbe, budget: DecodeBudget) -> Result<u32, DecodeError> {
    budget.validate()?;

    if probe.fits_within(&budget) {
        return Ok(1);
    }

    let height_ratio = (probe.height as f64 / budget.height as f64).round() as u64;
    let width_ratio = (probe.width as f64 / budget.width as f64).round() as u64;

    // A thin source can round one ratio down to zero
    let mut sample_size = height_ratio.min(width_ratio).max(1);

    let total_pixels = probe.pixel_count();
    let pixel_cap = budget.pixel_cap();
    while total_pixels / (sample_size * sample_size) > pixel_cap {
        sample_size += 1;
    }

    Ok(sample_size.min(u32::MAX as u64) as u32)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
