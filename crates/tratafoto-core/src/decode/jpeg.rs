//! Reduced-scale JPEG decoding.
//!
//! A JPEG can be decoded at 1/2, 1/4 or 1/8 of its size straight from the DCT
//! coefficients. The decoder picks the largest such divisor not above the
//! sample size, so the full-resolution frame is never built; the remaining
//! factor is finished by the caller with a resample.

use std::io::Read;

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use jpeg_decoder::{Decoder, PixelFormat};

use super::{DecodeError, Raster};

/// Largest DCT scale divisor (1, 2, 4 or 8) that does not exceed `sample_size`.
pub(crate) fn dct_divisor(sample_size: u32) -> u16 {
    match sample_size {
        0..=1 => 1,
        2..=3 => 2,
        4..=7 => 4,
        _ => 8,
    }
}

/// Decode a JPEG stream at the largest DCT scale allowed by `sample_size`.
///
/// Returns `Ok(None)` for pixel formats this path does not handle (CMYK,
/// 16-bit luma); the caller falls back to the generic decoder.
///
/// # Errors
///
/// Returns `DecodeError::LimitExceeded` when even the reduced frame would
/// exceed `max_alloc` bytes as RGBA.
pub(crate) fn decode_scaled<R: Read>(
    reader: R,
    sample_size: u32,
    max_alloc: u64,
) -> Result<Option<RgbaImage>, DecodeError> {
    let mut decoder = Decoder::new(reader);
    decoder.read_info().map_err(map_jpeg_error)?;
    let info = decoder
        .info()
        .ok_or_else(|| DecodeError::CorruptSource("JPEG frame header missing".to_string()))?;

    if !matches!(info.pixel_format, PixelFormat::RGB24 | PixelFormat::L8) {
        log::debug!("No scaled path for {:?} JPEG", info.pixel_format);
        return Ok(None);
    }

    let divisor = dct_divisor(sample_size);
    let (width, height) = decoder
        .scale(info.width.div_ceil(divisor), info.height.div_ceil(divisor))
        .map_err(map_jpeg_error)?;
    let (width, height) = (u32::from(width), u32::from(height));

    let needed = Raster::expected_len(width, height) as u64;
    if needed > max_alloc {
        return Err(DecodeError::LimitExceeded(format!(
            "{}x{} frame needs {} bytes, limit is {}",
            width, height, needed, max_alloc
        )));
    }

    log::debug!(
        "JPEG {}x{} decoded at 1/{} scale as {}x{}",
        info.width,
        info.height,
        divisor,
        width,
        height
    );
    let pixels = decoder.decode().map_err(map_jpeg_error)?;

    let image = match info.pixel_format {
        PixelFormat::RGB24 => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
        PixelFormat::L8 => GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
        _ => None,
    };

    image
        .map(|img| Some(img.into_rgba8()))
        .ok_or_else(|| DecodeError::CorruptSource("JPEG scan shorter than its frame".to_string()))
}

fn map_jpeg_error(error: jpeg_decoder::Error) -> DecodeError {
    match error {
        jpeg_decoder::Error::Io(e) => DecodeError::InvalidSource(e.to_string()),
        other => DecodeError::CorruptSource(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{approx_rgb, encode_test_jpeg, gradient_raster, split_raster};
    use std::io::Cursor;

    #[test]
    fn test_dct_divisor_never_exceeds_sample_size() {
        assert_eq!(dct_divisor(1), 1);
        assert_eq!(dct_divisor(2), 2);
        assert_eq!(dct_divisor(3), 2);
        assert_eq!(dct_divisor(4), 4);
        assert_eq!(dct_divisor(7), 4);
        assert_eq!(dct_divisor(8), 8);
        assert_eq!(dct_divisor(31), 8);
    }

    #[test]
    fn test_half_scale_frame() {
        let jpeg = encode_test_jpeg(&gradient_raster(400, 300));
        let image = decode_scaled(Cursor::new(jpeg), 3, u64::MAX).unwrap().unwrap();

        assert_eq!(image.dimensions(), (200, 150));
    }

    #[test]
    fn test_eighth_scale_rounds_up() {
        let jpeg = encode_test_jpeg(&gradient_raster(100, 50));
        let image = decode_scaled(Cursor::new(jpeg), 12, u64::MAX).unwrap().unwrap();

        assert_eq!(image.dimensions(), (13, 7));
    }

    #[test]
    fn test_scaled_colors_survive() {
        let jpeg = encode_test_jpeg(&split_raster(256, 128));
        let image = decode_scaled(Cursor::new(jpeg), 4, u64::MAX).unwrap().unwrap();
        let raster = Raster::from_rgba_image(image);

        assert_eq!((raster.width, raster.height), (64, 32));
        assert!(approx_rgb(raster.pixel(8, 16).unwrap(), [255, 0, 0], 40));
        assert!(approx_rgb(raster.pixel(56, 16).unwrap(), [0, 0, 255], 40));
    }

    #[test]
    fn test_limit_applies_to_reduced_frame() {
        let jpeg = encode_test_jpeg(&gradient_raster(400, 300));

        // 200x150 RGBA is 120,000 bytes
        assert!(decode_scaled(Cursor::new(jpeg.clone()), 2, 120_000).unwrap().is_some());
        assert!(matches!(
            decode_scaled(Cursor::new(jpeg), 2, 119_999),
            Err(DecodeError::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_not_a_jpeg() {
        let result = decode_scaled(Cursor::new(vec![0u8, 1, 2, 3]), 2, u64::MAX);
        assert!(matches!(result, Err(DecodeError::CorruptSource(_))));
    }
}
