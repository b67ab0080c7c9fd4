//! JPEG encoding, the universally supported fallback codec.
//!
//! JPEG carries no alpha channel, so the raster's alpha is dropped before
//! encoding.

use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::types::validate_raster;
use super::{map_image_error, EncodeError, OutputCodec};
use crate::decode::Raster;

/// Encode a raster as JPEG into `writer`.
///
/// `quality` is clamped to 1-100. The app saves its two captures at 50 and
/// 100; text transport always uses 100.
pub fn write_jpeg<W: Write>(raster: &Raster, quality: u8, writer: W) -> Result<(), EncodeError> {
    validate_raster(raster)?;

    let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));

    encoder
        .write_image(
            &raster.to_rgb_bytes(),
            raster.width,
            raster.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| map_image_error(OutputCodec::Jpeg, e))
}

/// Encode a raster to JPEG bytes.
pub fn encode_jpeg(raster: &Raster, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();
    write_jpeg(raster, quality, &mut buffer)?;
    Ok(buffer)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_any_quality_yields_framed_output(
            width in 1u32..=48,
            height in 1u32..=48,
            quality in any::<u8>(),
        ) {
            let raster = Raster::new(width, height, vec![90u8; Raster::expected_len(width, height)]);
            let bytes = encode_jpeg(&raster, quality).unwrap();

            prop_assert!(bytes.starts_with(&[0xFF, 0xD8]));
            prop_assert!(bytes.ends_with(&[0xFF, 0xD9]));
        }

        #[test]
        fn prop_encoding_is_deterministic(
            width in 1u32..=16,
            height in 1u32..=16,
            quality in 1u8..=100,
        ) {
            let raster = Raster::new(width, height, vec![200u8; Raster::expected_len(width, height)]);
            prop_assert_eq!(encode_jpeg(&raster, quality).unwrap(), encode_jpeg(&raster, quality).unwrap());
        }

        #[test]
        fn prop_wrong_buffer_length_is_rejected(
            width in 2u32..=32,
            height in 2u32..=32,
            delta in prop_oneof![-8isize..=-1, 1isize..=8],
        ) {
            let len = Raster::expected_len(width, height) as isize + delta;
            let raster = Raster { width, height, pixels: vec![0u8; len as usize] };

            prop_assert!(matches!(encode_jpeg(&raster, 75), Err(EncodeError::InvalidInput(_))));
        }
    }
}
