//! AVIF encoding, the preferred modern codec.
//!
//! Uses the `image` crate's rav1e-backed encoder. Alpha is kept.

use std::io::Write;

use image::codecs::avif::AvifEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::types::validate_raster;
use super::{map_image_error, EncodeError, OutputCodec};
use crate::decode::Raster;

/// Encode a raster as AVIF into `writer`.
///
/// `quality` is clamped to 1-100 and `speed` to 1-10.
pub fn write_avif<W: Write>(
    raster: &Raster,
    quality: u8,
    speed: u8,
    writer: W,
) -> Result<(), EncodeError> {
    validate_raster(raster)?;

    let encoder =
        AvifEncoder::new_with_speed_quality(writer, speed.clamp(1, 10), quality.clamp(1, 100))
            .with_num_threads(Some(1));

    encoder
        .write_image(
            &raster.pixels,
            raster.width,
            raster.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| map_image_error(OutputCodec::Avif, e))
}
