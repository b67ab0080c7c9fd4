//! Fixtures shared by the unit tests: synthetic rasters, JPEG bytes and
//! hand-built EXIF segments.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::decode::Raster;

/// Opaque RGBA gradient.
pub fn gradient_raster(width: u32, height: u32) -> Raster {
    let mut pixels = Vec::with_capacity(Raster::expected_len(width, height));
    for y in 0..height {
        for x in 0..width {
            pixels.push(((x * 255) / width.max(1)) as u8);
            pixels.push(((y * 255) / height.max(1)) as u8);
            pixels.push(128);
            pixels.push(255);
        }
    }
    Raster::new(width, height, pixels)
}

/// Left half red, right half blue.
pub fn split_raster(width: u32, height: u32) -> Raster {
    let mut pixels = Vec::with_capacity(Raster::expected_len(width, height));
    for _ in 0..height {
        for x in 0..width {
            if x < width / 2 {
                pixels.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                pixels.extend_from_slice(&[0, 0, 255, 255]);
            }
        }
    }
    Raster::new(width, height, pixels)
}

/// Encode a raster as a baseline JPEG without going through the crate's encoder.
pub fn encode_test_jpeg(raster: &Raster) -> Vec<u8> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 95)
        .write_image(
            &raster.to_rgb_bytes(),
            raster.width,
            raster.height,
            ExtendedColorType::Rgb8,
        )
        .unwrap();
    out
}

/// APP1 segment holding a little-endian TIFF block with a single
/// Orientation (0x0112) entry.
pub fn exif_app1_segment(orientation: u16) -> Vec<u8> {
    let mut tiff = vec![b'I', b'I', 0x2A, 0x00];
    tiff.extend_from_slice(&8u32.to_le_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_le_bytes()); // entry count
    tiff.extend_from_slice(&0x0112u16.to_le_bytes()); // Orientation
    tiff.extend_from_slice(&3u16.to_le_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_le_bytes()); // count
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]); // value padding
    tiff.extend_from_slice(&0u32.to_le_bytes()); // no next IFD

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&payload);
    segment
}

/// Splice an EXIF orientation segment in right after the SOI marker.
pub fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&exif_app1_segment(orientation));
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// True if `px` is within `tolerance` of `expected` on the RGB channels.
pub fn approx_rgb(px: [u8; 4], expected: [u8; 3], tolerance: u8) -> bool {
    px.iter()
        .zip(expected.iter())
        .all(|(a, b)| a.abs_diff(*b) <= tolerance)
}
