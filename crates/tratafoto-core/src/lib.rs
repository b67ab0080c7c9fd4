//! Tratafoto Core - photo normalization pipeline
//!
//! This crate turns a freshly captured photo into something a phone screen can
//! hold and a disk can store: a bounded-size, correctly oriented RGBA raster,
//! and a lossy re-encoding of that raster at a chosen quality.
//!
//! # Pipeline
//!
//! 1. [`decode::probe_bounds`] reads the declared dimensions from the header
//! 2. [`decode::compute_sample_size`] picks an integer decimation factor
//! 3. The image is decoded at reduced scale and resampled to fit the [`DecodeBudget`]
//! 4. [`decode::read_orientation`] reads the EXIF orientation tag
//! 5. [`transform::apply_orientation`] rotates the raster upright
//! 6. [`encode::save_raster`] writes it back out as AVIF or JPEG
//!
//! All operations are synchronous. Callers that drive a UI should run them on
//! a worker thread (see the `tratafoto-worker` crate).

pub mod config;
pub mod decode;
pub mod encode;
pub mod transform;

pub use config::{CaptureVariant, PipelineConfig, VariantProfile};
pub use decode::{
    decode, decode_raw, decode_variant, decode_with_config, read_orientation, DecodeBudget,
    DecodeError, FailureBucket, ImageSource, Orientation, Raster,
};
pub use encode::{
    encode, encode_file_as_base64, save_raster, Destination, EncodeError, EncodeOptions,
    EncodedArtifact, OutputCodec,
};
pub use transform::apply_orientation;

#[cfg(test)]
pub(crate) mod test_support;
