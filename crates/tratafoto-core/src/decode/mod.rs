//! Image decoding pipeline for Tratafoto.
//!
//! This module provides functionality for:
//! - Probing declared dimensions without decoding pixels
//! - Choosing an integer decimation factor for a display budget
//! - Reduced-scale decoding and resampling to an RGBA [`Raster`]
//! - Reading EXIF orientation and turning the raster upright
//!
//! # Architecture
//!
//! Every pass (probe, decode, metadata) opens the [`ImageSource`] afresh and
//! releases its reader before returning. All operations are synchronous and
//! meant to run off the UI thread.
//!
//! # Examples
//!
//! ```ignore
//! use tratafoto_core::decode::{decode, DecodeBudget, ImageSource};
//!
//! let source = ImageSource::from_path("/sdcard/DCIM/photo.jpg");
//! let raster = decode(&source, DecodeBudget::new(1080, 2340)).unwrap();
//! println!("Decoded {}x{} raster", raster.width, raster.height);
//! ```

mod bounds;
mod downsample;
mod jpeg;
mod orientation;
mod source;
mod types;

pub use bounds::{compute_sample_size, probe_bounds};
pub use downsample::{decode, decode_raw, decode_variant, decode_with_config};
pub use orientation::{orientation_from_bytes, read_orientation};
pub use source::{ContentResolver, ImageSource, SourceReader};
pub use types::{BoundsProbe, DecodeBudget, DecodeError, FailureBucket, Orientation, Raster};
