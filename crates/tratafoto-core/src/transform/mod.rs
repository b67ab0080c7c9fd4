//! Geometric transforms applied after decoding.
//!
//! The only transform is orientation correction: turning a raster upright by
//! a multiple of 90° as dictated by its EXIF tag. Mirroring and arbitrary
//! angles are deliberately absent.
//!
//! # Coordinate System
//!
//! - Rotation angles are clockwise
//! - Origin is top-left corner

mod rotation;

pub use rotation::{apply_orientation, rotate180, rotate270, rotate90};
