//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The source is missing, unreadable, or its stream failed mid-read.
    #[error("Image source unavailable: {0}")]
    InvalidSource(String),

    /// The source opened but did not yield any pixel data.
    #[error("Corrupted or incomplete image: {0}")]
    CorruptSource(String),

    /// The decode budget has a zero dimension.
    #[error("Invalid decode budget: width ({width}) and height ({height}) must be non-zero")]
    InvalidBudget { width: u32, height: u32 },

    /// Decoding would allocate more than the configured ceiling.
    #[error("Decode exceeds allocation limit: {0}")]
    LimitExceeded(String),

    /// The URI scheme has no resolver.
    #[error("Unsupported URI scheme: {0}")]
    UnsupportedScheme(String),
}

/// Broad classification of a decode failure, as reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureBucket {
    /// Input or I/O problem: bad path, unreadable stream, undecodable data.
    InputOutput,
    /// Anything else: caller mistakes and resource ceilings.
    Unexpected,
}

impl DecodeError {
    /// Collapse this error into one of the two buckets the UI distinguishes.
    pub fn bucket(&self) -> FailureBucket {
        match self {
            DecodeError::InvalidSource(_)
            | DecodeError::CorruptSource(_)
            | DecodeError::UnsupportedScheme(_) => FailureBucket::InputOutput,
            DecodeError::InvalidBudget { .. } | DecodeError::LimitExceeded(_) => {
                FailureBucket::Unexpected
            }
        }
    }
}

/// Upper bound on the decoded raster, usually the display viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeBudget {
    /// Maximum width in pixels.
    pub width: u32,
    /// Maximum height in pixels.
    pub height: u32,
}

impl DecodeBudget {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reject budgets with a zero dimension.
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.width == 0 || self.height == 0 {
            return Err(DecodeError::InvalidBudget {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Budget area in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Hard cap on decoded pixels: twice the budget area.
    pub fn pixel_cap(&self) -> u64 {
        self.area() * 2
    }
}

/// Declared dimensions read from a container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsProbe {
    pub width: u32,
    pub height: u32,
}

impl BoundsProbe {
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when both declared dimensions are inside the budget.
    pub fn fits_within(&self, budget: &DecodeBudget) -> bool {
        self.width <= budget.width && self.height <= budget.height
    }
}

/// Orientation read from EXIF metadata.
///
/// Only the four cardinal cases are recognized. Mirrored orientations
/// (EXIF 2, 4, 5, 7) and anything out of range are reported as `Undefined`
/// and leave the image untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Upright (EXIF 1).
    Normal,
    /// Needs a 90° clockwise turn (EXIF 6).
    Rotate90,
    /// Needs a 180° turn (EXIF 3).
    Rotate180,
    /// Needs a 270° clockwise turn (EXIF 8).
    Rotate270,
    /// No tag, unreadable tag, or an unsupported value.
    #[default]
    Undefined,
}

impl Orientation {
    /// Map a raw EXIF orientation value.
    pub fn from_exif_tag(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            3 => Orientation::Rotate180,
            6 => Orientation::Rotate90,
            8 => Orientation::Rotate270,
            _ => Orientation::Undefined,
        }
    }

    /// Returns true if correcting this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Orientation::Rotate90 | Orientation::Rotate270)
    }

    /// Dimensions after correction for a `width x height` decode.
    pub fn oriented_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        Orientation::from_exif_tag(value)
    }
}

/// A decoded image with RGBA pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Bytes per pixel: R, G, B, A.
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Create a new Raster with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            Self::expected_len(width, height),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Raster from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert into an image::RgbaImage, consuming the buffer.
    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels)
    }

    /// Buffer length a `width x height` raster must have.
    pub fn expected_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * Self::BYTES_PER_PIXEL
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid raster.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// RGBA value at `(x, y)`, or None when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        let px = self.pixels.get(idx..idx + Self::BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Pixel data with the alpha channel dropped (3 bytes per pixel).
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixel_count() as usize * 3);
        for px in self.pixels.chunks_exact(Self::BYTES_PER_PIXEL) {
            rgb.extend_from_slice(&px[..3]);
        }
        rgb
    }
}
