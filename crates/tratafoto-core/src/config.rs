//! Pipeline configuration.
//!
//! Everything here is supplied by the host at startup and read-only
//! afterwards. Nothing is persisted; the serde derives exist so the host can
//! hand over a partial configuration and have the rest filled with defaults.

use serde::{Deserialize, Serialize};

/// Default ceiling for a single decode allocation (bytes).
///
/// A 48 MP sensor decodes to roughly 192 MiB of RGBA, so 512 MiB leaves room
/// for the decoder's own scratch buffers.
pub const DEFAULT_MAX_DECODE_ALLOC: u64 = 512 * 1024 * 1024;

/// Default rav1e speed preset for AVIF output (1 = slowest, 10 = fastest).
pub const DEFAULT_AVIF_SPEED: u8 = 6;

/// The two parallel capture slots shown side by side in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureVariant {
    /// Variant saved at reduced quality after full normalization.
    WithEntrapment,
    /// Variant saved at full quality straight from the camera file.
    NoEntrapment,
}

impl CaptureVariant {
    /// Both variants, in display order.
    pub const ALL: [CaptureVariant; 2] = [CaptureVariant::WithEntrapment, CaptureVariant::NoEntrapment];

    /// Stable lowercase label for logs and file names.
    pub fn as_str(self) -> &'static str {
        match self {
            CaptureVariant::WithEntrapment => "with-entrapment",
            CaptureVariant::NoEntrapment => "no-entrapment",
        }
    }
}

/// How one capture variant is decoded and saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantProfile {
    /// Lossy quality used when saving this variant (0-100).
    pub quality: u8,
    /// When true the variant goes through downsampling and orientation
    /// correction; when false it is decoded as-is at full resolution.
    pub normalize: bool,
}

/// Configuration shared by every pipeline call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Prefer the modern lossy codec (AVIF) when this build supports it.
    pub prefer_modern_codec: bool,
    /// rav1e speed preset for AVIF output (1-10).
    pub avif_speed: u8,
    /// Largest single allocation the decoder may make, in bytes.
    pub max_decode_alloc: u64,
    /// Profile for [`CaptureVariant::WithEntrapment`].
    pub with_entrapment: VariantProfile,
    /// Profile for [`CaptureVariant::NoEntrapment`].
    pub no_entrapment: VariantProfile,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prefer_modern_codec: true,
            avif_speed: DEFAULT_AVIF_SPEED,
            max_decode_alloc: DEFAULT_MAX_DECODE_ALLOC,
            with_entrapment: VariantProfile {
                quality: 50,
                normalize: true,
            },
            no_entrapment: VariantProfile {
                quality: 100,
                normalize: false,
            },
        }
    }
}

impl PipelineConfig {
    /// Look up the profile for a capture variant.
    pub fn profile(&self, variant: CaptureVariant) -> VariantProfile {
        match variant {
            CaptureVariant::WithEntrapment => self.with_entrapment,
            CaptureVariant::NoEntrapment => self.no_entrapment,
        }
    }

    /// Decoder allocation limits derived from this configuration.
    pub fn decode_limits(&self) -> image::Limits {
        let mut limits = image::Limits::default();
        limits.max_alloc = Some(self.max_decode_alloc);
        limits
    }
}
