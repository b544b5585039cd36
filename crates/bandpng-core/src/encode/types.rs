//! Core types for PNG encoding: errors, compression level and configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunk::{PhysicalPixelDimensions, RenderingIntent};

/// Errors that can occur while encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The raster is inconsistent with its declared format or dimensions.
    #[error("Invalid raster format: {0}")]
    InvalidFormat(String),

    /// The compression level is outside the valid range.
    #[error(
        "Invalid compression level {0}: must be between {min} and {max}",
        min = CompressionLevel::MIN.value(),
        max = CompressionLevel::MAX.value()
    )]
    InvalidCompressionLevel(i64),

    /// The compressor failed, or a compression worker could not complete.
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// The output sink rejected a write.
    #[error("Write failed: {0}")]
    WriteFailed(#[from] std::io::Error),
}

/// A validated DEFLATE compression level (0 = store only, 9 = smallest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// Fastest: blocks are stored uncompressed.
    pub const MIN: CompressionLevel = CompressionLevel(0);
    /// Smallest output.
    pub const MAX: CompressionLevel = CompressionLevel(9);
    /// Level used when none is configured.
    pub const DEFAULT: CompressionLevel = CompressionLevel::MAX;

    /// Validate a level.
    ///
    /// Accepts any integer type so callers can pass through whatever their
    /// own configuration layer produced.
    pub fn new(level: impl Into<i64>) -> Result<Self, EncodeError> {
        let level = level.into();
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&level) {
            Ok(CompressionLevel(level as u8))
        } else {
            Err(EncodeError::InvalidCompressionLevel(level))
        }
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for CompressionLevel {
    type Error = EncodeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        CompressionLevel::new(value)
    }
}

impl From<CompressionLevel> for u8 {
    fn from(level: CompressionLevel) -> Self {
        level.0
    }
}

/// Encoder settings, passed by value into the encode functions.
///
/// All fields are validated on construction, so an `EncoderConfig` that
/// exists is always usable.
///
/// # Example
///
/// ```ignore
/// use bandpng_core::{EncoderConfig, RenderingIntent};
///
/// let config = EncoderConfig::new()
///     .with_compression_level(6)?
///     .with_multi_threaded(false)
///     .with_srgb_rendering_intent(RenderingIntent::Perceptual);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// DEFLATE level (default: 9).
    pub compression_level: CompressionLevel,
    /// Compress row bands on worker threads (default: true).
    pub multi_threaded: bool,
    /// Write an `sRGB` chunk with this rendering intent.
    pub srgb_rendering_intent: Option<RenderingIntent>,
    /// Write a `pHYs` chunk with this pixel density.
    pub physical_dimensions: Option<PhysicalPixelDimensions>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            compression_level: CompressionLevel::DEFAULT,
            multi_threaded: true,
            srgb_rendering_intent: None,
            physical_dimensions: None,
        }
    }
}

impl EncoderConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression level, failing if it is out of range.
    pub fn with_compression_level(self, level: impl Into<i64>) -> Result<Self, EncodeError> {
        Ok(Self {
            compression_level: CompressionLevel::new(level)?,
            ..self
        })
    }

    pub fn with_multi_threaded(self, multi_threaded: bool) -> Self {
        Self {
            multi_threaded,
            ..self
        }
    }

    pub fn with_srgb_rendering_intent(self, intent: RenderingIntent) -> Self {
        Self {
            srgb_rendering_intent: Some(intent),
            ..self
        }
    }

    pub fn with_physical_dimensions(self, dimensions: PhysicalPixelDimensions) -> Self {
        Self {
            physical_dimensions: Some(dimensions),
            ..self
        }
    }
}
