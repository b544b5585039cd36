//! Optional metadata chunks: `sRGB` rendering intent and `pHYs` density.

use serde::{Deserialize, Serialize};

/// Rendering intent stored in the `sRGB` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RenderingIntent {
    Perceptual = 0,
    RelativeColorimetric = 1,
    Saturation = 2,
    AbsoluteColorimetric = 3,
}

impl RenderingIntent {
    /// The single payload byte of the `sRGB` chunk.
    #[inline]
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RenderingIntent {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RenderingIntent::Perceptual),
            1 => Ok(RenderingIntent::RelativeColorimetric),
            2 => Ok(RenderingIntent::Saturation),
            3 => Ok(RenderingIntent::AbsoluteColorimetric),
            other => Err(other),
        }
    }
}

/// Unit of the `pHYs` pixel density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum DimensionUnit {
    /// Only the aspect ratio is meaningful.
    #[default]
    Unknown = 0,
    Meter = 1,
}

const METERS_PER_INCH: f64 = 0.0254;

/// Pixel density stored in the `pHYs` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhysicalPixelDimensions {
    /// Pixels per unit along the x axis.
    pub pixels_per_unit_x: u32,
    /// Pixels per unit along the y axis.
    pub pixels_per_unit_y: u32,
    pub unit: DimensionUnit,
}

impl PhysicalPixelDimensions {
    /// Density in pixels per metre.
    pub fn pixels_per_meter(x: u32, y: u32) -> Self {
        Self {
            pixels_per_unit_x: x,
            pixels_per_unit_y: y,
            unit: DimensionUnit::Meter,
        }
    }

    /// Square pixels at `dpi` dots per inch, stored as pixels per metre
    /// rounded to the nearest integer (72 dpi becomes 2835).
    pub fn dots_per_inch(dpi: u32) -> Self {
        let ppm = (dpi as f64 / METERS_PER_INCH).round() as u32;
        Self::pixels_per_meter(ppm, ppm)
    }

    /// Pixel aspect ratio only, with no absolute size.
    pub fn aspect_ratio(x: u32, y: u32) -> Self {
        Self {
            pixels_per_unit_x: x,
            pixels_per_unit_y: y,
            unit: DimensionUnit::Unknown,
        }
    }

    /// The 9-byte `pHYs` payload.
    pub fn to_bytes(self) -> [u8; 9] {
        let mut payload = [0u8; 9];
        payload[0..4].copy_from_slice(&self.pixels_per_unit_x.to_be_bytes());
        payload[4..8].copy_from_slice(&self.pixels_per_unit_y.to_be_bytes());
        payload[8] = self.unit as u8;
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering_intent_bytes() {
        assert_eq!(RenderingIntent::Perceptual.as_byte(), 0);
        assert_eq!(RenderingIntent::AbsoluteColorimetric.as_byte(), 3);
        assert_eq!(
            RenderingIntent::try_from(1u8),
            Ok(RenderingIntent::RelativeColorimetric)
        );
        assert_eq!(RenderingIntent::try_from(4u8), Err(4));
    }

    #[test]
    fn test_dots_per_inch_conversion() {
        let dims = PhysicalPixelDimensions::dots_per_inch(72);
        assert_eq!(dims.pixels_per_unit_x, 2835);
        assert_eq!(dims.pixels_per_unit_y, 2835);
        assert_eq!(dims.unit, DimensionUnit::Meter);

        let dims = PhysicalPixelDimensions::dots_per_inch(300);
        assert_eq!(dims.pixels_per_unit_x, 11811);
    }

    #[test]
    fn test_aspect_ratio_has_unknown_unit() {
        let dims = PhysicalPixelDimensions::aspect_ratio(2, 1);
        assert_eq!(dims.unit, DimensionUnit::Unknown);
        assert_eq!(dims.to_bytes(), [0, 0, 0, 2, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_payload_layout() {
        let dims = PhysicalPixelDimensions::pixels_per_meter(0x0102_0304, 0x0A0B_0C0D);
        assert_eq!(dims.to_bytes(), [1, 2, 3, 4, 0x0A, 0x0B, 0x0C, 0x0D, 1]);
    }
}
