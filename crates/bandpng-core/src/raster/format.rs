//! Pixel layouts accepted by the encoder.

use serde::{Deserialize, Serialize};

/// Channel layout of an 8-bit-per-channel raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorFormat {
    /// Single luminance channel.
    Gray8,
    /// Luminance followed by alpha.
    GrayAlpha8,
    /// Red, green, blue.
    Rgb8,
    /// Red, green, blue, alpha.
    Rgba8,
}

impl ColorFormat {
    /// Number of bytes per pixel (one byte per channel).
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ColorFormat::Gray8 => 1,
            ColorFormat::GrayAlpha8 => 2,
            ColorFormat::Rgb8 => 3,
            ColorFormat::Rgba8 => 4,
        }
    }

    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorFormat::GrayAlpha8 | ColorFormat::Rgba8)
    }

    /// Color type byte written to the image header.
    ///
    /// 0 = grayscale, 2 = truecolor, 4 = grayscale with alpha,
    /// 6 = truecolor with alpha.
    #[inline]
    pub fn png_color_type(self) -> u8 {
        match self {
            ColorFormat::Gray8 => 0,
            ColorFormat::Rgb8 => 2,
            ColorFormat::GrayAlpha8 => 4,
            ColorFormat::Rgba8 => 6,
        }
    }

    /// Parse a format name as used by the bindings (`"gray"`, `"rgba"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "gray" | "gray8" | "l8" => Some(ColorFormat::Gray8),
            "grayalpha" | "gray_alpha" | "grayalpha8" | "la8" => Some(ColorFormat::GrayAlpha8),
            "rgb" | "rgb8" => Some(ColorFormat::Rgb8),
            "rgba" | "rgba8" => Some(ColorFormat::Rgba8),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ColorFormat; 4] = [
        ColorFormat::Gray8,
        ColorFormat::GrayAlpha8,
        ColorFormat::Rgb8,
        ColorFormat::Rgba8,
    ];

    #[test]
    fn test_channels() {
        let channels: Vec<usize> = ALL.iter().map(|f| f.channels()).collect();
        assert_eq!(channels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_alpha_matches_channel_parity() {
        for format in ALL {
            assert_eq!(format.has_alpha(), format.channels() % 2 == 0);
        }
    }

    #[test]
    fn test_png_color_types() {
        assert_eq!(ColorFormat::Gray8.png_color_type(), 0);
        assert_eq!(ColorFormat::Rgb8.png_color_type(), 2);
        assert_eq!(ColorFormat::GrayAlpha8.png_color_type(), 4);
        assert_eq!(ColorFormat::Rgba8.png_color_type(), 6);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ColorFormat::from_name("RGBA"), Some(ColorFormat::Rgba8));
        assert_eq!(ColorFormat::from_name("gray"), Some(ColorFormat::Gray8));
        assert_eq!(ColorFormat::from_name("la8"), Some(ColorFormat::GrayAlpha8));
        assert_eq!(ColorFormat::from_name("cmyk"), None);
    }
}
