//! The `Raster` abstraction and its implementations.

use std::ops::Deref;

use image::{DynamicImage, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};

use super::extract::scanline_len;
use super::ColorFormat;
use crate::encode::EncodeError;

/// Read-only access to an in-memory pixel grid.
///
/// The encoder borrows a raster for the duration of one encode call and may
/// read it from several worker threads at once, hence the `Sync` bound.
pub trait Raster: Sync {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Declared channel layout.
    fn color_format(&self) -> ColorFormat;

    /// Number of channels actually stored per pixel.
    ///
    /// Must agree with `color_format().channels()`; the row extractor rejects
    /// rasters where it does not.
    fn channels(&self) -> usize {
        self.color_format().channels()
    }

    /// Channel bytes of the pixel at column `x`, row `y`.
    fn pixel(&self, x: u32, y: u32) -> &[u8];

    /// Contiguous bytes of row `y`, when the storage allows it.
    ///
    /// Implementations backed by a packed buffer should override this so rows
    /// are copied in one slice instead of pixel by pixel.
    fn row(&self, _y: u32) -> Option<&[u8]> {
        None
    }
}

/// A borrowed, row-major byte buffer interpreted as a raster.
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    format: ColorFormat,
    stride: usize,
}

impl<'a> RasterView<'a> {
    /// Create a view over tightly packed rows (`stride = width * channels`).
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        format: ColorFormat,
    ) -> Result<Self, EncodeError> {
        let stride = scanline_len(width, format.channels())?;
        Self::with_stride(data, width, height, format, stride)
    }

    /// Create a view whose rows start `stride` bytes apart.
    ///
    /// Padding bytes between rows are never read.
    pub fn with_stride(
        data: &'a [u8],
        width: u32,
        height: u32,
        format: ColorFormat,
        stride: usize,
    ) -> Result<Self, EncodeError> {
        if width == 0 || height == 0 {
            return Err(EncodeError::InvalidFormat(format!(
                "dimensions must be non-zero, got {width}x{height}"
            )));
        }

        let row_len = scanline_len(width, format.channels())?;
        if stride < row_len {
            return Err(EncodeError::InvalidFormat(format!(
                "stride {stride} is shorter than a {format:?} row of {row_len} bytes"
            )));
        }

        let required = usize::try_from(height - 1)
            .ok()
            .and_then(|rows| stride.checked_mul(rows))
            .and_then(|bytes| bytes.checked_add(row_len))
            .ok_or_else(|| {
                EncodeError::InvalidFormat(format!(
                    "{height} rows with a stride of {stride} bytes do not fit in memory"
                ))
            })?;
        if data.len() < required {
            return Err(EncodeError::InvalidFormat(format!(
                "expected at least {required} bytes for {width}x{height} {format:?}, got {}",
                data.len()
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            format,
            stride,
        })
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl Raster for RasterView<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_format(&self) -> ColorFormat {
        self.format
    }

    fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let channels = self.format.channels();
        let start = (y as usize) * self.stride + (x as usize) * channels;
        &self.data[start..start + channels]
    }

    fn row(&self, y: u32) -> Option<&[u8]> {
        let start = (y as usize) * self.stride;
        let len = (self.width as usize) * self.format.channels();
        self.data.get(start..start + len)
    }
}

/// 8-bit pixel types from the `image` crate that map onto a [`ColorFormat`].
pub trait FormatPixel: Pixel<Subpixel = u8> + Sync {
    const FORMAT: ColorFormat;
}

impl FormatPixel for Luma<u8> {
    const FORMAT: ColorFormat = ColorFormat::Gray8;
}

impl FormatPixel for LumaA<u8> {
    const FORMAT: ColorFormat = ColorFormat::GrayAlpha8;
}

impl FormatPixel for Rgb<u8> {
    const FORMAT: ColorFormat = ColorFormat::Rgb8;
}

impl FormatPixel for Rgba<u8> {
    const FORMAT: ColorFormat = ColorFormat::Rgba8;
}

impl<P, C> Raster for ImageBuffer<P, C>
where
    P: FormatPixel,
    C: Deref<Target = [u8]> + Sync,
{
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn color_format(&self) -> ColorFormat {
        P::FORMAT
    }

    fn channels(&self) -> usize {
        P::CHANNEL_COUNT as usize
    }

    fn pixel(&self, x: u32, y: u32) -> &[u8] {
        self.get_pixel(x, y).channels()
    }

    fn row(&self, y: u32) -> Option<&[u8]> {
        let len = (ImageBuffer::width(self) as usize) * P::CHANNEL_COUNT as usize;
        let start = (y as usize) * len;
        self.as_raw().get(start..start + len)
    }
}

impl<'a> TryFrom<&'a DynamicImage> for RasterView<'a> {
    type Error = EncodeError;

    /// Borrow an 8-bit `DynamicImage` without copying.
    ///
    /// Higher bit depths and float images need a conversion the encoder does
    /// not perform, so they are rejected.
    fn try_from(image: &'a DynamicImage) -> Result<Self, Self::Error> {
        let (data, format): (&[u8], ColorFormat) = match image {
            DynamicImage::ImageLuma8(buf) => (buf.as_raw(), ColorFormat::Gray8),
            DynamicImage::ImageLumaA8(buf) => (buf.as_raw(), ColorFormat::GrayAlpha8),
            DynamicImage::ImageRgb8(buf) => (buf.as_raw(), ColorFormat::Rgb8),
            DynamicImage::ImageRgba8(buf) => (buf.as_raw(), ColorFormat::Rgba8),
            other => {
                return Err(EncodeError::InvalidFormat(format!(
                    "unsupported color type {:?}",
                    other.color()
                )))
            }
        };
        RasterView::new(data, image.width(), image.height(), format)
    }
}
