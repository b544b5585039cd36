//! WASM-compatible wrapper types for raster data.

use bandpng_core::{ColorFormat, EncodeError, RasterView};
use wasm_bindgen::prelude::*;

/// A raster image handed over from JavaScript for encoding.
///
/// # Memory Management
///
/// The pixel data is copied into WASM memory when the image is constructed.
/// Encoding borrows it without a further copy.
#[wasm_bindgen]
pub struct JsRasterImage {
    width: u32,
    height: u32,
    format: ColorFormat,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create a JsRasterImage from dimensions, a format name and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `color_format` - One of `"gray"`, `"grayalpha"`, `"rgb"`, `"rgba"`
    /// * `pixels` - Row-major pixel data, one byte per channel
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        color_format: &str,
        pixels: Vec<u8>,
    ) -> Result<JsRasterImage, JsValue> {
        Self::try_new(width, height, color_format, pixels)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of channels per pixel
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }
}

impl JsRasterImage {
    /// Validating constructor usable from native code and tests.
    pub(crate) fn try_new(
        width: u32,
        height: u32,
        color_format: &str,
        pixels: Vec<u8>,
    ) -> Result<Self, EncodeError> {
        let format = parse_color_format(color_format)?;
        // Validates dimensions and buffer length up front
        RasterView::new(&pixels, width, height, format)?;
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Borrow the pixels as a raster for the encoder.
    pub(crate) fn as_raster(&self) -> Result<RasterView<'_>, EncodeError> {
        RasterView::new(&self.pixels, self.width, self.height, self.format)
    }
}

/// Convert a format name from JavaScript to the core ColorFormat.
pub(crate) fn parse_color_format(name: &str) -> Result<ColorFormat, EncodeError> {
    ColorFormat::from_name(name)
        .ok_or_else(|| EncodeError::InvalidFormat(format!("unknown color format '{name}'")))
}
