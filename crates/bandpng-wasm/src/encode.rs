//! PNG encoding WASM bindings.
//!
//! This module exposes the bandpng-core encoder to JavaScript.
//!
//! # Functions
//!
//! - [`encode_png`] - Encode raw pixel data at a given compression level
//! - [`encode_png_with_options`] - Encode a JsRasterImage with an options object
//!
//! Browsers have no worker pool available to the engine, so bands are always
//! compressed on the calling thread. The output is byte-identical to a
//! threaded native encode of the same image.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png, encode_png_with_options, JsRasterImage } from '@bandpng/wasm';
//!
//! const png = encode_png(pixels, width, height, 'rgba', 9);
//!
//! const image = new JsRasterImage(width, height, 'rgb', pixels);
//! const tagged = encode_png_with_options(image, { compressionLevel: 6, dpi: 300, renderingIntent: 0 });
//! ```

use bandpng_core::{
    encode_to_vec, EncodeError, EncoderConfig, PhysicalPixelDimensions, RasterView,
    RenderingIntent,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::types::{parse_color_format, JsRasterImage};

/// Options accepted by [`encode_png_with_options`].
///
/// Every field is optional; missing fields keep the encoder defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct EncodeOptions {
    /// DEFLATE level, 0-9 (default: 9)
    pub compression_level: Option<i64>,
    /// sRGB rendering intent, 0-3
    pub rendering_intent: Option<u8>,
    /// Square pixel density in dots per inch
    pub dpi: Option<u32>,
}

impl EncodeOptions {
    /// Build a validated single-threaded encoder config.
    pub(crate) fn to_config(&self) -> Result<EncoderConfig, EncodeError> {
        let mut config = EncoderConfig::new().with_multi_threaded(false);

        if let Some(level) = self.compression_level {
            config = config.with_compression_level(level)?;
        }
        if let Some(intent) = self.rendering_intent {
            let intent = RenderingIntent::try_from(intent).map_err(|value| {
                EncodeError::InvalidFormat(format!("unknown rendering intent {value}"))
            })?;
            config = config.with_srgb_rendering_intent(intent);
        }
        if let Some(dpi) = self.dpi {
            config = config.with_physical_dimensions(PhysicalPixelDimensions::dots_per_inch(dpi));
        }
        Ok(config)
    }
}

fn to_js_error(error: EncodeError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Encode raw pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - Pixel data as a `Uint8Array` (row-major, one byte per channel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `color_format` - `"gray"`, `"grayalpha"`, `"rgb"` or `"rgba"`
/// * `compression_level` - DEFLATE level, 0 (fastest) to 9 (smallest)
///
/// # Errors
///
/// Returns an error if:
/// - The color format name is unknown
/// - The pixel data length doesn't match the dimensions
/// - The compression level is outside 0-9
#[wasm_bindgen]
pub fn encode_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    color_format: &str,
    compression_level: i32,
) -> Result<Vec<u8>, JsValue> {
    encode_pixels(pixels, width, height, color_format, compression_level).map_err(to_js_error)
}

/// Encode a JsRasterImage with an options object.
///
/// `options` may be `undefined` or an object with any of
/// `compressionLevel`, `renderingIntent` and `dpi`.
#[wasm_bindgen]
pub fn encode_png_with_options(image: &JsRasterImage, options: JsValue) -> Result<Vec<u8>, JsValue> {
    let options: EncodeOptions = if options.is_undefined() || options.is_null() {
        EncodeOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    encode_image(image, &options).map_err(to_js_error)
}

pub(crate) fn encode_pixels(
    pixels: &[u8],
    width: u32,
    height: u32,
    color_format: &str,
    compression_level: i32,
) -> Result<Vec<u8>, EncodeError> {
    let config = EncoderConfig::new()
        .with_multi_threaded(false)
        .with_compression_level(compression_level)?;
    let format = parse_color_format(color_format)?;
    let raster = RasterView::new(pixels, width, height, format)?;
    encode_to_vec(&raster, config)
}

pub(crate) fn encode_image(
    image: &JsRasterImage,
    options: &EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let config = options.to_config()?;
    encode_to_vec(&image.as_raster()?, config)
}


/// WASM-specific tests that require JsValue.
///
/// These tests use functions that return `Result<T, JsValue>` and can only
/// run on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_png_basic() {
        let pixels = vec![128u8; 20 * 20 * 4];
        let png = encode_png(&pixels, 20, 20, "rgba", 6).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[wasm_bindgen_test]
    fn test_encode_png_invalid_dimensions() {
        let result = encode_png(&[0u8; 4], 0, 4, "gray", 6);
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_png_with_undefined_options() {
        let image = JsRasterImage::new(4, 4, "gray", vec![0u8; 16]).unwrap();
        let png = encode_png_with_options(&image, JsValue::UNDEFINED).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
