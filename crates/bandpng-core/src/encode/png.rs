//! PNG encoding entry points.
//!
//! Each call filters the whole raster, compresses it (on a worker pool when
//! enabled), assembles the file in memory, and only then hands bytes to the
//! caller's sink. A failure at any stage means nothing is written.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::stage::{EncodeProgress, EncodeStage};
use super::types::{EncodeError, EncoderConfig};
use crate::chunk::{AncillaryChunks, ChunkAssembler, ImageHeader};
use crate::deflate::compress_scanlines;
use crate::filter::filter_raster;
use crate::raster::{validate_raster, Raster};

/// Encode `raster` and return the PNG file bytes.
///
/// # Example
///
/// ```ignore
/// use bandpng_core::{encode_to_vec, ColorFormat, EncoderConfig, RasterView};
///
/// let pixels = vec![0u8; 2 * 2 * 3];
/// let raster = RasterView::new(&pixels, 2, 2, ColorFormat::Rgb8)?;
/// let png = encode_to_vec(&raster, EncoderConfig::new())?;
/// assert_eq!(&png[1..4], b"PNG");
/// ```
pub fn encode_to_vec<R: Raster + ?Sized>(
    raster: &R,
    config: EncoderConfig,
) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    encode_with(raster, config, &ChunkAssembler::new(), || Ok(&mut out))?;
    Ok(out)
}

/// Encode `raster` into `sink`, returning the number of bytes written.
///
/// The file is built completely before the first write, so a sink never
/// sees partial output from a failed encode. Sink errors surface as
/// [`EncodeError::WriteFailed`].
pub fn encode_to_writer<R, W>(
    raster: &R,
    config: EncoderConfig,
    sink: &mut W,
) -> Result<usize, EncodeError>
where
    R: Raster + ?Sized,
    W: Write + ?Sized,
{
    encode_with(raster, config, &ChunkAssembler::new(), || Ok(sink))
}

/// Encode `raster` into a file at `path`, creating or truncating it.
///
/// The file is only created once the pixels have been compressed, so an
/// invalid raster never touches the filesystem.
pub fn encode_to_file<R, P>(raster: &R, config: EncoderConfig, path: P) -> Result<usize, EncodeError>
where
    R: Raster + ?Sized,
    P: AsRef<Path>,
{
    encode_with(raster, config, &ChunkAssembler::new(), || {
        File::create(path).map(BufWriter::new)
    })
}

/// Run the full pipeline with a specific assembler.
///
/// `open_sink` is called at most once, in the Assembling stage, after every
/// earlier stage has succeeded.
pub(crate) fn encode_with<R, W, F>(
    raster: &R,
    config: EncoderConfig,
    assembler: &ChunkAssembler,
    open_sink: F,
) -> Result<usize, EncodeError>
where
    R: Raster + ?Sized,
    W: Write,
    F: FnOnce() -> io::Result<W>,
{
    let mut progress = EncodeProgress::new();

    // Shape checks only; rows are pulled one at a time while filtering.
    progress.run(EncodeStage::Extracting, || validate_raster(raster))?;

    let scanlines = progress.run(EncodeStage::Filtering, || filter_raster(raster))?;

    let compressed = progress.run(EncodeStage::Compressing, || {
        compress_scanlines(&scanlines, config.compression_level, config.multi_threaded)
    })?;
    drop(scanlines);

    let header = ImageHeader {
        width: raster.width(),
        height: raster.height(),
        format: raster.color_format(),
    };
    let ancillary = AncillaryChunks {
        srgb_rendering_intent: config.srgb_rendering_intent,
        physical_dimensions: config.physical_dimensions,
    };
    let written = progress.run(EncodeStage::Assembling, || {
        let mut sink = open_sink()?;
        assembler.emit(&header, &ancillary, &compressed, &mut sink)
    })?;

    progress.advance(EncodeStage::Done)?;
    Ok(written)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::raster::{ColorFormat, RasterView};
    use proptest::prelude::*;

    fn format_strategy() -> impl Strategy<Value = ColorFormat> {
        prop_oneof![
            Just(ColorFormat::Gray8),
            Just(ColorFormat::GrayAlpha8),
            Just(ColorFormat::Rgb8),
            Just(ColorFormat::Rgba8),
        ]
    }

    /// Strategy for an image: dimensions, format and matching pixel bytes.
    fn image_strategy() -> impl Strategy<Value = (u32, u32, ColorFormat, Vec<u8>)> {
        (1u32..=24, 1u32..=24, format_strategy()).prop_flat_map(|(width, height, format)| {
            let len = (width * height) as usize * format.channels();
            (
                Just(width),
                Just(height),
                Just(format),
                prop::collection::vec(any::<u8>(), len..=len),
            )
        })
    }

    proptest! {
        /// Property: decoding the output reproduces the input pixels.
        #[test]
        fn prop_round_trip((width, height, format, pixels) in image_strategy(), level in 0u8..=9) {
            let raster = RasterView::new(&pixels, width, height, format).unwrap();
            let config = EncoderConfig::new().with_compression_level(level).unwrap();
            let bytes = encode_to_vec(&raster, config).unwrap();

            let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png).unwrap();
            prop_assert_eq!(decoded.width(), width);
            prop_assert_eq!(decoded.height(), height);
            prop_assert_eq!(decoded.as_bytes(), pixels.as_slice());
        }

        /// Property: the threading flag never changes the output.
        #[test]
        fn prop_threading_is_invisible((width, height, format, pixels) in image_strategy()) {
            let raster = RasterView::new(&pixels, width, height, format).unwrap();
            let threaded = encode_to_vec(&raster, EncoderConfig::new()).unwrap();
            let sequential =
                encode_to_vec(&raster, EncoderConfig::new().with_multi_threaded(false)).unwrap();
            prop_assert_eq!(threaded, sequential);
        }

        /// Property: out-of-range levels are rejected at configuration time.
        #[test]
        fn prop_invalid_levels_rejected(level in prop_oneof![i64::MIN..0i64, 10i64..=i64::MAX]) {
            prop_assert!(matches!(
                EncoderConfig::new().with_compression_level(level),
                Err(EncodeError::InvalidCompressionLevel(l)) if l == level
            ));
        }
    }
}
