//! Bandpng Core - PNG encoding engine
//!
//! This crate encodes in-memory 8-bit rasters into PNG files. Row filtering
//! follows a fixed minimum-sum heuristic, and compression splits the image
//! into row bands that are deflated in parallel yet join into one standard
//! zlib stream. The bytes produced do not depend on whether threading is
//! enabled.
//!
//! # Module Structure
//!
//! - `raster` - Pixel sources and scanline extraction
//! - `filter` - Per-row predictor selection
//! - `deflate` - Band compression and the parallel coordinator
//! - `chunk` - Chunk framing, CRCs and file assembly
//! - `encode` - Configuration, errors and the encode entry points

pub mod chunk;
pub mod deflate;
pub mod encode;
pub mod filter;
pub mod raster;

pub use chunk::{DimensionUnit, PhysicalPixelDimensions, RenderingIntent};
pub use encode::{
    encode_to_file, encode_to_vec, encode_to_writer, CompressionLevel, EncodeError, EncoderConfig,
};
pub use filter::FilterType;
pub use raster::{ColorFormat, Raster, RasterView};
