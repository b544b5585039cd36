//! PNG encoding pipeline for Bandpng.
//!
//! This module provides:
//! - [`EncoderConfig`], the validated settings for one encode call
//! - [`encode_to_vec`], [`encode_to_writer`] and [`encode_to_file`]
//! - [`EncodeError`], shared by every stage of the engine
//!
//! # Architecture
//!
//! An encode call moves through fixed stages
//! (`Configured -> Extracting -> Filtering -> Compressing -> Assembling -> Done`)
//! and stops in `Failed` on the first error. Extracting validates the raster;
//! rows are then read and filtered one at a time. Only the Compressing stage uses
//! more than one thread. Output is assembled in memory and written to the
//! sink in one piece, so a failed call never leaves partial output behind.
//!
//! # Examples
//!
//! ```ignore
//! use bandpng_core::encode::{encode_to_vec, EncoderConfig};
//! use bandpng_core::raster::{ColorFormat, RasterView};
//!
//! let pixels = vec![128u8; 100 * 100 * 4];
//! let raster = RasterView::new(&pixels, 100, 100, ColorFormat::Rgba8).unwrap();
//! let png = encode_to_vec(&raster, EncoderConfig::new()).unwrap();
//! println!("Encoded {} bytes", png.len());
//! ```

mod png;
mod stage;
mod types;

pub use png::{encode_to_file, encode_to_vec, encode_to_writer};
pub use stage::{EncodeProgress, EncodeStage};
pub use types::{CompressionLevel, EncodeError, EncoderConfig};
