//! Source rasters and scanline extraction.
//!
//! The encoder reads pixels through the [`Raster`] trait so that callers can
//! hand over whatever buffer they already have:
//! - [`RasterView`] borrows a plain (optionally strided) byte slice
//! - `image::ImageBuffer` with 8-bit Luma/LumaA/Rgb/Rgba pixels implements
//!   [`Raster`] directly
//! - an 8-bit `image::DynamicImage` converts into a [`RasterView`]
//!
//! Rasters are only ever read. Rows are extracted in channel order with no
//! resampling or color conversion.

mod extract;
mod format;
mod view;

pub use extract::{
    extract_row, filtered_len, row_len, scanline_len, validate_raster, MAX_DIMENSION,
};
pub use format::ColorFormat;
pub use view::{FormatPixel, Raster, RasterView};
