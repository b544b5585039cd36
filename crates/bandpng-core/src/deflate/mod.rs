//! Band-parallel zlib compression of filtered scanlines.
//!
//! # Architecture
//!
//! The filtered image is split into contiguous row bands. Each band is
//! compressed by its own raw-DEFLATE compressor with a fresh dictionary:
//!
//! ```text
//! [zlib header] [band 0 ... sync flush] [band 1 ... sync flush] ... [band n-1 ... final] [adler32]
//! ```
//!
//! A sync flush ends a band on a byte boundary without closing the stream,
//! so band outputs concatenate into a single valid DEFLATE stream. The
//! Adler-32 trailer covers the whole uncompressed input, not individual
//! bands.
//!
//! # Determinism
//!
//! The number of bands depends only on the image size. Threading decides
//! where bands are compressed, never how they are split, so output is
//! byte-identical with threading on or off and across machines.

mod band;
mod compressor;
mod coordinator;
mod zlib;

pub use band::{is_partition, partition_rows, plan_band_count, Band, TARGET_BAND_BYTES};
pub use compressor::{compress_band, BandCompressor};
pub use coordinator::{compress_bands, compress_scanlines};
pub use zlib::{adler32, zlib_header, Adler32};
