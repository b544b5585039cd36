//! Final file assembly: signature, chunks in the required order, IDAT split.

use std::io::Write;

use super::ancillary::{PhysicalPixelDimensions, RenderingIntent};
use super::writer::{write_chunk, IDAT, IEND, IHDR, MAX_CHUNK_LEN, PHYS, SIGNATURE, SRGB};
use crate::encode::EncodeError;
use crate::raster::ColorFormat;

/// Contents of the `IHDR` chunk.
///
/// Bit depth is always 8 and interlacing is never used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub format: ColorFormat,
}

impl ImageHeader {
    pub const BIT_DEPTH: u8 = 8;

    /// The 13-byte `IHDR` payload.
    pub fn to_bytes(&self) -> [u8; 13] {
        let mut payload = [0u8; 13];
        payload[0..4].copy_from_slice(&self.width.to_be_bytes());
        payload[4..8].copy_from_slice(&self.height.to_be_bytes());
        payload[8] = Self::BIT_DEPTH;
        payload[9] = self.format.png_color_type();
        // compression method, filter method, interlace method: all 0
        payload
    }
}

/// Optional metadata written between `IHDR` and the image data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AncillaryChunks {
    pub srgb_rendering_intent: Option<RenderingIntent>,
    pub physical_dimensions: Option<PhysicalPixelDimensions>,
}

/// Wraps header, metadata and compressed pixels into a complete file.
#[derive(Debug, Clone, Copy)]
pub struct ChunkAssembler {
    max_chunk_len: usize,
}

impl Default for ChunkAssembler {
    fn default() -> Self {
        Self {
            max_chunk_len: MAX_CHUNK_LEN,
        }
    }
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `IDAT` payloads larger than `max_chunk_len` bytes.
    ///
    /// Clamped to `1..=MAX_CHUNK_LEN`.
    pub fn with_max_chunk_len(max_chunk_len: usize) -> Self {
        Self {
            max_chunk_len: max_chunk_len.clamp(1, MAX_CHUNK_LEN),
        }
    }

    /// Build the whole file in memory.
    ///
    /// Order: signature, `IHDR`, `sRGB` (if set), `pHYs` (if set), one or
    /// more contiguous `IDAT`, `IEND`.
    pub fn assemble(
        &self,
        header: &ImageHeader,
        ancillary: &AncillaryChunks,
        compressed: &[u8],
    ) -> Result<Vec<u8>, EncodeError> {
        let idat_count = compressed.len().div_ceil(self.max_chunk_len).max(1);
        let mut out = Vec::with_capacity(
            SIGNATURE.len() + 25 + 13 + 21 + compressed.len() + 12 * idat_count + 12,
        );

        out.extend_from_slice(&SIGNATURE);
        write_chunk(&mut out, &IHDR, &header.to_bytes())?;

        if let Some(intent) = ancillary.srgb_rendering_intent {
            write_chunk(&mut out, &SRGB, &[intent.as_byte()])?;
        }
        if let Some(dimensions) = ancillary.physical_dimensions {
            write_chunk(&mut out, &PHYS, &dimensions.to_bytes())?;
        }

        if compressed.is_empty() {
            write_chunk(&mut out, &IDAT, &[])?;
        } else {
            for piece in compressed.chunks(self.max_chunk_len) {
                write_chunk(&mut out, &IDAT, piece)?;
            }
        }

        write_chunk(&mut out, &IEND, &[])?;

        log::debug!(
            "assembled {}x{} {:?}: {} IDAT chunk(s), {} bytes",
            header.width,
            header.height,
            header.format,
            idat_count,
            out.len()
        );
        Ok(out)
    }

    /// Assemble the file and hand it to `sink` in a single write.
    ///
    /// Nothing reaches the sink unless assembly succeeded. A sink error is
    /// reported as [`EncodeError::WriteFailed`] and not retried. Returns the
    /// number of bytes written.
    pub fn emit<W: Write + ?Sized>(
        &self,
        header: &ImageHeader,
        ancillary: &AncillaryChunks,
        compressed: &[u8],
        sink: &mut W,
    ) -> Result<usize, EncodeError> {
        let bytes = self.assemble(header, ancillary, compressed)?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(bytes.len())
    }
}
