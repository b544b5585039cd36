//! PNG chunk framing and file assembly.
//!
//! Every chunk is written as a 4-byte big-endian payload length, the 4-byte
//! type, the payload and a CRC-32 over type and payload. The file is the
//! fixed signature followed by:
//!
//! 1. `IHDR` (always first)
//! 2. `sRGB` rendering intent (optional)
//! 3. `pHYs` physical pixel dimensions (optional)
//! 4. one or more contiguous `IDAT` chunks
//! 5. `IEND` (always last)

mod ancillary;
mod assemble;
mod writer;

pub use ancillary::{DimensionUnit, PhysicalPixelDimensions, RenderingIntent};
pub use assemble::{AncillaryChunks, ChunkAssembler, ImageHeader};
pub use writer::{
    chunk_crc, write_chunk, ChunkType, IDAT, IEND, IHDR, MAX_CHUNK_LEN, PHYS, SIGNATURE, SRGB,
};
