//! Length/type/payload/CRC chunk framing.

use flate2::Crc;

use crate::encode::EncodeError;

/// The 8-byte PNG file signature.
pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Largest payload a single chunk may carry (2^31 - 1 bytes).
pub const MAX_CHUNK_LEN: usize = i32::MAX as usize;

/// Four-letter chunk type tag.
pub type ChunkType = [u8; 4];

pub const IHDR: ChunkType = *b"IHDR";
pub const SRGB: ChunkType = *b"sRGB";
pub const PHYS: ChunkType = *b"pHYs";
pub const IDAT: ChunkType = *b"IDAT";
pub const IEND: ChunkType = *b"IEND";

/// CRC-32 over the chunk type followed by the payload.
pub fn chunk_crc(kind: &ChunkType, payload: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(kind);
    crc.update(payload);
    crc.sum()
}

/// Append one framed chunk to `out` and return the number of bytes added.
pub fn write_chunk(
    out: &mut Vec<u8>,
    kind: &ChunkType,
    payload: &[u8],
) -> Result<usize, EncodeError> {
    if payload.len() > MAX_CHUNK_LEN {
        return Err(EncodeError::CompressionFailed(format!(
            "{} chunk payload of {} bytes exceeds {MAX_CHUNK_LEN}",
            String::from_utf8_lossy(kind),
            payload.len()
        )));
    }

    let start = out.len();
    out.reserve(12 + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out.extend_from_slice(&chunk_crc(kind, payload).to_be_bytes());
    Ok(out.len() - start)
}
