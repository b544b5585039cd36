//! Scanline extraction from a [`Raster`].

use super::Raster;
use crate::encode::EncodeError;

/// Largest width or height the image header can declare (2^31 - 1).
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// Largest buffer the target can address.
const MAX_BUFFER_LEN: u64 = isize::MAX as u64;

/// Bytes in `height` rows of `width` pixels plus `filter_bytes` per row, or
/// `None` past `limit`.
fn scanline_bytes(
    width: u32,
    height: u32,
    channels: usize,
    filter_bytes: u64,
    limit: u64,
) -> Option<usize> {
    let row = u64::from(width)
        .checked_mul(u64::try_from(channels).ok()?)?
        .checked_add(filter_bytes)?;
    let total = row.checked_mul(u64::from(height))?;
    if total > limit {
        return None;
    }
    usize::try_from(total).ok()
}

/// Length of one raw scanline of `width` pixels.
///
/// Fails with [`EncodeError::InvalidFormat`] when the row could not be held
/// in memory on this target.
pub fn scanline_len(width: u32, channels: usize) -> Result<usize, EncodeError> {
    scanline_bytes(width, 1, channels, 0, MAX_BUFFER_LEN).ok_or_else(|| {
        EncodeError::InvalidFormat(format!(
            "a row of {width} pixels with {channels} channels does not fit in memory"
        ))
    })
}

/// Size of the filtered image: every row plus its filter type byte.
pub fn filtered_len(width: u32, height: u32, channels: usize) -> Result<usize, EncodeError> {
    scanline_bytes(width, height, channels, 1, MAX_BUFFER_LEN).ok_or_else(|| {
        EncodeError::InvalidFormat(format!(
            "a {width}x{height} image with {channels} channels does not fit in memory"
        ))
    })
}

/// Check that a raster can be encoded at all.
///
/// Runs before any row is read so that a malformed raster fails the encode
/// without producing output.
pub fn validate_raster<R: Raster + ?Sized>(raster: &R) -> Result<(), EncodeError> {
    let (width, height) = (raster.width(), raster.height());
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidFormat(format!(
            "dimensions must be non-zero, got {width}x{height}"
        )));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(EncodeError::InvalidFormat(format!(
            "dimensions {width}x{height} exceed the maximum of {MAX_DIMENSION}"
        )));
    }

    let format = raster.color_format();
    if raster.channels() != format.channels() {
        return Err(EncodeError::InvalidFormat(format!(
            "{format:?} expects {} channels, raster stores {}",
            format.channels(),
            raster.channels()
        )));
    }

    filtered_len(width, height, format.channels())?;
    Ok(())
}

/// Length in bytes of one raw scanline of `raster`.
#[inline]
pub fn row_len<R: Raster + ?Sized>(raster: &R) -> Result<usize, EncodeError> {
    scanline_len(raster.width(), raster.color_format().channels())
}

/// Copy row `y` of `raster` into `out`, replacing its contents.
///
/// The bytes are in the raster's own channel order with alpha included iff
/// the format carries it. No conversion is performed.
pub fn extract_row<R: Raster + ?Sized>(
    raster: &R,
    y: u32,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    if y >= raster.height() {
        return Err(EncodeError::InvalidFormat(format!(
            "row {y} is outside a raster of height {}",
            raster.height()
        )));
    }

    let format = raster.color_format();
    let channels = format.channels();
    if raster.channels() != channels {
        return Err(EncodeError::InvalidFormat(format!(
            "{format:?} expects {channels} channels, raster stores {}",
            raster.channels()
        )));
    }

    let expected = row_len(raster)?;
    out.clear();

    if let Some(row) = raster.row(y) {
        if row.len() != expected {
            return Err(EncodeError::InvalidFormat(format!(
                "row {y} has {} bytes, expected {expected}",
                row.len()
            )));
        }
        out.extend_from_slice(row);
        return Ok(());
    }

    out.reserve(expected);
    for x in 0..raster.width() {
        let pixel = raster.pixel(x, y);
        if pixel.len() != channels {
            return Err(EncodeError::InvalidFormat(format!(
                "pixel ({x}, {y}) has {} channels, {format:?} expects {channels}",
                pixel.len()
            )));
        }
        out.extend_from_slice(pixel);
    }
    Ok(())
}
