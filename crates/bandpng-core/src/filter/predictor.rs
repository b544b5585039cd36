//! The five standard byte predictors.

use serde::{Deserialize, Serialize};

/// Per-row filter type, stored as the first byte of each filtered scanline.
///
/// The discriminant order is also the tie-break order used by row filter
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FilterType {
    /// Bytes are stored unchanged.
    None = 0,
    /// Difference from the same channel of the pixel to the left.
    Sub = 1,
    /// Difference from the same byte in the row above.
    Up = 2,
    /// Difference from the floor-average of left and above.
    Average = 3,
    /// Difference from the Paeth prediction of left, above and upper-left.
    Paeth = 4,
}

impl FilterType {
    /// All filter types in ascending ordinal order.
    pub const ALL: [FilterType; 5] = [
        FilterType::None,
        FilterType::Sub,
        FilterType::Up,
        FilterType::Average,
        FilterType::Paeth,
    ];

    /// The byte written in front of a scanline using this filter.
    #[inline]
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for FilterType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        FilterType::ALL.get(value as usize).copied().ok_or(value)
    }
}

/// Paeth predictor: pick whichever of left (`a`), above (`b`) or upper-left
/// (`c`) is closest to `a + b - c`, preferring `a`, then `b`.
#[inline]
pub fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Filter `row` against `prev` (the raw row above) into `out`.
///
/// `bpp` is the number of bytes per pixel. Neighbours that fall outside the
/// image (left of the first pixel, above the first row) read as zero; callers
/// pass an all-zero `prev` for the first row. `out` is cleared first and does
/// not include the filter type byte.
pub fn apply_filter(filter: FilterType, row: &[u8], prev: &[u8], bpp: usize, out: &mut Vec<u8>) {
    debug_assert_eq!(row.len(), prev.len());
    out.clear();
    out.reserve(row.len());

    match filter {
        FilterType::None => out.extend_from_slice(row),
        FilterType::Sub => {
            for (i, &x) in row.iter().enumerate() {
                let left = if i >= bpp { row[i - bpp] } else { 0 };
                out.push(x.wrapping_sub(left));
            }
        }
        FilterType::Up => {
            out.extend(row.iter().zip(prev).map(|(&x, &up)| x.wrapping_sub(up)));
        }
        FilterType::Average => {
            for (i, &x) in row.iter().enumerate() {
                let left = if i >= bpp { row[i - bpp] as u16 } else { 0 };
                let up = prev[i] as u16;
                out.push(x.wrapping_sub(((left + up) / 2) as u8));
            }
        }
        FilterType::Paeth => {
            for (i, &x) in row.iter().enumerate() {
                let (left, upper_left) = if i >= bpp {
                    (row[i - bpp], prev[i - bpp])
                } else {
                    (0, 0)
                };
                out.push(x.wrapping_sub(paeth_predictor(left, prev[i], upper_left)));
            }
        }
    }
}

/// Sum of the filtered bytes read as signed magnitudes.
///
/// A byte of 0xFF counts as 1, 0x80 as 128.
#[inline]
pub fn signed_magnitude_sum(filtered: &[u8]) -> u64 {
    filtered
        .iter()
        .map(|&b| (b as i8).unsigned_abs() as u64)
        .sum()
}
