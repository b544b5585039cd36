//! Per-row filter selection and the filtered scanline buffer.

use super::predictor::{apply_filter, signed_magnitude_sum, FilterType};
use crate::encode::EncodeError;
use crate::raster::{extract_row, filtered_len, row_len, Raster};

/// One filtered row, borrowed from a [`FilteredScanlines`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanline<'a> {
    /// Row index in the source raster.
    pub row: u32,
    /// Filter applied to this row.
    pub filter: FilterType,
    /// Filtered bytes, without the leading filter type byte.
    pub bytes: &'a [u8],
}

/// All filtered scanlines of an image, laid out exactly as they are fed to
/// the compressor: each row is one filter type byte followed by the filtered
/// row bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredScanlines {
    data: Vec<u8>,
    row_len: usize,
    rows: u32,
}

impl FilteredScanlines {
    fn with_capacity(row_len: usize, rows: u32, capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            row_len,
            rows,
        }
    }

    /// Raw row length in bytes, excluding the filter type byte.
    pub fn row_len(&self) -> usize {
        self.row_len
    }

    /// Bytes each row occupies in [`as_bytes`](Self::as_bytes).
    pub fn stride(&self) -> usize {
        self.row_len + 1
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// The full filtered stream.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Filtered bytes for rows `start..end`, filter type bytes included.
    pub fn rows_bytes(&self, start: u32, end: u32) -> &[u8] {
        let stride = self.stride();
        &self.data[start as usize * stride..end as usize * stride]
    }

    /// Scanline for row `row`.
    pub fn scanline(&self, row: u32) -> Scanline<'_> {
        let line = self.rows_bytes(row, row + 1);
        Scanline {
            row,
            // Only ever written from a FilterType, so the conversion holds.
            filter: FilterType::try_from(line[0]).unwrap_or(FilterType::None),
            bytes: &line[1..],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Scanline<'_>> {
        (0..self.rows).map(move |row| self.scanline(row))
    }

    /// Filter chosen for every row, in row order.
    pub fn filters(&self) -> Vec<FilterType> {
        self.iter().map(|line| line.filter).collect()
    }

    fn push(&mut self, filter: FilterType, bytes: &[u8]) {
        self.data.push(filter.as_byte());
        self.data.extend_from_slice(bytes);
    }
}

/// Scratch space reused across rows so selection does not allocate per row.
struct FilterScratch {
    candidate: Vec<u8>,
    best: Vec<u8>,
}

impl FilterScratch {
    fn new(row_len: usize) -> Self {
        Self {
            candidate: Vec::with_capacity(row_len),
            best: Vec::with_capacity(row_len),
        }
    }
}

/// Pick the filter for one row and leave its output in `scratch.best`.
///
/// Every filter is tried; the one with the smallest signed-magnitude sum
/// wins and ties go to the lowest ordinal.
fn select_into(row: &[u8], prev: &[u8], bpp: usize, scratch: &mut FilterScratch) -> FilterType {
    let mut best_filter = FilterType::None;
    let mut best_cost = u64::MAX;

    for filter in FilterType::ALL {
        apply_filter(filter, row, prev, bpp, &mut scratch.candidate);
        let cost = signed_magnitude_sum(&scratch.candidate);
        if cost < best_cost {
            best_cost = cost;
            best_filter = filter;
            std::mem::swap(&mut scratch.best, &mut scratch.candidate);
        }
    }

    best_filter
}

/// Filter a single row, choosing the filter by the minimum signed-magnitude
/// sum heuristic.
///
/// `prev` is the raw row above, or `None` for the first row.
///
/// Returns the chosen filter and the filtered bytes.
pub fn filter_row(row: &[u8], prev: Option<&[u8]>, bpp: usize) -> (FilterType, Vec<u8>) {
    let zero_row;
    let prev = match prev {
        Some(prev) => prev,
        None => {
            zero_row = vec![0u8; row.len()];
            &zero_row
        }
    };

    let mut scratch = FilterScratch::new(row.len());
    let filter = select_into(row, prev, bpp, &mut scratch);
    (filter, scratch.best)
}

/// Extract and filter every row of `raster`.
pub fn filter_raster<R: Raster + ?Sized>(raster: &R) -> Result<FilteredScanlines, EncodeError> {
    let len = row_len(raster)?;
    let bpp = raster.color_format().channels();
    let height = raster.height();
    let total = filtered_len(raster.width(), height, bpp)?;

    let mut output = FilteredScanlines::with_capacity(len, height, total);
    let mut scratch = FilterScratch::new(len);
    let mut prev = vec![0u8; len];
    let mut current = Vec::with_capacity(len);

    for y in 0..height {
        extract_row(raster, y, &mut current)?;
        let filter = select_into(&current, &prev, bpp, &mut scratch);
        output.push(filter, &scratch.best);
        std::mem::swap(&mut prev, &mut current);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{ColorFormat, RasterView};

    #[test]
    fn test_all_zero_row_picks_none() {
        // Every filter costs zero; the tie goes to None
        let (filter, bytes) = filter_row(&[0; 6], None, 3);
        assert_eq!(filter, FilterType::None);
        assert_eq!(bytes, vec![0; 6]);
    }

    #[test]
    fn test_constant_row_picks_sub() {
        // None costs 4 * 50; Sub leaves only the first byte
        let (filter, bytes) = filter_row(&[50, 50, 50, 50], None, 1);
        assert_eq!(filter, FilterType::Sub);
        assert_eq!(bytes, vec![50, 0, 0, 0]);
    }

    #[test]
    fn test_repeated_row_picks_up() {
        let row = [7, 90, 33, 140];
        let (filter, bytes) = filter_row(&row, Some(&row), 1);
        assert_eq!(filter, FilterType::Up);
        assert_eq!(bytes, vec![0; 4]);
    }

    #[test]
    fn test_sub_beats_paeth_on_tie() {
        // First row: Sub and Paeth produce identical output
        let (filter, _) = filter_row(&[1, 2, 3, 4], None, 1);
        assert_eq!(filter, FilterType::Sub);
    }

    #[test]
    fn test_small_signed_values_count_as_small() {
        // Sub gives [100, 1, 255, 1]: the 255 counts as 1, not 255
        let (filter, bytes) = filter_row(&[100, 101, 100, 101], None, 1);
        assert_eq!(filter, FilterType::Sub);
        assert_eq!(bytes, vec![100, 1, 255, 1]);
    }

    #[test]
    fn test_filter_raster_layout() {
        let data: Vec<u8> = vec![
            10, 10, 10, //
            10, 10, 10, //
        ];
        let view = RasterView::new(&data, 3, 2, ColorFormat::Gray8).unwrap();
        let filtered = filter_raster(&view).unwrap();

        assert_eq!(filtered.rows(), 2);
        assert_eq!(filtered.row_len(), 3);
        assert_eq!(filtered.stride(), 4);
        assert_eq!(filtered.as_bytes().len(), 8);
        assert_eq!(filtered.filters(), vec![FilterType::Sub, FilterType::Up]);
        assert_eq!(filtered.as_bytes(), &[1, 10, 0, 0, 2, 0, 0, 0]);

        let second = filtered.scanline(1);
        assert_eq!(second.row, 1);
        assert_eq!(second.bytes, &[0, 0, 0]);
    }

    #[test]
    fn test_filter_raster_matches_filter_row() {
        let data: Vec<u8> = (0..4 * 5 * 4).map(|i| ((i * 37) % 251) as u8).collect();
        let view = RasterView::new(&data, 4, 5, ColorFormat::Rgba8).unwrap();
        let filtered = filter_raster(&view).unwrap();

        let mut prev: Option<&[u8]> = None;
        for (y, line) in filtered.iter().enumerate() {
            let row = &data[y * 16..(y + 1) * 16];
            let (filter, bytes) = filter_row(row, prev, 4);
            assert_eq!(line.filter, filter, "row {y}");
            assert_eq!(line.bytes, bytes.as_slice(), "row {y}");
            prev = Some(row);
        }
    }

    #[test]
    fn test_filter_selection_is_deterministic() {
        let data: Vec<u8> = (0..30 * 20 * 3).map(|i| ((i * i) % 256) as u8).collect();
        let view = RasterView::new(&data, 30, 20, ColorFormat::Rgb8).unwrap();
        let first = filter_raster(&view).unwrap();
        let second = filter_raster(&view).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rows_bytes_slices_whole_rows() {
        let data = vec![0u8; 2 * 3];
        let view = RasterView::new(&data, 2, 3, ColorFormat::Gray8).unwrap();
        let filtered = filter_raster(&view).unwrap();
        assert_eq!(filtered.rows_bytes(1, 3).len(), 2 * filtered.stride());
    }
}
