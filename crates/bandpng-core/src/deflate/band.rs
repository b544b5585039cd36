//! Row bands: the unit of parallel compression.

/// Uncompressed bytes a band should hold before another band is worth
/// starting. Each band restarts the compressor's dictionary, so very small
/// bands cost ratio for no speed gain.
pub const TARGET_BAND_BYTES: usize = 128 * 1024;

/// A contiguous range of rows `[start, end)` compressed by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Position of this band in row order.
    pub index: usize,
    pub start: u32,
    pub end: u32,
}

impl Band {
    /// Number of rows in the band.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.end - self.start
    }
}

/// Split `[0, height)` into `min(bands, height)` contiguous bands.
///
/// Row counts differ by at most one and earlier bands are never smaller
/// than later ones. At least one band is always returned for a non-empty
/// image; an empty image yields none.
pub fn partition_rows(height: u32, bands: usize) -> Vec<Band> {
    if height == 0 {
        return Vec::new();
    }

    let count = bands.clamp(1, height as usize) as u32;
    let base = height / count;
    let remainder = height % count;

    let mut partition = Vec::with_capacity(count as usize);
    let mut start = 0;
    for index in 0..count {
        let rows = base + u32::from(index < remainder);
        partition.push(Band {
            index: index as usize,
            start,
            end: start + rows,
        });
        start += rows;
    }
    partition
}

/// Number of bands to split an image of `height` rows into, where every
/// row takes `stride` bytes once filtered.
///
/// Depends only on the image, never on how many threads happen to be
/// available, so the compressed bytes are the same on every machine and
/// with threading on or off. Every band boundary leaves a sync-flush marker
/// and a dictionary reset in the stream, so sizing bands by worker count
/// (one band per core, or a single band when threading is off) would make
/// the output vary with the host. The thread count only decides where the
/// planned bands run.
pub fn plan_band_count(height: u32, stride: usize) -> usize {
    let total = (height as usize).saturating_mul(stride);
    total.div_ceil(TARGET_BAND_BYTES).clamp(1, height.max(1) as usize)
}

/// Check that `bands` cover `[0, height)` in order with no gaps or overlaps.
pub fn is_partition(bands: &[Band], height: u32) -> bool {
    let mut expected_start = 0;
    for (i, band) in bands.iter().enumerate() {
        if band.index != i || band.start != expected_start || band.end <= band.start {
            return false;
        }
        expected_start = band.end;
    }
    !bands.is_empty() && expected_start == height
}
