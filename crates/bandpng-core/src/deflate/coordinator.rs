//! Fork/join compression of row bands into one zlib stream.

use super::band::{is_partition, partition_rows, plan_band_count, Band};
use super::compressor::compress_band;
use super::zlib::{adler32, zlib_header};
use crate::encode::{CompressionLevel, EncodeError};
use crate::filter::FilteredScanlines;

/// Compress all filtered scanlines into a single zlib stream.
///
/// The band layout comes from [`plan_band_count`], so the output is
/// byte-identical whether `multi_threaded` is set or not.
pub fn compress_scanlines(
    scanlines: &FilteredScanlines,
    level: CompressionLevel,
    multi_threaded: bool,
) -> Result<Vec<u8>, EncodeError> {
    let band_count = plan_band_count(scanlines.rows(), scanlines.stride());
    let bands = partition_rows(scanlines.rows(), band_count);
    compress_bands(scanlines, &bands, level, multi_threaded)
}

/// Compress `scanlines` using an explicit band layout.
///
/// Each band is compressed independently; all but the last end on a sync
/// flush, so their outputs concatenate, in band order, into one DEFLATE
/// stream. The stream is framed with the zlib header and the Adler-32 of the
/// whole uncompressed input.
pub fn compress_bands(
    scanlines: &FilteredScanlines,
    bands: &[Band],
    level: CompressionLevel,
    multi_threaded: bool,
) -> Result<Vec<u8>, EncodeError> {
    if !is_partition(bands, scanlines.rows()) {
        return Err(EncodeError::CompressionFailed(format!(
            "bands do not partition {} rows",
            scanlines.rows()
        )));
    }

    log::debug!(
        "compressing {} rows ({} bytes) in {} band(s) at level {}",
        scanlines.rows(),
        scanlines.as_bytes().len(),
        bands.len(),
        level.value()
    );

    let parts = if multi_threaded && bands.len() > 1 {
        compress_parallel(scanlines, bands, level)?
    } else {
        compress_sequential(scanlines, bands, level)?
    };

    let payload_len: usize = parts.iter().map(Vec::len).sum();
    let mut stream = Vec::with_capacity(2 + payload_len + 4);
    stream.extend_from_slice(&zlib_header(level));
    for part in parts {
        stream.extend(part);
    }
    stream.extend_from_slice(&adler32(scanlines.as_bytes()).to_be_bytes());
    Ok(stream)
}

/// Compress one band; the last band closes the stream.
fn compress_one(
    scanlines: &FilteredScanlines,
    band: &Band,
    level: CompressionLevel,
    band_count: usize,
) -> Result<Vec<u8>, EncodeError> {
    let input = scanlines.rows_bytes(band.start, band.end);
    let last = band.index + 1 == band_count;
    let output = compress_band(input, level, last)?;
    log::trace!(
        "band {} rows {}..{}: {} -> {} bytes",
        band.index,
        band.start,
        band.end,
        input.len(),
        output.len()
    );
    Ok(output)
}

fn compress_sequential(
    scanlines: &FilteredScanlines,
    bands: &[Band],
    level: CompressionLevel,
) -> Result<Vec<Vec<u8>>, EncodeError> {
    bands
        .iter()
        .map(|band| compress_one(scanlines, band, level, bands.len()))
        .collect()
}

#[cfg(feature = "parallel")]
fn compress_parallel(
    scanlines: &FilteredScanlines,
    bands: &[Band],
    level: CompressionLevel,
) -> Result<Vec<Vec<u8>>, EncodeError> {
    use rayon::prelude::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let available = std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1);
    let workers = available.min(bands.len());
    if workers <= 1 {
        return compress_sequential(scanlines, bands, level);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("bandpng-deflate-{i}"))
        .build()
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))?;

    log::debug!("compressing {} bands on {} workers", bands.len(), workers);

    // Results are collected by band index, not completion order.
    pool.install(|| {
        bands
            .par_iter()
            .map(|band| {
                catch_unwind(AssertUnwindSafe(|| {
                    compress_one(scanlines, band, level, bands.len())
                }))
                .unwrap_or_else(|_| {
                    Err(EncodeError::CompressionFailed(format!(
                        "worker for band {} panicked",
                        band.index
                    )))
                })
            })
            .collect()
    })
}

#[cfg(not(feature = "parallel"))]
fn compress_parallel(
    scanlines: &FilteredScanlines,
    bands: &[Band],
    level: CompressionLevel,
) -> Result<Vec<Vec<u8>>, EncodeError> {
    compress_sequential(scanlines, bands, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_raster;
    use crate::raster::{ColorFormat, RasterView};
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    fn scanlines(width: u32, height: u32, format: ColorFormat) -> FilteredScanlines {
        let len = (width * height) as usize * format.channels();
        let data: Vec<u8> = (0..len).map(|i| ((i * 7) ^ (i / 13)) as u8).collect();
        let view = RasterView::new(&data, width, height, format).unwrap();
        filter_raster(&view).unwrap()
    }

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_threaded_and_sequential_identical() {
        // Exact multiple, non-multiple and fewer rows than workers
        for (height, workers) in [(8, 4), (10, 4), (3, 4), (1, 4), (17, 3)] {
            let lines = scanlines(9, height, ColorFormat::Rgb8);
            let bands = partition_rows(height, workers);
            let threaded = compress_bands(&lines, &bands, CompressionLevel::MAX, true).unwrap();
            let sequential =
                compress_bands(&lines, &bands, CompressionLevel::MAX, false).unwrap();
            assert_eq!(threaded, sequential, "height {height}, workers {workers}");
            assert_eq!(inflate(&threaded), lines.as_bytes());
        }
    }

    #[test]
    fn test_any_band_count_decodes() {
        let lines = scanlines(16, 12, ColorFormat::Rgba8);
        for workers in 1..=12 {
            let bands = partition_rows(12, workers);
            let stream = compress_bands(&lines, &bands, CompressionLevel::new(6).unwrap(), true)
                .unwrap();
            assert_eq!(inflate(&stream), lines.as_bytes(), "{workers} bands");
        }
    }

    #[test]
    fn test_single_band_matches_plain_stream() {
        let lines = scanlines(5, 5, ColorFormat::Gray8);
        let stream = compress_scanlines(&lines, CompressionLevel::MAX, true).unwrap();

        let mut expected = zlib_header(CompressionLevel::MAX).to_vec();
        expected.extend(compress_band(lines.as_bytes(), CompressionLevel::MAX, true).unwrap());
        expected.extend_from_slice(&adler32(lines.as_bytes()).to_be_bytes());
        assert_eq!(stream, expected);
    }

    #[test]
    fn test_trailer_is_adler_of_whole_input() {
        let lines = scanlines(20, 9, ColorFormat::GrayAlpha8);
        let bands = partition_rows(9, 3);
        let stream = compress_bands(&lines, &bands, CompressionLevel::MIN, true).unwrap();
        let trailer = &stream[stream.len() - 4..];
        assert_eq!(trailer, &adler32(lines.as_bytes()).to_be_bytes());
    }

    #[test]
    fn test_large_image_uses_several_bands_and_stays_deterministic() {
        // 600 rows * (1 + 300 * 4) bytes is about 704 KiB: six bands
        let lines = scanlines(300, 600, ColorFormat::Rgba8);
        assert_eq!(plan_band_count(lines.rows(), lines.stride()), 6);

        let threaded = compress_scanlines(&lines, CompressionLevel::new(1).unwrap(), true).unwrap();
        let sequential =
            compress_scanlines(&lines, CompressionLevel::new(1).unwrap(), false).unwrap();
        assert_eq!(threaded, sequential);
        assert_eq!(inflate(&threaded), lines.as_bytes());
    }

    #[test]
    fn test_sequential_path_keeps_planned_bands() {
        // Turning threading off must not collapse the image into one band
        let lines = scanlines(300, 600, ColorFormat::Rgba8);
        let level = CompressionLevel::new(1).unwrap();
        let sequential = compress_scanlines(&lines, level, false).unwrap();
        let planned = partition_rows(600, plan_band_count(lines.rows(), lines.stride()));
        let single = partition_rows(600, 1);

        assert_eq!(sequential, compress_bands(&lines, &planned, level, false).unwrap());
        assert_ne!(sequential, compress_bands(&lines, &single, level, false).unwrap());
    }

    #[test]
    fn test_rejects_invalid_partition() {
        let lines = scanlines(4, 4, ColorFormat::Gray8);
        let bands = partition_rows(3, 2);
        let result = compress_bands(&lines, &bands, CompressionLevel::MAX, false);
        assert!(matches!(result, Err(EncodeError::CompressionFailed(_))));
    }
}
