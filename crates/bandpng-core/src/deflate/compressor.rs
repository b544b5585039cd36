//! Streaming raw-DEFLATE compressor for a single band.

use flate2::{Compress, Compression, FlushCompress, Status};

use crate::encode::{CompressionLevel, EncodeError};

/// Spare output capacity kept available before each compressor call.
const MIN_SPARE_OUTPUT: usize = 32 * 1024;

/// Raw DEFLATE compressor (no zlib framing) fed incrementally.
///
/// A band compressor is created per band. Bands other than the last end with
/// [`sync_flush`](Self::sync_flush), which pads to a byte boundary without
/// marking the final block, so the next band's output can be appended
/// directly. The last band calls [`finish`](Self::finish).
pub struct BandCompressor {
    inner: Compress,
}

impl BandCompressor {
    pub fn new(level: CompressionLevel) -> Self {
        Self {
            inner: Compress::new(Compression::new(level.value() as u32), false),
        }
    }

    /// Feed `input`, appending whatever compressed output is ready to `out`.
    pub fn write(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.run(input, out, FlushCompress::None)
    }

    /// Flush pending output to a byte boundary, leaving the stream open.
    pub fn sync_flush(&mut self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.run(&[], out, FlushCompress::Sync)
    }

    /// Write the final block and close the stream.
    pub fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.run(&[], out, FlushCompress::Finish)
    }

    /// Total uncompressed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        self.inner.total_in()
    }

    fn run(
        &mut self,
        mut input: &[u8],
        out: &mut Vec<u8>,
        flush: FlushCompress,
    ) -> Result<(), EncodeError> {
        let finishing = matches!(flush, FlushCompress::Finish);

        loop {
            if out.capacity() - out.len() < MIN_SPARE_OUTPUT {
                out.reserve(MIN_SPARE_OUTPUT.max(input.len() / 2));
            }

            let before_in = self.inner.total_in();
            let before_out = self.inner.total_out();
            let status = self
                .inner
                .compress_vec(input, out, flush)
                .map_err(|e| EncodeError::CompressionFailed(e.to_string()))?;
            let consumed = (self.inner.total_in() - before_in) as usize;
            let produced = self.inner.total_out() - before_out;
            input = &input[consumed..];

            if matches!(status, Status::StreamEnd) {
                return Ok(());
            }

            let output_full = out.len() == out.capacity();
            // A flush is complete once all input is in and the compressor
            // stopped with output space left over.
            if !finishing && input.is_empty() && !output_full {
                return Ok(());
            }
            if consumed == 0 && produced == 0 && !output_full {
                return Err(EncodeError::CompressionFailed(
                    "compressor stopped making progress".to_string(),
                ));
            }
        }
    }
}

/// Compress one band's filtered bytes.
///
/// `last` selects how the band is terminated: a sync flush for every band
/// but the last, a final block for the last.
pub fn compress_band(
    data: &[u8],
    level: CompressionLevel,
    last: bool,
) -> Result<Vec<u8>, EncodeError> {
    let mut compressor = BandCompressor::new(level);
    let mut out = Vec::with_capacity(data.len() / 2 + 64);

    compressor.write(data, &mut out)?;
    if last {
        compressor.finish(&mut out)?;
    } else {
        compressor.sync_flush(&mut out)?;
    }
    Ok(out)
}
