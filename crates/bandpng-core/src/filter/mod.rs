//! Scanline filtering.
//!
//! Before compression every row is passed through one of the five standard
//! predictors (None, Sub, Up, Average, Paeth) and prefixed with a byte naming
//! the predictor used.
//!
//! # Selection Heuristic
//!
//! For each row all five filters are evaluated. Filtered bytes are read as
//! two's-complement values and their absolute values summed; the filter with
//! the smallest sum is chosen, ties going to the lowest filter type
//! (None < Sub < Up < Average < Paeth). Golden-output tests depend on this
//! exact rule, so it must not be swapped for a different estimator.

mod predictor;
mod scanline;

pub use predictor::{apply_filter, paeth_predictor, signed_magnitude_sum, FilterType};
pub use scanline::{filter_raster, filter_row, FilteredScanlines, Scanline};
