use thiserror::Error;

/// Failure modes for the FFT pipeline (spec.md §6: `rfft_init`/`rfft`/`cfft`/
/// `find_top_bins` return codes `INVALID_SIZE`/`NULL_POINTER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FftError {
    /// Requested transform length isn't one of the supported sizes.
    #[error("unsupported FFT length")]
    InvalidSize,
    /// A required buffer pointer/slice was null or too short.
    #[error("null or undersized buffer")]
    NullPointer,
    /// `find_top_bins` was asked for more bins than the spectrum has.
    #[error("requested bin count exceeds spectrum length")]
    TooManyBins,
}

pub type Result<T> = core::result::Result<T, FftError>;
