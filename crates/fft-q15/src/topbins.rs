//! Top-N magnitude-bin selector (spec.md §4.3.4).
//!
//! Per spec.md §4.3.4, `find_top_bins` takes raw Q15 samples, not a
//! pre-computed spectrum: it copies the input into an internal working
//! buffer, runs the real FFT into an internal output buffer, then scans
//! the resulting bins, skipping DC, and keeps the `k` largest by squared
//! magnitude, insertion-sorted into place as it goes — there's no sense
//! pulling in a general sort for a handful of winners, and no sense
//! reaching for the heap on a hot embedded path: the caller owns only the
//! output storage. Like the reference behavior it mirrors, this is *not
//! reentrant*: the FFT scratch and spectrum live in static buffers shared
//! across calls, not allocated per call.

use crate::error::{FftError, Result};
use crate::limits::MAX_N;
use crate::q15::{ComplexQ15, Q15};
use crate::rfft::RfftPlan;

/// One surviving bin: its index into the spectrum and its squared
/// magnitude (relative ordering only, no need for a square root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinRecord {
    pub index: usize,
    pub magnitude_sq: u32,
}

static mut SCRATCH: [ComplexQ15; MAX_N / 2] = [ComplexQ15::ZERO; MAX_N / 2];
static mut SPECTRUM: [ComplexQ15; MAX_N / 2 + 1] = [ComplexQ15::ZERO; MAX_N / 2 + 1];

/// Runs `rfft_init` + `rfft` over `samples` (length `n`) into the internal
/// static buffers, then keeps the `k` largest-magnitude bins, per
/// spec.md §4.3.4's five-step behavior. Returns `InvalidSize` if `n` is
/// unsupported or `samples.len() != n`.
///
/// # Safety / reentrancy
/// Uses static scratch and spectrum buffers, exactly as spec.md §4.3.4
/// specifies ("Not reentrant (uses static buffers)"): do not call this
/// concurrently from more than one context. The `ffi.rs` surface upholds
/// the same contract for its callers.
pub fn find_top_bins(samples: &[Q15], n: usize, k: usize, out: &mut [BinRecord]) -> Result<usize> {
    if samples.len() != n {
        return Err(FftError::InvalidSize);
    }
    let plan = RfftPlan::new(n)?;
    let m = n / 2;

    // Safety: single-caller-at-a-time usage per the non-reentrancy
    // contract documented above.
    let (scratch, spectrum) = unsafe { (&mut SCRATCH[..m], &mut SPECTRUM[..plan.bin_count()]) };
    plan.forward(samples, scratch, spectrum)?;
    scan_spectrum(spectrum, k, out)
}

/// Fills `out[..k]` with the `k` spectrum bins (excluding bin 0) with the
/// largest magnitude, sorted descending, and returns `k`. `out` must have
/// room for at least `k` records.
fn scan_spectrum(spectrum: &[ComplexQ15], k: usize, out: &mut [BinRecord]) -> Result<usize> {
    if spectrum.len() < 2 {
        return Err(FftError::NullPointer);
    }
    if k > spectrum.len() - 1 || out.len() < k {
        return Err(FftError::TooManyBins);
    }

    let mut filled = 0usize;
    for (index, bin) in spectrum.iter().enumerate().skip(1) {
        let magnitude_sq = bin.mag_squared();
        let mut pos = filled.min(k);
        while pos > 0 && out[pos - 1].magnitude_sq < magnitude_sq {
            pos -= 1;
        }
        if pos < k {
            let end = if filled < k { filled } else { k - 1 };
            let mut i = end;
            while i > pos {
                out[i] = out[i - 1];
                i -= 1;
            }
            out[pos] = BinRecord { index, magnitude_sq };
            if filled < k {
                filled += 1;
            }
        }
    }
    Ok(filled)
}
