//! Thin pointer-taking wrappers matching the `rfft_init`/`rfft`/`cfft`/
//! `find_top_bins` surface named in spec.md §6, for callers (the consumer
//! component's worker thread) that hold raw buffer pointers rather than
//! owned Rust slices. Every function turns a null or undersized pointer
//! into `FftError::NullPointer` instead of dereferencing it.

use crate::cfft::cfft as cfft_impl;
use crate::error::{FftError, Result};
use crate::q15::{ComplexQ15, Q15};
use crate::rfft::RfftPlan;
use crate::topbins::{find_top_bins as find_top_bins_impl, BinRecord};

/// `rfft_init`: selects the twiddle tables for `n` without touching any
/// buffers.
pub fn rfft_init(n: usize) -> Result<RfftPlan> {
    RfftPlan::new(n)
}

/// `rfft`: runs `plan` over `input_ptr`/`input_len` real samples, using
/// `scratch_ptr`/`scratch_len` complex samples of working space, and
/// writes `plan.bin_count()` complex bins to `out_ptr`/`out_len`.
///
/// # Safety
/// `input_ptr` must be valid for reads of `input_len` `Q15`s, `scratch_ptr`
/// and `out_ptr` must be valid for reads and writes of their stated
/// lengths, and none of the three regions may overlap.
pub unsafe fn rfft(
    plan: &RfftPlan,
    input_ptr: *const Q15,
    input_len: usize,
    scratch_ptr: *mut ComplexQ15,
    scratch_len: usize,
    out_ptr: *mut ComplexQ15,
    out_len: usize,
) -> Result<()> {
    if input_ptr.is_null() || scratch_ptr.is_null() || out_ptr.is_null() {
        return Err(FftError::NullPointer);
    }
    let input = core::slice::from_raw_parts(input_ptr, input_len);
    let scratch = core::slice::from_raw_parts_mut(scratch_ptr, scratch_len);
    let out = core::slice::from_raw_parts_mut(out_ptr, out_len);
    plan.forward(input, scratch, out)
}

/// `cfft`: in-place complex FFT over `buf_ptr`/`buf_len` for a transform of
/// real length `n` (complex length `n/2`).
///
/// # Safety
/// `buf_ptr` must be valid for reads and writes of `buf_len` `ComplexQ15`s.
pub unsafe fn cfft(buf_ptr: *mut ComplexQ15, buf_len: usize, n: usize) -> Result<()> {
    if buf_ptr.is_null() {
        return Err(FftError::NullPointer);
    }
    let buf = core::slice::from_raw_parts_mut(buf_ptr, buf_len);
    cfft_impl(buf, n, false)
}

/// `find_top_bins`: runs `rfft_init`+`rfft` over `src_ptr`/`n` raw Q15
/// samples and writes up to `k` winning bins into `out_ptr`/`out_cap`,
/// returning how many were written. Matches spec.md §6's
/// `find_top_bins(src[N], N, K, out[K])` surface exactly; the FFT itself
/// runs against the crate's internal static scratch buffers (see
/// `topbins::find_top_bins`), so this is not reentrant.
///
/// # Safety
/// `src_ptr` must be valid for reads of `n` `Q15`s and `out_ptr` valid for
/// writes of `out_cap` `BinRecord`s.
pub unsafe fn find_top_bins(
    src_ptr: *const Q15,
    n: usize,
    k: usize,
    out_ptr: *mut BinRecord,
    out_cap: usize,
) -> Result<usize> {
    if src_ptr.is_null() || out_ptr.is_null() {
        return Err(FftError::NullPointer);
    }
    let src = core::slice::from_raw_parts(src_ptr, n);
    let out = core::slice::from_raw_parts_mut(out_ptr, out_cap);
    find_top_bins_impl(src, n, k, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfft_rejects_null_input_pointer() {
        let plan = rfft_init(4096).unwrap();
        let mut scratch = [ComplexQ15::ZERO; 2048];
        let mut out = [ComplexQ15::ZERO; 2049];
        let result = unsafe {
            rfft(
                &plan,
                core::ptr::null(),
                4096,
                scratch.as_mut_ptr(),
                scratch.len(),
                out.as_mut_ptr(),
                out.len(),
            )
        };
        assert_eq!(result, Err(FftError::NullPointer));
    }

    #[test]
    fn cfft_rejects_null_buffer_pointer() {
        let result = unsafe { cfft(core::ptr::null_mut(), 2048, 4096) };
        assert_eq!(result, Err(FftError::NullPointer));
    }

    #[test]
    fn find_top_bins_rejects_null_src_pointer() {
        let mut out = [BinRecord::default(); 1];
        let result =
            unsafe { find_top_bins(core::ptr::null(), 4096, 1, out.as_mut_ptr(), out.len()) };
        assert_eq!(result, Err(FftError::NullPointer));
    }
}
