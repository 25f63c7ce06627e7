//! Supported transform sizes (spec.md §4.3.1: "primarily 4096 and 8192").
//!
//! `MAX_N`/`MAX_M` must stay in sync with the identical literals in
//! `build.rs`, which can't depend on this crate to share them.

use crate::error::{FftError, Result};
use static_assertions::const_assert_eq;

pub const MAX_N: usize = 8192;
pub const MAX_M: usize = MAX_N / 2;

const_assert_eq!(MAX_M * 2, MAX_N);

/// One supported real FFT length and its derived complex length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeInfo {
    pub n: usize,
    pub m: usize,
    /// `MAX_N / n`, i.e. the stride into the shared real-coefficient tables.
    pub real_modifier: usize,
    /// `MAX_M / m`, the stride into the shared complex twiddle table.
    pub cplx_modifier: usize,
}

impl SizeInfo {
    /// `true` when `m` is a pure power of four (radix-4 path); `false` when
    /// `m` is `2 * 4^s` (radix-4-by-2 path). spec.md §4.3.2.
    pub fn is_pure_radix4(&self) -> bool {
        self.m.trailing_zeros() % 2 == 0
    }
}

/// Supported real FFT lengths. spec.md §4.3.1 names 4096/8192 as the
/// primary sizes; the generated bit-reversal tables only cover these two,
/// so `size_info` rejects anything else rather than silently extrapolating.
pub const SUPPORTED_N: [usize; 2] = [4096, 8192];

pub fn size_info(n: usize) -> Result<SizeInfo> {
    if !SUPPORTED_N.contains(&n) {
        return Err(FftError::InvalidSize);
    }
    let m = n / 2;
    Ok(SizeInfo {
        n,
        m,
        real_modifier: MAX_N / n,
        cplx_modifier: MAX_M / m,
    })
}
