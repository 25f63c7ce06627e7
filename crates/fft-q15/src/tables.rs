//! Typed views over the tables `build.rs` generates into `$OUT_DIR`.
//!
//! The raw arrays are plain `i16`/`(u16, u16)` data (see `build.rs`); this
//! module is the only place that reinterprets them as [`Q15`]/[`ComplexQ15`]
//! and indexes them with the strides `limits::size_info` computes.

use crate::q15::{ComplexQ15, Q15};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/tables.rs"));
}

/// `A[k] = (re, im)` real-FFT post-processing coefficient at full `MAX_N`
/// resolution; index with `k * real_modifier` for a transform of length `n`.
pub fn real_coef_a(idx: usize) -> ComplexQ15 {
    ComplexQ15::new(
        Q15(generated::REAL_COEF_A[2 * idx]),
        Q15(generated::REAL_COEF_A[2 * idx + 1]),
    )
}

pub fn real_coef_b(idx: usize) -> ComplexQ15 {
    ComplexQ15::new(
        Q15(generated::REAL_COEF_B[2 * idx]),
        Q15(generated::REAL_COEF_B[2 * idx + 1]),
    )
}

/// Shared complex-FFT twiddle `W_MAX_M^idx = (cos, -sin)`. Indices up to
/// `3 * MAX_M / 2 - 1` are valid; every radix-4 stage at every supported
/// size stays within that range (see `cfft::radix4_dif`).
pub fn cfft_twiddle(idx: usize) -> ComplexQ15 {
    ComplexQ15::new(
        Q15(generated::CFFT_TWIDDLE[2 * idx]),
        Q15(generated::CFFT_TWIDDLE[2 * idx + 1]),
    )
}

/// Bit-reversal pairs for a complex FFT of length `m`.
pub fn bitrev_pairs(m: usize) -> &'static [(u16, u16)] {
    match m {
        2048 => &generated::BITREV_M2048,
        4096 => &generated::BITREV_M4096,
        _ => &[],
    }
}
