//! Radix-4 / radix-4-by-2 decimation-in-frequency complex FFT (spec.md
//! §4.3.2).
//!
//! Each stage combines four samples spaced `quarter = size/4` apart with the
//! textbook DFT-4 matrix (`t0=a+c, t1=a-c, t2=b+d, t3=j*(b-d)`), applies the
//! stage's three twiddles, and right-shifts every output by 2 — the "1/4
//! attenuation per stage" that keeps Q15 accumulators from overflowing.
//! `size` starts at `m` and is quartered each pass until it reaches 4.
//!
//! When `m` isn't a pure power of four (`m = 2 * 4^s`), one radix-2 stage
//! (`radix2_preprocess`) first halves the problem into two independent
//! `m/2`-point (pure radix-4) sub-transforms; its own scale-down already
//! lands on the same overall 1/m attenuation the pure path reaches, so no
//! further post-scale is applied.

use crate::limits::size_info;
use crate::q15::ComplexQ15;
use crate::tables::cfft_twiddle;

fn twiddle(idx: usize, cplx_modifier: usize) -> ComplexQ15 {
    cfft_twiddle(idx * cplx_modifier)
}

/// One radix-4 DIF stage over every group of `size` samples in `buf`.
/// `cplx_modifier` is the caller's stride into the shared twiddle table
/// (see `limits::SizeInfo::cplx_modifier`); `table_m` is the *local*
/// complex length this stage's own twiddle angles are relative to.
fn radix4_stage(buf: &mut [ComplexQ15], size: usize, table_m: usize, cplx_modifier: usize) {
    let quarter = size / 4;
    let groups = buf.len() / size;
    let stride = table_m / size;

    for g in 0..groups {
        let base = g * size;
        for n in 0..quarter {
            let w1 = twiddle(n * stride, cplx_modifier);
            let w2 = twiddle(2 * n * stride, cplx_modifier);
            let w3 = twiddle(3 * n * stride, cplx_modifier);

            let a = buf[base + n];
            let b = buf[base + n + quarter];
            let c = buf[base + n + 2 * quarter];
            let d = buf[base + n + 3 * quarter];

            let t0 = a.add(c);
            let t1 = a.sub(c);
            let t2 = b.add(d);
            let t3 = b.sub(d).mul_j();

            let y_sum = t0.add(t2).scale_down(2);
            let y_tw2 = t0.sub(t2).mul(w2).scale_down(2);
            let y_tw1 = t1.sub(t3).mul(w1).scale_down(2);
            let y_tw3 = t1.add(t3).mul(w3).scale_down(2);

            buf[base + n] = y_sum;
            buf[base + n + quarter] = y_tw2;
            buf[base + n + 2 * quarter] = y_tw1;
            buf[base + n + 3 * quarter] = y_tw3;
        }
    }
}

/// Pure radix-4 DIF: requires `m` to be a power of four.
fn radix4_dif(buf: &mut [ComplexQ15], m: usize, cplx_modifier: usize) {
    let mut size = m;
    while size >= 4 {
        radix4_stage(buf, size, m, cplx_modifier);
        size /= 4;
    }
}

/// One radix-2 DIF stage over the whole buffer at `size = m`: halves the
/// problem and folds in the twiddle multiply on the "difference" half.
fn radix2_preprocess(buf: &mut [ComplexQ15], m: usize, table_m: usize, cplx_modifier: usize) {
    let half = m / 2;
    let stride = table_m / m;
    for k in 0..half {
        let w = twiddle(k * stride, cplx_modifier);
        let u = buf[k];
        let v = buf[k + half];
        buf[k] = u.add(v).scale_down(1);
        buf[k + half] = u.sub(v).mul(w).scale_down(1);
    }
}

/// Radix-4-by-2: one radix-2 preprocessing stage splits `m = 2*4^s` into two
/// independent `m/2`-point (pure power-of-four) sub-transforms, each run
/// through `radix4_dif`. `radix2_preprocess`'s own `scale_down(1)` plus the
/// two `radix4_dif` passes already land on the same overall 1/m attenuation
/// the pure radix-4 path reaches; no further post-scale is needed.
fn radix4_by_2_dif(buf: &mut [ComplexQ15], m: usize, cplx_modifier: usize) {
    radix2_preprocess(buf, m, m, cplx_modifier);
    let half = m / 2;
    // Each half is its own `half`-point (pure power-of-four) sub-transform,
    // which needs twice the angular resolution the full-length `m` problem
    // did (MAX_M/half = 2 * MAX_M/m), so the modifier doubles accordingly.
    let (lo, hi) = buf.split_at_mut(half);
    radix4_dif(lo, half, cplx_modifier * 2);
    radix4_dif(hi, half, cplx_modifier * 2);
}

/// Runs the complex FFT of length `n/2` in place over `buf[..n/2]`, in
/// whichever of the two decompositions `m = n/2` calls for, then applies the
/// bit-reversal permutation unless `skip_bit_reverse` is set (the real FFT
/// driver permutes itself so it can fuse the work with post-processing).
pub fn cfft(buf: &mut [ComplexQ15], n: usize, skip_bit_reverse: bool) -> crate::error::Result<()> {
    let info = size_info(n)?;
    if buf.len() < info.m {
        return Err(crate::error::FftError::NullPointer);
    }
    let work = &mut buf[..info.m];
    if info.is_pure_radix4() {
        radix4_dif(work, info.m, info.cplx_modifier);
    } else {
        radix4_by_2_dif(work, info.m, info.cplx_modifier);
    }
    if !skip_bit_reverse {
        crate::bitrev::permute(work, info.m);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::q15::Q15;
    use std::vec::Vec;

    fn dc_impulse(m: usize) -> Vec<ComplexQ15> {
        let mut v = std::vec![ComplexQ15::ZERO; m];
        v[0] = ComplexQ15::new(Q15::from_f32(0.5), Q15::ZERO);
        v
    }

    #[test]
    fn impulse_produces_flat_spectrum_pure_radix4() {
        // n = 8192 -> m = 4096 = 4^6, pure radix-4 path.
        let mut buf = dc_impulse(4096);
        cfft(&mut buf, 8192, false).unwrap();
        let first = buf[0].re.to_f32();
        assert!(first.abs() > 0.0);
        for sample in &buf[1..] {
            assert!((sample.re.to_f32() - first).abs() < 0.05);
            assert!(sample.im.to_f32().abs() < 0.05);
        }
        // An impulse of amplitude 0.5 must attenuate by exactly 1/m.
        let expected = 0.5 / 4096.0;
        assert!((first - expected).abs() < 0.05, "first={first} expected={expected}");
    }

    #[test]
    fn impulse_produces_flat_spectrum_radix4_by_2() {
        // n = 4096 -> m = 2048 = 2*4^5, radix-4-by-2 path.
        let mut buf = dc_impulse(2048);
        cfft(&mut buf, 4096, false).unwrap();
        let first = buf[0].re.to_f32();
        assert!(first.abs() > 0.0);
        for sample in &buf[1..] {
            assert!((sample.re.to_f32() - first).abs() < 0.05);
        }
        // Matches the pure radix-4 path's 1/m attenuation, not 2/m: the
        // radix-2 preprocessing stage must not be double-scaled.
        let expected = 0.5 / 2048.0;
        assert!((first - expected).abs() < 0.05, "first={first} expected={expected}");
    }

    #[test]
    fn rejects_unsupported_size() {
        let mut buf = std::vec![ComplexQ15::ZERO; 16];
        assert_eq!(cfft(&mut buf, 32, false), Err(crate::error::FftError::InvalidSize));
    }
}
