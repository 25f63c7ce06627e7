//! Real FFT: N real Q15 samples in, N/2+1 complex Q15 bins out (spec.md
//! §4.3.1, §4.3.3).
//!
//! The N real samples are packed two-per-complex-sample into an M=N/2
//! complex sequence, run through [`crate::cfft`], then unmixed back into
//! the N/2+1 independent real-spectrum bins with the A/B twiddle
//! coefficients: `X[k] = A[k]*Z[k] + B[k]*conj(Z[(M-k) mod M])`. Bin 0 and
//! bin N/2 fall out of that recombination with an imaginary part of exactly
//! zero (DC and Nyquist are real for a real-valued input), which is the
//! property `rfft_init` trades on to hand back `N/2 + 1` bins instead of
//! `N/2` redundant complex ones.

use crate::cfft::cfft;
use crate::error::Result;
use crate::limits::{size_info, SizeInfo};
use crate::q15::{ComplexQ15, Q15};
use crate::tables::{real_coef_a, real_coef_b};

/// An initialized real-FFT plan for one transform length, mirroring the
/// "init once, reuse across many calls" `rfft_init`/`rfft` split from
/// spec.md §6.
#[derive(Debug, Clone, Copy)]
pub struct RfftPlan {
    info: SizeInfo,
}

impl RfftPlan {
    /// Selects the twiddle-table strides for `n` real samples. Fails with
    /// `InvalidSize` for anything other than the supported lengths.
    pub fn new(n: usize) -> Result<Self> {
        let info = size_info(n)?;
        log::trace!("rfft_init: n={} m={} pure_radix4={}", info.n, info.m, info.is_pure_radix4());
        Ok(Self { info })
    }

    pub fn n(&self) -> usize {
        self.info.n
    }

    pub fn bin_count(&self) -> usize {
        self.info.n / 2 + 1
    }

    /// Packs `input` (length `n`) into `scratch` (length >= `m`), runs the
    /// complex FFT, and writes the `n/2+1` real-spectrum bins into `out`.
    pub fn forward(
        &self,
        input: &[Q15],
        scratch: &mut [ComplexQ15],
        out: &mut [ComplexQ15],
    ) -> Result<()> {
        let m = self.info.m;
        if input.len() < self.info.n || scratch.len() < m || out.len() < self.bin_count() {
            return Err(crate::error::FftError::NullPointer);
        }

        for k in 0..m {
            scratch[k] = ComplexQ15::new(input[2 * k], input[2 * k + 1]);
        }
        cfft(scratch, self.info.n, false)?;

        let modifier = self.info.real_modifier;
        for k in 0..m {
            let z_k = scratch[k];
            let z_conj = scratch[(m - k) % m].conj();
            let a = real_coef_a(k * modifier);
            let b = real_coef_b(k * modifier);
            out[k] = a.mul(z_k).add(b.mul(z_conj));
        }
        // Nyquist bin: X[m] = Xeven[0] - Xodd[0], both already real since
        // Xeven[0]=Re(Z[0]), Xodd[0]=Im(Z[0]).
        let z0 = scratch[0];
        out[m] = ComplexQ15::new(z0.re.saturating_sub(z0.im), Q15::ZERO);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec;
    use std::vec::Vec;

    fn dc_samples(n: usize, level: f32) -> Vec<Q15> {
        vec![Q15::from_f32(level); n]
    }

    #[test]
    fn dc_input_concentrates_energy_in_bin_zero() {
        let plan = RfftPlan::new(4096).unwrap();
        let input = dc_samples(4096, 0.3);
        let mut scratch = vec![ComplexQ15::ZERO; plan.info.m];
        let mut out = vec![ComplexQ15::ZERO; plan.bin_count()];
        plan.forward(&input, &mut scratch, &mut out).unwrap();

        let dc_mag = out[0].mag_squared();
        for bin in &out[1..] {
            assert!(bin.mag_squared() <= dc_mag);
        }
    }

    #[test]
    fn dc_and_nyquist_bins_have_zero_imaginary_part() {
        let plan = RfftPlan::new(8192).unwrap();
        let input = dc_samples(8192, 0.1);
        let mut scratch = vec![ComplexQ15::ZERO; plan.info.m];
        let mut out = vec![ComplexQ15::ZERO; plan.bin_count()];
        plan.forward(&input, &mut scratch, &mut out).unwrap();

        assert_eq!(out[0].im, Q15::ZERO);
        assert_eq!(out[plan.info.m].im, Q15::ZERO);
    }

    #[test]
    fn rejects_short_input() {
        let plan = RfftPlan::new(4096).unwrap();
        let input = vec![Q15::ZERO; 10];
        let mut scratch = vec![ComplexQ15::ZERO; plan.info.m];
        let mut out = vec![ComplexQ15::ZERO; plan.bin_count()];
        assert_eq!(
            plan.forward(&input, &mut scratch, &mut out),
            Err(crate::error::FftError::NullPointer)
        );
    }
}
