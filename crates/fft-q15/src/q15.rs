//! Q15 fixed-point scalar: 16-bit signed fractional, range `[-1.0, 1.0)`.
//!
//! Intermediate products use a 32-bit accumulator and narrow back with
//! rounding and saturation, matching the "16-bit signed fractional samples;
//! 32-bit accumulators for products; saturating narrowing" convention.

use core::ops::{Add, Neg, Sub};

/// A single Q15 fixed-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Q15(pub i16);

impl Q15 {
    pub const ZERO: Q15 = Q15(0);
    pub const ONE: Q15 = Q15(i16::MAX);
    pub const MIN: Q15 = Q15(i16::MIN);

    /// Converts a float in `[-1.0, 1.0]` to Q15, rounding to nearest and
    /// saturating at the representable extremes.
    pub fn from_f32(x: f32) -> Self {
        let scaled = (x as f64 * 32768.0).round();
        Q15(saturate_i32(scaled as i64))
    }

    pub fn to_f32(self) -> f32 {
        (self.0 as f32) / 32768.0
    }

    /// Saturating addition.
    pub fn saturating_add(self, rhs: Q15) -> Q15 {
        Q15(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    pub fn saturating_sub(self, rhs: Q15) -> Q15 {
        Q15(self.0.saturating_sub(rhs.0))
    }

    /// Q15 x Q15 -> Q15 multiply: widen to i32, shift right by 15 with
    /// round-half-up, then saturate back to i16.
    pub fn saturating_mul(self, rhs: Q15) -> Q15 {
        let product = (self.0 as i32) * (rhs.0 as i32);
        let rounded = (product + (1 << 14)) >> 15;
        Q15(saturate_i32(rounded as i64))
    }

    /// Arithmetic right shift used by the FFT's per-stage scaling, with
    /// round-half-up on the bit being discarded rather than truncation.
    pub fn scale_down(self, shift: u32) -> Q15 {
        if shift == 0 {
            return self;
        }
        let half = 1i32 << (shift - 1);
        let v = ((self.0 as i32) + half) >> shift;
        Q15(saturate_i32(v as i64))
    }
}

fn saturate_i32(v: i64) -> i16 {
    if v > i16::MAX as i64 {
        i16::MAX
    } else if v < i16::MIN as i64 {
        i16::MIN
    } else {
        v as i16
    }
}

impl Add for Q15 {
    type Output = Q15;
    fn add(self, rhs: Q15) -> Q15 {
        self.saturating_add(rhs)
    }
}

impl Sub for Q15 {
    type Output = Q15;
    fn sub(self, rhs: Q15) -> Q15 {
        self.saturating_sub(rhs)
    }
}

impl Neg for Q15 {
    type Output = Q15;
    fn neg(self) -> Q15 {
        Q15(self.0.saturating_neg())
    }
}

/// A Q15 complex sample, stored as the interleaved `(re, im)` pair the wire
/// format and the FFT buffers both use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComplexQ15 {
    pub re: Q15,
    pub im: Q15,
}

impl ComplexQ15 {
    pub const ZERO: ComplexQ15 = ComplexQ15 { re: Q15::ZERO, im: Q15::ZERO };

    pub fn new(re: Q15, im: Q15) -> Self {
        Self { re, im }
    }

    pub fn add(self, rhs: ComplexQ15) -> ComplexQ15 {
        ComplexQ15 { re: self.re + rhs.re, im: self.im + rhs.im }
    }

    pub fn sub(self, rhs: ComplexQ15) -> ComplexQ15 {
        ComplexQ15 { re: self.re - rhs.re, im: self.im - rhs.im }
    }

    /// Multiply by `j` (rotate 90 degrees): `j*(a+bi) = -b + ai`.
    pub fn mul_j(self) -> ComplexQ15 {
        ComplexQ15 { re: -self.im, im: self.re }
    }

    /// Complex multiply with a 32-bit accumulator per component, matching
    /// `Q15::saturating_mul`'s rounding, and cross-term accumulation done
    /// before the single narrowing step (less rounding error than two
    /// separate Q15 multiplies subtracted/added afterward).
    pub fn mul(self, rhs: ComplexQ15) -> ComplexQ15 {
        let ar = self.re.0 as i32;
        let ai = self.im.0 as i32;
        let br = rhs.re.0 as i32;
        let bi = rhs.im.0 as i32;
        let re = ar * br - ai * bi;
        let im = ar * bi + ai * br;
        ComplexQ15 {
            re: Q15(saturate_i32(round_shift15(re))),
            im: Q15(saturate_i32(round_shift15(im))),
        }
    }

    pub fn conj(self) -> ComplexQ15 {
        ComplexQ15 { re: self.re, im: -self.im }
    }

    pub fn scale_down(self, shift: u32) -> ComplexQ15 {
        ComplexQ15 { re: self.re.scale_down(shift), im: self.im.scale_down(shift) }
    }

    /// Squared magnitude as a plain `u32`, used by the top-bin selector
    /// where only relative ordering matters (no need to take a square root).
    pub fn mag_squared(self) -> u32 {
        let r = self.re.0 as i64;
        let i = self.im.0 as i64;
        (r * r + i * i) as u32
    }
}

fn round_shift15(v: i64) -> i64 {
    (v + (1 << 14)) >> 15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_close() {
        for &x in &[0.0f32, 0.5, -0.5, 0.999, -1.0] {
            let q = Q15::from_f32(x);
            let back = q.to_f32();
            assert!((back - x).abs() < 0.001, "{x} -> {back}");
        }
    }

    #[test]
    fn multiply_one_is_identity_within_rounding() {
        let half = Q15::from_f32(0.5);
        let one = Q15::ONE;
        let product = half.saturating_mul(one);
        assert!((product.to_f32() - 0.5).abs() < 0.001);
    }

    #[test]
    fn add_saturates_at_extremes() {
        let a = Q15(i16::MAX);
        let b = Q15(100);
        assert_eq!(a.saturating_add(b), Q15(i16::MAX));
    }

    #[test]
    fn mul_j_rotates_ninety_degrees() {
        let c = ComplexQ15::new(Q15::from_f32(0.25), Q15::from_f32(0.0));
        let rotated = c.mul_j();
        assert_eq!(rotated.re, -c.im);
        assert_eq!(rotated.im, c.re);
    }

    #[test]
    fn complex_mul_by_one_is_identity() {
        let one = ComplexQ15::new(Q15::ONE, Q15::ZERO);
        let c = ComplexQ15::new(Q15::from_f32(0.3), Q15::from_f32(-0.2));
        let product = c.mul(one);
        assert!((product.re.to_f32() - c.re.to_f32()).abs() < 0.01);
        assert!((product.im.to_f32() - c.im.to_f32()).abs() < 0.01);
    }
}
