//! Bit-reversal permutation (spec.md §4.3.5).
//!
//! The radix-4 DIF butterflies leave the spectrum in bit-reversed order;
//! this walks the precomputed pair table and swaps each complex sample back
//! into natural order. Applying it twice is the identity, since the pair
//! set is closed under swapping `i` and `j`.

use crate::q15::ComplexQ15;
use crate::tables::bitrev_pairs;

/// Permutes `buf[..m]` in place using the pair table for length `m`.
pub fn permute(buf: &mut [ComplexQ15], m: usize) {
    for &(i, j) in bitrev_pairs(m) {
        buf.swap(i as usize, j as usize);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    #[test]
    fn permutation_is_an_involution() {
        let m = 2048;
        let mut buf: Vec<ComplexQ15> = (0..m)
            .map(|i| ComplexQ15::new(crate::q15::Q15(i as i16), crate::q15::Q15(-(i as i16))))
            .collect();
        let original = buf.clone();
        permute(&mut buf, m);
        assert_ne!(buf, original, "a real permutation must move something");
        permute(&mut buf, m);
        assert_eq!(buf, original, "applying it twice restores natural order");
    }
}
