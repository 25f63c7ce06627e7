//! End-to-end FFT scenarios, run as an ordinary `std` integration test
//! binary (the library itself is `#![no_std]`, the test harness isn't).

use fft_q15::{find_top_bins, BinRecord, ComplexQ15, Q15, RfftPlan};
use std::f32::consts::PI;

fn sine_samples(n: usize, cycles: usize, amplitude: f32) -> Vec<Q15> {
    (0..n)
        .map(|i| {
            let phase = 2.0 * PI * (cycles as f32) * (i as f32) / (n as f32);
            Q15::from_f32(amplitude * phase.sin())
        })
        .collect()
}

/// A pure sine tone at `cycles` full periods over the window must show up
/// as the dominant bin at index `cycles` (plus its mirror).
#[test]
fn sine_tone_is_detected_at_its_bin_pure_radix4() {
    let input = sine_samples(8192, 100, 0.5);
    let mut winners = [BinRecord::default(); 1];
    find_top_bins(&input, 8192, 1, &mut winners).unwrap();
    assert_eq!(winners[0].index, 100);
}

#[test]
fn sine_tone_is_detected_at_its_bin_radix4_by_2() {
    let input = sine_samples(4096, 50, 0.5);
    let mut winners = [BinRecord::default(); 1];
    find_top_bins(&input, 4096, 1, &mut winners).unwrap();
    assert_eq!(winners[0].index, 50);
}

/// Two superposed tones: both must appear in the top-2 bins, in either
/// order, and neither is the DC bin.
#[test]
fn two_tone_signal_surfaces_both_bins() {
    let mut input = vec![Q15::ZERO; 8192];
    for (i, sample) in input.iter_mut().enumerate() {
        let a = 2.0 * PI * 40.0 * (i as f32) / 8192.0;
        let b = 2.0 * PI * 300.0 * (i as f32) / 8192.0;
        *sample = Q15::from_f32(0.3 * a.sin() + 0.2 * b.sin());
    }
    let mut winners = [BinRecord::default(); 2];
    find_top_bins(&input, 8192, 2, &mut winners).unwrap();
    let indices: Vec<usize> = winners.iter().map(|r| r.index).collect();
    assert!(indices.contains(&40));
    assert!(indices.contains(&300));
}

/// Silence in, silence out: every bin stays near zero magnitude.
#[test]
fn silent_input_produces_near_zero_spectrum() {
    let plan = RfftPlan::new(4096).unwrap();
    let input = vec![Q15::ZERO; 4096];
    let mut scratch = vec![ComplexQ15::ZERO; plan.n() / 2];
    let mut out = vec![ComplexQ15::ZERO; plan.bin_count()];
    plan.forward(&input, &mut scratch, &mut out).unwrap();

    for bin in &out {
        assert!(bin.mag_squared() < 16);
    }
}
