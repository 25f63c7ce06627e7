//! Generates the twiddle and bit-reversal tables consumed by `src/tables.rs`.
//!
//! Per the design note in `SPEC_FULL.md` §9 ("twiddle and bit-reversal
//! tables ... can be generated at build time from closed-form formulas
//! (cos/-sin, reverse-bits) rather than vendored"), nothing here is checked
//! into the repository: it's recomputed from `cos`/`sin`/bit-reversal on
//! every build and written to `$OUT_DIR/tables.rs`.
//!
//! Keep `MAX_N`/`MAX_M` in sync with `src/limits.rs` — this script can't
//! share a `const` with the library crate it's generating code for.

use std::env;
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

/// Largest supported real FFT length (spec.md §4.3.1: N in {4096, 8192}).
const MAX_N: usize = 8192;
/// Largest supported complex FFT length, M = N/2.
const MAX_M: usize = MAX_N / 2;

/// Round-to-nearest, saturating quantization of a real number in [-1, 1] to
/// Q15 (spec.md §3: "arithmetic ... saturation on narrowing").
fn to_q15(x: f64) -> i16 {
    let scaled = (x * 32768.0).round();
    if scaled >= i16::MAX as f64 {
        i16::MAX
    } else if scaled <= i16::MIN as f64 {
        i16::MIN
    } else {
        scaled as i16
    }
}

/// Real-FFT post-processing coefficients A/B (spec.md §4.3.3), derived from
/// packing N real samples into an M=N/2 complex sequence and unmixing via
/// `X[k] = A[k]*Z[k] + B[k]*conj(Z[M-k])`:
///   A[k] = 0.5*(1 - s) - j*0.5*c
///   B[k] = 0.5*(1 + s) + j*0.5*c
/// with c = cos(2*pi*k/MAX_N), s = sin(2*pi*k/MAX_N). One shared table
/// spanning a full period at MAX_N resolution; a transform of length N <
/// MAX_N reads it with stride `MAX_N/N` (`twidCoefRModifier` in spec terms).
fn gen_real_coef_tables() -> (Vec<i16>, Vec<i16>) {
    let mut a = Vec::with_capacity(2 * MAX_N);
    let mut b = Vec::with_capacity(2 * MAX_N);
    for k in 0..MAX_N {
        let theta = 2.0 * PI * (k as f64) / (MAX_N as f64);
        let c = theta.cos();
        let s = theta.sin();
        a.push(to_q15(0.5 * (1.0 - s)));
        a.push(to_q15(-0.5 * c));
        b.push(to_q15(0.5 * (1.0 + s)));
        b.push(to_q15(0.5 * c));
    }
    (a, b)
}

/// Shared complex-FFT twiddle table: `cos(2*pi*k/MAX_M), -sin(2*pi*k/MAX_M)`
/// for one and a half periods (length `3*MAX_M/2`, per spec.md §4.3.2),
/// which is enough range for the radix-4 stage's `w`, `w^2`, `w^3` lookups
/// at every supported length without ever wrapping.
fn gen_cfft_twiddle_table() -> Vec<i16> {
    let len = 3 * MAX_M / 2;
    let mut table = Vec::with_capacity(2 * len);
    for k in 0..len {
        let theta = 2.0 * PI * (k as f64) / (MAX_M as f64);
        table.push(to_q15(theta.cos()));
        table.push(to_q15(-theta.sin()));
    }
    table
}

/// Bit-reversal pairs `(i, j)` with `i < j = bitrev_b(i)` for a `b`-bit
/// index space of size `m = 2^b`, skipping fixed points. The permutation
/// kernel (spec.md §4.3.5) swaps the complex sample at `i` with the one at
/// `j` for every pair; applying the full set twice is the identity.
fn gen_bitrev_pairs(m: usize) -> Vec<(u16, u16)> {
    let bits = m.trailing_zeros();
    let bitrev = |mut x: usize| -> usize {
        let mut r = 0usize;
        for _ in 0..bits {
            r = (r << 1) | (x & 1);
            x >>= 1;
        }
        r
    };
    let mut pairs = Vec::new();
    for i in 0..m {
        let j = bitrev(i);
        if i < j {
            pairs.push((i as u16, j as u16));
        }
    }
    pairs
}

fn write_i16_array(out: &mut String, name: &str, values: &[i16]) {
    out.push_str(&format!("pub static {name}: [i16; {}] = [\n", values.len()));
    for chunk in values.chunks(16) {
        out.push_str("    ");
        for v in chunk {
            out.push_str(&format!("{v}, "));
        }
        out.push('\n');
    }
    out.push_str("];\n\n");
}

fn write_pair_array(out: &mut String, name: &str, pairs: &[(u16, u16)]) {
    out.push_str(&format!(
        "pub static {name}: [(u16, u16); {}] = [\n",
        pairs.len()
    ));
    for chunk in pairs.chunks(8) {
        out.push_str("    ");
        for (i, j) in chunk {
            out.push_str(&format!("({i}, {j}), "));
        }
        out.push('\n');
    }
    out.push_str("];\n\n");
}

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR set by cargo");
    let dest = Path::new(&out_dir).join("tables.rs");

    let (real_coef_a, real_coef_b) = gen_real_coef_tables();
    let cfft_twiddle = gen_cfft_twiddle_table();
    let bitrev_2048 = gen_bitrev_pairs(2048);
    let bitrev_4096 = gen_bitrev_pairs(4096);

    let mut out = String::new();
    out.push_str("// Generated by build.rs — do not edit, do not vendor.\n\n");
    write_i16_array(&mut out, "REAL_COEF_A", &real_coef_a);
    write_i16_array(&mut out, "REAL_COEF_B", &real_coef_b);
    write_i16_array(&mut out, "CFFT_TWIDDLE", &cfft_twiddle);
    write_pair_array(&mut out, "BITREV_M2048", &bitrev_2048);
    write_pair_array(&mut out, "BITREV_M4096", &bitrev_4096);

    fs::write(&dest, out).expect("write generated tables.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
