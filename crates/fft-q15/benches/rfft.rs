use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fft_q15::{ComplexQ15, Q15, RfftPlan};

fn bench_rfft(c: &mut Criterion) {
    let mut group = c.benchmark_group("rfft_forward");
    for &n in fft_q15::SUPPORTED_N.iter() {
        let plan = RfftPlan::new(n).unwrap();
        let input: Vec<Q15> = (0..n)
            .map(|i| Q15::from_f32(((i % 37) as f32 / 37.0) - 0.5))
            .collect();
        let mut scratch = vec![ComplexQ15::ZERO; n / 2];
        let mut out = vec![ComplexQ15::ZERO; n / 2 + 1];

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                plan.forward(black_box(&input), &mut scratch, &mut out).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rfft);
criterion_main!(benches);
