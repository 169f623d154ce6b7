//! Benchmarks for FFT overlap-add convolution.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use saavy_spatial::dsp::convolution::{convolve_direct, Convolver};
use saavy_spatial::dsp::{Ear, ImpulseResponse};
use saavy_spatial::MAX_BLOCK_SIZE;

use crate::SIGNAL_SIZES;

pub fn bench_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolution");
    group.sample_size(10);

    let sample_rate = 44_100;
    let mut rng = StdRng::seed_from_u64(1);
    let ear = ImpulseResponse::ear(&mut rng, sample_rate, Ear::Left).unwrap();
    let reverb = ImpulseResponse::reverb(&mut rng, sample_rate, 1.0, 0.5).unwrap();

    for &size in SIGNAL_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();

        // 100 ms ear impulse (4410 taps)
        let conv = Convolver::new(ear.buffer.channel(0), MAX_BLOCK_SIZE);
        group.bench_with_input(BenchmarkId::new("fft_ear", size), &size, |b, _| {
            b.iter(|| conv.process(black_box(&input)).unwrap())
        });

        // 1 s reverb impulse (44100 taps)
        let conv = Convolver::new(reverb.buffer.channel(0), MAX_BLOCK_SIZE);
        group.bench_with_input(BenchmarkId::new("fft_reverb", size), &size, |b, _| {
            b.iter(|| conv.process(black_box(&input)).unwrap())
        });
    }

    // Direct form for comparison, short signal only
    let input: Vec<f32> = (0..4_410).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
    group.bench_function("direct_ear_4410", |b| {
        b.iter(|| convolve_direct(black_box(&input), ear.buffer.channel(0)))
    });

    group.finish();
}
