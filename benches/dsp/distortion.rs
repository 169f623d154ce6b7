//! Benchmarks for waveshaping distortion.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_spatial::dsp::{build_curve, Oversample, WaveShaper};

use crate::SIGNAL_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    group.bench_function("build_curve", |b| b.iter(|| build_curve(black_box(200.0))));

    for &size in SIGNAL_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for (name, oversample) in [
            ("shape_1x", Oversample::None),
            ("shape_2x", Oversample::X2),
            ("shape_4x", Oversample::X4),
        ] {
            let shaper = WaveShaper::from_amount(0.5, oversample);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    shaper.process(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
