//! Benchmarks for point-source panning.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_spatial::dsp::PointSourcePanner;
use saavy_spatial::{Position3D, SampleBuffer, Trajectory};

use crate::SIGNAL_SIZES;

pub fn bench_pan(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/pan");
    let panner = PointSourcePanner::default();

    for &size in SIGNAL_SIZES {
        let input = SampleBuffer::mono(
            (0..size).map(|i| (i as f32 * 0.02).sin()).collect(),
            44_100,
        )
        .unwrap();

        // Fixed source: gains computed once
        let fixed = Trajectory::fixed(Position3D::new(3.0, 0.0, -2.0));
        group.bench_with_input(BenchmarkId::new("static", size), &size, |b, _| {
            b.iter(|| panner.process(black_box(&input), &fixed).unwrap())
        });

        // Orbit: gains recomputed every frame
        let orbit = Trajectory::compute(Position3D::new(3.0, 0.0, -2.0), true, 1.0, input.duration());
        group.bench_with_input(BenchmarkId::new("orbit", size), &size, |b, _| {
            b.iter(|| panner.process(black_box(&input), &orbit).unwrap())
        });
    }

    group.finish();
}
