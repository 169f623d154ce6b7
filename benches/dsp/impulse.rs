//! Benchmarks for impulse synthesis.

use std::hint::black_box;

use criterion::Criterion;
use rand::rngs::StdRng;
use rand::SeedableRng;
use saavy_spatial::dsp::{Ear, ImpulseResponse};

pub fn bench_impulse(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/impulse");
    let mut rng = StdRng::seed_from_u64(7);

    // Short, fast-decaying room
    group.bench_function("reverb_0.6s", |b| {
        b.iter(|| ImpulseResponse::reverb(&mut rng, 44_100, black_box(0.6), 0.8).unwrap())
    });

    // Longest reverb the settings allow
    group.bench_function("reverb_3s", |b| {
        b.iter(|| ImpulseResponse::reverb(&mut rng, 44_100, black_box(3.0), 0.3).unwrap())
    });

    group.bench_function("ear_right", |b| {
        b.iter(|| ImpulseResponse::ear(&mut rng, black_box(44_100), Ear::Right).unwrap())
    });

    group.finish();
}
