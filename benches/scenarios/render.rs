//! Benchmarks for complete renders.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_spatial::{EffectSettings, Position3D, SampleBuffer, SpatialRenderer};

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/render");
    group.sample_size(10);

    // One second of mono audio
    let input = SampleBuffer::mono(
        (0..44_100).map(|i| (i as f32 * 0.03).sin() * 0.5).collect(),
        44_100,
    )
    .unwrap();

    let scenarios = [
        (
            "dry_static",
            EffectSettings::dry().with_position(Position3D::new(2.0, 0.0, -1.0)),
        ),
        ("room", EffectSettings::room()),
        ("hall_binaural", EffectSettings::hall().with_binaural(true)),
        (
            "orbit_everything",
            EffectSettings::orbit(0.5)
                .with_reverb(0.5)
                .with_binaural(true)
                .with_distortion(0.3),
        ),
    ];

    for (name, settings) in scenarios {
        let mut renderer = SpatialRenderer::seeded(42);
        group.bench_with_input(BenchmarkId::new(name, 44_100), &settings, |b, settings| {
            b.iter(|| renderer.render(black_box(&input), settings).unwrap())
        });
    }

    group.finish();
}
