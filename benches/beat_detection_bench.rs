//! Benchmarks the per-tick cost of the beat detection for typical window
//! sizes.
//!
//! To run bench these, run `$ cargo bench "tick"`

use audio_reactor::{BeatDetector, DetectionMode, DetectorConfig, MapperConfig};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    // ~20 seconds at a 50 Hz update rate
    let samples = (0..1000)
        .map(|tick| {
            let kick = if tick % 25 == 0 { 1.0 } else { 0.0 };
            kick + rng.random_range(0.0..0.2_f32)
        })
        .collect::<Vec<_>>();

    for capacity in [40, 1024] {
        for mode in [DetectionMode::Adaptive, DetectionMode::manual()] {
            let config = DetectorConfig::default()
                .with_window_capacity(capacity)
                .with_mode(mode);
            let mut detector = BeatDetector::new(config).unwrap();
            c.bench_function(
                &format!("{} tick (window capacity {capacity}, {mode:?})", samples.len()),
                |b| {
                    b.iter(|| {
                        for &sample in &samples {
                            let _ = black_box(detector.tick(black_box(sample)));
                        }
                    })
                },
            );
        }
    }

    let config = MapperConfig::new(0.0, 255.0);
    c.bench_function(&format!("{} map", samples.len()), |b| {
        b.iter(|| {
            for &sample in &samples {
                black_box(audio_reactor::map(black_box(sample), &config));
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
