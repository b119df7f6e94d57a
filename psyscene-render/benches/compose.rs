use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use std::time::Duration;

use psyscene_core::Drawable;
use psyscene_render::{compose, ArrowDirection, FixationCross, ShapeKind, ShapeStim};
use tiny_skia::{Color, Pixmap};

fn stimuli() -> Vec<Box<dyn Drawable>> {
    vec![
        Box::new(FixationCross::standard().unwrap()),
        Box::new(
            ShapeStim::at(
                ShapeKind::Circle {
                    radius: 50.0,
                    color: [255, 0, 0, 255],
                },
                (-200.0, 0.0),
            )
            .unwrap(),
        ),
        Box::new(
            ShapeStim::at(
                ShapeKind::Arrow {
                    direction: ArrowDirection::Right,
                    size: 60.0,
                    color: [0, 0, 255, 255],
                },
                (200.0, 0.0),
            )
            .unwrap(),
        ),
    ]
}

/// Benchmarks a full frame composition at 720p: clear plus three blits.
pub fn bench_compose(c: &mut Criterion) {
    const WIDTH: u32 = 1280;
    const HEIGHT: u32 = 720;
    let mut group = c.benchmark_group("compose");

    group
        .sample_size(50)
        .measurement_time(Duration::from_secs(10))
        .warm_up_time(Duration::from_secs(2));

    group.bench_function("empty_frame", |b| {
        let mut canvas = Pixmap::new(WIDTH, HEIGHT).unwrap();
        b.iter(|| compose(black_box(&mut canvas), Color::BLACK, &[]));
    });

    group.bench_function("three_stimuli", |b| {
        let mut canvas = Pixmap::new(WIDTH, HEIGHT).unwrap();
        let drawables = stimuli();
        b.iter(|| compose(black_box(&mut canvas), Color::BLACK, black_box(&drawables)));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
        .confidence_level(0.95)
        .noise_threshold(0.02)
        .significance_level(0.05);
    targets = bench_compose
}

criterion_main!(benches);
