use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use palette::Srgb;
use swatchette::{wu, PalettePipeline, PaletteSize, PixelBuffer};

fn synthetic_frame(width: u32, height: u32) -> Vec<Srgb<u8>> {
    (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                Srgb::new(
                    (x * 255 / width.max(1)) as u8,
                    (y * 255 / height.max(1)) as u8,
                    ((x + y) % 256) as u8,
                )
            })
        })
        .collect()
}

fn wu_swatches(c: &mut Criterion) {
    let mut group = c.benchmark_group("wu_swatches");
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3));

    for side in [256u32, 512] {
        let frame = synthetic_frame(side, side);
        for k in [5u16, 16, 64] {
            group.bench_with_input(
                BenchmarkId::new(k.to_string(), side),
                &frame,
                |b, frame| {
                    b.iter(|| {
                        wu::swatches(frame.iter().copied(), PaletteSize::from_clamped(k), 1)
                    })
                },
            );
        }
    }
    group.finish();
}

fn full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3));

    for side in [256u32, 512] {
        let frame = synthetic_frame(side, side);
        let buffer = PixelBuffer::new(&frame, side, side).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(side), &buffer, |b, &buffer| {
            b.iter(|| PalettePipeline::new(buffer).palette())
        });
    }
    group.finish();
}

criterion_group!(benches, wu_swatches, full_pipeline);
criterion_main!(benches);
