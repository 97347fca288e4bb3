//! Benchmarks for warpfx kernels and transform resampling.
//!
//! Run with: `cargo bench -p warpfx-bench`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use warpfx_core::{Image, Rgba, Rgba32F, Rgba8};
use warpfx_math::{Affine, Mat3, TaperCorner, TaperSide};
use warpfx_ops::{transform, Configuration, Filter, Resampler};

fn test_image(size: u32) -> Image<Rgba32F> {
    let s = size as f32;
    Image::from_fn(size, size, |x, y| Rgba::new(x as f32 / s, y as f32 / s, 0.5, 1.0))
}

/// Benchmark raw kernel evaluation.
fn bench_weights(c: &mut Criterion) {
    let mut group = c.benchmark_group("weights");

    let xs: Vec<f32> = (0..10000).map(|i| i as f32 / 1000.0 - 5.0).collect();
    group.throughput(Throughput::Elements(xs.len() as u64));

    let filters = [
        Filter::Triangle,
        Filter::CatmullRom,
        Filter::Welch,
        Filter::Lanczos3,
        Filter::Lanczos8,
    ];
    for filter in filters {
        group.bench_with_input(BenchmarkId::new("eval", filter), &xs, |b, xs| {
            b.iter(|| xs.iter().map(|&x| filter.weight(black_box(x))).sum::<f32>())
        });
    }

    group.finish();
}

/// Benchmark affine resampling with the reference kernel.
fn bench_affine(c: &mut Criterion) {
    let mut group = c.benchmark_group("affine");
    group.sample_size(20);

    for &size in &[128u32, 512] {
        let src = test_image(size);
        let center = size as f32 / 2.0;
        let m = Affine::rotation_about(30.0, center, center);
        group.throughput(Throughput::Elements((size * size) as u64));

        for (name, config) in [
            ("sequential", Configuration::sequential()),
            ("parallel", Configuration::default()),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &src, |b, src| {
                b.iter(|| transform::affine(&config, src, &m, size, size, &Filter::Lanczos3))
            });
        }
    }

    group.finish();
}

/// Benchmark projective resampling and pixel formats.
fn bench_projective(c: &mut Criterion) {
    let mut group = c.benchmark_group("projective");
    group.sample_size(20);

    let size = 256u32;
    let src = test_image(size);
    let src8: Image<Rgba8> = src.convert();
    let m = Mat3::taper(255.0, 255.0, TaperSide::Top, TaperCorner::Both, 0.5);
    let config = Configuration::default();
    group.throughput(Throughput::Elements((size * size) as u64));

    for filter in [Filter::Nearest, Filter::Triangle, Filter::Bicubic, Filter::Lanczos3] {
        group.bench_with_input(BenchmarkId::new("rgba32f", filter), &src, |b, src| {
            b.iter(|| transform::projective(&config, src, &m, size, size, &filter))
        });
    }
    group.bench_function("rgba8_lanczos3", |b| {
        b.iter(|| transform::projective(&config, &src8, &m, size, size, &Filter::Lanczos3))
    });

    group.finish();
}

criterion_group!(benches, bench_weights, bench_affine, bench_projective);

criterion_main!(benches);
