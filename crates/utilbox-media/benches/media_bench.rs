// SPDX-License-Identifier: MIT
//
// Criterion benchmarks for the utilbox-media crate. Currently benchmarks the
// image enhancement pipeline on a small synthetic test image.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgba, RgbaImage};

use utilbox_media::{EnhanceSettings, ImageEnhancer};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark the full enhancement pipeline (colour pass + sharpness pass) on
/// a 256x256 synthetic gradient image with the auto-enhance preset.
fn bench_enhance(c: &mut Criterion) {
    let (width, height) = (256u32, 256u32);
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let dynamic = DynamicImage::ImageRgba8(img);

    c.bench_function("enhance auto preset (256x256)", |b| {
        b.iter(|| {
            let enhancer = ImageEnhancer::from_dynamic(black_box(dynamic.clone()));
            let result = enhancer.enhance(EnhanceSettings::AUTO).unwrap();
            black_box(result.into_dynamic());
        });
    });
}

criterion_group!(benches, bench_enhance);
criterion_main!(benches);
