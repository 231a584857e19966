use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use warpstudio_image::{Image, ImageSize};

fn sample_image() -> Image<u8, 3> {
    Image::from_size_val(
        ImageSize {
            width: 1920,
            height: 1080,
        },
        127,
    )
    .unwrap()
}

fn bench_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("Image");

    group.bench_function("cast_f32", |b| {
        b.iter_batched(
            sample_image,
            |image| black_box(image).cast::<f32>(),
            criterion::BatchSize::LargeInput,
        )
    });

    group.bench_function("clone", |b| {
        let image = sample_image();
        b.iter(|| black_box(&image).clone())
    });

    group.finish();
}

criterion_group!(benches, bench_image);
criterion_main!(benches);
