use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use warpstudio_image::Image;
use warpstudio_imgproc::{
    interpolation::{BorderMode, InterpolationMode},
    warp::{get_rotation_matrix2d, warp_affine, warp_perspective},
};

const MODES: [InterpolationMode; 4] = [
    InterpolationMode::Nearest,
    InterpolationMode::Bilinear,
    InterpolationMode::Bicubic,
    InterpolationMode::Lanczos,
];

fn bench_warp_affine(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpAffine");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        // input image
        let image_size = [*width, *height].into();
        let image = Image::<u8, 3>::from_size_val(image_size, 0u8).unwrap();

        // output image
        let output = Image::<u8, 3>::from_size_val(image_size, 0).unwrap();
        let m = get_rotation_matrix2d((*width as f64 / 2.0, *height as f64 / 2.0), 45.0, 1.0);

        for mode in MODES {
            let parameter_string = format!("{}x{}/{}", width, height, mode);
            group.bench_with_input(
                BenchmarkId::new("par_rows", &parameter_string),
                &(&image, &output, m),
                |b, i| {
                    let (src, mut dst, m) = (i.0.clone(), i.1.clone(), i.2);
                    b.iter(|| {
                        warp_affine(
                            black_box(&src),
                            black_box(&mut dst),
                            black_box(&m),
                            black_box(mode),
                            black_box(BorderMode::Constant),
                            black_box(0.0),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_warp_perspective(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpPerspective");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        // input image
        let image_size = [*width, *height].into();
        let image = Image::<u8, 3>::from_size_val(image_size, 0u8).unwrap();

        // output image
        let output = Image::<u8, 3>::from_size_val(image_size, 0).unwrap();
        let m = [1.0, 0.1, 0.0, 0.0, 1.0, 0.0, 0.0001, 0.0, 1.0];

        group.bench_with_input(
            BenchmarkId::new("par_rows", &parameter_string),
            &(&image, &output, m),
            |b, i| {
                let (src, mut dst, m) = (i.0.clone(), i.1.clone(), i.2);
                b.iter(|| {
                    warp_perspective(
                        black_box(&src),
                        black_box(&mut dst),
                        black_box(&m),
                        black_box(InterpolationMode::Bilinear),
                        black_box(BorderMode::Replicate),
                        black_box(0.0),
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_warp_affine, bench_warp_perspective);
criterion_main!(benches);
