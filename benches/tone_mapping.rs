use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use c41invert_rs::image_pipeline::{
    ConversionConfig, NegativeConversionPipeline, OutputFormat, Palette, Rgb16Image,
    SampleRegion, TiffCompression, ToneTransformation,
};
use image::Rgb;
use std::io::Cursor;

fn generate_negative(width: u32, height: u32) -> Rgb16Image {
    Rgb16Image::from_fn(width, height, |x, y| {
        let value = ((x * 37 + y * 11) % 40000) as u16;
        Rgb([20000 + value / 2, 10000 + value, 5000 + value / 3])
    })
}

fn benchmark_develop_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("develop_by_size");

    let sizes = vec![
        (100, 100, "100x100"),
        (1000, 1000, "1000x1000"),
        (3000, 2000, "3000x2000"),
    ];

    for (width, height, label) in sizes {
        let negative = generate_negative(width, height);
        let pipeline = NegativeConversionPipeline::new(ConversionConfig::default()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(label), &negative, |b, image| {
            b.iter(|| pipeline.develop(black_box(image)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_engine_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_steps");
    let negative = generate_negative(1500, 1000);
    let region = SampleRegion::compute(1500, 1000, 0.8, false);

    group.bench_function("sample_palette", |b| {
        b.iter(|| Palette::sample(black_box(&negative), &region));
    });

    let palette = Palette::sample(&negative, &region);
    let transformation = ToneTransformation::build(&palette, 0.01, 0.99).unwrap();

    group.bench_function("apply_linear", |b| {
        let mapping = transformation.to_linear();
        b.iter(|| mapping.apply(black_box(&negative)));
    });

    group.bench_function("apply_sigmoid", |b| {
        let mapping = transformation.to_sigmoid();
        b.iter(|| mapping.apply(black_box(&negative)));
    });

    group.finish();
}

fn benchmark_output_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_formats");
    let negative = generate_negative(500, 500);
    let mut input = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb16(negative)
        .write_to(&mut input, image::ImageFormat::Tiff)
        .unwrap();
    let input = input.into_inner();
    let format = c41invert_rs::image_pipeline::SourceFormat::Raster(image::ImageFormat::Tiff);

    let outputs = vec![
        (OutputFormat::Tiff, TiffCompression::None, "tiff_none"),
        (OutputFormat::Tiff, TiffCompression::Lzw, "tiff_lzw"),
        (OutputFormat::Tiff, TiffCompression::DeflateBalanced, "tiff_deflate"),
        (OutputFormat::Jpeg, TiffCompression::None, "jpeg"),
    ];

    for (output_format, compression, label) in outputs {
        let config = ConversionConfig::builder()
            .output_format(output_format)
            .compression(compression)
            .build();
        let pipeline = NegativeConversionPipeline::new(config).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(label), &input, |b, data| {
            b.iter(|| {
                let mut output = Cursor::new(Vec::new());
                pipeline.convert(black_box(data), format, &mut output).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_develop_sizes,
    benchmark_engine_steps,
    benchmark_output_formats
);
criterion_main!(benches);
