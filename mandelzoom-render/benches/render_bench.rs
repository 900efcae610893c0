use criterion::{criterion_group, criterion_main, Criterion};

use mandelzoom_core::{PixelDimensions, Viewport};
use mandelzoom_render::{
    default_presets, paletted_color, partition_rows, render_tiles, Palette, PixelBuffer, RenderCancel,
    RenderSettings, DEFAULT_TILE_COUNT,
};

fn bench_full_frame_render(c: &mut Criterion) {
    let dims = PixelDimensions::new(640, 480).unwrap();
    let request = RenderSettings::new(Viewport::FULL, dims).request(1);
    let jobs = partition_rows(dims.height, DEFAULT_TILE_COUNT, 1);
    let cancel = RenderCancel::new();

    c.bench_function("full_frame_640x480", |b| {
        b.iter(|| {
            let mut buffer = PixelBuffer::try_new(dims.width, dims.height).unwrap();
            render_tiles(&request, &jobs, &mut buffer, &cancel);
            buffer
        });
    });
}

fn bench_supersampled_preset(c: &mut Criterion) {
    let dims = PixelDimensions::new(320, 240).unwrap();
    let mut settings = RenderSettings::new(Viewport::FULL, dims);
    default_presets()[3].apply(&mut settings).unwrap();
    let request = settings.request(2);
    let out = request.output_dims();
    let jobs = partition_rows(out.height, DEFAULT_TILE_COUNT, request.multiplier);
    let cancel = RenderCancel::new();

    c.bench_function("milkyway_320x240_x2", |b| {
        b.iter(|| {
            let mut buffer = PixelBuffer::try_new(out.width, out.height).unwrap();
            render_tiles(&request, &jobs, &mut buffer, &cancel);
            buffer
        });
    });
}

fn bench_paletted_color(c: &mut Criterion) {
    let palette = Palette::default();
    let max_iter = 1000;

    c.bench_function("paletted_color_0_to_1000", |b| {
        b.iter(|| {
            (0..=max_iter)
                .map(|count| paletted_color(count, palette.colors(), max_iter)[0] as u64)
                .sum::<u64>()
        });
    });
}

criterion_group!(
    benches,
    bench_full_frame_render,
    bench_supersampled_preset,
    bench_paletted_color
);
criterion_main!(benches);
