//! bmdsg 图卡渲染性能基准测试.
//!
//! 覆盖色度转换、整卡渲染与 TIFF 序列化等核心路径.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use bmdsg::chart::{RenderOptions, convert, render_chart};
use bmdsg::core::{
    Canvas, ChartLayout, ColorSpace, ColorValue, Illuminant, Patch, PatternType,
    TransferFunction,
};
use bmdsg::tiff::{IoContext, MemoryBackend, TiffWriteParams, write_to};

/// 构造 18 级灰阶图卡 (1920x1080 画布)
fn make_grayscale_layout() -> ChartLayout {
    let mut layout = ChartLayout::new("bench-grayscale");
    layout.canvas = Some(Canvas {
        width: 1920,
        height: 1080,
        surround: [0.0, 0.0, 0.0],
    });
    let steps = 18u32;
    for i in 0..steps {
        let y = 100.0 * (i as f64 + 1.0) / steps as f64;
        layout.add_patch(Patch {
            name: format!("GS {i}"),
            x_pct: i as f64 / steps as f64,
            y_pct: 0.3,
            width_pct: 1.0 / steps as f64,
            height_pct: 0.4,
            color: ColorValue::from_xyz(y * 0.9505, y, y * 1.0891),
            pattern: PatternType::Solid,
            label_text: None,
        });
    }
    layout
}

fn bench_xyz_conversion(c: &mut Criterion) {
    c.bench_function("xyz_to_rec709_srgb", |b| {
        let color = ColorValue::from_xyz(41.24, 21.26, 1.93);
        b.iter(|| {
            convert::xyz_to_display_rgb(
                black_box(&color),
                ColorSpace::Rec709,
                TransferFunction::Srgb,
                100.0,
                Illuminant::D65,
                None,
            )
            .unwrap()
        });
    });
}

fn bench_render_full_hd(c: &mut Criterion) {
    c.bench_function("render_grayscale_1080p_12bit", |b| {
        let layout = make_grayscale_layout();
        let opts = RenderOptions::default();
        b.iter(|| render_chart(black_box(&layout), &opts).unwrap());
    });
}

fn bench_tiff_write(c: &mut Criterion) {
    c.bench_function("tiff_write_1080p", |b| {
        let layout = make_grayscale_layout();
        let raster = render_chart(&layout, &RenderOptions::default()).unwrap();
        let params = TiffWriteParams::default();
        b.iter(|| {
            let mut io = IoContext::new(Box::new(MemoryBackend::new()));
            write_to(&mut io, black_box(&raster), &layout, &params).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_xyz_conversion,
    bench_render_full_hd,
    bench_tiff_write
);
criterion_main!(benches);
