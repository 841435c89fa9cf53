//! 端到端集成测试: 图卡定义到光栅的完整渲染管线.
//!
//! 测试流程: JSON 图卡定义 → 加载 → 色度转换 → 渲染 → 验证像素

use bmdsg::chart::{LightSource, RenderOptions, load_chart_str, render_chart, transfer};
use bmdsg::core::{ColorSpace, PatternType, Raster, TransferFunction};

/// 双色块灰阶图卡: 左半 GS 5, 右半参考白
const GRAYSCALE_CHART: &str = r#"{
    "name": "Grayscale Steps",
    "colorimetry": {
        "color_space": "XYZ",
        "illuminant": "D65",
        "reference_white_Y": 100.0
    },
    "canvas": {"width": 32, "height": 32, "surround": [0.25, 0.25, 0.25]},
    "patches": [
        {"name": "GS 5", "color": [18.45, 19.77, 20.78], "layout": [0.0, 0.0, 0.5, 1.0]},
        {"name": "White", "color": [95.047, 100.0, 108.883], "layout": [0.5, 0.0, 0.5, 1.0]}
    ]
}"#;

/// 全幅 50% 棋盘格图卡 (2x2 画布)
const CHECKERBOARD_CHART: &str = r#"{
    "name": "CB50",
    "colorimetry": {"color_space": "XYZ", "reference_white_Y": 100.0},
    "canvas": {"width": 2, "height": 2, "surround": [0, 0, 0]},
    "patches": [
        {"name": "Board", "color": [95.047, 100.0, 108.883], "pattern": "checkerboard50"}
    ]
}"#;

fn opts_8bit_linear() -> RenderOptions {
    RenderOptions {
        bit_depth: 8,
        transfer_function: TransferFunction::Linear,
        ..RenderOptions::default()
    }
}

#[test]
fn test_full_pipeline_load_render_grayscale() {
    let layout = load_chart_str(GRAYSCALE_CHART, None, false).unwrap();
    assert_eq!(layout.patches.len(), 2);

    let raster = render_chart(&layout, &opts_8bit_linear()).unwrap();
    assert_eq!(raster.width(), 32);
    assert_eq!(raster.height(), 32);

    // 右半参考白 → 满码值; 左半 GS 5 (Y=19.77) → 约 0.2 线性
    assert_eq!(raster.pixel(24, 0), [255, 255, 255]);
    let gs = raster.pixel(4, 0);
    assert!(gs[1] > 40 && gs[1] < 60, "GS 5 线性码值异常: {gs:?}");
}

#[test]
fn test_checkerboard_50_exact_tile_layout() {
    let layout = load_chart_str(CHECKERBOARD_CHART, None, false).unwrap();
    assert_eq!(layout.patches[0].pattern, PatternType::Checkerboard50);

    let raster = render_chart(&layout, &opts_8bit_linear()).unwrap();
    assert_eq!(raster.pixel(0, 0), [255, 255, 255]);
    assert_eq!(raster.pixel(1, 0), [0, 0, 0]);
    assert_eq!(raster.pixel(0, 1), [0, 0, 0]);
    assert_eq!(raster.pixel(1, 1), [255, 255, 255]);
}

#[test]
fn test_measurement_labels_rendered_into_raster() {
    let layout = load_chart_str(GRAYSCALE_CHART, None, true).unwrap();
    assert_eq!(layout.patches[0].label_text.as_deref(), Some("GS 5\nY=19.8"));

    let with_labels = render_chart(&layout, &opts_8bit_linear()).unwrap();
    let without = render_chart(
        &load_chart_str(GRAYSCALE_CHART, None, false).unwrap(),
        &opts_8bit_linear(),
    )
    .unwrap();
    // 标签文本必须改变像素
    assert_ne!(with_labels, without);
}

#[test]
fn test_embedding_into_larger_output() {
    let layout = load_chart_str(GRAYSCALE_CHART, None, false).unwrap();
    let opts = RenderOptions {
        output_width: Some(64),
        output_height: Some(48),
        ..opts_8bit_linear()
    };
    let raster = render_chart(&layout, &opts).unwrap();
    assert_eq!(raster.width(), 64);
    assert_eq!(raster.height(), 48);
    // 图卡内容位于左上角, 其余为包围色 round(0.25 * 255) = 64
    assert_eq!(raster.pixel(24, 0), [255, 255, 255]);
    assert_eq!(raster.pixel(40, 0), [64, 64, 64]);
    assert_eq!(raster.pixel(0, 40), [64, 64, 64]);
}

#[test]
fn test_explicit_output_dims_equal_canvas_skip_embedding() {
    // 显式指定与画布相同的输出尺寸时不走嵌入, 结果与默认路径逐像素一致
    let layout = load_chart_str(GRAYSCALE_CHART, None, false).unwrap();
    let native = render_chart(&layout, &opts_8bit_linear()).unwrap();
    let opts = RenderOptions {
        output_width: Some(32),
        output_height: Some(32),
        ..opts_8bit_linear()
    };
    let explicit = render_chart(&layout, &opts).unwrap();
    assert_eq!(explicit, native);
}

#[test]
fn test_embedded_content_block_matches_native_render() {
    // 嵌入输出的左上内容块必须与原生尺寸渲染完全一致
    let layout = load_chart_str(GRAYSCALE_CHART, None, false).unwrap();
    let native = render_chart(&layout, &opts_8bit_linear()).unwrap();
    let opts = RenderOptions {
        output_width: Some(64),
        output_height: Some(48),
        ..opts_8bit_linear()
    };
    let big = render_chart(&layout, &opts).unwrap();
    for y in 0..native.height() {
        for x in 0..native.width() {
            assert_eq!(big.pixel(x, y), native.pixel(x, y), "内容块 ({x},{y}) 不一致");
        }
    }
}

#[test]
fn test_16bit_quantization_bounds() {
    // 16 位下注记往返清掉低 8 位: 纯白 65535 → 65280
    let layout = load_chart_str(CHECKERBOARD_CHART, None, false).unwrap();
    let opts = RenderOptions {
        bit_depth: 16,
        transfer_function: TransferFunction::Linear,
        ..RenderOptions::default()
    };
    let raster = render_chart(&layout, &opts).unwrap();
    assert_eq!(raster.pixel(0, 0), [65280, 65280, 65280]);
    assert_eq!(raster.pixel(1, 0), [0, 0, 0]);
    assert!(raster.data().iter().all(|&v| v == 0 || v == 65280));
}

#[test]
fn test_pq_encoding_uses_absolute_luminance() {
    // 参考白 (线性 1.0) 在 PQ 下按 1 cd/m² 绝对亮度编码
    let layout = load_chart_str(CHECKERBOARD_CHART, None, false).unwrap();
    let mut patches_solid = layout.clone();
    patches_solid.patches[0].pattern = PatternType::Solid;

    let opts = RenderOptions {
        bit_depth: 10,
        target_space: ColorSpace::Rec2020,
        transfer_function: TransferFunction::Pq,
        ..RenderOptions::default()
    };
    let raster = render_chart(&patches_solid, &opts).unwrap();

    let max = Raster::max_code(10) as f64;
    let raw = (transfer::encode(TransferFunction::Pq, 1.0) * max).round() as u16;
    // 注记写回清掉低 2 位
    let expected = (raw >> 2) << 2;
    assert_eq!(raster.pixel(0, 0), [expected, expected, expected]);
    assert!(expected < 160, "PQ 参考白不应接近满码值");
}

#[test]
fn test_high_bit_depth_checkerboard_loses_low_bits() {
    // 12 位下注记往返把纯白 4095 压到 4080
    let layout = load_chart_str(CHECKERBOARD_CHART, None, false).unwrap();
    let opts = RenderOptions {
        bit_depth: 12,
        transfer_function: TransferFunction::Linear,
        ..RenderOptions::default()
    };
    let raster = render_chart(&layout, &opts).unwrap();
    assert_eq!(raster.pixel(0, 0), [4080, 4080, 4080]);
    assert_eq!(raster.pixel(1, 0), [0, 0, 0]);
}

#[test]
fn test_simulation_light_source_shifts_neutral() {
    let layout = load_chart_str(GRAYSCALE_CHART, None, false).unwrap();
    let warm = RenderOptions {
        simulation: Some(LightSource::Cct(4500.0)),
        ..opts_8bit_linear()
    };
    let raster = render_chart(&layout, &warm).unwrap();
    // 暖光源下中性灰偏红
    let gs = raster.pixel(4, 0);
    assert!(gs[0] > gs[2], "4500K 模拟应使 R > B: {gs:?}");
}

#[test]
fn test_xyz_target_space_rejected() {
    let layout = load_chart_str(GRAYSCALE_CHART, None, false).unwrap();
    let opts = RenderOptions {
        target_space: ColorSpace::Xyz,
        ..RenderOptions::default()
    };
    let err = render_chart(&layout, &opts).unwrap_err();
    assert!(matches!(
        err,
        bmdsg::core::BmdError::UnsupportedConversion(_)
    ));
}

#[test]
fn test_annotation_stripes_drawn_by_default() {
    // 256x256 黑底空图卡: 默认条带 0.17-0.21 / 0.79-0.83 内出现白色文本
    let doc = r#"{
        "name": "Empty",
        "canvas": {"width": 256, "height": 256, "surround": [0, 0, 0]},
        "patches": []
    }"#;
    let layout = load_chart_str(doc, None, false).unwrap();
    let raster = render_chart(&layout, &opts_8bit_linear()).unwrap();

    let any_white_in = |rows: std::ops::Range<u32>| {
        rows.clone().any(|y| {
            (0..raster.width()).any(|x| raster.pixel(x, y) == [255, 255, 255])
        })
    };
    assert!(any_white_in(43..55), "顶部条带无文本");
    assert!(any_white_in(202..213), "底部条带无文本");
    // 条带之外保持黑色
    assert_eq!(raster.pixel(128, 128), [0, 0, 0]);
}
