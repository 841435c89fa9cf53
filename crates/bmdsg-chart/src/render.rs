//! 图卡渲染器.
//!
//! 渲染分两级画布: 先在图卡原生画布上以 f64 编码域逐块填色,
//! 量化成 u16 光栅, 再把标签与注记条带画进去, 最后按需把原生
//! 画布嵌入更大的输出光栅左上角, 其余区域用包围色填充.
//!
//! 标签与注记走 8 位工作缓冲往返 (高位深下低位清零), 这是
//! 刻意保留的量化行为: 文本像素不参与测量, 色块本体在注记
//! 条带之外不受影响.

use log::debug;

use bmdsg_core::{
    BmdResult, Canvas, ChartLayout, ColorSpace, Colorimetry, Patch, PatternType, Raster,
    TransferFunction, DEFAULT_BOTTOM_STRIPE, DEFAULT_TOP_STRIPE,
};

use crate::adapt::LightSource;
use crate::convert;
use crate::font;
use crate::transfer;

/// 渲染参数
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// 输出宽度, None 时取画布原生宽度
    pub output_width: Option<u32>,
    /// 输出高度, None 时取画布原生高度
    pub output_height: Option<u32>,
    /// 量化位深 (8-16)
    pub bit_depth: u32,
    /// 目标显示空间
    pub target_space: ColorSpace,
    /// 编码传递函数
    pub transfer_function: TransferFunction,
    /// 参考白 Y 覆盖值, None 时用图卡声明值
    pub reference_white_y: Option<f64>,
    /// 模拟光源, None 为直通模式
    pub simulation: Option<LightSource>,
    /// 是否绘制色块携带的测量标签
    pub include_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_width: None,
            output_height: None,
            bit_depth: 12,
            target_space: ColorSpace::Rec709,
            transfer_function: TransferFunction::Srgb,
            reference_white_y: None,
            simulation: None,
            include_labels: true,
        }
    }
}

/// 渲染完整图卡为 u16 光栅
pub fn render_chart(layout: &ChartLayout, opts: &RenderOptions) -> BmdResult<Raster> {
    let canvas = layout.canvas.clone().unwrap_or_default();
    let colorimetry = layout.colorimetry.clone().unwrap_or_default();
    let ref_y = opts
        .reference_white_y
        .unwrap_or(colorimetry.reference_white_y);

    let cw = canvas.width;
    let ch = canvas.height;
    let max = Raster::max_code(opts.bit_depth) as f64;

    // 编码域 f64 工作缓冲
    let mut fbuf = vec![0.0f64; (cw as usize) * (ch as usize) * 3];

    for patch in &layout.patches {
        // 像素定界取整数截断, 同一坐标在任何输出尺寸下可复现
        let x0 = ((patch.x_pct * cw as f64) as i64).clamp(0, cw as i64) as u32;
        let y0 = ((patch.y_pct * ch as f64) as i64).clamp(0, ch as i64) as u32;
        let x1 = (((patch.x_pct + patch.width_pct) * cw as f64) as i64).clamp(0, cw as i64) as u32;
        let y1 = (((patch.y_pct + patch.height_pct) * ch as f64) as i64).clamp(0, ch as i64) as u32;
        if x1 <= x0 || y1 <= y0 {
            debug!("色块 '{}' 映射后面积为零, 跳过", patch.name);
            continue;
        }

        let rgb = patch_rgb(patch, &colorimetry, ref_y, opts)?;
        for y in y0..y1 {
            let row = (y as usize) * (cw as usize);
            for x in x0..x1 {
                let value = match patch.pattern {
                    PatternType::Solid => rgb,
                    pat => {
                        let pos = (y % 2) * 2 + (x % 2);
                        if pat.tile_is_white(pos) {
                            [1.0, 1.0, 1.0]
                        } else {
                            [0.0, 0.0, 0.0]
                        }
                    }
                };
                let off = (row + x as usize) * 3;
                fbuf[off..off + 3].copy_from_slice(&value);
            }
        }
    }

    // 量化到位深码值范围
    let data: Vec<u16> = fbuf
        .iter()
        .map(|&v| (v * max).round().clamp(0.0, max) as u16)
        .collect();
    let mut content = Raster::from_data(cw, ch, data)
        .ok_or_else(|| bmdsg_core::BmdError::Internal("光栅尺寸不一致".to_string()))?;

    if opts.include_labels {
        draw_labels(&mut content, layout, opts.bit_depth);
    }
    draw_annotations(&mut content, layout, &colorimetry, ref_y, opts);

    embed(content, &canvas, opts)
}

/// 求色块在目标空间的编码 RGB.
///
/// XYZ 颜色走完整色度转换; 与目标空间一致的 RGB 颜色只做
/// 传递函数编码 (HDR 曲线下按已编码处理); 空间不一致的 RGB
/// 颜色数值原样使用, 不做原色重映射.
fn patch_rgb(
    patch: &Patch,
    colorimetry: &Colorimetry,
    ref_y: f64,
    opts: &RenderOptions,
) -> BmdResult<[f64; 3]> {
    let color = &patch.color;
    if color.space == ColorSpace::Xyz {
        return convert::xyz_to_display_rgb(
            color,
            opts.target_space,
            opts.transfer_function,
            ref_y,
            colorimetry.illuminant,
            opts.simulation.as_ref(),
        );
    }
    if color.space == opts.target_space {
        let mut out = [0.0f64; 3];
        for (dst, &v) in out.iter_mut().zip(&color.values) {
            *dst = match opts.transfer_function {
                TransferFunction::Linear => v,
                tf @ (TransferFunction::Srgb | TransferFunction::Gamma22) => {
                    transfer::encode(tf, v.clamp(0.0, 1.0))
                }
                TransferFunction::Pq | TransferFunction::Hlg => v,
            };
        }
        return Ok(out);
    }
    debug!(
        "色块 '{}' 声明空间 {} 与目标 {} 不一致, 数值原样使用",
        patch.name, color.space, opts.target_space
    );
    Ok(color.values)
}

/// 在 8 位工作视图上执行绘制, 随后按位深写回.
///
/// 高于 8 位时写回会把低 `bit_depth - 8` 位清零.
fn with_8bit_view<F>(raster: &mut Raster, bit_depth: u32, f: F)
where
    F: FnOnce(&mut [u8], u32, u32),
{
    let shift = bit_depth.saturating_sub(8);
    let (w, h) = (raster.width(), raster.height());
    let mut buf: Vec<u8> = raster.data().iter().map(|&v| (v >> shift) as u8).collect();
    f(&mut buf, w, h);
    for (dst, &src) in raster.data_mut().iter_mut().zip(&buf) {
        *dst = (src as u16) << shift;
    }
}

fn draw_labels(raster: &mut Raster, layout: &ChartLayout, bit_depth: u32) {
    if !layout.patches.iter().any(|p| p.label_text.is_some()) {
        return;
    }
    with_8bit_view(raster, bit_depth, |buf, w, h| {
        let scale = (w.min(h) / 360).max(1);
        for patch in &layout.patches {
            let Some(text) = patch.label_text.as_deref() else {
                continue;
            };
            let cx = ((patch.x_pct + patch.width_pct / 2.0) * w as f64) as i64;
            let cy = ((patch.y_pct + patch.height_pct / 2.0) * h as f64) as i64;
            // 深色块上画白字, 浅色块上画黑字
            let v = &patch.color.values;
            let lum = if patch.color.space == ColorSpace::Xyz {
                v[1] / 100.0
            } else {
                0.2126 * v[0] + 0.7152 * v[1] + 0.0722 * v[2]
            };
            let ink = if lum > 0.5 { [0, 0, 0] } else { [255, 255, 255] };
            font::draw_text_centered(buf, w, h, text, cx, cy, ink, scale);
        }
    });
}

fn draw_annotations(
    raster: &mut Raster,
    layout: &ChartLayout,
    colorimetry: &Colorimetry,
    ref_y: f64,
    opts: &RenderOptions,
) {
    let ann = layout.annotations.unwrap_or_default();
    let top = ann.top_stripe.unwrap_or(DEFAULT_TOP_STRIPE);
    let bottom = ann.bottom_stripe.unwrap_or(DEFAULT_BOTTOM_STRIPE);
    let max = Raster::max_code(opts.bit_depth);

    let mode = match &opts.simulation {
        Some(light) => format!("{light} sim"),
        None => format!("{} passthrough", colorimetry.illuminant),
    };
    let top_text = format!(
        "{}  |  {}  |  {}-bit Full (0-{})  |  {}",
        opts.target_space, opts.transfer_function, opts.bit_depth, max, mode
    );
    let name = if layout.name.is_empty() {
        "Unnamed Chart"
    } else {
        layout.name.as_str()
    };
    let bottom_text = format!(
        "{}  |  Illuminant: {}  |  Ref White Y: {}",
        name, colorimetry.illuminant, ref_y
    );

    with_8bit_view(raster, opts.bit_depth, |buf, w, h| {
        let scale = (w.min(h) / 480).max(1);
        let cx = (w / 2) as i64;
        let cy_top = (((top.y_start + top.y_end) / 2.0) * h as f64) as i64;
        let cy_bottom = (((bottom.y_start + bottom.y_end) / 2.0) * h as f64) as i64;
        font::draw_text_centered(buf, w, h, &top_text, cx, cy_top, [255, 255, 255], scale);
        font::draw_text_centered(buf, w, h, &bottom_text, cx, cy_bottom, [255, 255, 255], scale);
    });
}

/// 把原生画布嵌入输出光栅左上角, 其余区域填包围色
fn embed(content: Raster, canvas: &Canvas, opts: &RenderOptions) -> BmdResult<Raster> {
    let cw = content.width();
    let ch = content.height();
    let ow = opts.output_width.unwrap_or(cw);
    let oh = opts.output_height.unwrap_or(ch);
    if ow == cw && oh == ch {
        return Ok(content);
    }

    let max = Raster::max_code(opts.bit_depth) as f64;
    let surround = [
        (canvas.surround[0] * max).round().clamp(0.0, max) as u16,
        (canvas.surround[1] * max).round().clamp(0.0, max) as u16,
        (canvas.surround[2] * max).round().clamp(0.0, max) as u16,
    ];
    let mut out = Raster::new(ow, oh);
    out.fill(surround);

    let copy_w = (cw.min(ow)) as usize * 3;
    for y in 0..ch.min(oh) {
        let src_off = (y as usize) * (cw as usize) * 3;
        let dst_off = (y as usize) * (ow as usize) * 3;
        out.data_mut()[dst_off..dst_off + copy_w]
            .copy_from_slice(&content.data()[src_off..src_off + copy_w]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmdsg_core::{ColorValue, Illuminant, Patch};

    fn 全幅色块(color: ColorValue, pattern: PatternType) -> Patch {
        Patch {
            name: "P".into(),
            x_pct: 0.0,
            y_pct: 0.0,
            width_pct: 1.0,
            height_pct: 1.0,
            color,
            pattern,
            label_text: None,
        }
    }

    fn 白点xyz(y: f64) -> ColorValue {
        let w = Illuminant::D65.xy().to_xyz();
        ColorValue::from_xyz(w[0] * y, w[1] * y, w[2] * y)
    }

    fn 小画布(layout: &mut ChartLayout, w: u32, h: u32) {
        layout.canvas = Some(Canvas {
            width: w,
            height: h,
            surround: [0.0, 0.0, 0.0],
        });
    }

    fn 线性8位() -> RenderOptions {
        RenderOptions {
            bit_depth: 8,
            transfer_function: TransferFunction::Linear,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_纯色白块_满码值() {
        let mut layout = ChartLayout::new("白场");
        小画布(&mut layout, 4, 4);
        layout.add_patch(全幅色块(白点xyz(100.0), PatternType::Solid));
        let raster = render_chart(&layout, &线性8位()).unwrap();
        assert!(raster.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_棋盘50_对角白() {
        let mut layout = ChartLayout::new("棋盘");
        小画布(&mut layout, 2, 2);
        layout.add_patch(全幅色块(白点xyz(100.0), PatternType::Checkerboard50));
        let raster = render_chart(&layout, &线性8位()).unwrap();
        assert_eq!(raster.pixel(0, 0), [255, 255, 255]);
        assert_eq!(raster.pixel(1, 0), [0, 0, 0]);
        assert_eq!(raster.pixel(0, 1), [0, 0, 0]);
        assert_eq!(raster.pixel(1, 1), [255, 255, 255]);
    }

    #[test]
    fn test_棋盘25与75_占空比() {
        for (pattern, expect_white) in [
            (PatternType::Checkerboard25, 1usize),
            (PatternType::Checkerboard75, 3usize),
        ] {
            let mut layout = ChartLayout::new("棋盘");
            小画布(&mut layout, 2, 2);
            layout.add_patch(全幅色块(白点xyz(100.0), pattern));
            let raster = render_chart(&layout, &线性8位()).unwrap();
            let whites = (0..2u32)
                .flat_map(|y| (0..2u32).map(move |x| (x, y)))
                .filter(|&(x, y)| raster.pixel(x, y) == [255, 255, 255])
                .count();
            assert_eq!(whites, expect_white, "{pattern:?}");
        }
    }

    #[test]
    fn test_高位深_注记往返清低位() {
        // 12 位下注记写回把低 4 位清零: 4095 → 4080
        let mut layout = ChartLayout::new("棋盘");
        小画布(&mut layout, 2, 2);
        layout.add_patch(全幅色块(白点xyz(100.0), PatternType::Checkerboard50));
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
    fn test_定界_整数截断() {
        let mut layout = ChartLayout::new("半幅");
        小画布(&mut layout, 3, 1);
        let mut p = 全幅色块(白点xyz(100.0), PatternType::Solid);
        p.x_pct = 0.5;
        p.width_pct = 0.5;
        layout.add_patch(p);
        let raster = render_chart(&layout, &线性8位()).unwrap();
        // (0.5 * 3) 截断为 1: 像素 1、2 被覆盖
        assert_eq!(raster.pixel(0, 0), [0, 0, 0]);
        assert_eq!(raster.pixel(1, 0), [255, 255, 255]);
        assert_eq!(raster.pixel(2, 0), [255, 255, 255]);
    }

    #[test]
    fn test_零面积色块_跳过() {
        let mut layout = ChartLayout::new("零宽");
        小画布(&mut layout, 4, 4);
        let mut p = 全幅色块(白点xyz(100.0), PatternType::Solid);
        p.width_pct = 0.1; // (0.1 * 4) 截断为 0 宽
        layout.add_patch(p);
        let raster = render_chart(&layout, &线性8位()).unwrap();
        assert!(raster.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_嵌入_左上角与包围色() {
        let mut layout = ChartLayout::new("嵌入");
        layout.canvas = Some(Canvas {
            width: 4,
            height: 4,
            surround: [0.5, 0.5, 0.5],
        });
        layout.add_patch(全幅色块(白点xyz(100.0), PatternType::Solid));
        let opts = RenderOptions {
            output_width: Some(8),
            output_height: Some(8),
            ..线性8位()
        };
        let raster = render_chart(&layout, &opts).unwrap();
        assert_eq!(raster.width(), 8);
        assert_eq!(raster.height(), 8);
        assert_eq!(raster.pixel(0, 0), [255, 255, 255]);
        assert_eq!(raster.pixel(3, 3), [255, 255, 255]);
        // 包围区域 = round(0.5 * 255) = 128
        assert_eq!(raster.pixel(4, 0), [128, 128, 128]);
        assert_eq!(raster.pixel(7, 7), [128, 128, 128]);
    }

    #[test]
    fn test_标签_写入文本像素() {
        let mut layout = ChartLayout::new("标签");
        小画布(&mut layout, 64, 64);
        let mut p = 全幅色块(白点xyz(5.0), PatternType::Solid);
        p.label_text = Some("GS 1\nY=5.0".to_string());
        layout.add_patch(p);
        let raster = render_chart(&layout, &线性8位()).unwrap();
        // 深色块上应出现白色文本像素
        assert!(raster.data().iter().any(|&v| v == 255));
    }

    #[test]
    fn test_标签_可整体关闭() {
        let mut layout = ChartLayout::new("标签");
        小画布(&mut layout, 64, 64);
        let mut p = 全幅色块(白点xyz(5.0), PatternType::Solid);
        p.label_text = Some("GS 1\nY=5.0".to_string());
        layout.add_patch(p);
        let mut bare = layout.clone();
        bare.patches[0].label_text = None;

        // 关闭标签后与无标签布局逐像素一致
        let muted = RenderOptions {
            include_labels: false,
            ..线性8位()
        };
        let off = render_chart(&layout, &muted).unwrap();
        let without = render_chart(&bare, &线性8位()).unwrap();
        assert_eq!(off, without);
    }

    #[test]
    fn test_注记条带_文本位于条带内() {
        let mut layout = ChartLayout::new("Test Chart");
        小画布(&mut layout, 256, 256);
        let raster = render_chart(&layout, &线性8位()).unwrap();
        // 条带中线附近出现白色文本, 画布其余大部分保持黑色
        let top_band: Vec<u32> = (40..56).collect(); // 0.17-0.21 → 行 43-53
        let has_top_text = top_band.iter().any(|&y| {
            (0..256u32).any(|x| raster.pixel(x, y) == [255, 255, 255])
        });
        assert!(has_top_text);
        assert_eq!(raster.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_rgb图卡_直通编码() {
        let mut layout = ChartLayout::new("RGB");
        小画布(&mut layout, 2, 2);
        layout.colorimetry = Some(Colorimetry {
            color_space: ColorSpace::Rec709,
            ..Colorimetry::default()
        });
        layout.add_patch(全幅色块(
            ColorValue::from_rgb(0.5, 0.5, 0.5, ColorSpace::Rec709),
            PatternType::Solid,
        ));
        let raster = render_chart(&layout, &线性8位()).unwrap();
        assert_eq!(raster.pixel(0, 0), [128, 128, 128]);
    }
}
