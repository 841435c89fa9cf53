//! 图卡定义文件加载.
//!
//! 图卡是手写的 JSON 文档, 加载策略刻意宽松: 单个写坏的色块
//! 跳过并告警, 未知枚举值回退默认值, 只有文档整体不可读才报错.
//! 这样一张几十个色块的图卡不会因为一处笔误而整卡不可用.

use std::path::Path;

use log::warn;
use serde_json::Value;

use bmdsg_core::{
    AnnotationLayout, AnnotationStripe, BmdError, BmdResult, Canvas, ChartLayout, ColorSpace,
    ColorValue, Colorimetry, Illuminant, Patch, PatternType,
};

/// 从文件加载图卡定义
///
/// `include_labels` 为 true 时为每个色块生成测量验证标签.
pub fn load_chart(path: impl AsRef<Path>, include_labels: bool) -> BmdResult<ChartLayout> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(BmdError::NotFound(format!(
            "图卡文件不存在: {}",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned());
    let mut layout = load_chart_str(&text, stem.as_deref(), include_labels)?;
    layout.source = Some(path.display().to_string());
    Ok(layout)
}

/// 从字符串加载图卡定义
///
/// `fallback_name` 在文档未声明名称时使用 (通常为文件主干名).
pub fn load_chart_str(
    text: &str,
    fallback_name: Option<&str>,
    include_labels: bool,
) -> BmdResult<ChartLayout> {
    let doc: Value = serde_json::from_str(text)
        .map_err(|e| BmdError::InvalidChartDefinition(format!("JSON 解析失败: {e}")))?;
    let obj = doc
        .as_object()
        .ok_or_else(|| BmdError::InvalidChartDefinition("文档根必须是对象".to_string()))?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| fallback_name.map(str::to_string))
        .unwrap_or_default();

    let colorimetry = parse_colorimetry(obj.get("colorimetry"));
    let chart_space = colorimetry.color_space;

    let mut layout = ChartLayout::new(name);
    layout.colorimetry = Some(colorimetry);
    layout.canvas = obj.get("canvas").map(parse_canvas);
    layout.annotations = obj.get("annotations").map(parse_annotations);

    if let Some(items) = obj.get("patches").and_then(Value::as_array) {
        for (idx, item) in items.iter().enumerate() {
            match parse_patch(item, chart_space, include_labels) {
                Some(patch) => layout.add_patch(patch),
                None => warn!("跳过第 {idx} 个色块: 缺少名称或颜色值不合法"),
            }
        }
    }
    Ok(layout)
}

fn parse_colorimetry(value: Option<&Value>) -> Colorimetry {
    let mut c = Colorimetry::default();
    let Some(obj) = value.and_then(Value::as_object) else {
        return c;
    };
    if let Some(s) = obj.get("color_space").and_then(Value::as_str) {
        match ColorSpace::parse(s) {
            Ok(space) => c.color_space = space,
            Err(_) => warn!("未知色彩空间 '{s}', 回退为 XYZ"),
        }
    }
    if let Some(s) = obj.get("illuminant").and_then(Value::as_str) {
        match Illuminant::parse(s) {
            Ok(ill) => {
                c.illuminant = ill;
                c.white_point = ill.xy();
            }
            Err(_) => warn!("未知标准光源 '{s}', 回退为 D65"),
        }
    }
    if let Some(wp) = obj.get("white_point").and_then(Value::as_array) {
        if wp.len() == 2 {
            if let (Some(x), Some(y)) = (wp[0].as_f64(), wp[1].as_f64()) {
                c.white_point = bmdsg_core::Chromaticity::new(x, y);
            }
        }
    }
    if let Some(y) = obj.get("reference_white_Y").and_then(Value::as_f64) {
        c.reference_white_y = y;
    }
    c
}

fn parse_canvas(value: &Value) -> Canvas {
    let mut canvas = Canvas::default();
    let Some(obj) = value.as_object() else {
        return canvas;
    };
    if let Some(w) = obj.get("width").and_then(Value::as_u64) {
        canvas.width = w as u32;
    }
    if let Some(h) = obj.get("height").and_then(Value::as_u64) {
        canvas.height = h as u32;
    }
    if let Some(s) = obj.get("surround").and_then(Value::as_array) {
        if s.len() == 3 {
            for (dst, v) in canvas.surround.iter_mut().zip(s) {
                if let Some(f) = v.as_f64() {
                    *dst = f;
                }
            }
        }
    }
    canvas
}

fn parse_annotations(value: &Value) -> AnnotationLayout {
    fn stripe(v: Option<&Value>) -> Option<AnnotationStripe> {
        let obj = v?.as_object()?;
        Some(AnnotationStripe {
            y_start: obj.get("y_start")?.as_f64()?,
            y_end: obj.get("y_end")?.as_f64()?,
        })
    }
    let Some(obj) = value.as_object() else {
        return AnnotationLayout::default();
    };
    AnnotationLayout {
        top_stripe: stripe(obj.get("top_stripe")),
        bottom_stripe: stripe(obj.get("bottom_stripe")),
    }
}

fn parse_patch(value: &Value, chart_space: ColorSpace, include_labels: bool) -> Option<Patch> {
    let obj = value.as_object()?;
    let name = obj.get("name").and_then(Value::as_str)?;
    if name.trim().is_empty() {
        return None;
    }

    let raw = obj.get("color").and_then(Value::as_array)?;
    if raw.len() != 3 {
        return None;
    }
    let mut values = [0.0f64; 3];
    for (dst, v) in values.iter_mut().zip(raw) {
        *dst = v.as_f64()?;
    }
    let color = ColorValue {
        values,
        space: chart_space,
    };

    let mut geom = [0.0, 0.0, 1.0, 1.0];
    if let Some(arr) = obj.get("layout").and_then(Value::as_array) {
        if arr.len() == 4 && arr.iter().all(|v| v.as_f64().is_some()) {
            for (dst, v) in geom.iter_mut().zip(arr) {
                *dst = v.as_f64().unwrap_or_default();
            }
        }
    }

    let pattern = obj
        .get("pattern")
        .and_then(Value::as_str)
        .map(PatternType::parse_lossy)
        .unwrap_or_default();

    let label_text = include_labels.then(|| label_for(name, &color)).flatten();

    Some(Patch {
        name: name.to_string(),
        x_pct: geom[0],
        y_pct: geom[1],
        width_pct: geom[2],
        height_pct: geom[3],
        color,
        pattern,
        label_text,
    })
}

/// 生成色块的测量验证标签.
///
/// XYZ 图卡: 灰阶块 (名称以 GS 开头) 标注亮度 Y, 彩色块标注
/// CIE xy 色度坐标; RGB 图卡标注 BT.709 亮度加权和.
fn label_for(name: &str, color: &ColorValue) -> Option<String> {
    let v = color.values;
    if color.space == ColorSpace::Xyz {
        if is_greyscale(name) {
            return Some(format!("{name}\nY={:.1}", v[1]));
        }
        let sum = v[0] + v[1] + v[2];
        let (x, y) = if sum > 0.0 {
            (v[0] / sum, v[1] / sum)
        } else {
            (0.0, 0.0)
        };
        return Some(format!("{name}\nx={x:.4}\ny={y:.4}"));
    }
    let luma = 0.2126 * v[0] + 0.7152 * v[1] + 0.0722 * v[2];
    Some(format!("{name}\nL={luma:.2}"))
}

fn is_greyscale(name: &str) -> bool {
    name.trim().to_ascii_uppercase().starts_with("GS")
}

#[cfg(test)]
mod tests {
    use super::*;

    const 样例图卡: &str = r#"{
        "name": "Grayscale Steps",
        "colorimetry": {
            "color_space": "XYZ",
            "illuminant": "D65",
            "reference_white_Y": 100.0
        },
        "canvas": {"width": 1920, "height": 1080, "surround": [0.1, 0.1, 0.1]},
        "patches": [
            {"name": "GS 5", "color": [18.45, 19.77, 20.78], "layout": [0.1, 0.3, 0.2, 0.4]},
            {"name": "Red", "color": [41.24, 21.26, 1.93], "pattern": "checkerboard_50"},
            {"name": "", "color": [1, 2, 3]},
            {"name": "Broken", "color": [1, "x", 3]},
            {"name": "NoColor"}
        ]
    }"#;

    #[test]
    fn test_加载_跳过坏色块() {
        let layout = load_chart_str(样例图卡, None, false).unwrap();
        assert_eq!(layout.name, "Grayscale Steps");
        // 空名、坏颜色、缺颜色的三个色块被跳过
        assert_eq!(layout.patches.len(), 2);
        assert_eq!(layout.patches[0].name, "GS 5");
        assert_eq!(layout.patches[1].pattern, PatternType::Checkerboard50);
    }

    #[test]
    fn test_布局_缺省全幅() {
        let layout = load_chart_str(样例图卡, None, false).unwrap();
        let red = &layout.patches[1];
        assert_eq!(
            [red.x_pct, red.y_pct, red.width_pct, red.height_pct],
            [0.0, 0.0, 1.0, 1.0]
        );
        let gs = &layout.patches[0];
        assert_eq!([gs.x_pct, gs.y_pct, gs.width_pct, gs.height_pct], [0.1, 0.3, 0.2, 0.4]);
    }

    #[test]
    fn test_标签_灰阶与彩色() {
        let layout = load_chart_str(样例图卡, None, true).unwrap();
        assert_eq!(
            layout.patches[0].label_text.as_deref(),
            Some("GS 5\nY=19.8")
        );
        // 彩色块标注 xy 色度
        let red_label = layout.patches[1].label_text.as_deref().unwrap();
        assert!(red_label.starts_with("Red\nx=0.64"), "{red_label}");
    }

    #[test]
    fn test_标签_关闭时为空() {
        let layout = load_chart_str(样例图卡, None, false).unwrap();
        assert!(layout.patches.iter().all(|p| p.label_text.is_none()));
    }

    #[test]
    fn test_rgb图卡_标签为亮度() {
        let doc = r#"{
            "colorimetry": {"color_space": "ITU-R BT.709"},
            "patches": [{"name": "Mid", "color": [0.5, 0.5, 0.5]}]
        }"#;
        let layout = load_chart_str(doc, Some("rgb_chart"), true).unwrap();
        assert_eq!(layout.name, "rgb_chart");
        assert_eq!(layout.patches[0].label_text.as_deref(), Some("Mid\nL=0.50"));
    }

    #[test]
    fn test_未知色彩空间_回退xyz() {
        let doc = r#"{
            "colorimetry": {"color_space": "AdobeRGB"},
            "patches": [{"name": "P", "color": [10, 20, 30]}]
        }"#;
        let layout = load_chart_str(doc, None, false).unwrap();
        assert_eq!(
            layout.colorimetry.unwrap().color_space,
            ColorSpace::Xyz
        );
    }

    #[test]
    fn test_文档不可读_报错() {
        assert!(matches!(
            load_chart_str("{not json", None, false),
            Err(BmdError::InvalidChartDefinition(_))
        ));
        assert!(matches!(
            load_chart_str("[1, 2, 3]", None, false),
            Err(BmdError::InvalidChartDefinition(_))
        ));
    }

    #[test]
    fn test_文件不存在_notfound() {
        let err = load_chart("/nonexistent/chart.json", false).unwrap_err();
        assert!(matches!(err, BmdError::NotFound(_)));
    }

    #[test]
    fn test_注记条带_解析() {
        let doc = r#"{
            "annotations": {
                "top_stripe": {"y_start": 0.1, "y_end": 0.15},
                "bottom_stripe": {"y_start": 0.85, "y_end": 0.9}
            },
            "patches": []
        }"#;
        let layout = load_chart_str(doc, None, false).unwrap();
        let ann = layout.annotations.unwrap();
        assert_eq!(ann.top_stripe.unwrap().y_start, 0.1);
        assert_eq!(ann.bottom_stripe.unwrap().y_end, 0.9);
    }
}
