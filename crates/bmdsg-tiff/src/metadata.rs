//! 渲染配方元数据.
//!
//! 写 TIFF 时把完整的渲染配方 (空间、曲线、位深、参考白、
//! 色块清单) 以 JSON 形式嵌入 ImageDescription 标签, 包在
//! "bmdsg" 键下以便与其他写入者共存. 读取宽松: 缺键或整体
//! 不可解析时回退默认配方, 不让元数据问题阻断像素读取.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use bmdsg_core::{ChartLayout, ColorSpace, TransferFunction};

/// ImageDescription 中的命名空间键
pub const DESCRIPTION_KEY: &str = "bmdsg";

/// 色块记录 (仅用于元数据, 不参与渲染)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchRecord {
    pub name: String,
    pub x_pct: f64,
    pub y_pct: f64,
    pub width_pct: f64,
    pub height_pct: f64,
    pub color_space: String,
    pub color_values: Vec<f64>,
}

impl Default for PatchRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            x_pct: 0.0,
            y_pct: 0.0,
            width_pct: 1.0,
            height_pct: 1.0,
            color_space: ColorSpace::Xyz.name().to_string(),
            color_values: Vec::new(),
        }
    }
}

/// 渲染配方元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartMetadata {
    /// 元数据格式版本
    pub version: String,
    /// 图卡名称
    pub chart_name: String,
    /// 图卡来源文件
    pub chart_source: Option<String>,
    /// 目标色彩空间规范名
    pub colorspace: String,
    /// 传递函数规范名
    pub transfer_function: String,
    /// 量化位深
    pub bit_depth: u32,
    /// 参考白亮度 (cd/m²)
    pub reference_white_nits: f64,
    /// 写出时刻 (RFC 3339)
    pub created_at: String,
    /// 色块清单
    pub patches: Option<Vec<PatchRecord>>,
}

impl Default for ChartMetadata {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            chart_name: String::new(),
            chart_source: None,
            colorspace: ColorSpace::Rec709.name().to_string(),
            transfer_function: TransferFunction::Srgb.name().to_string(),
            bit_depth: 12,
            reference_white_nits: 100.0,
            created_at: String::new(),
            patches: None,
        }
    }
}

impl ChartMetadata {
    /// 从图卡布局和渲染参数构造
    pub fn from_layout(
        layout: &ChartLayout,
        colorspace: ColorSpace,
        transfer_function: TransferFunction,
        bit_depth: u32,
        reference_white_nits: f64,
    ) -> Self {
        let patches: Vec<PatchRecord> = layout
            .patches
            .iter()
            .map(|p| PatchRecord {
                name: p.name.clone(),
                x_pct: p.x_pct,
                y_pct: p.y_pct,
                width_pct: p.width_pct,
                height_pct: p.height_pct,
                color_space: p.color.space.name().to_string(),
                color_values: p.color.values.to_vec(),
            })
            .collect();
        Self {
            chart_name: layout.name.clone(),
            chart_source: layout.source.clone(),
            colorspace: colorspace.name().to_string(),
            transfer_function: transfer_function.name().to_string(),
            bit_depth,
            reference_white_nits,
            created_at: Utc::now().to_rfc3339(),
            patches: (!patches.is_empty()).then_some(patches),
            ..Self::default()
        }
    }

    /// 序列化为 ImageDescription 文本
    pub fn to_description(&self) -> String {
        serde_json::json!({ DESCRIPTION_KEY: self }).to_string()
    }

    /// 从 ImageDescription 文本解析, 失败时回退默认配方
    pub fn from_description(text: &str) -> Self {
        let Ok(doc) = serde_json::from_str::<Value>(text) else {
            return Self::default();
        };
        let payload = doc.get(DESCRIPTION_KEY).cloned().unwrap_or(doc);
        serde_json::from_value(payload).unwrap_or_default()
    }

    /// 解析出的色彩空间 (未知值回退 Rec.709)
    pub fn color_space(&self) -> ColorSpace {
        ColorSpace::parse(&self.colorspace).unwrap_or(ColorSpace::Rec709)
    }

    /// 解析出的传递函数 (未知值回退 sRGB)
    pub fn transfer(&self) -> TransferFunction {
        TransferFunction::parse(&self.transfer_function).unwrap_or(TransferFunction::Srgb)
    }
}
