//! 图卡数据模型.
//!
//! 图卡由一组按百分比定位的色块组成, 加上色度元数据、
//! 注记条带布局和本底画布定义. 布局在构造/加载后只读,
//! 渲染器不会修改它.

use crate::color_space::{Chromaticity, ColorSpace, Illuminant};
use crate::pattern::PatternType;

/// 带空间标签的颜色值
///
/// 三个通道值只有与其空间标签配对才有意义, 绝不隐式重释.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorValue {
    /// 通道值 (XYZ 三刺激值或 RGB 分量)
    pub values: [f64; 3],
    /// 颜色所属空间
    pub space: ColorSpace,
}

impl ColorValue {
    /// 从 XYZ 三刺激值创建
    pub const fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            values: [x, y, z],
            space: ColorSpace::Xyz,
        }
    }

    /// 从 RGB 值创建 (0-1 归一化)
    pub const fn from_rgb(r: f64, g: f64, b: f64, space: ColorSpace) -> Self {
        Self {
            values: [r, g, b],
            space,
        }
    }
}

/// 色块: 按画布百分比定位的命名矩形区域
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// 色块标识 (如 "GS 1", "Red")
    pub name: String,
    /// 左边缘位置 (0.0-1.0)
    pub x_pct: f64,
    /// 上边缘位置 (0.0-1.0)
    pub y_pct: f64,
    /// 宽度占比 (0.0-1.0)
    pub width_pct: f64,
    /// 高度占比 (0.0-1.0)
    pub height_pct: f64,
    /// 色块颜色
    pub color: ColorValue,
    /// 填充图案
    pub pattern: PatternType,
    /// 可选的测量验证标签文本
    pub label_text: Option<String>,
}

/// 图卡级色度元数据
///
/// 构造/加载时设定一次, 此后不可变; 由转换器消费并写入输出元数据.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorimetry {
    /// 图卡声明颜色所在的工作空间
    pub color_space: ColorSpace,
    /// 参考标准光源
    pub illuminant: Illuminant,
    /// 白点色度坐标
    pub white_point: Chromaticity,
    /// 参考白亮度 Y (将 XYZ 归一化到单位白的 Y 值, 通常 100.0)
    pub reference_white_y: f64,
}

impl Default for Colorimetry {
    fn default() -> Self {
        Self {
            color_space: ColorSpace::Xyz,
            illuminant: Illuminant::D65,
            white_point: Illuminant::D65.xy(),
            reference_white_y: 100.0,
        }
    }
}

/// 注记条带的垂直范围 (画布高度的比例)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationStripe {
    pub y_start: f64,
    pub y_end: f64,
}

/// 注记条带布局
///
/// 缺省时顶部条带为 0.17-0.21, 底部为 0.79-0.83.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnnotationLayout {
    pub top_stripe: Option<AnnotationStripe>,
    pub bottom_stripe: Option<AnnotationStripe>,
}

/// 顶部条带缺省范围
pub const DEFAULT_TOP_STRIPE: AnnotationStripe = AnnotationStripe {
    y_start: 0.17,
    y_end: 0.21,
};

/// 底部条带缺省范围
pub const DEFAULT_BOTTOM_STRIPE: AnnotationStripe = AnnotationStripe {
    y_start: 0.79,
    y_end: 0.83,
};

/// 本底画布: 图卡原生尺寸与嵌入时的包围填充色
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    /// 原生宽度 (像素)
    pub width: u32,
    /// 原生高度 (像素)
    pub height: u32,
    /// 包围填充色 (目标空间编码值, 0-1)
    pub surround: [f64; 3],
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            surround: [0.0, 0.0, 0.0],
        }
    }
}

/// 完整图卡布局
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    /// 图卡名称
    pub name: String,
    /// 色块序列 (渲染按声明顺序, 后者覆盖前者)
    pub patches: Vec<Patch>,
    /// 来源文件或描述
    pub source: Option<String>,
    /// 图卡级色度元数据
    pub colorimetry: Option<Colorimetry>,
    /// 注记条带布局
    pub annotations: Option<AnnotationLayout>,
    /// 本底画布
    pub canvas: Option<Canvas>,
}

impl ChartLayout {
    /// 创建空布局
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            patches: Vec::new(),
            source: None,
            colorimetry: None,
            annotations: None,
            canvas: None,
        }
    }

    /// 追加色块 (仅构造期使用)
    pub fn add_patch(&mut self, patch: Patch) {
        self.patches.push(patch);
    }
}
