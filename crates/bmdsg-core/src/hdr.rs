//! HDR 信令元数据.
//!
//! 对应 SMPTE ST 2086 / CEA-861.3 的静态元数据集合:
//! EOTF 标识、母带显示器原色与白点、母带亮度范围、
//! MaxCLL/MaxFALL. 由硬件输出端随信号一起发送.

use crate::color_space::{Chromaticity, ColorSpace, Primaries, TransferFunction};

/// EOTF 类型 (CEA-861.3 编码值)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EotfType {
    /// 保留值
    Reserved = 0,
    /// 传统伽马 (SDR)
    Sdr = 1,
    /// SMPTE ST 2084 (HDR10)
    Pq = 2,
    /// ITU-R BT.2100 HLG
    Hlg = 3,
}

impl EotfType {
    /// 由渲染所用传递函数推导信令 EOTF
    pub const fn from_transfer_function(tf: TransferFunction) -> Self {
        match tf {
            TransferFunction::Pq => Self::Pq,
            TransferFunction::Hlg => Self::Hlg,
            TransferFunction::Linear | TransferFunction::Srgb | TransferFunction::Gamma22 => {
                Self::Sdr
            }
        }
    }
}

/// HDR 静态元数据
#[derive(Debug, Clone, PartialEq)]
pub struct HdrMetadata {
    /// EOTF 标识
    pub eotf: EotfType,
    /// 显示原色色度坐标
    pub primaries: Primaries,
    /// 白点色度坐标
    pub white_point: Chromaticity,
    /// 母带显示器最大亮度 (cd/m²)
    pub max_display_mastering_luminance: f64,
    /// 母带显示器最小亮度 (cd/m²)
    pub min_display_mastering_luminance: f64,
    /// 最大内容亮度 MaxCLL (cd/m²)
    pub max_cll: f64,
    /// 最大帧平均亮度 MaxFALL (cd/m²)
    pub max_fall: f64,
}

impl Default for HdrMetadata {
    /// 缺省: HLG + Rec.2020 原色, 母带 1000/0.0001 cd/m²
    fn default() -> Self {
        let primaries = ColorSpace::Rec2020
            .primaries()
            .expect("Rec2020 必有原色");
        Self {
            eotf: EotfType::Hlg,
            primaries,
            white_point: ColorSpace::Rec2020.native_white(),
            max_display_mastering_luminance: 1000.0,
            min_display_mastering_luminance: 0.0001,
            max_cll: 1000.0,
            max_fall: 50.0,
        }
    }
}

impl HdrMetadata {
    /// 根据渲染目标空间和传递函数构造信令描述
    ///
    /// XYZ 不是显示空间, 原色回退为 Rec.2020.
    pub fn for_colorspace(space: ColorSpace, tf: TransferFunction) -> Self {
        let primaries = space
            .primaries()
            .unwrap_or_else(|| ColorSpace::Rec2020.primaries().expect("Rec2020 必有原色"));
        Self {
            eotf: EotfType::from_transfer_function(tf),
            primaries,
            white_point: space.native_white(),
            ..Self::default()
        }
    }
}
