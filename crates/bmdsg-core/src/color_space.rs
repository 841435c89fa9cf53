//! 色彩空间、传递函数与标准光源定义.
//!
//! 字符串值与测量行业惯例保持一致 (ITU-R BT.709, ST.2084 等),
//! 解析时同时接受图卡文件中常见的别名写法 (Rec.709, Rec.2020).

use std::fmt;

use crate::error::{BmdError, BmdResult};

/// CIE 1931 色度坐标 (x, y)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chromaticity {
    pub x: f64,
    pub y: f64,
}

impl Chromaticity {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// xyY → XYZ, 取 Y=1
    pub fn to_xyz(self) -> [f64; 3] {
        if self.y == 0.0 {
            return [0.0, 0.0, 0.0];
        }
        [
            self.x / self.y,
            1.0,
            (1.0 - self.x - self.y) / self.y,
        ]
    }
}

/// 三原色色度坐标 (R, G, B)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    pub red: Chromaticity,
    pub green: Chromaticity,
    pub blue: Chromaticity,
}

/// 色彩空间
///
/// `Xyz` 表示 CIE XYZ 三刺激值, 其余三个为显示用 RGB 空间.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// CIE 1931 XYZ 三刺激值
    Xyz,
    /// ITU-R BT.709 (HD 广播)
    Rec709,
    /// P3-D65 (数字影院原色, D65 白点)
    P3D65,
    /// ITU-R BT.2020 (UHD/HDR 广播)
    Rec2020,
}

impl ColorSpace {
    /// 规范字符串名 (与持久化元数据中的写法一致)
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Xyz => "XYZ",
            Self::Rec709 => "ITU-R BT.709",
            Self::P3D65 => "P3-D65",
            Self::Rec2020 => "ITU-R BT.2020",
        }
    }

    /// 是否为 RGB 显示空间
    pub const fn is_rgb(&self) -> bool {
        !matches!(self, Self::Xyz)
    }

    /// RGB 空间三原色色度坐标, XYZ 无原色返回 None
    pub const fn primaries(&self) -> Option<Primaries> {
        match self {
            Self::Xyz => None,
            Self::Rec709 => Some(Primaries {
                red: Chromaticity::new(0.640, 0.330),
                green: Chromaticity::new(0.300, 0.600),
                blue: Chromaticity::new(0.150, 0.060),
            }),
            Self::P3D65 => Some(Primaries {
                red: Chromaticity::new(0.680, 0.320),
                green: Chromaticity::new(0.265, 0.690),
                blue: Chromaticity::new(0.150, 0.060),
            }),
            Self::Rec2020 => Some(Primaries {
                red: Chromaticity::new(0.708, 0.292),
                green: Chromaticity::new(0.170, 0.797),
                blue: Chromaticity::new(0.131, 0.046),
            }),
        }
    }

    /// RGB 空间原生白点 (三者均为 D65)
    pub const fn native_white(&self) -> Chromaticity {
        Chromaticity::new(0.3127, 0.3290)
    }

    /// 从字符串解析, 接受规范名和图卡文件别名
    pub fn parse(value: &str) -> BmdResult<Self> {
        match value {
            "XYZ" => Ok(Self::Xyz),
            "ITU-R BT.709" | "Rec.709" => Ok(Self::Rec709),
            "P3-D65" => Ok(Self::P3D65),
            "ITU-R BT.2020" | "Rec.2020" => Ok(Self::Rec2020),
            _ => Err(BmdError::UnsupportedConversion(format!(
                "未知色彩空间: '{value}'"
            ))),
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 传递函数 (编码用 OETF / 逆 EOTF)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferFunction {
    /// 线性 (恒等)
    Linear,
    /// IEC 61966-2-1 sRGB 分段曲线
    Srgb,
    /// 纯幂函数, 指数 1/2.2
    Gamma22,
    /// SMPTE ST.2084 PQ (参考峰值 10000 cd/m²)
    Pq,
    /// ITU-R BT.2100 HLG OETF
    Hlg,
}

impl TransferFunction {
    /// 规范字符串名
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Srgb => "sRGB",
            Self::Gamma22 => "gamma2.2",
            Self::Pq => "ST.2084",
            Self::Hlg => "HLG",
        }
    }

    /// 从字符串解析
    pub fn parse(value: &str) -> BmdResult<Self> {
        match value {
            "linear" => Ok(Self::Linear),
            "sRGB" => Ok(Self::Srgb),
            "gamma2.2" => Ok(Self::Gamma22),
            "ST.2084" | "PQ" => Ok(Self::Pq),
            "HLG" => Ok(Self::Hlg),
            _ => Err(BmdError::UnsupportedConversion(format!(
                "未知传递函数: '{value}'"
            ))),
        }
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// CIE 标准光源 (2° 标准观察者)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Illuminant {
    D50,
    D55,
    D65,
    D75,
}

impl Illuminant {
    /// 规范字符串名
    pub const fn name(&self) -> &'static str {
        match self {
            Self::D50 => "D50",
            Self::D55 => "D55",
            Self::D65 => "D65",
            Self::D75 => "D75",
        }
    }

    /// CIE 1931 2° 色度坐标
    pub const fn xy(&self) -> Chromaticity {
        match self {
            Self::D50 => Chromaticity::new(0.34570, 0.35850),
            Self::D55 => Chromaticity::new(0.33243, 0.34744),
            Self::D65 => Chromaticity::new(0.31270, 0.32900),
            Self::D75 => Chromaticity::new(0.29903, 0.31488),
        }
    }

    /// 从字符串解析
    pub fn parse(value: &str) -> BmdResult<Self> {
        match value {
            "D50" => Ok(Self::D50),
            "D55" => Ok(Self::D55),
            "D65" => Ok(Self::D65),
            "D75" => Ok(Self::D75),
            _ => Err(BmdError::UnsupportedConversion(format!(
                "未知标准光源: '{value}'"
            ))),
        }
    }
}

impl fmt::Display for Illuminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_色彩空间_解析往返() {
        for cs in [
            ColorSpace::Xyz,
            ColorSpace::Rec709,
            ColorSpace::P3D65,
            ColorSpace::Rec2020,
        ] {
            assert_eq!(ColorSpace::parse(cs.name()).unwrap(), cs);
        }
        // 别名
        assert_eq!(ColorSpace::parse("Rec.709").unwrap(), ColorSpace::Rec709);
        assert_eq!(ColorSpace::parse("Rec.2020").unwrap(), ColorSpace::Rec2020);
        assert!(ColorSpace::parse("AdobeRGB").is_err());
    }

    #[test]
    fn test_传递函数_解析往返() {
        for tf in [
            TransferFunction::Linear,
            TransferFunction::Srgb,
            TransferFunction::Gamma22,
            TransferFunction::Pq,
            TransferFunction::Hlg,
        ] {
            assert_eq!(TransferFunction::parse(tf.name()).unwrap(), tf);
        }
        assert!(TransferFunction::parse("gamma2.6").is_err());
    }

    #[test]
    fn test_白点色度_转XYZ() {
        let xyz = Illuminant::D65.xy().to_xyz();
        // D65 白点: X≈0.9505, Y=1, Z≈1.089
        assert!((xyz[0] - 0.9505).abs() < 1e-3);
        assert_eq!(xyz[1], 1.0);
        assert!((xyz[2] - 1.0891).abs() < 1e-3);
    }
}
