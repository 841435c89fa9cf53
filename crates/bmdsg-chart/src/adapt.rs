//! 色适应变换与光源模拟.
//!
//! 模拟模式把图卡的参考白从标准光源搬到任意色温或其他标准
//! 光源下: 先用 CIE 日光轨迹把相关色温换算成 xy 色度, 再用
//! Bradford 变换把 XYZ 三刺激值适应到目标白点.

use bmdsg_core::{BmdError, BmdResult, Chromaticity, Illuminant};

use crate::matrix::Mat3;

/// Bradford 锥响应变换矩阵
const BRADFORD: Mat3 = Mat3([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// 模拟目标光源
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightSource {
    /// 相关色温 (K), 取值限 [4000, 25000]
    Cct(f64),
    /// 标准光源
    Illuminant(Illuminant),
}

impl LightSource {
    /// 求光源的 xy 色度坐标.
    ///
    /// 色温走 CIE 日光轨迹多项式 (4000K-25000K 两段),
    /// 轨迹外的色温返回 InvalidColorSpace.
    pub fn to_xy(&self) -> BmdResult<Chromaticity> {
        match *self {
            LightSource::Illuminant(ill) => Ok(ill.xy()),
            LightSource::Cct(t) => {
                if !(4000.0..=25000.0).contains(&t) {
                    return Err(BmdError::InvalidColorSpace(format!(
                        "色温 {t}K 超出日光轨迹范围 [4000, 25000]"
                    )));
                }
                let x = if t <= 7000.0 {
                    -4.607e9 / t.powi(3) + 2.9678e6 / t.powi(2) + 0.09911e3 / t + 0.244063
                } else {
                    -2.0064e9 / t.powi(3) + 1.9018e6 / t.powi(2) + 0.24748e3 / t + 0.237040
                };
                let y = -3.000 * x * x + 2.870 * x - 0.275;
                Ok(Chromaticity { x, y })
            }
        }
    }
}

impl std::fmt::Display for LightSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightSource::Cct(t) => write!(f, "{t:.0}K"),
            LightSource::Illuminant(ill) => write!(f, "{ill}"),
        }
    }
}

/// 求 Bradford 色适应矩阵: 源白点 XYZ → 目标白点 XYZ
pub fn adaptation_matrix(src_white: [f64; 3], dst_white: [f64; 3]) -> BmdResult<Mat3> {
    let cone_src = BRADFORD.mul_vec(src_white);
    let cone_dst = BRADFORD.mul_vec(dst_white);
    for c in cone_src {
        if c.abs() < 1e-12 {
            return Err(BmdError::Internal("源白点锥响应退化".to_string()));
        }
    }
    let gain = Mat3::diagonal([
        cone_dst[0] / cone_src[0],
        cone_dst[1] / cone_src[1],
        cone_dst[2] / cone_src[2],
    ]);
    let inv = BRADFORD
        .inverse()
        .ok_or_else(|| BmdError::Internal("Bradford 矩阵不可逆".to_string()))?;
    Ok(inv.mul(&gain).mul(&BRADFORD))
}

/// 把 XYZ 三刺激值从图卡光源适应到模拟光源下
pub fn apply_chromatic_adaptation(
    xyz: [f64; 3],
    source: Illuminant,
    target: &LightSource,
) -> BmdResult<[f64; 3]> {
    let src_white = source.xy().to_xyz();
    let dst_white = target.to_xy()?.to_xyz();
    let m = adaptation_matrix(src_white, dst_white)?;
    Ok(m.mul_vec(xyz))
}
