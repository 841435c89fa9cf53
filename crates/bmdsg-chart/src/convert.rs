//! XYZ ↔ 显示 RGB 色度转换.
//!
//! 渲染管线的数值核心: 把图卡里的绝对 XYZ 三刺激值转成目标
//! 显示空间的编码 RGB. 转换矩阵不打表, 每次由原色与白点现场
//! 推导, 保证任意 (空间, 光源) 组合一致.

use bmdsg_core::{
    BmdError, BmdResult, ColorSpace, ColorValue, Illuminant, TransferFunction,
};

use crate::adapt::{self, LightSource};
use crate::matrix;
use crate::transfer;

/// XYZ 颜色 → 目标空间的编码 RGB, 分量裁剪到 [0, 1].
///
/// 步骤: 按参考白 Y 归一化 → (可选) 色适应到模拟光源 →
/// XYZ→RGB 矩阵 → 裁剪 → 传递函数编码.
///
/// 白点选取: 直通模式用图卡声明的光源作矩阵白点; 模拟模式下
/// 色偏已经由适应阶段引入, 矩阵改用目标空间原生白点, 让偏色
/// 保留在输出里而不是被矩阵抵消.
pub fn xyz_to_display_rgb(
    color: &ColorValue,
    target_space: ColorSpace,
    tf: TransferFunction,
    reference_white_y: f64,
    illuminant: Illuminant,
    simulation: Option<&LightSource>,
) -> BmdResult<[f64; 3]> {
    if color.space != ColorSpace::Xyz {
        return Err(BmdError::InvalidColorSpace(format!(
            "期望 XYZ 颜色, 得到 {}",
            color.space
        )));
    }
    let primaries = target_space.primaries().ok_or_else(|| {
        BmdError::UnsupportedConversion(format!("目标空间 {target_space} 不是 RGB 显示空间"))
    })?;

    let mut xyz = color.values;
    if reference_white_y > 0.0 {
        for c in &mut xyz {
            *c /= reference_white_y;
        }
    }

    let white = match simulation {
        Some(light) => {
            xyz = adapt::apply_chromatic_adaptation(xyz, illuminant, light)?;
            target_space.native_white()
        }
        None => illuminant.xy(),
    };

    let m = matrix::xyz_to_rgb_matrix(&primaries, white)
        .ok_or_else(|| BmdError::Internal("原色矩阵不可逆".to_string()))?;
    let linear = m.mul_vec(xyz);

    let mut out = [0.0f64; 3];
    for (dst, lin) in out.iter_mut().zip(linear) {
        *dst = transfer::encode(tf, lin.clamp(0.0, 1.0));
    }
    Ok(out)
}

/// 线性 RGB 颜色 → 绝对 XYZ.
///
/// XYZ 输入原样透传; RGB 输入按其所在空间的原色与给定光源
/// 白点展开, 再乘参考白 Y 还原绝对量纲.
pub fn rgb_to_xyz(
    color: &ColorValue,
    illuminant: Illuminant,
    reference_white_y: f64,
) -> BmdResult<ColorValue> {
    if color.space == ColorSpace::Xyz {
        return Ok(color.clone());
    }
    let primaries = color.space.primaries().ok_or_else(|| {
        BmdError::UnsupportedConversion(format!("{} 缺少原色定义", color.space))
    })?;
    let m = matrix::rgb_to_xyz_matrix(&primaries, illuminant.xy())
        .ok_or_else(|| BmdError::Internal("原色矩阵不可逆".to_string()))?;
    let xyz = m.mul_vec(color.values);
    Ok(ColorValue {
        values: [
            xyz[0] * reference_white_y,
            xyz[1] * reference_white_y,
            xyz[2] * reference_white_y,
        ],
        space: ColorSpace::Xyz,
    })
}
