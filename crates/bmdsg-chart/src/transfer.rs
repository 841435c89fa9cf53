//! 光电传递函数 (OETF / 逆 EOTF) 编解码.
//!
//! 输入为线性光值, 输出为编码信号值, 二者名义范围均为 [0, 1].
//! PQ (ST 2084) 例外: 线性输入按 cd/m² 绝对亮度解释, 峰值
//! 10000 cd/m², 即线性 1.0 只对应约 0.508 的信号值.

use bmdsg_core::TransferFunction;

// ==================== sRGB (IEC 61966-2-1) ====================

const SRGB_LINEAR_THRESHOLD: f64 = 0.003_130_8;
const SRGB_ENCODED_THRESHOLD: f64 = 0.04045;
const SRGB_LINEAR_SLOPE: f64 = 12.92;
const SRGB_OFFSET: f64 = 0.055;

fn srgb_encode(v: f64) -> f64 {
    if v <= SRGB_LINEAR_THRESHOLD {
        SRGB_LINEAR_SLOPE * v
    } else {
        (1.0 + SRGB_OFFSET) * v.powf(1.0 / 2.4) - SRGB_OFFSET
    }
}

fn srgb_decode(v: f64) -> f64 {
    if v <= SRGB_ENCODED_THRESHOLD {
        v / SRGB_LINEAR_SLOPE
    } else {
        ((v + SRGB_OFFSET) / (1.0 + SRGB_OFFSET)).powf(2.4)
    }
}

// ==================== SMPTE ST 2084 (PQ) ====================

const PQ_M1: f64 = 0.159_301_757_812_5;
const PQ_M2: f64 = 78.84375;
const PQ_C1: f64 = 0.835_937_5;
const PQ_C2: f64 = 18.851_562_5;
const PQ_C3: f64 = 18.6875;
/// PQ 曲线标称峰值亮度 (cd/m²)
pub const PQ_PEAK_LUMINANCE: f64 = 10000.0;

fn pq_encode(v: f64) -> f64 {
    let y = (v / PQ_PEAK_LUMINANCE).max(0.0);
    let y_m1 = y.powf(PQ_M1);
    ((PQ_C1 + PQ_C2 * y_m1) / (1.0 + PQ_C3 * y_m1)).powf(PQ_M2)
}

fn pq_decode(v: f64) -> f64 {
    let e = v.max(0.0).powf(1.0 / PQ_M2);
    let num = (e - PQ_C1).max(0.0);
    let den = PQ_C2 - PQ_C3 * e;
    (num / den).powf(1.0 / PQ_M1) * PQ_PEAK_LUMINANCE
}

// ==================== ITU-R BT.2100 HLG ====================

const HLG_A: f64 = 0.178_832_77;
const HLG_B: f64 = 0.284_668_92;
const HLG_C: f64 = 0.559_910_73;

fn hlg_encode(v: f64) -> f64 {
    if v <= 0.0 {
        0.0
    } else if v <= 1.0 / 12.0 {
        (3.0 * v).sqrt()
    } else {
        HLG_A * (12.0 * v - HLG_B).ln() + HLG_C
    }
}

fn hlg_decode(v: f64) -> f64 {
    if v <= 0.5 {
        v * v / 3.0
    } else {
        (((v - HLG_C) / HLG_A).exp() + HLG_B) / 12.0
    }
}

// ==================== 统一入口 ====================

/// 线性光 → 编码信号
pub fn encode(tf: TransferFunction, v: f64) -> f64 {
    match tf {
        TransferFunction::Linear => v,
        TransferFunction::Srgb => srgb_encode(v),
        TransferFunction::Gamma22 => v.max(0.0).powf(1.0 / 2.2),
        TransferFunction::Pq => pq_encode(v),
        TransferFunction::Hlg => hlg_encode(v),
    }
}

/// 编码信号 → 线性光
pub fn decode(tf: TransferFunction, v: f64) -> f64 {
    match tf {
        TransferFunction::Linear => v,
        TransferFunction::Srgb => srgb_decode(v),
        TransferFunction::Gamma22 => v.max(0.0).powf(2.2),
        TransferFunction::Pq => pq_decode(v),
        TransferFunction::Hlg => hlg_decode(v),
    }
}
