//! # bmdsg-core
//!
//! bmdsg 图卡系统核心库, 提供基础类型定义和错误处理.
//!
//! 本 crate 为整个 bmdsg 工作区提供底层基础设施:
//! 色彩空间/传递函数枚举、图卡数据模型、u16 光栅缓冲、
//! HDR 信令元数据以及硬件输出抽象.

pub mod chart;
pub mod color_space;
pub mod error;
pub mod hdr;
pub mod pattern;
pub mod raster;
pub mod sink;

// 重导出常用类型
pub use chart::{
    AnnotationLayout, AnnotationStripe, Canvas, ChartLayout, ColorValue, Colorimetry, Patch,
    DEFAULT_BOTTOM_STRIPE, DEFAULT_TOP_STRIPE,
};
pub use color_space::{Chromaticity, ColorSpace, Illuminant, Primaries, TransferFunction};
pub use error::{BmdError, BmdResult};
pub use hdr::{EotfType, HdrMetadata};
pub use pattern::PatternType;
pub use raster::Raster;
pub use sink::FrameSink;
