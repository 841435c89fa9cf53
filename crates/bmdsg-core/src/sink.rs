//! 硬件输出抽象.
//!
//! 核心管线的唯一输出义务: 交付一幅数值范围与协商位深精确匹配的
//! u16 光栅, 以及一份 HDR 信令描述. 物理接口调度 (帧节奏、
//! DeckLink SDK 调用) 由实现方负责, 不属于本 crate.

use crate::error::BmdResult;
use crate::hdr::HdrMetadata;
use crate::raster::Raster;

/// 帧输出端
pub trait FrameSink {
    /// 交付一帧光栅及其 HDR 信令元数据
    fn display_frame(&mut self, raster: &Raster, hdr: &HdrMetadata) -> BmdResult<()>;
}
