//! TIFF 写入器.
//!
//! 写出小端基线 TIFF: 单条带非压缩, 每像素 3 个 16 位样本,
//! 渲染配方 JSON 嵌入 ImageDescription. 文件布局固定为
//! 头部 → 像素数据 → 标签数组 → 描述文本 → IFD,
//! 偏移全部预先算出, 一遍顺序写完.

use std::io::SeekFrom;

use log::info;

use bmdsg_core::{BmdResult, ChartLayout, ColorSpace, Raster, TransferFunction};

use crate::io::IoContext;
use crate::metadata::ChartMetadata;

// ==================== TIFF 标签常量 ====================

const TAG_IMAGE_WIDTH: u16 = 256;
const TAG_IMAGE_LENGTH: u16 = 257;
const TAG_BITS_PER_SAMPLE: u16 = 258;
const TAG_COMPRESSION: u16 = 259;
const TAG_PHOTOMETRIC: u16 = 262;
const TAG_IMAGE_DESCRIPTION: u16 = 270;
const TAG_STRIP_OFFSETS: u16 = 273;
const TAG_SAMPLES_PER_PIXEL: u16 = 277;
const TAG_ROWS_PER_STRIP: u16 = 278;
const TAG_STRIP_BYTE_COUNTS: u16 = 279;
const TAG_PLANAR_CONFIG: u16 = 284;
const TAG_SAMPLE_FORMAT: u16 = 339;

const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_ASCII: u16 = 2;

/// 非压缩
const COMPRESSION_NONE: u32 = 1;
/// RGB 色度解释
const PHOTOMETRIC_RGB: u32 = 2;
/// 无符号整数样本
const SAMPLE_FORMAT_UINT: u16 = 1;

/// 写入参数
#[derive(Debug, Clone)]
pub struct TiffWriteParams {
    /// 光栅的目标色彩空间
    pub colorspace: ColorSpace,
    /// 光栅的编码传递函数
    pub transfer_function: TransferFunction,
    /// 量化位深
    pub bit_depth: u32,
    /// 参考白亮度 (cd/m²)
    pub reference_white_nits: f64,
}

impl Default for TiffWriteParams {
    fn default() -> Self {
        Self {
            colorspace: ColorSpace::Rec709,
            transfer_function: TransferFunction::Srgb,
            bit_depth: 12,
            reference_white_nits: 100.0,
        }
    }
}

/// 把光栅与渲染配方写为 TIFF 文件
pub fn write_chart_tiff(
    path: &str,
    raster: &Raster,
    layout: &ChartLayout,
    params: &TiffWriteParams,
) -> BmdResult<()> {
    let mut io = IoContext::open_write(path)?;
    write_to(&mut io, raster, layout, params)?;
    info!(
        "TIFF 已写出: {} ({}x{}, {} 位)",
        path,
        raster.width(),
        raster.height(),
        params.bit_depth
    );
    Ok(())
}

/// 把光栅与渲染配方写入 I/O 上下文
pub fn write_to(
    io: &mut IoContext,
    raster: &Raster,
    layout: &ChartLayout,
    params: &TiffWriteParams,
) -> BmdResult<()> {
    let metadata = ChartMetadata::from_layout(
        layout,
        params.colorspace,
        params.transfer_function,
        params.bit_depth,
        params.reference_white_nits,
    );
    let mut desc = metadata.to_description().into_bytes();
    desc.push(0); // ASCII 标签以 NUL 结尾
    let desc_len = desc.len() as u32;

    let width = raster.width();
    let height = raster.height();
    let data_len = (width as u32) * height * 3 * 2;

    // 文件布局: 头(8) → 像素 → 位深数组(6) → 样本格式数组(6) → 描述 → IFD
    let data_off = 8u32;
    let bps_off = data_off + data_len;
    let sf_off = bps_off + 6;
    let desc_off = sf_off + 6;
    let ifd_off = desc_off + desc_len + (desc_len & 1); // IFD 按字对齐

    // 头部: 字节序标记 + 魔数 42 + 首个 IFD 偏移
    io.write_all(b"II")?;
    io.write_u16_le(42)?;
    io.write_u32_le(ifd_off)?;

    // 像素数据 (小端 u16, 单条带)
    let mut pixels = Vec::with_capacity(data_len as usize);
    for &v in raster.data() {
        pixels.extend_from_slice(&v.to_le_bytes());
    }
    io.write_all(&pixels)?;

    // 标签值数组
    for _ in 0..3 {
        io.write_u16_le(16)?; // BitsPerSample
    }
    for _ in 0..3 {
        io.write_u16_le(SAMPLE_FORMAT_UINT)?;
    }

    // 描述文本 (奇数长度补齐)
    io.write_all(&desc)?;
    if desc_len & 1 == 1 {
        io.write_u8(0)?;
    }

    // IFD: 12 个目录项, 标签号升序
    io.write_u16_le(12)?;
    write_entry_long(io, TAG_IMAGE_WIDTH, width)?;
    write_entry_long(io, TAG_IMAGE_LENGTH, height)?;
    write_entry(io, TAG_BITS_PER_SAMPLE, TYPE_SHORT, 3, bps_off)?;
    write_entry_short(io, TAG_COMPRESSION, COMPRESSION_NONE as u16)?;
    write_entry_short(io, TAG_PHOTOMETRIC, PHOTOMETRIC_RGB as u16)?;
    write_entry(io, TAG_IMAGE_DESCRIPTION, TYPE_ASCII, desc_len, desc_off)?;
    write_entry_long(io, TAG_STRIP_OFFSETS, data_off)?;
    write_entry_short(io, TAG_SAMPLES_PER_PIXEL, 3)?;
    write_entry_long(io, TAG_ROWS_PER_STRIP, height)?;
    write_entry_long(io, TAG_STRIP_BYTE_COUNTS, data_len)?;
    write_entry_short(io, TAG_PLANAR_CONFIG, 1)?;
    write_entry(io, TAG_SAMPLE_FORMAT, TYPE_SHORT, 3, sf_off)?;
    io.write_u32_le(0)?; // 无下一个 IFD

    io.seek(SeekFrom::Start(0))?;
    Ok(())
}

/// 写一个目录项 (值字段为偏移或 LONG 值)
fn write_entry(io: &mut IoContext, tag: u16, type_: u16, count: u32, value: u32) -> BmdResult<()> {
    io.write_u16_le(tag)?;
    io.write_u16_le(type_)?;
    io.write_u32_le(count)?;
    io.write_u32_le(value)
}

/// 写一个单值 LONG 目录项
fn write_entry_long(io: &mut IoContext, tag: u16, value: u32) -> BmdResult<()> {
    write_entry(io, tag, TYPE_LONG, 1, value)
}

/// 写一个单值 SHORT 目录项 (值内联在字段前 2 字节)
fn write_entry_short(io: &mut IoContext, tag: u16, value: u16) -> BmdResult<()> {
    io.write_u16_le(tag)?;
    io.write_u16_le(TYPE_SHORT)?;
    io.write_u32_le(1)?;
    io.write_u16_le(value)?;
    io.write_u16_le(0)
}
