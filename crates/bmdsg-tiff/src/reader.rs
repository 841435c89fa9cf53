//! TIFF 读取器.
//!
//! 读回本库或其他基线 TIFF 写入者产出的图卡文件. 容器层面
//! 容忍多条带与 SHORT/LONG 混用的尺寸标签, 但光栅本身必须是
//! 非压缩 3 通道 16 位, 否则判为损坏. 元数据损坏不阻断像素
//! 读取, 回退默认配方.

use std::io::SeekFrom;
use std::path::Path;

use log::{debug, warn};

use bmdsg_core::{BmdError, BmdResult, Raster};

use crate::io::IoContext;
use crate::metadata::ChartMetadata;

// 与写入器共用的标签号
const TAG_IMAGE_WIDTH: u16 = 256;
const TAG_IMAGE_LENGTH: u16 = 257;
const TAG_BITS_PER_SAMPLE: u16 = 258;
const TAG_COMPRESSION: u16 = 259;
const TAG_IMAGE_DESCRIPTION: u16 = 270;
const TAG_STRIP_OFFSETS: u16 = 273;
const TAG_SAMPLES_PER_PIXEL: u16 = 277;
const TAG_STRIP_BYTE_COUNTS: u16 = 279;
const TAG_PLANAR_CONFIG: u16 = 284;

const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;

/// IFD 目录项 (原始形式)
#[derive(Debug, Clone, Copy)]
struct IfdEntry {
    tag: u16,
    type_: u16,
    count: u32,
    /// 值字段原始 4 字节 (内联值或偏移)
    raw: [u8; 4],
}

impl IfdEntry {
    fn offset(&self) -> u32 {
        u32::from_le_bytes(self.raw)
    }
}

/// 从文件读取图卡光栅与渲染配方
pub fn read_chart_tiff(path: &str) -> BmdResult<(Raster, ChartMetadata)> {
    if !Path::new(path).exists() {
        return Err(BmdError::NotFound(format!("图卡文件不存在: {path}")));
    }
    let mut io = IoContext::open_read(path)?;
    read_from(&mut io)
}

/// 从 I/O 上下文读取图卡光栅与渲染配方
pub fn read_from(io: &mut IoContext) -> BmdResult<(Raster, ChartMetadata)> {
    // 头部校验
    let magic = io.read_bytes(2)?;
    if magic == b"MM" {
        return Err(BmdError::MalformedChartFile(
            "大端 TIFF 不支持".to_string(),
        ));
    }
    if magic != b"II" {
        return Err(BmdError::MalformedChartFile(
            "不是 TIFF 文件 (缺少字节序标记)".to_string(),
        ));
    }
    let answer = io.read_u16_le()?;
    if answer != 42 {
        return Err(BmdError::MalformedChartFile(format!(
            "TIFF 魔数错误: {answer}"
        )));
    }

    // 收集首个 IFD 的全部目录项, 再解引用
    let ifd_off = io.read_u32_le()?;
    io.seek(SeekFrom::Start(ifd_off as u64))?;
    let entry_count = io.read_u16_le()?;
    let mut entries = Vec::with_capacity(entry_count as usize);
    for _ in 0..entry_count {
        let tag = io.read_u16_le()?;
        let type_ = io.read_u16_le()?;
        let count = io.read_u32_le()?;
        let mut raw = [0u8; 4];
        io.read_exact(&mut raw)?;
        entries.push(IfdEntry {
            tag,
            type_,
            count,
            raw,
        });
    }

    let find = |tag: u16| entries.iter().copied().find(|e| e.tag == tag);

    // 光栅格式校验
    let samples = find(TAG_SAMPLES_PER_PIXEL)
        .map(|e| read_scalar(io, e))
        .transpose()?
        .unwrap_or(1);
    if samples != 3 {
        return Err(BmdError::MalformedChartFile(format!(
            "期望 3 通道光栅, 得到 {samples} 通道"
        )));
    }
    let bits = match find(TAG_BITS_PER_SAMPLE) {
        Some(e) => read_values(io, e)?,
        None => vec![1],
    };
    if bits.iter().any(|&b| b != 16) {
        return Err(BmdError::MalformedChartFile(format!(
            "期望 16 位样本, 得到 {bits:?}"
        )));
    }
    let compression = find(TAG_COMPRESSION)
        .map(|e| read_scalar(io, e))
        .transpose()?
        .unwrap_or(1);
    if compression != 1 {
        return Err(BmdError::MalformedChartFile(format!(
            "不支持压缩方式 {compression}"
        )));
    }
    let planar = find(TAG_PLANAR_CONFIG)
        .map(|e| read_scalar(io, e))
        .transpose()?
        .unwrap_or(1);
    if planar != 1 {
        return Err(BmdError::MalformedChartFile(
            "仅支持交错 (chunky) 平面布局".to_string(),
        ));
    }

    let width = find(TAG_IMAGE_WIDTH)
        .map(|e| read_scalar(io, e))
        .transpose()?
        .ok_or_else(|| BmdError::MalformedChartFile("缺少 ImageWidth 标签".to_string()))?;
    let height = find(TAG_IMAGE_LENGTH)
        .map(|e| read_scalar(io, e))
        .transpose()?
        .ok_or_else(|| BmdError::MalformedChartFile("缺少 ImageLength 标签".to_string()))?;

    // 条带读取 (容忍多条带)
    let strip_offsets = find(TAG_STRIP_OFFSETS)
        .map(|e| read_values(io, e))
        .transpose()?
        .ok_or_else(|| BmdError::MalformedChartFile("缺少 StripOffsets 标签".to_string()))?;
    let strip_counts = find(TAG_STRIP_BYTE_COUNTS)
        .map(|e| read_values(io, e))
        .transpose()?
        .ok_or_else(|| BmdError::MalformedChartFile("缺少 StripByteCounts 标签".to_string()))?;
    if strip_offsets.len() != strip_counts.len() {
        return Err(BmdError::MalformedChartFile(
            "条带偏移与长度数量不一致".to_string(),
        ));
    }
    debug!("读取 {} 个条带, {}x{}", strip_offsets.len(), width, height);

    let expected = (width as usize) * (height as usize) * 3 * 2;
    let mut bytes = Vec::with_capacity(expected);
    for (&off, &count) in strip_offsets.iter().zip(&strip_counts) {
        io.seek(SeekFrom::Start(off as u64))?;
        bytes.extend_from_slice(&io.read_bytes(count as usize)?);
    }
    if bytes.len() != expected {
        return Err(BmdError::MalformedChartFile(format!(
            "像素数据长度 {} 与 {}x{}x3x16bit 不符",
            bytes.len(),
            width,
            height
        )));
    }
    let data: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    let raster = Raster::from_data(width, height, data)
        .ok_or_else(|| BmdError::Internal("光栅尺寸不一致".to_string()))?;

    // 渲染配方 (损坏时回退默认)
    let metadata = match find(TAG_IMAGE_DESCRIPTION) {
        Some(e) => {
            let raw = if e.count <= 4 {
                e.raw[..e.count as usize].to_vec()
            } else {
                io.seek(SeekFrom::Start(e.offset() as u64))?;
                io.read_bytes(e.count as usize)?
            };
            let text = String::from_utf8_lossy(&raw);
            let text = text.trim_end_matches('\0');
            ChartMetadata::from_description(text)
        }
        None => {
            warn!("TIFF 无 ImageDescription, 使用默认渲染配方");
            ChartMetadata::default()
        }
    };

    Ok((raster, metadata))
}

/// 读取单值标签 (SHORT 或 LONG)
fn read_scalar(io: &mut IoContext, entry: IfdEntry) -> BmdResult<u32> {
    Ok(*read_values(io, entry)?.first().unwrap_or(&0))
}

/// 读取标签的全部值 (SHORT 或 LONG, 内联或解引用)
fn read_values(io: &mut IoContext, entry: IfdEntry) -> BmdResult<Vec<u32>> {
    let value_size = match entry.type_ {
        TYPE_SHORT => 2usize,
        TYPE_LONG => 4usize,
        other => {
            return Err(BmdError::MalformedChartFile(format!(
                "标签 {} 的类型 {other} 不支持",
                entry.tag
            )));
        }
    };
    let total = value_size * entry.count as usize;
    let raw = if total <= 4 {
        entry.raw[..total].to_vec()
    } else {
        io.seek(SeekFrom::Start(entry.offset() as u64))?;
        io.read_bytes(total)?
    };
    let values = raw
        .chunks_exact(value_size)
        .map(|c| {
            if value_size == 2 {
                u32::from(u16::from_le_bytes([c[0], c[1]]))
            } else {
                u32::from_le_bytes([c[0], c[1], c[2], c[3]])
            }
        })
        .collect();
    Ok(values)
}
