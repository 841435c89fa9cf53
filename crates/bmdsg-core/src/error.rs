//! 统一错误类型定义.
//!
//! 所有 bmdsg crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// bmdsg 统一错误类型
#[derive(Debug, Error)]
pub enum BmdError {
    /// 输入颜色的空间标签与转换要求不符
    #[error("无效色彩空间: {0}")]
    InvalidColorSpace(String),

    /// 目标色彩空间或传递函数没有可用的转换实现
    #[error("不支持的转换: {0}")]
    UnsupportedConversion(String),

    /// 持久化图卡文件不是 3 通道 16 位光栅
    #[error("图卡文件格式损坏: {0}")]
    MalformedChartFile(String),

    /// 源文件不存在
    #[error("文件不存在: {0}")]
    NotFound(String),

    /// 图卡定义文档结构不可读
    #[error("无效图卡定义: {0}")]
    InvalidChartDefinition(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 读取时遇到文件结尾
    #[error("意外的文件结尾")]
    Eof,

    /// 内部错误 (不应发生)
    #[error("内部错误: {0}")]
    Internal(String),
}

/// bmdsg 统一 Result 类型
pub type BmdResult<T> = Result<T, BmdError>;
