//! # bmdsg-tiff
//!
//! 图卡光栅的 TIFF 持久化: 小端基线 TIFF, 单条带非压缩
//! 16 位 RGB, 渲染配方以 JSON 形式嵌在 ImageDescription 里,
//! 读回后可在不重渲染的情况下直接送显.

pub mod io;
pub mod metadata;
pub mod reader;
pub mod writer;

pub use io::{IoContext, MemoryBackend};
pub use metadata::{ChartMetadata, PatchRecord};
pub use reader::{read_chart_tiff, read_from};
pub use writer::{write_chart_tiff, write_to, TiffWriteParams};
