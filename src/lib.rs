//! # bmdsg
//!
//! 纯 Rust 实现的测量图卡渲染与色度转换库.
//!
//! bmdsg 提供从声明式图卡定义到硬件就绪光栅的完整管线:
//! - **图卡加载**: 宽松解析 JSON 图卡定义, 单块错误不整卡失效
//! - **色度转换**: XYZ → 显示 RGB, 矩阵由原色与白点现场推导
//! - **传递函数**: linear / sRGB / gamma2.2 / ST.2084 / HLG
//! - **渲染**: 棋盘格图案、测量标签、注记条带、画布嵌入
//! - **TIFF 序列化**: 16 位光栅 + 渲染配方元数据, 读回免重渲染
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use bmdsg::chart::{RenderOptions, load_chart, render_chart};
//!
//! let layout = load_chart("grayscale.json", false)?;
//! let raster = render_chart(&layout, &RenderOptions::default())?;
//! println!("渲染 {}x{}", raster.width(), raster.height());
//! # Ok::<(), bmdsg::core::BmdError>(())
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `bmdsg-core` | 核心类型、错误与 HDR 信令 |
//! | `bmdsg-chart` | 图卡加载、色度转换与渲染 |
//! | `bmdsg-tiff` | TIFF 序列化 |

/// 核心类型与错误处理
pub use bmdsg_core as core;

/// 图卡加载、色度转换与渲染
pub use bmdsg_chart as chart;

/// TIFF 序列化
pub use bmdsg_tiff as tiff;

/// 获取 bmdsg 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
