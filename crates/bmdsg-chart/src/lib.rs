//! # bmdsg-chart
//!
//! 图卡子系统: 声明式图卡加载、XYZ↔RGB 色度转换、
//! 传递函数编码以及像素级图卡渲染.
//!
//! 数据流: [`loader`] → `ChartLayout` → [`render`] (内部使用
//! [`convert`]) → u16 光栅 + 元数据.

pub mod adapt;
pub mod convert;
pub mod font;
pub mod loader;
pub mod matrix;
pub mod render;
pub mod transfer;

pub use adapt::LightSource;
pub use convert::{rgb_to_xyz, xyz_to_display_rgb};
pub use loader::{load_chart, load_chart_str};
pub use render::{RenderOptions, render_chart};
