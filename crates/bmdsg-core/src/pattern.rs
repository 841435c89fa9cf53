//! 填充图案定义.
//!
//! 棋盘格图案以黑白两色按占空比填充, 平均线性亮度只取决于
//! 白像素占比, 与显示器的传递函数无关 (伽马不变性).

use log::warn;

/// 色块填充图案
///
/// 棋盘格以 2x2 重复瓦片为单位, 瓦片内位置索引为
/// `(y % 2) * 2 + (x % 2)`: 0=左上, 1=右上, 2=左下, 3=右下.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternType {
    /// 纯色填充 (使用色块声明的颜色)
    #[default]
    Solid,
    /// 25% 白占空比: 仅位置 0 为白
    Checkerboard25,
    /// 50% 白占空比: 位置 {0, 3} 为白 (对角)
    Checkerboard50,
    /// 75% 白占空比: 位置 {0, 1, 2} 为白
    Checkerboard75,
}

impl PatternType {
    /// 规范字符串名
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Checkerboard25 => "checkerboard25",
            Self::Checkerboard50 => "checkerboard50",
            Self::Checkerboard75 => "checkerboard75",
        }
    }

    /// 2x2 瓦片内指定位置是否为白
    ///
    /// 纯色图案恒返回 false (不参与黑白占空填充).
    pub const fn tile_is_white(&self, pos: u32) -> bool {
        match self {
            Self::Solid => false,
            Self::Checkerboard25 => pos == 0,
            Self::Checkerboard50 => pos == 0 || pos == 3,
            Self::Checkerboard75 => pos != 3,
        }
    }

    /// 从字符串解析, 未知值告警后回退为纯色
    pub fn parse_lossy(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "solid" => Self::Solid,
            "checkerboard25" | "checkerboard_25" => Self::Checkerboard25,
            "checkerboard50" | "checkerboard_50" => Self::Checkerboard50,
            "checkerboard75" | "checkerboard_75" => Self::Checkerboard75,
            other => {
                warn!("未知填充图案 '{other}', 回退为纯色");
                Self::Solid
            }
        }
    }
}
