//! u16 RGB 光栅缓冲.
//!
//! 高x宽x3 的平铺 u16 数组, 数值范围由位深决定
//! (`[0, 2^bit_depth - 1]`), 始终存储在 16 位容器内.
//! 这是交给硬件输出和序列化器的唯一产物.

/// 3 通道 u16 光栅图像
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    /// 行主序 RGB 交错数据, 长度 = height * width * 3
    data: Vec<u16>,
}

impl Raster {
    /// 创建全零光栅
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u16; (width as usize) * (height as usize) * 3],
        }
    }

    /// 从已有数据创建, 长度不符返回 None
    pub fn from_data(width: u32, height: u32, data: Vec<u16>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 3 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// 指定位深的最大码值
    pub const fn max_code(bit_depth: u32) -> u16 {
        ((1u32 << bit_depth) - 1) as u16
    }

    /// 读取像素 (x, y)
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u16; 3] {
        let off = self.offset(x, y);
        [self.data[off], self.data[off + 1], self.data[off + 2]]
    }

    /// 写入像素 (x, y)
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u16; 3]) {
        let off = self.offset(x, y);
        self.data[off..off + 3].copy_from_slice(&rgb);
    }

    /// 用单一颜色填满整幅
    pub fn fill(&mut self, rgb: [u16; 3]) {
        for px in self.data.chunks_exact_mut(3) {
            px.copy_from_slice(&rgb);
        }
    }

    pub fn data(&self) -> &[u16] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u16] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u16> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_光栅_读写像素() {
        let mut r = Raster::new(4, 2);
        r.set_pixel(3, 1, [4095, 2048, 0]);
        assert_eq!(r.pixel(3, 1), [4095, 2048, 0]);
        assert_eq!(r.pixel(0, 0), [0, 0, 0]);
        assert_eq!(r.data().len(), 4 * 2 * 3);
    }

    #[test]
    fn test_最大码值() {
        assert_eq!(Raster::max_code(8), 255);
        assert_eq!(Raster::max_code(10), 1023);
        assert_eq!(Raster::max_code(12), 4095);
        assert_eq!(Raster::max_code(16), 65535);
    }

    #[test]
    fn test_从数据创建_长度校验() {
        assert!(Raster::from_data(2, 2, vec![0u16; 12]).is_some());
        assert!(Raster::from_data(2, 2, vec![0u16; 11]).is_none());
    }
}
