//! 3x3 矩阵运算.
//!
//! 色度转换只需要一小撮线性代数: 矩阵乘向量、矩阵乘矩阵、
//! 以及高斯-约当消元求逆. 不引入通用线性代数库.

use bmdsg_core::{Chromaticity, Primaries};

/// 行主序 3x3 矩阵
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3(pub [[f64; 3]; 3]);

impl Mat3 {
    /// 单位矩阵
    pub const IDENTITY: Self = Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// 对角矩阵
    pub const fn diagonal(d: [f64; 3]) -> Self {
        Self([[d[0], 0.0, 0.0], [0.0, d[1], 0.0], [0.0, 0.0, d[2]]])
    }

    /// 矩阵乘列向量
    pub fn mul_vec(&self, v: [f64; 3]) -> [f64; 3] {
        let m = &self.0;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }

    /// 矩阵乘矩阵 (self * rhs)
    pub fn mul(&self, rhs: &Mat3) -> Mat3 {
        let mut out = [[0.0f64; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.0[i][0] * rhs.0[0][j]
                    + self.0[i][1] * rhs.0[1][j]
                    + self.0[i][2] * rhs.0[2][j];
            }
        }
        Mat3(out)
    }

    /// 高斯-约当消元求逆, 奇异矩阵返回 None
    pub fn inverse(&self) -> Option<Mat3> {
        let mut a = self.0;
        let mut inv = Mat3::IDENTITY.0;

        for col in 0..3 {
            // 部分主元选取
            let mut pivot = col;
            for row in (col + 1)..3 {
                if a[row][col].abs() > a[pivot][col].abs() {
                    pivot = row;
                }
            }
            if a[pivot][col].abs() < 1e-12 {
                return None;
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let scale = a[col][col];
            for k in 0..3 {
                a[col][k] /= scale;
                inv[col][k] /= scale;
            }
            for row in 0..3 {
                if row == col {
                    continue;
                }
                let factor = a[row][col];
                for k in 0..3 {
                    a[row][k] -= factor * a[col][k];
                    inv[row][k] -= factor * inv[col][k];
                }
            }
        }
        Some(Mat3(inv))
    }
}

/// 由原色与白点推导线性 RGB → XYZ 矩阵.
///
/// 原色 xy 坐标按 Y=1 展开成 XYZ 列向量组成 P, 解 S = P⁻¹ · W
/// 使三原色按 S 加权后恰好合成白点 W, 即 M = P · diag(S).
pub fn rgb_to_xyz_matrix(primaries: &Primaries, white: Chromaticity) -> Option<Mat3> {
    let r = primaries.red.to_xyz();
    let g = primaries.green.to_xyz();
    let b = primaries.blue.to_xyz();
    let p = Mat3([
        [r[0], g[0], b[0]],
        [r[1], g[1], b[1]],
        [r[2], g[2], b[2]],
    ]);
    let s = p.inverse()?.mul_vec(white.to_xyz());
    Some(Mat3([
        [p.0[0][0] * s[0], p.0[0][1] * s[1], p.0[0][2] * s[2]],
        [p.0[1][0] * s[0], p.0[1][1] * s[1], p.0[1][2] * s[2]],
        [p.0[2][0] * s[0], p.0[2][1] * s[1], p.0[2][2] * s[2]],
    ]))
}

/// XYZ → 线性 RGB 矩阵 (上者之逆)
pub fn xyz_to_rgb_matrix(primaries: &Primaries, white: Chromaticity) -> Option<Mat3> {
    rgb_to_xyz_matrix(primaries, white)?.inverse()
}
