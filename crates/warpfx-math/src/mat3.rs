//! 3x3 matrix type for projective (homography) transforms.
//!
//! # Convention
//!
//! Matrices are stored in **row-major** order and use **column vectors**
//! in homogeneous 2D coordinates:
//!
//! ```text
//! | m00 m01 m02 |   | x |   | x' |
//! | m10 m11 m12 | * | y | = | y' |     (X, Y) = (x'/w', y'/w')
//! | m20 m21 m22 |   | 1 |   | w' |
//! ```
//!
//! An affine matrix is the special case with third row `[0, 0, 1]`.
//!
//! # Usage
//!
//! ```rust
//! use warpfx_math::Mat3;
//!
//! let m = Mat3::from_rows([
//!     [1.0, 0.0, 5.0],
//!     [0.0, 1.0, -2.0],
//!     [0.0, 0.0, 1.0],
//! ]);
//! assert_eq!(m.transform_point(1.0, 1.0), Some((6.0, -1.0)));
//! ```

use glam::Vec3;
use std::ops::{Index, Mul};

/// A mapped point is on the horizon when its homogeneous weight is at most
/// this fraction of its largest homogeneous component.
pub const HORIZON_EPSILON: f32 = f32::EPSILON;

/// A 3x3 projective matrix.
///
/// Stored in row-major order. Use [`Mat3::from_rows`] to construct from
/// component arrays.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Mat3 {
    /// Matrix elements in row-major order: [row0, row1, row2]
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    /// Zero matrix.
    pub const ZERO: Self = Self { m: [[0.0; 3]; 3] };

    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Creates a matrix from row arrays.
    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Creates a matrix from column arrays.
    #[inline]
    pub const fn from_cols(cols: [[f32; 3]; 3]) -> Self {
        Self {
            m: [
                [cols[0][0], cols[1][0], cols[2][0]],
                [cols[0][1], cols[1][1], cols[2][1]],
                [cols[0][2], cols[1][2], cols[2][2]],
            ],
        }
    }

    /// Returns the transpose of this matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.m)
    }

    /// Computes the determinant.
    #[inline]
    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns true if all elements are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|x| x.is_finite())
    }

    /// Returns true if the third row is `[0, 0, 1]`.
    #[inline]
    pub fn is_affine(&self) -> bool {
        self.m[2] == [0.0, 0.0, 1.0]
    }

    /// Computes the inverse of this matrix.
    ///
    /// Returns `None` if the matrix is singular or has non-finite elements.
    /// Singularity is judged relative to the row magnitudes, so `k * M` is
    /// invertible exactly when `M` is, for any finite nonzero `k`.
    ///
    /// ```rust
    /// use warpfx_math::Mat3;
    ///
    /// let m = Mat3::from_rows([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]]);
    /// let inv = m.inverse().unwrap();
    /// assert_eq!(inv.transform_point(4.0, 2.0), Some((2.0, 1.0)));
    /// ```
    pub fn inverse(&self) -> Option<Self> {
        if !self.is_finite() {
            return None;
        }
        // f64 keeps det and cofactors of large or tiny matrices in range
        let m = self.m.map(|row| row.map(f64::from));
        let cof = [
            [
                m[1][1] * m[2][2] - m[1][2] * m[2][1],
                m[0][2] * m[2][1] - m[0][1] * m[2][2],
                m[0][1] * m[1][2] - m[0][2] * m[1][1],
            ],
            [
                m[1][2] * m[2][0] - m[1][0] * m[2][2],
                m[0][0] * m[2][2] - m[0][2] * m[2][0],
                m[0][2] * m[1][0] - m[0][0] * m[1][2],
            ],
            [
                m[1][0] * m[2][1] - m[1][1] * m[2][0],
                m[0][1] * m[2][0] - m[0][0] * m[2][1],
                m[0][0] * m[1][1] - m[0][1] * m[1][0],
            ],
        ];
        let det = m[0][0] * cof[0][0] + m[0][1] * cof[1][0] + m[0][2] * cof[2][0];

        // |det| <= product of row norms; a tiny ratio means rank < 3
        let scale: f64 = m
            .iter()
            .map(|row| row.iter().map(|v| v * v).sum::<f64>().sqrt())
            .product();
        if scale == 0.0 || det.abs() <= f64::from(f32::EPSILON) * scale {
            return None;
        }

        let inv = Self::from_rows(cof.map(|row| row.map(|c| (c / det) as f32)));
        inv.is_finite().then_some(inv)
    }

    /// Transforms a homogeneous vector by this matrix.
    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z,
        )
    }

    /// Maps a 2D point, dividing by the homogeneous weight.
    ///
    /// Returns `None` when `|w| <= HORIZON_EPSILON * max(|x'|, |y'|, |w|)`
    /// (the point maps to infinity) or the result is not finite. The test
    /// does not change when the whole matrix is scaled.
    #[inline]
    pub fn transform_point(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let v = self.transform(Vec3::new(x, y, 1.0));
        if v.z.abs() <= HORIZON_EPSILON * v.abs().max_element() {
            return None;
        }
        let (px, py) = (v.x / v.z, v.y / v.z);
        (px.is_finite() && py.is_finite()).then_some((px, py))
    }

    /// Multiplies two matrices.
    #[inline]
    pub fn mul_mat(&self, other: &Self) -> Self {
        let mut result = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                result.m[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j];
            }
        }
        result
    }

    /// Returns a matrix applying `self` first, then `next`.
    #[inline]
    pub fn then(&self, next: &Self) -> Self {
        next.mul_mat(self)
    }

    /// Converts to glam Mat3 (column-major).
    #[inline]
    pub fn to_glam(&self) -> glam::Mat3 {
        glam::Mat3::from_cols_array_2d(&self.transpose().m)
    }

    /// Creates from glam Mat3.
    #[inline]
    pub fn from_glam(m: glam::Mat3) -> Self {
        Self::from_cols(m.to_cols_array_2d())
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// Mat3 * Vec3
impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform(rhs)
    }
}

// Mat3 * Mat3
impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

impl Index<usize> for Mat3 {
    type Output = [f32; 3];

    #[inline]
    fn index(&self, i: usize) -> &[f32; 3] {
        &self.m[i]
    }
}
