//! 2x3 affine matrices.
//!
//! [`Affine`] maps `(x, y)` to
//!
//! ```text
//! x' = a*x + b*y + tx
//! y' = c*x + d*y + ty
//! ```
//!
//! stored row-major as `[[a, b, tx], [c, d, ty]]`. Image coordinates are
//! y-down, so a positive rotation angle turns clockwise on screen.
//!
//! # Usage
//!
//! ```rust
//! use warpfx_math::Affine;
//!
//! // Rotate 90 degrees about (3.5, 3.5), then move 10 pixels right.
//! let m = Affine::rotation_about(90.0, 3.5, 3.5).then(&Affine::translation(10.0, 0.0));
//! let (x, y) = m.transform_point(0.0, 0.0);
//! assert_eq!((x, y), (17.0, 0.0));
//! ```

use crate::Mat3;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::Mul;

/// A 2x3 affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Affine {
    /// Matrix elements in row-major order: `[[a, b, tx], [c, d, ty]]`
    pub m: [[f32; 3]; 2],
}

impl Affine {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    };

    /// Creates a transform from its six coefficients `[a, b, tx, c, d, ty]`.
    #[inline]
    pub const fn from_coeffs(c: [f32; 6]) -> Self {
        Self {
            m: [[c[0], c[1], c[2]], [c[3], c[4], c[5]]],
        }
    }

    /// Returns the six coefficients `[a, b, tx, c, d, ty]`.
    #[inline]
    pub fn coeffs(&self) -> [f32; 6] {
        let [[a, b, tx], [c, d, ty]] = self.m;
        [a, b, tx, c, d, ty]
    }

    /// Translation by `(tx, ty)`.
    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self::from_coeffs([1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    /// Scale about the origin.
    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self::from_coeffs([sx, 0.0, 0.0, 0.0, sy, 0.0])
    }

    /// Rotation about the origin.
    ///
    /// Whole quarter turns produce exact `0`/`±1` coefficients so that
    /// 90-degree rotations land on pixel centers without rounding drift.
    pub fn rotation_radians(radians: f32) -> Self {
        let (sin, cos) = quarter_turn_sin_cos(radians);
        Self::from_coeffs([cos, -sin, 0.0, sin, cos, 0.0])
    }

    /// Rotation about the origin, in degrees.
    #[inline]
    pub fn rotation_degrees(degrees: f32) -> Self {
        Self::rotation_radians(degrees.to_radians())
    }

    /// Rotation by `degrees` about `(cx, cy)`.
    pub fn rotation_about(degrees: f32, cx: f32, cy: f32) -> Self {
        Self::translation(-cx, -cy)
            .then(&Self::rotation_degrees(degrees))
            .then(&Self::translation(cx, cy))
    }

    /// Shear by the given angles, in degrees.
    ///
    /// `degrees_x` tilts vertical lines (x shifts with y), `degrees_y`
    /// tilts horizontal lines.
    pub fn skew_degrees(degrees_x: f32, degrees_y: f32) -> Self {
        Self::from_coeffs([
            1.0,
            degrees_x.to_radians().tan(),
            0.0,
            degrees_y.to_radians().tan(),
            1.0,
            0.0,
        ])
    }

    /// Returns a transform applying `self` first, then `next`.
    #[inline]
    pub fn then(&self, next: &Self) -> Self {
        let [[a1, b1, tx1], [c1, d1, ty1]] = self.m;
        let [[a2, b2, tx2], [c2, d2, ty2]] = next.m;
        Self::from_coeffs([
            a2 * a1 + b2 * c1,
            a2 * b1 + b2 * d1,
            a2 * tx1 + b2 * ty1 + tx2,
            c2 * a1 + d2 * c1,
            c2 * b1 + d2 * d1,
            c2 * tx1 + d2 * ty1 + ty2,
        ])
    }

    /// Determinant of the linear 2x2 part.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0]
    }

    /// Returns true if all coefficients are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// Computes the inverse transform.
    ///
    /// Returns `None` if the linear part is singular or a coefficient is
    /// not finite. Singularity is judged relative to the row magnitudes of
    /// the linear part, so uniformly tiny or huge scales stay invertible.
    pub fn inverse(&self) -> Option<Self> {
        if !self.is_finite() {
            return None;
        }
        let [[a, b, tx], [c, d, ty]] = self.m.map(|row| row.map(f64::from));
        let det = a * d - b * c;
        let scale = a.hypot(b) * c.hypot(d);
        if scale == 0.0 || det.abs() <= f64::from(f32::EPSILON) * scale {
            return None;
        }

        let a_inv = d / det;
        let b_inv = -b / det;
        let c_inv = -c / det;
        let d_inv = a / det;

        let inv = Self::from_coeffs([
            a_inv,
            b_inv,
            -(a_inv * tx + b_inv * ty),
            c_inv,
            d_inv,
            -(c_inv * tx + d_inv * ty),
        ]
        .map(|v| v as f32));
        inv.is_finite().then_some(inv)
    }

    /// Maps a point.
    #[inline]
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let [[a, b, tx], [c, d, ty]] = self.m;
        (a * x + b * y + tx, c * x + d * y + ty)
    }

    /// Embeds into a 3x3 matrix with third row `[0, 0, 1]`.
    #[inline]
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_rows([self.m[0], self.m[1], [0.0, 0.0, 1.0]])
    }

    /// Extracts the affine part of a matrix whose third row is `[0, 0, 1]`.
    #[inline]
    pub fn from_mat3(m: &Mat3) -> Option<Self> {
        m.is_affine().then(|| Self { m: [m.m[0], m.m[1]] })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// Affine * Affine: apply rhs first, like matrix multiplication.
impl Mul for Affine {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        rhs.then(&self)
    }
}

/// `(sin, cos)` with exact values at multiples of 90 degrees.
fn quarter_turn_sin_cos(radians: f32) -> (f32, f32) {
    const SNAP: f32 = 1e-5;
    let turns = radians.rem_euclid(TAU) / FRAC_PI_2;
    let nearest = turns.round();
    if (turns - nearest).abs() < SNAP {
        match nearest as i32 % 4 {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        }
    } else {
        radians.sin_cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_translation_and_scale() {
        assert_eq!(Affine::translation(2.0, -1.0).transform_point(1.0, 1.0), (3.0, 0.0));
        assert_eq!(Affine::scale(2.0, 3.0).transform_point(1.0, 1.0), (2.0, 3.0));
    }

    #[test]
    fn test_quarter_turns_are_exact() {
        assert_eq!(Affine::rotation_degrees(90.0).coeffs(), [0.0, -1.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(Affine::rotation_degrees(180.0).transform_point(1.0, 2.0), (-1.0, -2.0));
        assert_eq!(Affine::rotation_degrees(-90.0).transform_point(1.0, 0.0), (0.0, -1.0));
        assert_eq!(Affine::rotation_degrees(360.0), Affine::IDENTITY);
    }

    #[test]
    fn test_rotation_about_center_maps_corners() {
        let m = Affine::rotation_about(90.0, 3.5, 3.5);
        assert_eq!(m.transform_point(0.0, 0.0), (7.0, 0.0));
        assert_eq!(m.transform_point(7.0, 0.0), (7.0, 7.0));
        assert_eq!(m.transform_point(7.0, 7.0), (0.0, 7.0));
        assert_eq!(m.transform_point(0.0, 7.0), (0.0, 0.0));
    }

    #[test]
    fn test_general_rotation() {
        let (x, y) = Affine::rotation_degrees(30.0).transform_point(1.0, 0.0);
        assert_abs_diff_eq!(x, 30f32.to_radians().cos(), epsilon = 1e-6);
        assert_abs_diff_eq!(y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_skew() {
        let (x, y) = Affine::skew_degrees(45.0, 0.0).transform_point(0.0, 2.0);
        assert_abs_diff_eq!(x, 2.0, epsilon = 1e-5);
        assert_eq!(y, 2.0);
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Affine::rotation_about(33.0, 10.0, 4.0)
            .then(&Affine::scale(1.5, 0.75))
            .then(&Affine::translation(-3.0, 8.0));
        let inv = m.inverse().unwrap();
        let (x, y) = m.transform_point(12.25, -3.5);
        let (bx, by) = inv.transform_point(x, y);
        assert_abs_diff_eq!(bx, 12.25, epsilon = 1e-4);
        assert_abs_diff_eq!(by, -3.5, epsilon = 1e-4);
    }

    #[test]
    fn test_tiny_and_huge_scales_invert() {
        for k in [1e-6, 1e6] {
            let m = Affine::scale(k, k);
            let inv = m.inverse().unwrap();
            let (x, y) = m.transform_point(3.0, 5.0);
            let (bx, by) = inv.transform_point(x, y);
            assert_abs_diff_eq!(bx, 3.0, epsilon = 1e-4);
            assert_abs_diff_eq!(by, 5.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Affine::scale(0.0, 1.0).inverse().is_none());
        assert!(Affine::from_coeffs([1.0, 2.0, 0.0, 2.0, 4.0, 0.0]).inverse().is_none());
        assert!(Affine::translation(f32::INFINITY, 0.0).inverse().is_none());
    }

    #[test]
    fn test_mul_matches_then() {
        let a = Affine::scale(2.0, 2.0);
        let b = Affine::translation(1.0, 0.0);
        assert_eq!(a * b, b.then(&a));
        assert_eq!((a * b).transform_point(0.0, 0.0), (2.0, 0.0));
    }

    #[test]
    fn test_mat3_round_trip() {
        let m = Affine::from_coeffs([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(Affine::from_mat3(&m.to_mat3()), Some(m));
        assert_eq!(m.to_mat3().transform_point(1.0, 1.0), Some(m.transform_point(1.0, 1.0)));
    }
}
