//! Homography construction: four-point correspondences and tapers.
//!
//! A homography is solved from four point pairs with the standard eight
//! unknown formulation (`m22 = 1`):
//!
//! ```text
//! x' = (a*x + b*y + c) / (g*x + h*y + 1)
//! y' = (d*x + e*y + f) / (g*x + h*y + 1)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use warpfx_math::Mat3;
//!
//! let src = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
//! let dst = [(0.0, 0.0), (10.0, 2.0), (10.0, 8.0), (0.0, 10.0)];
//! let h = Mat3::from_quad(src, dst).unwrap();
//! let (x, y) = h.transform_point(10.0, 0.0).unwrap();
//! assert!((x - 10.0).abs() < 1e-3 && (y - 2.0).abs() < 1e-3);
//! ```

use crate::Mat3;

/// Side of the image that a taper shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaperSide {
    /// Left edge.
    Left,
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
}

/// Which end of the tapered edge stays in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaperCorner {
    /// The left (horizontal edge) or top (vertical edge) corner is kept.
    LeftOrTop,
    /// The right (horizontal edge) or bottom (vertical edge) corner is kept.
    RightOrBottom,
    /// The edge shrinks symmetrically toward its midpoint.
    Both,
}

impl Mat3 {
    /// Solves the homography mapping each `src[i]` onto `dst[i]`.
    ///
    /// Returns `None` when the correspondences are degenerate (three
    /// collinear points on either side).
    pub fn from_quad(src: [(f32, f32); 4], dst: [(f32, f32); 4]) -> Option<Self> {
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (x, y) = (src[i].0 as f64, src[i].1 as f64);
            let (u, v) = (dst[i].0 as f64, dst[i].1 as f64);
            a[2 * i] = [x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y];
            b[2 * i] = u;
            a[2 * i + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y];
            b[2 * i + 1] = v;
        }

        let h = solve8(a, b)?;
        let m = Self::from_rows([
            [h[0] as f32, h[1] as f32, h[2] as f32],
            [h[3] as f32, h[4] as f32, h[5] as f32],
            [h[6] as f32, h[7] as f32, 1.0],
        ]);
        m.inverse().map(|_| m)
    }

    /// Perspective taper of one side of a `width` x `height` image.
    ///
    /// The chosen side is shortened to `fraction` of its length (clamped to
    /// `[0.01, 1]`) while the opposite side keeps its corners. `fraction`
    /// of `1.0` yields the identity.
    pub fn taper(
        width: f32,
        height: f32,
        side: TaperSide,
        corner: TaperCorner,
        fraction: f32,
    ) -> Self {
        let fraction = fraction.clamp(0.01, 1.0);
        let (w, h) = (width, height);
        let src = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];

        // Offsets of the two moved endpoints along the tapered edge.
        let shrink = |len: f32| -> (f32, f32) {
            let removed = len * (1.0 - fraction);
            match corner {
                TaperCorner::LeftOrTop => (0.0, removed),
                TaperCorner::RightOrBottom => (removed, 0.0),
                TaperCorner::Both => (removed / 2.0, removed / 2.0),
            }
        };

        let mut dst = src;
        match side {
            TaperSide::Left => {
                let (start, end) = shrink(h);
                dst[0].1 += start;
                dst[3].1 -= end;
            }
            TaperSide::Right => {
                let (start, end) = shrink(h);
                dst[1].1 += start;
                dst[2].1 -= end;
            }
            TaperSide::Top => {
                let (start, end) = shrink(w);
                dst[0].0 += start;
                dst[1].0 -= end;
            }
            TaperSide::Bottom => {
                let (start, end) = shrink(w);
                dst[3].0 += start;
                dst[2].0 -= end;
            }
        }

        Self::from_quad(src, dst).unwrap_or(Self::IDENTITY)
    }
}

/// Gauss-Jordan elimination with partial pivoting on an 8x8 system.
fn solve8(mut a: [[f64; 8]; 8], mut b: [f64; 8]) -> Option<[f64; 8]> {
    const N: usize = 8;
    for col in 0..N {
        let pivot = (col..N).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        let inv = 1.0 / a[col][col];
        for k in col..N {
            a[col][k] *= inv;
        }
        b[col] *= inv;

        for row in 0..N {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    Some(b)
}
