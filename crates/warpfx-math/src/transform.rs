//! The [`Transform`] sum type and transformed bounds.
//!
//! A transform maps **source** coordinates to **destination** coordinates.
//! Resampling walks the destination and needs the opposite direction, so
//! callers invert once with [`Transform::inverse`] and then call
//! [`Transform::map_point`] per pixel.

use crate::{Affine, Mat3};

/// An affine or projective 2D transform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transform {
    /// 2x3 affine matrix.
    Affine(Affine),
    /// 3x3 projective matrix with homogeneous divide.
    Projective(Mat3),
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self::Affine(Affine::IDENTITY);

    /// Short name used in logs.
    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Affine(_) => "affine",
            Self::Projective(_) => "projective",
        }
    }

    /// Returns the inverse transform, `None` if singular.
    pub fn inverse(&self) -> Option<Self> {
        match self {
            Self::Affine(m) => m.inverse().map(Self::Affine),
            Self::Projective(m) => m.inverse().map(Self::Projective),
        }
    }

    /// Maps a point.
    ///
    /// Returns `None` for projective points on the horizon (zero
    /// homogeneous weight) or with non-finite results.
    #[inline]
    pub fn map_point(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        match self {
            Self::Affine(m) => {
                let (px, py) = m.transform_point(x, y);
                (px.is_finite() && py.is_finite()).then_some((px, py))
            }
            Self::Projective(m) => m.transform_point(x, y),
        }
    }

    /// The equivalent 3x3 matrix.
    #[inline]
    pub fn to_mat3(&self) -> Mat3 {
        match self {
            Self::Affine(m) => m.to_mat3(),
            Self::Projective(m) => *m,
        }
    }

    /// Returns a transform applying `self` first, then `next`.
    ///
    /// Two affine transforms stay affine.
    pub fn then(&self, next: &Self) -> Self {
        match (self, next) {
            (Self::Affine(a), Self::Affine(b)) => Self::Affine(a.then(b)),
            _ => Self::Projective(self.to_mat3().then(&next.to_mat3())),
        }
    }

    /// Axis-aligned box around the mapped pixel centers of a
    /// `width` x `height` grid.
    ///
    /// Returns `None` for empty grids or when a corner maps to the horizon.
    ///
    /// ```rust
    /// use warpfx_math::{Affine, Transform};
    ///
    /// let t = Transform::Affine(Affine::rotation_degrees(90.0));
    /// let b = t.transformed_bounds(8, 4).unwrap();
    /// assert_eq!(b.size(), (4, 8));
    /// ```
    pub fn transformed_bounds(&self, width: u32, height: u32) -> Option<Bounds> {
        if width == 0 || height == 0 {
            return None;
        }
        let (w, h) = ((width - 1) as f32, (height - 1) as f32);
        let mut bounds = Bounds::EMPTY;
        for (x, y) in [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)] {
            let (px, py) = self.map_point(x, y)?;
            bounds.include(px, py);
        }
        Some(bounds)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Affine> for Transform {
    fn from(m: Affine) -> Self {
        Self::Affine(m)
    }
}

impl From<Mat3> for Transform {
    fn from(m: Mat3) -> Self {
        Self::Projective(m)
    }
}

/// Floating-point axis-aligned bounds in pixel-center coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum x.
    pub min_x: f32,
    /// Minimum y.
    pub min_y: f32,
    /// Maximum x.
    pub max_x: f32,
    /// Maximum y.
    pub max_y: f32,
}

impl Bounds {
    const EMPTY: Self = Self {
        min_x: f32::INFINITY,
        min_y: f32::INFINITY,
        max_x: f32::NEG_INFINITY,
        max_y: f32::NEG_INFINITY,
    };

    fn include(&mut self, x: f32, y: f32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Extent along x.
    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Extent along y.
    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Number of pixel centers needed to cover the bounds on each axis.
    ///
    /// Extents within `1e-3` of an integer are rounded down to it first.
    /// Extents too large for `u32`, or not finite, saturate at `u32::MAX`.
    pub fn size(&self) -> (u32, u32) {
        let span = |extent: f32| {
            if extent.is_nan() {
                return u32::MAX;
            }
            ((extent - 1e-3).ceil().max(0.0) as u32).saturating_add(1)
        };
        (span(self.width()), span(self.height()))
    }
}
