//! # warpfx-math
//!
//! Matrix types for geometric resampling.
//!
//! - [`Affine`] - 2x3 affine transforms (translate, rotate, scale, skew)
//! - [`Mat3`] - 3x3 projective transforms with homogeneous divide
//! - [`Transform`] - either of the two, with inversion and point mapping
//! - [`Mat3::from_quad`], [`Mat3::taper`] - homography construction
//!
//! # Design
//!
//! Matrices are stored **row-major** and act on **column vectors**. The
//! 3x3 type converts to and from `glam::Mat3` for callers that already
//! work in glam.
//!
//! ```rust
//! use warpfx_math::{Affine, Transform};
//!
//! let t: Transform = Affine::rotation_about(30.0, 64.0, 64.0).into();
//! let inv = t.inverse().expect("rotation is invertible");
//! let (x, y) = inv.map_point(64.0, 64.0).unwrap();
//! assert!((x - 64.0).abs() < 1e-4 && (y - 64.0).abs() < 1e-4);
//! ```
//!
//! # Feature Flags
//!
//! - `serde` - Serialize/deserialize matrices and transforms

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod affine;
mod mat3;
mod projective;
mod transform;

pub use affine::*;
pub use mat3::*;
pub use projective::*;
pub use transform::*;

/// Re-export glam types for direct use
pub mod glam {
    pub use ::glam::{Mat3 as GlamMat3, Vec2, Vec3};
}
