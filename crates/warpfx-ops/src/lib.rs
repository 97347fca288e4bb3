//! # warpfx-ops
//!
//! Kernel-based geometric resampling of images.
//!
//! A destination pixel is reconstructed from the source pixels around its
//! inverse-mapped position, weighted by a finite-radius kernel. Lanczos3 is
//! the reference kernel; cubic, Welch, triangle, box and nearest-neighbor
//! kernels share the same machinery.
//!
//! # Modules
//!
//! - [`kernel`] - The [`Resampler`] trait, kernel types and [`Filter`]
//! - [`resample`] - The transform resampler core
//! - [`transform`] - Allocating ops: affine, projective, rotate, skew, taper
//! - [`parallel`] - Row-block execution with optional rayon
//!
//! # Example
//!
//! ```rust
//! use warpfx_core::{Image, Rgba32F};
//! use warpfx_math::Affine;
//! use warpfx_ops::{Configuration, Lanczos3, Resampler};
//!
//! let src = Image::filled(16, 16, Rgba32F::new(0.5, 0.5, 0.5, 1.0));
//! let mut dst = Image::new(32, 32);
//! Lanczos3
//!     .apply_affine_transform(&Configuration::default(), &src, &mut dst, &Affine::scale(2.0, 2.0))
//!     .unwrap();
//! assert!((dst.pixel(10, 10).r - 0.5).abs() < 1e-5);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - Run row blocks on the rayon pool
//! - `serde` - Serialize [`Filter`] and [`Configuration`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
pub mod kernel;
pub mod parallel;
pub mod resample;
pub mod transform;

pub use config::{CancellationToken, Configuration, DEFAULT_MIN_ROWS_PER_TASK};
pub use error::{OpsError, OpsResult};
pub use kernel::{
    sinc, BoxKernel, Cubic, Filter, Lanczos, Lanczos3, NearestNeighbor, Resampler, Triangle, Welch,
};
pub use resample::resample;
