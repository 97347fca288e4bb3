//! # warpfx-core
//!
//! Core types for geometric image resampling.
//!
//! - [`Pixel`] - Capability to unpack/pack a linear RGBA `Vec4`
//! - [`PixelFormat`] - Channel storage types (u8, u16, f16, f32)
//! - [`Rgba`], [`Rgb`], [`Luma`] - Concrete pixel types
//! - [`Image`] - Fixed-size, copy-on-write pixel grid
//!
//! ## Crate Structure
//!
//! ```text
//! warpfx-core (this crate)
//!    ^
//!    |
//!    +-- warpfx-math (affine/projective matrices)
//!    +-- warpfx-ops (kernels, transform resampler)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;

pub use error::*;
pub use image::*;
pub use pixel::{
    luminance_rec709, Luma, Luma32F, Luma8, Pixel, PixelFormat, Rgb, Rgb32F, Rgb8, Rgba,
    Rgba16, Rgba32F, Rgba8, RgbaF16, REC709_LUMA_B, REC709_LUMA_G, REC709_LUMA_R,
};

/// Prelude module for convenient imports.
///
/// ```
/// use warpfx_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::Image;
    pub use crate::pixel::{
        Luma, Luma32F, Luma8, Pixel, PixelFormat, Rgb, Rgb32F, Rgb8, Rgba, Rgba16, Rgba32F,
        Rgba8, RgbaF16,
    };
}
