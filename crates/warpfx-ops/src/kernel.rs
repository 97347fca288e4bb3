//! Reconstruction kernels.
//!
//! A kernel is a finite-support weight function: it has a radius and
//! evaluates `weight(distance)` for a signed distance in source pixels.
//! Every kernel here is even (`weight(x) == weight(-x)`) and zero for
//! `|x| >= radius`.
//!
//! # Kernels
//!
//! - [`Lanczos3`] - Windowed sinc, radius 3 (the reference kernel)
//! - [`Lanczos`] - Windowed sinc with any radius (2, 3, 5, 8 preset in [`Filter`])
//! - [`Cubic`] - Mitchell-Netravali `(B, C)` family, radius 2
//! - [`Welch`] - Sinc with a parabolic window, radius 3
//! - [`Triangle`] - Linear, radius 1
//! - [`BoxKernel`] - Unit box, radius 0.5
//! - [`NearestNeighbor`] - Point sampling
//!
//! [`Filter`] names every kernel as a single enum value.
//!
//! # Example
//!
//! ```rust
//! use warpfx_ops::kernel::{Filter, Lanczos3, Resampler};
//!
//! assert_eq!(Lanczos3.weight(0.0), 1.0);
//! assert_eq!(Lanczos3.weight(3.0), 0.0);
//! assert_eq!(Filter::Lanczos3.radius(), 3.0);
//! ```

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use warpfx_core::{Image, Pixel};
use warpfx_math::{Affine, Mat3, Transform};

use crate::{resample, Configuration, OpsError, OpsResult};

/// Normalized sinc: `sin(pi x) / (pi x)`, with `sinc(0) = 1`.
#[inline]
pub fn sinc(x: f32) -> f32 {
    let ax = x.abs();
    if ax < f32::EPSILON {
        1.0
    } else {
        let pi_x = PI * ax;
        pi_x.sin() / pi_x
    }
}

/// A finite-support reconstruction kernel.
///
/// Implementors provide [`radius`](Self::radius) and
/// [`weight`](Self::weight); the transform entry points are provided and
/// run the shared resampler with `self` as the kernel.
pub trait Resampler: Send + Sync {
    /// Support radius in source pixels. Must be finite and positive.
    fn radius(&self) -> f32;

    /// Weight at signed distance `x`. Zero for `|x| >= radius`.
    fn weight(&self, x: f32) -> f32;

    /// Point samplers copy the nearest source pixel instead of convolving.
    #[inline]
    fn is_point_sampler(&self) -> bool {
        false
    }

    /// Resamples `src` into `dst` under an affine source-to-destination matrix.
    fn apply_affine_transform<P: Pixel>(
        &self,
        config: &Configuration,
        src: &Image<P>,
        dst: &mut Image<P>,
        matrix: &Affine,
    ) -> OpsResult<()>
    where
        Self: Sized,
    {
        resample::resample(config, self, src, dst, &Transform::Affine(*matrix))
    }

    /// Resamples `src` into `dst` under a projective source-to-destination matrix.
    fn apply_projective_transform<P: Pixel>(
        &self,
        config: &Configuration,
        src: &Image<P>,
        dst: &mut Image<P>,
        matrix: &Mat3,
    ) -> OpsResult<()>
    where
        Self: Sized,
    {
        resample::resample(config, self, src, dst, &Transform::Projective(*matrix))
    }
}

/// Lanczos windowed sinc with radius 3.
///
/// `weight(x) = sinc(x) * sinc(x / 3)` for `|x| < 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lanczos3;

impl Resampler for Lanczos3 {
    #[inline]
    fn radius(&self) -> f32 {
        3.0
    }

    #[inline]
    fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        if ax < 3.0 { sinc(ax) * sinc(ax / 3.0) } else { 0.0 }
    }
}

/// Lanczos windowed sinc with an arbitrary radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lanczos {
    radius: f32,
}

impl Lanczos {
    /// Creates a Lanczos kernel. The radius must be finite and positive.
    pub fn new(radius: f32) -> OpsResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "lanczos radius must be positive, got {radius}"
            )));
        }
        Ok(Self { radius })
    }

    const fn preset(radius: f32) -> Self {
        Self { radius }
    }
}

impl Resampler for Lanczos {
    #[inline]
    fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        if ax < self.radius { sinc(ax) * sinc(ax / self.radius) } else { 0.0 }
    }
}

/// Mitchell-Netravali cubic family, radius 2.
///
/// `B` and `C` select the member: `(0, 0.5)` is Catmull-Rom, `(1/3, 1/3)`
/// the Mitchell-Netravali recommendation, `(1, 0)` the B-spline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cubic {
    /// Blur parameter.
    pub b: f32,
    /// Ringing parameter.
    pub c: f32,
}

impl Cubic {
    /// Catmull-Rom spline, also the classic bicubic.
    pub const CATMULL_ROM: Self = Self { b: 0.0, c: 0.5 };
    /// Mitchell-Netravali recommended `B = C = 1/3`.
    pub const MITCHELL_NETRAVALI: Self = Self { b: 1.0 / 3.0, c: 1.0 / 3.0 };
    /// Robidoux cylindrical-tuned cubic.
    pub const ROBIDOUX: Self = Self { b: 0.37822, c: 0.31089 };
    /// Sharper Robidoux variant.
    pub const ROBIDOUX_SHARP: Self = Self { b: 0.26201, c: 0.36899 };
    /// Cubic B-spline (no ringing, soft).
    pub const SPLINE: Self = Self { b: 1.0, c: 0.0 };
    /// Hermite smoothstep.
    pub const HERMITE: Self = Self { b: 0.0, c: 0.0 };
}

impl Resampler for Cubic {
    #[inline]
    fn radius(&self) -> f32 {
        2.0
    }

    #[inline]
    fn weight(&self, x: f32) -> f32 {
        let (b, c) = (self.b, self.c);
        let ax = x.abs();
        if ax < 1.0 {
            ((12.0 - 9.0 * b - 6.0 * c) * ax * ax * ax
                + (-18.0 + 12.0 * b + 6.0 * c) * ax * ax
                + (6.0 - 2.0 * b))
                / 6.0
        } else if ax < 2.0 {
            ((-b - 6.0 * c) * ax * ax * ax
                + (6.0 * b + 30.0 * c) * ax * ax
                + (-12.0 * b - 48.0 * c) * ax
                + (8.0 * b + 24.0 * c))
                / 6.0
        } else {
            0.0
        }
    }
}

/// Sinc with a Welch (parabolic) window, radius 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Welch;

impl Resampler for Welch {
    #[inline]
    fn radius(&self) -> f32 {
        3.0
    }

    #[inline]
    fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        if ax < 3.0 {
            let t = ax / 3.0;
            sinc(ax) * (1.0 - t * t)
        } else {
            0.0
        }
    }
}

/// Linear (tent) kernel, radius 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Triangle;

impl Resampler for Triangle {
    #[inline]
    fn radius(&self) -> f32 {
        1.0
    }

    #[inline]
    fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        if ax < 1.0 { 1.0 - ax } else { 0.0 }
    }
}

/// Unit box, radius 0.5.
///
/// A source coordinate exactly halfway between two pixels gets zero weight
/// from both and samples as transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoxKernel;

impl Resampler for BoxKernel {
    #[inline]
    fn radius(&self) -> f32 {
        0.5
    }

    #[inline]
    fn weight(&self, x: f32) -> f32 {
        if x.abs() < 0.5 { 1.0 } else { 0.0 }
    }
}

/// Nearest-neighbor point sampling.
///
/// Weights are those of [`BoxKernel`], but the resampler rounds the source
/// coordinate and copies that pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NearestNeighbor;

impl Resampler for NearestNeighbor {
    #[inline]
    fn radius(&self) -> f32 {
        0.5
    }

    #[inline]
    fn weight(&self, x: f32) -> f32 {
        BoxKernel.weight(x)
    }

    #[inline]
    fn is_point_sampler(&self) -> bool {
        true
    }
}

/// Named kernel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Filter {
    /// Nearest-neighbor point sampling.
    Nearest,
    /// Unit box.
    Box,
    /// Linear tent.
    Triangle,
    /// Classic bicubic (Catmull-Rom coefficients).
    Bicubic,
    /// Catmull-Rom spline.
    CatmullRom,
    /// Mitchell-Netravali `B = C = 1/3`.
    MitchellNetravali,
    /// Robidoux cubic.
    Robidoux,
    /// Sharper Robidoux cubic.
    RobidouxSharp,
    /// Cubic B-spline.
    Spline,
    /// Hermite cubic.
    Hermite,
    /// Welch-windowed sinc, radius 3.
    Welch,
    /// Lanczos radius 2.
    Lanczos2,
    /// Lanczos radius 3.
    #[default]
    Lanczos3,
    /// Lanczos radius 5.
    Lanczos5,
    /// Lanczos radius 8.
    Lanczos8,
}

impl Filter {
    /// Every filter, in declaration order.
    pub const ALL: [Filter; 15] = [
        Filter::Nearest,
        Filter::Box,
        Filter::Triangle,
        Filter::Bicubic,
        Filter::CatmullRom,
        Filter::MitchellNetravali,
        Filter::Robidoux,
        Filter::RobidouxSharp,
        Filter::Spline,
        Filter::Hermite,
        Filter::Welch,
        Filter::Lanczos2,
        Filter::Lanczos3,
        Filter::Lanczos5,
        Filter::Lanczos8,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Nearest => "nearest",
            Filter::Box => "box",
            Filter::Triangle => "triangle",
            Filter::Bicubic => "bicubic",
            Filter::CatmullRom => "catmull-rom",
            Filter::MitchellNetravali => "mitchell-netravali",
            Filter::Robidoux => "robidoux",
            Filter::RobidouxSharp => "robidoux-sharp",
            Filter::Spline => "spline",
            Filter::Hermite => "hermite",
            Filter::Welch => "welch",
            Filter::Lanczos2 => "lanczos2",
            Filter::Lanczos3 => "lanczos3",
            Filter::Lanczos5 => "lanczos5",
            Filter::Lanczos8 => "lanczos8",
        }
    }

    fn cubic(&self) -> Option<Cubic> {
        match self {
            Filter::Bicubic | Filter::CatmullRom => Some(Cubic::CATMULL_ROM),
            Filter::MitchellNetravali => Some(Cubic::MITCHELL_NETRAVALI),
            Filter::Robidoux => Some(Cubic::ROBIDOUX),
            Filter::RobidouxSharp => Some(Cubic::ROBIDOUX_SHARP),
            Filter::Spline => Some(Cubic::SPLINE),
            Filter::Hermite => Some(Cubic::HERMITE),
            _ => None,
        }
    }
}

impl Resampler for Filter {
    #[inline]
    fn radius(&self) -> f32 {
        match self {
            Filter::Nearest | Filter::Box => 0.5,
            Filter::Triangle => 1.0,
            Filter::Lanczos2 => 2.0,
            Filter::Welch | Filter::Lanczos3 => 3.0,
            Filter::Lanczos5 => 5.0,
            Filter::Lanczos8 => 8.0,
            _ => 2.0,
        }
    }

    #[inline]
    fn weight(&self, x: f32) -> f32 {
        match self {
            Filter::Nearest => NearestNeighbor.weight(x),
            Filter::Box => BoxKernel.weight(x),
            Filter::Triangle => Triangle.weight(x),
            Filter::Welch => Welch.weight(x),
            Filter::Lanczos3 => Lanczos3.weight(x),
            Filter::Lanczos2 => Lanczos::preset(2.0).weight(x),
            Filter::Lanczos5 => Lanczos::preset(5.0).weight(x),
            Filter::Lanczos8 => Lanczos::preset(8.0).weight(x),
            other => other.cubic().map_or(0.0, |k| k.weight(x)),
        }
    }

    #[inline]
    fn is_point_sampler(&self) -> bool {
        matches!(self, Filter::Nearest)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Filter::ALL
            .into_iter()
            .find(|f| f.name() == lower || f.name().replace('-', "") == lower)
            .ok_or_else(|| OpsError::InvalidParameter(format!("unknown filter: {s}")))
    }
}
