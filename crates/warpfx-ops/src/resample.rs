//! Kernel-weighted resampling under an affine or projective transform.
//!
//! For each destination pixel the inverse transform gives a real source
//! position `(sx, sy)`. Source pixels within the kernel radius on each
//! axis are combined with separable weights `weight(sx - ix) * weight(sy - iy)`
//! and the sum is normalized by the total weight.
//!
//! # Edge policy
//!
//! - Points mapping more than one radius outside the source are transparent.
//! - Candidates outside the source are dropped, not replicated; the
//!   remaining weights are renormalized.
//! - A total weight with magnitude below `f32::EPSILON` gives transparent.
//! - Results are clamped to `[0, 1]` per channel before packing.
//!
//! # Example
//!
//! ```rust
//! use warpfx_core::{Image, Rgba32F};
//! use warpfx_math::{Affine, Transform};
//! use warpfx_ops::{resample, kernel::Lanczos3, Configuration};
//!
//! let src = Image::filled(8, 8, Rgba32F::new(0.2, 0.4, 0.6, 1.0));
//! let mut dst = Image::new(8, 8);
//! let t = Transform::Affine(Affine::translation(4.0, 0.0));
//! resample::resample(&Configuration::default(), &Lanczos3, &src, &mut dst, &t).unwrap();
//! assert!(dst.pixel(0, 0).is_transparent());
//! assert!((dst.pixel(5, 4).g - 0.4).abs() < 1e-5);
//! ```

use glam::Vec4;
use tracing::{debug, trace, warn};
use warpfx_core::{Image, Pixel};
use warpfx_math::Transform;

use crate::kernel::Resampler;
use crate::{parallel, Configuration, OpsError, OpsResult};

/// Resamples `src` into `dst` under a source-to-destination `transform`.
///
/// Every destination pixel is written unless the configuration's
/// cancellation token fires. Fails before touching `dst` when either image
/// is empty, the kernel radius is not finite and positive, the transform is
/// not invertible, or cancellation was already requested.
pub fn resample<P, R>(
    config: &Configuration,
    kernel: &R,
    src: &Image<P>,
    dst: &mut Image<P>,
    transform: &Transform,
) -> OpsResult<()>
where
    P: Pixel,
    R: Resampler + ?Sized,
{
    let (src_w, src_h) = src.dimensions();
    let (dst_w, dst_h) = dst.dimensions();
    trace!(
        src_w,
        src_h,
        dst_w,
        dst_h,
        radius = kernel.radius(),
        kind = transform.kind(),
        "resample"
    );

    if src.is_empty() || dst.is_empty() {
        warn!(src_w, src_h, dst_w, dst_h, "empty image rejected");
        return Err(OpsError::InvalidDimensions(format!(
            "source {src_w}x{src_h} and destination {dst_w}x{dst_h} must be non-empty"
        )));
    }

    let radius = kernel.radius();
    if !radius.is_finite() || radius <= 0.0 {
        warn!(radius, "kernel radius rejected");
        return Err(OpsError::InvalidParameter(format!(
            "kernel radius must be finite and positive, got {radius}"
        )));
    }

    let inverse = transform.inverse().ok_or_else(|| {
        warn!(kind = transform.kind(), "singular transform rejected");
        OpsError::NonInvertible(format!("{} matrix {:?}", transform.kind(), transform.to_mat3().m))
    })?;

    debug!(
        "Resampling {}x{} -> {}x{} ({}, radius {})",
        src_w,
        src_h,
        dst_w,
        dst_h,
        transform.kind(),
        radius
    );

    let sampler = Sampler::new(kernel, src, config.premultiply_alpha);
    let width = dst_w as usize;
    parallel::for_each_row_block(dst.pixels_mut(), width, config, |first_row, block| {
        let mut weights = Weights::default();
        for (i, row) in block.chunks_exact_mut(width).enumerate() {
            let y = (first_row + i) as f32;
            for (x, out) in row.iter_mut().enumerate() {
                *out = match inverse.map_point(x as f32, y) {
                    Some((sx, sy)) => sampler.sample(sx, sy, &mut weights),
                    None => P::transparent(),
                };
            }
        }
    })
}

/// Per-block scratch for separable weights.
#[derive(Default)]
struct Weights {
    x: Vec<f32>,
    y: Vec<f32>,
}

/// Shared read-only state for sampling one source image.
struct Sampler<'a, P: Pixel, R: ?Sized> {
    kernel: &'a R,
    src: &'a Image<P>,
    radius: f32,
    max_x: i64,
    max_y: i64,
    premultiply: bool,
    point: bool,
}

impl<'a, P: Pixel, R: Resampler + ?Sized> Sampler<'a, P, R> {
    fn new(kernel: &'a R, src: &'a Image<P>, premultiply: bool) -> Self {
        Self {
            kernel,
            src,
            radius: kernel.radius(),
            max_x: src.width() as i64 - 1,
            max_y: src.height() as i64 - 1,
            premultiply,
            point: kernel.is_point_sampler(),
        }
    }

    /// Reconstructs the source at `(sx, sy)`.
    fn sample(&self, sx: f32, sy: f32, weights: &mut Weights) -> P {
        let r = self.radius;
        if sx < -r || sy < -r || sx > self.max_x as f32 + r || sy > self.max_y as f32 + r {
            return P::transparent();
        }
        if self.point {
            return self.nearest(sx, sy);
        }

        let (left, right) = window(sx, r, self.max_x);
        let (top, bottom) = window(sy, r, self.max_y);
        if left > right || top > bottom {
            return P::transparent();
        }

        weights.x.clear();
        weights.x.extend((left..=right).map(|ix| self.kernel.weight(sx - ix as f32)));
        weights.y.clear();
        weights.y.extend((top..=bottom).map(|iy| self.kernel.weight(sy - iy as f32)));

        let mut sum = Vec4::ZERO;
        let mut weight_sum = 0.0f32;
        for (iy, &wy) in (top..=bottom).zip(&weights.y) {
            if wy == 0.0 {
                continue;
            }
            let row = &self.src.row(iy as u32)[left as usize..=right as usize];
            for (px, &wx) in row.iter().zip(&weights.x) {
                let w = wx * wy;
                if w == 0.0 {
                    continue;
                }
                let mut v = px.to_vector4();
                if self.premultiply {
                    v = premultiply(v);
                }
                sum += v * w;
                weight_sum += w;
            }
        }

        if weight_sum.abs() < f32::EPSILON {
            return P::transparent();
        }
        let mut result = sum / weight_sum;
        if self.premultiply {
            result = unpremultiply(result);
        }
        P::from_vector4(result.clamp(Vec4::ZERO, Vec4::ONE))
    }

    fn nearest(&self, sx: f32, sy: f32) -> P {
        let (ix, iy) = (sx.round() as i64, sy.round() as i64);
        self.src.get_pixel(ix, iy).unwrap_or_else(P::transparent)
    }
}

/// Inclusive candidate range `ceil(s - r) ..= floor(s + r)` clamped to `[0, max]`.
#[inline]
fn window(s: f32, r: f32, max: i64) -> (i64, i64) {
    let lo = ((s - r).ceil() as i64).max(0);
    let hi = ((s + r).floor() as i64).min(max);
    (lo, hi)
}

#[inline]
fn premultiply(v: Vec4) -> Vec4 {
    Vec4::new(v.x * v.w, v.y * v.w, v.z * v.w, v.w)
}

#[inline]
fn unpremultiply(v: Vec4) -> Vec4 {
    if v.w.abs() < f32::EPSILON {
        Vec4::ZERO
    } else {
        Vec4::new(v.x / v.w, v.y / v.w, v.z / v.w, v.w)
    }
}
