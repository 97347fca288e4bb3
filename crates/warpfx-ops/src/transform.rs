//! Geometric transforms that allocate their destination.
//!
//! # Operations
//!
//! - [`affine`] - Resample under a 2x3 matrix into a caller-sized image
//! - [`projective`] - Resample under a 3x3 homography into a caller-sized image
//! - [`rotate`] - Rotate about the center, canvas grown to fit
//! - [`skew`] - Shear, canvas grown to fit
//! - [`taper`] - Perspective taper of one side, same canvas
//!
//! # Example
//!
//! ```rust
//! use warpfx_core::{Image, Rgba8};
//! use warpfx_ops::{transform, Configuration, Filter};
//!
//! let src: Image<Rgba8> = Image::filled(64, 32, Rgba8::new(200, 100, 50, 255));
//! let config = Configuration::default();
//! let rotated = transform::rotate(&config, &src, 90.0, &Filter::Lanczos3).unwrap();
//! assert_eq!(rotated.dimensions(), (32, 64));
//! ```

use tracing::{debug, trace, warn};
use warpfx_core::{Image, Pixel};
use warpfx_math::{Affine, Mat3, TaperCorner, TaperSide, Transform};

use crate::kernel::Resampler;
use crate::{resample, Configuration, OpsError, OpsResult};

/// Largest width or height a fitted canvas may grow to.
pub const MAX_FIT_DIMENSION: u32 = 1 << 15;

/// Resamples `src` under an affine matrix into a new `width` x `height` image.
///
/// Destination pixels that map outside the source are transparent.
pub fn affine<P, R>(
    config: &Configuration,
    src: &Image<P>,
    matrix: &Affine,
    width: u32,
    height: u32,
    kernel: &R,
) -> OpsResult<Image<P>>
where
    P: Pixel,
    R: Resampler + ?Sized,
{
    trace!(width, height, "affine");
    let mut dst = Image::new(width, height);
    resample(config, kernel, src, &mut dst, &Transform::Affine(*matrix))?;
    Ok(dst)
}

/// Resamples `src` under a projective matrix into a new `width` x `height` image.
pub fn projective<P, R>(
    config: &Configuration,
    src: &Image<P>,
    matrix: &Mat3,
    width: u32,
    height: u32,
    kernel: &R,
) -> OpsResult<Image<P>>
where
    P: Pixel,
    R: Resampler + ?Sized,
{
    trace!(width, height, "projective");
    let mut dst = Image::new(width, height);
    resample(config, kernel, src, &mut dst, &Transform::Projective(*matrix))?;
    Ok(dst)
}

/// Rotates `src` by `degrees` (clockwise on screen) about its center.
///
/// The canvas grows to the rotated bounding box so no source pixel is cut.
/// Multiples of 90 degrees land exactly on pixel centers.
pub fn rotate<P, R>(
    config: &Configuration,
    src: &Image<P>,
    degrees: f32,
    kernel: &R,
) -> OpsResult<Image<P>>
where
    P: Pixel,
    R: Resampler + ?Sized,
{
    trace!(width = src.width(), height = src.height(), degrees, "rotate");
    finite("degrees", degrees)?;
    let (cx, cy) = center(src);
    fit(config, src, Affine::rotation_about(degrees, cx, cy), kernel)
}

/// Shears `src` by `degrees_x` (x shifts with y) and `degrees_y` (y shifts with x).
///
/// The canvas grows to the sheared bounding box.
pub fn skew<P, R>(
    config: &Configuration,
    src: &Image<P>,
    degrees_x: f32,
    degrees_y: f32,
    kernel: &R,
) -> OpsResult<Image<P>>
where
    P: Pixel,
    R: Resampler + ?Sized,
{
    trace!(width = src.width(), height = src.height(), degrees_x, degrees_y, "skew");
    finite("degrees_x", degrees_x)?;
    finite("degrees_y", degrees_y)?;
    let (cx, cy) = center(src);
    let shear = Affine::translation(-cx, -cy)
        .then(&Affine::skew_degrees(degrees_x, degrees_y))
        .then(&Affine::translation(cx, cy));
    fit(config, src, shear, kernel)
}

/// Tapers one side of `src` to `fraction` of its length, keeping the canvas size.
///
/// `fraction` is clamped to `[0.01, 1]`; `1.0` is the identity. The corner
/// pixel centers of the untouched side stay in place.
pub fn taper<P, R>(
    config: &Configuration,
    src: &Image<P>,
    side: TaperSide,
    corner: TaperCorner,
    fraction: f32,
    kernel: &R,
) -> OpsResult<Image<P>>
where
    P: Pixel,
    R: Resampler + ?Sized,
{
    trace!(width = src.width(), height = src.height(), ?side, ?corner, fraction, "taper");
    finite("fraction", fraction)?;
    let (w, h) = src.dimensions();
    let matrix = Mat3::taper(
        w.saturating_sub(1) as f32,
        h.saturating_sub(1) as f32,
        side,
        corner,
        fraction,
    );
    projective(config, src, &matrix, w, h, kernel)
}

/// Pixel-center midpoint of the image.
fn center<P: Pixel>(src: &Image<P>) -> (f32, f32) {
    (
        src.width().saturating_sub(1) as f32 / 2.0,
        src.height().saturating_sub(1) as f32 / 2.0,
    )
}

fn finite(name: &str, value: f32) -> OpsResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        warn!(name, value, "non-finite parameter rejected");
        Err(OpsError::InvalidParameter(format!("{name} must be finite, got {value}")))
    }
}

/// Applies `matrix`, shifted so its transformed bounds start at the origin,
/// into a canvas sized to those bounds.
fn fit<P, R>(
    config: &Configuration,
    src: &Image<P>,
    matrix: Affine,
    kernel: &R,
) -> OpsResult<Image<P>>
where
    P: Pixel,
    R: Resampler + ?Sized,
{
    let (w, h) = src.dimensions();
    let bounds = Transform::Affine(matrix)
        .transformed_bounds(w, h)
        .ok_or_else(|| OpsError::InvalidDimensions(format!("cannot fit a {w}x{h} image")))?;
    if !(bounds.width().is_finite() && bounds.height().is_finite())
        || bounds.width() >= MAX_FIT_DIMENSION as f32
        || bounds.height() >= MAX_FIT_DIMENSION as f32
    {
        warn!(extent_x = bounds.width(), extent_y = bounds.height(), "fitted canvas too large");
        return Err(OpsError::InvalidParameter(format!(
            "transformed extent {}x{} exceeds {MAX_FIT_DIMENSION}",
            bounds.width(),
            bounds.height()
        )));
    }

    let (out_w, out_h) = bounds.size();
    debug!("Fitting {}x{} into {}x{} canvas", w, h, out_w, out_h);
    let shifted = matrix.then(&Affine::translation(-bounds.min_x, -bounds.min_y));
    affine(config, src, &shifted, out_w, out_h, kernel)
}
