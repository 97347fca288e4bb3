//! Pixel types and the pixel capability used by resampling.
//!
//! Resampling never works on stored channel values directly. Every pixel is
//! unpacked into a linear [`Vec4`] (`[R, G, B, A]`, integer formats
//! normalized to `[0.0, 1.0]`), accumulated with scaled additions, and packed
//! back on write. The [`Pixel`] trait is that capability.
//!
//! # Types
//!
//! - [`PixelFormat`] - Channel storage types (u8, u16, f16, f32)
//! - [`Rgba`] - 4 channels with straight alpha
//! - [`Rgb`] - 3 channels, unpacks with opaque alpha
//! - [`Luma`] - single luminance channel
//!
//! ```
//! use warpfx_core::prelude::*;
//!
//! let px: Rgba<u8> = Rgba::new(255, 128, 0, 255);
//! let v = px.to_vector4();
//! assert!((v.y - 0.502).abs() < 0.01);
//! assert_eq!(Rgba::<u8>::from_vector4(v), px);
//! ```
//!
//! # Memory Layout
//!
//! All pixel types use `#[repr(C)]` so an image buffer is a plain
//! interleaved channel array.

use glam::Vec4;
use half::f16;
use std::fmt;

/// Rec.709 luminance coefficient for red channel.
pub const REC709_LUMA_R: f32 = 0.2126;

/// Rec.709 luminance coefficient for green channel.
pub const REC709_LUMA_G: f32 = 0.7152;

/// Rec.709 luminance coefficient for blue channel.
pub const REC709_LUMA_B: f32 = 0.0722;

/// Calculate Rec.709 luminance from RGB values.
///
/// ```
/// use warpfx_core::pixel::luminance_rec709;
/// let luma = luminance_rec709([0.5, 0.3, 0.2]);
/// assert!((luma - 0.3353).abs() < 0.0001);
/// ```
#[inline]
pub fn luminance_rec709(rgb: [f32; 3]) -> f32 {
    rgb[0] * REC709_LUMA_R + rgb[1] * REC709_LUMA_G + rgb[2] * REC709_LUMA_B
}

/// Trait for channel storage types.
///
/// Implemented for `u8`, `u16`, [`half::f16`] and `f32`. Integer types are
/// normalized to `[0.0, 1.0]` by [`to_f32`](PixelFormat::to_f32) and clamped
/// by [`from_f32`](PixelFormat::from_f32).
///
/// ```
/// use warpfx_core::PixelFormat;
///
/// let byte_val: u8 = 128;
/// assert!((byte_val.to_f32() - 0.502).abs() < 0.01);
///
/// let back: u16 = PixelFormat::from_f32(0.5);
/// assert_eq!(back, 32768);
/// ```
pub trait PixelFormat:
    Copy + Clone + Default + Send + Sync + PartialEq + fmt::Debug + 'static
{
    /// Number of bits per channel.
    const BITS: u32;

    /// Whether this is a floating-point format.
    const IS_FLOAT: bool;

    /// Convert to f32 (normalized for integers).
    fn to_f32(self) -> f32;

    /// Convert from f32 (clamped to `[0, 1]` for integers).
    fn from_f32(v: f32) -> Self;

    /// Zero value.
    fn zero() -> Self;

    /// One value (1.0 for floats, max for integers).
    fn one() -> Self;
}

impl PixelFormat for u8 {
    const BITS: u32 = 8;
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 255.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        255
    }
}

impl PixelFormat for u16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 65535.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v.clamp(0.0, 1.0) * 65535.0).round() as u16
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        65535
    }
}

impl PixelFormat for f16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        f16::from_f32(v)
    }

    #[inline]
    fn zero() -> Self {
        f16::ZERO
    }

    #[inline]
    fn one() -> Self {
        f16::ONE
    }
}

impl PixelFormat for f32 {
    const BITS: u32 = 32;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }
}

/// Pixel capability required by the resampler.
///
/// A pixel must unpack into a linear RGBA [`Vec4`] and pack back from one.
/// Weighted accumulation happens on the vectors (`sum += w * v`), never on
/// the stored representation, so precision does not degrade with the number
/// of taps.
///
/// `from_vector4` receives values the caller has already clamped when the
/// result comes out of a resampling pass; implementations may still clamp
/// for their own storage range.
pub trait Pixel: Copy + Default + Send + Sync + PartialEq + fmt::Debug + 'static {
    /// Number of stored channels.
    const CHANNELS: usize;

    /// Unpacks to `[R, G, B, A]`.
    fn to_vector4(self) -> Vec4;

    /// Packs from `[R, G, B, A]`.
    fn from_vector4(v: Vec4) -> Self;

    /// Fully transparent black, the edge-policy pixel.
    #[inline]
    fn transparent() -> Self {
        Self::from_vector4(Vec4::ZERO)
    }
}

/// RGBA pixel with straight (not premultiplied) alpha.
///
/// ```
/// use warpfx_core::prelude::*;
///
/// let px: Rgba<f32> = Rgba::new(1.0, 0.0, 0.0, 0.5);
/// assert_eq!(px.to_vector4(), glam::Vec4::new(1.0, 0.0, 0.0, 0.5));
/// ```
#[repr(C)]
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Rgba<T: PixelFormat> {
    /// Red channel value.
    pub r: T,
    /// Green channel value.
    pub g: T,
    /// Blue channel value.
    pub b: T,
    /// Alpha channel value.
    pub a: T,
}

impl<T: PixelFormat> Rgba<T> {
    /// Create a new RGBA pixel.
    #[inline]
    pub const fn new(r: T, g: T, b: T, a: T) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque pixel.
    #[inline]
    pub fn opaque(r: T, g: T, b: T) -> Self {
        Self::new(r, g, b, T::one())
    }

    /// Create a grayscale pixel with equal RGB values.
    #[inline]
    pub fn gray(v: T, a: T) -> Self {
        Self::new(v, v, v, a)
    }

    /// Opaque black.
    #[inline]
    pub fn black() -> Self {
        Self::new(T::zero(), T::zero(), T::zero(), T::one())
    }

    /// Opaque white.
    #[inline]
    pub fn white() -> Self {
        Self::new(T::one(), T::one(), T::one(), T::one())
    }

    /// Get RGBA values as an array.
    #[inline]
    pub fn to_array(self) -> [T; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from an array.
    #[inline]
    pub fn from_array(arr: [T; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Check if pixel is fully transparent.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a.to_f32() < 1e-6
    }
}

impl<T: PixelFormat> Pixel for Rgba<T> {
    const CHANNELS: usize = 4;

    #[inline]
    fn to_vector4(self) -> Vec4 {
        Vec4::new(
            self.r.to_f32(),
            self.g.to_f32(),
            self.b.to_f32(),
            self.a.to_f32(),
        )
    }

    #[inline]
    fn from_vector4(v: Vec4) -> Self {
        Self::new(
            T::from_f32(v.x),
            T::from_f32(v.y),
            T::from_f32(v.z),
            T::from_f32(v.w),
        )
    }
}

impl<T: PixelFormat> fmt::Debug for Rgba<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rgba")
            .field("r", &self.r)
            .field("g", &self.g)
            .field("b", &self.b)
            .field("a", &self.a)
            .finish()
    }
}

/// RGB pixel. Unpacks with alpha 1.0; alpha is dropped on pack.
#[repr(C)]
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Rgb<T: PixelFormat> {
    /// Red channel value.
    pub r: T,
    /// Green channel value.
    pub g: T,
    /// Blue channel value.
    pub b: T,
}

impl<T: PixelFormat> Rgb<T> {
    /// Create a new RGB pixel.
    #[inline]
    pub const fn new(r: T, g: T, b: T) -> Self {
        Self { r, g, b }
    }

    /// Get RGB values as an array.
    #[inline]
    pub fn to_array(self) -> [T; 3] {
        [self.r, self.g, self.b]
    }
}

impl<T: PixelFormat> Pixel for Rgb<T> {
    const CHANNELS: usize = 3;

    #[inline]
    fn to_vector4(self) -> Vec4 {
        Vec4::new(self.r.to_f32(), self.g.to_f32(), self.b.to_f32(), 1.0)
    }

    #[inline]
    fn from_vector4(v: Vec4) -> Self {
        Self::new(T::from_f32(v.x), T::from_f32(v.y), T::from_f32(v.z))
    }
}

impl<T: PixelFormat> fmt::Debug for Rgb<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rgb")
            .field("r", &self.r)
            .field("g", &self.g)
            .field("b", &self.b)
            .finish()
    }
}

/// Single-channel luminance pixel.
///
/// Unpacks as `(l, l, l, 1)`; packs with Rec.709 luminance of the RGB part.
#[repr(C)]
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Luma<T: PixelFormat> {
    /// Luminance value.
    pub l: T,
}

impl<T: PixelFormat> Luma<T> {
    /// Create a new luminance pixel.
    #[inline]
    pub const fn new(l: T) -> Self {
        Self { l }
    }
}

impl<T: PixelFormat> Pixel for Luma<T> {
    const CHANNELS: usize = 1;

    #[inline]
    fn to_vector4(self) -> Vec4 {
        let l = self.l.to_f32();
        Vec4::new(l, l, l, 1.0)
    }

    #[inline]
    fn from_vector4(v: Vec4) -> Self {
        Self::new(T::from_f32(luminance_rec709([v.x, v.y, v.z])))
    }
}

impl<T: PixelFormat> fmt::Debug for Luma<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Luma").field("l", &self.l).finish()
    }
}

/// 8-bit RGBA.
pub type Rgba8 = Rgba<u8>;
/// 16-bit RGBA.
pub type Rgba16 = Rgba<u16>;
/// Half-float RGBA.
pub type RgbaF16 = Rgba<f16>;
/// 32-bit float RGBA.
pub type Rgba32F = Rgba<f32>;
/// 8-bit RGB.
pub type Rgb8 = Rgb<u8>;
/// 32-bit float RGB.
pub type Rgb32F = Rgb<f32>;
/// 8-bit luminance.
pub type Luma8 = Luma<u8>;
/// 32-bit float luminance.
pub type Luma32F = Luma<f32>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_pixel_format_u8() {
        assert_eq!(<u8 as PixelFormat>::BITS, 8);
        assert!(!u8::IS_FLOAT);
        assert!((128u8.to_f32() - 0.502).abs() < 0.01);
        assert_eq!(u8::from_f32(0.5), 128);
        assert_eq!(u8::from_f32(1.7), 255);
        assert_eq!(u8::from_f32(-0.2), 0);
    }

    #[test]
    fn test_pixel_format_f16() {
        let h: f16 = PixelFormat::from_f32(0.25);
        assert_eq!(PixelFormat::to_f32(h), 0.25);
        assert_eq!(<f16 as PixelFormat>::one(), f16::ONE);
    }

    #[test]
    fn test_rgba_vector_round_trip_u16() {
        let px: Rgba16 = Rgba::new(0, 1000, 40000, 65535);
        assert_eq!(Rgba16::from_vector4(px.to_vector4()), px);
    }

    #[test]
    fn test_rgb_unpacks_opaque() {
        let px: Rgb8 = Rgb::new(255, 0, 0);
        let v = px.to_vector4();
        assert_eq!(v.w, 1.0);
        assert_eq!(Rgb8::from_vector4(v), px);
    }

    #[test]
    fn test_luma_pack_uses_rec709() {
        let l = Luma32F::from_vector4(Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_abs_diff_eq!(l.l, REC709_LUMA_R, epsilon = 1e-6);

        let gray = Luma32F::new(0.4);
        assert_abs_diff_eq!(Luma32F::from_vector4(gray.to_vector4()).l, 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_transparent() {
        let px = Rgba8::transparent();
        assert_eq!(px.to_array(), [0, 0, 0, 0]);
        assert!(px.is_transparent());
        assert!(!Rgba8::black().is_transparent());
    }

    #[test]
    fn test_named_colors_and_arrays() {
        assert_eq!(Rgba8::white().to_array(), [255; 4]);
        assert_eq!(Rgba32F::white().to_vector4(), Vec4::ONE);
        let px = Rgba16::from_array([1, 2, 3, 4]);
        assert_eq!(px, Rgba16::new(1, 2, 3, 4));
        assert_eq!(Rgba16::from_array(px.to_array()), px);
    }
}
