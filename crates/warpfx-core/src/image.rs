//! Image buffer type.
//!
//! [`Image`] is a fixed-size grid of [`Pixel`]s stored in **row-major**
//! order, top-to-bottom:
//!
//! ```text
//! [P(0,0) P(1,0) ... P(w-1,0)]  <- Row 0
//! [P(0,1) P(1,1) ... P(w-1,1)]  <- Row 1
//! ...
//! ```
//!
//! The buffer lives in an `Arc<Vec<P>>`: clones are cheap and share data,
//! mutation goes through copy-on-write. A source image can therefore be
//! cloned into worker closures for free while the destination is mutated
//! through [`Image::pixels_mut`].
//!
//! # Usage
//!
//! ```rust
//! use warpfx_core::{Image, Rgba32F};
//!
//! let mut img: Image<Rgba32F> = Image::new(64, 32);
//! img.set_pixel(10, 5, Rgba32F::new(1.0, 0.5, 0.25, 1.0));
//!
//! assert_eq!(img.pixel(10, 5).g, 0.5);
//! assert!(img.get_pixel(-1, 5).is_none());
//! ```

use crate::{Error, Pixel, Result};
use std::sync::Arc;

/// Owned image buffer.
///
/// Dimensions are fixed at construction; no operation in this workspace
/// resizes an existing image.
#[derive(Clone, PartialEq)]
pub struct Image<P: Pixel> {
    /// Pixel data buffer (Arc for cheap cloning)
    data: Arc<Vec<P>>,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
}

impl<P: Pixel> Image<P> {
    /// Creates a new image filled with transparent black.
    ///
    /// ```rust
    /// use warpfx_core::{Image, Rgba8};
    ///
    /// let img: Image<Rgba8> = Image::new(1920, 1080);
    /// assert_eq!(img.dimensions(), (1920, 1080));
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, P::transparent())
    }

    /// Creates an image filled with a specific pixel value.
    pub fn filled(width: u32, height: u32, pixel: P) -> Self {
        let count = width as usize * height as usize;
        Self {
            data: Arc::new(vec![pixel; count]),
            width,
            height,
        }
    }

    /// Creates an image from existing pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `pixels.len() != width * height`.
    ///
    /// ```rust
    /// use warpfx_core::{Image, Luma8};
    ///
    /// let img = Image::from_pixels(2, 2, vec![Luma8::new(0); 4]).unwrap();
    /// assert_eq!(img.pixel_count(), 4);
    /// assert!(Image::from_pixels(2, 2, vec![Luma8::new(0); 3]).is_err());
    /// ```
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<P>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows"))?;
        if pixels.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, pixels.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(pixels),
            width,
            height,
        })
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel.
    ///
    /// ```rust
    /// use warpfx_core::{Image, Luma32F};
    ///
    /// let ramp = Image::from_fn(4, 1, |x, _| Luma32F::new(x as f32 / 3.0));
    /// assert_eq!(ramp.pixel(3, 0).l, 1.0);
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> P,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the pixel buffer.
    #[inline]
    pub fn pixels(&self) -> &[P] {
        &self.data
    }

    /// Returns the mutable pixel buffer.
    ///
    /// If the data is shared this clones it first (copy-on-write).
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [P] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> P {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[self.offset(x, y)]
    }

    /// Returns the pixel at signed coordinates, or `None` outside the image.
    #[inline]
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<P> {
        if x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64 {
            Some(self.pixel(x as u32, y as u32))
        } else {
            None
        }
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: P) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        Arc::make_mut(&mut self.data)[offset] = pixel;
    }

    /// Sets the pixel at signed coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] outside the image.
    pub fn try_set_pixel(&mut self, x: i64, y: i64, pixel: P) -> Result<()> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        self.set_pixel(x as u32, y as u32, pixel);
        Ok(())
    }

    /// Fills the entire image with a pixel value.
    pub fn fill(&mut self, pixel: P) {
        self.pixels_mut().fill(pixel);
    }

    /// Returns a row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row(&self, y: u32) -> &[P] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Iterates over all pixels with their coordinates.
    pub fn enumerate_pixels(&self) -> impl Iterator<Item = (u32, u32, P)> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }

    /// Converts to another pixel type through the linear vector form.
    ///
    /// ```rust
    /// use warpfx_core::{Image, Rgba32F, Rgba8};
    ///
    /// let float_img: Image<Rgba32F> = Image::filled(2, 2, Rgba32F::new(1.0, 0.5, 0.0, 1.0));
    /// let byte_img: Image<Rgba8> = float_img.convert();
    /// assert_eq!(byte_img.pixel(0, 0).to_array(), [255, 128, 0, 255]);
    /// ```
    pub fn convert<Q: Pixel>(&self) -> Image<Q> {
        Image {
            data: Arc::new(
                self.data
                    .iter()
                    .map(|p| Q::from_vector4(p.to_vector4()))
                    .collect(),
            ),
            width: self.width,
            height: self.height,
        }
    }

    /// Checks that `other` has the same dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] otherwise.
    pub fn ensure_same_size<Q: Pixel>(&self, other: &Image<Q>) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(self.dimensions(), other.dimensions()));
        }
        Ok(())
    }
}

impl<P: Pixel> std::fmt::Debug for Image<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &P::CHANNELS)
            .field("pixel", &std::any::type_name::<P>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Luma8, Rgba32F};

    #[test]
    fn test_image_new_is_transparent() {
        let img: Image<Rgba32F> = Image::new(10, 8);
        assert_eq!(img.dimensions(), (10, 8));
        assert_eq!(img.pixel_count(), 80);
        assert!(img.pixels().iter().all(|p| *p == Rgba32F::transparent()));
    }

    #[test]
    fn test_image_set_get_pixel() {
        let mut img: Image<Rgba32F> = Image::new(10, 10);
        let red = Rgba32F::new(1.0, 0.0, 0.0, 1.0);
        img.set_pixel(5, 5, red);
        assert_eq!(img.pixel(5, 5), red);
        assert_eq!(img.get_pixel(5, 5), Some(red));
        assert_eq!(img.get_pixel(10, 5), None);
        assert_eq!(img.get_pixel(5, -1), None);
    }

    #[test]
    fn test_try_set_pixel_out_of_bounds() {
        let mut img: Image<Luma8> = Image::new(3, 3);
        let err = img.try_set_pixel(-1, 0, Luma8::new(1)).unwrap_err();
        assert!(err.is_bounds_error());
        assert!(img.try_set_pixel(2, 2, Luma8::new(9)).is_ok());
        assert_eq!(img.pixel(2, 2).l, 9);
    }

    #[test]
    fn test_image_from_fn_row_major() {
        let img = Image::from_fn(3, 2, |x, y| Luma8::new((y * 3 + x) as u8));
        assert_eq!(img.row(1).iter().map(|p| p.l).collect::<Vec<_>>(), vec![3, 4, 5]);
        let coords: Vec<_> = img.enumerate_pixels().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords[4], (1, 1));
    }

    #[test]
    fn test_image_clone_cow() {
        let img1: Image<Luma8> = Image::filled(4, 4, Luma8::new(1));
        let mut img2 = img1.clone();
        img2.set_pixel(0, 0, Luma8::new(2));
        assert_eq!(img1.pixel(0, 0).l, 1);
        assert_eq!(img2.pixel(0, 0).l, 2);
    }

    #[test]
    fn test_ensure_same_size() {
        let a: Image<Luma8> = Image::new(4, 4);
        let b: Image<Rgba32F> = Image::new(4, 5);
        assert!(a.ensure_same_size(&a.clone()).is_ok());
        assert!(a.ensure_same_size(&b).is_err());
    }
}
