/*
    Copyright (C) 2020-2022  Rafal Michalski

    This file is part of RASTRUSTY, a Rust library for raster pixel buffers.

    For the full copyright notice, see the lib.rs file.
*/
//! The owned pixel buffer.
use core::cell::Cell;
use core::fmt;

use log::{debug, warn};

use crate::format::{PixelCursor, PixelFormat, PixelTraits};
use crate::geometry::Bounds;

/// An error returned by image construction and region operations.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    /// Width or height was not positive.
    InvalidDimensions,
    /// The pixel storage size overflowed or could not be reserved.
    AllocationFailure,
    /// Requested bounds do not fit within the image.
    OutOfRange,
    /// Pixel formats or dimensions of the involved images or descriptors differ.
    FormatMismatch
}

impl std::error::Error for ImageError {}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageError::InvalidDimensions => "Image dimensions must be positive",
            ImageError::AllocationFailure => "Pixel storage could not be allocated",
            ImageError::OutOfRange => "Bounds exceed the image extent",
            ImageError::FormatMismatch => "Images differ in pixel format or dimensions",
        })
    }
}

/// A rectangular raster of pixels of a single [PixelFormat].
///
/// Rows are stored top to bottom, each occupying [Image::row_stride] bytes. Bits of the
/// last byte of a [PixelFormat::Bitmap] row past the image width are padding: they are
/// never read as pixels and are left unchanged by pixel writes.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    format: PixelFormat,
    width: i32,
    height: i32,
    row_stride: usize,
    data: Box<[u8]>
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_stride", &self.row_stride)
            .finish()
    }
}

impl Image {
    /// Creates an image with every pixel set to raw value 0.
    ///
    /// # Errors
    /// Returns [ImageError::InvalidDimensions] if `width` or `height` is not positive, and
    /// [ImageError::AllocationFailure] if the storage size overflows or can't be reserved.
    pub fn new(format: PixelFormat, width: i32, height: i32) -> Result<Image, ImageError> {
        if width <= 0 || height <= 0 {
            debug!("invalid image dimensions: {}x{}", width, height);
            return Err(ImageError::InvalidDimensions)
        }
        let row_stride = (width as usize).checked_mul(format.bits_per_pixel() as usize)
                         .and_then(|bits| bits.checked_add(7))
                         .map(|bits| bits / 8);
        let size = row_stride.and_then(|stride| stride.checked_mul(height as usize))
                   .filter(|&size| size <= isize::MAX as usize);
        let (row_stride, size) = match (row_stride, size) {
            (Some(row_stride), Some(size)) => (row_stride, size),
            _ => {
                warn!("image storage size overflow: {} {}x{}", format, width, height);
                return Err(ImageError::AllocationFailure)
            }
        };
        let mut data = Vec::new();
        if data.try_reserve_exact(size).is_err() {
            warn!("failed to allocate {} bytes for {} {}x{}", size, format, width, height);
            return Err(ImageError::AllocationFailure)
        }
        data.resize(size, 0);
        debug!("new image: {} {}x{} stride: {}", format, width, height, row_stride);
        Ok(Image { format, width, height, row_stride, data: data.into_boxed_slice() })
    }
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }
    /// Returns the number of bytes per row.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }
    /// Returns bounds covering the whole image.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_size(self.width, self.height)
    }
    /// Returns `true` if the pixel at `(x, y)` lies within the image.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }
    /// Returns the raw pixel storage.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
    /// Returns the storage bytes of row `y`, including padding.
    ///
    /// # Panics
    /// Panics if `y` is out of range.
    pub fn row(&self, y: i32) -> &[u8] {
        assert!(y >= 0 && y < self.height, "row out of range");
        let offset = y as usize * self.row_stride;
        &self.data[offset..offset + self.row_stride]
    }

    pub(crate) fn cells(&mut self) -> &[Cell<u8>] {
        Cell::from_mut(&mut self.data[..]).as_slice_of_cells()
    }

    pub(crate) fn cursor_at<T: PixelTraits>(&self, x: i32, y: i32) -> T::Cursor {
        debug_assert_eq!(T::FORMAT, self.format);
        debug_assert!(self.contains(x, y));
        PixelCursor::at(y as usize * self.row_stride, x as usize)
    }
    /// Returns a pixel of the format `T`.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside of the image or if `T` doesn't match the image format.
    pub fn get<T: PixelTraits>(&self, x: i32, y: i32) -> T::Pixel {
        assert_eq!(T::FORMAT, self.format, "pixel format mismatch");
        assert!(self.contains(x, y), "pixel out of range");
        T::from_raw(self.cursor_at::<T>(x, y).load(&self.data[..]))
    }
    /// Stores a pixel of the format `T`.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside of the image or if `T` doesn't match the image format.
    pub fn put<T: PixelTraits>(&mut self, x: i32, y: i32, pixel: T::Pixel) {
        assert_eq!(T::FORMAT, self.format, "pixel format mismatch");
        assert!(self.contains(x, y), "pixel out of range");
        let cursor = self.cursor_at::<T>(x, y);
        cursor.store(self.cells(), pixel.into());
    }
    /// Returns the raw value of the pixel at `(x, y)`.
    ///
    /// Coordinates must lie within the image. This is checked only in debug builds,
    /// otherwise out-of-range reads return 0.
    pub fn get_pixel(&self, x: i32, y: i32) -> u32 {
        debug_assert!(self.contains(x, y), "pixel out of range");
        if !self.contains(x, y) {
            return 0
        }
        with_pixel_traits!(self.format, T => self.cursor_at::<T>(x, y).load(&self.data[..]))
    }
    /// Stores the raw `value` at `(x, y)`, truncated to the pixel width.
    ///
    /// Coordinates must lie within the image. This is checked only in debug builds,
    /// otherwise out-of-range writes are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, value: u32) {
        debug_assert!(self.contains(x, y), "pixel out of range");
        if !self.contains(x, y) {
            return
        }
        with_pixel_traits!(self.format, T => {
            let cursor = self.cursor_at::<T>(x, y);
            cursor.store(self.cells(), value)
        })
    }
    /// Sets every pixel to the raw `value`.
    pub fn clear(&mut self, value: u32) {
        with_pixel_traits!(self.format, T => {
            <T as PixelTraits>::Cursor::fill(&mut self.data, value)
        })
    }
    /// Sets the pixels of row `y` between columns `x1` and `x2` inclusive.
    ///
    /// The columns may be given in any order. The span is clipped to the image.
    pub fn draw_hline(&mut self, x1: i32, y: i32, x2: i32, value: u32) {
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        if y < 0 || y >= self.height || x2 < 0 || x1 >= self.width {
            return
        }
        let (x1, x2) = (x1.max(0), x2.min(self.width - 1));
        with_pixel_traits!(self.format, T => self.hline::<T>(x1, x2, y, value))
    }
    /// Sets the pixels of column `x` between rows `y1` and `y2` inclusive.
    ///
    /// The rows may be given in any order. The span is clipped to the image.
    pub fn draw_vline(&mut self, x: i32, y1: i32, y2: i32, value: u32) {
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        if x < 0 || x >= self.width || y2 < 0 || y1 >= self.height {
            return
        }
        let (y1, y2) = (y1.max(0), y2.min(self.height - 1));
        with_pixel_traits!(self.format, T => self.vline::<T>(x, y1, y2, value))
    }
    /// Sets the pixels of the `rect` clipped to the image.
    pub fn fill_rect(&mut self, rect: Bounds, value: u32) {
        let area = self.bounds().intersect(&rect);
        if area.is_empty() {
            return
        }
        for y in area.y..area.bottom() {
            self.draw_hline(area.x, y, area.right() - 1, value);
        }
    }

    fn hline<T: PixelTraits>(&mut self, x1: i32, x2: i32, y: i32, value: u32) {
        let mut cursor = self.cursor_at::<T>(x1, y);
        let cells = self.cells();
        for _ in x1..=x2 {
            cursor.store(cells, value);
            cursor.advance();
        }
    }

    fn vline<T: PixelTraits>(&mut self, x: i32, y1: i32, y2: i32, value: u32) {
        let row_stride = self.row_stride;
        let cells = self.cells();
        for y in y1..=y2 {
            <T as PixelTraits>::Cursor::at(y as usize * row_stride, x as usize).store(cells, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::*;

    const FORMATS: [PixelFormat; 4] = [PixelFormat::Rgb, PixelFormat::Grayscale,
                                       PixelFormat::Indexed, PixelFormat::Bitmap];

    #[test]
    fn image_new_works() {
        for &format in FORMATS.iter() {
            let image = Image::new(format, 9, 3).unwrap();
            assert_eq!(image.format(), format);
            assert_eq!((image.width(), image.height()), (9, 3));
            assert_eq!(image.as_bytes().len(), 3 * image.row_stride());
            assert!(image.as_bytes().iter().all(|&b| b == 0));
            assert_eq!(image.bounds(), Bounds::new(0, 0, 9, 3));
            assert_eq!(Image::new(format, 0, 3), Err(ImageError::InvalidDimensions));
            assert_eq!(Image::new(format, 9, 0), Err(ImageError::InvalidDimensions));
            assert_eq!(Image::new(format, -1, -1), Err(ImageError::InvalidDimensions));
        }
        let strides: Vec<usize> = FORMATS.iter()
            .map(|&format| Image::new(format, 9, 1).unwrap().row_stride())
            .collect();
        assert_eq!(strides, [36, 18, 9, 2]);
    }

    #[test]
    fn image_allocation_failure_works() {
        let res = Image::new(PixelFormat::Rgb, i32::MAX, i32::MAX);
        assert_eq!(res, Err(ImageError::AllocationFailure));
        assert_eq!(ImageError::AllocationFailure.to_string(), "Pixel storage could not be allocated");
    }

    #[test]
    fn image_get_put_works() {
        for &format in FORMATS.iter() {
            let mut image = Image::new(format, 5, 4).unwrap();
            let max = format.max_value();
            image.put_pixel(4, 3, max);
            image.put_pixel(0, 0, 0x1234_5678);
            assert_eq!(image.get_pixel(4, 3), max);
            assert_eq!(image.get_pixel(0, 0), 0x1234_5678 & max);
            assert_eq!(image.get_pixel(1, 0), 0);
        }
        let mut image = Image::new(PixelFormat::Bitmap, 10, 2).unwrap();
        image.put::<BitmapTraits>(0, 1, 1);
        image.put::<BitmapTraits>(9, 1, 1);
        assert_eq!(image.get::<BitmapTraits>(9, 1), 1);
        assert_eq!(image.row(0), [0, 0]);
        assert_eq!(image.row(1), [1, 0b10]);
        let mut image = Image::new(PixelFormat::Grayscale, 2, 1).unwrap();
        image.put::<GrayscaleTraits>(1, 0, GrayscaleTraits::pack([0x80, 0xff]));
        assert_eq!(image.get::<GrayscaleTraits>(1, 0), 0xff80);
        assert_eq!(image.as_bytes(), [0, 0, 0x80, 0xff]);
    }

    #[test]
    #[should_panic(expected = "pixel format mismatch")]
    fn image_get_checks_format() {
        let image = Image::new(PixelFormat::Indexed, 1, 1).unwrap();
        image.get::<RgbTraits>(0, 0);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "pixel out of range")]
    fn image_get_pixel_asserts_range() {
        let image = Image::new(PixelFormat::Bitmap, 3, 3).unwrap();
        image.get_pixel(3, 0);
    }

    #[test]
    fn image_clear_works() {
        for &format in FORMATS.iter() {
            let mut image = Image::new(format, 7, 3).unwrap();
            image.clear(0x8765_4321);
            let expected = 0x8765_4321 & format.max_value();
            for y in 0..3 {
                for x in 0..7 {
                    assert_eq!(image.get_pixel(x, y), expected);
                }
            }
        }
    }

    #[test]
    fn image_draw_hline_works() {
        for &format in FORMATS.iter() {
            let mut image = Image::new(format, 12, 3).unwrap();
            image.draw_hline(10, 1, 3, 1);
            image.draw_hline(-5, 2, 100, 1);
            image.draw_hline(0, 3, 11, 1);
            image.draw_hline(12, 0, 20, 1);
            image.draw_hline(-3, 0, -1, 1);
            for x in 0..12 {
                assert_eq!(image.get_pixel(x, 0), 0);
                assert_eq!(image.get_pixel(x, 1), (3..=10).contains(&x) as u32);
                assert_eq!(image.get_pixel(x, 2), 1);
            }
        }
    }

    #[test]
    fn image_draw_vline_and_fill_rect_works() {
        for &format in FORMATS.iter() {
            let mut image = Image::new(format, 6, 6).unwrap();
            image.draw_vline(1, 4, -2, 1);
            image.fill_rect(Bounds::new(3, 3, 10, 10), 1);
            image.fill_rect(Bounds::new(3, 0, 0, 2), 1);
            for y in 0..6 {
                for x in 0..6 {
                    let expected = (x == 1 && y <= 4) || (x >= 3 && y >= 3);
                    assert_eq!(image.get_pixel(x, y), expected as u32);
                }
            }
        }
    }

    #[test]
    fn image_debug_works() {
        let image = Image::new(PixelFormat::Indexed, 2, 2).unwrap();
        assert_eq!(format!("{:?}", image),
                   "Image { format: Indexed, width: 2, height: 2, row_stride: 2 }");
    }
}
