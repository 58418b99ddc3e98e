/*
    Copyright (C) 2020-2022  Rafal Michalski

    This file is part of RASTRUSTY, a Rust library for raster pixel buffers.

    For the full copyright notice, see the lib.rs file.
*/
//! Scoped access to rectangular regions of image pixels.
//!
//! A region lock binds an [Image] and [Bounds] contained within it. The access mode is carried
//! by the borrow of the image:
//!
//! * [LockImageBits] borrows the image immutably and grants read-only access. Any number of
//!   such locks may coexist.
//! * [LockImageBitsMut] borrows the image exclusively and grants write access. Only one such
//!   lock may exist at a time and no read-only lock may coexist with it.
//!
//! Iterators produced by a lock traverse the locked region in row-major order and can't outlive
//! the lock. Values written through [IterMut] are stored in the image buffer at once and are
//! visible to every other iterator of the same lock. The lock itself has no state to flush:
//! releasing it is just dropping it.
use core::cell::Cell;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr;

use log::{debug, trace};

use crate::format::{ByteSource, PixelCursor, PixelTraits};
use crate::geometry::Bounds;
use crate::image::{Image, ImageError};

/// The access mode of a region lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockMode {
    ReadOnly,
    Write
}

/// A read-only lock of an image region.
///
/// `T` must describe the format of the locked image.
///
/// ```
/// use rastrusty::{Bounds, Image, IndexedTraits, LockImageBits, PixelFormat};
/// # fn main() -> Result<(), rastrusty::ImageError> {
/// let mut image = Image::new(PixelFormat::Indexed, 4, 4)?;
/// image.put_pixel(1, 1, 7);
/// let lock = LockImageBits::<IndexedTraits>::with_bounds(&image, Bounds::new(1, 1, 2, 2))?;
/// assert_eq!(lock.iter().collect::<Vec<_>>(), [7, 0, 0, 0]);
/// # Ok(())
/// # }
/// ```
pub struct LockImageBits<'a, T: PixelTraits> {
    bytes: &'a [u8],
    bounds: Bounds,
    row_stride: usize,
    _traits: PhantomData<T>
}

/// A write lock of an image region.
///
/// `T` must describe the format of the locked image.
///
/// ```
/// use rastrusty::{BitmapTraits, Image, LockImageBitsMut, PixelFormat};
/// # fn main() -> Result<(), rastrusty::ImageError> {
/// let mut image = Image::new(PixelFormat::Bitmap, 10, 2)?;
/// {
///     let lock = LockImageBitsMut::<BitmapTraits>::new(&mut image)?;
///     for pixel in lock.iter_mut().step_by(3) {
///         pixel.set(1);
///     }
/// }
/// assert_eq!(image.get_pixel(9, 0), 1);
/// assert_eq!(image.get_pixel(2, 1), 1);
/// assert_eq!(image.get_pixel(3, 1), 0);
/// # Ok(())
/// # }
/// ```
pub struct LockImageBitsMut<'a, T: PixelTraits> {
    cells: &'a [Cell<u8>],
    bounds: Bounds,
    row_stride: usize,
    _traits: PhantomData<T>
}

/// Walks cursors over a region in row-major order.
#[derive(Clone, Copy, Debug)]
struct Walker<C> {
    cursor: C,
    row_offset: usize,
    column: usize,
    remaining: usize,
    left: usize,
    width: usize,
    row_stride: usize,
    bounds: Bounds
}

impl<C: PixelCursor> Walker<C> {
    // bounds must be contained within the image
    fn new(bounds: Bounds, row_stride: usize) -> Self {
        let left = bounds.x as usize;
        let row_offset = bounds.y as usize * row_stride;
        Walker {
            cursor: C::at(row_offset, left),
            row_offset,
            column: 0,
            remaining: bounds.area(),
            left,
            width: bounds.w.max(0) as usize,
            row_stride,
            bounds
        }
    }

    fn end(bounds: Bounds, row_stride: usize) -> Self {
        Walker { remaining: 0, ..Walker::new(bounds, row_stride) }
    }

    #[inline]
    fn next(&mut self) -> Option<C> {
        if self.remaining == 0 {
            return None
        }
        let cursor = self.cursor;
        self.remaining -= 1;
        self.column += 1;
        if self.column == self.width {
            self.column = 0;
            self.row_offset += self.row_stride;
            if self.remaining != 0 {
                self.cursor = C::at(self.row_offset, self.left);
            }
        }
        else {
            self.cursor.advance();
        }
        Some(cursor)
    }

    #[inline]
    fn same_position(&self, other: &Self) -> bool {
        self.bounds == other.bounds && self.remaining == other.remaining
    }
}

/// An iterator of pixel values of a locked region.
///
/// Two iterators compare equal if they traverse the same storage and bounds and are at
/// the same position. All exhausted iterators of the same lock are equal to its
/// [end](LockImageBits::end).
pub struct Iter<'a, T: PixelTraits, S: ?Sized = [u8]> {
    bytes: &'a S,
    walker: Walker<T::Cursor>
}

/// An iterator of writable pixel references of a locked region.
pub struct IterMut<'a, T: PixelTraits> {
    cells: &'a [Cell<u8>],
    walker: Walker<T::Cursor>
}

/// A reference to a single pixel of a region under a write lock.
pub struct PixelRef<'a, T: PixelTraits> {
    cells: &'a [Cell<u8>],
    cursor: T::Cursor
}

impl<'a, T: PixelTraits> PixelRef<'a, T> {
    /// Returns the current value of the pixel.
    #[inline]
    pub fn get(&self) -> T::Pixel {
        T::from_raw(self.cursor.load(self.cells))
    }
    /// Stores a new value of the pixel.
    #[inline]
    pub fn set(&self, pixel: T::Pixel) {
        self.cursor.store(self.cells, pixel.into())
    }
    /// Stores a raw value truncated to the pixel width.
    #[inline]
    pub fn set_raw(&self, raw: u32) {
        self.cursor.store(self.cells, raw)
    }
}

impl<'a, T: PixelTraits> fmt::Debug for PixelRef<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PixelRef({:?})", self.get())
    }
}

impl<'a, T: PixelTraits, S: ByteSource + ?Sized> Iterator for Iter<'a, T, S> {
    type Item = T::Pixel;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.bytes;
        self.walker.next().map(|cursor| T::from_raw(cursor.load(bytes)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.walker.remaining, Some(self.walker.remaining))
    }
}

impl<'a, T: PixelTraits, S: ByteSource + ?Sized> ExactSizeIterator for Iter<'a, T, S> {}
impl<'a, T: PixelTraits, S: ByteSource + ?Sized> FusedIterator for Iter<'a, T, S> {}

impl<'a, T: PixelTraits, S: ?Sized> Clone for Iter<'a, T, S> {
    fn clone(&self) -> Self {
        Iter { bytes: self.bytes, walker: self.walker }
    }
}

impl<'a, T: PixelTraits, S: ?Sized> PartialEq for Iter<'a, T, S> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.bytes, other.bytes) && self.walker.same_position(&other.walker)
    }
}

impl<'a, T: PixelTraits, S: ?Sized> Eq for Iter<'a, T, S> {}

impl<'a, T: PixelTraits, S: ?Sized> fmt::Debug for Iter<'a, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("format", &T::FORMAT)
            .field("bounds", &self.walker.bounds)
            .field("remaining", &self.walker.remaining)
            .finish()
    }
}

impl<'a, T: PixelTraits> Iterator for IterMut<'a, T> {
    type Item = PixelRef<'a, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let cells = self.cells;
        self.walker.next().map(|cursor| PixelRef { cells, cursor })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.walker.remaining, Some(self.walker.remaining))
    }
}

impl<'a, T: PixelTraits> ExactSizeIterator for IterMut<'a, T> {}
impl<'a, T: PixelTraits> FusedIterator for IterMut<'a, T> {}

impl<'a, T: PixelTraits> Clone for IterMut<'a, T> {
    fn clone(&self) -> Self {
        IterMut { cells: self.cells, walker: self.walker }
    }
}

fn check_region<T: PixelTraits>(
        image: &Image,
        bounds: &Bounds,
        mode: LockMode
    ) -> Result<(), ImageError>
{
    if T::FORMAT != image.format() {
        debug!("{:?} lock of {} pixels over {} image", mode, T::FORMAT, image.format());
        return Err(ImageError::FormatMismatch)
    }
    if !image.bounds().contains_bounds(bounds) {
        debug!("{:?} lock bounds {:?} exceed {:?}", mode, bounds, image.bounds());
        return Err(ImageError::OutOfRange)
    }
    trace!("{:?} lock {} {:?}", mode, T::FORMAT, bounds);
    Ok(())
}

impl<'a, T: PixelTraits> LockImageBits<'a, T> {
    /// Locks the whole `image` for reading.
    pub fn new(image: &'a Image) -> Result<Self, ImageError> {
        Self::with_bounds(image, image.bounds())
    }
    /// Locks the `bounds` region of `image` for reading.
    ///
    /// # Errors
    /// Returns [ImageError::OutOfRange] if `bounds` are not contained within the image
    /// and [ImageError::FormatMismatch] if `T` doesn't describe the image format.
    pub fn with_bounds(image: &'a Image, bounds: Bounds) -> Result<Self, ImageError> {
        check_region::<T>(image, &bounds, LockMode::ReadOnly)?;
        Ok(LockImageBits {
            bytes: image.as_bytes(),
            bounds,
            row_stride: image.row_stride(),
            _traits: PhantomData
        })
    }
    pub fn mode(&self) -> LockMode {
        LockMode::ReadOnly
    }
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
    /// Returns the number of pixels in the locked region.
    pub fn len(&self) -> usize {
        self.bounds.area()
    }
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
    /// Returns an iterator at the first pixel of the region.
    pub fn begin(&self) -> Iter<'_, T> {
        Iter { bytes: self.bytes, walker: Walker::new(self.bounds, self.row_stride) }
    }
    /// Returns an exhausted iterator positioned past the last pixel of the region.
    pub fn end(&self) -> Iter<'_, T> {
        Iter { bytes: self.bytes, walker: Walker::end(self.bounds, self.row_stride) }
    }
    /// Same as [LockImageBits::begin].
    pub fn iter(&self) -> Iter<'_, T> {
        self.begin()
    }
}

impl<'a, T: PixelTraits> LockImageBitsMut<'a, T> {
    /// Locks the whole `image` for writing.
    pub fn new(image: &'a mut Image) -> Result<Self, ImageError> {
        let bounds = image.bounds();
        Self::with_bounds(image, bounds)
    }
    /// Locks the `bounds` region of `image` for writing.
    ///
    /// # Errors
    /// Returns [ImageError::OutOfRange] if `bounds` are not contained within the image
    /// and [ImageError::FormatMismatch] if `T` doesn't describe the image format.
    pub fn with_bounds(image: &'a mut Image, bounds: Bounds) -> Result<Self, ImageError> {
        check_region::<T>(image, &bounds, LockMode::Write)?;
        let row_stride = image.row_stride();
        Ok(LockImageBitsMut {
            cells: image.cells(),
            bounds,
            row_stride,
            _traits: PhantomData
        })
    }
    pub fn mode(&self) -> LockMode {
        LockMode::Write
    }
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
    /// Returns the number of pixels in the locked region.
    pub fn len(&self) -> usize {
        self.bounds.area()
    }
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
    /// Returns a reading iterator at the first pixel of the region.
    pub fn begin(&self) -> Iter<'_, T, [Cell<u8>]> {
        Iter { bytes: self.cells, walker: Walker::new(self.bounds, self.row_stride) }
    }
    /// Returns an exhausted reading iterator positioned past the last pixel of the region.
    pub fn end(&self) -> Iter<'_, T, [Cell<u8>]> {
        Iter { bytes: self.cells, walker: Walker::end(self.bounds, self.row_stride) }
    }
    /// Same as [LockImageBitsMut::begin].
    pub fn iter(&self) -> Iter<'_, T, [Cell<u8>]> {
        self.begin()
    }
    /// Returns an iterator of writable references to the pixels of the region.
    pub fn iter_mut(&self) -> IterMut<'_, T> {
        IterMut { cells: self.cells, walker: Walker::new(self.bounds, self.row_stride) }
    }
    /// Sets every pixel of the region to `pixel`.
    pub fn fill(&self, pixel: T::Pixel) {
        for target in self.iter_mut() {
            target.set(pixel);
        }
    }
}

impl<'a, T: PixelTraits> Drop for LockImageBits<'a, T> {
    fn drop(&mut self) {
        trace!("ReadOnly lock released {:?}", self.bounds);
    }
}

impl<'a, T: PixelTraits> Drop for LockImageBitsMut<'a, T> {
    fn drop(&mut self) {
        trace!("Write lock released {:?}", self.bounds);
    }
}

impl<'b, 'a, T: PixelTraits> IntoIterator for &'b LockImageBits<'a, T> {
    type Item = T::Pixel;
    type IntoIter = Iter<'b, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'b, 'a, T: PixelTraits> IntoIterator for &'b LockImageBitsMut<'a, T> {
    type Item = PixelRef<'b, T>;
    type IntoIter = IterMut<'b, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl Image {
    /// Locks the whole image for reading as pixels of the format `T`.
    pub fn lock_bits<T: PixelTraits>(&self) -> Result<LockImageBits<'_, T>, ImageError> {
        LockImageBits::new(self)
    }
    /// Locks the whole image for writing as pixels of the format `T`.
    pub fn lock_bits_mut<T: PixelTraits>(&mut self) -> Result<LockImageBitsMut<'_, T>, ImageError> {
        LockImageBitsMut::new(self)
    }
}
