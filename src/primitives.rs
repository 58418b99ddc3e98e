/*
    Copyright (C) 2020-2022  Rafal Michalski

    This file is part of RASTRUSTY, a Rust library for raster pixel buffers.

    For the full copyright notice, see the lib.rs file.
*/
//! Drawing and comparison primitives built on [Image] and region locks.
use log::trace;

use crate::bits::{LockImageBits, LockImageBitsMut};
use crate::format::PixelTraits;
use crate::geometry::Bounds;
use crate::image::{Image, ImageError};

pub use crate::format::pack_rgba;

/// Returns the raw value of the pixel at `(x, y)`.
///
/// See [Image::get_pixel].
#[inline]
pub fn get_pixel(image: &Image, x: i32, y: i32) -> u32 {
    image.get_pixel(x, y)
}

/// Stores the raw `value` at `(x, y)`.
///
/// See [Image::put_pixel].
#[inline]
pub fn put_pixel(image: &mut Image, x: i32, y: i32, value: u32) {
    image.put_pixel(x, y, value)
}

#[inline]
pub fn clear_image(image: &mut Image, value: u32) {
    image.clear(value)
}

#[inline]
pub fn draw_hline(image: &mut Image, x1: i32, y: i32, x2: i32, value: u32) {
    image.draw_hline(x1, y, x2, value)
}

#[inline]
pub fn draw_vline(image: &mut Image, x: i32, y1: i32, y2: i32, value: u32) {
    image.draw_vline(x, y1, y2, value)
}

#[inline]
pub fn fill_rect(image: &mut Image, rect: Bounds, value: u32) {
    image.fill_rect(rect, value)
}

/// Draws a one pixel wide outline of `rect`, clipped to the image.
pub fn draw_rect(image: &mut Image, rect: Bounds, value: u32) {
    if rect.is_empty() {
        return
    }
    let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
    image.draw_hline(rect.x, rect.y, right, value);
    image.draw_hline(rect.x, bottom, right, value);
    image.draw_vline(rect.x, rect.y, bottom, value);
    image.draw_vline(right, rect.y, bottom, value);
}

fn check_same_shape(a: &Image, b: &Image) -> Result<(), ImageError> {
    if a.format() != b.format() || a.width() != b.width() || a.height() != b.height() {
        return Err(ImageError::FormatMismatch)
    }
    Ok(())
}

fn count_diff<T: PixelTraits>(a: &Image, b: &Image) -> Result<usize, ImageError> {
    let lock_a = a.lock_bits::<T>()?;
    let lock_b = b.lock_bits::<T>()?;
    Ok(lock_a.iter().zip(lock_b.iter()).filter(|(pa, pb)| pa != pb).count())
}

/// Returns the number of positions at which pixels of `a` and `b` differ.
///
/// Padding bits of [Bitmap](crate::PixelFormat::Bitmap) rows are not compared.
///
/// # Errors
/// Returns [ImageError::FormatMismatch] unless both images share the format and dimensions.
pub fn count_differing_pixels(a: &Image, b: &Image) -> Result<usize, ImageError> {
    check_same_shape(a, b)?;
    with_pixel_traits!(a.format(), T => count_diff::<T>(a, b))
}

/// Returns `true` if both images share the format, dimensions and pixel values.
pub fn is_same_image(a: &Image, b: &Image) -> bool {
    count_differing_pixels(a, b) == Ok(0)
}

fn copy_region<T: PixelTraits>(
        dst: &mut Image,
        dst_area: Bounds,
        src: &Image,
        src_area: Bounds
    ) -> Result<(), ImageError>
{
    let source = LockImageBits::<T>::with_bounds(src, src_area)?;
    let target = LockImageBitsMut::<T>::with_bounds(dst, dst_area)?;
    for (pixel, target) in source.iter().zip(target.iter_mut()) {
        target.set(pixel);
    }
    Ok(())
}

/// Copies pixels of `src` into `dst` with the top left corner of `src` at `(x, y)`.
///
/// The copied area is clipped to `dst`.
///
/// # Errors
/// Returns [ImageError::FormatMismatch] if the images differ in pixel format.
pub fn copy_image(dst: &mut Image, src: &Image, x: i32, y: i32) -> Result<(), ImageError> {
    if dst.format() != src.format() {
        return Err(ImageError::FormatMismatch)
    }
    let dst_area = dst.bounds().intersect(&src.bounds().offset(x, y));
    if dst_area.is_empty() {
        return Ok(())
    }
    let src_area = dst_area.offset(x.saturating_neg(), y.saturating_neg());
    trace!("copy {} {:?} -> {:?}", src.format(), src_area, dst_area);
    with_pixel_traits!(src.format(), T => copy_region::<T>(dst, dst_area, src, src_area))
}

/// Returns a new image with pixels of the `bounds` region of `image`.
///
/// Pixels of `bounds` lying outside of `image` are set to `background`.
///
/// # Errors
/// Returns [ImageError::InvalidDimensions] if `bounds` are empty.
pub fn crop_image(image: &Image, bounds: Bounds, background: u32) -> Result<Image, ImageError> {
    let mut cropped = Image::new(image.format(), bounds.w, bounds.h)?;
    if !image.bounds().contains_bounds(&bounds) {
        cropped.clear(background);
    }
    let src_area = image.bounds().intersect(&bounds);
    if src_area.is_empty() {
        return Ok(cropped)
    }
    // a non-empty intersection lies within both rectangles
    let dst_area = match (src_area.x.checked_sub(bounds.x), src_area.y.checked_sub(bounds.y)) {
        (Some(x), Some(y)) => Bounds { x, y, ..src_area },
        _ => return Err(ImageError::OutOfRange)
    };
    trace!("crop {} {:?} -> {:?}", image.format(), src_area, dst_area);
    with_pixel_traits!(image.format(), T => {
        copy_region::<T>(&mut cropped, dst_area, image, src_area)?
    });
    Ok(cropped)
}
