/*
    Copyright (C) 2020-2022  Rafal Michalski

    This file is part of RASTRUSTY, a Rust library for raster pixel buffers.

    RASTRUSTY is free software: you can redistribute it and/or modify it under
    the terms of the GNU Lesser General Public License (LGPL) as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    RASTRUSTY is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Lesser General Public License for more details.

    You should have received a copy of the GNU Lesser General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.

    Author contact information: see Cargo.toml file, section [package.authors].
*/
//! RASTRUSTY is a library of raster pixel buffers.
//!
//! An [Image] owns a rectangular buffer of pixels in one of four [PixelFormat]s:
//!
//! * [PixelFormat::Rgb] - 32-bit pixels of 8-bit red, green, blue and alpha channels,
//! * [PixelFormat::Grayscale] - 16-bit pixels of 8-bit luminance and alpha channels,
//! * [PixelFormat::Indexed] - 8-bit palette indexes,
//! * [PixelFormat::Bitmap] - 1-bit pixels packed 8 per byte.
//!
//! Pixel values enter and leave the library as raw `u32` values, already encoded per format.
//! Use [pack_rgba] and friends to build them from channels.
//!
//! Pixels of a rectangular region can be traversed in row-major order with iterators of
//! a region lock: [LockImageBits] for reading and [LockImageBitsMut] for writing. The iterators
//! are specialized for each format with [PixelTraits] descriptors, so no per-pixel format
//! dispatch takes place while iterating.
//!
//! ```
//! use rastrusty::*;
//! # fn main() -> Result<(), ImageError> {
//! let mut image = Image::new(PixelFormat::Rgb, 16, 16)?;
//! clear_image(&mut image, pack_rgba(0, 0, 0, 255));
//! image.draw_hline(2, 5, 13, pack_rgba(255, 255, 255, 255));
//!
//! let lock = LockImageBits::<RgbTraits>::with_bounds(&image, Bounds::new(0, 5, 16, 1))?;
//! let lit = lock.iter().filter(|&pixel| rgba_r(pixel) == 255).count();
//! assert_eq!(lit, 12);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! * `snapshot` (default) - enables [serde] serialization of [PixelFormat] and [Bounds].
//!
//! [serde]: https://crates.io/crates/serde
#[macro_use]
pub mod format;
pub mod geometry;
pub mod image;
pub mod bits;
pub mod primitives;

pub use format::{
    PixelFormat, PixelTraits,
    RgbTraits, GrayscaleTraits, IndexedTraits, BitmapTraits,
    pack_rgba, rgba_r, rgba_g, rgba_b, rgba_a,
    pack_graya, graya_v, graya_a
};
pub use geometry::Bounds;
pub use image::{Image, ImageError};
pub use bits::{LockMode, LockImageBits, LockImageBitsMut, Iter, IterMut, PixelRef};
pub use primitives::{
    get_pixel, put_pixel, clear_image,
    draw_hline, draw_vline, draw_rect, fill_rect,
    count_differing_pixels, is_same_image,
    copy_image, crop_image
};
