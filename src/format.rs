/*
    Copyright (C) 2020-2022  Rafal Michalski

    This file is part of RASTRUSTY, a Rust library for raster pixel buffers.

    For the full copyright notice, see the lib.rs file.
*/
//! Pixel formats and their descriptors.
pub mod cursor;

use core::convert::TryFrom;
use core::fmt::{self, Debug};
use core::str::FromStr;

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

pub use cursor::{BitCursor, ByteCursor, ByteSource, PixelCursor};

/// An enum of all supported pixel formats.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(try_from = "u8", into = "u8"))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PixelFormat {
    /// 32-bit pixels with red, green, blue and alpha channels.
    Rgb       = 0,
    /// 16-bit pixels with luminance and alpha channels.
    Grayscale = 1,
    /// 8-bit palette indexes.
    Indexed   = 2,
    /// 1-bit pixels packed 8 per byte.
    Bitmap    = 3
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryFromU8PixelFormatError(pub u8);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsePixelFormatError;

/// A static description of a single pixel format.
///
/// Implemented by zero-sized types, one per [PixelFormat] variant. Generic code parametrized with
/// `PixelTraits` is monomorphized for each format; code that holds only a [PixelFormat] value
/// dispatches with an exhaustive `match`.
pub trait PixelTraits: Copy + Debug + 'static {
    /// The format this descriptor is for.
    const FORMAT: PixelFormat;
    /// The number of bits a single pixel occupies in the storage.
    const BITS_PER_PIXEL: u32;
    /// The maximum raw value of a pixel.
    const MAX_VALUE: u32;
    /// A type holding a single raw pixel value.
    type Pixel: Copy + Eq + Debug + Into<u32>;
    /// Semantic channel values of a pixel.
    type Channels: Copy + PartialEq + Debug;
    /// The storage cursor used to address pixels of this format.
    type Cursor: PixelCursor;
    /// Truncates a raw value to the pixel type.
    fn from_raw(raw: u32) -> Self::Pixel;
    /// Packs channel values into a raw pixel.
    fn pack(channels: Self::Channels) -> Self::Pixel;
    /// Unpacks a raw pixel into channel values.
    fn unpack(pixel: Self::Pixel) -> Self::Channels;
    /// Returns the number of bytes of a single row of `width` pixels.
    #[inline]
    fn row_stride(width: usize) -> usize {
        (width * Self::BITS_PER_PIXEL as usize + 7) / 8
    }
}

/// Descriptor of [PixelFormat::Rgb].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RgbTraits;
/// Descriptor of [PixelFormat::Grayscale].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrayscaleTraits;
/// Descriptor of [PixelFormat::Indexed].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexedTraits;
/// Descriptor of [PixelFormat::Bitmap].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapTraits;

const RGBA_R_SHIFT: u32 = 0;
const RGBA_G_SHIFT: u32 = 8;
const RGBA_B_SHIFT: u32 = 16;
const RGBA_A_SHIFT: u32 = 24;

const GRAYA_V_SHIFT: u32 = 0;
const GRAYA_A_SHIFT: u32 = 8;

/// Packs 8-bit red, green, blue and alpha channels into a raw [PixelFormat::Rgb] value.
#[inline(always)]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) << RGBA_R_SHIFT |
    (g as u32) << RGBA_G_SHIFT |
    (b as u32) << RGBA_B_SHIFT |
    (a as u32) << RGBA_A_SHIFT
}

#[inline(always)]
pub const fn rgba_r(raw: u32) -> u8 { (raw >> RGBA_R_SHIFT) as u8 }
#[inline(always)]
pub const fn rgba_g(raw: u32) -> u8 { (raw >> RGBA_G_SHIFT) as u8 }
#[inline(always)]
pub const fn rgba_b(raw: u32) -> u8 { (raw >> RGBA_B_SHIFT) as u8 }
#[inline(always)]
pub const fn rgba_a(raw: u32) -> u8 { (raw >> RGBA_A_SHIFT) as u8 }

/// Packs 8-bit luminance and alpha channels into a raw [PixelFormat::Grayscale] value.
#[inline(always)]
pub const fn pack_graya(v: u8, a: u8) -> u32 {
    (v as u32) << GRAYA_V_SHIFT | (a as u32) << GRAYA_A_SHIFT
}

#[inline(always)]
pub const fn graya_v(raw: u32) -> u8 { (raw >> GRAYA_V_SHIFT) as u8 }
#[inline(always)]
pub const fn graya_a(raw: u32) -> u8 { (raw >> GRAYA_A_SHIFT) as u8 }

impl PixelTraits for RgbTraits {
    const FORMAT: PixelFormat = PixelFormat::Rgb;
    const BITS_PER_PIXEL: u32 = 32;
    const MAX_VALUE: u32 = u32::MAX;
    type Pixel = u32;
    /// `[r, g, b, a]`
    type Channels = [u8; 4];
    type Cursor = ByteCursor<4>;

    #[inline(always)]
    fn from_raw(raw: u32) -> u32 { raw }

    #[inline]
    fn pack([r, g, b, a]: [u8; 4]) -> u32 {
        pack_rgba(r, g, b, a)
    }

    #[inline]
    fn unpack(pixel: u32) -> [u8; 4] {
        [rgba_r(pixel), rgba_g(pixel), rgba_b(pixel), rgba_a(pixel)]
    }
}

impl PixelTraits for GrayscaleTraits {
    const FORMAT: PixelFormat = PixelFormat::Grayscale;
    const BITS_PER_PIXEL: u32 = 16;
    const MAX_VALUE: u32 = u16::MAX as u32;
    type Pixel = u16;
    /// `[v, a]`
    type Channels = [u8; 2];
    type Cursor = ByteCursor<2>;

    #[inline(always)]
    fn from_raw(raw: u32) -> u16 { raw as u16 }

    #[inline]
    fn pack([v, a]: [u8; 2]) -> u16 {
        pack_graya(v, a) as u16
    }

    #[inline]
    fn unpack(pixel: u16) -> [u8; 2] {
        [graya_v(pixel.into()), graya_a(pixel.into())]
    }
}

impl PixelTraits for IndexedTraits {
    const FORMAT: PixelFormat = PixelFormat::Indexed;
    const BITS_PER_PIXEL: u32 = 8;
    const MAX_VALUE: u32 = u8::MAX as u32;
    type Pixel = u8;
    /// A palette index.
    type Channels = u8;
    type Cursor = ByteCursor<1>;

    #[inline(always)]
    fn from_raw(raw: u32) -> u8 { raw as u8 }

    #[inline(always)]
    fn pack(index: u8) -> u8 { index }

    #[inline(always)]
    fn unpack(pixel: u8) -> u8 { pixel }
}

impl PixelTraits for BitmapTraits {
    const FORMAT: PixelFormat = PixelFormat::Bitmap;
    const BITS_PER_PIXEL: u32 = 1;
    const MAX_VALUE: u32 = 1;
    type Pixel = u8;
    /// Whether the bit is set.
    type Channels = bool;
    type Cursor = BitCursor;

    #[inline(always)]
    fn from_raw(raw: u32) -> u8 { (raw & 1) as u8 }

    #[inline(always)]
    fn pack(bit: bool) -> u8 { bit.into() }

    #[inline(always)]
    fn unpack(pixel: u8) -> bool { pixel & 1 != 0 }
}

/// Evaluates `$body` with `$traits` aliased to the [PixelTraits] type of `$format`.
macro_rules! with_pixel_traits {
    ($format:expr, $traits:ident => $body:expr) => {
        match $format {
            $crate::format::PixelFormat::Rgb => {
                type $traits = $crate::format::RgbTraits;
                $body
            }
            $crate::format::PixelFormat::Grayscale => {
                type $traits = $crate::format::GrayscaleTraits;
                $body
            }
            $crate::format::PixelFormat::Indexed => {
                type $traits = $crate::format::IndexedTraits;
                $body
            }
            $crate::format::PixelFormat::Bitmap => {
                type $traits = $crate::format::BitmapTraits;
                $body
            }
        }
    };
}

impl PixelFormat {
    /// Returns the number of bits a single pixel occupies in the storage.
    pub fn bits_per_pixel(self) -> u32 {
        with_pixel_traits!(self, T => T::BITS_PER_PIXEL)
    }
    /// Returns the maximum raw value of a pixel.
    pub fn max_value(self) -> u32 {
        with_pixel_traits!(self, T => T::MAX_VALUE)
    }
    /// Returns the number of bytes of a single row of `width` pixels.
    pub fn row_stride(self, width: usize) -> usize {
        with_pixel_traits!(self, T => T::row_stride(width))
    }
}

impl From<PixelFormat> for &'static str {
    fn from(format: PixelFormat) -> &'static str {
        match format {
            PixelFormat::Rgb       => "rgb",
            PixelFormat::Grayscale => "grayscale",
            PixelFormat::Indexed   => "indexed",
            PixelFormat::Bitmap    => "bitmap",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(<&str>::from(*self))
    }
}

impl std::error::Error for ParsePixelFormatError {}

impl fmt::Display for ParsePixelFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unrecognized pixel format")
    }
}

impl FromStr for PixelFormat {
    type Err = ParsePixelFormatError;
    /// Parses a single word describing a pixel format using case insensitive matching
    /// or a single digit from 0 to 3.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let is_any = |names: &[&str]| names.iter().any(|n| name.eq_ignore_ascii_case(n));
        if is_any(&["rgb", "rgba", "color", "colour"]) {
            Ok(PixelFormat::Rgb)
        }
        else if is_any(&["grayscale", "greyscale", "gray", "grey"]) {
            Ok(PixelFormat::Grayscale)
        }
        else if is_any(&["indexed", "index", "palette"]) {
            Ok(PixelFormat::Indexed)
        }
        else if is_any(&["bitmap", "bit", "mask"]) {
            Ok(PixelFormat::Bitmap)
        }
        else {
            u8::from_str(name).map_err(|_| ParsePixelFormatError)
            .and_then(|format|
                PixelFormat::try_from(format).map_err(|_| ParsePixelFormatError)
            )
        }
    }
}

impl From<PixelFormat> for u8 {
    fn from(format: PixelFormat) -> u8 {
        format as u8
    }
}

impl std::error::Error for TryFromU8PixelFormatError {}

impl fmt::Display for TryFromU8PixelFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "converted integer ({}) out of range for `PixelFormat`", self.0)
    }
}

impl TryFrom<u8> for PixelFormat {
    type Error = TryFromU8PixelFormatError;
    fn try_from(format: u8) -> Result<Self, Self::Error> {
        use PixelFormat::*;
        Ok(match format {
            0 => Rgb,
            1 => Grayscale,
            2 => Indexed,
            3 => Bitmap,
            _ => return Err(TryFromU8PixelFormatError(format))
        })
    }
}
