/*
    Copyright (C) 2020-2022  Rafal Michalski

    This file is part of RASTRUSTY, a Rust library for raster pixel buffers.

    For the full copyright notice, see the lib.rs file.
*/
//! Pixel addressing within a row of packed pixel data.
//!
//! This is the only place where the layout of a pixel inside the storage bytes is known.
//! Everything else reaches the pixel data through a [PixelCursor].
use core::cell::Cell;
use core::fmt::Debug;

/// A read-only view of the bytes a [PixelCursor] can load pixels from.
///
/// Implemented for plain byte slices and for slices of [Cell]s, the latter being used by
/// writable pixel iterators that share the buffer.
pub trait ByteSource {
    /// Returns the byte at `index`.
    ///
    /// Panics if `index` is out of bounds.
    fn byte(&self, index: usize) -> u8;
}

impl ByteSource for [u8] {
    #[inline(always)]
    fn byte(&self, index: usize) -> u8 {
        self[index]
    }
}

impl ByteSource for [Cell<u8>] {
    #[inline(always)]
    fn byte(&self, index: usize) -> u8 {
        self[index].get()
    }
}

/// A position of a single pixel in the storage bytes of an image.
pub trait PixelCursor: Copy + Eq + Debug {
    /// Returns a cursor pointing at the column `x` of a row starting at `row_offset` bytes.
    fn at(row_offset: usize, x: usize) -> Self;
    /// Moves the cursor to the next pixel to the right.
    ///
    /// Callers must re-position the cursor with [PixelCursor::at] when crossing a row boundary,
    /// since rows may be padded.
    fn advance(&mut self);
    /// Decodes the raw pixel value at the cursor's position.
    fn load<S: ByteSource + ?Sized>(self, bytes: &S) -> u32;
    /// Encodes `raw` at the cursor's position.
    ///
    /// Bits of `raw` above the pixel's width are ignored.
    fn store(self, cells: &[Cell<u8>], raw: u32);
    /// Fills every pixel of `bytes`, which must consist of whole rows, with `raw`.
    fn fill(bytes: &mut [u8], raw: u32);
}

/// A [PixelCursor] for formats with pixels occupying `N` whole bytes.
///
/// Multi-byte pixels are stored in little endian order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ByteCursor<const N: usize> {
    /// The offset of the first byte of the pixel.
    pub offset: usize
}

/// A [PixelCursor] for the bit-packed format.
///
/// Pixels are packed LSB first: the column `x` of a row occupies the bit `x % 8`
/// of the byte `x / 8` of that row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitCursor {
    /// The offset of the byte containing the pixel.
    pub offset: usize,
    /// The bit index within the byte: [0, 8).
    pub bit: u8
}

impl<const N: usize> PixelCursor for ByteCursor<N> {
    #[inline(always)]
    fn at(row_offset: usize, x: usize) -> Self {
        ByteCursor { offset: row_offset + x * N }
    }

    #[inline(always)]
    fn advance(&mut self) {
        self.offset += N;
    }

    #[inline]
    fn load<S: ByteSource + ?Sized>(self, bytes: &S) -> u32 {
        (0..N).fold(0, |raw, i| raw | (bytes.byte(self.offset + i) as u32) << (8 * i))
    }

    #[inline]
    fn store(self, cells: &[Cell<u8>], raw: u32) {
        let le = raw.to_le_bytes();
        for (cell, &byte) in cells[self.offset..self.offset + N].iter().zip(le.iter()) {
            cell.set(byte);
        }
    }

    fn fill(bytes: &mut [u8], raw: u32) {
        let le = raw.to_le_bytes();
        match N {
            1 => bytes.fill(le[0]),
            _ => for pixel in bytes.chunks_exact_mut(N) {
                pixel.copy_from_slice(&le[..N]);
            }
        }
    }
}

impl PixelCursor for BitCursor {
    #[inline(always)]
    fn at(row_offset: usize, x: usize) -> Self {
        BitCursor { offset: row_offset + x / 8, bit: (x % 8) as u8 }
    }

    #[inline(always)]
    fn advance(&mut self) {
        if self.bit == 7 {
            self.bit = 0;
            self.offset += 1;
        }
        else {
            self.bit += 1;
        }
    }

    #[inline]
    fn load<S: ByteSource + ?Sized>(self, bytes: &S) -> u32 {
        ((bytes.byte(self.offset) >> self.bit) & 1) as u32
    }

    #[inline]
    fn store(self, cells: &[Cell<u8>], raw: u32) {
        let cell = &cells[self.offset];
        let mask = 1u8 << self.bit;
        if raw & 1 == 0 {
            cell.set(cell.get() & !mask);
        }
        else {
            cell.set(cell.get() | mask);
        }
    }

    fn fill(bytes: &mut [u8], raw: u32) {
        bytes.fill(if raw & 1 == 0 { 0 } else { u8::MAX });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_cursor_works() {
        let mut data = [0u8; 12];
        let cells = Cell::from_mut(&mut data[..]).as_slice_of_cells();
        let mut cursor = ByteCursor::<4>::at(4, 1);
        assert_eq!(cursor, ByteCursor { offset: 8 });
        cursor.store(cells, 0x4433_2211);
        assert_eq!(cursor.load(cells), 0x4433_2211);
        cursor = ByteCursor::<4>::at(0, 1);
        cursor.advance();
        assert_eq!(cursor.load(cells), 0x4433_2211);
        assert_eq!(data, [0, 0, 0, 0, 0, 0, 0, 0, 0x11, 0x22, 0x33, 0x44]);

        let mut data = [0u8; 4];
        let cells = Cell::from_mut(&mut data[..]).as_slice_of_cells();
        let cursor = ByteCursor::<2>::at(2, 0);
        cursor.store(cells, 0xdead_beef);
        assert_eq!(cursor.load(cells), 0xbeef);
        assert_eq!(data, [0, 0, 0xef, 0xbe]);
    }

    #[test]
    fn bit_cursor_carries_bit_offset() {
        let mut cursor = BitCursor::at(3, 6);
        assert_eq!(cursor, BitCursor { offset: 3, bit: 6 });
        cursor.advance();
        assert_eq!(cursor, BitCursor { offset: 3, bit: 7 });
        cursor.advance();
        assert_eq!(cursor, BitCursor { offset: 4, bit: 0 });
        assert_eq!(BitCursor::at(2, 17), BitCursor { offset: 4, bit: 1 });
    }

    #[test]
    fn bit_cursor_load_store_works() {
        let mut data = [0u8; 2];
        let cells = Cell::from_mut(&mut data[..]).as_slice_of_cells();
        BitCursor::at(0, 0).store(cells, 1);
        BitCursor::at(0, 9).store(cells, 3);
        BitCursor::at(0, 15).store(cells, 1);
        assert_eq!(BitCursor::at(0, 0).load(cells), 1);
        assert_eq!(BitCursor::at(0, 1).load(cells), 0);
        assert_eq!(BitCursor::at(0, 9).load(cells), 1);
        BitCursor::at(0, 15).store(cells, 0);
        assert_eq!(data, [0b0000_0001, 0b0000_0010]);
        assert_eq!(BitCursor::at(1, 1).load(&data[..]), 1);
    }

    #[test]
    fn fill_works() {
        let mut data = [0u8; 8];
        ByteCursor::<4>::fill(&mut data, 0x0403_0201);
        assert_eq!(data, [1, 2, 3, 4, 1, 2, 3, 4]);
        ByteCursor::<2>::fill(&mut data, 0xa0b0);
        assert_eq!(data, [0xb0, 0xa0, 0xb0, 0xa0, 0xb0, 0xa0, 0xb0, 0xa0]);
        ByteCursor::<1>::fill(&mut data, 0x77);
        assert_eq!(data, [0x77; 8]);
        BitCursor::fill(&mut data, 1);
        assert_eq!(data, [0xff; 8]);
        BitCursor::fill(&mut data, 2);
        assert_eq!(data, [0; 8]);
    }
}
