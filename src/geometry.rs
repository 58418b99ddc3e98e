/*
    Copyright (C) 2020-2022  Rafal Michalski

    This file is part of RASTRUSTY, a Rust library for raster pixel buffers.

    For the full copyright notice, see the lib.rs file.
*/
//! Rectangular regions of images.
#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

/// An axis-aligned rectangle: columns `[x, x + w)` of rows `[y, y + h)`.
///
/// A rectangle with `w <= 0` or `h <= 0` is empty.
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32
}

impl Bounds {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Bounds { x, y, w, h }
    }
    /// Returns bounds of the size given, positioned at the origin.
    pub const fn from_size(w: i32, h: i32) -> Self {
        Bounds { x: 0, y: 0, w, h }
    }
    /// Returns the column just past the right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }
    /// Returns the row just past the bottom edge.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
    /// Returns the number of pixels covered or 0 if empty.
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        }
        else {
            self.w as usize * self.h as usize
        }
    }
    /// Returns `true` if the pixel at `(x, y)` lies within.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
    /// Returns `true` if `other` lies within the closed extent of `self`.
    ///
    /// An empty `other` is contained if its origin and its far corner are within,
    /// but negative sizes are never contained.
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.w >= 0 && other.h >= 0 &&
        other.x >= self.x && other.y >= self.y &&
        other.right() <= self.right() && other.bottom() <= self.bottom()
    }
    /// Returns the common part of both rectangles.
    ///
    /// The size of the result is never negative.
    pub fn intersect(&self, other: &Bounds) -> Bounds {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let w = self.right().min(other.right()).saturating_sub(x).max(0);
        let h = self.bottom().min(other.bottom()).saturating_sub(y).max(0);
        Bounds { x, y, w, h }
    }
    /// Returns bounds moved by `(dx, dy)`.
    ///
    /// The position saturates at the numeric bounds of `i32`.
    pub fn offset(&self, dx: i32, dy: i32) -> Bounds {
        Bounds { x: self.x.saturating_add(dx), y: self.y.saturating_add(dy), ..*self }
    }
    /// Returns bounds moved inward by `n` on every edge.
    ///
    /// The size may become zero or negative. Every component saturates at the numeric
    /// bounds of `i32`.
    pub fn shrink(&self, n: i32) -> Bounds {
        let n2 = n.saturating_mul(2);
        Bounds {
            x: self.x.saturating_add(n),
            y: self.y.saturating_add(n),
            w: self.w.saturating_sub(n2),
            h: self.h.saturating_sub(n2)
        }
    }
}

impl From<(i32, i32, i32, i32)> for Bounds {
    fn from((x, y, w, h): (i32, i32, i32, i32)) -> Self {
        Bounds { x, y, w, h }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_contains_works() {
        let outer = Bounds::from_size(10, 5);
        assert!(outer.contains(0, 0));
        assert!(outer.contains(9, 4));
        assert!(!outer.contains(10, 4));
        assert!(!outer.contains(-1, 0));
        assert!(outer.contains_bounds(&outer));
        assert!(outer.contains_bounds(&Bounds::new(2, 1, 8, 4)));
        assert!(!outer.contains_bounds(&Bounds::new(2, 1, 9, 4)));
        assert!(!outer.contains_bounds(&Bounds::new(-1, 0, 1, 1)));
        assert!(outer.contains_bounds(&Bounds::new(10, 5, 0, 0)));
        assert!(outer.contains_bounds(&Bounds::new(3, 3, 0, 2)));
        assert!(!outer.contains_bounds(&Bounds::new(3, 3, -1, 1)));
        assert!(!outer.contains_bounds(&Bounds::new(11, 0, 0, 0)));
    }

    #[test]
    fn bounds_geometry_works() {
        let b = Bounds::from((1, 2, 5, 4));
        assert_eq!(b, Bounds::new(1, 2, 5, 4));
        assert_eq!((b.right(), b.bottom()), (6, 6));
        assert_eq!(b.area(), 20);
        assert!(!b.is_empty());
        assert_eq!(b.shrink(1), Bounds::new(2, 3, 3, 2));
        assert_eq!(b.shrink(2), Bounds::new(3, 4, 1, 0));
        assert!(b.shrink(2).is_empty());
        assert_eq!(b.shrink(3).area(), 0);
        assert_eq!(b.offset(-1, 3), Bounds::new(0, 5, 5, 4));
        assert_eq!(b.intersect(&Bounds::new(4, 0, 10, 3)), Bounds::new(4, 2, 2, 1));
        assert_eq!(b.intersect(&Bounds::new(7, 0, 1, 1)), Bounds::new(7, 2, 0, 0));
        assert!(b.intersect(&Bounds::new(7, 0, 1, 1)).is_empty());
        assert_eq!(Bounds::default(), Bounds::from_size(0, 0));
    }

    #[test]
    fn bounds_arithmetic_saturates() {
        let b = Bounds::from_size(4, 4);
        assert_eq!(b.shrink(i32::MAX), Bounds::new(i32::MAX, i32::MAX, 4 - i32::MAX, 4 - i32::MAX));
        assert!(b.shrink(i32::MAX).is_empty());
        assert_eq!(b.shrink(i32::MIN), Bounds::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX));
        assert_eq!(b.offset(i32::MAX, i32::MIN), Bounds::new(i32::MAX, i32::MIN, 4, 4));
        assert_eq!(Bounds::new(-5, 0, i32::MAX, 1).offset(i32::MIN, 0).x, i32::MIN);
        let far_left = Bounds::new(i32::MIN, i32::MIN, 0, 1);
        let far_right = Bounds::new(i32::MAX, i32::MAX, 0, 1);
        assert_eq!(far_left.intersect(&far_right), Bounds::new(i32::MAX, i32::MAX, 0, 0));
        let wide = Bounds::new(-5, -5, i32::MAX, i32::MAX);
        assert_eq!(wide.intersect(&b), b);
        assert!(Bounds::new(i32::MIN, 0, 2, 2).intersect(&b).is_empty());
    }
}
