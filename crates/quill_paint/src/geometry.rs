//! Integer geometry
//!
//! All layout in Quill happens on whole pixels. Rectangles are half-open:
//! a rectangle contains its `min` corner but not its `max` corner.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A point in pixel coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check whether the point lies inside `rect`
    pub fn is_in(self, rect: Rect) -> bool {
        rect.contains(self)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// An axis-aligned rectangle
///
/// Constructors canonicalize so that `min <= max` on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        min: Point::ZERO,
        max: Point::ZERO,
    };

    /// Create a rectangle from two corners, in any order
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Rectangle at the origin with the given size
    pub fn wh(w: i32, h: i32) -> Self {
        Self::new(0, 0, w, h)
    }

    /// Rectangle at `(x, y)` with the given size
    pub fn xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    /// Rectangle from minimum and maximum coordinates
    pub fn xyxy(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(x0, y0, x1, y1)
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width(), self.height())
    }

    /// A rectangle is empty if it contains no pixels
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Half-open containment test
    pub fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x < self.max.x && self.min.y <= p.y && p.y < self.max.y
    }

    /// Largest rectangle contained in both; `Rect::ZERO` if they do not overlap
    pub fn intersect(&self, other: Rect) -> Rect {
        let r = Rect {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() {
            Rect::ZERO
        } else {
            r
        }
    }

    /// Smallest rectangle containing both; empty operands are ignored
    pub fn union(&self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn overlaps(&self, other: Rect) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Move the rectangle by `offset`
    pub fn translate(&self, offset: Point) -> Rect {
        Rect {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Shrink by `n` on every side (grow if negative)
    ///
    /// A rectangle too small to shrink collapses onto its center line.
    pub fn inset(&self, n: i32) -> Rect {
        let mut r = *self;
        if self.width() < 2 * n {
            r.min.x = (self.min.x + self.max.x) / 2;
            r.max.x = r.min.x;
        } else {
            r.min.x += n;
            r.max.x -= n;
        }
        if self.height() < 2 * n {
            r.min.y = (self.min.y + self.max.y) / 2;
            r.max.y = r.min.y;
        } else {
            r.min.y += n;
            r.max.y -= n;
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_canonicalize() {
        assert_eq!(Rect::new(10, 10, 0, 0), Rect::wh(10, 10));
        assert_eq!(Rect::xywh(5, 5, 10, 20), Rect::xyxy(5, 5, 15, 25));
        assert_eq!(Rect::xywh(5, 5, 10, 20).size(), (10, 20));
    }

    #[test]
    fn test_intersect() {
        let a = Rect::wh(10, 10);
        let b = Rect::xywh(5, 5, 10, 10);
        assert_eq!(a.intersect(b), Rect::xyxy(5, 5, 10, 10));
        assert_eq!(a.intersect(Rect::xywh(20, 20, 5, 5)), Rect::ZERO);
        assert!(a.intersect(Rect::xywh(10, 0, 5, 5)).is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::wh(10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 5)));
        assert!(!Rect::ZERO.contains(Point::ZERO));
    }

    #[test]
    fn test_union_ignores_empty() {
        let r = Rect::xywh(1, 1, 2, 2);
        assert_eq!(r.union(Rect::ZERO), r);
        assert_eq!(Rect::ZERO.union(r), r);
        assert_eq!(r.union(Rect::xywh(5, 5, 1, 1)), Rect::xyxy(1, 1, 6, 6));
    }

    #[test]
    fn test_inset() {
        assert_eq!(Rect::wh(10, 10).inset(2), Rect::xyxy(2, 2, 8, 8));
        assert_eq!(Rect::wh(10, 10).inset(-2), Rect::xyxy(-2, -2, 12, 12));
        assert!(Rect::wh(3, 3).inset(2).is_empty());
    }
}
