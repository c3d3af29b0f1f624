//! Pixel points and rectangles with a bottom-left origin.
//!
//! All chart layout is expressed as rectangle algebra on these types:
//! slicing into horizontal bands, insetting by padding and translating.

use std::ops::{Add, Sub};

/// A point in window pixels. `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned rectangle. `min` is the bottom-left corner, `max` the
/// top-right; `min` is inclusive and `max` exclusive for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Build a rectangle from two corners in any order.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min.x + self.width() / 2,
            self.min.y + self.height() / 2,
        )
    }

    pub fn translate(&self, delta: Point) -> Rect {
        Rect {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Shrink on every side by `px`. Collapses to the center instead of
    /// inverting when the rectangle is too small.
    pub fn inset(&self, px: i32) -> Rect {
        let dx = px.min(self.width() / 2);
        let dy = px.min(self.height() / 2);
        Rect {
            min: Point::new(self.min.x + dx, self.min.y + dy),
            max: Point::new(self.max.x - dx, self.max.y - dy),
        }
    }

    /// Same size, moved so that its center sits on `p`.
    pub fn centered_on(&self, p: Point) -> Rect {
        self.translate(p - self.center())
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() {
            Rect::default()
        } else {
            r
        }
    }

    /// Split off a strip of `height` pixels from the top.
    /// Returns `(top, rest)`.
    pub fn split_top(&self, height: i32) -> (Rect, Rect) {
        let cut = (self.max.y - height.clamp(0, self.height())).max(self.min.y);
        (
            Rect::new(self.min.x, cut, self.max.x, self.max.y),
            Rect::new(self.min.x, self.min.y, self.max.x, cut),
        )
    }

    /// Split off a strip of `width` pixels from the right.
    /// Returns `(rest, right)`.
    pub fn split_right(&self, width: i32) -> (Rect, Rect) {
        let cut = (self.max.x - width.clamp(0, self.width())).max(self.min.x);
        (
            Rect::new(self.min.x, self.min.y, cut, self.max.y),
            Rect::new(cut, self.min.y, self.max.x, self.max.y),
        )
    }

    /// Split off a strip of `width` pixels from the left.
    /// Returns `(left, rest)`.
    pub fn split_left(&self, width: i32) -> (Rect, Rect) {
        let cut = (self.min.x + width.clamp(0, self.width())).min(self.max.x);
        (
            Rect::new(self.min.x, self.min.y, cut, self.max.y),
            Rect::new(cut, self.min.y, self.max.x, self.max.y),
        )
    }

    /// Slice into stacked horizontal bands, bottom first.
    ///
    /// Each entry of `percents` takes that fraction of the full height; the
    /// returned vector has one extra trailing band holding whatever is left.
    pub fn slice_bands(&self, percents: &[f32]) -> Vec<Rect> {
        let total = self.height() as f32;
        let mut bands = Vec::with_capacity(percents.len() + 1);
        let mut y = self.min.y;
        for p in percents {
            let h = (total * p).round() as i32;
            let top = (y + h).min(self.max.y);
            bands.push(Rect::new(self.min.x, y, self.max.x, top));
            y = top;
        }
        bands.push(Rect::new(self.min.x, y, self.max.x, self.max.y));
        bands
    }

    /// Rectangle with the given size and the same bottom-left corner.
    pub fn with_size(&self, width: i32, height: i32) -> Rect {
        Rect::new(self.min.x, self.min.y, self.min.x + width, self.min.y + height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_corners() {
        let r = Rect::new(10, 20, 0, 5);
        assert_eq!(r.min, Point::new(0, 5));
        assert_eq!(r.max, Point::new(10, 20));
        assert_eq!(r.width(), 10);
        assert_eq!(r.height(), 15);
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 5)));
        assert!(!r.contains(Point::new(5, -1)));
    }

    #[test]
    fn test_inset_collapses_instead_of_inverting() {
        let r = Rect::new(0, 0, 100, 50).inset(10);
        assert_eq!(r, Rect::new(10, 10, 90, 40));

        let tiny = Rect::new(0, 0, 4, 4).inset(10);
        assert!(tiny.is_empty());
        assert_eq!(tiny.min, tiny.max);
    }

    #[test]
    fn test_split_top_and_right() {
        let r = Rect::new(0, 0, 100, 100);
        let (top, rest) = r.split_top(30);
        assert_eq!(top, Rect::new(0, 70, 100, 100));
        assert_eq!(rest, Rect::new(0, 0, 100, 70));

        let (rest, right) = r.split_right(25);
        assert_eq!(rest, Rect::new(0, 0, 75, 100));
        assert_eq!(right, Rect::new(75, 0, 100, 100));
    }

    #[test]
    fn test_slice_bands_remainder_on_top() {
        let r = Rect::new(0, 0, 10, 200);
        let bands = r.slice_bands(&[0.05, 0.13, 0.13]);
        assert_eq!(bands.len(), 4);
        assert_eq!(bands[0], Rect::new(0, 0, 10, 10));
        assert_eq!(bands[1], Rect::new(0, 10, 10, 36));
        assert_eq!(bands[2], Rect::new(0, 36, 10, 62));
        assert_eq!(bands[3], Rect::new(0, 62, 10, 200));
        let sum: i32 = bands.iter().map(Rect::height).sum();
        assert_eq!(sum, 200);
    }

    #[test]
    fn test_centered_on() {
        let r = Rect::new(0, 0, 20, 10).centered_on(Point::new(100, 100));
        assert_eq!(r.center(), Point::new(100, 100));
        assert_eq!(r.width(), 20);
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 30, 30);
        assert!(a.intersect(&b).is_empty());
        assert_eq!(a.intersect(&Rect::new(5, 5, 15, 15)), Rect::new(5, 5, 10, 10));
    }
}
