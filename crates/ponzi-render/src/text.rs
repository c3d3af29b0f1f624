//! Monospace text measurement.
//!
//! The text layer paints with a monospace font, so measurement is plain
//! arithmetic and layout can run without a GPU.

use ponzi_core::Point;

/// Average advance of a monospace glyph relative to the font size.
pub const CHAR_WIDTH_RATIO: f32 = 0.602;
/// Line height relative to the font size.
pub const LINE_HEIGHT_RATIO: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Font size in physical pixels.
    pub size: f32,
}

impl TextMetrics {
    pub const fn new(size: f32) -> Self {
        Self { size }
    }

    pub fn char_width(&self) -> f32 {
        self.size * CHAR_WIDTH_RATIO
    }

    /// Width in whole pixels of `text` rendered on one line.
    pub fn width(&self, text: &str) -> i32 {
        (text.chars().count() as f32 * self.char_width()).ceil() as i32
    }

    pub fn line_height(&self) -> i32 {
        (self.size * LINE_HEIGHT_RATIO).round() as i32
    }

    /// Widest of several strings.
    pub fn max_width<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> i32 {
        texts.into_iter().map(|t| self.width(t)).max().unwrap_or(0)
    }
}

/// Horizontal alignment relative to a text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Anchor is the bottom-left corner.
    #[default]
    Left,
    /// Anchor is the bottom-center.
    Center,
    /// Anchor is the bottom-right corner.
    Right,
}

impl TextAlign {
    /// Bottom-left corner of a `width` wide run anchored at `anchor`.
    pub fn origin(&self, anchor: Point, width: i32) -> Point {
        match self {
            TextAlign::Left => anchor,
            TextAlign::Center => Point::new(anchor.x - width / 2, anchor.y),
            TextAlign::Right => Point::new(anchor.x - width, anchor.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_scales_with_chars() {
        let m = TextMetrics::new(10.0);
        assert_eq!(m.width(""), 0);
        assert_eq!(m.width("ABCDE"), 31);
        assert_eq!(m.line_height(), 12);
        assert_eq!(m.max_width(["A", "ABC", "AB"]), m.width("ABC"));
    }

    #[test]
    fn test_align_origin() {
        let p = Point::new(100, 10);
        assert_eq!(TextAlign::Left.origin(p, 20), p);
        assert_eq!(TextAlign::Right.origin(p, 20), Point::new(80, 10));
        assert_eq!(TextAlign::Center.origin(p, 20), Point::new(90, 10));
    }
}
