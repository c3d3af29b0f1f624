//! Chart colour palette.

/// Linear RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b, 1.0])
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, a] = self.0;
        Self([r, g, b, a * alpha])
    }

    /// 8-bit RGBA, used by the text layer.
    pub fn to_rgba8(self) -> [u8; 4] {
        self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Session closed above its open.
    pub const UP: Color = Color::rgb(0.25, 1.0, 0.0);
    /// Session closed below its open.
    pub const DOWN: Color = Color::rgb(1.0, 0.3, 0.0);
    /// Session closed at its open.
    pub const NEUTRAL: Color = Color::rgb(0.7, 0.7, 0.7);
    /// Real-time intraday sample.
    pub const HIGHLIGHT: Color = Color::rgb(1.0, 0.8, 0.0);

    pub const GRAY: Color = Color::rgb(0.35, 0.35, 0.35);
    pub const LIGHT_GRAY: Color = Color::rgb(0.6, 0.6, 0.6);
    pub const DARK_GRAY: Color = Color::rgb(0.12, 0.12, 0.12);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const ORANGE: Color = Color::rgb(1.0, 0.5, 0.0);
    pub const PURPLE: Color = Color::rgb(0.5, 0.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.0
    }
}
