//! Shared sizes and colours.

use ponzi_render::Color;

/// Gap between a widget's bounds and its contents, in pixels.
pub const PADDING: i32 = 10;
pub const SMALL_PADDING: i32 = 5;

pub const FONT_SIZE: f32 = 14.0;
pub const SMALL_FONT_SIZE: f32 = 12.0;

pub const SIDEBAR_WIDTH: i32 = 280;
pub const THUMBNAIL_HEIGHT: i32 = 140;

pub const BACKGROUND: Color = Color::BLACK;
pub const BORDER: Color = Color::GRAY;
pub const TEXT: Color = Color::WHITE;
pub const AXIS_TEXT: Color = Color::LIGHT_GRAY;
pub const GRID: Color = Color::DARK_GRAY;
pub const CROSSHAIR: Color = Color::GRAY;
pub const BUBBLE: Color = Color::rgba(0.15, 0.15, 0.15, 0.9);
pub const BUTTON_HOVER: Color = Color::HIGHLIGHT;

/// Short, medium and long moving average lines.
pub const MOVING_AVERAGE_COLORS: [Color; 3] = [Color::PURPLE, Color::YELLOW, Color::WHITE];
pub const AVERAGE_VOLUME: Color = Color::ORANGE;
pub const STOCHASTIC_K: Color = Color::RED;
pub const STOCHASTIC_D: Color = Color::YELLOW;

/// Oversold and overbought rails.
pub const STOCHASTIC_LEVELS: [f32; 2] = [0.2, 0.8];

/// Text colour for a signed change.
pub fn change_color(change: f32) -> Color {
    if change > 0.0 {
        Color::UP
    } else if change < 0.0 {
        Color::DOWN
    } else {
        Color::NEUTRAL
    }
}
