//! Input handling for ponzi2.
//!
//! Raw winit events are folded into an [`InputCollector`] as they arrive.
//! Once per frame the collector produces an [`Input`] snapshot that the
//! view dispatches to every widget. Each raw press, release, scroll or key
//! becomes at most one high-level event in one snapshot.

use ponzi_core::Point;
use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta},
    keyboard::{Key, NamedKey},
};

/// Frames the left button must be held before the press becomes a drag.
pub const DRAG_MIN_PRESS_TICKS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDir {
    Up,
    Down,
}

/// Released key relevant to the symbol entry overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Char(char),
    Backspace,
    Enter,
    Escape,
}

/// Input observed during one frame. Positions use a bottom-left origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Input {
    /// `None` until the cursor has entered the window.
    pub mouse_pos: Option<Point>,
    pub previous_mouse_pos: Option<Point>,
    /// Where the current (or just released) left press started.
    pub press_start_pos: Option<Point>,
    /// Left button released after a short press.
    pub mouse_left_button_clicked: bool,
    /// Left button held longer than [`DRAG_MIN_PRESS_TICKS`].
    pub mouse_left_button_dragging: bool,
    /// Left button released this frame, after a click or a drag.
    pub mouse_left_button_released: bool,
    pub mouse_scrolled: Option<ScrollDir>,
    pub keys: Vec<KeyPress>,
}

impl Input {
    /// Whether a click landed this frame at a point inside `contains`.
    pub fn clicked_in(&self, contains: impl Fn(Point) -> bool) -> bool {
        self.mouse_left_button_clicked && self.mouse_pos.is_some_and(contains)
    }

    pub fn has_activity(&self) -> bool {
        self.mouse_left_button_clicked
            || self.mouse_left_button_dragging
            || self.mouse_left_button_released
            || self.mouse_scrolled.is_some()
            || !self.keys.is_empty()
            || self.mouse_pos != self.previous_mouse_pos
    }
}

/// Accumulates raw window events between frames.
#[derive(Debug, Default)]
pub struct InputCollector {
    window_height: i32,
    mouse_pos: Option<Point>,
    last_frame_pos: Option<Point>,
    press_start_pos: Option<Point>,
    left_down: bool,
    press_ticks: u32,
    pending_press: bool,
    pending_release: bool,
    scroll: f32,
    keys: Vec<KeyPress>,
    dirty: bool,
}

impl InputCollector {
    pub fn new(window_height: u32) -> Self {
        Self {
            window_height: window_height as i32,
            ..Default::default()
        }
    }

    pub fn set_window_height(&mut self, height: u32) {
        self.window_height = height as i32;
    }

    /// Whether any raw event arrived since the last snapshot.
    pub fn has_pending(&self) -> bool {
        self.dirty
    }

    /// Whether the left button is currently held.
    pub fn is_pressed(&self) -> bool {
        self.left_down || self.pending_press
    }

    /// Cursor position in physical pixels, top-left origin.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        let flipped = self.window_height - 1 - y.floor() as i32;
        self.mouse_pos = Some(Point::new(x.floor() as i32, flipped));
        self.dirty = true;
    }

    pub fn cursor_left(&mut self) {
        self.mouse_pos = None;
        self.dirty = true;
    }

    pub fn mouse_button(&mut self, state: ElementState, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => self.pending_press = true,
            ElementState::Released => self.pending_release = true,
        }
        self.dirty = true;
    }

    pub fn scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
        };
        self.dirty = true;
    }

    /// Record a logical key. Only releases count.
    pub fn key(&mut self, key: &Key, state: ElementState) {
        if state != ElementState::Released {
            return;
        }
        let press = match key {
            Key::Named(NamedKey::Backspace) => Some(KeyPress::Backspace),
            Key::Named(NamedKey::Enter) => Some(KeyPress::Enter),
            Key::Named(NamedKey::Escape) => Some(KeyPress::Escape),
            Key::Character(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(KeyPress::Char(c)),
                    _ => None,
                }
            }
            _ => None,
        };
        if let Some(press) = press {
            self.keys.push(press);
            self.dirty = true;
        }
    }

    /// Consume the events seen since the previous call.
    pub fn take_input(&mut self) -> Input {
        let mut input = Input {
            mouse_pos: self.mouse_pos,
            previous_mouse_pos: self.last_frame_pos,
            keys: std::mem::take(&mut self.keys),
            ..Default::default()
        };

        if std::mem::take(&mut self.pending_press) && !self.left_down {
            self.left_down = true;
            self.press_ticks = 0;
            self.press_start_pos = self.mouse_pos;
        } else if self.left_down {
            self.press_ticks += 1;
        }
        input.press_start_pos = self.press_start_pos;

        if std::mem::take(&mut self.pending_release) && self.left_down {
            input.mouse_left_button_released = true;
            input.mouse_left_button_clicked = self.press_ticks <= DRAG_MIN_PRESS_TICKS;
            input.mouse_left_button_dragging = false;
            self.left_down = false;
            self.press_ticks = 0;
        } else {
            input.mouse_left_button_dragging = self.left_down && self.press_ticks > DRAG_MIN_PRESS_TICKS;
        }
        if !self.left_down && !input.mouse_left_button_released {
            self.press_start_pos = None;
        }

        let scroll = std::mem::take(&mut self.scroll);
        input.mouse_scrolled = if scroll > 0.0 {
            Some(ScrollDir::Up)
        } else if scroll < 0.0 {
            Some(ScrollDir::Down)
        } else {
            None
        };

        self.last_frame_pos = self.mouse_pos;
        self.dirty = false;
        input
    }
}
