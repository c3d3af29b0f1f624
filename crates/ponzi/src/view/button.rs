//! Square icon button, optionally spinning while work is in flight.

use std::sync::Arc;

use ponzi_core::Rect;
use ponzi_render::{DrawList, Matrix4, MeshData};

use crate::animation::Spinner;
use crate::input::Input;
use crate::view::theme;

#[derive(Debug, Clone)]
pub struct Button {
    icon: Arc<MeshData>,
    rect: Rect,
    visible: bool,
    hovered: bool,
    spinner: Spinner,
}

impl Button {
    pub fn new(icon: Arc<MeshData>) -> Self {
        Self {
            icon,
            rect: Rect::default(),
            visible: true,
            hovered: false,
            spinner: Spinner::new(),
        }
    }

    pub fn hidden(icon: Arc<MeshData>) -> Self {
        Self {
            visible: false,
            ..Self::new(icon)
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_icon(&mut self, icon: Arc<MeshData>) {
        self.icon = icon;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Spin continuously until [`stop_spinning`](Self::stop_spinning).
    pub fn start_spinning(&mut self) {
        self.spinner.start();
    }

    /// Finish the current turn, then rest.
    pub fn stop_spinning(&mut self) {
        self.spinner.stop();
    }

    pub fn is_spinning(&self) -> bool {
        self.spinner.is_animating()
    }

    /// Whether a click was released inside the button this frame.
    pub fn process_input(&mut self, input: &Input) -> bool {
        if !self.visible {
            return false;
        }
        self.hovered = input.mouse_pos.is_some_and(|p| self.rect.contains(p));
        input.clicked_in(|p| self.rect.contains(p))
    }

    pub fn update(&mut self) -> bool {
        self.spinner.update()
    }

    pub fn render(&self, list: &mut DrawList, fudge: f32) {
        if !self.visible || self.rect.is_empty() {
            return;
        }
        let model = Matrix4::for_rect(&self.rect) * Matrix4::rotate_z(self.spinner.angle(fudge));
        if self.hovered {
            list.mesh_tinted(&self.icon, model, theme::BUTTON_HOVER);
        } else {
            list.mesh(&self.icon, model);
        }
    }
}
