//! Application state: window, graphics, view and controller.
//!
//! One [`AppState::frame`] call is one iteration of the loop:
//! 1. advance the fixed-step clock
//! 2. apply finished background loads
//! 3. snapshot the input gathered since the last frame
//! 4. let the view turn input into events, then hand them to the controller
//! 5. run the fixed updates, render with the leftover fudge, present
//!
//! The loop keeps requesting redraws while anything animates or the mouse
//! button is held; otherwise it sleeps until the next window event or wake.

pub mod graphics;

pub use graphics::GraphicsState;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use ponzi_core::Rect;
use ponzi_render::{DrawList, Icons};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::controller::Controller;
use crate::events::EventBus;
use crate::frame_loop::FrameClock;
use crate::input::InputCollector;
use crate::view::View;

pub struct AppState {
    pub window: Arc<Window>,
    graphics: GraphicsState,
    view: View,
    controller: Controller,
    input: InputCollector,
    bus: EventBus,
    clock: FrameClock,
    list: DrawList,
    title: String,
    /// The previous frame went idle; the next one restarts the clock.
    idle: bool,
}

impl AppState {
    pub async fn new(window: Arc<Window>, icons: Icons, mut controller: Controller) -> anyhow::Result<Self> {
        let graphics = GraphicsState::new(window.clone())
            .await
            .context("GPU initialisation failed")?;
        let (width, height) = graphics.dimensions();

        let mut view = View::new(icons);
        view.set_bounds(Rect::from_size(width as i32, height as i32));
        controller.startup(&mut view);

        Ok(Self {
            window,
            graphics,
            view,
            controller,
            input: InputCollector::new(height),
            bus: EventBus::new(),
            clock: FrameClock::new(),
            list: DrawList::new(),
            title: String::new(),
            idle: true,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.graphics.resize(width, height);
        self.input.set_window_height(height);
        self.view.set_bounds(Rect::from_size(width as i32, height as i32));
        self.window.request_redraw();
    }

    /// Feed a window event to the input collector.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        self.graphics.on_window_event(&self.window, event);
        match event {
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => self.input.cursor_moved(position.x, position.y),
            WindowEvent::CursorLeft { .. } => self.input.cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => self.input.mouse_button(*state, *button),
            WindowEvent::MouseWheel { delta, .. } => self.input.scroll(*delta),
            WindowEvent::KeyboardInput { event, .. } => self.input.key(&event.logical_key, event.state),
            _ => {}
        }
        if self.input.has_pending() {
            self.window.request_redraw();
        }
    }

    /// A background load finished.
    pub fn wake(&mut self) {
        self.window.request_redraw();
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        if std::mem::take(&mut self.idle) {
            self.clock.reset(now);
        }
        let step = self.clock.advance(now);

        let mut dirty = self.controller.pump(&mut self.view);

        let had_input = self.input.has_pending();
        let input = self.input.take_input();
        self.view.process_input(&input, &mut self.bus);
        for event in self.bus.take() {
            self.controller.handle_event(&mut self.view, event);
            dirty = true;
        }

        for _ in 0..step.updates {
            dirty |= self.view.update();
        }

        self.list.clear();
        self.view.render(&mut self.list, step.fudge);
        self.graphics.render_or_recover(&self.window, &self.list);

        let title = self.view.title();
        if title != self.title {
            self.window.set_title(&title);
            self.title = title;
        }

        if dirty || had_input || self.view.is_animating() || self.input.is_pressed() {
            self.window.request_redraw();
        } else {
            self.idle = true;
        }
    }
}
