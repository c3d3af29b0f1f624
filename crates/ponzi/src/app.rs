//! Application handler for winit events.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use ponzi_render::Icons;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::controller::{Controller, Waker};
use crate::icon;
use crate::state::AppState;
use crate::view::APP_NAME;

pub const INITIAL_WIDTH: u32 = 1024;
pub const INITIAL_HEIGHT: u32 = 768;

/// Posted by background tasks to wake the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppWake {
    DataReady,
}

/// Wakes the loop through `proxy`; a closed loop is ignored.
pub fn proxy_waker(proxy: EventLoopProxy<AppWake>) -> Waker {
    let proxy = Mutex::new(proxy);
    Arc::new(move || {
        if let Ok(proxy) = proxy.lock() {
            let _ = proxy.send_event(AppWake::DataReady);
        }
    })
}

pub struct App {
    controller: Option<Controller>,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller: Some(controller),
            state: None,
            error: None,
        }
    }

    /// Startup failure recorded while the loop ran, if any.
    pub fn finish(self) -> anyhow::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let controller = self
            .controller
            .take()
            .ok_or_else(|| anyhow!("application resumed twice"))?;
        let icons = Icons::load().context("failed to decode icons")?;

        let window_attributes = Window::default_attributes()
            .with_title(APP_NAME)
            .with_inner_size(LogicalSize::new(INITIAL_WIDTH, INITIAL_HEIGHT))
            .with_window_icon(icon::window_icon());
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        pollster::block_on(AppState::new(window, icons, controller))
    }
}

impl ApplicationHandler<AppWake> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppWake) {
        log::trace!("wake: {event:?}");
        if let Some(state) = &mut self.state {
            state.wake();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => state.frame(),
            event => state.handle_window_event(&event),
        }
    }
}
