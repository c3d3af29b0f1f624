//! User-intent events emitted by the view and drained by the controller.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::{UiEvent, ZoomDir};
