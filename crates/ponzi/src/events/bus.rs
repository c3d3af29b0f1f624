//! Event bus for queuing and dispatching UI events.
//!
//! The [`EventBus`] collects events while every widget processes the
//! frame's input, and hands them to the controller afterwards.

use std::collections::VecDeque;

use super::types::UiEvent;

/// A FIFO queue of [`UiEvent`]s.
///
/// ```ignore
/// view.process_input(&input, &mut bus);
/// for event in bus.take() {
///     controller.handle_event(&mut view, event);
/// }
/// ```
#[derive(Debug, Default)]
pub struct EventBus {
    events: VecDeque<UiEvent>,
}

impl EventBus {
    /// Create a new empty event bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event.
    pub fn emit(&mut self, event: UiEvent) {
        self.events.push_back(event);
    }

    /// Take every queued event, leaving the bus empty.
    #[must_use]
    pub fn take(&mut self) -> Vec<UiEvent> {
        self.events.drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
