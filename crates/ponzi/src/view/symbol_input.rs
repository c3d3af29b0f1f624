//! Symbol entry overlay drawn over the main chart while typing.

use ponzi_core::symbol::{is_symbol_char, MAX_SYMBOL_LEN};
use ponzi_core::{Point, Rect};
use ponzi_render::{DrawList, TextAlign, TextMetrics};

use crate::events::{EventBus, UiEvent};
use crate::input::{Input, KeyPress};
use crate::view::theme;

const ENTRY_FONT_SIZE: f32 = 48.0;

#[derive(Debug, Default)]
pub struct SymbolInput {
    text: String,
    rect: Rect,
}

impl SymbolInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_active(&self) -> bool {
        !self.text.is_empty()
    }

    /// Area the overlay centres itself in.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Apply this frame's key presses. Returns whether the text changed.
    pub fn process_input(&mut self, input: &Input, bus: &mut EventBus) -> bool {
        let mut changed = false;
        for key in &input.keys {
            match key {
                KeyPress::Char(c) => {
                    let c = c.to_ascii_uppercase();
                    if is_symbol_char(c) && self.text.len() < MAX_SYMBOL_LEN {
                        self.text.push(c);
                        changed = true;
                    }
                }
                KeyPress::Backspace => changed |= self.text.pop().is_some(),
                KeyPress::Escape => {
                    changed |= !self.text.is_empty();
                    self.text.clear();
                }
                KeyPress::Enter => {
                    if !self.text.is_empty() {
                        bus.emit(UiEvent::SymbolSubmitted(std::mem::take(&mut self.text)));
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    pub fn render(&self, list: &mut DrawList) {
        if self.text.is_empty() {
            return;
        }
        let metrics = TextMetrics::new(ENTRY_FONT_SIZE);
        let pad = theme::PADDING;
        let rect = Rect::from_size(
            metrics.width(&self.text) + 2 * pad,
            metrics.line_height() + 2 * pad,
        )
        .centered_on(self.rect.center());
        list.fill_rect(&rect, theme::BUBBLE);
        list.stroke_rect(&rect, theme::BORDER);
        list.text(
            self.text.clone(),
            Point::new(rect.center().x, rect.min.y + pad),
            metrics.size,
            theme::TEXT,
            TextAlign::Center,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(keys: Vec<KeyPress>) -> Input {
        Input {
            keys,
            ..Default::default()
        }
    }

    fn typed(s: &str) -> Input {
        keys(s.chars().map(KeyPress::Char).collect())
    }

    #[test]
    fn test_typing_and_submit() {
        let mut entry = SymbolInput::new();
        let mut bus = EventBus::new();
        entry.process_input(&typed("spy"), &mut bus);
        assert_eq!(entry.text(), "SPY");
        assert!(bus.is_empty());

        entry.process_input(&keys(vec![KeyPress::Enter]), &mut bus);
        assert_eq!(bus.take(), vec![UiEvent::SymbolSubmitted("SPY".into())]);
        assert!(!entry.is_active());
    }

    #[test]
    fn test_rejects_non_symbol_chars() {
        let mut entry = SymbolInput::new();
        let mut bus = EventBus::new();
        entry.process_input(&typed("b r k.b!"), &mut bus);
        assert_eq!(entry.text(), "BRK.B");
    }

    #[test]
    fn test_length_capped() {
        let mut entry = SymbolInput::new();
        let mut bus = EventBus::new();
        entry.process_input(&typed("ABCDEFGHIJKLMN"), &mut bus);
        assert_eq!(entry.text().len(), MAX_SYMBOL_LEN);
    }

    #[test]
    fn test_backspace_and_escape() {
        let mut entry = SymbolInput::new();
        let mut bus = EventBus::new();
        entry.process_input(&typed("QQQ"), &mut bus);
        entry.process_input(&keys(vec![KeyPress::Backspace]), &mut bus);
        assert_eq!(entry.text(), "QQ");
        entry.process_input(&keys(vec![KeyPress::Escape]), &mut bus);
        assert_eq!(entry.text(), "");
        assert!(!entry.process_input(&keys(vec![KeyPress::Enter]), &mut bus));
        assert!(bus.is_empty());
    }

    #[test]
    fn test_overlay_only_while_typing() {
        let mut entry = SymbolInput::new();
        entry.set_rect(Rect::new(0, 0, 400, 300));
        let mut list = DrawList::new();
        entry.render(&mut list);
        assert!(list.is_empty());

        let mut bus = EventBus::new();
        entry.process_input(&typed("X"), &mut bus);
        entry.render(&mut list);
        assert_eq!(list.texts()[0].text, "X");
    }
}
