//! Watchlist sidebar: a scrollable column of thumbnail slots.
//!
//! Slots fade in when added and fade out when removed; a removed slot keeps
//! its place until the fade completes so the column does not jump. A long
//! press on a slot drags it, swapping with a neighbour whenever its centre
//! passes the neighbour's centre.

use ponzi_core::{Rect, Symbol};
use ponzi_render::DrawList;

use crate::animation::Fader;
use crate::events::{EventBus, UiEvent};
use crate::frame_loop::FPS;
use crate::input::{Input, ScrollDir};
use crate::view::chart::Chart;
use crate::view::theme;

const SLOT_GAP: i32 = theme::SMALL_PADDING;
const SLOT_FADE_TICKS: u32 = FPS / 2;
const SCROLL_STEP: i32 = 40;

#[derive(Debug)]
struct Slot {
    chart: Chart,
    fader: Fader,
    removing: bool,
}

#[derive(Debug)]
struct Drag {
    index: usize,
    start_order: Vec<Symbol>,
}

#[derive(Debug, Default)]
pub struct Sidebar {
    bounds: Rect,
    slots: Vec<Slot>,
    scroll: i32,
    drag: Option<Drag>,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.clamp_scroll();
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether a live (not fading out) thumbnail shows `symbol`.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.live().any(|s| s.chart.symbol() == symbol)
    }

    fn live(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| !s.removing)
    }

    /// Watchlist order, excluding thumbnails fading out.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.live().map(|s| s.chart.symbol().clone()).collect()
    }

    /// Append a thumbnail. Returns false if the symbol is already listed.
    pub fn add_thumbnail(&mut self, chart: Chart) -> bool {
        if self.contains(chart.symbol()) {
            return false;
        }
        let mut fader = Fader::new(SLOT_FADE_TICKS);
        fader.fade_in();
        self.slots.push(Slot {
            chart,
            fader,
            removing: false,
        });
        true
    }

    /// Start fading out the thumbnail for `symbol`.
    pub fn remove_thumbnail(&mut self, symbol: &Symbol) -> bool {
        let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| !s.removing && s.chart.symbol() == symbol)
        else {
            return false;
        };
        slot.removing = true;
        slot.fader.fade_out();
        true
    }

    pub fn chart_mut(&mut self, symbol: &Symbol) -> Option<&mut Chart> {
        self.slots
            .iter_mut()
            .find(|s| !s.removing && s.chart.symbol() == symbol)
            .map(|s| &mut s.chart)
    }

    pub fn charts_mut(&mut self) -> impl Iterator<Item = &mut Chart> {
        self.slots.iter_mut().map(|s| &mut s.chart)
    }

    fn step() -> i32 {
        theme::THUMBNAIL_HEIGHT + SLOT_GAP
    }

    /// Rect of slot `i` at the current scroll offset.
    fn slot_rect(&self, i: usize) -> Rect {
        let top = self.bounds.max.y - SLOT_GAP - i as i32 * Self::step() + self.scroll;
        Rect::new(
            self.bounds.min.x + SLOT_GAP,
            top - theme::THUMBNAIL_HEIGHT,
            self.bounds.max.x - SLOT_GAP,
            top,
        )
    }

    /// Scroll by `delta` pixels; positive reveals later slots.
    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll += delta;
        self.clamp_scroll();
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll
    }

    /// Keep at least the last slot on screen.
    fn clamp_scroll(&mut self) {
        let max = (self.slots.len() as i32 - 1).max(0) * Self::step();
        self.scroll = self.scroll.clamp(0, max);
    }

    fn layout(&mut self) {
        for i in 0..self.slots.len() {
            let rect = self.slot_rect(i);
            self.slots[i].chart.set_bounds(rect);
        }
    }

    pub fn process_input(&mut self, input: &Input, bus: &mut EventBus) {
        let over = input.mouse_pos.is_some_and(|p| self.bounds.contains(p));
        if over {
            match input.mouse_scrolled {
                Some(ScrollDir::Down) => self.scroll_by(SCROLL_STEP),
                Some(ScrollDir::Up) => self.scroll_by(-SCROLL_STEP),
                None => {}
            }
        }
        self.layout();

        if self.drag.is_none() && input.mouse_left_button_dragging {
            let start = input.press_start_pos.filter(|p| self.bounds.contains(*p));
            let index = start.and_then(|p| {
                (0..self.slots.len()).find(|&i| !self.slots[i].removing && self.slot_rect(i).contains(p))
            });
            if let Some(index) = index {
                log::debug!("dragging {}", self.slots[index].chart.symbol());
                self.drag = Some(Drag {
                    index,
                    start_order: self.symbols(),
                });
            }
        }

        if let Some(mut drag) = self.drag.take() {
            if input.mouse_left_button_released || !input.mouse_left_button_dragging {
                let order = self.symbols();
                let start: Vec<Symbol> = drag
                    .start_order
                    .into_iter()
                    .filter(|s| order.contains(s))
                    .collect();
                if order != start {
                    bus.emit(UiEvent::Reordered(order));
                }
                self.layout();
                return;
            }
            if let Some(mouse) = input.mouse_pos {
                let i = drag.index;
                if i > 0 && mouse.y > self.slot_rect(i - 1).center().y {
                    self.slots.swap(i, i - 1);
                    drag.index = i - 1;
                } else if i + 1 < self.slots.len() && mouse.y < self.slot_rect(i + 1).center().y {
                    self.slots.swap(i, i + 1);
                    drag.index = i + 1;
                }
                self.layout();
                let floating = self.slot_rect(drag.index).centered_on(mouse);
                self.slots[drag.index].chart.set_bounds(floating);
            }
            self.drag = Some(drag);
            return;
        }

        for slot in self.slots.iter_mut().filter(|s| !s.removing) {
            slot.chart.process_input(input, bus);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Advance thumbnails and fades; splice out slots that finished fading out.
    pub fn update(&mut self) -> bool {
        let mut dirty = false;
        for slot in &mut self.slots {
            dirty |= slot.chart.update();
            dirty |= slot.fader.update();
        }
        let dragged = self.drag.as_ref().map(|d| self.slots[d.index].chart.symbol().clone());
        let before = self.slots.len();
        self.slots.retain(|s| !(s.removing && s.fader.is_hidden()));
        if self.slots.len() != before {
            // Follow the dragged slot to its new index.
            let index = dragged.and_then(|symbol| {
                self.slots
                    .iter()
                    .position(|s| !s.removing && s.chart.symbol() == &symbol)
            });
            self.drag = match (self.drag.take(), index) {
                (Some(drag), Some(index)) => Some(Drag { index, ..drag }),
                _ => None,
            };
            self.clamp_scroll();
            dirty = true;
        }
        dirty
    }

    pub fn is_animating(&self) -> bool {
        self.slots
            .iter()
            .any(|s| s.fader.is_animating() || s.chart.is_animating())
    }

    pub fn render(&self, list: &mut DrawList, fudge: f32) {
        let dragged = self.drag.as_ref().map(|d| d.index);
        list.with_clip(self.bounds, |list| {
            for (i, slot) in self.slots.iter().enumerate() {
                if Some(i) != dragged {
                    Self::render_slot(slot, list, fudge);
                }
            }
            if let Some(i) = dragged {
                Self::render_slot(&self.slots[i], list, fudge);
            }
        });
    }

    fn render_slot(slot: &Slot, list: &mut DrawList, fudge: f32) {
        slot.fader.render(list, fudge, |list| {
            let bounds = slot.chart.bounds();
            list.fill_rect(&bounds, theme::BACKGROUND);
            list.stroke_rect(&bounds, theme::BORDER);
            slot.chart.render(list, fudge);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ponzi_core::{Point, PriceStyle};
    use ponzi_render::Icons;

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    fn sidebar(symbols: &[&str]) -> Sidebar {
        let icons = Icons::load().unwrap();
        let mut sidebar = Sidebar::new();
        sidebar.set_bounds(Rect::new(0, 0, theme::SIDEBAR_WIDTH, 768));
        for s in symbols {
            sidebar.add_thumbnail(Chart::thumbnail(sym(s), PriceStyle::Candlestick, &icons));
        }
        sidebar
    }

    fn centre_y(sidebar: &Sidebar, i: usize) -> i32 {
        sidebar.slot_rect(i).center().y
    }

    fn drag_to(start: Point, mouse: Point) -> Input {
        Input {
            mouse_pos: Some(mouse),
            previous_mouse_pos: Some(start),
            press_start_pos: Some(start),
            mouse_left_button_dragging: true,
            ..Default::default()
        }
    }

    fn release_at(start: Point, mouse: Point) -> Input {
        Input {
            mouse_pos: Some(mouse),
            press_start_pos: Some(start),
            mouse_left_button_released: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_drag_first_below_second() {
        let mut bar = sidebar(&["A", "B", "C"]);
        let mut bus = EventBus::new();
        let start = Point::new(100, centre_y(&bar, 0));
        let target = Point::new(100, centre_y(&bar, 1) - 5);

        bar.process_input(&drag_to(start, target), &mut bus);
        assert_eq!(bar.symbols(), vec![sym("B"), sym("A"), sym("C")]);
        assert!(bus.is_empty());

        // Holding still does not swap back.
        bar.process_input(&drag_to(start, target), &mut bus);
        assert_eq!(bar.symbols(), vec![sym("B"), sym("A"), sym("C")]);

        bar.process_input(&release_at(start, target), &mut bus);
        assert_eq!(bus.take(), vec![UiEvent::Reordered(vec![sym("B"), sym("A"), sym("C")])]);
        assert!(!bar.is_dragging());

        bar.process_input(&Input::default(), &mut bus);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_drag_upward_past_first() {
        let mut bar = sidebar(&["A", "B", "C", "D"]);
        let mut bus = EventBus::new();
        let start = Point::new(100, centre_y(&bar, 1));
        let above_a = Point::new(100, centre_y(&bar, 0) + 5);

        bar.process_input(&drag_to(start, above_a), &mut bus);
        bar.process_input(&release_at(start, above_a), &mut bus);
        assert_eq!(bar.symbols(), vec![sym("B"), sym("A"), sym("C"), sym("D")]);
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_drag_without_move_emits_nothing() {
        let mut bar = sidebar(&["A", "B"]);
        let mut bus = EventBus::new();
        let start = Point::new(100, centre_y(&bar, 0));
        bar.process_input(&drag_to(start, start), &mut bus);
        bar.process_input(&release_at(start, start), &mut bus);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_dragged_slot_renders_last() {
        let mut bar = sidebar(&["A", "B", "C"]);
        for _ in 0..FPS {
            bar.update();
        }
        let mut bus = EventBus::new();
        let start = Point::new(100, centre_y(&bar, 0));
        bar.process_input(&drag_to(start, start), &mut bus);
        assert!(bar.is_dragging());

        let mut list = DrawList::new();
        bar.render(&mut list, 0.0);
        let order: Vec<&str> = list
            .texts()
            .iter()
            .map(|t| t.text.as_str())
            .filter(|t| ["A", "B", "C"].contains(t))
            .collect();
        assert_eq!(order, vec!["B", "C", "A"]);

        // The dragged slot's meshes are painted after the other slots' text.
        let batch_of_text = |name: &str| {
            let i = list.texts().iter().position(|t| t.text == name).unwrap();
            list.batches().iter().position(|b| b.texts.contains(&i)).unwrap()
        };
        let dragged = batch_of_text("A");
        assert!(dragged > batch_of_text("B"));
        assert!(dragged > batch_of_text("C"));
    }

    #[test]
    fn test_removed_slot_spliced_after_fade() {
        let mut bar = sidebar(&["A", "B"]);
        assert!(bar.remove_thumbnail(&sym("A")));
        assert_eq!(bar.symbols(), vec![sym("B")]);
        assert_eq!(bar.len(), 2);
        for _ in 0..=SLOT_FADE_TICKS {
            bar.update();
        }
        assert_eq!(bar.len(), 1);
        assert!(!bar.remove_thumbnail(&sym("A")));
    }

    #[test]
    fn test_reorder_survives_removal_during_drag() {
        let mut bar = sidebar(&["A", "B", "C"]);
        let mut bus = EventBus::new();
        let start = Point::new(100, centre_y(&bar, 0));
        let target = Point::new(100, centre_y(&bar, 1) - 5);

        bar.process_input(&drag_to(start, target), &mut bus);
        assert_eq!(bar.symbols(), vec![sym("B"), sym("A"), sym("C")]);

        assert!(bar.remove_thumbnail(&sym("C")));
        for _ in 0..=SLOT_FADE_TICKS {
            bar.update();
        }
        assert_eq!(bar.len(), 2);
        assert!(bar.is_dragging());

        bar.process_input(&drag_to(start, target), &mut bus);
        assert_eq!(bar.symbols(), vec![sym("B"), sym("A")]);

        bar.process_input(&release_at(start, target), &mut bus);
        assert_eq!(bus.take(), vec![UiEvent::Reordered(vec![sym("B"), sym("A")])]);
    }

    #[test]
    fn test_removal_alone_is_not_a_reorder() {
        let mut bar = sidebar(&["A", "B", "C"]);
        let mut bus = EventBus::new();
        let start = Point::new(100, centre_y(&bar, 0));

        bar.process_input(&drag_to(start, start), &mut bus);
        assert!(bar.remove_thumbnail(&sym("B")));
        bar.process_input(&drag_to(start, start), &mut bus);
        bar.process_input(&release_at(start, start), &mut bus);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let icons = Icons::load().unwrap();
        let mut bar = sidebar(&["A"]);
        assert!(!bar.add_thumbnail(Chart::thumbnail(sym("A"), PriceStyle::Bar, &icons)));
        assert_eq!(bar.len(), 1);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut bar = sidebar(&["A", "B", "C"]);
        bar.scroll_by(-100);
        assert_eq!(bar.scroll_offset(), 0);
        bar.scroll_by(10_000);
        assert_eq!(bar.scroll_offset(), 2 * Sidebar::step());
    }

    #[test]
    fn test_thumbnail_click_passes_through() {
        let mut bar = sidebar(&["A", "B"]);
        let mut bus = EventBus::new();
        let p = Point::new(100, centre_y(&bar, 1) - 20);
        let input = Input {
            mouse_pos: Some(p),
            mouse_left_button_clicked: true,
            mouse_left_button_released: true,
            ..Default::default()
        };
        bar.process_input(&input, &mut bus);
        assert_eq!(bus.take(), vec![UiEvent::ThumbClicked(sym("B"))]);
    }
}
