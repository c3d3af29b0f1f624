//! Widgets and the top-level view: main chart, sidebar and symbol entry.
//!
//! The view owns every widget but performs no I/O. Each frame it turns the
//! collected input into [`UiEvent`](crate::events::UiEvent)s on the bus and
//! records draw commands into a [`DrawList`]; the controller reacts to the
//! events and pushes data back through [`View::main_chart_mut`] and
//! [`View::sidebar_mut`].

pub mod axis;
pub mod button;
pub mod chart;
pub mod header;
pub mod sidebar;
pub mod symbol_input;
pub mod theme;

use ponzi_core::{PriceStyle, Range, Rect, Symbol};
use ponzi_render::{DrawList, Icons};

use crate::events::EventBus;
use crate::input::Input;
use chart::Chart;
use sidebar::Sidebar;
use symbol_input::SymbolInput;

pub const APP_NAME: &str = "ponzi2";

#[derive(Debug)]
pub struct View {
    icons: Icons,
    main: Option<Chart>,
    sidebar: Sidebar,
    symbol_input: SymbolInput,
    bounds: Rect,
    main_bounds: Rect,
}

impl View {
    pub fn new(icons: Icons) -> Self {
        Self {
            icons,
            main: None,
            sidebar: Sidebar::new(),
            symbol_input: SymbolInput::new(),
            bounds: Rect::default(),
            main_bounds: Rect::default(),
        }
    }

    pub fn icons(&self) -> &Icons {
        &self.icons
    }

    /// Lay out for a window of this size: sidebar on the left, main chart on the rest.
    pub fn set_bounds(&mut self, window: Rect) {
        self.bounds = window;
        let (sidebar, main) = window.split_left(theme::SIDEBAR_WIDTH);
        self.main_bounds = main;
        self.sidebar.set_bounds(sidebar);
        self.symbol_input.set_rect(main);
        if let Some(chart) = &mut self.main {
            chart.set_bounds(main);
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Replace the main chart with an empty one for `symbol`.
    pub fn set_main_chart(&mut self, symbol: Symbol, range: Range, style: PriceStyle) -> &mut Chart {
        let mut chart = Chart::main(symbol, range, style, &self.icons);
        chart.set_bounds(self.main_bounds);
        self.main.insert(chart)
    }

    pub fn main_chart(&self) -> Option<&Chart> {
        self.main.as_ref()
    }

    pub fn main_chart_mut(&mut self) -> Option<&mut Chart> {
        self.main.as_mut()
    }

    /// Append a thumbnail for `symbol`, unless it is already listed.
    pub fn add_thumbnail(&mut self, symbol: Symbol, style: PriceStyle) -> Option<&mut Chart> {
        let chart = Chart::thumbnail(symbol.clone(), style, &self.icons);
        if !self.sidebar.add_thumbnail(chart) {
            return None;
        }
        self.sidebar.set_bounds(self.sidebar.bounds());
        self.sidebar.chart_mut(&symbol)
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn sidebar_mut(&mut self) -> &mut Sidebar {
        &mut self.sidebar
    }

    pub fn set_price_style(&mut self, style: PriceStyle) {
        if let Some(chart) = &mut self.main {
            chart.set_price_style(style);
        }
        for chart in self.sidebar.charts_mut() {
            chart.set_price_style(style);
        }
    }

    pub fn process_input(&mut self, input: &Input, bus: &mut EventBus) {
        self.symbol_input.process_input(input, bus);
        if let Some(chart) = &mut self.main {
            chart.set_bounds(self.main_bounds);
            chart.process_input(input, bus);
        }
        self.sidebar.process_input(input, bus);
    }

    /// Advance one fixed step. Returns whether anything changed.
    pub fn update(&mut self) -> bool {
        let main = self.main.as_mut().is_some_and(|c| c.update());
        let sidebar = self.sidebar.update();
        main || sidebar
    }

    pub fn is_animating(&self) -> bool {
        self.main.as_ref().is_some_and(|c| c.is_animating()) || self.sidebar.is_animating()
    }

    pub fn render(&self, list: &mut DrawList, fudge: f32) {
        if let Some(chart) = &self.main {
            list.with_clip(self.main_bounds, |list| chart.render(list, fudge));
        }
        self.sidebar.render(list, fudge);
        self.symbol_input.render(list);
    }

    /// Window title for the current main chart.
    pub fn title(&self) -> String {
        match &self.main {
            Some(chart) => format!("{} - {APP_NAME}", chart.title()),
            None => APP_NAME.to_string(),
        }
    }
}
