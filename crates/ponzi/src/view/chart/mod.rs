//! Chart region: header, price/volume/stochastic panels, axes and cursor.
//!
//! A chart starts fresh and shows `LOADING…` (or `ERROR: …`) in its body
//! until the first successful [`Chart::set_data`]. The body then fades in
//! over one second.

mod cursor;
mod layout;
mod panels;

pub use cursor::{price_legend, volume_legend, LegendEntry};
pub use layout::{ChartLayout, Panel, PANEL_SHARE, TIMELINE_SHARE};
pub use panels::ChartPlots;

use ponzi_core::{ChartData, ModelError, Point, PriceStyle, Range, Rect, Symbol};
use ponzi_render::{DrawList, GeometryError, Icons, TextAlign, TextMetrics};
use thiserror::Error;

use crate::animation::{FadeState, Fader};
use crate::events::{EventBus, UiEvent, ZoomDir};
use crate::input::{Input, ScrollDir};
use crate::view::axis;
use crate::view::header::{format_quote, quote_figures, Header, HeaderConfig};
use crate::view::theme;

use cursor::CursorContext;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("missing chart data")]
    MissingData,
    #[error("bad range: chart shows {expected}, data covers {actual}")]
    BadRange { expected: Range, actual: Range },
    #[error("invalid chart data: {0}")]
    Invalid(#[from] ModelError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Main,
    Thumbnail,
}

#[derive(Debug)]
pub struct Chart {
    kind: ChartKind,
    symbol: Symbol,
    range: Range,
    price_style: PriceStyle,
    header: Header,
    data: Option<ChartData>,
    plots: Option<ChartPlots>,
    error: Option<String>,
    loading: bool,
    fader: Fader,
    metrics: TextMetrics,
    padding: i32,
    bounds: Rect,
    layout: ChartLayout,
    mouse: Option<Point>,
}

impl Chart {
    pub fn main(symbol: Symbol, range: Range, style: PriceStyle, icons: &Icons) -> Self {
        let metrics = TextMetrics::new(theme::FONT_SIZE);
        Self::new(ChartKind::Main, symbol, range, style, icons, metrics, theme::PADDING)
    }

    /// Thumbnails always show one year.
    pub fn thumbnail(symbol: Symbol, style: PriceStyle, icons: &Icons) -> Self {
        let metrics = TextMetrics::new(theme::SMALL_FONT_SIZE);
        Self::new(
            ChartKind::Thumbnail,
            symbol,
            Range::OneYear,
            style,
            icons,
            metrics,
            theme::SMALL_PADDING,
        )
    }

    fn new(
        kind: ChartKind,
        symbol: Symbol,
        range: Range,
        style: PriceStyle,
        icons: &Icons,
        metrics: TextMetrics,
        padding: i32,
    ) -> Self {
        let config = match kind {
            ChartKind::Main => HeaderConfig::MAIN,
            ChartKind::Thumbnail => HeaderConfig::THUMBNAIL,
        };
        let mut header = Header::new(symbol.clone(), icons, config, metrics, padding);
        header.set_price_style(style);
        Self {
            kind,
            symbol,
            range,
            price_style: style,
            header,
            data: None,
            plots: None,
            error: None,
            loading: false,
            fader: Fader::one_second(),
            metrics,
            padding,
            bounds: Rect::default(),
            layout: ChartLayout::default(),
            mouse: None,
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn data(&self) -> Option<&ChartData> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_data(&self) -> bool {
        self.plots.is_some()
    }

    /// Current alpha of the plotted body.
    pub fn body_alpha(&self, fudge: f32) -> f32 {
        self.fader.value(fudge)
    }

    /// Replace the plotted data. On error the chart keeps what it showed.
    pub fn set_data(&mut self, data: Option<ChartData>) -> Result<(), ChartError> {
        let data = data.ok_or(ChartError::MissingData)?;
        if data.range != self.range {
            return Err(ChartError::BadRange {
                expected: self.range,
                actual: data.range,
            });
        }
        data.validate()?;
        let plots = match self.kind {
            ChartKind::Main => ChartPlots::full(&data, self.price_style)?,
            ChartKind::Thumbnail => ChartPlots::price_only(&data, self.price_style)?,
        };

        self.header.set_quote(figures(&data));
        self.header.set_error(false);
        self.error = None;

        let fresh = self.plots.is_none();
        self.plots = Some(plots);
        self.data = Some(data);
        if fresh {
            self.fader.fade_in();
        }
        Ok(())
    }

    /// `SPY (SPDR S&P 500) 474.00 +4.00 (+0.85%)`, without the name when the
    /// provider gave none and without figures before data arrives.
    pub fn title(&self) -> String {
        let mut title = self.symbol.to_string();
        let Some(data) = &self.data else {
            return title;
        };
        if let Some(name) = data.quote.as_ref().map(|q| q.company_name.trim()).filter(|n| !n.is_empty()) {
            title.push_str(&format!(" ({name})"));
        }
        if let Some((price, change, ratio)) = figures(data) {
            title.push(' ');
            title.push_str(&format_quote(price, change, ratio));
        }
        title
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.header.set_loading(loading);
    }

    /// Show `message` as the chart's error. An already plotted body stays
    /// visible and the header shows the error icon.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.header.set_error(true);
    }

    pub fn set_price_style(&mut self, style: PriceStyle) {
        if style == self.price_style {
            return;
        }
        self.price_style = style;
        self.header.set_price_style(style);
        if let (Some(plots), Some(data)) = (&mut self.plots, &self.data) {
            if let Err(e) = plots.price.restyle(data, style) {
                log::warn!("{}: cannot restyle chart: {e}", self.symbol);
            }
        }
    }

    /// Lay out for this frame.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.layout = match (&self.plots, self.kind) {
            (Some(plots), ChartKind::Main) => {
                let gutter = axis::gutter_width(&self.metrics, &plots.price.range, self.range);
                ChartLayout::main(bounds, self.range, gutter, &self.metrics, self.padding)
            }
            (Some(_), ChartKind::Thumbnail) => ChartLayout::thumbnail(bounds, &self.metrics, self.padding),
            (None, _) => ChartLayout::frame(bounds, &self.metrics, self.padding),
        };
        self.header.set_rect(self.layout.header);
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Handle this frame's input and emit the resulting events.
    pub fn process_input(&mut self, input: &Input, bus: &mut EventBus) {
        self.mouse = input.mouse_pos;
        let clicks = self.header.process_input(input);
        match self.kind {
            ChartKind::Main => {
                if clicks.refresh {
                    bus.emit(UiEvent::RefreshClicked(self.symbol.clone()));
                }
                if clicks.add {
                    bus.emit(UiEvent::AddClicked);
                }
                if clicks.price_style {
                    bus.emit(UiEvent::PriceStyleChanged(self.price_style.toggled()));
                }
                let over_body = input.mouse_pos.is_some_and(|p| self.layout.body.contains(p));
                if over_body {
                    match input.mouse_scrolled {
                        Some(ScrollDir::Up) => bus.emit(UiEvent::ZoomChanged(ZoomDir::In)),
                        Some(ScrollDir::Down) => bus.emit(UiEvent::ZoomChanged(ZoomDir::Out)),
                        None => {}
                    }
                }
            }
            ChartKind::Thumbnail => {
                if clicks.remove {
                    bus.emit(UiEvent::RemoveClicked(self.symbol.clone()));
                } else if !clicks.any() {
                    let bounds = Rect::new(
                        self.layout.header.min.x,
                        self.layout.body.min.y,
                        self.layout.header.max.x,
                        self.layout.header.max.y,
                    );
                    if input.clicked_in(|p| bounds.contains(p)) {
                        bus.emit(UiEvent::ThumbClicked(self.symbol.clone()));
                    }
                }
            }
        }
    }

    /// Advance animations. Returns whether anything moved.
    pub fn update(&mut self) -> bool {
        let header = self.header.update();
        let fade = self.fader.update();
        header || fade
    }

    pub fn is_animating(&self) -> bool {
        self.fader.is_animating() || self.header.is_spinning()
    }

    pub fn render(&self, list: &mut DrawList, fudge: f32) {
        self.header.render(list, fudge);

        let (Some(plots), Some(data)) = (&self.plots, &self.data) else {
            let text = match &self.error {
                Some(message) => format!("ERROR: {message}"),
                None => "LOADING…".to_string(),
            };
            self.render_message(list, &text);
            return;
        };

        self.fader.render(list, fudge, |list| {
            let layout = &self.layout;
            plots.price.render(list, &layout.price.plot);
            if let (Some(panel), Some(volume)) = (&layout.volume, &plots.volume) {
                volume.render(list, &panel.plot);
            }
            if let (Some(panel), Some(stoch)) = (&layout.daily_stochastics, &plots.daily_stochastics) {
                stoch.render(list, &panel.plot);
            }
            if let (Some(panel), Some(stoch)) = (&layout.weekly_stochastics, &plots.weekly_stochastics) {
                stoch.render(list, &panel.plot);
            }
            if self.kind == ChartKind::Main {
                self.render_axes(list, plots, data);
                if let Some(mouse) = self.mouse {
                    let cursor = CursorContext {
                        layout,
                        plots,
                        data,
                        metrics: &self.metrics,
                        padding: self.padding,
                    };
                    cursor.render(list, mouse);
                }
            }
        });
    }

    fn render_axes(&self, list: &mut DrawList, plots: &ChartPlots, data: &ChartData) {
        let layout = &self.layout;
        let size = self.metrics.size;
        for panel in layout.panels() {
            list.stroke_rect(&panel.plot, theme::BORDER);
        }

        let labels = axis::price_labels(&layout.price.plot, &plots.price.range, &self.metrics, self.padding);
        axis::render_vertical(list, &layout.price.labels, &labels, size);

        if let (Some(panel), Some(volume)) = (&layout.volume, &plots.volume) {
            let labels = axis::volume_labels(&panel.plot, &volume.range, &self.metrics);
            axis::render_vertical(list, &panel.labels, &labels, size);
        }
        for panel in [&layout.daily_stochastics, &layout.weekly_stochastics].into_iter().flatten() {
            let labels = axis::stochastic_labels(&panel.plot, &self.metrics);
            axis::render_vertical(list, &panel.labels, &labels, size);
        }
        if let Some(timeline) = &layout.timeline {
            let labels = axis::timeline_labels(&timeline.plot, data.trading_sessions.sessions(), data.range);
            axis::render_timeline(list, &timeline.plot, &layout.plot_column(), &labels, &self.metrics);
        }
    }

    fn render_message(&self, list: &mut DrawList, text: &str) {
        let body = self.layout.body;
        let color = if self.error.is_some() { theme::TEXT } else { theme::AXIS_TEXT };
        let center = body.center();
        list.text(
            text.to_string(),
            Point::new(center.x, center.y - self.metrics.line_height() / 2),
            self.metrics.size,
            color,
            TextAlign::Center,
        );
    }

    pub fn fade_state(&self) -> FadeState {
        self.fader.state()
    }
}

/// Header figures: the quote when present, else the last session.
fn figures(data: &ChartData) -> Option<(f32, f32, f32)> {
    match &data.quote {
        Some(quote) => Some(quote_figures(quote)),
        None => data
            .trading_sessions
            .last()
            .map(|s| (s.close, s.change, s.percent_change)),
    }
}
