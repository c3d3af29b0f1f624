//! Chart header: symbol, quote text and the button strip.

use std::sync::Arc;

use ponzi_core::{Point, PriceStyle, Quote, Rect, Symbol};
use ponzi_render::{DrawList, Icons, Matrix4, MeshData, TextAlign, TextMetrics};

use crate::input::Input;
use crate::view::button::Button;
use crate::view::theme;

/// Which buttons a header carries. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderConfig {
    pub show_price_style: bool,
    pub show_refresh: bool,
    pub show_add: bool,
    pub show_remove: bool,
}

impl HeaderConfig {
    pub const MAIN: HeaderConfig = HeaderConfig {
        show_price_style: true,
        show_refresh: true,
        show_add: true,
        show_remove: false,
    };

    pub const THUMBNAIL: HeaderConfig = HeaderConfig {
        show_price_style: false,
        show_refresh: false,
        show_add: false,
        show_remove: true,
    };
}

/// Buttons clicked during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderClicks {
    pub price_style: bool,
    pub refresh: bool,
    pub add: bool,
    pub remove: bool,
}

impl HeaderClicks {
    pub fn any(&self) -> bool {
        self.price_style || self.refresh || self.add || self.remove
    }
}

/// `474.00 +4.00 (+0.85%)`.
pub fn format_quote(price: f32, change: f32, change_ratio: f32) -> String {
    format!("{price:.2} {change:+.2} ({:+.2}%)", change_ratio * 100.0)
}

/// Price, change and ratio shown in the header: the quote when present.
pub fn quote_figures(quote: &Quote) -> (f32, f32, f32) {
    (quote.latest_price, quote.change, quote.change_percent)
}

#[derive(Debug, Clone)]
pub struct Header {
    symbol: Symbol,
    quote: Option<(f32, f32, f32)>,
    error: bool,
    error_icon: Arc<MeshData>,
    bars_icon: Arc<MeshData>,
    candles_icon: Arc<MeshData>,
    price_style: Button,
    refresh: Button,
    add: Button,
    remove: Button,
    metrics: TextMetrics,
    padding: i32,
    rect: Rect,
}

impl Header {
    pub fn new(symbol: Symbol, icons: &Icons, config: HeaderConfig, metrics: TextMetrics, padding: i32) -> Self {
        let button = |icon: &Arc<MeshData>, show: bool| {
            if show {
                Button::new(icon.clone())
            } else {
                Button::hidden(icon.clone())
            }
        };
        Self {
            symbol,
            quote: None,
            error: false,
            error_icon: icons.error.clone(),
            bars_icon: icons.bars.clone(),
            candles_icon: icons.candles.clone(),
            price_style: button(&icons.candles, config.show_price_style),
            refresh: button(&icons.refresh, config.show_refresh),
            add: button(&icons.add, config.show_add),
            remove: button(&icons.remove, config.show_remove),
            metrics,
            padding,
            rect: Rect::default(),
        }
    }

    /// Header height for the given font: padding, one line, padding.
    pub fn height(metrics: &TextMetrics, padding: i32) -> i32 {
        padding + metrics.line_height() + padding
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn set_quote(&mut self, figures: Option<(f32, f32, f32)>) {
        self.quote = figures;
    }

    pub fn set_error(&mut self, error: bool) {
        self.error = error;
    }

    pub fn set_loading(&mut self, loading: bool) {
        if loading {
            self.refresh.start_spinning();
        } else {
            self.refresh.stop_spinning();
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.refresh.is_spinning()
    }

    /// The price-style button shows the style a click switches to.
    pub fn set_price_style(&mut self, style: PriceStyle) {
        let icon = match style.toggled() {
            PriceStyle::Bar => &self.bars_icon,
            PriceStyle::Candlestick => &self.candles_icon,
        };
        self.price_style.set_icon(icon.clone());
    }

    /// Lay out the strip right to left: remove, add, refresh, price style.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
        let side = self.metrics.line_height();
        let y = rect.min.y + (rect.height() - side) / 2;
        let padding = self.padding;
        let mut x = rect.max.x - padding;
        for button in [&mut self.remove, &mut self.add, &mut self.refresh, &mut self.price_style] {
            if button.is_visible() {
                button.set_rect(Rect::new(x - side, y, x, y + side));
                x -= side + padding;
            }
        }
    }

    /// Left edge of the leftmost visible button.
    fn strip_left(&self) -> i32 {
        [&self.remove, &self.add, &self.refresh, &self.price_style]
            .iter()
            .filter(|b| b.is_visible())
            .map(|b| b.rect().min.x)
            .min()
            .unwrap_or(self.rect.max.x - self.padding)
    }

    pub fn process_input(&mut self, input: &Input) -> HeaderClicks {
        HeaderClicks {
            price_style: self.price_style.process_input(input),
            refresh: self.refresh.process_input(input),
            add: self.add.process_input(input),
            remove: self.remove.process_input(input),
        }
    }

    pub fn update(&mut self) -> bool {
        let mut dirty = false;
        for button in [&mut self.remove, &mut self.add, &mut self.refresh, &mut self.price_style] {
            dirty |= button.update();
        }
        dirty
    }

    pub fn render(&self, list: &mut DrawList, fudge: f32) {
        let baseline = self.rect.min.y + self.padding;
        let x = self.rect.min.x + self.padding;
        list.text(
            self.symbol.to_string(),
            Point::new(x, baseline),
            self.metrics.size,
            theme::TEXT,
            TextAlign::Left,
        );

        if let Some((price, change, ratio)) = self.quote {
            let offset = self.metrics.width(self.symbol.as_str()) + self.padding;
            list.text(
                format_quote(price, change, ratio),
                Point::new(x + offset, baseline),
                self.metrics.size,
                theme::change_color(change),
                TextAlign::Left,
            );
        }

        if self.error {
            let side = self.metrics.line_height();
            let right = self.strip_left() - self.padding;
            let y = self.rect.min.y + (self.rect.height() - side) / 2;
            let rect = Rect::new(right - side, y, right, y + side);
            list.mesh(&self.error_icon, Matrix4::for_rect(&rect));
        }

        for button in [&self.remove, &self.add, &self.refresh, &self.price_style] {
            button.render(list, fudge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(config: HeaderConfig) -> Header {
        let icons = Icons::load().unwrap();
        let mut h = Header::new(Symbol::parse("SPY").unwrap(), &icons, config, TextMetrics::new(10.0), 5);
        h.set_rect(Rect::new(0, 0, 200, Header::height(&TextMetrics::new(10.0), 5)));
        h
    }

    fn click_at(p: Point) -> Input {
        Input {
            mouse_pos: Some(p),
            mouse_left_button_clicked: true,
            mouse_left_button_released: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_quote_format() {
        assert_eq!(format_quote(474.0, 4.0, 0.0085), "474.00 +4.00 (+0.85%)");
        assert_eq!(format_quote(10.5, -0.25, -0.0233), "10.50 -0.25 (-2.33%)");
    }

    #[test]
    fn test_main_strip_order() {
        let h = header(HeaderConfig::MAIN);
        assert!(!h.remove.is_visible());
        assert!(h.add.rect().min.x > h.refresh.rect().min.x);
        assert!(h.refresh.rect().min.x > h.price_style.rect().min.x);
        assert_eq!(h.add.rect().max.x, 195);
    }

    #[test]
    fn test_thumbnail_remove_click() {
        let mut h = header(HeaderConfig::THUMBNAIL);
        let centre = h.remove.rect().center();
        let clicks = h.process_input(&click_at(centre));
        assert!(clicks.remove);
        assert!(!clicks.add && !clicks.refresh);
    }

    #[test]
    fn test_loading_spins_refresh() {
        let mut h = header(HeaderConfig::MAIN);
        h.set_loading(true);
        assert!(h.is_spinning());
        h.set_loading(false);
        for _ in 0..60 {
            h.update();
        }
        assert!(!h.is_spinning());
    }
}
