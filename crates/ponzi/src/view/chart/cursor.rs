//! Crosshair, cursor labels and the legend bubbles under the pointer.

use ponzi_core::{ChartData, Point, Rect, TradingSession};
use ponzi_render::{session_index_at, Color, DrawList, TextAlign, TextMetrics, ValueRange};

use crate::view::axis::{self, format_price, format_volume, normalize_x, normalize_y};
use crate::view::chart::layout::{ChartLayout, Panel};
use crate::view::chart::panels::ChartPlots;
use crate::view::theme;

const UP_ARROW: char = '▲';
const DOWN_ARROW: char = '▼';

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub value: String,
    /// Direction versus the previous session, absent when unchanged.
    pub arrow: Option<(char, Color)>,
}

fn arrow(current: f32, previous: Option<f32>) -> Option<(char, Color)> {
    let previous = previous?;
    if current > previous {
        Some((UP_ARROW, Color::UP))
    } else if current < previous {
        Some((DOWN_ARROW, Color::DOWN))
    } else {
        None
    }
}

/// Open, high, low, close and change of session `i`.
pub fn price_legend(sessions: &[TradingSession], i: usize) -> Vec<LegendEntry> {
    let Some(s) = sessions.get(i) else {
        return Vec::new();
    };
    let prev = i.checked_sub(1).and_then(|p| sessions.get(p));
    let entry = |label, value: f32, pick: fn(&TradingSession) -> f32| LegendEntry {
        label,
        value: format_price(value),
        arrow: arrow(value, prev.map(pick)),
    };
    vec![
        entry("O", s.open, |s| s.open),
        entry("H", s.high, |s| s.high),
        entry("L", s.low, |s| s.low),
        entry("C", s.close, |s| s.close),
        LegendEntry {
            label: "Δ",
            value: format!("{:+.2} ({:+.2}%)", s.change, s.percent_change * 100.0),
            arrow: None,
        },
    ]
}

/// Volume text, hidden for sessions that did not trade.
pub fn volume_legend(session: &TradingSession) -> Option<String> {
    (session.volume > 0).then(|| format_volume(session.volume as f32))
}

/// Which panel the pointer is over.
fn panel_at<'a>(layout: &'a ChartLayout, mouse: Point) -> Option<&'a Panel> {
    layout.panels().find(|p| p.plot.contains(mouse))
}

/// Index of the session under `mouse.x`, if the pointer is over a plot.
pub fn hovered_session(layout: &ChartLayout, data: &ChartData, mouse: Point) -> Option<usize> {
    let panel = panel_at(layout, mouse)?;
    session_index_at(normalize_x(&panel.plot, mouse.x), data.trading_sessions.len())
}

/// Label box right of `plot` at pointer height, flipped to the left edge if
/// it would sit under the pointer.
fn side_label_rect(panel: &Panel, mouse: Point, width: i32, height: i32) -> Rect {
    let y = mouse.y - height / 2;
    let right = Rect::new(panel.labels.max.x - width, y, panel.labels.max.x, y + height);
    let left = Rect::new(panel.plot.min.x, y, panel.plot.min.x + width, y + height);
    axis::place_cursor_label(right, left, mouse)
}

fn bubble(list: &mut DrawList, rect: &Rect, text: &str, metrics: &TextMetrics, color: Color) {
    list.fill_rect(rect, theme::BUBBLE);
    list.text(
        text.to_string(),
        Point::new(rect.center().x, rect.min.y + (rect.height() - metrics.line_height()) / 2 + 1),
        metrics.size,
        color,
        TextAlign::Center,
    );
}

pub struct CursorContext<'a> {
    pub layout: &'a ChartLayout,
    pub plots: &'a ChartPlots,
    pub data: &'a ChartData,
    pub metrics: &'a TextMetrics,
    pub padding: i32,
}

impl CursorContext<'_> {
    pub fn render(&self, list: &mut DrawList, mouse: Point) {
        let Some(panel) = panel_at(self.layout, mouse) else {
            return;
        };
        let column = self.layout.plot_column();
        list.vline(mouse.x, column.min.y, column.max.y, theme::CROSSHAIR);
        list.hline(panel.plot.min.x, panel.plot.max.x, mouse.y, theme::CROSSHAIR);

        self.render_value_label(list, panel, mouse);
        self.render_time_label(list, mouse);

        let sessions = self.data.trading_sessions.sessions();
        if let Some(i) = hovered_session(self.layout, self.data, mouse) {
            self.render_legends(list, sessions, i, mouse);
        }
    }

    fn render_value_label(&self, list: &mut DrawList, panel: &Panel, mouse: Point) {
        let y = normalize_y(&panel.plot, mouse.y);
        let text = if panel == &self.layout.price {
            format_price(self.plots.price.range.unscale(y))
        } else if Some(panel) == self.layout.volume.as_ref() {
            let range: ValueRange = match &self.plots.volume {
                Some(v) => v.range,
                None => return,
            };
            format_volume(range.unscale(y))
        } else {
            axis::format_percent((y + 1.0) / 2.0)
        };
        let lh = self.metrics.line_height();
        let width = self.metrics.width(&text) + self.padding;
        let rect = side_label_rect(panel, mouse, width, lh + 2);
        bubble(list, &rect, &text, self.metrics, theme::TEXT);
    }

    fn render_time_label(&self, list: &mut DrawList, mouse: Point) {
        let Some(timeline) = &self.layout.timeline else {
            return;
        };
        let n = self.data.trading_sessions.len();
        let Some(i) = session_index_at(normalize_x(&timeline.plot, mouse.x), n) else {
            return;
        };
        let Some(session) = self.data.trading_sessions.get(i) else {
            return;
        };
        let text = axis::format_cursor_session(session, self.data.range);
        let width = self.metrics.width(&text) + self.padding;
        let lh = self.metrics.line_height() + 2;
        let y = timeline.plot.min.y + (timeline.plot.height() - lh) / 2;
        let preferred = Rect::new(mouse.x - width / 2, y, mouse.x - width / 2 + width, y + lh);
        let alternative = preferred.translate(Point::new(0, timeline.plot.height()));
        let rect = axis::place_cursor_label(preferred, alternative, mouse);
        bubble(list, &rect, &text, self.metrics, theme::TEXT);
    }

    fn render_legends(&self, list: &mut DrawList, sessions: &[TradingSession], i: usize, mouse: Point) {
        let lh = self.metrics.line_height();
        let pad = self.padding / 2;

        if self.layout.price.plot.contains(mouse) {
            let entries = price_legend(sessions, i);
            let widest = entries
                .iter()
                .map(|e| self.metrics.width(&format!("{} {} ▲", e.label, e.value)))
                .max()
                .unwrap_or(0);
            let height = entries.len() as i32 * lh + 2 * pad;
            let width = widest + 2 * pad;
            // Below-right of the pointer, pulled back inside the plot.
            let plot = self.layout.price.plot;
            let mut x = mouse.x + self.padding;
            if x + width > plot.max.x {
                x = mouse.x - self.padding - width;
            }
            let mut top = mouse.y - self.padding;
            if top - height < plot.min.y {
                top = plot.min.y + height;
            }
            let rect = Rect::new(x, top - height, x + width, top);
            list.fill_rect(&rect, theme::BUBBLE);
            for (row, entry) in entries.iter().enumerate() {
                let baseline = top - pad - (row as i32 + 1) * lh;
                let line = format!("{} {}", entry.label, entry.value);
                list.text(line.clone(), Point::new(x + pad, baseline), self.metrics.size, theme::TEXT, TextAlign::Left);
                if let Some((glyph, color)) = entry.arrow {
                    let ax = x + pad + self.metrics.width(&line) + self.metrics.char_width() as i32;
                    list.text(glyph.to_string(), Point::new(ax, baseline), self.metrics.size, color, TextAlign::Left);
                }
            }
        }

        if let (Some(volume), Some(session)) = (&self.layout.volume, sessions.get(i)) {
            if let Some(text) = volume_legend(session) {
                let origin = Point::new(volume.plot.min.x + pad, volume.plot.max.y - pad - lh);
                let rect = Rect::new(
                    origin.x - pad,
                    origin.y - pad,
                    origin.x + self.metrics.width(&text) + pad,
                    origin.y + lh + pad,
                );
                list.fill_rect(&rect, theme::BUBBLE);
                list.text(text, origin, self.metrics.size, theme::TEXT, TextAlign::Left);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ponzi_core::TradingSessionSeries;

    fn sessions() -> Vec<TradingSession> {
        let bars = [(10.0, 12.0, 9.0, 11.0, 100), (11.0, 12.0, 8.0, 10.0, 0)];
        let raw = bars
            .iter()
            .enumerate()
            .map(|(i, (o, h, l, c, v))| {
                let date = NaiveDate::from_ymd_opt(2024, 3, 1 + i as u32)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap();
                TradingSession::new(date, *o, *h, *l, *c, *v)
            })
            .collect();
        TradingSessionSeries::new(raw).sessions().to_vec()
    }

    #[test]
    fn test_legend_arrows_follow_previous_session() {
        let s = sessions();
        let legend = price_legend(&s, 1);
        assert_eq!(legend[0].label, "O");
        assert_eq!(legend[0].value, "11.00");
        assert_eq!(legend[0].arrow, Some((UP_ARROW, Color::UP)));
        assert_eq!(legend[1].arrow, None);
        assert_eq!(legend[2].arrow, Some((DOWN_ARROW, Color::DOWN)));
        assert_eq!(legend[3].arrow, Some((DOWN_ARROW, Color::DOWN)));
        assert_eq!(legend[4].value, "-1.00 (-9.09%)");

        assert!(price_legend(&s, 0).iter().all(|e| e.arrow.is_none()));
        assert!(price_legend(&s, 5).is_empty());
    }

    #[test]
    fn test_zero_volume_hides_legend() {
        let s = sessions();
        assert_eq!(volume_legend(&s[0]).as_deref(), Some("100"));
        assert_eq!(volume_legend(&s[1]), None);
    }
}
