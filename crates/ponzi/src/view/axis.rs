//! Axis labels: placement, formatting and gutter measurement.
//!
//! Labels are computed as plain data so layout can be tested without
//! rendering. `y` values are text baselines in window pixels.

use chrono::{NaiveDateTime, Timelike};
use ponzi_core::{Point, Range, Rect, TradingSession, TradingSessionSource};
use ponzi_render::{DrawList, TextAlign, TextMetrics, ValueRange};

use crate::view::theme;

/// Three-letter month names; every one is the same width in monospace.
const WIDEST_MONTH: &str = "May";
const WIDEST_HOUR: &str = "12PM";
const WIDEST_PERCENT: &str = "80%";
const WIDEST_VOLUME: &str = "999.9M";

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    /// Baseline for vertical axes, left edge of the tick for the timeline.
    pub pos: i32,
}

/// Normalised `[-1, 1]` coordinate of pixel `y` inside `rect`.
pub fn normalize_y(rect: &Rect, y: i32) -> f32 {
    let h = rect.height().max(1) as f32;
    2.0 * (y - rect.min.y) as f32 / h - 1.0
}

/// Normalised `[-1, 1]` coordinate of pixel `x` inside `rect`.
pub fn normalize_x(rect: &Rect, x: i32) -> f32 {
    let w = rect.width().max(1) as f32;
    2.0 * (x - rect.min.x) as f32 / w - 1.0
}

pub fn format_price(v: f32) -> String {
    format!("{v:.2}")
}

/// Compact volume such as `12.3M`.
pub fn format_volume(v: f32) -> String {
    let v = v.max(0.0);
    if v >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if v >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if v >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

pub fn format_percent(p: f32) -> String {
    format!("{:.0}%", p * 100.0)
}

/// Price labels from the top of `rect` downward, one per
/// `line height + padding`, each showing the price at its vertical centre.
pub fn price_labels(rect: &Rect, range: &ValueRange, metrics: &TextMetrics, padding: i32) -> Vec<AxisLabel> {
    let lh = metrics.line_height();
    let mut labels = Vec::new();
    let mut y = rect.max.y - lh;
    while y >= rect.min.y {
        let centre = y + lh / 2;
        labels.push(AxisLabel {
            text: format_price(range.unscale(normalize_y(rect, centre))),
            pos: y,
        });
        y -= lh + padding;
    }
    labels
}

fn fixed_level_labels(rect: &Rect, metrics: &TextMetrics, text: impl Fn(f32) -> String) -> Vec<AxisLabel> {
    theme::STOCHASTIC_LEVELS
        .iter()
        .map(|level| {
            let y = rect.min.y + (rect.height() as f32 * level).round() as i32;
            AxisLabel {
                text: text(2.0 * level - 1.0),
                pos: y - metrics.line_height() / 2,
            }
        })
        .collect()
}

/// Labels at 20% and 80% of the volume panel.
pub fn volume_labels(rect: &Rect, range: &ValueRange, metrics: &TextMetrics) -> Vec<AxisLabel> {
    fixed_level_labels(rect, metrics, |y| format_volume(range.unscale(y)))
}

/// `20%` and `80%` labels on the stochastic rails.
pub fn stochastic_labels(rect: &Rect, metrics: &TextMetrics) -> Vec<AxisLabel> {
    fixed_level_labels(rect, metrics, |y| format_percent((y + 1.0) / 2.0))
}

fn timeline_key(date: &NaiveDateTime, range: Range) -> u32 {
    match range {
        Range::OneDay => date.hour(),
        Range::OneYear => chrono::Datelike::month(date),
    }
}

pub fn format_tick(date: &NaiveDateTime, range: Range) -> String {
    match range {
        Range::OneDay => date.format("%-I%p").to_string(),
        Range::OneYear => date.format("%b").to_string(),
    }
}

/// Date text for the timeline cursor.
fn format_cursor_date(date: &NaiveDateTime, range: Range) -> String {
    match range {
        Range::OneDay => date.format("%H:%M").to_string(),
        Range::OneYear => date.format("%Y-%m-%d").to_string(),
    }
}

/// Cursor text for `session`: its date, followed by where the price came
/// from unless it is a regular close.
pub fn format_cursor_session(session: &TradingSession, range: Range) -> String {
    let date = format_cursor_date(&session.date, range);
    match session.source {
        TradingSessionSource::Close => date,
        source => format!("{date} {}", source.label()),
    }
}

/// One tick wherever the hour (one day) or month (one year) changes.
/// Tick `i` sits `i / N` of the way across `rect`.
pub fn timeline_labels(rect: &Rect, sessions: &[TradingSession], range: Range) -> Vec<AxisLabel> {
    let n = sessions.len();
    if n == 0 {
        return Vec::new();
    }
    sessions
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| timeline_key(&pair[0].date, range) != timeline_key(&pair[1].date, range))
        .map(|(i, pair)| {
            let index = i + 1;
            AxisLabel {
                text: format_tick(&pair[1].date, range),
                pos: rect.min.x + (rect.width() as f32 * index as f32 / n as f32).round() as i32,
            }
        })
        .collect()
}

/// Width of the label gutter needed for every visible axis.
pub fn gutter_width(metrics: &TextMetrics, range: &ValueRange, chart_range: Range) -> i32 {
    let widest_time = match chart_range {
        Range::OneDay => WIDEST_HOUR,
        Range::OneYear => WIDEST_MONTH,
    };
    let high = format_price(range.high);
    metrics.max_width([high.as_str(), widest_time, WIDEST_PERCENT, WIDEST_VOLUME])
}

/// Pick `preferred` unless it covers the pointer, then `alternative`.
pub fn place_cursor_label(preferred: Rect, alternative: Rect, mouse: Point) -> Rect {
    if preferred.contains(mouse) {
        alternative
    } else {
        preferred
    }
}

/// Draw right-aligned vertical axis labels inside `gutter`.
pub fn render_vertical(list: &mut DrawList, gutter: &Rect, labels: &[AxisLabel], size: f32) {
    for label in labels {
        list.text(
            label.text.clone(),
            Point::new(gutter.max.x, label.pos),
            size,
            theme::AXIS_TEXT,
            TextAlign::Right,
        );
    }
}

/// Draw timeline ticks: a grid line through `plot_column` and the text in `band`.
pub fn render_timeline(
    list: &mut DrawList,
    band: &Rect,
    plot_column: &Rect,
    labels: &[AxisLabel],
    metrics: &TextMetrics,
) {
    let baseline = band.min.y + (band.height() - metrics.line_height()) / 2;
    for label in labels {
        list.vline(label.pos, plot_column.min.y, plot_column.max.y, theme::GRID);
        list.text(
            label.text.clone(),
            Point::new(label.pos, baseline),
            metrics.size,
            theme::AXIS_TEXT,
            TextAlign::Center,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn session(date: NaiveDateTime) -> TradingSession {
        TradingSession::new(date, 1.0, 1.0, 1.0, 1.0, 1)
    }

    #[test]
    fn test_price_labels_step_down_from_top() {
        let rect = Rect::new(0, 0, 100, 100);
        let metrics = TextMetrics::new(10.0);
        let lh = metrics.line_height();
        let range = ValueRange::new(0.0, 100.0).unwrap();
        let labels = price_labels(&rect, &range, &metrics, 4);

        assert_eq!(labels[0].pos, 100 - lh);
        assert_eq!(labels[1].pos, 100 - lh - (lh + 4));
        assert!(labels.iter().all(|l| l.pos >= 0));
        assert!(labels.last().unwrap().pos - (lh + 4) < 0);
        // Linear range: the label centred at y shows y.
        let centre = labels[0].pos + lh / 2;
        assert_eq!(labels[0].text, format_price(centre as f32));
    }

    #[test]
    fn test_cursor_text_names_non_close_source() {
        let close = session(at(6, 28, 0));
        assert_eq!(format_cursor_session(&close, Range::OneYear), "2024-06-28");

        let delayed = close.with_source(TradingSessionSource::DelayedPrice);
        assert_eq!(format_cursor_session(&delayed, Range::OneYear), "2024-06-28 Delayed");

        let live = session(at(6, 28, 15)).with_source(TradingSessionSource::IntradayRealTime);
        assert_eq!(format_cursor_session(&live, Range::OneDay), "15:00 Real-Time");
    }

    #[test]
    fn test_fixed_levels() {
        let rect = Rect::new(0, 100, 50, 200);
        let metrics = TextMetrics::new(10.0);
        let labels = stochastic_labels(&rect, &metrics);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "20%");
        assert_eq!(labels[1].text, "80%");
        assert_eq!(labels[0].pos, 120 - metrics.line_height() / 2);
    }

    #[test]
    fn test_volume_format() {
        assert_eq!(format_volume(0.0), "0");
        assert_eq!(format_volume(950.0), "950");
        assert_eq!(format_volume(12_345.0), "12.3K");
        assert_eq!(format_volume(45_600_000.0), "45.6M");
        assert_eq!(format_volume(2_000_000_000.0), "2.0B");
    }

    #[test]
    fn test_timeline_ticks_on_month_change() {
        let sessions = vec![
            session(at(1, 30, 0)),
            session(at(1, 31, 0)),
            session(at(2, 1, 0)),
            session(at(2, 2, 0)),
        ];
        let rect = Rect::new(0, 0, 400, 20);
        let labels = timeline_labels(&rect, &sessions, Range::OneYear);
        assert_eq!(labels, vec![AxisLabel { text: "Feb".into(), pos: 200 }]);
    }

    #[test]
    fn test_timeline_ticks_on_hour_change() {
        let sessions = vec![session(at(2, 26, 9)), session(at(2, 26, 10)), session(at(2, 26, 10))];
        let rect = Rect::new(0, 0, 300, 20);
        let labels = timeline_labels(&rect, &sessions, Range::OneDay);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "10AM");
        assert_eq!(labels[0].pos, 100);
    }

    #[test]
    fn test_gutter_fits_highest_price() {
        let metrics = TextMetrics::new(10.0);
        let range = ValueRange::new(1.0, 12_345.0).unwrap();
        let width = gutter_width(&metrics, &range, Range::OneYear);
        assert_eq!(width, metrics.width("12345.00"));
    }

    #[test]
    fn test_cursor_label_flips_off_pointer() {
        let right = Rect::new(90, 0, 100, 10);
        let left = Rect::new(0, 0, 10, 10);
        assert_eq!(place_cursor_label(right, left, Point::new(50, 5)), right);
        assert_eq!(place_cursor_label(right, left, Point::new(95, 5)), left);
    }
}
