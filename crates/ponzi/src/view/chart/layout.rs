//! Chart layout: header strip, stacked panels and the label gutter.

use ponzi_core::{Range, Rect};
use ponzi_render::TextMetrics;

use crate::view::header::Header;

/// Share of the body height taken by the timeline band.
pub const TIMELINE_SHARE: f32 = 0.05;
/// Share of the body height taken by each of the volume and stochastic panels.
pub const PANEL_SHARE: f32 = 0.13;

/// A panel's drawing area and the gutter on its right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Panel {
    pub plot: Rect,
    pub labels: Rect,
}

impl Panel {
    fn split(band: Rect, gutter: i32, padding: i32) -> Self {
        let (plot, labels) = band.split_right(gutter + padding);
        Self {
            plot: plot.inset(padding / 2),
            labels: Rect::new(labels.min.x, plot.min.y, labels.max.x - padding / 2, plot.max.y),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartLayout {
    pub header: Rect,
    pub body: Rect,
    pub price: Panel,
    pub volume: Option<Panel>,
    pub daily_stochastics: Option<Panel>,
    pub weekly_stochastics: Option<Panel>,
    /// Tick labels sit in `plot`; its x extent matches the panels above.
    pub timeline: Option<Panel>,
}

impl ChartLayout {
    /// Header and an undivided body, used while there is nothing to plot.
    pub fn frame(bounds: Rect, metrics: &TextMetrics, padding: i32) -> Self {
        let inner = bounds.inset(padding);
        let (header, body) = inner.split_top(Header::height(metrics, padding));
        Self {
            header,
            body,
            price: Panel { plot: body, labels: Rect::default() },
            ..Default::default()
        }
    }

    /// Full chart: bands from the bottom are timeline, weekly and daily
    /// stochastics (one year only), volume, then price with the remainder.
    pub fn main(bounds: Rect, range: Range, gutter: i32, metrics: &TextMetrics, padding: i32) -> Self {
        let frame = Self::frame(bounds, metrics, padding);
        let shares: &[f32] = if range.shows_stochastics() {
            &[TIMELINE_SHARE, PANEL_SHARE, PANEL_SHARE, PANEL_SHARE]
        } else {
            &[TIMELINE_SHARE, PANEL_SHARE]
        };
        let bands = frame.body.slice_bands(shares);
        let panel = |i: usize| Panel::split(bands[i], gutter, padding);

        let (weekly, daily, volume, price) = if range.shows_stochastics() {
            (Some(panel(1)), Some(panel(2)), panel(3), panel(4))
        } else {
            (None, None, panel(1), panel(2))
        };
        Self {
            price,
            volume: Some(volume),
            daily_stochastics: daily,
            weekly_stochastics: weekly,
            timeline: Some(panel(0)),
            ..frame
        }
    }

    /// Thumbnail: header over a single price plot, no gutter.
    pub fn thumbnail(bounds: Rect, metrics: &TextMetrics, padding: i32) -> Self {
        let frame = Self::frame(bounds, metrics, padding);
        Self {
            price: Panel {
                plot: frame.body,
                labels: Rect::default(),
            },
            ..frame
        }
    }

    /// Every panel with a plot, top to bottom.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        std::iter::once(&self.price)
            .chain(self.volume.iter())
            .chain(self.daily_stochastics.iter())
            .chain(self.weekly_stochastics.iter())
    }

    /// Column spanning every plot, used for the vertical crosshair.
    pub fn plot_column(&self) -> Rect {
        let mut bottom = self.price.plot.min.y;
        for panel in self.panels() {
            bottom = bottom.min(panel.plot.min.y);
        }
        Rect::new(self.price.plot.min.x, bottom, self.price.plot.max.x, self.price.plot.max.y)
    }
}
