//! Per-panel meshes built from chart data.
//!
//! Every mesh is normalised; panels stretch them over their plot rect at
//! render time. Replacing a panel drops its meshes and the renderer frees
//! the GPU copies after the next frame.

use std::sync::Arc;

use ponzi_core::{ChartData, Interval, PriceStyle, Rect, StochasticSeries};
use ponzi_render::{
    build_average_line, build_level_lines, build_price_mesh, build_stochastic_lines, build_volume_mesh,
    DrawList, GeometryError, MeshData, ValueRange,
};

use crate::view::theme;

#[derive(Debug, Clone)]
pub struct PricePanel {
    pub range: ValueRange,
    sticks: Arc<MeshData>,
    averages: Vec<Arc<MeshData>>,
}

impl PricePanel {
    pub fn build(data: &ChartData, style: PriceStyle) -> Result<Self, GeometryError> {
        let range = ValueRange::price(&data.trading_sessions)?;
        let sticks = Arc::new(build_price_mesh(&data.trading_sessions, style, &range)?);
        let averages = data
            .moving_averages
            .iter()
            .zip(theme::MOVING_AVERAGE_COLORS.iter().cycle())
            .map(|(ma, color)| {
                let values: Vec<f32> = ma.values.iter().map(|v| v.value).collect();
                Arc::new(build_average_line(&values, &range, *color))
            })
            .collect();
        Ok(Self { range, sticks, averages })
    }

    /// Rebuild only the sticks for a new style.
    pub fn restyle(&mut self, data: &ChartData, style: PriceStyle) -> Result<(), GeometryError> {
        self.sticks = Arc::new(build_price_mesh(&data.trading_sessions, style, &self.range)?);
        Ok(())
    }

    pub fn average_count(&self) -> usize {
        self.averages.len()
    }

    pub fn render(&self, list: &mut DrawList, plot: &Rect) {
        list.with_clip(*plot, |list| {
            list.mesh_in(&self.sticks, plot);
            for line in &self.averages {
                list.mesh_in(line, plot);
            }
        });
    }
}

#[derive(Debug, Clone)]
pub struct VolumePanel {
    pub range: ValueRange,
    bars: Arc<MeshData>,
    average: Arc<MeshData>,
}

impl VolumePanel {
    pub fn build(data: &ChartData) -> Result<Self, GeometryError> {
        let range = ValueRange::volume(&data.trading_sessions);
        let bars = Arc::new(build_volume_mesh(&data.trading_sessions, &range)?);
        let level = (range.scale(data.average_volume as f32) + 1.0) / 2.0;
        let average = Arc::new(build_level_lines(&[level], theme::AVERAGE_VOLUME));
        Ok(Self { range, bars, average })
    }

    pub fn render(&self, list: &mut DrawList, plot: &Rect) {
        list.with_clip(*plot, |list| {
            list.mesh_in(&self.bars, plot);
            list.mesh_in(&self.average, plot);
        });
    }
}

#[derive(Debug, Clone)]
pub struct StochasticPanel {
    pub interval: Interval,
    k: Arc<MeshData>,
    d: Arc<MeshData>,
    rails: Arc<MeshData>,
}

impl StochasticPanel {
    pub fn build(series: &StochasticSeries) -> Self {
        let (k, d) = build_stochastic_lines(series, theme::STOCHASTIC_K, theme::STOCHASTIC_D);
        Self {
            interval: series.interval,
            k: Arc::new(k),
            d: Arc::new(d),
            rails: Arc::new(build_level_lines(&theme::STOCHASTIC_LEVELS, theme::GRID)),
        }
    }

    pub fn render(&self, list: &mut DrawList, plot: &Rect) {
        list.with_clip(*plot, |list| {
            list.mesh_in(&self.rails, plot);
            list.mesh_in(&self.k, plot);
            list.mesh_in(&self.d, plot);
        });
    }
}

/// Every panel for one data set.
#[derive(Debug, Clone)]
pub struct ChartPlots {
    pub price: PricePanel,
    pub volume: Option<VolumePanel>,
    pub daily_stochastics: Option<StochasticPanel>,
    pub weekly_stochastics: Option<StochasticPanel>,
}

impl ChartPlots {
    /// Price only, for thumbnails.
    pub fn price_only(data: &ChartData, style: PriceStyle) -> Result<Self, GeometryError> {
        Ok(Self {
            price: PricePanel::build(data, style)?,
            volume: None,
            daily_stochastics: None,
            weekly_stochastics: None,
        })
    }

    pub fn full(data: &ChartData, style: PriceStyle) -> Result<Self, GeometryError> {
        let show_stochastics = data.range.shows_stochastics();
        let stochastics = |s: &Option<StochasticSeries>| {
            s.as_ref()
                .filter(|_| show_stochastics)
                .map(StochasticPanel::build)
        };
        Ok(Self {
            price: PricePanel::build(data, style)?,
            volume: Some(VolumePanel::build(data)?),
            daily_stochastics: stochastics(&data.daily_stochastics),
            weekly_stochastics: stochastics(&data.weekly_stochastics),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ponzi_core::{
        AverageKind, AverageSeries, AverageValue, Range, StochasticValue, Symbol, TradingSession,
        TradingSessionSeries,
    };

    fn data(range: Range) -> ChartData {
        let sessions: Vec<TradingSession> = (0..5)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1 + i).unwrap().and_hms_opt(0, 0, 0).unwrap();
                let open = 10.0 + i as f32;
                TradingSession::new(date, open, open + 2.0, open - 1.0, open + 1.0, 100 * (i as i64 + 1))
            })
            .collect();
        let series = TradingSessionSeries::new(sessions.clone());
        let mut data = ChartData::new(Symbol::parse("SPY").unwrap(), range, series);
        data.moving_averages = vec![AverageSeries::new(
            AverageKind::Simple,
            25,
            sessions.iter().map(|s| AverageValue { date: s.date, value: s.close }).collect(),
        )];
        data.daily_stochastics = Some(StochasticSeries::new(
            Interval::Daily,
            sessions.iter().map(|s| StochasticValue { date: s.date, k: 0.5, d: 0.4 }).collect(),
        ));
        data
    }

    #[test]
    fn test_full_plots() {
        let plots = ChartPlots::full(&data(Range::OneYear), PriceStyle::Candlestick).unwrap();
        assert_eq!(plots.price.average_count(), 1);
        assert!(plots.volume.is_some());
        assert!(plots.daily_stochastics.is_some());
        assert!(plots.weekly_stochastics.is_none());
    }

    #[test]
    fn test_one_day_drops_stochastics() {
        let plots = ChartPlots::full(&data(Range::OneDay), PriceStyle::Bar).unwrap();
        assert!(plots.daily_stochastics.is_none());
    }

    #[test]
    fn test_render_clips_to_plot() {
        let plots = ChartPlots::price_only(&data(Range::OneYear), PriceStyle::Candlestick).unwrap();
        let mut list = DrawList::new();
        let plot = Rect::new(10, 10, 110, 60);
        plots.price.render(&mut list, &plot);
        assert_eq!(list.meshes().len(), 2);
        assert!(list.meshes().iter().all(|m| m.clip == Some(plot)));
    }

    #[test]
    fn test_single_session_is_geometry_error() {
        let mut d = data(Range::OneYear);
        d.trading_sessions.truncate_front(1);
        d.moving_averages.clear();
        assert!(matches!(
            ChartPlots::price_only(&d, PriceStyle::Bar),
            Err(GeometryError::Empty { count: 1 })
        ));
    }
}
