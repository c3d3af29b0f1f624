//! Assembled chart data for one symbol.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::indicator::{AverageSeries, StochasticSeries};
use crate::quote::Quote;
use crate::session::TradingSessionSeries;
use crate::symbol::Symbol;

/// Time span shown by a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Range {
    /// Five-minute bars for the latest day.
    OneDay,
    /// Daily bars for roughly one year.
    #[default]
    OneYear,
}

impl Range {
    pub fn label(&self) -> &'static str {
        match self {
            Range::OneDay => "1D",
            Range::OneYear => "1Y",
        }
    }

    /// Whether stochastic panels are shown for this range.
    pub fn shows_stochastics(&self) -> bool {
        matches!(self, Range::OneYear)
    }
}

impl FromStr for Range {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1D" | "ONEDAY" => Ok(Range::OneDay),
            "1Y" | "ONEYEAR" => Ok(Range::OneYear),
            other => Err(ModelError::BadInput(format!("unknown range: {other}"))),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How price bars are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriceStyle {
    Bar,
    #[default]
    Candlestick,
}

impl PriceStyle {
    pub fn toggled(&self) -> PriceStyle {
        match self {
            PriceStyle::Bar => PriceStyle::Candlestick,
            PriceStyle::Candlestick => PriceStyle::Bar,
        }
    }
}

impl FromStr for PriceStyle {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Bar" => Ok(PriceStyle::Bar),
            "Candlestick" => Ok(PriceStyle::Candlestick),
            "" => Err(ModelError::BadInput("unspecified price style".to_string())),
            other => Err(ModelError::BadInput(format!("unknown price style: {other}"))),
        }
    }
}

/// Everything a chart needs to draw one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub symbol: Symbol,
    pub range: Range,
    pub quote: Option<Quote>,
    pub trading_sessions: TradingSessionSeries,
    /// Typically the 25, 50 and 200 session averages.
    pub moving_averages: Vec<AverageSeries>,
    pub average_volume: f64,
    pub daily_stochastics: Option<StochasticSeries>,
    pub weekly_stochastics: Option<StochasticSeries>,
}

impl ChartData {
    /// Chart data with only price history; indicators are left empty.
    pub fn new(symbol: Symbol, range: Range, trading_sessions: TradingSessionSeries) -> Self {
        let average_volume = trading_sessions.average_volume();
        Self {
            symbol,
            range,
            quote: None,
            trading_sessions,
            moving_averages: Vec::new(),
            average_volume,
            daily_stochastics: None,
            weekly_stochastics: None,
        }
    }

    /// Check that every indicator series lines up with the sessions.
    pub fn validate(&self) -> Result<(), ModelError> {
        let expected = self.trading_sessions.len();
        let check = |name: String, actual: usize| {
            if actual == expected {
                Ok(())
            } else {
                Err(ModelError::LengthMismatch {
                    series: name,
                    expected,
                    actual,
                })
            }
        };
        for ma in &self.moving_averages {
            check(format!("moving average {}", ma.intervals), ma.len())?;
        }
        if let Some(s) = &self.daily_stochastics {
            check("daily stochastics".to_string(), s.len())?;
        }
        if let Some(s) = &self.weekly_stochastics {
            check("weekly stochastics".to_string(), s.len())?;
        }
        Ok(())
    }
}
