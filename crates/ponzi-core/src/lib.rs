//! Core types for ponzi2.
//!
//! This crate holds the market data model shared by every other crate and
//! the pixel rectangle algebra used for layout. It performs no I/O:
//! - `TradingSession` / `TradingSessionSeries` - daily or intraday OHLCV bars
//! - `AverageSeries` / `StochasticSeries` - indicator series aligned to sessions
//! - `Quote` - latest price snapshot
//! - `ChartData` - everything a chart needs for one symbol
//! - `Rect` / `Point` - window coordinates with a bottom-left origin

pub mod chart_data;
pub mod error;
pub mod geom;
pub mod indicator;
pub mod quote;
pub mod session;
pub mod symbol;

pub use chart_data::{ChartData, PriceStyle, Range};
pub use error::ModelError;
pub use geom::{Point, Rect};
pub use indicator::{AverageKind, AverageSeries, AverageValue, Interval, StochasticSeries, StochasticValue};
pub use quote::Quote;
pub use session::{TradingSession, TradingSessionSeries, TradingSessionSource};
pub use symbol::Symbol;
