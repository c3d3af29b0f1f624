//! # ponzi-data
//!
//! Client for the Alpha Vantage query API, feeding the chart model.
//!
//! ## Features
//!
//! - **Rate limiting**: one shared gate spaces every outbound request
//! - **Throttle detection**: provider notices surface as a retriable error
//! - **Disk cache**: daily history and indicators can be served from disk
//! - **Demo mode**: embedded canned responses, no network or token needed
//! - **Response dumps**: raw bodies teed to `debug-*.txt` files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ponzi_core::{Range, Symbol};
//! use ponzi_data::{ClientConfig, DataClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ponzi_data::Error> {
//!     let client = DataClient::new(ClientConfig::new("TOKEN"))?;
//!     let spy = Symbol::parse("SPY")?;
//!     let chart = client.get_chart_data(&spy, Range::OneYear).await?;
//!     println!("{} sessions", chart.trading_sessions.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod rate_limit;
pub mod request;
pub mod retry;
pub mod transport;
pub mod wire;

pub use cache::DiskCache;
pub use client::{DataClient, MOVING_AVERAGE_PERIODS, ONE_YEAR_SESSIONS};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use rate_limit::{Clock, RateLimiter, TokioClock};
pub use request::{ApiRequest, Function};
pub use retry::{retry_throttled, Backoff};
pub use transport::{HttpTransport, Transport};
pub use wire::ApiResponse;
