//! Latest-price quote.

use chrono::NaiveDateTime;

use crate::session::{TradingSession, TradingSessionSource};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quote {
    pub company_name: String,
    pub latest_price: f32,
    pub latest_source: TradingSessionSource,
    pub latest_update: Option<NaiveDateTime>,
    pub change: f32,
    /// Ratio, e.g. `0.01` for one percent.
    pub change_percent: f32,
    pub open: f32,
    pub high: f32,
    pub low: f32,
    pub volume: i64,
}

impl Quote {
    /// Session built from the quote, used to extend a daily history with
    /// today's delayed price. `None` when the quote has no timestamp.
    pub fn to_session(&self) -> Option<TradingSession> {
        let date = self.latest_update?;
        Some(
            TradingSession::new(date, self.open, self.high, self.low, self.latest_price, self.volume)
                .with_source(self.latest_source),
        )
    }
}
