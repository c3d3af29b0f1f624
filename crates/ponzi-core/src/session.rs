//! Trading session (OHLCV bar) data structures.

use chrono::NaiveDateTime;

/// Where the closing value of a session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TradingSessionSource {
    /// Regular end-of-period close.
    #[default]
    Close,
    /// Previous day's close carried forward.
    PreviousClose,
    /// Live intraday sample; drawn in the highlight colour.
    IntradayRealTime,
    /// Delayed quote appended after the last historical bar.
    DelayedPrice,
}

impl TradingSessionSource {
    /// Short label used by cursor and legend text.
    pub fn label(&self) -> &'static str {
        match self {
            TradingSessionSource::Close => "Close",
            TradingSessionSource::PreviousClose => "Previous Close",
            TradingSessionSource::IntradayRealTime => "Real-Time",
            TradingSessionSource::DelayedPrice => "Delayed",
        }
    }
}

/// One trading session (CPU side).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradingSession {
    pub date: NaiveDateTime,
    pub open: f32,
    pub high: f32,
    pub low: f32,
    pub close: f32,
    pub volume: i64,
    /// `close - previous close`; zero for the first session.
    pub change: f32,
    /// `change / previous close`; zero for the first session.
    pub percent_change: f32,
    pub source: TradingSessionSource,
}

impl TradingSession {
    pub fn new(date: NaiveDateTime, open: f32, high: f32, low: f32, close: f32, volume: i64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            change: 0.0,
            percent_change: 0.0,
            source: TradingSessionSource::Close,
        }
    }

    pub fn with_source(mut self, source: TradingSessionSource) -> Self {
        self.source = source;
        self
    }

    /// True when every price field is zero, i.e. a placeholder with no trades.
    pub fn is_empty(&self) -> bool {
        self.open == 0.0 && self.high == 0.0 && self.low == 0.0 && self.close == 0.0
    }
}

/// Sessions ordered by strictly increasing date. Missing days stay missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradingSessionSeries {
    sessions: Vec<TradingSession>,
}

impl TradingSessionSeries {
    /// Build a series from sessions in any order.
    ///
    /// Sessions are sorted by date, later duplicates of a date replace
    /// earlier ones, and `change`/`percent_change` are recomputed.
    pub fn new(mut sessions: Vec<TradingSession>) -> Self {
        sessions.sort_by_key(|s| s.date);
        let mut deduped: Vec<TradingSession> = Vec::with_capacity(sessions.len());
        for s in sessions {
            match deduped.last_mut() {
                Some(last) if last.date == s.date => *last = s,
                _ => deduped.push(s),
            }
        }
        let mut series = Self { sessions: deduped };
        series.recompute_changes();
        series
    }

    /// Recompute day-over-day change for every session.
    pub fn recompute_changes(&mut self) {
        let mut prev_close: Option<f32> = None;
        for s in &mut self.sessions {
            match prev_close {
                Some(prev) => {
                    s.change = s.close - prev;
                    s.percent_change = if prev != 0.0 { s.change / prev } else { 0.0 };
                }
                None => {
                    s.change = 0.0;
                    s.percent_change = 0.0;
                }
            }
            prev_close = Some(s.close);
        }
    }

    /// Append a session newer than the last one. Older or equal dates are ignored.
    ///
    /// Returns whether the session was appended.
    pub fn push(&mut self, session: TradingSession) -> bool {
        if self.sessions.last().is_some_and(|last| last.date >= session.date) {
            return false;
        }
        self.sessions.push(session);
        self.recompute_changes();
        true
    }

    pub fn sessions(&self) -> &[TradingSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn first(&self) -> Option<&TradingSession> {
        self.sessions.first()
    }

    pub fn last(&self) -> Option<&TradingSession> {
        self.sessions.last()
    }

    pub fn get(&self, index: usize) -> Option<&TradingSession> {
        self.sessions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradingSession> {
        self.sessions.iter()
    }

    /// Mean volume across all sessions, zero when empty.
    pub fn average_volume(&self) -> f64 {
        if self.sessions.is_empty() {
            return 0.0;
        }
        let total: f64 = self.sessions.iter().map(|s| s.volume as f64).sum();
        total / self.sessions.len() as f64
    }

    /// Keep only the newest `count` sessions.
    pub fn truncate_front(&mut self, count: usize) {
        if self.sessions.len() > count {
            let drop = self.sessions.len() - count;
            self.sessions.drain(..drop);
            self.recompute_changes();
        }
    }
}

impl<'a> IntoIterator for &'a TradingSessionSeries {
    type Item = &'a TradingSession;
    type IntoIter = std::slice::Iter<'a, TradingSession>;

    fn into_iter(self) -> Self::IntoIter {
        self.sessions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 6, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn bar(d: u32, close: f32) -> TradingSession {
        TradingSession::new(day(d), close, close + 1.0, close - 1.0, close, 100)
    }

    #[test]
    fn test_changes_computed_on_ingest() {
        let series = TradingSessionSeries::new(vec![bar(3, 12.0), bar(1, 10.0), bar(2, 11.0)]);
        let s = series.sessions();
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].change, 0.0);
        assert_eq!(s[0].percent_change, 0.0);
        for i in 1..s.len() {
            let expected = s[i].close - s[i - 1].close;
            assert!((s[i].change - expected).abs() < 1e-6);
            assert!((s[i].percent_change - expected / s[i - 1].close).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sorted_strictly_increasing_and_deduped() {
        let series = TradingSessionSeries::new(vec![bar(2, 1.0), bar(1, 1.0), bar(2, 5.0)]);
        assert_eq!(series.len(), 2);
        assert!(series.sessions().windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(series.last().unwrap().close, 5.0);
    }

    #[test]
    fn test_push_rejects_older_dates() {
        let mut series = TradingSessionSeries::new(vec![bar(1, 10.0), bar(2, 11.0)]);
        assert!(!series.push(bar(2, 99.0)));
        assert!(series.push(bar(3, 12.1)));
        assert!((series.last().unwrap().change - 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_average_volume() {
        let mut a = bar(1, 1.0);
        a.volume = 100;
        let mut b = bar(2, 1.0);
        b.volume = 300;
        let series = TradingSessionSeries::new(vec![a, b]);
        assert_eq!(series.average_volume(), 200.0);
        assert_eq!(TradingSessionSeries::default().average_volume(), 0.0);
    }

    #[test]
    fn test_truncate_front_resets_first_change() {
        let mut series = TradingSessionSeries::new(vec![bar(1, 10.0), bar(2, 11.0), bar(3, 12.0)]);
        series.truncate_front(2);
        assert_eq!(series.len(), 2);
        assert_eq!(series.first().unwrap().change, 0.0);
    }
}
