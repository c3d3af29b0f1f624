//! Provider JSON shapes and their conversion into model types.
//!
//! Every response is first checked for the provider's status envelope
//! (`Information`, `Note`, `Error Message`) before the typed decode runs.
//! Series objects are keyed by date string and arrive unordered; the
//! conversions sort ascending.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use ponzi_core::{
    AverageKind, AverageSeries, AverageValue, Interval, Quote, StochasticSeries, StochasticValue,
    TradingSession, TradingSessionSeries, TradingSessionSource,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Outcome of a provider call once the status envelope has been checked.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Data(T),
    /// The provider returned a rate-limit notice instead of data.
    Throttled(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

/// Check the status envelope of `body` and decode it as `T`.
pub fn parse_response<T: DeserializeOwned>(context: &str, body: &str) -> Result<ApiResponse<T>> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| Error::decode(context, e))?;
    if let Some(message) = envelope.error_message {
        return Err(Error::decode(context, message));
    }
    if let Some(message) = envelope.information.or(envelope.note) {
        return Ok(ApiResponse::Throttled(message));
    }
    let data = serde_json::from_str(body).map_err(|e| Error::decode(context, e))?;
    Ok(ApiResponse::Data(data))
}

/// Like [`parse_response`] but folds a throttle notice into [`Error::Throttled`].
pub fn decode<T: DeserializeOwned>(context: &str, body: &str) -> Result<T> {
    match parse_response(context, body)? {
        ApiResponse::Data(data) => Ok(data),
        ApiResponse::Throttled(message) => Err(Error::Throttled(message)),
    }
}

#[derive(Debug, Deserialize)]
pub struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)", alias = "Time Series (5min)")]
    pub series: HashMap<String, Bar>,
}

#[derive(Debug, Deserialize)]
pub struct Bar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

#[derive(Debug, Deserialize)]
pub struct SmaResponse {
    #[serde(rename = "Technical Analysis: SMA")]
    pub values: HashMap<String, SmaValue>,
}

#[derive(Debug, Deserialize)]
pub struct SmaValue {
    #[serde(rename = "SMA")]
    pub sma: String,
}

#[derive(Debug, Deserialize)]
pub struct StochResponse {
    #[serde(rename = "Technical Analysis: STOCH")]
    pub values: HashMap<String, StochValue>,
}

#[derive(Debug, Deserialize)]
pub struct StochValue {
    #[serde(rename = "SlowK")]
    pub slow_k: String,
    #[serde(rename = "SlowD")]
    pub slow_d: String,
}

#[derive(Debug, Deserialize)]
pub struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    pub quote: GlobalQuote,
}

#[derive(Debug, Deserialize)]
pub struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    pub symbol: String,
    #[serde(rename = "02. open")]
    pub open: String,
    #[serde(rename = "03. high")]
    pub high: String,
    #[serde(rename = "04. low")]
    pub low: String,
    #[serde(rename = "05. price")]
    pub price: String,
    #[serde(rename = "06. volume")]
    pub volume: String,
    #[serde(rename = "07. latest trading day")]
    pub latest_trading_day: String,
    #[serde(rename = "08. previous close")]
    pub previous_close: String,
    #[serde(rename = "09. change")]
    pub change: String,
    #[serde(rename = "10. change percent")]
    pub change_percent: String,
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD HH:MM:SS`.
pub fn parse_date(context: &str, s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|e| Error::decode(context, format!("bad date {s:?}: {e}")))
}

fn parse_f32(context: &str, field: &str, s: &str) -> Result<f32> {
    s.trim()
        .parse::<f32>()
        .map_err(|e| Error::decode(context, format!("bad {field} {s:?}: {e}")))
}

fn parse_i64(context: &str, field: &str, s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .map_err(|e| Error::decode(context, format!("bad {field} {s:?}: {e}")))
}

/// `"1.2345%"` to `0.012345`.
fn parse_percent(context: &str, s: &str) -> Result<f32> {
    let trimmed = s.trim().trim_end_matches('%');
    parse_f32(context, "percent", trimmed).map(|p| p / 100.0)
}

impl TimeSeriesResponse {
    pub fn into_sessions(self, context: &str) -> Result<TradingSessionSeries> {
        let sessions = self
            .series
            .into_iter()
            .map(|(date, bar)| {
                Ok(TradingSession::new(
                    parse_date(context, &date)?,
                    parse_f32(context, "open", &bar.open)?,
                    parse_f32(context, "high", &bar.high)?,
                    parse_f32(context, "low", &bar.low)?,
                    parse_f32(context, "close", &bar.close)?,
                    parse_i64(context, "volume", &bar.volume)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TradingSessionSeries::new(sessions))
    }
}

impl SmaResponse {
    pub fn into_series(self, context: &str, intervals: u32) -> Result<AverageSeries> {
        let values = self
            .values
            .into_iter()
            .map(|(date, v)| {
                Ok(AverageValue {
                    date: parse_date(context, &date)?,
                    value: parse_f32(context, "SMA", &v.sma)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(AverageSeries::new(AverageKind::Simple, intervals, values))
    }
}

impl StochResponse {
    /// Provider values are percentages; the model stores ratios in `[0, 1]`.
    pub fn into_series(self, context: &str, interval: Interval) -> Result<StochasticSeries> {
        let values = self
            .values
            .into_iter()
            .map(|(date, v)| {
                Ok(StochasticValue {
                    date: parse_date(context, &date)?,
                    k: parse_f32(context, "SlowK", &v.slow_k)? / 100.0,
                    d: parse_f32(context, "SlowD", &v.slow_d)? / 100.0,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(StochasticSeries::new(interval, values))
    }
}

impl GlobalQuote {
    pub fn into_quote(self, context: &str) -> Result<Quote> {
        Ok(Quote {
            company_name: String::new(),
            latest_price: parse_f32(context, "price", &self.price)?,
            latest_source: TradingSessionSource::DelayedPrice,
            latest_update: Some(parse_date(context, &self.latest_trading_day)?),
            change: parse_f32(context, "change", &self.change)?,
            change_percent: parse_percent(context, &self.change_percent)?,
            open: parse_f32(context, "open", &self.open)?,
            high: parse_f32(context, "high", &self.high)?,
            low: parse_f32(context, "low", &self.low)?,
            volume: parse_i64(context, "volume", &self.volume)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAILY: &str = r#"{
        "Meta Data": {"2. Symbol": "SPY"},
        "Time Series (Daily)": {
            "2024-01-03": {"1. open": "11", "2. high": "13", "3. low": "10", "4. close": "12", "5. volume": "200"},
            "2024-01-02": {"1. open": "10", "2. high": "12", "3. low": "9", "4. close": "11", "5. volume": "100"}
        }
    }"#;

    #[test]
    fn test_daily_sorted_ascending() {
        let resp: TimeSeriesResponse = decode("daily", DAILY).unwrap();
        let series = resp.into_sessions("daily").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first().unwrap().close, 11.0);
        assert_eq!(series.last().unwrap().close, 12.0);
        assert_eq!(series.last().unwrap().volume, 200);
    }

    #[test]
    fn test_intraday_key_accepted() {
        let body = r#"{"Time Series (5min)": {
            "2024-01-02 09:35:00": {"1. open": "1", "2. high": "2", "3. low": "1", "4. close": "2", "5. volume": "5"}
        }}"#;
        let resp: TimeSeriesResponse = decode("intraday", body).unwrap();
        let series = resp.into_sessions("intraday").unwrap();
        assert_eq!(series.first().unwrap().date.format("%H:%M").to_string(), "09:35");
    }

    #[test]
    fn test_throttle_notice_detected() {
        let body = r#"{"Information": "Thank you for using Alpha Vantage! Please slow down."}"#;
        let resp = parse_response::<TimeSeriesResponse>("daily", body).unwrap();
        assert!(matches!(resp, ApiResponse::Throttled(_)));
        let err = decode::<TimeSeriesResponse>("daily", body).unwrap_err();
        assert!(err.is_retriable());

        let note = r#"{"Note": "Our standard API call frequency is 5 calls per minute."}"#;
        assert!(matches!(
            parse_response::<SmaResponse>("sma", note).unwrap(),
            ApiResponse::Throttled(_)
        ));
    }

    #[test]
    fn test_error_message_is_decode_error() {
        let body = r#"{"Error Message": "Invalid API call."}"#;
        let err = decode::<TimeSeriesResponse>("daily", body).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_bad_date_is_decode_error() {
        let body = r#"{"Time Series (Daily)": {"BADDATE": {"1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "1"}}}"#;
        let resp: TimeSeriesResponse = decode("daily", body).unwrap();
        assert!(matches!(resp.into_sessions("daily"), Err(Error::Decode { .. })));
    }

    #[test]
    fn test_stochastics_scaled_to_ratio() {
        let body = r#"{"Technical Analysis: STOCH": {"2024-01-02": {"SlowK": "80.0", "SlowD": "50.0"}}}"#;
        let resp: StochResponse = decode("stoch", body).unwrap();
        let series = resp.into_series("stoch", Interval::Weekly).unwrap();
        assert_eq!(series.values[0].k, 0.8);
        assert_eq!(series.values[0].d, 0.5);
    }

    #[test]
    fn test_global_quote() {
        let body = r#"{"Global Quote": {
            "01. symbol": "SPY", "02. open": "470.0", "03. high": "475.0", "04. low": "469.0",
            "05. price": "474.0", "06. volume": "1000", "07. latest trading day": "2024-01-04",
            "08. previous close": "470.0", "09. change": "4.0", "10. change percent": "0.8511%"
        }}"#;
        let resp: GlobalQuoteResponse = decode("quote", body).unwrap();
        let quote = resp.quote.into_quote("quote").unwrap();
        assert_eq!(quote.latest_price, 474.0);
        assert!((quote.change_percent - 0.008511).abs() < 1e-6);
        assert_eq!(quote.latest_source, TradingSessionSource::DelayedPrice);
        assert!(quote.company_name.is_empty());
    }
}
