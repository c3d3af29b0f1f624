//! Canned provider responses served in demo mode.
//!
//! Every symbol gets the same data; the bodies go through the normal
//! decode path so demo mode exercises the real parsers.

use crate::error::{Error, Result};
use crate::request::{ApiRequest, Function};

const DAILY: &str = include_str!("../data/demo/time_series_daily.json");
const INTRADAY: &str = include_str!("../data/demo/time_series_intraday.json");
const SMA_25: &str = include_str!("../data/demo/sma_25.json");
const SMA_50: &str = include_str!("../data/demo/sma_50.json");
const SMA_200: &str = include_str!("../data/demo/sma_200.json");
const STOCH_DAILY: &str = include_str!("../data/demo/stoch_daily.json");
const STOCH_WEEKLY: &str = include_str!("../data/demo/stoch_weekly.json");
const GLOBAL_QUOTE: &str = include_str!("../data/demo/global_quote.json");

/// Embedded body answering `request`.
pub fn response(request: &ApiRequest) -> Result<&'static str> {
    let body = match request.function {
        Function::TimeSeriesDaily => DAILY,
        Function::TimeSeriesIntraday => INTRADAY,
        Function::GlobalQuote => GLOBAL_QUOTE,
        Function::Sma => match request.param("time_period") {
            Some("25") => SMA_25,
            Some("50") => SMA_50,
            Some("200") => SMA_200,
            other => {
                return Err(Error::BadInput(format!(
                    "no demo data for SMA period {}",
                    other.unwrap_or("<none>")
                )))
            }
        },
        Function::Stoch => match request.param("interval") {
            Some("weekly") => STOCH_WEEKLY,
            _ => STOCH_DAILY,
        },
    };
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{self, SmaResponse, TimeSeriesResponse};
    use ponzi_core::{Interval, Symbol};

    #[test]
    fn test_demo_bodies_decode() {
        let sym = Symbol::parse("ANY").unwrap();
        let daily: TimeSeriesResponse =
            wire::decode("demo", response(&ApiRequest::time_series_daily(&sym)).unwrap()).unwrap();
        assert!(daily.into_sessions("demo").unwrap().len() > 200);

        let sma: SmaResponse =
            wire::decode("demo", response(&ApiRequest::sma(&sym, Interval::Daily, 200)).unwrap()).unwrap();
        assert!(!sma.into_series("demo", 200).unwrap().is_empty());

        assert!(response(&ApiRequest::sma(&sym, Interval::Daily, 7)).is_err());
    }
}
