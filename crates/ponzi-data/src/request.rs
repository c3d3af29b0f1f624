//! Provider request descriptions.

use std::fmt;

use ponzi_core::{Interval, Symbol};

/// Provider operations used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    TimeSeriesDaily,
    TimeSeriesIntraday,
    Sma,
    Stoch,
    GlobalQuote,
}

impl Function {
    pub fn as_str(&self) -> &'static str {
        match self {
            Function::TimeSeriesDaily => "TIME_SERIES_DAILY",
            Function::TimeSeriesIntraday => "TIME_SERIES_INTRADAY",
            Function::Sma => "SMA",
            Function::Stoch => "STOCH",
            Function::GlobalQuote => "GLOBAL_QUOTE",
        }
    }

    /// Whether responses for this operation may be served from disk.
    /// Quotes and intraday bars go stale within minutes.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Function::TimeSeriesDaily | Function::Sma | Function::Stoch)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One provider call: operation, symbol and the extra query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub function: Function,
    pub symbol: Symbol,
    pub params: Vec<(&'static str, String)>,
}

impl ApiRequest {
    pub fn time_series_daily(symbol: &Symbol) -> Self {
        Self::new(
            Function::TimeSeriesDaily,
            symbol,
            vec![("outputsize", "compact".into()), ("datatype", "json".into())],
        )
    }

    pub fn time_series_intraday(symbol: &Symbol) -> Self {
        Self::new(
            Function::TimeSeriesIntraday,
            symbol,
            vec![
                ("interval", "5min".into()),
                ("outputsize", "compact".into()),
                ("datatype", "json".into()),
            ],
        )
    }

    pub fn sma(symbol: &Symbol, interval: Interval, time_period: u32) -> Self {
        Self::new(
            Function::Sma,
            symbol,
            vec![
                ("interval", interval.as_param().into()),
                ("time_period", time_period.to_string()),
                ("series_type", "close".into()),
            ],
        )
    }

    pub fn stoch(symbol: &Symbol, interval: Interval) -> Self {
        Self::new(
            Function::Stoch,
            symbol,
            vec![
                ("interval", interval.as_param().into()),
                ("fastkperiod", "14".into()),
                ("slowkperiod", "3".into()),
                ("slowdperiod", "3".into()),
            ],
        )
    }

    pub fn global_quote(symbol: &Symbol) -> Self {
        Self::new(Function::GlobalQuote, symbol, Vec::new())
    }

    fn new(function: Function, symbol: &Symbol, params: Vec<(&'static str, String)>) -> Self {
        Self {
            function,
            symbol: symbol.clone(),
            params,
        }
    }

    /// Look up a parameter value by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Full query string pairs, including the API key.
    pub fn query(&self, api_key: &str) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(self.params.len() + 3);
        query.push(("function".to_string(), self.function.as_str().to_string()));
        query.push(("symbol".to_string(), self.symbol.to_string()));
        for (k, v) in &self.params {
            query.push((k.to_string(), v.clone()));
        }
        query.push(("apikey".to_string(), api_key.to_string()));
        query
    }

    /// Stable key `<function>-<symbol>-<param values...>` used for cache and
    /// dump file names.
    pub fn key(&self) -> String {
        let mut key = format!("{}-{}", self.function, self.symbol);
        for (_, v) in &self.params {
            key.push('-');
            key.push_str(v);
        }
        key.chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
            .collect()
    }

    /// Short label for logs and error contexts.
    pub fn describe(&self) -> String {
        format!("{} {}", self.function, self.symbol)
    }
}
