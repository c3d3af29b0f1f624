//! Market data client.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ponzi_core::{
    AverageSeries, ChartData, Interval, Quote, Range, StochasticSeries, Symbol,
    TradingSessionSeries, TradingSessionSource,
};
use serde::de::DeserializeOwned;

use crate::cache::DiskCache;
use crate::config::ClientConfig;
use crate::demo;
use crate::error::Result;
use crate::rate_limit::{Clock, RateLimiter, TokioClock};
use crate::request::ApiRequest;
use crate::retry::retry_throttled;
use crate::transport::{HttpTransport, Transport};
use crate::wire::{self, GlobalQuoteResponse, SmaResponse, StochResponse, TimeSeriesResponse};

/// Moving averages requested for a one-year chart.
pub const MOVING_AVERAGE_PERIODS: [u32; 3] = [25, 50, 200];

/// Sessions kept for a one-year chart.
pub const ONE_YEAR_SESSIONS: usize = 252;

/// Client for the Alpha Vantage query API.
///
/// Cheap to clone; clones share the rate limiter and transport.
#[derive(Clone)]
pub struct DataClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    rate_limiter: RateLimiter,
    cache: Option<DiskCache>,
}

impl fmt::Debug for DataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataClient")
            .field("base_url", &self.config.base_url)
            .field("demo", &self.config.demo)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl DataClient {
    /// Create a client talking HTTP to the configured endpoint.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport), Arc::new(TokioClock)))
    }

    /// Create a client over an arbitrary transport and clock.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        let rate_limiter = RateLimiter::with_clock(config.min_request_interval, clock);
        let cache = config.cache_dir.as_ref().map(DiskCache::new);
        Self {
            config: Arc::new(config),
            transport,
            rate_limiter,
            cache,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Price history for `range`: 5-minute bars for one day, daily sessions
    /// otherwise. Sorted oldest first.
    pub async fn get_history(&self, symbol: &Symbol, range: Range) -> Result<TradingSessionSeries> {
        match range {
            Range::OneDay => {
                let request = ApiRequest::time_series_intraday(symbol);
                let series = self
                    .fetch(&request, |resp: TimeSeriesResponse, ctx| resp.into_sessions(ctx))
                    .await?;
                Ok(mark_latest_real_time(series))
            }
            Range::OneYear => {
                let request = ApiRequest::time_series_daily(symbol);
                self.fetch(&request, |resp: TimeSeriesResponse, ctx| resp.into_sessions(ctx))
                    .await
            }
        }
    }

    /// Daily simple moving average over `intervals` sessions.
    pub async fn get_moving_average(&self, symbol: &Symbol, intervals: u32) -> Result<AverageSeries> {
        let request = ApiRequest::sma(symbol, Interval::Daily, intervals);
        self.fetch(&request, |resp: SmaResponse, ctx| resp.into_series(ctx, intervals))
            .await
    }

    /// Slow stochastic oscillator, values in `[0, 1]`.
    pub async fn get_stochastics(&self, symbol: &Symbol, interval: Interval) -> Result<StochasticSeries> {
        let request = ApiRequest::stoch(symbol, interval);
        self.fetch(&request, |resp: StochResponse, ctx| resp.into_series(ctx, interval))
            .await
    }

    pub async fn get_quote(&self, symbol: &Symbol) -> Result<Quote> {
        let request = ApiRequest::global_quote(symbol);
        self.fetch(&request, |resp: GlobalQuoteResponse, ctx| resp.quote.into_quote(ctx))
            .await
    }

    /// Quotes for several symbols. Fails on the first error.
    pub async fn get_quotes(&self, symbols: &[Symbol]) -> Result<HashMap<Symbol, Quote>> {
        let mut quotes = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            let quote = self.get_quote(symbol).await?;
            quotes.insert(symbol.clone(), quote);
        }
        Ok(quotes)
    }

    /// Everything a chart needs for `symbol`, with indicators aligned to the
    /// sessions. The requests run concurrently behind the shared rate gate;
    /// a throttled request is retried on its own.
    pub async fn get_chart_data(&self, symbol: &Symbol, range: Range) -> Result<ChartData> {
        log::info!("loading {symbol} {}", range.label());
        match range {
            Range::OneDay => {
                let (history, quote) =
                    tokio::try_join!(self.get_history(symbol, range), self.get_quote(symbol))?;
                let mut data = ChartData::new(symbol.clone(), range, history);
                data.quote = Some(quote);
                Ok(data)
            }
            Range::OneYear => {
                let [short, medium, long] = MOVING_AVERAGE_PERIODS;
                let (mut history, ma_short, ma_medium, ma_long, daily, weekly, quote) = tokio::try_join!(
                    self.get_history(symbol, range),
                    self.get_moving_average(symbol, short),
                    self.get_moving_average(symbol, medium),
                    self.get_moving_average(symbol, long),
                    self.get_stochastics(symbol, Interval::Daily),
                    self.get_stochastics(symbol, Interval::Weekly),
                    self.get_quote(symbol),
                )?;

                history.truncate_front(ONE_YEAR_SESSIONS);
                if let Some(session) = quote.to_session() {
                    if history.push(session) {
                        log::debug!("{symbol}: appended delayed quote session");
                    }
                }

                let mut data = ChartData::new(symbol.clone(), range, history);
                data.moving_averages = [ma_short, ma_medium, ma_long]
                    .iter()
                    .map(|ma| ma.aligned_to(&data.trading_sessions))
                    .collect();
                data.daily_stochastics = Some(daily.aligned_to(&data.trading_sessions));
                data.weekly_stochastics = Some(weekly.aligned_to(&data.trading_sessions));
                data.quote = Some(quote);
                data.validate()?;
                Ok(data)
            }
        }
    }

    /// Resolve `request` through demo data, the cache or the network, then
    /// decode it as `T` and convert with `convert`.
    async fn fetch<T, R, F>(&self, request: &ApiRequest, convert: F) -> Result<R>
    where
        T: DeserializeOwned,
        F: Fn(T, &str) -> Result<R>,
    {
        let context = request.describe();

        if self.config.demo {
            let body = demo::response(request)?;
            return convert(wire::decode(&context, body)?, &context);
        }

        let cache = self.cache.as_ref().filter(|_| request.function.is_cacheable());
        if let Some(cache) = cache {
            if let Some(body) = cache.read(request).await {
                match wire::decode(&context, &body).and_then(|data| convert(data, &context)) {
                    Ok(value) => return Ok(value),
                    Err(e) => {
                        log::warn!("discarding cached {context}: {e}");
                        cache.remove(request).await;
                    }
                }
            }
        }

        let (convert, context) = (&convert, context.as_str());
        let (value, body) = retry_throttled(&self.config.backoff, move || async move {
            let body = self.request_body(request, context).await?;
            let value = convert(wire::decode(context, &body)?, context)?;
            Ok((value, body))
        })
        .await?;

        if let Some(cache) = cache {
            if let Err(e) = cache.write(request, &body).await {
                log::warn!("failed to cache {context}: {e}");
            }
        }
        Ok(value)
    }

    /// One trip through the rate gate and the transport.
    async fn request_body(&self, request: &ApiRequest, context: &str) -> Result<String> {
        self.rate_limiter.acquire().await;
        tracing::debug!("requesting {context}");
        let body = self
            .transport
            .get(&self.config.base_url, &request.query(&self.config.api_token))
            .await?;
        if self.config.dump_responses {
            self.dump(request, &body).await;
        }
        Ok(body)
    }

    async fn dump(&self, request: &ApiRequest, body: &str) {
        let path = self.config.dump_dir.join(format!("debug-{}.txt", request.key()));
        match tokio::fs::write(&path, body).await {
            Ok(()) => log::debug!("dumped response to {}", path.display()),
            Err(e) => log::warn!("failed to dump response to {}: {e}", path.display()),
        }
    }
}

/// The newest intraday bar is still forming.
fn mark_latest_real_time(series: TradingSessionSeries) -> TradingSessionSeries {
    let mut sessions = series.sessions().to_vec();
    if let Some(last) = sessions.last_mut() {
        last.source = TradingSessionSource::IntradayRealTime;
    }
    TradingSessionSeries::new(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_demo_one_year_chart() {
        let client = DataClient::new(ClientConfig::demo()).unwrap();
        let data = client.get_chart_data(&sym("SPY"), Range::OneYear).await.unwrap();

        assert_eq!(data.symbol, sym("SPY"));
        // One year of daily sessions plus the delayed quote session.
        assert_eq!(data.trading_sessions.len(), ONE_YEAR_SESSIONS + 1);
        let last = data.trading_sessions.last().unwrap();
        assert_eq!(last.source, TradingSessionSource::DelayedPrice);

        assert_eq!(data.moving_averages.len(), 3);
        for ma in &data.moving_averages {
            assert_eq!(ma.len(), data.trading_sessions.len());
        }
        assert!(data.daily_stochastics.is_some());
        assert!(data.weekly_stochastics.is_some());
        assert!(data.average_volume > 0.0);
        data.validate().unwrap();
    }

    #[tokio::test]
    async fn test_demo_one_day_chart() {
        let client = DataClient::new(ClientConfig::demo()).unwrap();
        let data = client.get_chart_data(&sym("QQQ"), Range::OneDay).await.unwrap();

        assert!(data.moving_averages.is_empty());
        assert!(data.daily_stochastics.is_none());
        let last = data.trading_sessions.last().unwrap();
        assert_eq!(last.source, TradingSessionSource::IntradayRealTime);
        assert_eq!(data.trading_sessions.first().unwrap().source, TradingSessionSource::Close);
    }
}
