//! Client behaviour against a scripted transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ponzi_core::{Interval, Range, Symbol};
use ponzi_data::{
    demo, ApiRequest, Backoff, ClientConfig, DataClient, Error, TokioClock, Transport,
};
use tokio::time::Instant;

const THROTTLED: &str = r#"{"Information": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#;
const MALFORMED: &str = r#"{"Time Series (Daily)": {"BADDATE": {"1. open":"x"}}}"#;

/// Replays queued bodies, then falls back to the embedded demo data.
#[derive(Default)]
struct ScriptedTransport {
    queued: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(Vec<(String, String)>, Instant)>>,
}

impl ScriptedTransport {
    fn with_queue(bodies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            queued: Mutex::new(bodies.iter().map(|b| b.to_string()).collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }

    fn demo_body(query: &[(String, String)]) -> String {
        let get = |name: &str| {
            query
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };
        let symbol = Symbol::parse(&get("symbol")).unwrap();
        let request = match get("function").as_str() {
            "TIME_SERIES_DAILY" => ApiRequest::time_series_daily(&symbol),
            "TIME_SERIES_INTRADAY" => ApiRequest::time_series_intraday(&symbol),
            "SMA" => ApiRequest::sma(&symbol, Interval::Daily, get("time_period").parse().unwrap()),
            "STOCH" if get("interval") == "weekly" => ApiRequest::stoch(&symbol, Interval::Weekly),
            "STOCH" => ApiRequest::stoch(&symbol, Interval::Daily),
            _ => ApiRequest::global_quote(&symbol),
        };
        demo::response(&request).unwrap().to_string()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, _url: &str, query: &[(String, String)]) -> ponzi_data::Result<String> {
        self.calls.lock().unwrap().push((query.to_vec(), Instant::now()));
        let queued = self.queued.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| Self::demo_body(query)))
    }
}

fn client(transport: Arc<ScriptedTransport>, config: ClientConfig) -> DataClient {
    DataClient::with_transport(config, transport, Arc::new(TokioClock))
}

fn spy() -> Symbol {
    Symbol::parse("SPY").unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_throttled_twice_then_data() {
    let transport = ScriptedTransport::with_queue(&[THROTTLED, THROTTLED]);
    let client = client(transport.clone(), ClientConfig::new("TOKEN"));

    let start = Instant::now();
    let history = client.get_history(&spy(), Range::OneYear).await.unwrap();

    assert!(!history.is_empty());
    assert_eq!(transport.call_count(), 3);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
    assert!(elapsed <= Duration::from_secs(7), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_chart_retries_only_the_throttled_requests() {
    let transport = ScriptedTransport::with_queue(&[THROTTLED, THROTTLED]);
    let client = client(transport.clone(), ClientConfig::new("TOKEN"));

    let start = Instant::now();
    let data = client.get_chart_data(&spy(), Range::OneYear).await.unwrap();
    data.validate().unwrap();

    // Seven endpoints plus one repeat for each throttled answer.
    assert_eq!(transport.call_count(), 9);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(8), "elapsed {elapsed:?}");
    assert!(elapsed <= Duration::from_secs(13), "elapsed {elapsed:?}");

    let mut times = transport.call_times();
    times.sort();
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_secs(1));
    }
}

#[tokio::test(start_paused = true)]
async fn test_throttle_gives_up_after_backoff_budget() {
    let transport = ScriptedTransport::with_queue(&[THROTTLED, THROTTLED, THROTTLED]);
    let backoff = Backoff {
        max_attempts: 2,
        ..Backoff::default()
    };
    let client = client(transport.clone(), ClientConfig::new("TOKEN").with_backoff(backoff));

    let err = client.get_quote(&spy()).await.unwrap_err();
    assert!(matches!(err, Error::Throttled(_)), "{err}");
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_malformed_series_is_decode_error() {
    let transport = ScriptedTransport::with_queue(&[MALFORMED]);
    let client = client(transport.clone(), ClientConfig::new("TOKEN"));

    let err = client.get_history(&spy(), Range::OneYear).await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "{err}");
    assert!(!err.is_retriable());

    // A second attempt issues a fresh request.
    client.get_history(&spy(), Range::OneYear).await.unwrap();
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_requests_are_spaced_by_rate_gate() {
    let transport = ScriptedTransport::with_queue(&[]);
    let client = client(transport.clone(), ClientConfig::new("TOKEN"));

    let data = client.get_chart_data(&spy(), Range::OneYear).await.unwrap();
    data.validate().unwrap();

    let times = transport.call_times();
    assert_eq!(times.len(), 7);
    let mut sorted = times.clone();
    sorted.sort();
    for pair in sorted.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_secs(1));
    }
}

#[tokio::test]
async fn test_query_carries_token_and_symbol() {
    let transport = ScriptedTransport::with_queue(&[]);
    let client = client(
        transport.clone(),
        ClientConfig::new("SECRET").with_min_request_interval(Duration::ZERO),
    );
    client.get_quote(&spy()).await.unwrap();

    let calls = transport.calls.lock().unwrap();
    let query = &calls[0].0;
    assert!(query.contains(&("function".to_string(), "GLOBAL_QUOTE".to_string())));
    assert!(query.contains(&("symbol".to_string(), "SPY".to_string())));
    assert!(query.contains(&("apikey".to_string(), "SECRET".to_string())));
}

#[tokio::test]
async fn test_cache_serves_second_client() {
    let tmp = tempfile::tempdir().unwrap();
    let config = ClientConfig::new("TOKEN")
        .with_min_request_interval(Duration::ZERO)
        .with_cache_dir(tmp.path());

    let first = ScriptedTransport::with_queue(&[]);
    let a = client(first.clone(), config.clone())
        .get_moving_average(&spy(), 50)
        .await
        .unwrap();
    assert_eq!(first.call_count(), 1);

    let second = ScriptedTransport::with_queue(&[]);
    let b = client(second.clone(), config)
        .get_moving_average(&spy(), 50)
        .await
        .unwrap();
    assert_eq!(second.call_count(), 0);
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_throttle_notice_not_cached() {
    let tmp = tempfile::tempdir().unwrap();
    let config = ClientConfig::new("TOKEN")
        .with_min_request_interval(Duration::ZERO)
        .with_backoff(Backoff {
            max_attempts: 1,
            ..Backoff::default()
        })
        .with_cache_dir(tmp.path());
    let transport = ScriptedTransport::with_queue(&[THROTTLED]);
    let client = client(transport.clone(), config);

    let err = client.get_history(&spy(), Range::OneYear).await.unwrap_err();
    assert!(matches!(err, Error::Throttled(_)));
    client.get_history(&spy(), Range::OneYear).await.unwrap();
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_dump_writes_debug_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = ClientConfig::new("TOKEN")
        .with_min_request_interval(Duration::ZERO)
        .with_dump_responses(true, tmp.path());
    let transport = ScriptedTransport::with_queue(&[]);
    client(transport, config).get_quote(&spy()).await.unwrap();

    let dumped = std::fs::read_to_string(tmp.path().join("debug-GLOBAL_QUOTE-SPY.txt")).unwrap();
    assert!(dumped.contains("Global Quote"));
}

#[tokio::test]
async fn test_demo_mode_skips_transport() {
    let transport = ScriptedTransport::with_queue(&[]);
    let client = client(transport.clone(), ClientConfig::demo());
    client.get_chart_data(&spy(), Range::OneDay).await.unwrap();
    assert_eq!(transport.call_count(), 0);
}
