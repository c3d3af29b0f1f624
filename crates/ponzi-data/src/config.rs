//! Configuration for the market data client.

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::Backoff;

/// Default provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Configuration for [`DataClient`](crate::DataClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Provider API token, sent as `apikey`.
    pub api_token: String,
    /// Full URL of the query endpoint.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Minimum spacing between outbound requests.
    pub min_request_interval: Duration,
    /// Retry schedule for throttled requests.
    pub backoff: Backoff,
    /// Root directory for the response cache; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// Tee every provider body into `debug-*.txt` files.
    pub dump_responses: bool,
    /// Where response dumps are written.
    pub dump_dir: PathBuf,
    /// Serve embedded canned responses instead of calling the provider.
    pub demo: bool,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            min_request_interval: Duration::from_secs(1),
            backoff: Backoff::default(),
            cache_dir: None,
            dump_responses: false,
            dump_dir: PathBuf::from("."),
            demo: false,
            user_agent: format!("ponzi2/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with an API token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            ..Default::default()
        }
    }

    /// Configuration serving embedded data only.
    pub fn demo() -> Self {
        Self {
            demo: true,
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_dump_responses(mut self, dump: bool, dir: impl Into<PathBuf>) -> Self {
        self.dump_responses = dump;
        self.dump_dir = dir.into();
        self
    }

    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }
}
