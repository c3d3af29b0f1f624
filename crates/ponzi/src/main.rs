//! ponzi2 - desktop stock chart viewer.

mod animation;
mod app;
mod controller;
mod events;
mod frame_loop;
mod icon;
mod input;
mod state;
mod view;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use ponzi_config::{Config, PreferencesStore};
use ponzi_data::{ClientConfig, DataClient};
use winit::event_loop::{ControlFlow, EventLoop};

use app::{proxy_waker, App, AppWake};
use controller::Controller;

const DEFAULT_LOG_FILTER: &str =
    "warn,ponzi2=info,ponzi_core=info,ponzi_render=info,ponzi_data=info,ponzi_config=info";

#[derive(Parser, Debug)]
#[command(name = "ponzi2", version, about = "Desktop stock chart viewer")]
struct Args {
    /// Alpha Vantage API token. Without one the app runs on demo data.
    #[arg(long = "api_token")]
    api_token: Option<String>,

    /// Cache daily history and indicators on disk.
    #[arg(long = "enable_chart_cache", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    enable_chart_cache: Option<bool>,

    /// Write every provider response to debug-*.txt in the working directory.
    #[arg(long = "dump_api_responses", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    dump_api_responses: Option<bool>,

    /// Serve embedded sample data instead of calling the provider.
    #[arg(long)]
    demo: bool,

    /// Settings file to use instead of the default locations.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Settings file with command-line overrides applied.
fn settings(args: Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("cannot load {}", path.display()))?,
        None => Config::load_default().context("cannot load settings")?,
    };
    if let Some(token) = args.api_token {
        config.api.api_token = token;
    }
    if let Some(enable) = args.enable_chart_cache {
        config.cache.enable_chart_cache = enable;
    }
    if let Some(dump) = args.dump_api_responses {
        config.cache.dump_api_responses = dump;
    }
    config.general.demo |= args.demo;
    if config.api.api_token.trim().is_empty() && !config.general.demo {
        log::warn!("no API token given, running on demo data");
        config.general.demo = true;
    }
    Ok(config)
}

fn client_config(config: &Config) -> ClientConfig {
    let mut client = ClientConfig::new(config.api.api_token.trim())
        .with_base_url(&config.api.base_url)
        .with_timeout(Duration::from_secs(config.api.timeout_secs))
        .with_min_request_interval(Duration::from_millis(config.api.min_request_interval_ms))
        .with_dump_responses(config.cache.dump_api_responses, ".")
        .with_demo(config.general.demo);
    if config.cache.enable_chart_cache {
        client = client.with_cache_dir(config.cache.resolved_cache_dir());
    }
    client
}

fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();

    let config = settings(Args::parse())?;
    log::info!(
        "starting: demo={} cache={} dump={} endpoint={}",
        config.general.demo,
        config.cache.enable_chart_cache,
        config.cache.dump_api_responses,
        config.api.base_url
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let client = DataClient::new(client_config(&config)).context("failed to create data client")?;

    let prefs = match PreferencesStore::default_location() {
        Ok(store) => Some(store),
        Err(e) => {
            log::warn!("preferences will not be saved: {e}");
            None
        }
    };

    let event_loop = EventLoop::<AppWake>::with_user_event()
        .build()
        .context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let waker = proxy_waker(event_loop.create_proxy());
    let controller = Controller::new(client, runtime.handle().clone(), prefs, waker);
    let mut app = App::new(controller);
    event_loop.run_app(&mut app)?;
    app.finish()
}

fn main() {
    if let Err(e) = run() {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
