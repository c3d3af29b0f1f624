//! Reacts to view events: loads chart data in the background, applies the
//! results on the main thread and persists the watchlist.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use ponzi_config::{Preferences, PreferencesStore};
use ponzi_core::{ChartData, PriceStyle, Range, Symbol};
use ponzi_data::DataClient;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::events::UiEvent;
use crate::view::chart::Chart;
use crate::view::View;

/// Wakes the event loop after a background result is queued.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Which chart a request feeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Main,
    Thumbnail(Symbol),
}

#[derive(Debug)]
struct BackgroundMessage {
    request_id: u64,
    target: Target,
    symbol: Symbol,
    range: Range,
    result: ponzi_data::Result<ChartData>,
}

pub struct Controller {
    client: DataClient,
    runtime: Handle,
    prefs: Option<PreferencesStore>,
    tx: Sender<BackgroundMessage>,
    rx: Receiver<BackgroundMessage>,
    waker: Waker,
    /// Latest request per target; results with another id are stale.
    pending: HashMap<Target, (u64, AbortHandle)>,
    next_request_id: u64,
    range: Range,
    /// `None` until the user picks one or preferences carry one.
    price_style: Option<PriceStyle>,
}

impl Controller {
    pub fn new(client: DataClient, runtime: Handle, prefs: Option<PreferencesStore>, waker: Waker) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client,
            runtime,
            prefs,
            tx,
            rx,
            waker,
            pending: HashMap::new(),
            next_request_id: 1,
            range: Range::default(),
            price_style: None,
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn price_style(&self) -> PriceStyle {
        self.price_style.unwrap_or_default()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Restore the saved watchlist and current symbol, and start loading them.
    pub fn startup(&mut self, view: &mut View) {
        let prefs = match &self.prefs {
            Some(store) => store.load().unwrap_or_else(|e| {
                log::warn!("cannot read preferences: {e}");
                Preferences::default()
            }),
            None => Preferences::default(),
        };
        self.price_style = prefs.price_style;
        let style = self.price_style();
        for symbol in prefs.symbols() {
            self.add_thumbnail(view, symbol, style);
        }
        if let Some(symbol) = prefs.current_symbol() {
            self.load_main(view, symbol.clone());
        }
        log::info!(
            "restored {} watchlist symbols, current {:?}",
            prefs.stocks.len(),
            prefs.current_symbol().map(Symbol::as_str)
        );
    }

    pub fn handle_event(&mut self, view: &mut View, event: UiEvent) {
        log::debug!("event: {event:?}");
        match event {
            UiEvent::SymbolSubmitted(text) => match Symbol::parse(&text) {
                Ok(symbol) => {
                    self.load_main(view, symbol);
                    self.save_prefs(view);
                }
                Err(e) => log::warn!("ignoring symbol {text:?}: {e}"),
            },
            UiEvent::AddClicked => {
                let Some(symbol) = view.main_chart().map(|c| c.symbol().clone()) else {
                    return;
                };
                let style = self.price_style();
                if self.add_thumbnail(view, symbol, style) {
                    self.save_prefs(view);
                }
            }
            UiEvent::RefreshClicked(symbol) => {
                let is_main = view.main_chart().is_some_and(|c| c.symbol() == &symbol);
                if is_main {
                    if let Some(chart) = view.main_chart_mut() {
                        chart.set_loading(true);
                    }
                    self.request(Target::Main, symbol, self.range);
                } else if let Some(chart) = view.sidebar_mut().chart_mut(&symbol) {
                    chart.set_loading(true);
                    self.request(Target::Thumbnail(symbol.clone()), symbol, Range::OneYear);
                }
            }
            UiEvent::RemoveClicked(symbol) => {
                if view.sidebar_mut().remove_thumbnail(&symbol) {
                    self.cancel(&Target::Thumbnail(symbol));
                    self.save_prefs(view);
                }
            }
            UiEvent::ThumbClicked(symbol) => {
                self.load_main(view, symbol);
                self.save_prefs(view);
            }
            UiEvent::ZoomChanged(dir) => {
                let range = dir.target_range();
                if range == self.range {
                    return;
                }
                self.range = range;
                if let Some(symbol) = view.main_chart().map(|c| c.symbol().clone()) {
                    self.load_main(view, symbol);
                }
            }
            UiEvent::PriceStyleChanged(style) => {
                self.price_style = Some(style);
                view.set_price_style(style);
                self.save_prefs(view);
            }
            UiEvent::Reordered(order) => {
                log::info!("watchlist reordered: {}", join(&order));
                self.save_prefs(view);
            }
        }
    }

    /// Apply every finished request. Returns whether any chart changed.
    pub fn pump(&mut self, view: &mut View) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            let current = self.pending.get(&msg.target).map(|(id, _)| *id);
            if current != Some(msg.request_id) {
                log::debug!("discarding stale result for {} ({:?})", msg.symbol, msg.target);
                continue;
            }
            self.pending.remove(&msg.target);

            let chart = match &msg.target {
                Target::Main => view
                    .main_chart_mut()
                    .filter(|c| c.symbol() == &msg.symbol && c.range() == msg.range),
                Target::Thumbnail(symbol) => view.sidebar_mut().chart_mut(symbol),
            };
            let Some(chart) = chart else {
                log::debug!("no chart left for {}", msg.symbol);
                continue;
            };
            apply(chart, msg.result);
            changed = true;
        }
        changed
    }

    fn load_main(&mut self, view: &mut View, symbol: Symbol) {
        let style = self.price_style();
        view.set_main_chart(symbol.clone(), self.range, style).set_loading(true);
        self.request(Target::Main, symbol, self.range);
    }

    fn add_thumbnail(&mut self, view: &mut View, symbol: Symbol, style: PriceStyle) -> bool {
        let Some(chart) = view.add_thumbnail(symbol.clone(), style) else {
            log::debug!("{symbol} is already in the watchlist");
            return false;
        };
        chart.set_loading(true);
        self.request(Target::Thumbnail(symbol.clone()), symbol, Range::OneYear);
        true
    }

    /// Start loading `symbol` for `target`, replacing any request in flight for it.
    fn request(&mut self, target: Target, symbol: Symbol, range: Range) {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let client = self.client.clone();
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        let task_target = target.clone();
        let task = self.runtime.spawn(async move {
            let result = client.get_chart_data(&symbol, range).await;
            let msg = BackgroundMessage {
                request_id,
                target: task_target,
                symbol,
                range,
                result,
            };
            if tx.send(msg).is_ok() {
                waker();
            }
        });

        if let Some((old, handle)) = self.pending.insert(target, (request_id, task.abort_handle())) {
            log::debug!("cancelling request {old}");
            handle.abort();
        }
    }

    fn cancel(&mut self, target: &Target) {
        if let Some((_, handle)) = self.pending.remove(target) {
            handle.abort();
        }
    }

    fn save_prefs(&self, view: &View) {
        let Some(store) = &self.prefs else {
            return;
        };
        let prefs = Preferences::new(
            view.main_chart().map(Chart::symbol),
            &view.sidebar().symbols(),
            self.price_style,
        );
        if let Err(e) = store.save(&prefs) {
            log::warn!("cannot save preferences: {e}");
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        for (_, handle) in self.pending.values() {
            handle.abort();
        }
    }
}

fn apply(chart: &mut Chart, result: ponzi_data::Result<ChartData>) {
    chart.set_loading(false);
    let outcome = result
        .map_err(|e| e.to_string())
        .and_then(|data| chart.set_data(Some(data)).map_err(|e| e.to_string()));
    if let Err(message) = outcome {
        log::error!("{}: {message}", chart.symbol());
        chart.set_error(message);
    }
}

fn join(symbols: &[Symbol]) -> String {
    symbols.iter().map(Symbol::as_str).collect::<Vec<_>>().join(", ")
}
