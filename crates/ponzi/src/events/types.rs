//! Event type definitions.

use ponzi_core::{PriceStyle, Range, Symbol};

/// Scroll-wheel zoom direction over the main chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDir {
    In,
    Out,
}

impl ZoomDir {
    /// Range shown after zooming from any range.
    pub fn target_range(self) -> Range {
        match self {
            ZoomDir::In => Range::OneDay,
            ZoomDir::Out => Range::OneYear,
        }
    }
}

/// Semantic events produced while the view processes a frame's input.
///
/// Widgets only carry symbols; the controller owns every side effect.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The symbol entry overlay submitted its text.
    SymbolSubmitted(String),
    /// Add the main chart's symbol to the watchlist.
    AddClicked,
    /// Reload the chart showing this symbol.
    RefreshClicked(Symbol),
    /// Remove this thumbnail from the watchlist.
    RemoveClicked(Symbol),
    /// Show this thumbnail's symbol in the main chart.
    ThumbClicked(Symbol),
    ZoomChanged(ZoomDir),
    PriceStyleChanged(PriceStyle),
    /// The sidebar order changed after a drag.
    Reordered(Vec<Symbol>),
}
