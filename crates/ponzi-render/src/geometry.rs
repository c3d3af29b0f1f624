//! Geometry builder: trading sessions to indexed meshes.
//!
//! All meshes live in normalised model space. X spans `[-1, 1]` with one
//! stick of width `2 / N` per session; Y spans `[-1, 1]` from the bottom to
//! the top of the owning panel. The chart stretches them onto a pixel rect
//! with [`Matrix4::for_rect`](crate::camera::Matrix4::for_rect).

use ponzi_core::{PriceStyle, StochasticSeries, TradingSession, TradingSessionSeries, TradingSessionSource};
use thiserror::Error;

use crate::color::Color;
use crate::mesh::{MeshBuilder, MeshData};

/// Fraction of a stick's width covered by a candle body on each side of mid.
pub const STICK_HALF_WIDTH_RATIO: f32 = 0.4;

/// Padding applied above and below the price extremes.
pub const PRICE_PADDING_RATIO: f32 = 0.05;

/// Vertices emitted per session by [`build_price_mesh`], whatever the style.
pub const VERTICES_PER_SESSION: usize = 8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("bad range: high {high} must exceed low {low}")]
    BadRange { low: f32, high: f32 },
    #[error("need at least two sessions, got {count}")]
    Empty { count: usize },
}

/// Closed value interval mapped onto `[-1, 1]`.
///
/// Mapping is logarithmic when `low > 0` and linear when `low == 0`.
/// Values `<= 0` sit on the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub low: f32,
    pub high: f32,
}

impl ValueRange {
    pub fn new(low: f32, high: f32) -> Result<Self, GeometryError> {
        if !(high > low) || !low.is_finite() || !high.is_finite() || low < 0.0 {
            return Err(GeometryError::BadRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// Max high and min low over sessions with prices, padded by 5% each side.
    pub fn price(series: &TradingSessionSeries) -> Result<Self, GeometryError> {
        let mut low = f32::MAX;
        let mut high = f32::MIN;
        for s in series.iter().filter(|s| !s.is_empty()) {
            if s.low > 0.0 {
                low = low.min(s.low);
            }
            high = high.max(s.high);
        }
        if low == f32::MAX || high == f32::MIN {
            return Err(GeometryError::BadRange { low: 0.0, high: 0.0 });
        }
        let pad = (high - low) * PRICE_PADDING_RATIO;
        Self::new((low - pad).max(0.0), high + pad)
    }

    /// Volume scale: top is the max volume, floor half the smallest
    /// non-zero volume so every traded session stands above the floor.
    pub fn volume(series: &TradingSessionSeries) -> Self {
        let max = series.iter().map(|s| s.volume).max().unwrap_or(0);
        let min_nonzero = series.iter().map(|s| s.volume).filter(|v| *v > 0).min();
        match min_nonzero {
            Some(min) if max > 0 => Self {
                low: min as f32 / 2.0,
                high: max as f32,
            },
            _ => Self { low: 0.5, high: 1.0 },
        }
    }

    pub fn is_log(&self) -> bool {
        self.low > 0.0
    }

    /// Map `v` to `[-1, 1]`, clamped.
    pub fn scale(&self, v: f32) -> f32 {
        if v <= 0.0 {
            return -1.0;
        }
        let p = if self.is_log() {
            (v.ln() - self.low.ln()) / (self.high.ln() - self.low.ln())
        } else {
            (v - self.low) / (self.high - self.low)
        };
        (2.0 * p - 1.0).clamp(-1.0, 1.0)
    }

    /// Inverse of [`scale`](Self::scale) for `y` in `[-1, 1]`.
    pub fn unscale(&self, y: f32) -> f32 {
        let p = ((y + 1.0) / 2.0).clamp(0.0, 1.0);
        if self.is_log() {
            (self.low.ln() + p * (self.high.ln() - self.low.ln())).exp()
        } else {
            self.low + p * (self.high - self.low)
        }
    }
}

/// Colour rule shared by price and volume bars.
pub fn session_color(s: &TradingSession) -> Color {
    if s.source == TradingSessionSource::IntradayRealTime {
        Color::HIGHLIGHT
    } else if s.close > s.open {
        Color::UP
    } else if s.close < s.open {
        Color::DOWN
    } else {
        Color::NEUTRAL
    }
}

/// Mid X of session `i` out of `n`.
pub fn session_mid_x(i: usize, n: usize) -> f32 {
    -1.0 + (i as f32 + 0.5) * 2.0 / n as f32
}

/// Half width of a candle body for `n` sessions.
pub fn stick_half_width(n: usize) -> f32 {
    STICK_HALF_WIDTH_RATIO * 2.0 / n as f32
}

/// Index of the session whose stick covers normalised `x`.
pub fn session_index_at(x: f32, n: usize) -> Option<usize> {
    if n == 0 || !(-1.0..=1.0).contains(&x) {
        return None;
    }
    let i = ((x + 1.0) / 2.0 * n as f32).floor() as usize;
    Some(i.min(n - 1))
}

fn check_len(series: &TradingSessionSeries) -> Result<usize, GeometryError> {
    let n = series.len();
    if n < 2 {
        return Err(GeometryError::Empty { count: n });
    }
    Ok(n)
}

/// Candlesticks or bars for every session.
///
/// Each session emits the same eight vertices in both styles:
/// high, low, body top and body bottom on the mid line, then the four body
/// corners. Only the index lists depend on `style`:
/// - candlestick: two wick segments, a four-segment box for sessions that
///   did not close down, two fill triangles for sessions that closed down;
/// - bar: one high-low segment plus the open tick on the left and the close
///   tick on the right.
pub fn build_price_mesh(
    series: &TradingSessionSeries,
    style: PriceStyle,
    range: &ValueRange,
) -> Result<MeshData, GeometryError> {
    let n = check_len(series)?;
    if !(range.high > range.low) {
        return Err(GeometryError::BadRange {
            low: range.low,
            high: range.high,
        });
    }

    let half = stick_half_width(n);
    let mut b = MeshBuilder::with_capacity(n * VERTICES_PER_SESSION);

    for (i, s) in series.iter().enumerate() {
        let color = session_color(s);
        let mid = session_mid_x(i, n);
        let (left, right) = (mid - half, mid + half);

        let body_top = range.scale(s.open.max(s.close));
        let body_bottom = range.scale(s.open.min(s.close));

        let high_mid = b.vertex(mid, range.scale(s.high), color);
        let low_mid = b.vertex(mid, range.scale(s.low), color);
        let top_mid = b.vertex(mid, body_top, color);
        let bottom_mid = b.vertex(mid, body_bottom, color);
        let tl = b.vertex(left, body_top, color);
        let tr = b.vertex(right, body_top, color);
        let bl = b.vertex(left, body_bottom, color);
        let br = b.vertex(right, body_bottom, color);

        let closed_down = s.close < s.open;
        match style {
            PriceStyle::Candlestick => {
                b.line(high_mid, top_mid);
                b.line(bottom_mid, low_mid);
                if closed_down {
                    b.triangle(tl, bl, br);
                    b.triangle(tl, br, tr);
                } else {
                    b.line(tl, tr);
                    b.line(tr, br);
                    b.line(br, bl);
                    b.line(bl, tl);
                }
            }
            PriceStyle::Bar => {
                b.line(high_mid, low_mid);
                if closed_down {
                    b.line(tl, top_mid);
                    b.line(bottom_mid, br);
                } else {
                    b.line(bl, bottom_mid);
                    b.line(top_mid, tr);
                }
            }
        }
    }

    Ok(b.build())
}

/// One vertical segment per session from the floor to its volume.
/// Zero-volume sessions collapse onto the floor.
pub fn build_volume_mesh(
    series: &TradingSessionSeries,
    range: &ValueRange,
) -> Result<MeshData, GeometryError> {
    let n = check_len(series)?;
    let mut b = MeshBuilder::with_capacity(n * 2);
    for (i, s) in series.iter().enumerate() {
        let x = session_mid_x(i, n);
        b.segment([x, -1.0], [x, range.scale(s.volume as f32)], session_color(s));
    }
    Ok(b.build())
}

/// Segments joining adjacent present samples. `None` breaks the line.
pub fn build_polyline(ys: &[Option<f32>], color: Color) -> MeshData {
    let n = ys.len();
    let mut b = MeshBuilder::new();
    let mut prev: Option<u32> = None;
    for (i, y) in ys.iter().enumerate() {
        prev = match y {
            Some(y) => {
                let v = b.vertex(session_mid_x(i, n), *y, color);
                if let Some(p) = prev {
                    b.line(p, v);
                }
                Some(v)
            }
            None => None,
        };
    }
    b.build()
}

/// Moving average polyline on the price scale. Zero values are omitted.
pub fn build_average_line(values: &[f32], range: &ValueRange, color: Color) -> MeshData {
    let ys: Vec<Option<f32>> = values
        .iter()
        .map(|v| (*v > 0.0).then(|| range.scale(*v)))
        .collect();
    build_polyline(&ys, color)
}

/// %K and %D polylines on a linear `[0, 1]` scale.
pub fn build_stochastic_lines(series: &StochasticSeries, k_color: Color, d_color: Color) -> (MeshData, MeshData) {
    let to_y = |v: f32| (v != 0.0).then_some(2.0 * v.clamp(0.0, 1.0) - 1.0);
    let ks: Vec<Option<f32>> = series.values.iter().map(|v| to_y(v.k)).collect();
    let ds: Vec<Option<f32>> = series.values.iter().map(|v| to_y(v.d)).collect();
    (build_polyline(&ks, k_color), build_polyline(&ds, d_color))
}

/// Horizontal rails at the given `[0, 1]` levels, full width.
pub fn build_level_lines(levels: &[f32], color: Color) -> MeshData {
    let mut b = MeshBuilder::new();
    for level in levels {
        let y = 2.0 * level - 1.0;
        b.segment([-1.0, y], [1.0, y], color);
    }
    b.build()
}
