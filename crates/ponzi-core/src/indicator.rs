//! Indicator series: moving averages and stochastic oscillators.
//!
//! Values are aligned to a `TradingSessionSeries` by position once built
//! through the `aligned_to` helpers. A zero value means "no sample".

use chrono::NaiveDateTime;

use crate::session::TradingSessionSeries;

/// Moving average flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AverageKind {
    #[default]
    Simple,
    Exponential,
}

/// Sampling interval of an indicator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
}

impl Interval {
    /// Provider query value.
    pub fn as_param(&self) -> &'static str {
        match self {
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageValue {
    pub date: NaiveDateTime,
    pub value: f32,
}

/// A moving average over `intervals` sessions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AverageSeries {
    pub kind: AverageKind,
    pub intervals: u32,
    pub values: Vec<AverageValue>,
}

impl AverageSeries {
    pub fn new(kind: AverageKind, intervals: u32, mut values: Vec<AverageValue>) -> Self {
        values.sort_by_key(|v| v.date);
        values.dedup_by_key(|v| v.date);
        Self {
            kind,
            intervals,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One value per session, matched by date; missing dates become zero.
    pub fn aligned_to(&self, sessions: &TradingSessionSeries) -> AverageSeries {
        let values = sessions
            .iter()
            .map(|s| {
                let value = self
                    .values
                    .binary_search_by_key(&s.date, |v| v.date)
                    .map(|i| self.values[i].value)
                    .unwrap_or(0.0);
                AverageValue {
                    date: s.date,
                    value,
                }
            })
            .collect();
        AverageSeries {
            kind: self.kind,
            intervals: self.intervals,
            values,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticValue {
    pub date: NaiveDateTime,
    /// %K in `[0, 1]`.
    pub k: f32,
    /// %D in `[0, 1]`.
    pub d: f32,
}

/// Stochastic oscillator values for one interval.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StochasticSeries {
    pub interval: Interval,
    pub values: Vec<StochasticValue>,
}

impl StochasticSeries {
    pub fn new(interval: Interval, mut values: Vec<StochasticValue>) -> Self {
        values.sort_by_key(|v| v.date);
        values.dedup_by_key(|v| v.date);
        Self { interval, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One value per session.
    ///
    /// Daily values are matched by exact date. Weekly values carry the most
    /// recent weekly sample dated on or before each session. Sessions with no
    /// sample get zeros.
    pub fn aligned_to(&self, sessions: &TradingSessionSeries) -> StochasticSeries {
        let values = sessions
            .iter()
            .map(|s| {
                let found = match self.interval {
                    Interval::Daily => self
                        .values
                        .binary_search_by_key(&s.date, |v| v.date)
                        .ok()
                        .map(|i| self.values[i]),
                    Interval::Weekly => {
                        let idx = self.values.partition_point(|v| v.date <= s.date);
                        idx.checked_sub(1).map(|i| self.values[i])
                    }
                };
                match found {
                    Some(v) => StochasticValue {
                        date: s.date,
                        k: v.k,
                        d: v.d,
                    },
                    None => StochasticValue {
                        date: s.date,
                        k: 0.0,
                        d: 0.0,
                    },
                }
            })
            .collect();
        StochasticSeries {
            interval: self.interval,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TradingSession;
    use chrono::NaiveDate;

    fn day(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sessions(days: &[(u32, u32)]) -> TradingSessionSeries {
        TradingSessionSeries::new(
            days.iter()
                .enumerate()
                .map(|(i, (m, d))| {
                    let c = 10.0 + i as f32;
                    TradingSession::new(day(*m, *d), c, c, c, c, 1)
                })
                .collect(),
        )
    }

    #[test]
    fn test_average_alignment_fills_zero() {
        let avg = AverageSeries::new(
            AverageKind::Simple,
            25,
            vec![
                AverageValue { date: day(6, 3), value: 3.0 },
                AverageValue { date: day(6, 1), value: 1.0 },
            ],
        );
        let aligned = avg.aligned_to(&sessions(&[(6, 1), (6, 2), (6, 3)]));
        let values: Vec<f32> = aligned.values.iter().map(|v| v.value).collect();
        assert_eq!(values, vec![1.0, 0.0, 3.0]);
        assert_eq!(aligned.intervals, 25);
    }

    #[test]
    fn test_weekly_stochastics_carry_forward() {
        let weekly = StochasticSeries::new(
            Interval::Weekly,
            vec![
                StochasticValue { date: day(6, 1), k: 0.5, d: 0.4 },
                StochasticValue { date: day(6, 8), k: 0.9, d: 0.8 },
            ],
        );
        let aligned = weekly.aligned_to(&sessions(&[(5, 31), (6, 4), (6, 8), (6, 11)]));
        let ks: Vec<f32> = aligned.values.iter().map(|v| v.k).collect();
        assert_eq!(ks, vec![0.0, 0.5, 0.9, 0.9]);
    }

    #[test]
    fn test_daily_stochastics_match_by_date() {
        let daily = StochasticSeries::new(
            Interval::Daily,
            vec![StochasticValue { date: day(6, 2), k: 0.2, d: 0.3 }],
        );
        let aligned = daily.aligned_to(&sessions(&[(6, 1), (6, 2)]));
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned.values[0].k, 0.0);
        assert_eq!(aligned.values[1].d, 0.3);
    }
}
