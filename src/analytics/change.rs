use crate::data::{Polarity, Series, SeriesKey};
use crate::error::AnalyticsError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How an endpoint delta is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStrategy {
    /// (last - first) / first, with a defined-zero policy for zero bases.
    Relative,
    /// last - first.
    Absolute,
}

impl FromStr for ChangeStrategy {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relative" => Ok(ChangeStrategy::Relative),
            "absolute" => Ok(ChangeStrategy::Absolute),
            _ => Err(AnalyticsError::invalid_parameter("strategy", s)),
        }
    }
}

impl fmt::Display for ChangeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStrategy::Relative => write!(f, "relative"),
            ChangeStrategy::Absolute => write!(f, "absolute"),
        }
    }
}

/// A computed delta, tagged with where it came from so downstream
/// grouping and display never have to look it back up.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub country: String,
    pub metric: String,
    /// The later of the two years the delta was computed from.
    pub year: i32,
    pub delta: f64,
}

/// Period-over-period deltas between consecutive observed years.
///
/// A series of n points yields n-1 deltas, each the raw difference
/// between adjacent observations, tagged with the later year. Used for
/// "largest jump" analyses where gaps between observed years are treated
/// as one period regardless of width.
pub fn consecutive_deltas(key: &SeriesKey, series: &Series) -> Vec<Change> {
    series
        .points()
        .windows(2)
        .map(|pair| Change {
            country: key.country.clone(),
            metric: key.metric.clone(),
            year: pair[1].year,
            delta: pair[1].value - pair[0].value,
        })
        .collect()
}

/// One delta per series from its first and last observed years.
///
/// The polarity factor is applied to both endpoints before differencing.
/// Zero-base policy: a relative delta over a zero base is exactly 0, not
/// NaN or infinity, so the subject stays in ranking output instead of
/// disappearing. Series with fewer than two observations have no period
/// to difference and yield None.
pub fn endpoint_delta(
    key: &SeriesKey,
    series: &Series,
    strategy: ChangeStrategy,
    polarity: Polarity,
) -> Option<Change> {
    if series.len() < 2 {
        return None;
    }
    let first = series.first()?.value * polarity.factor();
    let last = series.last()?.value * polarity.factor();

    let delta = match strategy {
        ChangeStrategy::Absolute => last - first,
        ChangeStrategy::Relative => {
            if first == 0.0 {
                0.0
            } else {
                (last - first) / first
            }
        }
    };

    if !delta.is_finite() {
        return None;
    }

    Some(Change {
        country: key.country.clone(),
        metric: key.metric.clone(),
        year: series.last()?.year,
        delta,
    })
}
