use serde::{Deserialize, Serialize};

/// Identity of one series: a subject crossed with a metric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub country: String,
    pub metric: String,
}

impl SeriesKey {
    pub fn new(country: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            metric: metric.into(),
        }
    }
}

/// One observation inside a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// A year-ordered sequence of observations for one (country, metric) pair.
///
/// Invariant: years are strictly increasing and unique. The series builder
/// enforces this by averaging duplicate keys before construction; nothing
/// else constructs series from unordered data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    points: Vec<SeriesPoint>,
}

impl Series {
    /// Build from points already sorted by year with no duplicates.
    pub(crate) fn from_sorted(points: Vec<SeriesPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].year < w[1].year));
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
