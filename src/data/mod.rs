pub mod entities;
pub mod measurement;
pub mod series;

pub use entities::{AdjacencyMap, Country, Metric, Polarity};
pub use measurement::{Measurement, RawMeasurement, Scalar};
pub use series::{Series, SeriesKey, SeriesPoint};
