pub mod analytics;
pub mod data;
pub mod error;
pub mod report;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use analytics::{
    Change, ChangeStrategy, Fence, NeighborComparator, NeighborComparison, NeighborPolicy,
    OutlierFilter, RankedEntry, SeriesSet, SortOrder,
};
pub use data::{
    AdjacencyMap, Country, Measurement, Metric, Polarity, RawMeasurement, Scalar, Series,
    SeriesKey, SeriesPoint,
};
pub use error::AnalyticsError;
pub use report::{
    AnalysisPolicy, ChangeSummary, FullReport, NeighborReport, RankScope, RankedList,
    ReportEngine, TopCountries,
};
pub use source::{GraphClient, MeasurementSource, MemorySource, Snapshot};
pub use utils::Config;
