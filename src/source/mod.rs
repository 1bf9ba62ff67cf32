pub mod graph;
pub mod memory;

pub use graph::{CountryInfo, GraphClient, MetricInfo, NamedNode};
pub use memory::MemorySource;

use crate::data::{AdjacencyMap, RawMeasurement};
use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};

/// One batch of facts retrieved for a request: the measurement rows plus
/// the adjacency relation. The analytics pipeline operates on exactly
/// this and nothing else, so any storage backend that can produce a
/// snapshot can drive the whole engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: Vec<RawMeasurement>,
    #[serde(default)]
    pub adjacency: AdjacencyMap,
}

/// The seam between the analytics core and whatever stores the data.
///
/// Handles are passed explicitly per request; there is no process-wide
/// singleton. The fetch is the pipeline's only suspension point, and the
/// source owns any retry policy it wants to have.
#[allow(async_fn_in_trait)]
pub trait MeasurementSource {
    async fn snapshot(&self) -> Result<Snapshot, AnalyticsError>;
}
