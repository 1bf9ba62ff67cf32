pub mod engine;
pub mod views;

pub use engine::{AnalysisPolicy, RankScope, ReportEngine};
pub use views::{
    ChangeRow, ChangeSummary, FullReport, NeighborEntry, NeighborReport, RankedList, RankedRow,
    TopCountries, TopRow,
};
