use crate::analytics::{ChangeStrategy, NeighborComparison, SortOrder};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of a ranked-list view. Exactly one of `country` and `region`
/// is present, depending on the requested scope.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRow {
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub value: f64,
}

/// Leaders/laggards on one metric.
#[derive(Debug, Clone, Serialize)]
pub struct RankedList {
    pub data: Vec<RankedRow>,
    pub order: SortOrder,
    pub strategy: ChangeStrategy,
}

/// One row of the change summary. Field casing is part of the wire
/// contract consumed by the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRow {
    #[serde(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "AvgChange")]
    pub avg_change: f64,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(skip_serializing)]
    pub metric_code: String,
}

/// Which metrics moved the most across the whole population.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeSummary {
    pub data: Vec<ChangeRow>,
    pub order: SortOrder,
}

/// A reference country's percentage change next to its neighborhood's.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborEntry {
    #[serde(rename = "main_country_percentage")]
    pub main_country_percentage: f64,
    #[serde(rename = "neighboring_countries")]
    pub neighboring_countries: BTreeMap<String, f64>,
}

impl From<NeighborComparison> for NeighborEntry {
    fn from(comparison: NeighborComparison) -> Self {
        Self {
            main_country_percentage: comparison.score,
            neighboring_countries: comparison.neighbors,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NeighborReport {
    pub data: BTreeMap<String, NeighborEntry>,
}

/// Composite top performers across all metrics.
#[derive(Debug, Clone, Serialize)]
pub struct TopRow {
    pub country: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopCountries {
    pub data: Vec<TopRow>,
    pub order: SortOrder,
}

/// Everything at once, for the offline reporting binary.
#[derive(Debug, Clone, Serialize)]
pub struct FullReport {
    pub generated_at: DateTime<Utc>,
    pub movers: ChangeSummary,
    /// Leaders on the biggest-moving metric, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaders: Option<RankedList>,
    pub top_countries: TopCountries,
    pub neighborhood: NeighborReport,
}

impl FullReport {
    /// Print a terse run summary to stdout.
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════╗");
        println!("║            WORLDLINE REPORT SUMMARY            ║");
        println!("╠════════════════════════════════════════════════╣");
        println!("║ Metrics summarized: {:<26} ║", self.movers.data.len());
        if let Some(top) = self.movers.data.first() {
            let name: String = top.metric.chars().take(24).collect();
            println!("║ Biggest mover: {:<31} ║", name);
        }
        println!("║ Countries ranked: {:<28} ║", self.top_countries.data.len());
        println!("║ Reference neighborhoods: {:<21} ║", self.neighborhood.data.len());
        println!("╚════════════════════════════════════════════════╝");
    }
}
