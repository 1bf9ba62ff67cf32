use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of improvement for a metric.
///
/// Most indicators improve as they rise (GDP per capita); some improve as
/// they fall (infant mortality). Rankings and normalization multiply raw
/// values by the polarity factor so "best" means the same thing across
/// metrics with opposite orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Direct,
    Inverse,
}

impl Polarity {
    /// Interpret the multiplier attached to a metric node. Anything
    /// negative means inverse; missing or non-negative means direct.
    pub fn from_multiplier(multiplier: Option<f64>) -> Self {
        match multiplier {
            Some(m) if m < 0.0 => Polarity::Inverse,
            _ => Polarity::Direct,
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            Polarity::Direct => 1.0,
            Polarity::Inverse => -1.0,
        }
    }
}

impl Default for Polarity {
    fn default() -> Self {
        Polarity::Direct
    }
}

/// A development indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub code: String,
    pub name: String,
    pub polarity: Polarity,
}

/// A measured subject. Region and income-group memberships are optional
/// enrichments; adjacency lives separately in [`AdjacencyMap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub region: Option<String>,
    pub income_group: Option<String>,
}

/// Country adjacency, keyed by country code.
///
/// Only the neighbor comparator reads this; everything else in the
/// pipeline is adjacency-blind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyMap {
    edges: BTreeMap<String, Vec<String>>,
}

impl AdjacencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directed edge. Border data usually arrives once per
    /// direction; duplicates are ignored.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let list = self.edges.entry(from.to_string()).or_default();
        if !list.iter().any(|n| n == to) {
            list.push(to.to_string());
        }
    }

    pub fn neighbors(&self, code: &str) -> &[String] {
        self.edges.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}
