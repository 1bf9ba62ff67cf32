use crate::error::AnalyticsError;
use crate::source::{MeasurementSource, Snapshot};
use anyhow::{Context, Result};
use std::path::Path;

/// A measurement source backed by an already-materialized snapshot.
///
/// Used by the offline reporting binary and by tests; there is no I/O
/// behind it, so a fetch can never fail.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    snapshot: Snapshot,
}

impl MemorySource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot previously serialized to JSON.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot file {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("parsing snapshot file {}", path.display()))?;
        Ok(Self::new(snapshot))
    }

    pub fn row_count(&self) -> usize {
        self.snapshot.rows.len()
    }
}

impl MeasurementSource for MemorySource {
    async fn snapshot(&self) -> Result<Snapshot, AnalyticsError> {
        Ok(self.snapshot.clone())
    }
}
