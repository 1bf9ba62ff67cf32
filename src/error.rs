use thiserror::Error;

/// Everything the analytics pipeline can refuse to do.
///
/// Numeric degeneracy (zero denominators, NaN, infinite deltas) is
/// deliberately absent: those cases resolve to defined sentinel values or
/// exclusion inside the pipeline and never surface as errors.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A request parameter failed validation before any computation ran.
    #[error("unsupported {name} value: {value:?}")]
    InvalidParameter { name: &'static str, value: String },

    /// The snapshot produced no usable rows after coercion. Distinct from
    /// a computation fault; callers typically render this as an empty
    /// result rather than a failure.
    #[error("no usable measurements in snapshot")]
    NoData,

    /// The measurement source itself failed. Propagated as-is; the core
    /// never retries.
    #[error("measurement source failure: {0}")]
    Source(#[source] anyhow::Error),
}

impl AnalyticsError {
    pub fn invalid_parameter(name: &'static str, value: &str) -> Self {
        AnalyticsError::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }

    /// True for errors the caller caused (bad parameters, empty data),
    /// false for upstream faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalyticsError::InvalidParameter { .. } | AnalyticsError::NoData
        )
    }
}
