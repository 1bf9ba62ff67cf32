use crate::data::{RawMeasurement, Scalar};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for the graph transaction endpoint: a list of statements
/// executed and committed in one round trip.
#[derive(Debug, Serialize)]
pub struct StatementRequest {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Serialize)]
pub struct Statement {
    pub statement: String,
}

impl StatementRequest {
    pub fn single(statement: impl Into<String>) -> Self {
        Self {
            statements: vec![Statement { statement: statement.into() }],
        }
    }
}

/// Response envelope. The endpoint reports statement failures inside the
/// body with a 200 status, so `errors` has to be checked on every call.
#[derive(Debug, Deserialize)]
pub struct TxResponse {
    #[serde(default)]
    pub results: Vec<TxResult>,
    #[serde(default)]
    pub errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
pub struct TxResult {
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
pub struct TxRow {
    #[serde(default)]
    pub row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct TxError {
    pub code: String,
    pub message: String,
}

/// A country node as listed for display purposes.
#[derive(Debug, Clone, Serialize)]
pub struct CountryInfo {
    pub code: String,
    pub code2: Option<String>,
    pub name: Option<String>,
    pub currency: Option<String>,
}

/// A metric node as listed for display purposes.
#[derive(Debug, Clone, Serialize)]
pub struct MetricInfo {
    pub code: String,
    pub name: Option<String>,
    pub periodicity: Option<String>,
    pub definition: Option<String>,
}

/// A region or income-group node.
#[derive(Debug, Clone, Serialize)]
pub struct NamedNode {
    pub id: Option<String>,
    pub name: Option<String>,
}

// Cell readers for positional row access. The transaction endpoint
// returns untyped JSON; everything typed starts here.

pub(crate) fn cell_string(row: &[Value], idx: usize) -> Option<String> {
    match row.get(idx)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn cell_f64(row: &[Value], idx: usize) -> Option<f64> {
    row.get(idx)?.as_f64()
}

pub(crate) fn cell_scalar(row: &[Value], idx: usize) -> Option<Scalar> {
    match row.get(idx)? {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(Scalar::Number),
        Value::String(s) => Some(Scalar::Text(s.clone())),
        other => Some(Scalar::Other(other.clone())),
    }
}

/// Column order contract for the measurement query: country_code,
/// country_name, region, income_group, metric_code, metric_name,
/// multiplier, year, value.
pub(crate) fn measurement_from_row(row: &[Value]) -> Option<RawMeasurement> {
    Some(RawMeasurement {
        country_code: cell_string(row, 0)?,
        country_name: cell_string(row, 1),
        region: cell_string(row, 2),
        income_group: cell_string(row, 3),
        metric_code: cell_string(row, 4)?,
        metric_name: cell_string(row, 5),
        multiplier: cell_f64(row, 6),
        year: cell_scalar(row, 7),
        value: cell_scalar(row, 8),
    })
}
