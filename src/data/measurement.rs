use serde::{Deserialize, Serialize};

/// A loosely-typed cell as it arrives from the graph layer.
///
/// Year and value columns come back as numbers, strings, or null depending
/// on how the underlying CSV was loaded, so the wire shape has to accept
/// all three and coercion happens on our side of the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Scalar {
    /// Coerce to a finite float. Strings are trimmed and parsed; anything
    /// else (booleans, nested structures, NaN, infinities) is rejected.
    pub fn as_f64(&self) -> Option<f64> {
        let parsed = match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
            Scalar::Other(_) => None,
        };
        parsed.filter(|v| v.is_finite())
    }

    /// Coerce to a calendar year.
    pub fn as_year(&self) -> Option<i32> {
        self.as_f64().map(|v| v.round() as i32)
    }
}

/// One raw fact row from the measurement source, before any validation.
///
/// This is the entire input contract with the storage layer: a subject, a
/// metric, a year and a value, plus whatever display fields the source can
/// enrich the row with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMeasurement {
    pub country_code: String,
    pub country_name: Option<String>,
    pub region: Option<String>,
    pub income_group: Option<String>,
    pub metric_code: String,
    pub metric_name: Option<String>,
    /// Polarity multiplier attached to the metric node; missing means +1.
    pub multiplier: Option<f64>,
    pub year: Option<Scalar>,
    pub value: Option<Scalar>,
}

impl RawMeasurement {
    /// Coerce into a typed measurement. Returns None when the year or the
    /// value cannot be read as a number; such rows are dropped silently,
    /// which is the documented contract with the source.
    pub fn coerce(&self) -> Option<Measurement> {
        let year = self.year.as_ref()?.as_year()?;
        let value = self.value.as_ref()?.as_f64()?;
        Some(Measurement {
            country: self.country_code.clone(),
            metric: self.metric_code.clone(),
            year,
            value,
        })
    }
}

/// A validated fact: one subject, one metric, one year, one finite value.
///
/// Identity is (country, metric, year); duplicates for the same identity
/// are averaged during series building, never silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub country: String,
    pub metric: String,
    pub year: i32,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(year: Option<Scalar>, value: Option<Scalar>) -> RawMeasurement {
        RawMeasurement {
            country_code: "ARG".to_string(),
            country_name: Some("Argentina".to_string()),
            region: None,
            income_group: None,
            metric_code: "SP.POP.TOTL".to_string(),
            metric_name: None,
            multiplier: None,
            year,
            value,
        }
    }

    #[test]
    fn test_numeric_row_coerces() {
        let row = raw(Some(Scalar::Number(2010.0)), Some(Scalar::Number(41.2)));
        let m = row.coerce().unwrap();
        assert_eq!(m.year, 2010);
        assert_eq!(m.value, 41.2);
    }

    #[test]
    fn test_string_cells_are_parsed() {
        let row = raw(
            Some(Scalar::Text(" 2015 ".to_string())),
            Some(Scalar::Text("3.75".to_string())),
        );
        let m = row.coerce().unwrap();
        assert_eq!(m.year, 2015);
        assert_eq!(m.value, 3.75);
    }

    #[test]
    fn test_null_value_is_dropped() {
        let row = raw(Some(Scalar::Number(2010.0)), None);
        assert!(row.coerce().is_none());
    }

    #[test]
    fn test_garbage_value_is_dropped() {
        let row = raw(
            Some(Scalar::Number(2010.0)),
            Some(Scalar::Text("n/a".to_string())),
        );
        assert!(row.coerce().is_none());
    }

    #[test]
    fn test_non_finite_value_is_dropped() {
        let row = raw(Some(Scalar::Number(2010.0)), Some(Scalar::Number(f64::NAN)));
        assert!(row.coerce().is_none());

        let row = raw(
            Some(Scalar::Number(2010.0)),
            Some(Scalar::Text("inf".to_string())),
        );
        assert!(row.coerce().is_none());
    }

    #[test]
    fn test_untyped_json_round_trip() {
        let json = r#"{
            "country_code": "BRA",
            "country_name": "Brazil",
            "region": "Latin America & Caribbean",
            "income_group": null,
            "metric_code": "NY.GDP.MKTP.KD.ZG",
            "metric_name": "GDP growth (annual %)",
            "multiplier": 1.0,
            "year": "2018",
            "value": 1.32
        }"#;
        let row: RawMeasurement = serde_json::from_str(json).unwrap();
        let m = row.coerce().unwrap();
        assert_eq!(m.country, "BRA");
        assert_eq!(m.year, 2018);
        assert_eq!(m.value, 1.32);
    }
}
