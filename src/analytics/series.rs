use crate::data::{
    Country, Metric, Polarity, RawMeasurement, Series, SeriesKey, SeriesPoint,
};
use std::collections::BTreeMap;
use tracing::debug;

/// All series built from one snapshot, plus the metric and country
/// catalogs observed while building them.
///
/// Construction is the first pipeline stage:
/// 1. Coerce year and value to numeric, dropping rows that fail
/// 2. Aggregate duplicate (country, metric, year) keys by arithmetic mean
/// 3. Group by (country, metric)
/// 4. Sort each group by year ascending
///
/// A group that ends up empty after coercion is simply absent from the
/// output; that is not an error.
#[derive(Debug, Clone, Default)]
pub struct SeriesSet {
    pub series: BTreeMap<SeriesKey, Series>,
    pub metrics: BTreeMap<String, Metric>,
    pub countries: BTreeMap<String, Country>,
}

impl SeriesSet {
    pub fn from_rows(rows: &[RawMeasurement]) -> Self {
        let mut set = SeriesSet::default();
        let mut dropped = 0usize;

        // Sums and counts per full identity; BTreeMap keeps keys sorted so
        // groups come out contiguous and year-ascending for free.
        let mut cells: BTreeMap<(String, String, i32), (f64, usize)> = BTreeMap::new();

        for row in rows {
            set.observe_catalog(row);

            let Some(m) = row.coerce() else {
                dropped += 1;
                continue;
            };
            let cell = cells.entry((m.country, m.metric, m.year)).or_insert((0.0, 0));
            cell.0 += m.value;
            cell.1 += 1;
        }

        if dropped > 0 {
            debug!(dropped, total = rows.len(), "dropped non-coercible measurement rows");
        }

        let mut grouped: BTreeMap<SeriesKey, Vec<SeriesPoint>> = BTreeMap::new();
        for ((country, metric, year), (sum, count)) in cells {
            grouped
                .entry(SeriesKey { country, metric })
                .or_default()
                .push(SeriesPoint { year, value: sum / count as f64 });
        }
        for (key, points) in grouped {
            set.series.insert(key, Series::from_sorted(points));
        }

        set
    }

    /// Fold display fields into the catalogs. The first row naming an
    /// entity wins; later rows only fill fields still missing.
    fn observe_catalog(&mut self, row: &RawMeasurement) {
        let metric = self
            .metrics
            .entry(row.metric_code.clone())
            .or_insert_with(|| Metric {
                code: row.metric_code.clone(),
                name: row.metric_name.clone().unwrap_or_else(|| row.metric_code.clone()),
                polarity: Polarity::from_multiplier(row.multiplier),
            });
        if metric.name == metric.code {
            if let Some(name) = &row.metric_name {
                metric.name = name.clone();
            }
        }

        let country = self
            .countries
            .entry(row.country_code.clone())
            .or_insert_with(|| Country {
                code: row.country_code.clone(),
                name: row.country_name.clone().unwrap_or_else(|| row.country_code.clone()),
                region: row.region.clone(),
                income_group: row.income_group.clone(),
            });
        if country.region.is_none() {
            country.region = row.region.clone();
        }
        if country.income_group.is_none() {
            country.income_group = row.income_group.clone();
        }
    }

    /// All series for one metric, keyed by country code.
    pub fn metric_series<'a>(
        &'a self,
        metric_code: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Series)> + 'a {
        self.series
            .iter()
            .filter(move |(key, _)| key.metric == metric_code)
            .map(|(key, series)| (key.country.as_str(), series))
    }

    /// Polarity of a metric, defaulting to direct for metrics the
    /// snapshot never described.
    pub fn polarity(&self, metric_code: &str) -> Polarity {
        self.metrics
            .get(metric_code)
            .map(|m| m.polarity)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
