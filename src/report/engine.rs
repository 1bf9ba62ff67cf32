use crate::analytics::{
    bottom_k, composite_scores, consecutive_deltas, endpoint_delta, median_window,
    normalize_metric, rank, top_k, Change, ChangeStrategy, NeighborComparator, NeighborPolicy,
    OutlierFilter, SeriesSet, SortOrder,
};
use crate::error::AnalyticsError;
use crate::report::views::{
    ChangeRow, ChangeSummary, FullReport, NeighborEntry, NeighborReport, RankedList, RankedRow,
    TopCountries, TopRow,
};
use crate::source::Snapshot;
use crate::utils::config::AnalysisConfig;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use tracing::info;

/// Whether a ranked list is aggregated per country or rolled up per
/// region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankScope {
    Countries,
    Regions,
}

impl FromStr for RankScope {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "countries" | "country" => Ok(RankScope::Countries),
            "regions" | "region" => Ok(RankScope::Regions),
            _ => Err(AnalyticsError::invalid_parameter("scope", s)),
        }
    }
}

/// Tunable policy for one engine instance.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisPolicy {
    pub neighbor: NeighborPolicy,
    pub min_fence_samples: usize,
    pub top_k: usize,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            neighbor: NeighborPolicy::default(),
            min_fence_samples: crate::analytics::DEFAULT_MIN_SAMPLES,
            top_k: 3,
        }
    }
}

impl From<&AnalysisConfig> for AnalysisPolicy {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            neighbor: NeighborPolicy {
                max_hops: config.max_hops,
                max_neighbors: config.max_neighbors,
            },
            min_fence_samples: config.min_fence_samples,
            top_k: config.top_k,
        }
    }
}

/// Assembles the analytics pipeline into the response views.
///
/// One engine is cheap and stateless; every method runs the full
/// pipeline against the snapshot it is handed and keeps nothing across
/// calls, so a single instance can serve concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportEngine {
    policy: AnalysisPolicy,
}

impl ReportEngine {
    pub fn new(policy: AnalysisPolicy) -> Self {
        Self { policy }
    }

    fn filter(&self) -> OutlierFilter {
        OutlierFilter::new(self.policy.min_fence_samples)
    }

    /// Which metrics changed most: consecutive deltas across every
    /// country, fenced per metric, averaged, tagged with the latest year
    /// the metric was observed changing.
    pub fn metric_movers(
        &self,
        snapshot: &Snapshot,
        order: SortOrder,
    ) -> Result<ChangeSummary, AnalyticsError> {
        let set = SeriesSet::from_rows(&snapshot.rows);
        if set.is_empty() {
            return Err(AnalyticsError::NoData);
        }

        let mut per_metric: BTreeMap<String, Vec<Change>> = BTreeMap::new();
        for (key, series) in &set.series {
            for change in consecutive_deltas(key, series) {
                per_metric.entry(key.metric.clone()).or_default().push(change);
            }
        }

        let mut scores: BTreeMap<String, f64> = BTreeMap::new();
        let mut years: BTreeMap<String, i32> = BTreeMap::new();
        for (metric, deltas) in per_metric {
            let kept = self.filter().retain(deltas, |c| c.delta);
            if kept.is_empty() {
                continue;
            }
            let avg = kept.iter().map(|c| c.delta).sum::<f64>() / kept.len() as f64;
            let year = kept.iter().map(|c| c.year).max().unwrap_or_default();
            scores.insert(metric.clone(), avg);
            years.insert(metric, year);
        }

        if scores.is_empty() {
            return Err(AnalyticsError::NoData);
        }

        let data = rank(scores, order)
            .into_iter()
            .map(|entry| ChangeRow {
                metric: set
                    .metrics
                    .get(&entry.entity)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| entry.entity.clone()),
                avg_change: entry.score,
                year: years[&entry.entity],
                metric_code: entry.entity,
            })
            .collect();

        Ok(ChangeSummary { data, order })
    }

    /// Leaders and laggards on one metric, per country or rolled up per
    /// region. The metric may be addressed by code or by display name.
    pub fn metric_leaders(
        &self,
        snapshot: &Snapshot,
        metric: &str,
        scope: RankScope,
        order: SortOrder,
        strategy: ChangeStrategy,
    ) -> Result<RankedList, AnalyticsError> {
        let set = SeriesSet::from_rows(&snapshot.rows);
        let Some(code) = resolve_metric(&set, metric) else {
            return Err(AnalyticsError::NoData);
        };
        let polarity = set.polarity(&code);
        let metric_name = set
            .metrics
            .get(&code)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| code.clone());

        let changes: Vec<Change> = set
            .series
            .iter()
            .filter(|(key, _)| key.metric == code)
            .filter_map(|(key, series)| endpoint_delta(key, series, strategy, polarity))
            .collect();
        if changes.is_empty() {
            return Err(AnalyticsError::NoData);
        }

        let kept = self.filter().retain(changes, |c| c.delta);
        info!(metric = %code, countries = kept.len(), %strategy, "ranking metric leaders");

        let data = match scope {
            RankScope::Countries => {
                let scores: BTreeMap<String, f64> =
                    kept.into_iter().map(|c| (c.country, c.delta)).collect();
                rank(scores, order)
                    .into_iter()
                    .map(|entry| RankedRow {
                        metric: metric_name.clone(),
                        country: Some(display_name(&set, &entry.entity)),
                        region: None,
                        value: entry.score,
                    })
                    .collect()
            }
            RankScope::Regions => {
                let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
                for change in kept {
                    let Some(region) = set
                        .countries
                        .get(&change.country)
                        .and_then(|c| c.region.clone())
                    else {
                        continue;
                    };
                    let cell = sums.entry(region).or_insert((0.0, 0));
                    cell.0 += change.delta;
                    cell.1 += 1;
                }
                let scores: BTreeMap<String, f64> = sums
                    .into_iter()
                    .map(|(region, (sum, count))| (region, sum / count as f64))
                    .collect();
                if scores.is_empty() {
                    return Err(AnalyticsError::NoData);
                }
                rank(scores, order)
                    .into_iter()
                    .map(|entry| RankedRow {
                        metric: metric_name.clone(),
                        country: None,
                        region: Some(entry.entity),
                        value: entry.score,
                    })
                    .collect()
            }
        };

        Ok(RankedList { data, order, strategy })
    }

    /// Overall top performers: each metric's latest values normalized
    /// onto [0, 1] across the population, averaged per country.
    pub fn top_countries(
        &self,
        snapshot: &Snapshot,
        order: SortOrder,
    ) -> Result<TopCountries, AnalyticsError> {
        let set = SeriesSet::from_rows(&snapshot.rows);
        if set.is_empty() {
            return Err(AnalyticsError::NoData);
        }

        let mut layers: Vec<BTreeMap<String, f64>> = Vec::new();
        for code in set.metrics.keys() {
            let latest: BTreeMap<String, f64> = set
                .metric_series(code)
                .filter_map(|(country, series)| {
                    series.last().map(|p| (country.to_string(), p.value))
                })
                .collect();
            if latest.is_empty() {
                continue;
            }
            layers.push(normalize_metric(&latest, set.polarity(code)));
        }

        let composite = composite_scores(layers.iter());
        if composite.is_empty() {
            return Err(AnalyticsError::NoData);
        }

        let data = rank(composite, order)
            .into_iter()
            .map(|entry| TopRow {
                country: display_name(&set, &entry.entity),
                value: entry.score,
            })
            .collect();

        Ok(TopCountries { data, order })
    }

    /// Trajectory comparison: the best, median and worst countries by
    /// average percentage change, each aligned against its geographic
    /// neighborhood.
    pub fn neighborhood(&self, snapshot: &Snapshot) -> Result<NeighborReport, AnalyticsError> {
        let set = SeriesSet::from_rows(&snapshot.rows);
        let scores = trajectory_scores(&set);
        if scores.is_empty() {
            return Err(AnalyticsError::NoData);
        }

        let ranked = rank(scores.clone(), SortOrder::Desc);
        let mut references: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for entry in top_k(&ranked, self.policy.top_k)
            .into_iter()
            .chain(median_window(&ranked))
            .chain(bottom_k(&ranked, self.policy.top_k))
        {
            if seen.insert(entry.entity.clone()) {
                references.push(entry.entity);
            }
        }

        let comparator = NeighborComparator::new(&snapshot.adjacency, self.policy.neighbor);
        let data = comparator
            .compare(&references, &scores)
            .into_iter()
            .map(|(code, comparison)| {
                let entry = NeighborEntry {
                    main_country_percentage: comparison.score,
                    neighboring_countries: comparison
                        .neighbors
                        .into_iter()
                        .map(|(n, s)| (display_name(&set, &n), s))
                        .collect(),
                };
                (display_name(&set, &code), entry)
            })
            .collect();

        Ok(NeighborReport { data })
    }

    /// Every view at once, for offline report generation. The leaders
    /// list follows the biggest mover; it is absent when no metric has
    /// enough data to rank.
    pub fn full_report(
        &self,
        snapshot: &Snapshot,
        order: SortOrder,
        strategy: ChangeStrategy,
    ) -> Result<FullReport, AnalyticsError> {
        let movers = self.metric_movers(snapshot, order)?;

        let leaders = match movers.data.first() {
            Some(row) => match self.metric_leaders(
                snapshot,
                &row.metric_code,
                RankScope::Countries,
                order,
                strategy,
            ) {
                Ok(list) => Some(list),
                Err(AnalyticsError::NoData) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };

        Ok(FullReport {
            generated_at: Utc::now(),
            movers,
            leaders,
            top_countries: self.top_countries(snapshot, order)?,
            neighborhood: self.neighborhood(snapshot)?,
        })
    }
}

/// Average endpoint-mode percentage change per country across all its
/// metrics. This is the score the neighborhood view aligns.
fn trajectory_scores(set: &SeriesSet) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (key, series) in &set.series {
        let polarity = set.polarity(&key.metric);
        let Some(change) = endpoint_delta(key, series, ChangeStrategy::Relative, polarity) else {
            continue;
        };
        let cell = sums.entry(change.country).or_insert((0.0, 0));
        cell.0 += change.delta;
        cell.1 += 1;
    }

    sums.into_iter()
        .map(|(country, (sum, count))| (country, sum / count as f64))
        .collect()
}

/// Address a metric by code first, then by display name.
fn resolve_metric(set: &SeriesSet, needle: &str) -> Option<String> {
    if set.metrics.contains_key(needle) {
        return Some(needle.to_string());
    }
    set.metrics
        .values()
        .find(|m| m.name.eq_ignore_ascii_case(needle))
        .map(|m| m.code.clone())
}

fn display_name(set: &SeriesSet, country_code: &str) -> String {
    set.countries
        .get(country_code)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| country_code.to_string())
}
