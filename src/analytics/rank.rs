use crate::error::AnalyticsError;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort direction for ranked output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl FromStr for SortOrder {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(AnalyticsError::invalid_parameter("order", s)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// One entry of a ranked result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub entity: String,
    pub score: f64,
}

/// Produce a totally ordered ranking from a score map.
///
/// Ties are broken by entity identity ascending regardless of direction,
/// so identical inputs always produce identical output. Non-finite
/// scores are excluded up front; the numeric policies upstream mean they
/// should not occur, and if one slips through it must not poison the
/// ordering.
pub fn rank<I>(scores: I, order: SortOrder) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut entries: Vec<RankedEntry> = scores
        .into_iter()
        .filter(|(_, score)| score.is_finite())
        .map(|(entity, score)| RankedEntry { entity, score })
        .collect();

    entries.sort_by(|a, b| {
        let by_score = match order {
            SortOrder::Asc => a.score.total_cmp(&b.score),
            SortOrder::Desc => b.score.total_cmp(&a.score),
        };
        match by_score {
            Ordering::Equal => a.entity.cmp(&b.entity),
            other => other,
        }
    });
    entries
}

/// First k entries after sort.
pub fn top_k(ranked: &[RankedEntry], k: usize) -> Vec<RankedEntry> {
    ranked.iter().take(k).cloned().collect()
}

/// Last k entries after sort, in sorted order.
pub fn bottom_k(ranked: &[RankedEntry], k: usize) -> Vec<RankedEntry> {
    let start = ranked.len().saturating_sub(k);
    ranked[start..].to_vec()
}

/// The three entries around the middle of the ranking: indices
/// floor(n/2) - 1, floor(n/2), floor(n/2) + 1.
///
/// Small populations make some of those indices fall outside the
/// ranking; out-of-range picks are simply absent, never an index fault.
pub fn median_window(ranked: &[RankedEntry]) -> Vec<RankedEntry> {
    if ranked.is_empty() {
        return Vec::new();
    }
    let center = ranked.len() / 2;

    [center.checked_sub(1), Some(center), Some(center + 1)]
        .into_iter()
        .flatten()
        .filter(|&idx| idx < ranked.len())
        .map(|idx| ranked[idx].clone())
        .collect()
}
