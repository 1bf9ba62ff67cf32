use crate::data::Polarity;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Min-max rescaling of one metric's values onto [0, 1].
///
/// Unlike metrics (percentages, currency, counts) become comparable by
/// rescaling each against its own population extremes. The polarity
/// factor is applied first, so 1.0 always means "best observed" even for
/// metrics where lower raw values are better.
///
/// Degenerate-metric policy: when every subject reports the same value
/// the span is zero and every normalized score is defined as 0. The
/// metric then contributes nothing to composite ranking instead of
/// raising a division fault.
pub fn normalize_metric(
    values: &BTreeMap<String, f64>,
    polarity: Polarity,
) -> BTreeMap<String, f64> {
    if values.is_empty() {
        return BTreeMap::new();
    }

    let scaled: Vec<f64> = values.values().map(|v| v * polarity.factor()).collect();
    let min = Statistics::min(scaled.iter());
    let max = Statistics::max(scaled.iter());
    let span = max - min;

    values
        .iter()
        .map(|(subject, v)| {
            let score = if span == 0.0 {
                0.0
            } else {
                (v * polarity.factor() - min) / span
            };
            (subject.clone(), score)
        })
        .collect()
}

/// Composite score per subject: the mean of its normalized values across
/// every metric layer in which it appears.
pub fn composite_scores<'a, I>(layers: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a BTreeMap<String, f64>>,
{
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for layer in layers {
        for (subject, score) in layer {
            let cell = sums.entry(subject.clone()).or_insert((0.0, 0));
            cell.0 += score;
            cell.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(subject, (sum, count))| (subject, sum / count as f64))
        .collect()
}

/// Second-level aggregation: the population mean of a score map, used
/// for reference rows that summarize a whole group's position.
pub fn population_mean(scores: &BTreeMap<String, f64>) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(Statistics::mean(scores.values()))
}
