//! Quartile-based outlier suppression.
//!
//! Development indicator deltas are littered with data-quality artifacts:
//! a rebased currency or a near-zero denominator can show up as a
//! million-percent "change". The fence keeps everything inside
//! [Q1 - 1.5*IQR, Q3 + 1.5*IQR] and drops the rest, preserving the
//! association between each delta and the item it was computed for.

use tracing::trace;

/// Quartiles below this population size are not meaningful, so smaller
/// groups pass through unfiltered.
pub const DEFAULT_MIN_SAMPLES: usize = 4;

/// The inclusive bounds computed from one grouping of deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fence {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fence {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OutlierFilter {
    min_samples: usize,
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self { min_samples: DEFAULT_MIN_SAMPLES }
    }
}

impl OutlierFilter {
    pub fn new(min_samples: usize) -> Self {
        Self { min_samples }
    }

    /// Compute the fence for one grouping, or None when the grouping is
    /// below the documented floor.
    pub fn fence(&self, values: &[f64]) -> Option<Fence> {
        if values.len() < self.min_samples.max(2) {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;

        Some(Fence {
            q1,
            q3,
            lower: q1 - 1.5 * iqr,
            upper: q3 + 1.5 * iqr,
        })
    }

    /// Keep the items whose delta sits inside the fence. Groupings below
    /// the floor are returned untouched.
    pub fn retain<T, F>(&self, items: Vec<T>, value_of: F) -> Vec<T>
    where
        F: Fn(&T) -> f64,
    {
        let values: Vec<f64> = items.iter().map(&value_of).collect();
        let Some(fence) = self.fence(&values) else {
            return items;
        };

        let before = items.len();
        let kept: Vec<T> = items
            .into_iter()
            .filter(|item| fence.contains(value_of(item)))
            .collect();
        trace!(before, after = kept.len(), ?fence, "applied outlier fence");
        kept
    }
}

/// Quantile by linear interpolation between closest ranks, the estimator
/// the original pandas pipeline used: position = tau * (n - 1), then
/// interpolate between the flanking order statistics.
fn quantile(sorted: &[f64], tau: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let position = tau * (sorted.len() - 1) as f64;
    let lo = position.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let fraction = position - lo as f64;

    sorted[lo] + fraction * (sorted[hi] - sorted[lo])
}
