pub mod change;
pub mod neighbors;
pub mod normalize;
pub mod outlier;
pub mod rank;
pub mod series;

pub use change::{consecutive_deltas, endpoint_delta, Change, ChangeStrategy};
pub use neighbors::{NeighborComparator, NeighborComparison, NeighborPolicy};
pub use normalize::{composite_scores, normalize_metric, population_mean};
pub use outlier::{Fence, OutlierFilter, DEFAULT_MIN_SAMPLES};
pub use rank::{bottom_k, median_window, rank, top_k, RankedEntry, SortOrder};
pub use series::SeriesSet;
