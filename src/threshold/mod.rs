//! Recommended threshold calculation
//!
//! Two strategies for deriving a recommended top-score threshold from a
//! classifier's score population: nearest-percentile matching against
//! curated per-division targets, and a multi-target log10 line search
//! over candidate thresholds.

pub mod line_search;
pub mod percentile;

// Re-export commonly used types
pub use line_search::{
    log10_threshold_search, log10_threshold_search_weibull, DEFAULT_SEARCH_STEP,
};
pub use percentile::{
    rank_scores, recommended_by_percentile_and_percent, recommended_for, RankedScore,
};
