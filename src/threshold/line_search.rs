//! Multi-target log10 line search
//!
//! Walks candidate thresholds down from the maximum observed score and
//! keeps the one whose tail shares best match a set of
//! (percentile, percent-of-threshold) targets, measured in log10 ratio.

use std::cmp::Ordering;

use crate::config::calibration::LogTarget;
use crate::error::Result;
use crate::weibull::distribution::survival_percent;
use crate::weibull::fitter::{solve_weibull, FitConfig};
use crate::weibull::optimizer::FitContext;

pub const DEFAULT_SEARCH_STEP: f64 = 0.0001;

fn sorted_descending(scores: &[f64]) -> Vec<f64> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    sorted
}

/// Number of scores at or above `threshold` in a descending-sorted slice
fn count_at_or_above(sorted: &[f64], threshold: f64) -> usize {
    sorted.partition_point(|&score| score >= threshold)
}

/// Walk candidates down from `max` by `step`, keeping the first strict
/// loss improvement. Candidates with infinite loss are never adopted.
fn best_candidate(max: f64, step: f64, loss: impl Fn(f64) -> f64) -> f64 {
    let mut best = max;
    let mut min_loss = f64::INFINITY;
    let mut candidate = max;
    while candidate > 0.0 {
        let loss_here = loss(candidate);
        if loss_here < min_loss {
            best = candidate;
            min_loss = loss_here;
        }
        candidate -= step;
    }
    best
}

/// Find the threshold whose observed tail counts best match `targets`.
///
/// Returns 0 for empty input.
pub fn log10_threshold_search(scores: &[f64], targets: &[LogTarget], step: f64) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sorted = sorted_descending(scores);
    let total = sorted.len() as f64;

    best_candidate(sorted[0], step, |candidate| {
        targets
            .iter()
            .map(|&(percentile, percent)| {
                let count = count_at_or_above(&sorted, percent * candidate) as f64;
                (count / total / percentile).log10().abs()
            })
            .sum()
    })
}

/// Same search with the tail read off a fitted Weibull instead of raw
/// counts, smoothing out small populations.
pub fn log10_threshold_search_weibull(
    scores: &[f64],
    targets: &[LogTarget],
    step: f64,
) -> Result<f64> {
    if scores.is_empty() {
        return Ok(0.0);
    }
    let fit = solve_weibull(scores, &FitConfig::default(), &mut FitContext::none())?;
    let sorted = sorted_descending(scores);

    Ok(best_candidate(sorted[0], step, |candidate| {
        targets
            .iter()
            .map(|&(percentile, percent)| {
                let observed = survival_percent(percent * candidate, fit.k, fit.lambda) / 100.0;
                (observed / percentile).log10().abs()
            })
            .sum()
    }))
}
