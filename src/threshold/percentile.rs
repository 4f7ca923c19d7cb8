//! Nearest-percentile threshold recommendation

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::calibration::ThresholdTargets;
use crate::utils::{percent, positive_or_minus_one, score_round};

/// Score annotated with its rank percentile within a population
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedScore {
    pub score: f64,
    /// Share of the population ranked strictly above this score, 0 to 100
    pub percentile: f64,
}

/// Sort scores descending and attach rank percentiles.
///
/// The top score sits at percentile 0.
pub fn rank_scores(scores: &[f64]) -> Vec<RankedScore> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    let total = sorted.len();
    sorted
        .into_iter()
        .enumerate()
        .map(|(index, score)| RankedScore {
            score,
            percentile: positive_or_minus_one(percent(index as f64, total as f64)),
        })
        .collect()
}

/// Recommend a threshold by matching a rank percentile to a percent level.
///
/// Picks the run whose percentile is nearest `target_percentile` (first
/// one wins on ties) and scales its score so that it would sit at
/// `target_percent` of the recommendation. Returns 0 for an empty
/// population.
pub fn recommended_by_percentile_and_percent(
    runs: &[RankedScore],
    target_percentile: f64,
    target_percent: f64,
) -> f64 {
    let closest = runs.iter().min_by(|a, b| {
        let da = (a.percentile - target_percentile).abs();
        let db = (b.percentile - target_percentile).abs();
        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
    });
    match closest {
        Some(run) => {
            score_round(run.score * run.percentile / target_percentile / (target_percent / 100.0))
        }
        None => 0.0,
    }
}

/// Recommend a threshold for one classifier in one division.
///
/// Classifiers without a curated target assignment get a disabled
/// recommendation of zero.
pub fn recommended_for(
    division: &str,
    classifier: &str,
    scores: &[f64],
    targets: &ThresholdTargets,
) -> f64 {
    match targets.preset_for(division, classifier) {
        Some(preset) => {
            let ranked = rank_scores(scores);
            recommended_by_percentile_and_percent(&ranked, preset.percentile(), preset.percent())
        }
        None => {
            debug!(
                "No curated targets for {}/{}, recommendation disabled",
                division, classifier
            );
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 100 scores descending from 100 so rank percentiles are whole numbers
    fn graded_population() -> Vec<f64> {
        (1..=100).map(|i| (101 - i) as f64).collect()
    }

    #[test]
    fn test_rank_scores_percentiles() {
        let ranked = rank_scores(&[10.0, 40.0, 20.0, 30.0]);
        assert_eq!(ranked[0].score, 40.0);
        assert_eq!(ranked[0].percentile, 0.0);
        assert_eq!(ranked[1].percentile, 25.0);
        assert_eq!(ranked[2].percentile, 50.0);
        assert_eq!(ranked[3].percentile, 75.0);
    }

    #[test]
    fn test_empty_population_recommends_zero() {
        assert_eq!(recommended_by_percentile_and_percent(&[], 1.0, 95.0), 0.0);
    }

    #[test]
    fn test_exact_percentile_match() {
        // percentile 5 run scores 95, asked to sit at 85% of the threshold
        let ranked = rank_scores(&graded_population());
        let rec = recommended_by_percentile_and_percent(&ranked, 5.0, 85.0);
        assert_eq!(rec, score_round(95.0 / 0.85));
        assert_eq!(rec, 111.7647);
    }

    #[test]
    fn test_top_rank_percentile_zero_disables() {
        // nearest to 4.75 among {0, 25, 50, 75} is the top run at 0
        let ranked = rank_scores(&[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(
            recommended_by_percentile_and_percent(&ranked, 4.75, 85.0),
            0.0
        );
    }

    #[test]
    fn test_tie_keeps_first_run() {
        let runs = [
            RankedScore {
                score: 50.0,
                percentile: 4.0,
            },
            RankedScore {
                score: 80.0,
                percentile: 6.0,
            },
        ];
        // both sides are 1 away from 5, the earlier run wins
        assert_eq!(
            recommended_by_percentile_and_percent(&runs, 5.0, 100.0),
            40.0
        );
    }

    #[test]
    fn test_recommended_for_curated_classifier() {
        let targets = ThresholdTargets::builtin();
        let rec = recommended_for("co", "20-01", &graded_population(), &targets);
        // 20-01 in co carries the 1st-percentile preset
        assert_eq!(rec, score_round(99.0 / 0.95));
    }

    #[test]
    fn test_recommended_for_unassigned_classifier() {
        let targets = ThresholdTargets::builtin();
        assert_eq!(
            recommended_for("co", "99-99", &graded_population(), &targets),
            0.0
        );
    }
}
