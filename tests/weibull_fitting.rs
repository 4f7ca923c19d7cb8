//! Integration tests for Weibull fitting and threshold recommendation
//!
//! These tests validate the fitting pipeline end to end, including:
//! - Agreement between the grid and simplex optimizers
//! - Concurrent background fits over independent populations
//! - Curated-target and line-search threshold recommendations

// Modules for organizing tests
mod fixtures;

use hitfactor::config::calibration::{ThresholdTargets, HFI_TARGETS};
use hitfactor::config::engine::FitSettings;
use hitfactor::threshold::{
    log10_threshold_search, log10_threshold_search_weibull, recommended_for,
};
use hitfactor::weibull::{solve_weibull, spawn_fit, FitConfig, FitContext, OptimizerKind};

use fixtures::synthetic_scores;

#[test]
fn test_optimizers_agree() {
    let data = synthetic_scores(3.6, 10.0, 150);
    let grid = solve_weibull(&data, &FitConfig::default(), &mut FitContext::none()).unwrap();
    let nm_config = FitConfig::default().with_optimizer(OptimizerKind::NelderMead);
    let nm = solve_weibull(&data, &nm_config, &mut FitContext::none()).unwrap();

    // the simplex refines below the grid's step resolution
    assert!(nm.loss <= grid.loss, "nm {} vs grid {}", nm.loss, grid.loss);

    let diff = (nm.hhf5 - grid.hhf5).abs();
    let ratio = (nm.hhf5 / grid.hhf5).max(grid.hhf5 / nm.hhf5);
    assert!(
        diff < 0.01 || ratio <= 1.01,
        "hhf5 diverged: nm {} vs grid {}",
        nm.hhf5,
        grid.hhf5
    );
}

#[tokio::test]
async fn test_background_fits_run_concurrently() {
    let settings = FitSettings::default();
    let scales = [4.0, 6.0, 8.0, 10.0];
    let handles: Vec<_> = scales
        .iter()
        .map(|&lambda| spawn_fit(synthetic_scores(3.6, lambda, 80), &settings).unwrap())
        .collect();

    let fits = futures::future::join_all(handles.into_iter().map(|handle| handle.join())).await;
    for (fit, expected) in fits.into_iter().zip(scales) {
        let fit = fit.unwrap();
        assert!(
            (fit.lambda - expected).abs() / expected < 0.15,
            "lambda {} vs {}",
            fit.lambda,
            expected
        );
    }
}

#[test]
fn test_recommendation_pipeline() {
    let scores = synthetic_scores(3.6, 10.0, 200);
    let targets = ThresholdTargets::builtin();

    // 20-01 in co is a curated 1st-percentile classifier
    let curated = recommended_for("co", "20-01", &scores, &targets);
    assert!(curated > 10.0 && curated < 20.0, "curated = {curated}");

    let disabled = recommended_for("co", "99-99", &scores, &targets);
    assert_eq!(disabled, 0.0);

    // the line search lands in the same neighborhood
    let searched = log10_threshold_search(&scores, HFI_TARGETS, 0.001);
    assert!(
        (searched - curated).abs() < 3.0,
        "searched {searched} vs curated {curated}"
    );
}

#[test]
fn test_smoothed_search_matches_empirical() {
    let scores = synthetic_scores(3.6, 10.0, 200);

    let empirical = log10_threshold_search(&scores, HFI_TARGETS, 0.001);
    let smoothed = log10_threshold_search_weibull(&scores, HFI_TARGETS, 0.001).unwrap();

    assert!(empirical > 14.0 && empirical < 18.0, "empirical = {empirical}");
    assert!(smoothed > 14.0 && smoothed < 18.0, "smoothed = {smoothed}");
    assert!((empirical - smoothed).abs() < 1.5);
}
