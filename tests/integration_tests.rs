//! Integration tests for the classification engine
//!
//! These tests validate the entire pipeline working together, including:
//! - Multi-division classification over a chronological score history
//! - Window trimming, duplicate handling and flag-gated eligibility
//! - Percent-basis selection (historical, current, capped and uncapped)
//! - Major-match reclassification and weighted averaging
//! - Malformed-record handling

// Modules for organizing tests
mod fixtures;

use chrono::{DateTime, Utc};
use hitfactor::classification::{compute_classification, ClassLetter};
use hitfactor::types::{Mode, PercentField, PercentSnapshot, ScoreRun};

use fixtures::{date, make_major, make_run, with_cur};

const WINDOW: usize = 8;

fn now() -> DateTime<Utc> {
    date("11/10/2023").unwrap()
}

/// Chronological history across three divisions.
///
/// "ltd" walks from C-grade scores up to Master and carries one
/// rejected low score plus one duplicate classifier; "co" and "opt"
/// fill their windows in four runs each.
fn reference_runs() -> Vec<ScoreRun> {
    let mut runs = vec![
        with_cur(make_run("99-11", "ltd", 70.0, "1/10/2023"), 72.0),
        with_cur(make_run("99-12", "ltd", 80.0, "2/10/2023"), 82.0),
        with_cur(make_run("99-13", "ltd", 60.0, "3/10/2023"), 62.0),
        with_cur(make_run("99-14", "ltd", 90.0, "4/10/2023"), 92.0),
        with_cur(make_run("99-15", "ltd", 85.0, "5/10/2023"), 87.0),
        with_cur(make_run("99-16", "ltd", 95.0, "6/10/2023"), 97.0),
        with_cur(make_run("99-17", "ltd", 50.0, "7/10/2023"), 52.0),
        with_cur(make_run("99-18", "ltd", 75.0, "8/10/2023"), 77.0),
        with_cur(make_run("99-14", "ltd", 99.0, "9/10/2023"), 101.0),
        with_cur(make_run("99-19", "ltd", 88.0, "10/10/2023"), 90.0),
    ];
    runs.extend([
        with_cur(make_run("20-01", "co", 88.0, "1/15/2023"), 90.0),
        with_cur(make_run("20-02", "co", 92.0, "2/15/2023"), 94.0),
        with_cur(make_run("20-03", "co", 96.0, "3/15/2023"), 98.0),
        with_cur(make_run("20-04", "co", 100.0, "4/15/2023"), 102.0),
    ]);
    runs.extend([
        with_cur(make_run("21-01", "opt", 95.0, "5/15/2023"), 104.0),
        with_cur(make_run("21-02", "opt", 96.0, "6/15/2023"), 108.0),
        with_cur(make_run("21-03", "opt", 97.0, "7/15/2023"), 112.0),
        with_cur(make_run("21-04", "opt", 98.0, "8/15/2023"), 116.0),
    ]);
    runs
}

#[test]
fn test_empty_input_yields_zeroed_divisions() {
    let result = compute_classification(&[], PercentField::Percent, now(), Mode::uspsa(), WINDOW);

    assert_eq!(result.len(), 13);
    for (_, division) in &result {
        assert_eq!(division.percent, 0.0);
        assert_eq!(division.high_percent, 0.0);
        assert_eq!(division.class_letter, ClassLetter::U);
        assert_eq!(division.age, None);
        assert_eq!(division.age1, None);
        assert!(division.history.is_empty());
    }
}

#[test]
fn test_multi_division_historical_percent() {
    let result = compute_classification(
        &reference_runs(),
        PercentField::Percent,
        now(),
        Mode::uspsa(),
        WINDOW,
    );

    // the 50% run is flag-rejected, the duplicate keeps its better value,
    // and the ninth distinct code trims then regrows the window
    let ltd = &result["ltd"];
    assert_eq!(ltd.percent, 87.0);
    assert_eq!(ltd.high_percent, 87.0);
    assert_eq!(ltd.class_letter, ClassLetter::M);
    let expected_history: Vec<PercentSnapshot> = [
        (75.0, "4/10/2023"),
        (77.0, "5/10/2023"),
        (80.0, "6/10/2023"),
        (82.5, "8/10/2023"),
        (84.0, "9/10/2023"),
        (87.0, "10/10/2023"),
    ]
    .iter()
    .map(|&(percent, shot)| PercentSnapshot {
        percent,
        date: date(shot),
    })
    .collect();
    assert_eq!(ltd.history, expected_history);

    let co = &result["co"];
    assert_eq!(co.percent, 94.0);
    assert_eq!(co.high_percent, 94.0);
    assert_eq!(co.class_letter, ClassLetter::M);
    assert_eq!(co.history.len(), 1);

    let opt = &result["opt"];
    assert_eq!(opt.percent, 96.5);
    assert_eq!(opt.class_letter, ClassLetter::GM);

    // untouched divisions stay zeroed but present
    assert_eq!(result["rev"].percent, 0.0);
    assert_eq!(result["rev"].class_letter, ClassLetter::U);
}

#[test]
fn test_window_ages() {
    let result = compute_classification(
        &reference_runs(),
        PercentField::Percent,
        now(),
        Mode::uspsa(),
        WINDOW,
    );

    // scored subset dates: 9/10, 6/10, 10/10, 5/10, 2/10, 8/10 against 11/10
    let ltd = &result["ltd"];
    let expected_age = 794.0 / 28.0 / 6.0;
    assert!((ltd.age.unwrap() - expected_age).abs() < 1e-9);
    assert_eq!(ltd.age1.unwrap(), 31.0 / 28.0);

    let co = &result["co"];
    assert!((co.age.unwrap() - 1016.0 / 28.0 / 4.0).abs() < 1e-9);
    assert_eq!(co.age1.unwrap(), 209.0 / 28.0);
}

#[test]
fn test_current_percent_basis() {
    let result = compute_classification(
        &reference_runs(),
        PercentField::CurPercent,
        now(),
        Mode::uspsa(),
        WINDOW,
    );

    // co goes grandmaster on the current basis, which raises the
    // cross-division floor to 85 and rejects the 77% run
    let ltd = &result["ltd"];
    assert_eq!(ltd.percent, 88.0);
    assert_eq!(ltd.high_percent, 88.0);
    assert_eq!(ltd.class_letter, ClassLetter::M);
    assert_eq!(ltd.history.len(), 5);
    assert!((ltd.history[3].percent - 500.0 / 6.0).abs() < 1e-9);

    let co = &result["co"];
    assert_eq!(co.percent, 95.5);
    assert_eq!(co.class_letter, ClassLetter::GM);

    // entries above 100 are capped per score, not per window
    assert_eq!(result["opt"].percent, 100.0);
}

#[test]
fn test_uncapped_mode_exceeds_hundred() {
    let mode: Mode = "uspsa+uncapped".parse().unwrap();
    let result = compute_classification(
        &reference_runs(),
        PercentField::CurPercent,
        now(),
        mode,
        WINDOW,
    );

    assert_eq!(result["opt"].percent, 110.0);
    assert_eq!(result["opt"].class_letter, ClassLetter::GM);
    assert_eq!(result["co"].percent, 96.0);
}

#[test]
fn test_major_match_scores_reclassify() {
    let runs = vec![
        with_cur(make_run("99-11", "ss", 70.0, "1/3/2023"), 72.0),
        make_major("ss", 85.0, "2/3/2023"),
        make_major("ss", 90.0, "3/3/2023"),
        make_major("ss", 95.0, "4/3/2023"),
    ];

    // majors get fresh classifier codes, so four distinct entries score
    let result = compute_classification(&runs, PercentField::Percent, now(), Mode::uspsa(), WINDOW);
    assert_eq!(result["ss"].percent, 85.0);
    assert_eq!(result["ss"].class_letter, ClassLetter::M);

    // majors also backfill their current percent from the historical one
    let result =
        compute_classification(&runs, PercentField::CurPercent, now(), Mode::uspsa(), WINDOW);
    assert_eq!(result["ss"].percent, 85.5);
}

#[test]
fn test_weighted_mode_round_counts() {
    let runs = vec![
        make_run("20-01", "prod", 80.0, "1/5/2023"),
        make_run("22-05", "prod", 90.0, "2/5/2023"),
        make_run("CM 06-10", "prod", 60.0, "3/5/2023"),
        make_run("99-24", "prod", 70.0, "4/5/2023"),
        make_run("23-99", "prod", 95.0, "5/5/2023"),
    ];

    // 12, 24, 6 and 12 round classifiers; the unknown code is dropped
    let weighted: Mode = "uspsa+weighted".parse().unwrap();
    let result = compute_classification(&runs, PercentField::Percent, now(), weighted, WINDOW);
    assert_eq!(result["prod"].percent, 80.0);
    assert_eq!(result["prod"].history.len(), 1);

    // unweighted keeps the unknown code and averages five scores
    let result = compute_classification(&runs, PercentField::Percent, now(), Mode::uspsa(), WINDOW);
    assert_eq!(result["prod"].percent, 79.0);
}

#[test]
fn test_unknown_division_skipped() {
    let mut runs = reference_runs();
    runs.push(make_run("99-20", "xyz", 90.0, "9/15/2023"));

    let result = compute_classification(&runs, PercentField::Percent, now(), Mode::uspsa(), WINDOW);
    assert_eq!(result.len(), 13);
    assert!(!result.contains_key("xyz"));
    assert_eq!(result["ltd"].percent, 87.0);
}

#[test]
fn test_soft_mode_ignores_flags() {
    // the 50% run is admitted without flag gating, displacing nothing
    // but dragging the sixth-best score down
    let ltd_only: Vec<ScoreRun> = reference_runs()
        .into_iter()
        .filter(|run| run.division == "ltd")
        .collect();

    let uspsa = compute_classification(
        &ltd_only,
        PercentField::Percent,
        now(),
        Mode::uspsa(),
        WINDOW,
    );
    let soft =
        compute_classification(&ltd_only, PercentField::Percent, now(), Mode::soft(), WINDOW);

    assert_eq!(uspsa["ltd"].history.len(), 6);
    assert_eq!(soft["ltd"].history.len(), 7);
    assert_eq!(uspsa["ltd"].percent, 87.0);
    assert_eq!(soft["ltd"].percent, 87.0);
}
