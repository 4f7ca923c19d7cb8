//! Shared builders for integration tests

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use hitfactor::types::{ScoreRun, ScoreSource};

/// Parse "M/D/YYYY" as a UTC midnight timestamp
pub fn date(s: &str) -> Option<DateTime<Utc>> {
    let parsed = NaiveDate::parse_from_str(s, "%m/%d/%Y").expect("fixture date");
    Some(parsed.and_hms_opt(0, 0, 0).expect("fixture time").and_utc())
}

/// Standard run with the usual fixture defaults
pub fn make_run(classifier: &str, division: &str, percent: f64, shot: &str) -> ScoreRun {
    ScoreRun {
        classifier: classifier.to_string(),
        division: division.to_string(),
        date: date(shot),
        percent,
        cur_percent: 0.0,
        rec_percent: 0.0,
        hit_factor: 0.0,
        source: ScoreSource::Standard,
    }
}

/// Major-match run; the calculator assigns these a fresh classifier code
pub fn make_major(division: &str, percent: f64, shot: &str) -> ScoreRun {
    ScoreRun {
        source: ScoreSource::MajorMatch,
        ..make_run("major", division, percent, shot)
    }
}

/// Attach a current-threshold percent to a run
pub fn with_cur(mut run: ScoreRun, cur_percent: f64) -> ScoreRun {
    run.cur_percent = cur_percent;
    run
}

/// Ideal sample at the survival quantiles of a known Weibull
pub fn synthetic_scores(k: f64, lambda: f64, n: usize) -> Vec<f64> {
    (1..=n)
        .map(|i| hitfactor::weibull::quantile(100.0 * i as f64 / (n as f64 + 1.0), k, lambda))
        .collect()
}
