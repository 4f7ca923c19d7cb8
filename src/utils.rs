//! Numeric primitives and small helpers shared across the engine
//!
//! Every comparison and dedup key in the engine goes through these rounding
//! helpers to keep floating-point drift out of the algorithm outputs.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Round to a fixed number of decimal digits
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Round at raw-score (hit factor) precision, 4 decimal digits
pub fn score_round(value: f64) -> f64 {
    round_to(value, 4)
}

/// Percent of `n` out of `total`, rounded to 2 decimal digits
pub fn percent(n: f64, total: f64) -> f64 {
    percent_rounded(n, total, 2)
}

/// Percent of `n` out of `total`, rounded to `digits` decimal digits
pub fn percent_rounded(n: f64, total: f64, digits: u32) -> f64 {
    round_to(100.0 * n / total, digits)
}

/// Sentinel for "not computable": negative inputs collapse to -1
pub fn positive_or_minus_one(value: f64) -> f64 {
    if value >= 0.0 {
        value
    } else {
        -1.0
    }
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Generate a unique classifier code for a major-match score
///
/// Major-match scores are always eligible for reclassification, so each one
/// gets a code no other score can collide with.
pub fn generate_major_code() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(93.5433333, 2), 93.54);
        assert_eq!(round_to(77.8333333, 2), 77.83);
        assert_eq!(round_to(1.2345678, 4), 1.2346);
        assert_eq!(round_to(100.0, 2), 100.0);
        assert_eq!(round_to(-2.675, 0), -3.0);
    }

    #[test]
    fn test_score_round() {
        assert_eq!(score_round(9.123456), 9.1235);
        assert_eq!(score_round(0.00004), 0.0);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1.0, 4.0), 25.0);
        assert_eq!(percent(2.0, 3.0), 66.67);
        assert_eq!(percent_rounded(1.0, 3.0, 4), 33.3333);
        assert_eq!(percent(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_positive_or_minus_one() {
        assert_eq!(positive_or_minus_one(12.5), 12.5);
        assert_eq!(positive_or_minus_one(0.0), 0.0);
        assert_eq!(positive_or_minus_one(-0.0001), -1.0);
        assert_eq!(positive_or_minus_one(-42.0), -1.0);
    }

    #[test]
    fn test_generate_major_code_unique() {
        let code1 = generate_major_code();
        let code2 = generate_major_code();
        assert_ne!(code1, code2);
    }
}
