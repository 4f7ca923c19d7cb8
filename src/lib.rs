//! Hitfactor - Statistical classification engine for practical shooting
//!
//! This crate computes windowed shooter classifications, fits Weibull
//! distributions to classifier score populations, and derives
//! recommended score thresholds from curated percentile targets.

pub mod classification;
pub mod config;
pub mod error;
pub mod threshold;
pub mod types;
pub mod utils;
pub mod weibull;

// Re-export commonly used types and traits
pub use error::{EngineError, Result};
pub use types::*;

// Re-export key components
pub use classification::{compute_classification, ClassificationCalculator};
pub use threshold::{log10_threshold_search, rank_scores, recommended_for};
pub use weibull::{solve_weibull, spawn_fit, WeibullFit};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
