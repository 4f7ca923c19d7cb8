//! Weibull fitting over score populations
//!
//! This module fits a two-parameter Weibull distribution to observed
//! scores by minimizing negative log-likelihood, with a choice of
//! optimizer, progress reporting, cancellation and a background-task
//! wrapper for async callers.

pub mod distribution;
pub mod fitter;
pub mod grid_search;
pub mod nelder_mead;
pub mod optimizer;
pub mod task;

// Re-export commonly used types
pub use distribution::{pdf, quantile, survival_percent, REFERENCE_SHAPE};
pub use fitter::{kurtosis, skewness, solve_weibull, FitConfig, WeibullFit};
pub use grid_search::GridSearch;
pub use nelder_mead::NelderMead;
pub use optimizer::{
    CancelToken, FitContext, FitObserver, OptimizerKind, ParamsAndLoss, WeibullOptimizer,
};
pub use task::{spawn_fit, FitHandle, FitProgress};
