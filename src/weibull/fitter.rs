//! Weibull fitting entrypoint
//!
//! Runs the configured optimizer over the negative log-likelihood surface
//! and derives the threshold candidates and goodness-of-fit diagnostics
//! from the winning (k, lambda) pair.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::engine::FitSettings;
use crate::error::Result;
use crate::weibull::distribution::{
    initial_guess, neg_log_likelihood, quantile, survival_percent, REFERENCE_SHAPE,
};
use crate::weibull::grid_search::GridSearch;
use crate::weibull::nelder_mead::NelderMead;
use crate::weibull::optimizer::{FitContext, OptimizerKind, ParamsAndLoss, WeibullOptimizer};

/// Typed fitting knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    pub precision: u32,
    pub optimizer: OptimizerKind,
    pub max_iterations: u32,
    pub stall_iterations: u32,
}

impl Default for FitConfig {
    fn default() -> Self {
        let settings = FitSettings::default();
        Self {
            precision: settings.precision,
            optimizer: OptimizerKind::default(),
            max_iterations: settings.max_iterations,
            stall_iterations: settings.stall_iterations,
        }
    }
}

impl FitConfig {
    pub fn from_settings(settings: &FitSettings) -> Result<Self> {
        Ok(Self {
            precision: settings.precision,
            optimizer: settings.optimizer.parse()?,
            max_iterations: settings.max_iterations,
            stall_iterations: settings.stall_iterations,
        })
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.optimizer = optimizer;
        self
    }
}

/// Fitted distribution, threshold candidates and diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeibullFit {
    pub k: f64,
    pub lambda: f64,
    pub loss: f64,
    /// Mean log-likelihood per data point
    pub mean_ll: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    /// Threshold candidates from the 1/5/15 survival percentiles
    pub hhf1: f64,
    pub hhf5: f64,
    pub hhf15: f64,
    /// Fitted survival curve vs the empirical step curve
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    /// Same errors at the reference shape with the fitted scale
    pub super_mean_absolute_error: f64,
    pub super_mean_squared_error: f64,
    pub max_error: f64,
}

impl WeibullFit {
    /// Defined result for an empty population
    pub fn empty() -> Self {
        Self {
            k: 1.0,
            lambda: 1.0,
            loss: 0.0,
            mean_ll: 0.0,
            skewness: 0.0,
            kurtosis: 0.0,
            hhf1: 0.0,
            hhf5: 0.0,
            hhf15: 0.0,
            mean_absolute_error: 0.0,
            mean_squared_error: 0.0,
            super_mean_absolute_error: 0.0,
            super_mean_squared_error: 0.0,
            max_error: 0.0,
        }
    }
}

/// Sample skewness; zero below three points
pub fn skewness(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 3 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    let m2: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
    let m3: f64 = data.iter().map(|x| (x - mean).powi(3)).sum();
    let std = (m2 / (nf - 1.0)).sqrt();
    if std == 0.0 {
        return 0.0;
    }
    nf * m3 / ((nf - 1.0) * (nf - 2.0) * std.powi(3))
}

/// Sample excess kurtosis; zero below four points
pub fn kurtosis(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 4 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    let m2: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
    let m4: f64 = data.iter().map(|x| (x - mean).powi(4)).sum();
    if m2 == 0.0 {
        return 0.0;
    }
    ((nf - 1.0) / ((nf - 2.0) * (nf - 3.0)))
        * ((nf + 1.0) * nf * m4 / (m2 * m2) - 3.0 * (nf - 1.0))
}

/// Fit a Weibull to a score population.
///
/// Empty input returns [`WeibullFit::empty`] without touching the observer.
/// A cancelled context surfaces as [`crate::error::EngineError::FitCancelled`].
pub fn solve_weibull(
    data: &[f64],
    config: &FitConfig,
    ctx: &mut FitContext<'_>,
) -> Result<WeibullFit> {
    if data.is_empty() {
        return Ok(WeibullFit::empty());
    }

    let start = initial_guess(data);
    let loss_fn = |k: f64, lambda: f64| neg_log_likelihood(data, k, lambda);
    let optimizer: Box<dyn WeibullOptimizer> = match config.optimizer {
        OptimizerKind::GridSearch => Box::new(GridSearch::new(config.precision)),
        OptimizerKind::NelderMead => Box::new(NelderMead::new(
            config.max_iterations,
            config.stall_iterations,
        )),
    };
    let best = optimizer.optimize(&loss_fn, start, ctx)?;
    ctx.finish(best);

    Ok(finalize_fit(data, best))
}

fn finalize_fit(data: &[f64], best: ParamsAndLoss) -> WeibullFit {
    let n = data.len() as f64;
    let mut desc = data.to_vec();
    desc.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    let mut abs_sum = 0.0;
    let mut squared_sum = 0.0;
    let mut super_abs_sum = 0.0;
    let mut super_squared_sum = 0.0;
    let mut max_error: f64 = 0.0;
    for (i, &x) in desc.iter().enumerate() {
        let empirical = 100.0 * i as f64 / n;
        let fitted = survival_percent(x, best.k, best.lambda) - empirical;
        let reference = survival_percent(x, REFERENCE_SHAPE, best.lambda) - empirical;
        abs_sum += fitted.abs();
        squared_sum += fitted * fitted;
        super_abs_sum += reference.abs();
        super_squared_sum += reference * reference;
        max_error = max_error.max(fitted.abs());
    }

    WeibullFit {
        k: best.k,
        lambda: best.lambda,
        loss: best.loss,
        mean_ll: -best.loss / n,
        skewness: skewness(data),
        kurtosis: kurtosis(data),
        hhf1: quantile(1.0, best.k, best.lambda) / 0.95,
        hhf5: quantile(5.0, best.k, best.lambda) / 0.85,
        hhf15: quantile(15.0, best.k, best.lambda) / 0.75,
        mean_absolute_error: abs_sum / n,
        mean_squared_error: squared_sum / n,
        super_mean_absolute_error: super_abs_sum / n,
        super_mean_squared_error: super_squared_sum / n,
        max_error,
    }
}
