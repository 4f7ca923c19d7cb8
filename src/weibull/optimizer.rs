//! Optimizer seam shared by the Weibull fitters
//!
//! Both optimizers minimize the same (k, lambda) loss contract so either can
//! be substituted transparently. Long fits report throttled progress through
//! a `FitObserver` and stop early when a shared `CancelToken` flips.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Interval used when a caller does not pick one
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// Parameter pair and its loss, the unit of optimizer progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamsAndLoss {
    pub k: f64,
    pub lambda: f64,
    pub loss: f64,
}

/// Optimizer selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizerKind {
    #[default]
    GridSearch,
    NelderMead,
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerKind::GridSearch => write!(f, "grid"),
            OptimizerKind::NelderMead => write!(f, "nelder-mead"),
        }
    }
}

impl FromStr for OptimizerKind {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" | "gridsearch" | "grid-search" => Ok(OptimizerKind::GridSearch),
            "neldermead" | "nelder-mead" => Ok(OptimizerKind::NelderMead),
            other => Err(EngineError::ConfigurationError {
                message: format!("unknown optimizer: {}", other),
            }),
        }
    }
}

/// Cooperative cancellation flag shared between a fit and its caller
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Rate-limited progress reporter. Intermediate reports are dropped when
/// they arrive faster than the configured interval; the final report from
/// `finish` always goes through.
pub struct FitObserver {
    callback: Box<dyn Fn(ParamsAndLoss) + Send>,
    min_interval: Duration,
    last_report: Option<Instant>,
}

impl FitObserver {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(ParamsAndLoss) + Send + 'static,
    {
        Self::with_interval(callback, DEFAULT_PROGRESS_INTERVAL)
    }

    pub fn with_interval<F>(callback: F, min_interval: Duration) -> Self
    where
        F: Fn(ParamsAndLoss) + Send + 'static,
    {
        Self {
            callback: Box::new(callback),
            min_interval,
            last_report: None,
        }
    }

    pub fn report(&mut self, update: ParamsAndLoss) {
        let due = match self.last_report {
            None => true,
            Some(last) => last.elapsed() >= self.min_interval,
        };
        if due {
            self.last_report = Some(Instant::now());
            (self.callback)(update);
        }
    }

    pub fn finish(&mut self, last: ParamsAndLoss) {
        self.last_report = Some(Instant::now());
        (self.callback)(last);
    }
}

/// Observer and cancellation threaded through one optimizer run
pub struct FitContext<'a> {
    pub observer: Option<&'a mut FitObserver>,
    pub cancel: Option<&'a CancelToken>,
}

impl<'a> FitContext<'a> {
    /// No progress reporting, no cancellation
    pub fn none() -> Self {
        Self {
            observer: None,
            cancel: None,
        }
    }

    pub fn with_observer(observer: &'a mut FitObserver) -> Self {
        Self {
            observer: Some(observer),
            cancel: None,
        }
    }

    pub fn check_cancelled(&self) -> Result<()> {
        if let Some(cancel) = self.cancel {
            if cancel.is_cancelled() {
                return Err(EngineError::FitCancelled.into());
            }
        }
        Ok(())
    }

    pub fn report(&mut self, update: ParamsAndLoss) {
        if let Some(observer) = self.observer.as_mut() {
            observer.report(update);
        }
    }

    pub fn finish(&mut self, last: ParamsAndLoss) {
        if let Some(observer) = self.observer.as_mut() {
            observer.finish(last);
        }
    }
}

/// Minimizes a (k, lambda) loss surface from a starting point
pub trait WeibullOptimizer {
    fn optimize(
        &self,
        loss: &dyn Fn(f64, f64) -> f64,
        start: (f64, f64),
        ctx: &mut FitContext<'_>,
    ) -> Result<ParamsAndLoss>;
}
