//! Background fitting on the blocking pool
//!
//! Optimizer runs are CPU-bound, so they are pushed onto
//! `spawn_blocking` and observed through a watch channel instead of
//! blocking the async runtime.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::engine::FitSettings;
use crate::error::Result;
use crate::weibull::fitter::{solve_weibull, FitConfig, WeibullFit};
use crate::weibull::optimizer::{CancelToken, FitContext, FitObserver};

/// Latest optimizer state published by a background fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitProgress {
    pub k: f64,
    pub lambda: f64,
    pub loss: f64,
    pub done: bool,
}

impl Default for FitProgress {
    fn default() -> Self {
        Self {
            k: 1.0,
            lambda: 1.0,
            loss: 0.0,
            done: false,
        }
    }
}

/// Handle to a fit running in the background
pub struct FitHandle {
    progress: watch::Receiver<FitProgress>,
    cancel: CancelToken,
    join: JoinHandle<Result<WeibullFit>>,
}

impl FitHandle {
    /// Watch channel carrying throttled progress updates
    pub fn progress(&self) -> watch::Receiver<FitProgress> {
        self.progress.clone()
    }

    /// Ask the running fit to stop at its next checkpoint
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the fit to finish
    pub async fn join(self) -> Result<WeibullFit> {
        self.join
            .await
            .map_err(|err| anyhow!("fit task panicked: {err}"))?
    }
}

/// Start a Weibull fit on the blocking pool.
///
/// The returned handle exposes progress, cancellation and the final
/// result. The last progress value always has `done` set, whether the
/// fit finished, failed or was cancelled.
pub fn spawn_fit(data: Vec<f64>, settings: &FitSettings) -> Result<FitHandle> {
    let config = FitConfig::from_settings(settings)?;
    let interval = Duration::from_millis(settings.progress_interval_ms);
    info!("Starting background Weibull fit over {} scores", data.len());
    let cancel = CancelToken::new();
    let task_cancel = cancel.clone();

    let (tx, rx) = watch::channel(FitProgress::default());
    let tx = Arc::new(tx);
    let observer_tx = Arc::clone(&tx);

    let join = tokio::task::spawn_blocking(move || {
        let mut observer = FitObserver::with_interval(
            move |update| {
                let _ = observer_tx.send(FitProgress {
                    k: update.k,
                    lambda: update.lambda,
                    loss: update.loss,
                    done: false,
                });
            },
            interval,
        );
        let mut ctx = FitContext {
            observer: Some(&mut observer),
            cancel: Some(&task_cancel),
        };
        match solve_weibull(&data, &config, &mut ctx) {
            Ok(fit) => {
                info!(
                    "Weibull fit complete - k: {:.4}, lambda: {:.4}, loss: {:.6}",
                    fit.k, fit.lambda, fit.loss
                );
                let _ = tx.send(FitProgress {
                    k: fit.k,
                    lambda: fit.lambda,
                    loss: fit.loss,
                    done: true,
                });
                Ok(fit)
            }
            Err(err) => {
                tx.send_modify(|progress| progress.done = true);
                Err(err)
            }
        }
    });

    Ok(FitHandle {
        progress: rx,
        cancel,
        join,
    })
}
