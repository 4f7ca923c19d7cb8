//! Engine configuration
//!
//! This module defines the primary configuration structure for the
//! classification and fitting engine, including environment variable loading
//! and validation.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::types::{Mode, PercentField};
use crate::weibull::optimizer::OptimizerKind;

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub classification: ClassificationSettings,
    pub fitting: FitSettings,
}

/// Classification knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSettings {
    /// Scoring mode ("uspsa", "soft", "brutal", with "+uncapped"/"+weighted")
    pub mode: String,
    /// Percent field runs are scored by ("percent", "cur_percent", "rec_percent")
    pub percent_field: String,
    /// Score window size per division; 0 picks the mode default
    pub window_size: usize,
}

/// Weibull fitting knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSettings {
    /// Optimizer selection ("grid" or "nelder-mead")
    pub optimizer: String,
    /// Step refinement factor for the grid optimizer
    pub precision: u32,
    /// Iteration cap for the simplex optimizer
    pub max_iterations: u32,
    /// Consecutive non-improving simplex iterations before stopping
    pub stall_iterations: u32,
    /// Minimum milliseconds between progress reports
    pub progress_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            classification: ClassificationSettings::default(),
            fitting: FitSettings::default(),
        }
    }
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            mode: "uspsa".to_string(),
            percent_field: "percent".to_string(),
            window_size: 0,
        }
    }
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            optimizer: "grid".to_string(),
            precision: 50,
            max_iterations: 10_000,
            stall_iterations: 100,
            progress_interval_ms: 250,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(mode) = env::var("CLASSIFICATION_MODE") {
            config.classification.mode = mode;
        }
        if let Ok(field) = env::var("PERCENT_FIELD") {
            config.classification.percent_field = field;
        }
        if let Ok(window) = env::var("WINDOW_SIZE") {
            config.classification.window_size = window
                .parse()
                .map_err(|_| anyhow!("Invalid WINDOW_SIZE value: {}", window))?;
        }

        if let Ok(optimizer) = env::var("FIT_OPTIMIZER") {
            config.fitting.optimizer = optimizer;
        }
        if let Ok(precision) = env::var("FIT_PRECISION") {
            config.fitting.precision = precision
                .parse()
                .map_err(|_| anyhow!("Invalid FIT_PRECISION value: {}", precision))?;
        }
        if let Ok(max_iterations) = env::var("FIT_MAX_ITERATIONS") {
            config.fitting.max_iterations = max_iterations
                .parse()
                .map_err(|_| anyhow!("Invalid FIT_MAX_ITERATIONS value: {}", max_iterations))?;
        }
        if let Ok(stall) = env::var("FIT_STALL_ITERATIONS") {
            config.fitting.stall_iterations = stall
                .parse()
                .map_err(|_| anyhow!("Invalid FIT_STALL_ITERATIONS value: {}", stall))?;
        }
        if let Ok(interval) = env::var("FIT_PROGRESS_INTERVAL_MS") {
            config.fitting.progress_interval_ms = interval
                .parse()
                .map_err(|_| anyhow!("Invalid FIT_PROGRESS_INTERVAL_MS value: {}", interval))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Parsed scoring mode
    pub fn mode(&self) -> Result<Mode> {
        self.classification
            .mode
            .parse()
            .map_err(|_| anyhow!("Invalid mode: {}", self.classification.mode))
    }

    /// Parsed percent field
    pub fn percent_field(&self) -> Result<PercentField> {
        self.classification
            .percent_field
            .parse()
            .map_err(|_| anyhow!("Invalid percent field: {}", self.classification.percent_field))
    }

    /// Effective window size after applying the mode default
    pub fn window_size(&self) -> Result<usize> {
        if self.classification.window_size == 0 {
            Ok(self.mode()?.default_window_size())
        } else {
            Ok(self.classification.window_size)
        }
    }

    /// Get progress report interval as Duration
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.fitting.progress_interval_ms)
    }
}

/// Validate configuration values
pub fn validate_config(config: &EngineConfig) -> Result<()> {
    config.mode()?;
    config.percent_field()?;

    if config.classification.window_size != 0 && config.classification.window_size < 4 {
        return Err(anyhow!("Window size must be 0 or at least 4"));
    }

    config.fitting.optimizer.parse::<OptimizerKind>()?;
    if config.fitting.precision == 0 {
        return Err(anyhow!("Fit precision must be greater than 0"));
    }
    if config.fitting.max_iterations == 0 {
        return Err(anyhow!("Fit iteration cap must be greater than 0"));
    }
    if config.fitting.progress_interval_ms == 0 {
        return Err(anyhow!("Progress interval must be greater than 0"));
    }

    Ok(())
}
