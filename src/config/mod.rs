//! Configuration for the classification and calibration engine
//!
//! This module handles configuration loading from environment variables,
//! validation, and the bundled calibration tables.

pub mod calibration;
pub mod divisions;
pub mod engine;

// Re-export commonly used types
pub use calibration::{
    normalize_classifier_code, ClassifierWeights, LogTarget, TargetPreset, ThresholdTargets,
    ALIGNED_TARGETS, HFI_TARGETS,
};
pub use divisions::{DivisionRoster, DEFAULT_DIVISIONS};
pub use engine::{validate_config, ClassificationSettings, EngineConfig, FitSettings};
