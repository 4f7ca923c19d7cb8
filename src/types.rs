//! Common types used throughout the classification engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classification::tiers::ClassLetter;

/// Division shortname ("opn", "ltd", "co", ...)
pub type Division = String;

/// Classifier course code ("99-11", "20-01", ...)
pub type ClassifierCode = String;

/// How a score entered the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreSource {
    /// Score from a major match; always eligible for reclassification
    MajorMatch,
    /// Ordinary classifier score
    Standard,
}

impl Default for ScoreSource {
    fn default() -> Self {
        ScoreSource::Standard
    }
}

/// Which percent basis drives eligibility, windowing and averaging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PercentField {
    /// Percent against the historical threshold in effect when the score was shot
    Percent,
    /// Percent recomputed against the current threshold
    CurPercent,
    /// Percent against the recommended threshold
    RecPercent,
}

impl PercentField {
    /// Read the selected basis off a score run
    pub fn value_of(&self, run: &ScoreRun) -> f64 {
        match self {
            PercentField::Percent => run.percent,
            PercentField::CurPercent => run.cur_percent,
            PercentField::RecPercent => run.rec_percent,
        }
    }
}

impl fmt::Display for PercentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentField::Percent => write!(f, "percent"),
            PercentField::CurPercent => write!(f, "cur_percent"),
            PercentField::RecPercent => write!(f, "rec_percent"),
        }
    }
}

impl FromStr for PercentField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "").as_str() {
            "percent" => Ok(PercentField::Percent),
            "curpercent" => Ok(PercentField::CurPercent),
            "recpercent" => Ok(PercentField::RecPercent),
            _ => Err(anyhow!("Invalid percent field: {}", s)),
        }
    }
}

/// Base classification algorithm variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseMode {
    /// Reverse-engineered USPSA algorithm; B/C flags enforced
    Uspsa,
    /// Recommended algorithm, flags disabled, larger window
    Soft,
    /// Recommended algorithm, flags disabled, most-recent dedup
    Brutal,
}

/// Which duplicate survives when a classifier appears more than once in a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Highest value on the chosen basis wins
    BestValue,
    /// Latest date wins (ties go to the later admission)
    MostRecent,
}

/// Full algorithm mode: base variant plus score modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mode {
    pub base: BaseMode,
    /// Scores above 100% count up to 120% instead of being capped at 100
    pub uncapped: bool,
    /// Average weighted by classifier round count instead of uniformly
    pub weighted: bool,
}

impl Mode {
    pub fn uspsa() -> Self {
        Mode {
            base: BaseMode::Uspsa,
            uncapped: false,
            weighted: false,
        }
    }

    pub fn soft() -> Self {
        Mode {
            base: BaseMode::Soft,
            ..Mode::uspsa()
        }
    }

    pub fn brutal() -> Self {
        Mode {
            base: BaseMode::Brutal,
            ..Mode::uspsa()
        }
    }

    pub fn with_uncapped(mut self) -> Self {
        self.uncapped = true;
        self
    }

    pub fn with_weighted(mut self) -> Self {
        self.weighted = true;
        self
    }

    /// B/C flags only gate admissions under the USPSA base variant
    pub fn flags_enforced(&self) -> bool {
        matches!(self.base, BaseMode::Uspsa)
    }

    /// Per-score cap applied before averaging
    pub fn percent_cap(&self) -> f64 {
        if self.uncapped {
            120.0
        } else {
            100.0
        }
    }

    /// Window size the variant was calibrated with
    pub fn default_window_size(&self) -> usize {
        match self.base {
            BaseMode::Uspsa => 8,
            BaseMode::Soft | BaseMode::Brutal => 10,
        }
    }

    pub fn dedup_policy(&self) -> DedupPolicy {
        match self.base {
            BaseMode::Brutal => DedupPolicy::MostRecent,
            _ => DedupPolicy::BestValue,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::uspsa()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.base {
            BaseMode::Uspsa => "uspsa",
            BaseMode::Soft => "soft",
            BaseMode::Brutal => "brutal",
        };
        write!(f, "{}", base)?;
        if self.uncapped {
            write!(f, "+uncapped")?;
        }
        if self.weighted {
            write!(f, "+weighted")?;
        }
        Ok(())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('+');
        let mut mode = match parts.next().map(str::trim) {
            Some("uspsa") => Mode::uspsa(),
            Some("soft") => Mode::soft(),
            Some("brutal") => Mode::brutal(),
            other => return Err(anyhow!("Invalid mode: {:?}", other.unwrap_or(""))),
        };
        for modifier in parts {
            match modifier.trim() {
                "uncapped" => mode.uncapped = true,
                "weighted" => mode.weighted = true,
                other => return Err(anyhow!("Invalid mode modifier: {}", other)),
            }
        }
        Ok(mode)
    }
}

/// A single graded attempt as imported from match results
///
/// Records may arrive with missing dates or garbage values; the engine
/// tolerates them and decides eligibility per record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRun {
    pub classifier: ClassifierCode,
    pub division: Division,
    /// Date the score was shot; missing dates sort by percent instead
    pub date: Option<DateTime<Utc>>,
    /// Percent against the threshold in effect at the time
    pub percent: f64,
    /// Percent against the current threshold; can exceed 100
    pub cur_percent: f64,
    /// Percent against the recommended threshold
    pub rec_percent: f64,
    /// Raw hit-factor magnitude of the attempt
    pub hit_factor: f64,
    pub source: ScoreSource,
}

/// One scoring pass captured for history charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentSnapshot {
    pub percent: f64,
    pub date: Option<DateTime<Utc>>,
}

/// Final classification output for one division
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionClassification {
    /// Latest windowed average on the chosen basis
    pub percent: f64,
    /// High-water mark of `percent`; never decreases within a computation
    pub high_percent: f64,
    pub class_letter: ClassLetter,
    /// Mean elapsed time of scored window entries, in 28-day units
    pub age: Option<f64>,
    /// Elapsed time of the single most recent admitted score, in 28-day units
    pub age1: Option<f64>,
    /// Windowed percent after each scoring admission, oldest first
    pub history: Vec<PercentSnapshot>,
}

impl Default for DivisionClassification {
    fn default() -> Self {
        Self {
            percent: 0.0,
            high_percent: 0.0,
            class_letter: ClassLetter::U,
            age: None,
            age1: None,
            history: Vec::new(),
        }
    }
}

/// Classification output keyed by division shortname
pub type ClassificationResult = BTreeMap<Division, DivisionClassification>;
