//! Calibration tables
//!
//! Round counts for weighted averaging, curated recommended-threshold target
//! assignments per (division, classifier), and the log-ratio line-search
//! target sets. Builders take explicit pair lists so tests can inject their
//! own tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ClassifierCode;

use TargetPreset::{R1, R15, R5};

/// Strips the optional "CM" match-bulletin prefix and surrounding whitespace
pub fn normalize_classifier_code(code: &str) -> &str {
    let code = code.trim();
    if let Some(prefix) = code.get(..2) {
        if prefix.eq_ignore_ascii_case("cm") {
            let rest = &code[2..];
            if rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    code
}

/// Stage round counts keyed by normalized classifier code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierWeights {
    rounds: HashMap<ClassifierCode, u32>,
}

impl ClassifierWeights {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        Self {
            rounds: pairs
                .into_iter()
                .map(|(code, rounds)| (code.to_string(), rounds))
                .collect(),
        }
    }

    /// Round counts for the classifiers the bundled calibration exercises;
    /// full tables load through `from_pairs`
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ROUNDS.iter().copied())
    }

    pub fn round_count(&self, classifier: &str) -> Option<u32> {
        self.rounds.get(normalize_classifier_code(classifier)).copied()
    }
}

const BUILTIN_ROUNDS: &[(&str, u32)] = &[
    ("06-10", 6),
    ("20-01", 12),
    ("22-05", 24),
    ("99-24", 12),
    ("99-62", 6),
];

/// Preset (percentile, percent) target pairs for recommended thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPreset {
    /// 1st percentile shooting 95% of the threshold
    R1,
    /// 4.75th percentile shooting 85%
    R5,
    /// 14.5th percentile shooting 75%
    R15,
}

impl TargetPreset {
    pub fn percentile(self) -> f64 {
        match self {
            R1 => 1.0,
            R5 => 4.75,
            R15 => 14.5,
        }
    }

    pub fn percent(self) -> f64 {
        match self {
            R1 => 95.0,
            R5 => 85.0,
            R15 => 75.0,
        }
    }
}

/// Curated preset assignments, keyed by "classifier:division" pairs.
/// Unassigned pairs deliberately produce a disabled (zero) recommendation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdTargets {
    assigned: HashMap<String, TargetPreset>,
}

impl ThresholdTargets {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_assignments<'a, I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, TargetPreset)>,
    {
        let mut targets = Self::empty();
        for (division, classifier, preset) in assignments {
            targets.assign(division, classifier, preset);
        }
        targets
    }

    /// The reviewed assignment table
    pub fn builtin() -> Self {
        let divisions: &[(&str, &[(&str, TargetPreset)])] = &[
            ("opn", OPN),
            ("ltd", LTD),
            ("l10", L10),
            ("prod", PROD),
            ("rev", REV),
            ("ss", SS),
            ("co", CO),
            ("lo", LO),
            ("pcc", PCC),
        ];
        let mut targets = Self::empty();
        for (division, entries) in divisions {
            for (classifier, preset) in *entries {
                targets.assign(division, classifier, *preset);
            }
        }
        targets
    }

    pub fn assign(&mut self, division: &str, classifier: &str, preset: TargetPreset) {
        self.assigned
            .insert(format!("{classifier}:{division}"), preset);
    }

    pub fn preset_for(&self, division: &str, classifier: &str) -> Option<TargetPreset> {
        self.assigned
            .get(&format!("{classifier}:{division}"))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

/// One line-search target: (percentile fraction, percent-of-threshold fraction)
pub type LogTarget = (f64, f64);

/// The 1/5/15 percentile target set
pub const HFI_TARGETS: &[LogTarget] = &[(0.01, 0.95), (0.05, 0.85), (0.15, 0.75)];

/// Four-point target set aligned to the historical difficulty anchors
pub const ALIGNED_TARGETS: &[LogTarget] =
    &[(0.0137, 0.95), (0.03, 0.90), (0.0589, 0.85), (0.1697, 0.75)];

const OPN: &[(&str, TargetPreset)] = &[
    ("23-01", R1),
    ("23-02", R1),
    ("99-28", R5),
    ("99-53", R5),
    ("99-61", R5),
    ("99-63", R5),
    ("03-03", R15),
    ("08-02", R15),
    ("09-09", R5),
];

const LTD: &[(&str, TargetPreset)] = &[
    ("99-02", R5),
    ("99-07", R5),
    ("99-08", R5),
    ("99-10", R1),
    ("99-11", R1),
    ("99-12", R5),
    ("99-13", R1),
    ("99-14", R1),
    ("99-16", R5),
    ("99-19", R5),
    ("99-21", R1),
    ("99-22", R1),
    ("99-23", R1),
    ("99-24", R5),
    ("99-28", R5),
    ("99-33", R5),
    ("99-40", R5),
    ("99-41", R5),
    ("99-42", R5),
    ("99-46", R5),
    ("99-47", R5),
    ("99-48", R1),
    ("99-51", R5),
    ("99-53", R5),
    ("99-56", R5),
    ("99-57", R5),
    ("99-59", R1),
    ("99-61", R5),
    ("99-62", R1),
    ("99-63", R1),
    ("03-02", R1),
    ("03-03", R5),
    ("03-04", R5),
    ("03-05", R5),
    ("03-07", R5),
    ("03-08", R1),
    ("03-09", R1),
    ("03-11", R1),
    ("03-12", R5),
    ("03-14", R1),
    ("03-18", R1),
    ("06-01", R5),
    ("06-02", R5),
    ("06-03", R5),
    ("06-04", R1),
    ("06-05", R5),
    ("06-06", R5),
    ("06-10", R1),
    ("08-01", R1),
    ("08-02", R5),
    ("08-03", R1),
    ("09-01", R5),
    ("09-02", R1),
    ("09-03", R5),
    ("09-04", R1),
    ("09-07", R1),
    ("09-08", R5),
    ("09-09", R1),
    ("09-10", R5),
    ("09-13", R5),
    ("09-14", R5),
    ("13-01", R1),
    ("13-02", R1),
    ("13-03", R5),
    ("13-04", R1),
    ("13-05", R1),
    ("13-06", R5),
    ("13-07", R5),
    ("13-08", R1),
    ("18-01", R1),
    ("18-02", R1),
    ("18-03", R5),
    ("18-04", R1),
    ("18-05", R1),
    ("18-06", R1),
    ("18-07", R1),
    ("18-08", R5),
    ("18-09", R5),
    ("19-01", R5),
    ("19-02", R5),
    ("19-03", R1),
    ("19-04", R5),
    ("20-01", R5),
    ("20-02", R1),
    ("20-03", R5),
    ("21-01", R5),
    ("22-01", R5),
    ("22-02", R5),
    ("22-04", R5),
    ("22-05", R5),
    ("22-06", R5),
    ("22-07", R5),
    ("23-01", R1),
    ("23-02", R1),
];

const L10: &[(&str, TargetPreset)] = &[
    ("23-01", R15),
    ("23-02", R15),
    ("99-28", R1),
    ("09-08", R5),
    ("99-47", R5),
    ("20-03", R5),
    ("13-07", R5),
    ("03-14", R5),
    ("99-14", R5),
    ("99-41", R5),
    ("03-11", R1),
    ("09-07", R1),
    ("06-01", R5),
    ("99-19", R1),
    ("18-09", R5),
    ("03-08", R5),
    ("09-13", R5),
    ("18-05", R5),
    ("99-21", R5),
    ("09-03", R5),
    ("09-04", R5),
    ("06-05", R5),
    ("03-04", R5),
    ("13-02", R5),
    ("18-06", R5),
    ("99-48", R5),
    ("06-10", R1),
    ("20-01", R5),
    ("99-23", R5),
    ("06-04", R5),
    ("03-18", R5),
    ("13-06", R5),
];

const PROD: &[(&str, TargetPreset)] = &[
    ("23-01", R1),
    ("23-02", R5),
    ("22-01", R5),
    ("03-12", R5),
    ("99-61", R5),
    ("99-14", R1),
    ("06-02", R5),
    ("99-63", R5),
    ("18-01", R5),
    ("18-02", R1),
    ("18-05", R5),
    ("03-09", R5),
    ("08-01", R5),
    ("09-07", R1),
    ("03-02", R1),
    ("13-02", R1),
    ("99-59", R5),
];

const REV: &[(&str, TargetPreset)] = &[("23-01", R5), ("23-02", R5)];

const SS: &[(&str, TargetPreset)] = &[
    ("23-01", R1),
    ("23-02", R5),
    ("99-59", R5),
    ("03-05", R5),
    ("03-14", R5),
    ("06-02", R5),
    ("08-01", R5),
    ("03-09", R5),
    ("13-02", R5),
    ("09-02", R5),
    ("99-07", R5),
    ("09-14", R1),
    ("03-03", R5),
    ("13-07", R5),
    ("13-08", R5),
    ("99-14", R5),
    ("99-33", R15),
    ("03-11", R5),
    ("99-48", R5),
    ("03-12", R5),
    ("06-10", R5),
    ("18-01", R5),
    ("18-06", R1),
    ("99-47", R5),
];

const CO: &[(&str, TargetPreset)] = &[
    ("99-02", R5),
    ("99-07", R1),
    ("99-08", R1),
    ("99-10", R15),
    ("99-11", R1),
    ("99-12", R5),
    ("99-13", R1),
    ("99-14", R5),
    ("99-16", R15),
    ("99-19", R5),
    ("99-21", R5),
    ("99-22", R5),
    ("99-23", R5),
    ("99-24", R1),
    ("99-28", R5),
    ("99-33", R15),
    ("99-40", R5),
    ("99-41", R5),
    ("99-42", R15),
    ("99-46", R5),
    ("99-47", R5),
    ("99-48", R5),
    ("99-51", R15),
    ("99-53", R15),
    ("99-56", R5),
    ("99-57", R5),
    ("99-59", R5),
    ("99-61", R5),
    ("99-62", R1),
    ("99-63", R1),
    ("03-02", R1),
    ("03-03", R5),
    ("03-04", R1),
    ("03-05", R15),
    ("03-07", R1),
    ("03-08", R1),
    ("03-09", R1),
    ("03-11", R5),
    ("03-12", R5),
    ("03-14", R15),
    ("03-18", R5),
    ("06-01", R1),
    ("06-02", R5),
    ("06-03", R5),
    ("06-04", R5),
    ("06-05", R5),
    ("06-06", R5),
    ("06-10", R5),
    ("08-01", R1),
    ("08-02", R5),
    ("08-03", R1),
    ("09-01", R5),
    ("09-02", R1),
    ("09-03", R1),
    ("09-04", R1),
    ("09-07", R1),
    ("09-08", R5),
    ("09-09", R5),
    ("09-10", R5),
    ("09-13", R5),
    ("09-14", R5),
    ("13-01", R1),
    ("13-02", R5),
    ("13-03", R5),
    ("13-04", R5),
    ("13-05", R1),
    ("13-06", R1),
    ("13-07", R1),
    ("13-08", R5),
    ("18-01", R5),
    ("18-02", R1),
    ("18-03", R1),
    ("18-04", R5),
    ("18-05", R1),
    ("18-06", R1),
    ("18-07", R1),
    ("18-08", R1),
    ("18-09", R1),
    ("19-01", R5),
    ("19-02", R1),
    ("19-03", R5),
    ("19-04", R5),
    ("20-01", R1),
    ("20-02", R5),
    ("20-03", R15),
    ("21-01", R5),
    ("22-01", R5),
    ("22-02", R5),
    ("22-04", R1),
    ("22-05", R5),
    ("22-06", R5),
    ("22-07", R1),
    ("23-01", R5),
    ("23-02", R5),
];

const LO: &[(&str, TargetPreset)] = &[
    ("23-01", R1),
    ("23-02", R5),
    ("99-33", R5),
    ("09-09", R15),
    ("99-56", R15),
    ("03-14", R5),
];

const PCC: &[(&str, TargetPreset)] = &[
    ("99-14", R5),
    ("09-02", R5),
    ("18-04", R5),
    ("09-09", R5),
    ("99-40", R5),
    ("03-14", R5),
    ("22-05", R5),
    ("09-01", R5),
    ("09-10", R15),
    ("99-51", R15),
    ("22-01", R5),
    ("23-01", R1),
    ("23-02", R15),
];
