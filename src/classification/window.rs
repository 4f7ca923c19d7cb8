//! Bounded, duplicate-aware score window for one division
//!
//! Capacity is counted in distinct classifier codes: repeats of a code
//! already present never displace a distinct one. Admission is a two-phase
//! operation: trim to the newest `window_size` entries, then regrow from the
//! trimmed tail by the number of duplicates the kept entries contain.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::ScoreRun;

/// Ordered window of admitted score runs, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreWindow {
    entries: Vec<ScoreRun>,
}

impl ScoreWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_runs(entries: Vec<ScoreRun>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScoreRun] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct classifier codes present
    pub fn distinct_count(&self) -> usize {
        self.entries
            .iter()
            .map(|run| run.classifier.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of entries beyond the first per classifier code
    pub fn duplicate_count(&self) -> usize {
        self.entries.len() - self.distinct_count()
    }

    pub fn contains_classifier(&self, classifier: &str) -> bool {
        self.entries.iter().any(|run| run.classifier == classifier)
    }

    /// Admit a run, returning the resulting window
    ///
    /// Push, keep only the newest `window_size` entries, then restore as many
    /// of the most recently trimmed entries (front, chronological order) as
    /// the kept entries hold duplicates.
    pub fn admit(&self, run: ScoreRun, window_size: usize) -> ScoreWindow {
        let mut entries = self.entries.clone();
        entries.push(run);

        if entries.len() > window_size {
            let overflow = entries.len() - window_size;
            let trimmed: Vec<ScoreRun> = entries.drain(..overflow).collect();

            let kept = ScoreWindow { entries };
            let regrow = kept.duplicate_count().min(trimmed.len());

            let mut rebuilt = trimmed[trimmed.len() - regrow..].to_vec();
            rebuilt.extend(kept.entries);
            entries = rebuilt;
        }

        ScoreWindow { entries }
    }
}
