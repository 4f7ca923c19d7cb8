//! Windowed classification calculator
//!
//! Reverse-engineered USPSA classification algorithm plus the recommended
//! variants: flag-gated eligibility, duplicate-aware windowing, best-N
//! averaging and recency bookkeeping. Division roster and classifier round
//! counts are injected configuration so every rule is testable with fixtures.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::classification::tiers::{
    class_for_percent, highest_classification, lowest_allowed_percent,
    lowest_allowed_percent_for_other_division,
};
use crate::classification::window::ScoreWindow;
use crate::config::calibration::ClassifierWeights;
use crate::config::divisions::DivisionRoster;
use crate::types::{
    ClassificationResult, DedupPolicy, Division, DivisionClassification, Mode, PercentField,
    PercentSnapshot, ScoreRun, ScoreSource,
};
use crate::utils::generate_major_code;

/// Milliseconds in one 28-day age unit
const AGE_UNIT_MS: f64 = 28.0 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Distinct-code count at or below which every positive score is admitted
const BOOTSTRAP_DISTINCT: usize = 4;

/// Total entries a window needs before scoring passes run
const MIN_SCORED_ENTRIES: usize = 4;

/// Elapsed time of `date` in 28-day units; missing dates count as `now`
fn age_units(now: DateTime<Utc>, date: Option<DateTime<Utc>>) -> f64 {
    let date = date.unwrap_or(now);
    (now - date).num_milliseconds() as f64 / AGE_UNIT_MS
}

/// Best-N size for a distinct-code count: exactly 4 keeps 4, more keeps 6
fn scored_subset_size(distinct: usize) -> usize {
    if distinct < 4 {
        0
    } else if distinct == 4 {
        4
    } else {
        6
    }
}

/// Age of the most recent run (last admission wins date ties)
fn most_recent_age<'a, I>(runs: I, now: DateTime<Utc>) -> f64
where
    I: IntoIterator<Item = &'a ScoreRun>,
{
    let last = runs.into_iter().max_by_key(|run| run.date);
    age_units(now, last.and_then(|run| run.date))
}

/// One representative per classifier code, in first-occurrence order
fn dedup_window<'a>(
    entries: &'a [ScoreRun],
    percent_field: PercentField,
    policy: DedupPolicy,
) -> Vec<&'a ScoreRun> {
    let mut kept: Vec<&ScoreRun> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for run in entries {
        match slots.get(run.classifier.as_str()) {
            None => {
                slots.insert(run.classifier.as_str(), kept.len());
                kept.push(run);
            }
            Some(&slot) => {
                let replace = match policy {
                    DedupPolicy::BestValue => {
                        percent_field.value_of(run) > percent_field.value_of(kept[slot])
                    }
                    DedupPolicy::MostRecent => run.date >= kept[slot].date,
                };
                if replace {
                    kept[slot] = run;
                }
            }
        }
    }
    kept
}

/// Outcome of one scoring pass over a division window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowScore {
    pub percent: f64,
    /// Mean elapsed 28-day units over the scored subset
    pub age: f64,
    /// Elapsed 28-day units of the most recent scored run
    pub age1: f64,
}

struct DivisionState {
    window: ScoreWindow,
    out: DivisionClassification,
}

impl DivisionState {
    fn new() -> Self {
        Self {
            window: ScoreWindow::new(),
            out: DivisionClassification::default(),
        }
    }
}

/// Classification calculator with injected roster and round-count calibration
pub struct ClassificationCalculator {
    roster: DivisionRoster,
    weights: ClassifierWeights,
}

impl ClassificationCalculator {
    pub fn new(roster: DivisionRoster, weights: ClassifierWeights) -> Self {
        Self { roster, weights }
    }

    /// Default roster and the built-in round-count table
    pub fn with_defaults() -> Self {
        Self::new(DivisionRoster::default(), ClassifierWeights::builtin())
    }

    /// Run the full classification over a shooter's score history
    ///
    /// Input order does not matter; runs are sorted by date (percent as the
    /// tie-break) before insertion. Every roster division appears in the
    /// output, zeroed when nothing was admitted.
    pub fn compute(
        &self,
        runs: &[ScoreRun],
        percent_field: PercentField,
        now: DateTime<Utc>,
        mode: Mode,
        window_size: usize,
    ) -> ClassificationResult {
        let mut states: BTreeMap<Division, DivisionState> = self
            .roster
            .iter()
            .map(|division| (division.to_string(), DivisionState::new()))
            .collect();

        if runs.is_empty() {
            return Self::finalize(states);
        }

        let mut ready: Vec<ScoreRun> = runs.to_vec();
        ready.sort_by(|a, b| match (a.date, b.date) {
            (Some(da), Some(db)) if da != db => da.cmp(&db),
            _ => percent_field
                .value_of(a)
                .partial_cmp(&percent_field.value_of(b))
                .unwrap_or(Ordering::Equal),
        });

        for run in &mut ready {
            // major-match scores are always eligible for reclassification
            if run.source == ScoreSource::MajorMatch {
                run.classifier = generate_major_code();
                run.cur_percent = run.percent;
            }
        }

        ready.retain(|run| {
            // weighted averaging has no round counts for majors and unknown
            // codes, so they cannot take part at all
            if mode.weighted && self.weights.round_count(&run.classifier).is_none() {
                debug!(
                    "No round count for classifier {}, dropped from weighted classification",
                    run.classifier
                );
                return false;
            }
            percent_field.value_of(run) >= 0.0
        });

        for run in ready {
            self.insert_and_score(run, &mut states, percent_field, now, mode, window_size);
        }

        Self::finalize(states)
    }

    /// Score one division window: dedup, rank, cap, average, ages
    pub fn score_window(
        &self,
        window: &ScoreWindow,
        percent_field: PercentField,
        now: DateTime<Utc>,
        mode: Mode,
    ) -> WindowScore {
        let deduped = dedup_window(window.entries(), percent_field, mode.dedup_policy());
        let subset = scored_subset_size(deduped.len());

        let mut ranked = deduped;
        ranked.sort_by(|a, b| {
            percent_field
                .value_of(b)
                .partial_cmp(&percent_field.value_of(a))
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(subset);

        let cap = mode.percent_cap();
        let percent = if ranked.is_empty() {
            0.0
        } else if mode.weighted {
            self.weighted_average(&ranked, percent_field, cap)
        } else {
            ranked
                .iter()
                .map(|run| percent_field.value_of(run).min(cap))
                .sum::<f64>()
                / ranked.len() as f64
        };

        let age = if ranked.is_empty() {
            0.0
        } else {
            ranked
                .iter()
                .map(|run| age_units(now, run.date))
                .sum::<f64>()
                / ranked.len() as f64
        };
        let age1 = most_recent_age(ranked.iter().copied(), now);

        WindowScore { percent, age, age1 }
    }

    fn weighted_average(&self, runs: &[&ScoreRun], percent_field: PercentField, cap: f64) -> f64 {
        let total_rounds: u32 = runs
            .iter()
            .map(|run| match self.weights.round_count(&run.classifier) {
                Some(rounds) => rounds,
                None => {
                    warn!("Missing round count for classifier {}", run.classifier);
                    0
                }
            })
            .sum();
        if total_rounds == 0 {
            return 0.0;
        }
        runs.iter()
            .map(|run| {
                let rounds = self.weights.round_count(&run.classifier).unwrap_or(0) as f64;
                percent_field.value_of(run).min(cap) * rounds
            })
            .sum::<f64>()
            / total_rounds as f64
    }

    fn can_be_inserted(
        &self,
        run: &ScoreRun,
        states: &BTreeMap<Division, DivisionState>,
        percent_field: PercentField,
        mode: Mode,
    ) -> bool {
        let Some(state) = states.get(&run.division) else {
            debug!("Unknown division '{}', skipping score", run.division);
            return false;
        };
        let value = percent_field.value_of(run);

        // zeros never count
        if !(value > 0.0) {
            return false;
        }

        let division_class = class_for_percent(state.out.high_percent);
        let highest = highest_classification(
            states
                .values()
                .map(|state| class_for_percent(state.out.high_percent)),
        );
        let b_flag = value <= lowest_allowed_percent(division_class);
        let c_flag = value <= lowest_allowed_percent_for_other_division(highest);

        // first non-dupe 4 always count
        if state.window.distinct_count() <= BOOTSTRAP_DISTINCT {
            return true;
        }
        if (b_flag || c_flag) && mode.flags_enforced() {
            return false;
        }
        true
    }

    fn insert_and_score(
        &self,
        run: ScoreRun,
        states: &mut BTreeMap<Division, DivisionState>,
        percent_field: PercentField,
        now: DateTime<Utc>,
        mode: Mode,
        window_size: usize,
    ) {
        if !self.can_be_inserted(&run, states, percent_field, mode) {
            return;
        }
        let division = run.division.clone();
        let snapshot_date = run.date;
        let Some(state) = states.get_mut(&division) else {
            return;
        };

        let admitted = state.window.admit(run, window_size);
        state.window = admitted;

        // age1 can move even before the window is scoreable
        if !state.window.is_empty() {
            state.out.age1 = Some(most_recent_age(state.window.entries(), now));
        }

        if state.window.len() >= MIN_SCORED_ENTRIES {
            let score = self.score_window(&state.window, percent_field, now, mode);
            if score.percent > state.out.high_percent {
                state.out.high_percent = score.percent;
            }
            state.out.percent = score.percent;
            state.out.age = Some(score.age);
            state.out.age1 = Some(score.age1);
            state.out.history.push(PercentSnapshot {
                percent: score.percent,
                date: snapshot_date,
            });
        }
    }

    fn finalize(states: BTreeMap<Division, DivisionState>) -> ClassificationResult {
        states
            .into_iter()
            .map(|(division, mut state)| {
                state.out.class_letter = class_for_percent(state.out.percent);
                (division, state.out)
            })
            .collect()
    }
}

/// Classify with the default roster and built-in calibration
pub fn compute_classification(
    runs: &[ScoreRun],
    percent_field: PercentField,
    now: DateTime<Utc>,
    mode: Mode,
    window_size: usize,
) -> ClassificationResult {
    ClassificationCalculator::with_defaults().compute(runs, percent_field, now, mode, window_size)
}
