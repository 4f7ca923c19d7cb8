//! Classification state machine: eligibility flags, score windows and
//! best-N averaging across divisions.

pub mod calculator;
pub mod tiers;
pub mod window;

pub use calculator::{compute_classification, ClassificationCalculator, WindowScore};
pub use tiers::{
    class_for_elo, class_for_percent, highest_classification, lowest_allowed_percent,
    lowest_allowed_percent_for_other_division, ClassLetter,
};
pub use window::ScoreWindow;
