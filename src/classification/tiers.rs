//! Skill tier letters and the flag floors hanging off them
//!
//! Banding boundaries are closed on the lower edge of each band; zeros and
//! negative percents never classify.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Classification letters, declared lowest to highest so `Ord` follows rank
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ClassLetter {
    /// Sentinel below "unclassified"; never produced by percent banding
    X,
    U,
    D,
    C,
    B,
    A,
    M,
    GM,
}

impl ClassLetter {
    /// Position in rank order, X lowest
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Representative floor percent for the letter (X maps to -1)
    pub fn rank_percent(&self) -> f64 {
        match self {
            ClassLetter::GM => 95.0,
            ClassLetter::M => 85.0,
            ClassLetter::A => 75.0,
            ClassLetter::B => 60.0,
            ClassLetter::C => 40.0,
            ClassLetter::D => 10.0,
            ClassLetter::U => 0.0,
            ClassLetter::X => -1.0,
        }
    }
}

impl fmt::Display for ClassLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClassLetter::X => "X",
            ClassLetter::U => "U",
            ClassLetter::D => "D",
            ClassLetter::C => "C",
            ClassLetter::B => "B",
            ClassLetter::A => "A",
            ClassLetter::M => "M",
            ClassLetter::GM => "GM",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ClassLetter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" => Ok(ClassLetter::X),
            "U" => Ok(ClassLetter::U),
            "D" => Ok(ClassLetter::D),
            "C" => Ok(ClassLetter::C),
            "B" => Ok(ClassLetter::B),
            "A" => Ok(ClassLetter::A),
            "M" => Ok(ClassLetter::M),
            "GM" => Ok(ClassLetter::GM),
            _ => Err(anyhow!("Invalid classification letter: {}", s)),
        }
    }
}

/// Elo-style rating floors for GM/M/A/B/C, highest first
pub const ELO_CLASS_FLOORS: [f64; 5] = [1625.0, 1434.0, 1245.0, 998.0, 700.0];

/// Band a windowed average percent into a letter; zeros never count
pub fn class_for_percent(percent: f64) -> ClassLetter {
    if percent <= 0.0 {
        ClassLetter::U
    } else if percent < 40.0 {
        ClassLetter::D
    } else if percent < 60.0 {
        ClassLetter::C
    } else if percent < 75.0 {
        ClassLetter::B
    } else if percent < 85.0 {
        ClassLetter::A
    } else if percent < 95.0 {
        ClassLetter::M
    } else {
        ClassLetter::GM
    }
}

/// Band an Elo-style rating into a letter using [`ELO_CLASS_FLOORS`]
pub fn class_for_elo(rating: f64) -> ClassLetter {
    if rating <= 0.0 {
        ClassLetter::U
    } else if rating < ELO_CLASS_FLOORS[4] {
        ClassLetter::D
    } else if rating < ELO_CLASS_FLOORS[3] {
        ClassLetter::C
    } else if rating < ELO_CLASS_FLOORS[2] {
        ClassLetter::B
    } else if rating < ELO_CLASS_FLOORS[1] {
        ClassLetter::A
    } else if rating < ELO_CLASS_FLOORS[0] {
        ClassLetter::M
    } else {
        ClassLetter::GM
    }
}

/// B-flag floor: lowest percent allowed to count against the shooter's own
/// class in the division. Not used for initial classification.
pub fn lowest_allowed_percent(class: ClassLetter) -> f64 {
    match class {
        ClassLetter::GM => 90.0,
        ClassLetter::M => 80.0,
        ClassLetter::A => 70.0,
        ClassLetter::B => 55.0,
        ClassLetter::C => 35.0,
        _ => 0.0,
    }
}

/// C-flag floor: lowest percent allowed given the shooter's highest class
/// across all divisions. Not used for initial classification.
pub fn lowest_allowed_percent_for_other_division(class: ClassLetter) -> f64 {
    match class {
        ClassLetter::GM => 85.0,
        ClassLetter::M => 75.0,
        ClassLetter::A => 60.0,
        ClassLetter::B => 40.0,
        _ => 0.0,
    }
}

/// Highest letter across an iterator of letters; U when empty
pub fn highest_classification<I>(letters: I) -> ClassLetter
where
    I: IntoIterator<Item = ClassLetter>,
{
    letters.into_iter().max().unwrap_or(ClassLetter::U)
}
