//! Division roster

use serde::{Deserialize, Serialize};

/// USPSA division short names plus the unified overlay divisions
pub const DEFAULT_DIVISIONS: &[&str] = &[
    "opn", "ltd", "l10", "prod", "rev", "ss", "co", "lo", "pcc", "comp", "opt", "irn", "car",
];

/// Divisions the classification calculator keeps state for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionRoster {
    divisions: Vec<String>,
}

impl DivisionRoster {
    pub fn new(divisions: Vec<String>) -> Self {
        Self { divisions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.divisions.iter().map(String::as_str)
    }

    pub fn contains(&self, division: &str) -> bool {
        self.divisions.iter().any(|d| d == division)
    }

    pub fn len(&self) -> usize {
        self.divisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }
}

impl Default for DivisionRoster {
    fn default() -> Self {
        Self::new(DEFAULT_DIVISIONS.iter().map(|d| d.to_string()).collect())
    }
}
