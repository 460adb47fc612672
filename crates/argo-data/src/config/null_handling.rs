//! Missing-value handling for CSV cells

use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// Cell values that stand for a missing measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Patterns to treat as missing
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: ["", "-", "N/A", "NA", "NaN", "null", "None"]
                .into_iter()
                .map(String::from)
                .collect(),
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a cell should be treated as missing
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace {
            value.trim()
        } else {
            value
        };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Add a missing-value pattern
    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    /// Copy of `record` with every missing cell blanked, so optional fields
    /// deserialize to `None`
    pub fn blank_nulls(&self, record: &StringRecord) -> StringRecord {
        record
            .iter()
            .map(|cell| if self.is_null(cell) { "" } else { cell })
            .collect()
    }
}
