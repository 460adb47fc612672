//! Data quality categories attached to profiles and measurements

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Quality flag of a record.
///
/// Values outside the recognized set are kept verbatim in [`Quality::Other`]
/// so that a foreign data source never fails to load; they render with the
/// fallback badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Quality {
    Excellent,
    Good,
    Fair,
    /// Unrecognized raw value
    Other(String),
}

/// Badge style used by a presentation layer for a quality value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Primary,
    Secondary,
    Outline,
}

impl Quality {
    /// All recognized categories, best first
    pub const RECOGNIZED: [Quality; 3] = [Quality::Excellent, Quality::Good, Quality::Fair];

    /// Classify a raw value. Only the exact lowercase names are recognized;
    /// anything else, including `"Excellent"`, is kept verbatim in
    /// [`Quality::Other`].
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "excellent" => Quality::Excellent,
            "good" => Quality::Good,
            "fair" => Quality::Fair,
            _ => Quality::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Quality::Excellent => "excellent",
            Quality::Good => "good",
            Quality::Fair => "fair",
            Quality::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Quality::Other(_))
    }

    /// Badge style for this category; unrecognized values fall back to outline
    pub fn badge(&self) -> BadgeVariant {
        match self {
            Quality::Excellent => BadgeVariant::Primary,
            Quality::Good => BadgeVariant::Secondary,
            Quality::Fair | Quality::Other(_) => BadgeVariant::Outline,
        }
    }
}

impl From<String> for Quality {
    fn from(raw: String) -> Self {
        match Quality::from_raw(&raw) {
            Quality::Other(_) => Quality::Other(raw),
            quality => quality,
        }
    }
}

impl From<Quality> for String {
    fn from(quality: Quality) -> Self {
        quality.as_str().to_string()
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality filter selected in the table controls
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QualityFilter {
    #[default]
    All,
    Only(Quality),
}

/// Error returned when a filter string names no recognized category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quality filter '{0}' (expected all, excellent, good or fair)")]
pub struct UnknownQualityFilter(pub String);

impl QualityFilter {
    /// Whether a record with `quality` passes this filter
    pub fn accepts(&self, quality: &Quality) -> bool {
        match self {
            QualityFilter::All => true,
            QualityFilter::Only(wanted) => wanted == quality,
        }
    }
}

impl FromStr for QualityFilter {
    type Err = UnknownQualityFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Lenient for typed input; records themselves are matched exactly
        let name = s.trim().to_ascii_lowercase();
        if name == "all" {
            return Ok(QualityFilter::All);
        }
        match Quality::from_raw(&name) {
            Quality::Other(_) => Err(UnknownQualityFilter(s.to_string())),
            quality => Ok(QualityFilter::Only(quality)),
        }
    }
}

impl TryFrom<String> for QualityFilter {
    type Error = UnknownQualityFilter;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualityFilter> for String {
    fn from(filter: QualityFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for QualityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityFilter::All => f.write_str("all"),
            QualityFilter::Only(quality) => fmt::Display::fmt(quality, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_quality_falls_back() {
        let quality = Quality::from_raw("questionable");
        assert_eq!(quality, Quality::Other("questionable".to_string()));
        assert!(!quality.is_recognized());
        assert_eq!(quality.badge(), BadgeVariant::Outline);
        assert_eq!(quality.to_string(), "questionable");
    }

    #[test]
    fn test_badges() {
        assert_eq!(Quality::Excellent.badge(), BadgeVariant::Primary);
        assert_eq!(Quality::Good.badge(), BadgeVariant::Secondary);
        assert_eq!(Quality::Fair.badge(), BadgeVariant::Outline);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<QualityFilter>(), Ok(QualityFilter::All));
        assert_eq!(
            "Good".parse::<QualityFilter>(),
            Ok(QualityFilter::Only(Quality::Good))
        );
        assert!("bogus".parse::<QualityFilter>().is_err());
    }

    #[test]
    fn test_filter_accepts() {
        let filter = QualityFilter::Only(Quality::Excellent);
        assert!(filter.accepts(&Quality::Excellent));
        assert!(!filter.accepts(&Quality::Good));
        assert!(!filter.accepts(&Quality::Other("excellent?".into())));
        assert!(QualityFilter::All.accepts(&Quality::Other("x".into())));
    }

    #[test]
    fn test_recognized_names_are_case_sensitive() {
        for raw in ["Excellent", "EXCELLENT", " excellent"] {
            let quality = Quality::from_raw(raw);
            assert_eq!(quality, Quality::Other(raw.to_string()));
            assert_eq!(quality.badge(), BadgeVariant::Outline);
            assert!(!QualityFilter::Only(Quality::Excellent).accepts(&quality));
            assert!(QualityFilter::All.accepts(&quality));
        }
        assert_eq!(Quality::from_raw("excellent"), Quality::Excellent);
    }

    #[test]
    fn test_serde_round_trip_keeps_raw_value() {
        let json = serde_json::to_string(&Quality::Other("bad".into())).unwrap();
        assert_eq!(json, "\"bad\"");
        let back: Quality = serde_json::from_str("\"EXCELLENT\"").unwrap();
        assert_eq!(back, Quality::Other("EXCELLENT".to_string()));
        assert_eq!(serde_json::to_string(&back).unwrap(), "\"EXCELLENT\"");
        let back: Quality = serde_json::from_str("\"good\"").unwrap();
        assert_eq!(back, Quality::Good);
    }
}
