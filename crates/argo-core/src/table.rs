//! Typed field access shared by every table-backed record collection

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::quality::Quality;

/// Identifier of a row inside one collection
pub type RecordId = u64;

/// Value of a single field, as seen by the sort comparator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    /// Optional field with no value on this record
    Missing,
}

impl FieldValue<'_> {
    /// Compare two values with the table's weak ordering.
    ///
    /// Text compares case-folded first, with lowercase ahead of uppercase on
    /// ties; numbers compare numerically; dates and timestamps compare
    /// chronologically. Any other pairing, including a missing value or NaN,
    /// is `Equal` so a stable sort keeps the original relative order.
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => locale_compare(a, b),
            (FieldValue::Number(a), FieldValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl From<Option<f64>> for FieldValue<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map(FieldValue::Number).unwrap_or(FieldValue::Missing)
    }
}

fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase).map(collation_key);
    let folded_b = b.chars().flat_map(char::to_lowercase).map(collation_key);
    folded_a.cmp(folded_b).then_with(|| b.cmp(a))
}

/// Punctuation and symbols sort before digits, digits before letters
fn collation_key(c: char) -> (u8, char) {
    let class = if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    };
    (class, c)
}

/// Column selector of a record type
pub trait SortField:
    Copy + Eq + Hash + Debug + Display + FromStr<Err = UnknownField> + Send + Sync + 'static
{
    /// Every selectable field, in column order
    const ALL: &'static [Self];

    /// Stable lowercase name used in settings and on the command line
    fn name(&self) -> &'static str;
}

/// Error for a field name that does not exist on the record type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

/// A record that can be shown, searched and sorted in a table
pub trait TableRecord: Clone + Send + Sync + 'static {
    type Field: SortField;

    fn record_id(&self) -> RecordId;

    fn quality(&self) -> &Quality;

    /// Free-text match; an empty query matches every record
    fn matches_query(&self, query: &str) -> bool;

    fn field(&self, field: Self::Field) -> FieldValue<'_>;
}

/// Declare a field selector enum with its name table
macro_rules! sort_fields {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $crate::table::SortField for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::table::UnknownField;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($label => Ok($name::$variant),)+
                    other => Err($crate::table::UnknownField(other.to_string())),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::table::SortField::name(self))
            }
        }
    };
}

pub(crate) use sort_fields;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_comparison_is_case_folded() {
        let apple = FieldValue::Text("apple");
        let banana = FieldValue::Text("Banana");
        assert_eq!(apple.compare(&banana), Ordering::Less);
        assert_eq!(
            FieldValue::Text("a").compare(&FieldValue::Text("A")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Text("same").compare(&FieldValue::Text("same")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_punctuation_sorts_before_digits_and_letters() {
        let cmp = |a: &str, b: &str| FieldValue::Text(a).compare(&FieldValue::Text(b));
        assert_eq!(cmp("a_1", "a1"), Ordering::Less);
        assert_eq!(cmp("D1901393_001.nc", "D1901393001.nc"), Ordering::Less);
        assert_eq!(cmp("9", "a"), Ordering::Less);
        assert_eq!(cmp("-x", "0"), Ordering::Less);

        let mut names = vec!["B", "a1", "a_1", "a", "A"];
        names.sort_by(|a, b| cmp(*a, *b));
        assert_eq!(names, vec!["a", "A", "a_1", "a1", "B"]);
    }

    #[test]
    fn test_number_comparison() {
        assert_eq!(
            FieldValue::Number(-5.2).compare(&FieldValue::Number(2.1)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Number(f64::NAN).compare(&FieldValue::Number(1.0)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_mismatched_pairs_are_equal() {
        let text = FieldValue::Text("10");
        let number = FieldValue::Number(10.0);
        assert_eq!(text.compare(&number), Ordering::Equal);
        assert_eq!(number.compare(&FieldValue::Missing), Ordering::Equal);
        assert_eq!(FieldValue::Missing.compare(&FieldValue::Missing), Ordering::Equal);
    }
}
