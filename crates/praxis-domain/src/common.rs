//! Shared traits, enums and date helpers for fiscal records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities tracked by the engine.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Entities that carry an optional deadline.
pub trait Dated {
    fn deadline(&self) -> Option<NaiveDate>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
/// Urgency attached to obligations and checklist items.
///
/// Ordering puts `High` first so sorting ascending yields the most urgent entries.
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
/// Kind of fiscal duty. Open-ended through `Other`.
pub enum TaxKind {
    Vat,
    IncomeTax,
    SocialContribution,
    Other(String),
}

impl TaxKind {
    pub fn as_str(&self) -> &str {
        match self {
            TaxKind::Vat => "vat",
            TaxKind::IncomeTax => "income_tax",
            TaxKind::SocialContribution => "social_contribution",
            TaxKind::Other(label) => label.as_str(),
        }
    }
}

impl fmt::Display for TaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxKind::Vat => f.write_str("VAT"),
            TaxKind::IncomeTax => f.write_str("Income tax"),
            TaxKind::SocialContribution => f.write_str("Social contribution"),
            TaxKind::Other(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "RawDateRange")]
/// Inclusive calendar range used by report filters. `start <= end` always holds.
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DateRangeError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if end < start {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-day range.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateRange`] values.
pub enum DateRangeError {
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRangeError::InvalidRange { start, end } => {
                write!(f, "date range end {end} is before start {start}")
            }
        }
    }
}

impl std::error::Error for DateRangeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert!(range.contains(date(2024, 3, 1)));
        assert!(range.contains(date(2024, 3, 31)));
        assert!(!range.contains(date(2024, 4, 1)));
        assert!(!range.contains(date(2024, 2, 29)));
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let err = DateRange::new(date(2024, 3, 2), date(2024, 3, 1)).unwrap_err();
        assert!(err.to_string().contains("before start"));
    }

    #[test]
    fn deserializing_a_reversed_range_fails() {
        let ok: DateRange =
            serde_json::from_str(r#"{"start":"2024-03-01","end":"2024-03-31"}"#).unwrap();
        assert_eq!(ok.start(), date(2024, 3, 1));
        assert_eq!(ok.end(), date(2024, 3, 31));

        let err = serde_json::from_str::<DateRange>(r#"{"start":"2024-03-31","end":"2024-03-01"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("before start"));
    }

    #[test]
    fn priority_sorts_high_first() {
        let mut values = vec![Priority::Low, Priority::High, Priority::Medium];
        values.sort();
        assert_eq!(values, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn tax_kind_other_round_trips_through_json() {
        let kind = TaxKind::Other("local_business_tax".into());
        let json = serde_json::to_string(&kind).unwrap();
        let back: TaxKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
        assert_eq!(back.as_str(), "local_business_tax");
    }
}
