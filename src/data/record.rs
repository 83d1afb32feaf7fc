//! Per-record cleaning and derivation rules.
//!
//! Everything here is a pure function of a single raw row, so the pipeline
//! in `processor` stays a straight map/filter over the loaded frame.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Substrings marking an operator as a military one. Case-sensitive.
pub const MILITARY_KEYWORDS: [&str; 5] = ["Military", "Air Force", "Army", "Navy", "Marine"];

/// A record is fatal when at least this share of those aboard died.
pub const FATAL_RATIO_THRESHOLD: f64 = 0.5;

/// Date layouts accepted for `CrashDate`, tried in order.
const DATE_FORMATS: [&str; 6] = [
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%d %B %Y",
    "%B %d, %Y",
];

/// Binary classification of the operating entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OperatorCategory {
    Military,
    Civilian,
}

impl OperatorCategory {
    pub const ALL: [OperatorCategory; 2] = [OperatorCategory::Military, OperatorCategory::Civilian];

    /// Classify an operator name. A missing operator is civilian.
    pub fn classify(operator: Option<&str>) -> Self {
        match operator {
            Some(name) if MILITARY_KEYWORDS.iter().any(|kw| name.contains(kw)) => Self::Military,
            _ => Self::Civilian,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Military => "Military",
            Self::Civilian => "Civilian",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for OperatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned, fully derived accident row.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRecord {
    pub crash_date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    pub operator: Option<String>,
    pub aircraft_type: Option<String>,
    pub fatalities: f64,
    pub aboard: f64,
    pub summary: Option<String>,
    pub year: i32,
    pub decade: i32,
    pub period: i32,
    pub fatality_ratio: f64,
    pub is_fatal: bool,
    pub operator_category: OperatorCategory,
}

/// Raw string fields of one projected row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFields<'a> {
    pub crash_date: Option<&'a str>,
    pub time: Option<&'a str>,
    pub location: Option<&'a str>,
    pub operator: Option<&'a str>,
    pub aircraft_type: Option<&'a str>,
    pub fatalities: Option<&'a str>,
    pub aboard: Option<&'a str>,
    pub summary: Option<&'a str>,
}

/// Why a raw row did not make it into the prepared table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Fatalities or Aboard missing or unparseable.
    MissingCount,
    /// CrashDate missing or unparseable.
    UnparseableDate,
}

impl PreparedRecord {
    /// Clean and derive one row.
    ///
    /// The count check runs before the date check, so a row lacking Aboard
    /// is reported as `MissingCount` whatever its date looks like.
    pub fn from_raw(raw: &RawFields<'_>) -> Result<Self, DropReason> {
        let (Some(fatalities), Some(aboard)) =
            (parse_count(raw.fatalities), parse_count(raw.aboard))
        else {
            return Err(DropReason::MissingCount);
        };

        let crash_date = raw
            .crash_date
            .and_then(parse_crash_date)
            .ok_or(DropReason::UnparseableDate)?;
        let year = crash_date.year();

        let fatality_ratio = fatality_ratio(fatalities, aboard);
        let operator_category = OperatorCategory::classify(raw.operator);

        Ok(Self {
            crash_date,
            time: raw.time.map(str::to_owned),
            location: raw.location.map(str::to_owned),
            operator: raw.operator.map(str::to_owned),
            aircraft_type: raw.aircraft_type.map(str::to_owned),
            fatalities,
            aboard,
            summary: raw.summary.map(str::to_owned),
            year,
            decade: decade_of(year),
            period: period_of(year),
            fatality_ratio,
            is_fatal: fatality_ratio >= FATAL_RATIO_THRESHOLD,
            operator_category,
        })
    }
}

/// Parse a head count. Negative, non-finite and non-numeric values are
/// treated as missing.
pub fn parse_count(value: Option<&str>) -> Option<f64> {
    let parsed: f64 = value?.trim().parse().ok()?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

pub fn parse_crash_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Share of those aboard who died, in `[0, 1]`.
///
/// Both boundary patches are applied to the raw quotient independently:
/// first an empty aircraft forces 0, then anything above 1 is clamped.
pub fn fatality_ratio(fatalities: f64, aboard: f64) -> f64 {
    let mut ratio = fatalities / aboard;
    if aboard == 0.0 {
        ratio = 0.0;
    }
    if ratio > 1.0 {
        ratio = 1.0;
    }
    ratio
}

pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

pub fn period_of(year: i32) -> i32 {
    year.div_euclid(5) * 5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw<'a>(date: &'a str, fatalities: &'a str, aboard: &'a str) -> RawFields<'a> {
        RawFields {
            crash_date: Some(date),
            operator: Some("Delta Air Lines"),
            fatalities: Some(fatalities),
            aboard: Some(aboard),
            ..Default::default()
        }
    }

    #[test]
    fn test_ratio_clamped_above_one() {
        assert_eq!(fatality_ratio(120.0, 100.0), 1.0);
    }

    #[test]
    fn test_ratio_zero_aboard_overrides() {
        let ratio = fatality_ratio(5.0, 0.0);
        assert_eq!(ratio, 0.0);
        assert!(!ratio.is_nan());
        assert_eq!(fatality_ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_ratio_plain_division() {
        assert_eq!(fatality_ratio(25.0, 100.0), 0.25);
        assert_eq!(fatality_ratio(0.0, 50.0), 0.0);
    }

    #[test]
    fn test_operator_classification() {
        assert_eq!(
            OperatorCategory::classify(Some("US Air Force")),
            OperatorCategory::Military
        );
        assert_eq!(
            OperatorCategory::classify(Some("Delta Air Lines")),
            OperatorCategory::Civilian
        );
        assert_eq!(
            OperatorCategory::classify(Some("Marine Corps")),
            OperatorCategory::Military
        );
        assert_eq!(
            OperatorCategory::classify(Some("Military - Royal Air Force")),
            OperatorCategory::Military
        );
    }

    #[test]
    fn test_operator_classification_is_case_sensitive() {
        assert_eq!(
            OperatorCategory::classify(Some("us navy")),
            OperatorCategory::Civilian
        );
        assert_eq!(OperatorCategory::classify(None), OperatorCategory::Civilian);
    }

    #[test]
    fn test_category_labels_round_trip_names() {
        assert_eq!(OperatorCategory::Military.to_string(), "Military");
        assert_eq!(
            OperatorCategory::from_label("Civilian"),
            Some(OperatorCategory::Civilian)
        );
        assert_eq!(OperatorCategory::from_label("civilian"), None);
    }

    #[test]
    fn test_decade_and_period() {
        assert_eq!(decade_of(1987), 1980);
        assert_eq!(period_of(1987), 1985);
        assert_eq!(decade_of(1990), 1990);
        assert_eq!(period_of(1990), 1990);
        assert_eq!(period_of(1994), 1990);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("12")), Some(12.0));
        assert_eq!(parse_count(Some(" 3.0 ")), Some(3.0));
        assert_eq!(parse_count(Some("")), None);
        assert_eq!(parse_count(Some("n/a")), None);
        assert_eq!(parse_count(Some("-1")), None);
        assert_eq!(parse_count(Some("NaN")), None);
        assert_eq!(parse_count(None), None);
    }

    #[test]
    fn test_parse_crash_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1908, 9, 17).unwrap();
        assert_eq!(parse_crash_date("09/17/1908"), Some(expected));
        assert_eq!(parse_crash_date("1908-09-17"), Some(expected));
        assert_eq!(parse_crash_date("17 September 1908"), Some(expected));
        assert_eq!(parse_crash_date("sometime in 1908"), None);
        assert_eq!(parse_crash_date("13/45/1908"), None);
    }

    #[test]
    fn test_from_raw_derives_every_field() {
        let record = PreparedRecord::from_raw(&raw("07/12/1987", "60", "100")).unwrap();
        assert_eq!(record.year, 1987);
        assert_eq!(record.decade, 1980);
        assert_eq!(record.period, 1985);
        assert_eq!(record.fatality_ratio, 0.6);
        assert!(record.is_fatal);
        assert_eq!(record.operator_category, OperatorCategory::Civilian);
        assert_eq!(record.operator.as_deref(), Some("Delta Air Lines"));
    }

    #[test]
    fn test_is_fatal_threshold_inclusive() {
        let half = PreparedRecord::from_raw(&raw("01/01/1950", "5", "10")).unwrap();
        assert!(half.is_fatal);
        let below = PreparedRecord::from_raw(&raw("01/01/1950", "4", "10")).unwrap();
        assert!(!below.is_fatal);
    }

    #[test]
    fn test_from_raw_missing_aboard_dropped_regardless_of_date() {
        let mut fields = raw("01/01/1950", "3", "");
        fields.aboard = None;
        assert_eq!(
            PreparedRecord::from_raw(&fields),
            Err(DropReason::MissingCount)
        );
        fields.crash_date = Some("not a date");
        assert_eq!(
            PreparedRecord::from_raw(&fields),
            Err(DropReason::MissingCount)
        );
    }

    #[test]
    fn test_from_raw_bad_date_dropped() {
        assert_eq!(
            PreparedRecord::from_raw(&raw("??", "1", "2")),
            Err(DropReason::UnparseableDate)
        );
    }
}
