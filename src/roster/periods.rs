//! Contract periods and the calendar that generates them

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::validation::validate_calendar;
use crate::error::{Result, TrackerError};

/// Label format used for generated periods (inclusive date range)
const PERIOD_DATE_FORMAT: &str = "%m/%d/%Y";

/// Upper bound on generated periods (a century of monthly periods)
pub const MAX_PERIOD_COUNT: usize = 1_200;

/// An opaque, string-labelled time bucket
///
/// Ordering between periods comes from the [`PeriodSet`] they belong to, not
/// from the label text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(String);

impl Period {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Inclusive dates of a `MM/DD/YYYY-MM/DD/YYYY` label; `None` for other labels
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let (start, end) = self.0.split_once('-')?;
        let start = NaiveDate::parse_from_str(start.trim(), PERIOD_DATE_FORMAT).ok()?;
        let end = NaiveDate::parse_from_str(end.trim(), PERIOD_DATE_FORMAT).ok()?;
        Some((start, end))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Period {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Period {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl Borrow<str> for Period {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Ordered, duplicate-free set of periods shared by a whole project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Period>", into = "Vec<Period>")]
pub struct PeriodSet {
    periods: Vec<Period>,
    index: HashMap<Period, usize>,
}

impl PeriodSet {
    /// Build from periods in order, rejecting duplicate labels
    pub fn from_periods(periods: Vec<Period>) -> Result<Self> {
        let mut index = HashMap::with_capacity(periods.len());
        for (i, period) in periods.iter().enumerate() {
            if index.insert(period.clone(), i).is_some() {
                return Err(TrackerError::DuplicatePeriod(period.label().to_string()));
            }
        }
        Ok(Self { periods, index })
    }

    pub fn from_labels<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_periods(labels.into_iter().map(Period::new).collect())
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn contains(&self, period: &Period) -> bool {
        self.index.contains_key(period)
    }

    /// Position of a period within the set
    pub fn index_of(&self, period: &Period) -> Option<usize> {
        self.index.get(period).copied()
    }

    /// Look up a period by its label
    pub fn get(&self, label: &str) -> Option<&Period> {
        self.index.get(label).map(|&i| &self.periods[i])
    }

    pub fn first(&self) -> Option<&Period> {
        self.periods.first()
    }

    pub fn last(&self) -> Option<&Period> {
        self.periods.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Period> {
        self.periods.iter()
    }

    pub fn as_slice(&self) -> &[Period] {
        &self.periods
    }

    /// Position of the first period whose dated label covers `date`
    pub fn index_containing(&self, date: NaiveDate) -> Option<usize> {
        self.periods.iter().position(|period| {
            period
                .date_range()
                .is_some_and(|(start, end)| start <= date && date <= end)
        })
    }
}

impl TryFrom<Vec<Period>> for PeriodSet {
    type Error = TrackerError;

    fn try_from(periods: Vec<Period>) -> Result<Self> {
        Self::from_periods(periods)
    }
}

impl From<PeriodSet> for Vec<Period> {
    fn from(set: PeriodSet) -> Self {
        set.periods
    }
}

impl<'a> IntoIterator for &'a PeriodSet {
    type Item = &'a Period;
    type IntoIter = std::slice::Iter<'a, Period>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

/// Contract calendar used to generate the period set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractCalendar {
    /// First day of the first period
    pub start: NaiveDate,

    /// Length of each period in days
    pub period_days: u32,

    /// Number of periods on the contract (base year + option years)
    pub period_count: usize,

    /// Periods making up one contract year
    pub periods_per_year: usize,
}

impl Default for ContractCalendar {
    fn default() -> Self {
        Self {
            // Base year starts 03/13/2024, one option year follows
            start: NaiveDate::from_ymd_opt(2024, 3, 13).expect("valid contract start date"),
            period_days: 30,
            period_count: 24,
            periods_per_year: 12,
        }
    }
}

impl ContractCalendar {
    /// Start and end date (inclusive) of the period at `index`
    ///
    /// `None` past the last period or when the date would overflow.
    pub fn period_bounds(&self, index: usize) -> Option<(NaiveDate, NaiveDate)> {
        if self.period_days == 0 || index >= self.period_count {
            return None;
        }
        let days = i64::from(self.period_days);
        let offset = days.checked_mul(i64::try_from(index).ok()?)?;
        let start = self.start.checked_add_signed(Duration::try_days(offset)?)?;
        let end = start.checked_add_signed(Duration::try_days(days - 1)?)?;
        Some((start, end))
    }

    /// Generate the labelled period set, e.g. `03/13/2024-04/11/2024`
    pub fn period_set(&self) -> Result<PeriodSet> {
        validate_calendar(self).into_result()?;

        let periods: Vec<Period> = (0..self.period_count)
            .filter_map(|i| self.period_bounds(i))
            .map(|(start, end)| {
                Period::new(format!(
                    "{}-{}",
                    start.format(PERIOD_DATE_FORMAT),
                    end.format(PERIOD_DATE_FORMAT)
                ))
            })
            .collect();

        // Consecutive date ranges never repeat a label
        Ok(PeriodSet {
            index: periods.iter().cloned().enumerate().map(|(i, p)| (p, i)).collect(),
            periods,
        })
    }

    /// Index of the period covering `date`, if the date falls inside the contract
    pub fn period_index_containing(&self, date: NaiveDate) -> Option<usize> {
        if self.period_days == 0 || date < self.start {
            return None;
        }
        let offset = (date - self.start).num_days() / i64::from(self.period_days);
        let index = offset as usize;
        (index < self.period_count).then_some(index)
    }

    /// "Base Year" for the first contract year, then "Option Year N"
    pub fn contract_year(&self, index: usize) -> String {
        let year = if self.periods_per_year == 0 {
            0
        } else {
            index / self.periods_per_year
        };
        if year == 0 {
            "Base Year".to_string()
        } else {
            format!("Option Year {}", year)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_calendar_labels() {
        let periods = ContractCalendar::default().period_set().unwrap();

        assert_eq!(periods.len(), 24);
        assert_eq!(periods.first().unwrap().label(), "03/13/2024-04/11/2024");
        assert_eq!(periods.as_slice()[11].label(), "02/06/2025-03/07/2025");
        assert_eq!(periods.last().unwrap().label(), "02/01/2026-03/02/2026");
    }

    #[test]
    fn test_period_set_rejects_duplicates() {
        let err = PeriodSet::from_labels(["P1", "P2", "P1"]).unwrap_err();
        assert!(matches!(err, TrackerError::DuplicatePeriod(label) if label == "P1"));
    }

    #[test]
    fn test_period_set_lookup() {
        let periods = PeriodSet::from_labels(["Jan", "Feb", "Mar"]).unwrap();

        assert_eq!(periods.index_of(&Period::from("Feb")), Some(1));
        assert_eq!(periods.get("Mar"), Some(&Period::from("Mar")));
        assert!(!periods.contains(&Period::from("Apr")));
    }

    #[test]
    fn test_period_containing_date() {
        let calendar = ContractCalendar::default();
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        assert_eq!(calendar.period_index_containing(d(2024, 3, 13)), Some(0));
        assert_eq!(calendar.period_index_containing(d(2024, 4, 11)), Some(0));
        assert_eq!(calendar.period_index_containing(d(2024, 4, 12)), Some(1));
        assert_eq!(calendar.period_index_containing(d(2024, 3, 12)), None);
        assert_eq!(calendar.period_index_containing(d(2027, 1, 1)), None);
    }

    #[test]
    fn test_loaded_labels_locate_dates() {
        // Option year restarting on its own date, as supplied through periods.csv
        let periods = PeriodSet::from_labels([
            "02/06/2025-03/07/2025",
            "03/08/2025-04/07/2025",
            "08/06/2025-09/04/2025",
            "Closeout",
        ])
        .unwrap();
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        assert_eq!(periods.index_containing(d(2025, 3, 8)), Some(1));
        assert_eq!(periods.index_containing(d(2025, 9, 1)), Some(2));
        assert_eq!(periods.index_containing(d(2025, 5, 1)), None);
        assert_eq!(Period::from("Closeout").date_range(), None);

        // The generated calendar has already moved on to its 14th period
        assert_eq!(periods.index_containing(d(2025, 4, 7)), Some(1));
        let calendar = ContractCalendar::default().period_set().unwrap();
        assert_eq!(calendar.index_containing(d(2025, 4, 7)), Some(13));
    }

    #[test]
    fn test_contract_year_names() {
        let calendar = ContractCalendar::default();

        assert_eq!(calendar.contract_year(0), "Base Year");
        assert_eq!(calendar.contract_year(11), "Base Year");
        assert_eq!(calendar.contract_year(12), "Option Year 1");
    }

    #[test]
    fn test_zero_length_periods_are_rejected() {
        let calendar = ContractCalendar {
            period_days: 0,
            ..Default::default()
        };
        assert!(matches!(calendar.period_set(), Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_calendar_past_last_date_is_rejected() {
        let calendar = ContractCalendar {
            period_days: 100_000_000,
            period_count: 2,
            ..Default::default()
        };

        assert_eq!(calendar.period_bounds(1), None);
        match calendar.period_set() {
            Err(TrackerError::Validation(report)) => {
                assert_eq!(report.issues[0].subject, "calendar");
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_calendar_generates_nothing() {
        let calendar = ContractCalendar {
            period_count: 0,
            ..Default::default()
        };
        assert!(calendar.period_set().unwrap().is_empty());
    }

    #[test]
    fn test_period_set_json_round_trip_keeps_order() {
        let periods = PeriodSet::from_labels(["Z", "A", "M"]).unwrap();
        let json = serde_json::to_string(&periods).unwrap();
        assert_eq!(json, r#"["Z","A","M"]"#);

        let restored: PeriodSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, periods);
    }
}
