//! Roster data structures: labor entries, ODC rows and task breakdowns

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::periods::Period;
use crate::engine::derive_hourly_rate;
use crate::error::{Result, TrackerError};

/// Per-period numeric values (hours or revenue)
///
/// A period with no recorded value reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodValues(BTreeMap<Period, f64>);

impl PeriodValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a period, zero if absent
    pub fn get(&self, period: &Period) -> f64 {
        self.0.get(period).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, period: Period, value: f64) {
        self.0.insert(period, value);
    }

    pub fn contains(&self, period: &Period) -> bool {
        self.0.contains_key(period)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Period, f64)> {
        self.0.iter().map(|(p, &v)| (p, v))
    }

    /// Sum over every recorded period
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Period, f64)> for PeriodValues {
    fn from_iter<I: IntoIterator<Item = (Period, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How an entry's hourly rate is obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum RateBasis {
    /// Salaried employee, rate derived from current salary
    Salary {
        priced_salary: f64,
        current_salary: f64,
        hours_per_month: f64,
    },
    /// Subcontractor billed at a fixed hourly rate
    Hourly { hourly_rate: f64 },
}

/// Employment status of a roster entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
    ContractEnded,
}

impl EmploymentStatus {
    /// Text as it appears in roster files
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Active => "Active",
            EmploymentStatus::Inactive => "Inactive",
            EmploymentStatus::OnLeave => "On Leave",
            EmploymentStatus::ContractEnded => "Contract Ended",
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        match text.trim() {
            "" | "Active" => Ok(EmploymentStatus::Active),
            "Inactive" => Ok(EmploymentStatus::Inactive),
            "On Leave" => Ok(EmploymentStatus::OnLeave),
            "Contract Ended" => Ok(EmploymentStatus::ContractEnded),
            other => Err(TrackerError::UnknownValue {
                field: "Status",
                value: other.to_string(),
            }),
        }
    }
}

/// One person (employee or subcontractor) on the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborEntry {
    /// Display name, unique within its roster
    pub name: String,

    /// Labor category (LCAT)
    pub category: String,

    /// Employer; the prime for employees, the sub's firm for subcontractors
    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub status: EmploymentStatus,

    pub rate_basis: RateBasis,

    /// Hours worked by period
    #[serde(default)]
    pub period_hours: PeriodValues,

    /// Revenue by period, derived from hours on every recompute
    #[serde(default)]
    period_revenue: PeriodValues,
}

impl LaborEntry {
    /// Salaried employee with no hours recorded yet
    pub fn employee(
        name: impl Into<String>,
        category: impl Into<String>,
        priced_salary: f64,
        current_salary: f64,
        hours_per_month: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            company: None,
            status: EmploymentStatus::Active,
            rate_basis: RateBasis::Salary {
                priced_salary,
                current_salary,
                hours_per_month,
            },
            period_hours: PeriodValues::new(),
            period_revenue: PeriodValues::new(),
        }
    }

    /// Subcontractor billed at a fixed hourly rate
    pub fn subcontractor(
        name: impl Into<String>,
        company: impl Into<String>,
        category: impl Into<String>,
        hourly_rate: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            company: Some(company.into()),
            status: EmploymentStatus::Active,
            rate_basis: RateBasis::Hourly { hourly_rate },
            period_hours: PeriodValues::new(),
            period_revenue: PeriodValues::new(),
        }
    }

    /// Builder-style hours entry, mostly for fixtures
    pub fn with_hours(mut self, period: impl Into<Period>, hours: f64) -> Self {
        self.period_hours.set(period.into(), hours);
        self
    }

    pub fn with_status(mut self, status: EmploymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_salaried(&self) -> bool {
        matches!(self.rate_basis, RateBasis::Salary { .. })
    }

    /// Rate used for revenue: salary-derived for employees, contracted for subs
    pub fn effective_hourly_rate(&self) -> f64 {
        match self.rate_basis {
            RateBasis::Salary {
                current_salary,
                hours_per_month,
                ..
            } => derive_hourly_rate(current_salary, hours_per_month),
            RateBasis::Hourly { hourly_rate } => hourly_rate,
        }
    }

    /// Rate the contract was priced at
    pub fn priced_hourly_rate(&self) -> f64 {
        match self.rate_basis {
            RateBasis::Salary {
                priced_salary,
                hours_per_month,
                ..
            } => derive_hourly_rate(priced_salary, hours_per_month),
            RateBasis::Hourly { hourly_rate } => hourly_rate,
        }
    }

    pub fn current_salary(&self) -> Option<f64> {
        match self.rate_basis {
            RateBasis::Salary { current_salary, .. } => Some(current_salary),
            RateBasis::Hourly { .. } => None,
        }
    }

    pub fn hourly_rate(&self) -> Option<f64> {
        match self.rate_basis {
            RateBasis::Hourly { hourly_rate } => Some(hourly_rate),
            RateBasis::Salary { .. } => None,
        }
    }

    pub fn hours(&self, period: &Period) -> f64 {
        self.period_hours.get(period)
    }

    pub fn revenue(&self, period: &Period) -> f64 {
        self.period_revenue.get(period)
    }

    /// Derived revenue as of the last recompute
    pub fn period_revenue(&self) -> &PeriodValues {
        &self.period_revenue
    }

    pub(crate) fn period_revenue_mut(&mut self) -> &mut PeriodValues {
        &mut self.period_revenue
    }

    pub fn total_hours(&self) -> f64 {
        self.period_hours.total()
    }

    pub fn total_revenue(&self) -> f64 {
        self.period_revenue.total()
    }
}

/// Other direct cost not tied to labor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdcEntry {
    pub period: Period,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

impl OdcEntry {
    pub fn new(period: impl Into<Period>, amount: f64, description: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            amount,
            description: description.into(),
        }
    }
}

/// One line of the task breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub task_id: String,
    pub task_name: String,
    pub category: String,
    pub person_org: String,
    pub person: String,
    pub hours: f64,
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_period_reads_zero() {
        let values: PeriodValues = [(Period::from("P1"), 8.0)].into_iter().collect();

        assert_eq!(values.get(&Period::from("P1")), 8.0);
        assert_eq!(values.get(&Period::from("P2")), 0.0);
        assert_eq!(values.total(), 8.0);
    }

    #[test]
    fn test_employee_rates() {
        let emp = LaborEntry::employee("Uyen Tran", "SA/Eng Lead", 180_000.0, 175_000.0, 173.0);

        assert!(emp.is_salaried());
        assert_relative_eq!(emp.effective_hourly_rate(), 175_000.0 / (173.0 * 12.0));
        assert_relative_eq!(emp.priced_hourly_rate(), 180_000.0 / (173.0 * 12.0));
        assert_eq!(emp.current_salary(), Some(175_000.0));
        assert_eq!(emp.hourly_rate(), None);
    }

    #[test]
    fn test_subcontractor_rate_is_contracted() {
        let sub = LaborEntry::subcontractor("Adrien Adams", "BEELINE", "Data Systems SME", 250.0);

        assert!(!sub.is_salaried());
        assert_eq!(sub.effective_hourly_rate(), 250.0);
        assert_eq!(sub.company.as_deref(), Some("BEELINE"));
    }

    #[test]
    fn test_zero_salary_employee_has_zero_rate() {
        let emp = LaborEntry::employee("Drew Hynes", "PM", 0.0, 0.0, 173.0);
        assert_eq!(emp.effective_hourly_rate(), 0.0);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(EmploymentStatus::parse("On Leave").unwrap(), EmploymentStatus::OnLeave);
        assert_eq!(EmploymentStatus::parse("").unwrap(), EmploymentStatus::Active);
        assert!(EmploymentStatus::parse("Retired").is_err());
    }
}
