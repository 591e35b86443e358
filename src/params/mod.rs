//! Contract parameters and project configuration

pub mod loader;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{CategoryPolicy, EMPLOYEE_MARKUP};
use crate::roster::ContractCalendar;

pub use loader::{DEFAULT_DATA_PATH, PROJECT_CONFIG_FILE};

/// Standard monthly hours used when pricing a full-time month
pub const STANDARD_MONTHLY_HOURS: f64 = 173.0;

/// Conventional pass-through markup for subcontractor revenue
pub const CONVENTIONAL_SUBCONTRACTOR_MARKUP: f64 = 1.2;

/// Hours basis for the recalculated-revenue ratio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueBasis {
    /// Actual hours plus the (signed) non-billable adjustment
    #[default]
    BillableHours,
    /// Actual hours alone
    ActualHours,
}

/// Scalar contract configuration
///
/// Rates are fractions and are not clamped; out-of-range values flow through
/// to out-of-range results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectParameters {
    /// Status date for the figures, if known
    pub current_date: Option<NaiveDate>,

    /// Estimate-at-completion hours
    pub eac_hours: f64,

    /// Hours worked to date
    pub actual_hours: f64,

    /// Signed adjustment to actual hours, usually negative
    pub non_billable_hours: f64,

    /// Total contract transaction price
    pub total_transaction_price: f64,

    pub fringe_rate: f64,
    pub overhead_rate: f64,
    pub ga_rate: f64,

    /// Target profit margin as a fraction of revenue
    pub target_profit: f64,

    pub revenue_basis: RevenueBasis,
}

impl Default for ProjectParameters {
    fn default() -> Self {
        Self {
            current_date: None,
            eac_hours: 37_626.75,
            actual_hours: 26_656.5,
            non_billable_hours: -357.75,
            total_transaction_price: 8_079_029.79,
            fringe_rate: 0.326,
            overhead_rate: 0.150,
            ga_rate: 0.275,
            target_profit: 0.3947,
            revenue_basis: RevenueBasis::BillableHours,
        }
    }
}

impl ProjectParameters {
    /// Actual hours adjusted by non-billable hours
    pub fn billable_hours(&self) -> f64 {
        self.actual_hours + self.non_billable_hours
    }

    /// Hours used in the recalculated-revenue ratio
    pub fn revenue_hours(&self) -> f64 {
        match self.revenue_basis {
            RevenueBasis::BillableHours => self.billable_hours(),
            RevenueBasis::ActualHours => self.actual_hours,
        }
    }

    /// Combined fringe + overhead + G&A rate
    pub fn total_indirect_rate(&self) -> f64 {
        self.fringe_rate + self.overhead_rate + self.ga_rate
    }
}

/// Markups and grouping policy used when recomputing derived fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecomputeConfig {
    pub employee_markup: f64,
    pub subcontractor_markup: f64,
    pub category_policy: CategoryPolicy,
}

impl Default for RecomputeConfig {
    fn default() -> Self {
        Self {
            employee_markup: EMPLOYEE_MARKUP,
            subcontractor_markup: 1.0,
            category_policy: CategoryPolicy::Exact,
        }
    }
}

/// Everything a project needs besides its rosters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub parameters: ProjectParameters,
    pub calendar: ContractCalendar,
    pub recompute: RecomputeConfig,
}
