//! Project Financials - aggregation and allocation engine for labor contracts
//!
//! This library provides:
//! - Hourly rate derivation from salaries and revenue recomputation from hours
//! - Period, cumulative and category aggregation across rosters
//! - Fringe, overhead and G&A allocation on direct labor
//! - Project-level financial summary against the contract price
//! - CSV loading, validation, reports, JSON snapshots and what-if scenarios

pub mod error;
pub mod roster;
pub mod params;
pub mod engine;
pub mod project;
pub mod reports;
pub mod snapshot;
pub mod scenario;

// Re-export commonly used types
pub use error::{Result, TrackerError, ValidationReport};
pub use roster::{LaborEntry, OdcEntry, Period, PeriodSet, TaskEntry};
pub use params::{ProjectConfig, ProjectParameters, RecomputeConfig, RevenueBasis};
pub use engine::{FinancialSummary, IndirectCostResult};
pub use project::{Project, RosterKind};
pub use snapshot::Snapshot;
pub use scenario::ScenarioRunner;
