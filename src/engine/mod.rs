//! Financial aggregation and allocation engine
//!
//! Pure calculations over caller-owned rosters:
//! - Hourly rate derivation from salary
//! - Per-period revenue, roster sums and cumulative burn-rate series
//! - Fringe, overhead and G&A allocation on direct labor
//! - Project-level completion, revenue and profit/loss summary
//!
//! Nothing here performs I/O or keeps state between calls. Degenerate inputs
//! (zero salary, zero EAC hours, zero revenue) produce zero rather than errors.

mod rates;
mod aggregate;
mod indirect;
mod summary;

pub use rates::{derive_hourly_rate, MONTHS_PER_YEAR};
pub use aggregate::{
    recompute_revenue, recompute_roster, sum_across_roster, period_totals, cumulative_series,
    group_by_category, CategoryPolicy, CumulativeSeries, Measure, PeriodSelection, EMPLOYEE_MARKUP,
};
pub use indirect::{allocate, IndirectCostResult};
pub use summary::{summarize, FinancialSummary};
