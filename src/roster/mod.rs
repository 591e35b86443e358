//! Roster data structures, contract periods and CSV loading

mod data;
mod periods;
pub mod loader;
pub mod merge;
pub mod validation;

pub use data::{EmploymentStatus, LaborEntry, OdcEntry, PeriodValues, RateBasis, TaskEntry};
pub use periods::{ContractCalendar, Period, PeriodSet, MAX_PERIOD_COUNT};
pub use merge::{detect_duplicates, merge_entries, MergeStrategy};
pub use validation::{validate_calendar, validate_project};
