//! Input validation run before the engine sees any data
//!
//! Every check collects issues into a [`ValidationReport`] instead of stopping
//! at the first problem, so a caller can show all of them at once.

use std::collections::HashSet;

use super::periods::MAX_PERIOD_COUNT;
use super::{ContractCalendar, LaborEntry, OdcEntry, PeriodSet, RateBasis};
use crate::error::{Result, ValidationReport};
use crate::params::ProjectParameters;

fn subject(entry: &LaborEntry) -> String {
    if entry.name.trim().is_empty() {
        "(unnamed entry)".to_string()
    } else {
        entry.name.clone()
    }
}

/// Check a salaried employee's fields
pub fn validate_employee(entry: &LaborEntry) -> ValidationReport {
    let mut report = ValidationReport::new();
    let who = subject(entry);

    if entry.name.trim().is_empty() {
        report.push(&who, "Employee names cannot be empty");
    }
    if entry.category.trim().is_empty() {
        report.push(&who, "Missing required field: LCAT");
    }

    match entry.rate_basis {
        RateBasis::Salary {
            priced_salary,
            current_salary,
            hours_per_month,
        } => {
            if current_salary < 0.0 || current_salary.is_nan() {
                report.push(&who, "Current salary must be a non-negative number");
            }
            if priced_salary < 0.0 || priced_salary.is_nan() {
                report.push(&who, "Priced salary must be a non-negative number");
            }
            if !(hours_per_month > 0.0) {
                report.push(&who, "Hours per month must be positive");
            }
        }
        RateBasis::Hourly { .. } => {
            report.push(&who, "Employees must carry a salary, not an hourly rate");
        }
    }

    report
}

/// Check a subcontractor's fields
pub fn validate_subcontractor(entry: &LaborEntry) -> ValidationReport {
    let mut report = ValidationReport::new();
    let who = subject(entry);

    if entry.name.trim().is_empty() {
        report.push(&who, "Subcontractor names cannot be empty");
    }
    if entry.category.trim().is_empty() {
        report.push(&who, "Missing required field: LCAT");
    }
    if entry.company.as_deref().map_or(true, |c| c.trim().is_empty()) {
        report.push(&who, "Missing required field: Company");
    }

    match entry.rate_basis {
        RateBasis::Hourly { hourly_rate } => {
            if !(hourly_rate > 0.0) {
                report.push(&who, "Hourly rate must be positive");
            }
        }
        RateBasis::Salary { .. } => {
            report.push(&who, "Subcontractors must carry an hourly rate, not a salary");
        }
    }

    report
}

/// Check roster-wide rules: unique names, known periods, non-negative hours
///
/// Per-entry checks are chosen by each entry's rate basis.
pub fn validate_roster(roster: &[LaborEntry], periods: &PeriodSet) -> ValidationReport {
    let mut report = ValidationReport::new();
    let mut seen = HashSet::new();

    for entry in roster {
        report.extend(if entry.is_salaried() {
            validate_employee(entry)
        } else {
            validate_subcontractor(entry)
        });

        let who = subject(entry);
        if !seen.insert(entry.name.as_str()) {
            report.push(&who, "Name appears more than once in the roster");
        }

        for (period, hours) in entry.period_hours.iter() {
            if !periods.contains(period) {
                report.push(&who, format!("Hours recorded for unknown period {}", period));
            }
            if hours < 0.0 || hours.is_nan() {
                report.push(&who, format!("Hours for {} must be non-negative", period));
            }
        }
    }

    report
}

/// Check ODC rows against the period set
pub fn validate_odc(entries: &[OdcEntry], periods: &PeriodSet) -> ValidationReport {
    let mut report = ValidationReport::new();

    for entry in entries {
        let who = format!("ODC {}", entry.period);
        if !periods.contains(&entry.period) {
            report.push(&who, "Period is not part of the contract period set");
        }
        if entry.amount < 0.0 || entry.amount.is_nan() {
            report.push(&who, "Amount cannot be negative");
        }
    }

    report
}

/// Check contract parameters
pub fn validate_params(params: &ProjectParameters) -> ValidationReport {
    let mut report = ValidationReport::new();

    if !(params.eac_hours > 0.0) {
        report.push("parameters", "EAC hours must be positive");
    }
    if params.total_transaction_price < 0.0 || params.total_transaction_price.is_nan() {
        report.push("parameters", "Total transaction price cannot be negative");
    }

    report
}

/// Check that a calendar can generate its whole period set
pub fn validate_calendar(calendar: &ContractCalendar) -> ValidationReport {
    let mut report = ValidationReport::new();

    if calendar.period_days == 0 {
        report.push("calendar", "Period length must be at least one day");
    }
    if calendar.period_count > MAX_PERIOD_COUNT {
        report.push(
            "calendar",
            format!("Period count {} exceeds the limit of {}", calendar.period_count, MAX_PERIOD_COUNT),
        );
    }
    if report.is_empty()
        && calendar.period_count > 0
        && calendar.period_bounds(calendar.period_count - 1).is_none()
    {
        report.push("calendar", "Contract runs past the last representable date");
    }

    report
}

/// Run every check and fail with the combined report
pub fn validate_project(
    employees: &[LaborEntry],
    subcontractors: &[LaborEntry],
    odc: &[OdcEntry],
    periods: &PeriodSet,
    params: &ProjectParameters,
) -> Result<()> {
    let mut report = validate_params(params);
    report.extend(validate_roster(employees, periods));
    report.extend(validate_roster(subcontractors, periods));
    report.extend(validate_odc(odc, periods));
    report.into_result()
}
