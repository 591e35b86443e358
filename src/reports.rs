//! Tabular reports built from a recomputed project
//!
//! Each report is a `Vec` of serde rows so the same data can be printed,
//! written as CSV or returned as JSON.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{period_totals, FinancialSummary, Measure};
use crate::error::Result;
use crate::params::STANDARD_MONTHLY_HOURS;
use crate::project::Project;
use crate::roster::{EmploymentStatus, LaborEntry, TaskEntry};

/// Revenue by source for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenueRow {
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "Employee_Revenue")]
    pub employee_revenue: f64,
    #[serde(rename = "Subcontractor_Revenue")]
    pub subcontractor_revenue: f64,
    #[serde(rename = "ODC")]
    pub odc: f64,
    #[serde(rename = "Total")]
    pub total: f64,
}

/// Revenue and headcount for one labor category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    #[serde(rename = "LCAT")]
    pub category: String,
    #[serde(rename = "Headcount")]
    pub headcount: usize,
    #[serde(rename = "Hours")]
    pub hours: f64,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
}

/// Burn-rate line: period and cumulative figures for the employee roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnRateRow {
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "Period_Hours")]
    pub period_hours: f64,
    #[serde(rename = "Period_Cost")]
    pub period_cost: f64,
    #[serde(rename = "Cumulative_Hours")]
    pub cumulative_hours: f64,
    #[serde(rename = "Cumulative_Cost")]
    pub cumulative_cost: f64,
    /// Cumulative hours as a percentage of EAC hours, 0 when EAC is not positive
    #[serde(rename = "Pct_Of_EAC")]
    pub pct_of_eac: f64,
}

/// Aggregate view of the employee roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeMetrics {
    pub total_employees: usize,
    pub active_employees: usize,
    pub inactive_employees: usize,
    pub on_leave_employees: usize,
    pub contract_ended_employees: usize,
    pub total_salary: f64,
    pub average_salary: f64,
}

/// Aggregate view of the subcontractor roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubcontractorMetrics {
    pub total_subcontractors: usize,
    pub average_hourly_rate: f64,
    /// Cost of every subcontractor working a standard month
    pub standard_monthly_cost: f64,
    /// Distinct companies, sorted
    pub companies: Vec<String>,
}

/// Task breakdown rolled up by task id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummaryRow {
    #[serde(rename = "Task_ID")]
    pub task_id: String,
    #[serde(rename = "Task_Name")]
    pub task_name: String,
    #[serde(rename = "Lines")]
    pub lines: usize,
    #[serde(rename = "Hours")]
    pub hours: f64,
    #[serde(rename = "Cost")]
    pub cost: f64,
    /// 0 when the task has no hours
    #[serde(rename = "Cost_Per_Hour")]
    pub cost_per_hour: f64,
}

/// One metric of the financial summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryLine {
    #[serde(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    pub value: f64,
}

/// Employee, subcontractor and ODC revenue per period, in period order
pub fn monthly_revenue(project: &Project) -> Vec<MonthlyRevenueRow> {
    let employee = period_totals(&project.employees, Measure::Revenue, &project.periods);
    let subcontractor = period_totals(&project.subcontractors, Measure::Revenue, &project.periods);

    let mut odc_by_period: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in &project.odc {
        *odc_by_period.entry(entry.period.label()).or_insert(0.0) += entry.amount;
    }

    project
        .periods
        .iter()
        .zip(employee)
        .zip(subcontractor)
        .map(|((period, employee_revenue), subcontractor_revenue)| {
            let odc = odc_by_period.get(period.label()).copied().unwrap_or(0.0);
            MonthlyRevenueRow {
                period: period.to_string(),
                employee_revenue,
                subcontractor_revenue,
                odc,
                total: employee_revenue + subcontractor_revenue + odc,
            }
        })
        .collect()
}

/// Employee roster grouped by category under the project's category policy
pub fn category_summary(project: &Project) -> Vec<CategoryRow> {
    let policy = project.config.recompute.category_policy;
    let mut rows: BTreeMap<String, CategoryRow> = BTreeMap::new();

    for entry in &project.employees {
        let key = policy.key(&entry.category);
        let row = rows.entry(key.clone()).or_insert_with(|| CategoryRow {
            category: key,
            headcount: 0,
            hours: 0.0,
            revenue: 0.0,
        });
        row.headcount += 1;
        row.hours += entry.total_hours();
        row.revenue += entry.total_revenue();
    }

    rows.into_values().collect()
}

/// Burn-rate table over the project's periods
pub fn burn_rate(project: &Project) -> Vec<BurnRateRow> {
    let hours = period_totals(&project.employees, Measure::Hours, &project.periods);
    let costs = period_totals(&project.employees, Measure::Revenue, &project.periods);
    let series = project.burn_rate();
    let eac = project.params().eac_hours;

    project
        .periods
        .iter()
        .enumerate()
        .map(|(i, period)| BurnRateRow {
            period: period.to_string(),
            period_hours: hours[i],
            period_cost: costs[i],
            cumulative_hours: series.hours[i],
            cumulative_cost: series.costs[i],
            pct_of_eac: if eac > 0.0 {
                series.hours[i] / eac * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Headcount and salary totals; the average covers salaried entries only
pub fn employee_metrics(employees: &[LaborEntry]) -> EmployeeMetrics {
    let salaries: Vec<f64> = employees.iter().filter_map(LaborEntry::current_salary).collect();
    let total_salary: f64 = salaries.iter().sum();
    let count = |status: EmploymentStatus| employees.iter().filter(|e| e.status == status).count();

    EmployeeMetrics {
        total_employees: employees.len(),
        active_employees: count(EmploymentStatus::Active),
        inactive_employees: count(EmploymentStatus::Inactive),
        on_leave_employees: count(EmploymentStatus::OnLeave),
        contract_ended_employees: count(EmploymentStatus::ContractEnded),
        total_salary,
        average_salary: if salaries.is_empty() {
            0.0
        } else {
            total_salary / salaries.len() as f64
        },
    }
}

/// Rate and company totals for subcontractors
pub fn subcontractor_metrics(subcontractors: &[LaborEntry]) -> SubcontractorMetrics {
    let rates: Vec<f64> = subcontractors.iter().filter_map(LaborEntry::hourly_rate).collect();
    let total_rate: f64 = rates.iter().sum();
    let companies: BTreeSet<String> = subcontractors
        .iter()
        .filter_map(|s| s.company.clone())
        .filter(|c| !c.trim().is_empty())
        .collect();

    SubcontractorMetrics {
        total_subcontractors: subcontractors.len(),
        average_hourly_rate: if rates.is_empty() {
            0.0
        } else {
            total_rate / rates.len() as f64
        },
        standard_monthly_cost: total_rate * STANDARD_MONTHLY_HOURS,
        companies: companies.into_iter().collect(),
    }
}

/// Task lines rolled up by task id, in first-seen order
pub fn task_summary(tasks: &[TaskEntry]) -> Vec<TaskSummaryRow> {
    let mut rows: Vec<TaskSummaryRow> = Vec::new();

    for task in tasks {
        match rows.iter_mut().find(|row| row.task_id == task.task_id) {
            Some(row) => {
                row.lines += 1;
                row.hours += task.hours;
                row.cost += task.cost;
            }
            None => rows.push(TaskSummaryRow {
                task_id: task.task_id.clone(),
                task_name: task.task_name.clone(),
                lines: 1,
                hours: task.hours,
                cost: task.cost,
                cost_per_hour: 0.0,
            }),
        }
    }

    for row in &mut rows {
        if row.hours > 0.0 {
            row.cost_per_hour = row.cost / row.hours;
        }
    }

    rows
}

/// Summary flattened into metric/value lines
pub fn summary_lines(summary: &FinancialSummary) -> Vec<SummaryLine> {
    let line = |metric: &str, value: f64| SummaryLine {
        metric: metric.to_string(),
        value,
    };

    vec![
        line("Completion %", summary.completion_percentage),
        line("Billable Hours", summary.billable_hours),
        line("Direct Labor", summary.total_direct_labor),
        line("Subcontractor", summary.total_subcontractor),
        line("ODC", summary.total_odc),
        line("Fringe", summary.indirect_costs.fringe),
        line("Overhead", summary.indirect_costs.overhead),
        line("G&A", summary.indirect_costs.ga),
        line("Total Indirect", summary.indirect_costs.total_indirect),
        line("Total Costs", summary.total_costs),
        line("Recalculated Revenue", summary.recalculated_revenue),
        line("Profit/Loss", summary.profit_loss),
        line("Profit Margin %", summary.profit_margin_pct),
    ]
}

/// Write serde rows as CSV with a header line
pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_path<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    write_csv(File::create(path)?, rows)
}
