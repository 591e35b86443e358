//! Load rosters, hours, ODC, tasks and periods from CSV
//!
//! Hours are read in long form (`Name,Period,Hours`) and attached to entries
//! already loaded from the roster files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use log::{info, warn};

use super::{EmploymentStatus, LaborEntry, OdcEntry, Period, PeriodSet, TaskEntry};
use crate::error::{Result, TrackerError};

pub const EMPLOYEES_FILE: &str = "employees.csv";
pub const SUBCONTRACTORS_FILE: &str = "subcontractors.csv";
pub const EMPLOYEE_HOURS_FILE: &str = "employee_hours.csv";
pub const SUBCONTRACTOR_HOURS_FILE: &str = "subcontractor_hours.csv";
pub const ODC_FILE: &str = "odc.csv";
pub const TASKS_FILE: &str = "tasks.csv";
pub const PERIODS_FILE: &str = "periods.csv";

/// Raw CSV row matching employees.csv columns
#[derive(Debug, serde::Deserialize)]
struct EmployeeRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "LCAT")]
    lcat: String,
    #[serde(rename = "Priced_Salary", default)]
    priced_salary: f64,
    #[serde(rename = "Current_Salary")]
    current_salary: f64,
    #[serde(rename = "Hours_Per_Month")]
    hours_per_month: f64,
    #[serde(rename = "Company", default)]
    company: Option<String>,
    #[serde(rename = "Status", default)]
    status: String,
}

impl EmployeeRow {
    fn into_entry(self) -> Result<LaborEntry> {
        let status = EmploymentStatus::parse(&self.status)?;
        let mut entry = LaborEntry::employee(
            self.name.trim(),
            self.lcat,
            self.priced_salary,
            self.current_salary,
            self.hours_per_month,
        )
        .with_status(status);
        entry.company = self.company.filter(|c| !c.trim().is_empty());
        Ok(entry)
    }
}

/// Raw CSV row matching subcontractors.csv columns
#[derive(Debug, serde::Deserialize)]
struct SubcontractorRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Company")]
    company: String,
    #[serde(rename = "LCAT")]
    lcat: String,
    #[serde(rename = "Hourly_Rate")]
    hourly_rate: f64,
}

#[derive(Debug, serde::Deserialize)]
struct HoursRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Period")]
    period: String,
    #[serde(rename = "Hours")]
    hours: f64,
}

#[derive(Debug, serde::Deserialize)]
struct OdcRow {
    #[serde(rename = "Period")]
    period: String,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Description", default)]
    description: String,
}

#[derive(Debug, serde::Deserialize)]
struct TaskRow {
    #[serde(rename = "Task_ID")]
    task_id: String,
    #[serde(rename = "Task_Name")]
    task_name: String,
    #[serde(rename = "LCAT")]
    lcat: String,
    #[serde(rename = "Person_Org", default)]
    person_org: String,
    #[serde(rename = "Person")]
    person: String,
    #[serde(rename = "Hours")]
    hours: f64,
    #[serde(rename = "Cost")]
    cost: f64,
}

#[derive(Debug, serde::Deserialize)]
struct PeriodRow {
    #[serde(rename = "Period")]
    period: String,
}

/// Load salaried employees from any reader
pub fn load_employees_from_reader<R: Read>(reader: R) -> Result<Vec<LaborEntry>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut employees = Vec::new();

    for result in csv_reader.deserialize() {
        let row: EmployeeRow = result?;
        employees.push(row.into_entry()?);
    }

    Ok(employees)
}

/// Load hourly subcontractors from any reader
pub fn load_subcontractors_from_reader<R: Read>(reader: R) -> Result<Vec<LaborEntry>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut subcontractors = Vec::new();

    for result in csv_reader.deserialize() {
        let row: SubcontractorRow = result?;
        subcontractors.push(LaborEntry::subcontractor(
            row.name.trim(),
            row.company.trim(),
            row.lcat,
            row.hourly_rate,
        ));
    }

    Ok(subcontractors)
}

/// Attach long-form hours rows to entries of a roster
///
/// Returns the number of rows applied. Rows naming an unknown entry or a
/// period outside the set are rejected.
pub fn apply_hours_from_reader<R: Read>(
    roster: &mut [LaborEntry],
    roster_label: &'static str,
    periods: &PeriodSet,
    reader: R,
) -> Result<usize> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut applied = 0;

    for result in csv_reader.deserialize() {
        let row: HoursRow = result?;
        let period = resolve_period(periods, &row.period)?;
        let name = row.name.trim();

        let entry = roster
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| TrackerError::UnknownEntry {
                roster: roster_label,
                name: name.to_string(),
            })?;

        if entry.period_hours.contains(&period) {
            warn!("{} has more than one hours row for {}, keeping the last", name, period);
        }
        entry.period_hours.set(period, row.hours);
        applied += 1;
    }

    Ok(applied)
}

/// Load ODC rows, checking each period against the set
pub fn load_odc_from_reader<R: Read>(reader: R, periods: &PeriodSet) -> Result<Vec<OdcEntry>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in csv_reader.deserialize() {
        let row: OdcRow = result?;
        entries.push(OdcEntry {
            period: resolve_period(periods, &row.period)?,
            amount: row.amount,
            description: row.description,
        });
    }

    Ok(entries)
}

/// Load task breakdown lines from any reader
pub fn load_tasks_from_reader<R: Read>(reader: R) -> Result<Vec<TaskEntry>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut tasks = Vec::new();

    for result in csv_reader.deserialize() {
        let row: TaskRow = result?;
        tasks.push(TaskEntry {
            task_id: row.task_id,
            task_name: row.task_name,
            category: row.lcat,
            person_org: row.person_org,
            person: row.person,
            hours: row.hours,
            cost: row.cost,
        });
    }

    Ok(tasks)
}

/// Load an explicit, ordered period list
pub fn load_periods_from_reader<R: Read>(reader: R) -> Result<PeriodSet> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut labels = Vec::new();

    for result in csv_reader.deserialize() {
        let row: PeriodRow = result?;
        labels.push(row.period.trim().to_string());
    }

    PeriodSet::from_labels(labels)
}

fn resolve_period(periods: &PeriodSet, label: &str) -> Result<Period> {
    periods
        .get(label.trim())
        .cloned()
        .ok_or_else(|| TrackerError::UnknownPeriod(label.to_string()))
}

/// Open a file in a data directory if it exists
pub fn open_optional(dir: &Path, file_name: &str) -> Result<Option<File>> {
    let path = dir.join(file_name);
    if path.exists() {
        Ok(Some(File::open(path)?))
    } else {
        info!("{} not found, treating as empty", path.display());
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods() -> PeriodSet {
        PeriodSet::from_labels(["03/13/2024-04/11/2024", "04/12/2024-05/11/2024"]).unwrap()
    }

    #[test]
    fn test_load_employees() {
        let data = "\
Name,LCAT,Priced_Salary,Current_Salary,Hours_Per_Month,Company,Status
Shannon Gueringer,PM,160000,200000,173,Skyward IT Solutions,Active
Drew Hynes,PM,0,0,173,,Inactive
";
        let employees = load_employees_from_reader(data.as_bytes()).unwrap();

        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].name, "Shannon Gueringer");
        assert_eq!(employees[0].company.as_deref(), Some("Skyward IT Solutions"));
        assert_eq!(employees[0].current_salary(), Some(200_000.0));
        assert_eq!(employees[1].company, None);
        assert_eq!(employees[1].status, EmploymentStatus::Inactive);
    }

    #[test]
    fn test_optional_employee_columns() {
        let data = "Name,LCAT,Current_Salary,Hours_Per_Month\nLeo Khan,SA/Eng Lead,190000,173\n";
        let employees = load_employees_from_reader(data.as_bytes()).unwrap();

        assert_eq!(employees[0].status, EmploymentStatus::Active);
        assert_eq!(employees[0].priced_hourly_rate(), 0.0);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let data = "Name,LCAT,Current_Salary,Hours_Per_Month,Status\nX,PM,1,173,Retired\n";
        let err = load_employees_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, TrackerError::UnknownValue { field: "Status", .. }));
    }

    #[test]
    fn test_non_numeric_salary_is_rejected() {
        let data = "Name,LCAT,Current_Salary,Hours_Per_Month\nX,PM,lots,173\n";
        assert!(matches!(
            load_employees_from_reader(data.as_bytes()),
            Err(TrackerError::Csv(_))
        ));
    }

    #[test]
    fn test_load_subcontractors() {
        let data = "Name,Company,LCAT,Hourly_Rate\nPaulina Fisher,FFtC,HCD Researcher,116.0\n";
        let subs = load_subcontractors_from_reader(data.as_bytes()).unwrap();

        assert_eq!(subs[0].hourly_rate(), Some(116.0));
        assert_eq!(subs[0].company.as_deref(), Some("FFtC"));
    }

    #[test]
    fn test_apply_hours() {
        let periods = periods();
        let mut roster = vec![LaborEntry::employee("Leo Khan", "SA/Eng Lead", 0.0, 190_000.0, 173.0)];
        let data = "\
Name,Period,Hours
Leo Khan,03/13/2024-04/11/2024,160
Leo Khan,04/12/2024-05/11/2024,172.5
";
        let applied = apply_hours_from_reader(&mut roster, "employee", &periods, data.as_bytes()).unwrap();

        assert_eq!(applied, 2);
        assert_eq!(roster[0].total_hours(), 332.5);
        assert_eq!(roster[0].hours(&Period::from("04/12/2024-05/11/2024")), 172.5);
    }

    #[test]
    fn test_hours_for_unknown_person() {
        let mut roster = vec![LaborEntry::employee("Leo Khan", "SA/Eng Lead", 0.0, 190_000.0, 173.0)];
        let data = "Name,Period,Hours\nNobody,03/13/2024-04/11/2024,1\n";
        let err = apply_hours_from_reader(&mut roster, "employee", &periods(), data.as_bytes()).unwrap_err();

        assert!(matches!(err, TrackerError::UnknownEntry { roster: "employee", name } if name == "Nobody"));
    }

    #[test]
    fn test_hours_for_unknown_period() {
        let mut roster = vec![LaborEntry::employee("Leo Khan", "SA/Eng Lead", 0.0, 190_000.0, 173.0)];
        let data = "Name,Period,Hours\nLeo Khan,13/01/2030-14/01/2030,1\n";
        let err = apply_hours_from_reader(&mut roster, "employee", &periods(), data.as_bytes()).unwrap_err();

        assert!(matches!(err, TrackerError::UnknownPeriod(_)));
    }

    #[test]
    fn test_load_odc() {
        let data = "\
Period,Amount,Description
03/13/2024-04/11/2024,472855.83,Infrastructure Costs
04/12/2024-05/11/2024,0,
";
        let odc = load_odc_from_reader(data.as_bytes(), &periods()).unwrap();

        assert_eq!(odc.len(), 2);
        assert_eq!(odc[0].amount, 472_855.83);
        assert_eq!(odc[1].description, "");
    }

    #[test]
    fn test_load_tasks() {
        let data = "\
Task_ID,Task_Name,LCAT,Person_Org,Person,Hours,Cost
0001AA,CEDAR and KMP Transition,AI Lead (KEY),OPERATIONS,\"Baklikov, Vitaliy\",984,118292.52
";
        let tasks = load_tasks_from_reader(data.as_bytes()).unwrap();

        assert_eq!(tasks[0].person, "Baklikov, Vitaliy");
        assert_eq!(tasks[0].hours, 984.0);
    }

    #[test]
    fn test_load_periods_keeps_file_order() {
        let data = "Period\nB\nA\nC\n";
        let periods = load_periods_from_reader(data.as_bytes()).unwrap();

        assert_eq!(periods.first().unwrap().label(), "B");
        assert_eq!(periods.index_of(&Period::from("C")), Some(2));
    }
}
