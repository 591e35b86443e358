//! Caller-owned project state
//!
//! A [`Project`] bundles the rosters, ODC rows, tasks, period set and
//! configuration for one contract. It owns no hidden derived state: revenue on
//! each entry is rebuilt by [`Project::recompute`] (or per entry on edits) and
//! the summary is computed on demand.

use std::collections::BTreeMap;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::engine::{self, CumulativeSeries, FinancialSummary};
use crate::error::{Result, TrackerError, ValidationReport};
use crate::params::{ProjectConfig, ProjectParameters};
use crate::roster::loader::{
    self, EMPLOYEES_FILE, EMPLOYEE_HOURS_FILE, ODC_FILE, PERIODS_FILE, SUBCONTRACTORS_FILE,
    SUBCONTRACTOR_HOURS_FILE, TASKS_FILE,
};
use crate::roster::{
    merge_entries, validate_project, LaborEntry, MergeStrategy, OdcEntry, PeriodSet, TaskEntry,
};

/// Which roster an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterKind {
    Employees,
    Subcontractors,
}

impl RosterKind {
    pub fn label(&self) -> &'static str {
        match self {
            RosterKind::Employees => "employee",
            RosterKind::Subcontractors => "subcontractor",
        }
    }
}

/// All inputs for one contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub config: ProjectConfig,

    /// Ordered periods shared by every entry; empty means "use the calendar"
    #[serde(default)]
    pub periods: PeriodSet,

    #[serde(default)]
    pub employees: Vec<LaborEntry>,

    #[serde(default)]
    pub subcontractors: Vec<LaborEntry>,

    #[serde(default)]
    pub odc: Vec<OdcEntry>,

    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
}

impl Project {
    /// Empty project with periods generated from the configured calendar
    pub fn new(config: ProjectConfig) -> Result<Self> {
        let periods = config.calendar.period_set()?;
        Ok(Self::with_periods(config, periods))
    }

    /// Empty project over an explicit period set
    pub fn with_periods(config: ProjectConfig, periods: PeriodSet) -> Self {
        Self {
            config,
            periods,
            ..Default::default()
        }
    }

    /// Load every known file from a data directory and recompute
    ///
    /// Only the roster files that exist are read; `periods.csv` overrides the
    /// calendar when present.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let config = ProjectConfig::load_or_default(dir)?;

        let periods = match loader::open_optional(dir, PERIODS_FILE)? {
            Some(file) => loader::load_periods_from_reader(file)?,
            None => config.calendar.period_set()?,
        };

        let mut project = Self::with_periods(config, periods);

        if let Some(file) = loader::open_optional(dir, EMPLOYEES_FILE)? {
            project.employees = loader::load_employees_from_reader(file)?;
        }
        if let Some(file) = loader::open_optional(dir, SUBCONTRACTORS_FILE)? {
            project.subcontractors = loader::load_subcontractors_from_reader(file)?;
        }
        if let Some(file) = loader::open_optional(dir, EMPLOYEE_HOURS_FILE)? {
            let rows = loader::apply_hours_from_reader(
                &mut project.employees,
                RosterKind::Employees.label(),
                &project.periods,
                file,
            )?;
            info!("applied {} employee hours rows", rows);
        }
        if let Some(file) = loader::open_optional(dir, SUBCONTRACTOR_HOURS_FILE)? {
            let rows = loader::apply_hours_from_reader(
                &mut project.subcontractors,
                RosterKind::Subcontractors.label(),
                &project.periods,
                file,
            )?;
            info!("applied {} subcontractor hours rows", rows);
        }
        if let Some(file) = loader::open_optional(dir, ODC_FILE)? {
            project.odc = loader::load_odc_from_reader(file, &project.periods)?;
        }
        if let Some(file) = loader::open_optional(dir, TASKS_FILE)? {
            project.tasks = loader::load_tasks_from_reader(file)?;
        }

        info!(
            "loaded {} employees, {} subcontractors, {} ODC rows, {} tasks over {} periods from {}",
            project.employees.len(),
            project.subcontractors.len(),
            project.odc.len(),
            project.tasks.len(),
            project.periods.len(),
            dir.display()
        );

        project.recompute();
        Ok(project)
    }

    /// Generate periods from the calendar if none were supplied
    pub fn ensure_periods(&mut self) -> Result<()> {
        if self.periods.is_empty() {
            self.periods = self.config.calendar.period_set()?;
        }
        Ok(())
    }

    pub fn params(&self) -> &ProjectParameters {
        &self.config.parameters
    }

    pub fn params_mut(&mut self) -> &mut ProjectParameters {
        &mut self.config.parameters
    }

    pub fn roster(&self, kind: RosterKind) -> &[LaborEntry] {
        match kind {
            RosterKind::Employees => &self.employees,
            RosterKind::Subcontractors => &self.subcontractors,
        }
    }

    fn roster_mut(&mut self, kind: RosterKind) -> &mut Vec<LaborEntry> {
        match kind {
            RosterKind::Employees => &mut self.employees,
            RosterKind::Subcontractors => &mut self.subcontractors,
        }
    }

    /// Markup applied when recomputing a roster
    pub fn markup(&self, kind: RosterKind) -> f64 {
        match kind {
            RosterKind::Employees => self.config.recompute.employee_markup,
            RosterKind::Subcontractors => self.config.recompute.subcontractor_markup,
        }
    }

    /// Validate rosters, ODC rows and parameters together
    pub fn validate(&self) -> Result<()> {
        validate_project(
            &self.employees,
            &self.subcontractors,
            &self.odc,
            &self.periods,
            self.params(),
        )
    }

    /// Rebuild every entry's revenue from hours, rate and markup
    pub fn recompute(&mut self) {
        let employee_markup = self.markup(RosterKind::Employees);
        let subcontractor_markup = self.markup(RosterKind::Subcontractors);
        engine::recompute_roster(&mut self.employees, employee_markup);
        engine::recompute_roster(&mut self.subcontractors, subcontractor_markup);
    }

    pub fn summary(&self) -> FinancialSummary {
        engine::summarize(&self.employees, &self.subcontractors, &self.odc, self.params())
    }

    /// Cumulative hours and cost of the employee roster
    pub fn burn_rate(&self) -> CumulativeSeries {
        engine::cumulative_series(&self.employees, &self.periods)
    }

    /// Employee revenue by labor category
    pub fn category_revenue(&self) -> BTreeMap<String, f64> {
        engine::group_by_category(&self.employees, self.config.recompute.category_policy)
    }

    /// Record hours for one person and period, then recompute that entry
    pub fn set_hours(
        &mut self,
        kind: RosterKind,
        name: &str,
        period_label: &str,
        hours: f64,
    ) -> Result<()> {
        let period = self
            .periods
            .get(period_label)
            .cloned()
            .ok_or_else(|| TrackerError::UnknownPeriod(period_label.to_string()))?;
        let markup = self.markup(kind);

        let entry = self
            .roster_mut(kind)
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| TrackerError::UnknownEntry {
                roster: kind.label(),
                name: name.to_string(),
            })?;

        entry.period_hours.set(period, hours);
        let rate = entry.effective_hourly_rate();
        engine::recompute_revenue(entry, rate, markup);
        Ok(())
    }

    /// Add an entry, rejecting a name already on the roster
    pub fn add_entry(&mut self, kind: RosterKind, mut entry: LaborEntry) -> Result<()> {
        if self.roster(kind).iter().any(|e| e.name == entry.name) {
            let mut report = ValidationReport::new();
            report.push(&entry.name, "Name appears more than once in the roster");
            return Err(TrackerError::Validation(report));
        }
        let rate = entry.effective_hourly_rate();
        engine::recompute_revenue(&mut entry, rate, self.markup(kind));
        self.roster_mut(kind).push(entry);
        Ok(())
    }

    /// Remove an entry by name; returns whether anything was removed
    pub fn remove_entry(&mut self, kind: RosterKind, name: &str) -> bool {
        let roster = self.roster_mut(kind);
        let before = roster.len();
        roster.retain(|e| e.name != name);
        roster.len() != before
    }

    pub fn add_employee(&mut self, entry: LaborEntry) -> Result<()> {
        self.add_entry(RosterKind::Employees, entry)
    }

    pub fn remove_employee(&mut self, name: &str) -> bool {
        self.remove_entry(RosterKind::Employees, name)
    }

    pub fn add_subcontractor(&mut self, entry: LaborEntry) -> Result<()> {
        self.add_entry(RosterKind::Subcontractors, entry)
    }

    pub fn remove_subcontractor(&mut self, name: &str) -> bool {
        self.remove_entry(RosterKind::Subcontractors, name)
    }

    /// Merge imported entries into a roster and recompute it
    ///
    /// Returns the names that collided with existing entries.
    pub fn merge_entries(
        &mut self,
        kind: RosterKind,
        incoming: Vec<LaborEntry>,
        strategy: MergeStrategy,
    ) -> Vec<String> {
        let duplicates = crate::roster::detect_duplicates(&incoming, self.roster(kind));
        let markup = self.markup(kind);
        let roster = self.roster_mut(kind);
        let existing = std::mem::take(roster);
        *roster = merge_entries(existing, incoming, strategy);
        engine::recompute_roster(roster, markup);
        duplicates
    }

    pub fn merge_employees(&mut self, incoming: Vec<LaborEntry>, strategy: MergeStrategy) -> Vec<String> {
        self.merge_entries(RosterKind::Employees, incoming, strategy)
    }
}
