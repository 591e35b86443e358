//! JSON snapshots of project state
//!
//! A snapshot stores the inputs together with the summary computed when it
//! was taken. Restoring always recomputes, so the stored summary is only a
//! record of what was reported at capture time.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::engine::FinancialSummary;
use crate::error::Result;
use crate::project::Project;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub created_at: DateTime<Utc>,
    pub project: Project,
    pub summary: FinancialSummary,
}

impl Snapshot {
    /// Capture the project as it stands now
    pub fn capture(project: &Project) -> Self {
        Self {
            created_at: Utc::now(),
            summary: project.summary(),
            project: project.clone(),
        }
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        info!("saved snapshot to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Rebuild the project, recomputing every derived value
    pub fn restore(self) -> Result<Project> {
        let mut project = self.project;
        project.ensure_periods()?;
        project.recompute();

        if project.summary() != self.summary {
            warn!(
                "snapshot from {} no longer matches its stored summary; using recomputed values",
                self.created_at
            );
        }
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ProjectConfig;
    use crate::roster::{LaborEntry, OdcEntry, PeriodSet};
    use approx::assert_relative_eq;

    fn project() -> Project {
        let periods = PeriodSet::from_labels(["P1", "P2"]).unwrap();
        let mut project = Project::with_periods(ProjectConfig::default(), periods);
        project.employees = vec![LaborEntry::employee("Pat", "PM", 207_600.0, 207_600.0, 173.0).with_hours("P1", 10.0)];
        project.subcontractors = vec![LaborEntry::subcontractor("Sam", "FFtC", "Dev", 80.0).with_hours("P2", 10.0)];
        project.odc = vec![OdcEntry::new("P2", 100.0, "Licenses")];
        project.recompute();
        project
    }

    #[test]
    fn test_snapshot_json_restores_project() {
        let project = project();
        let snapshot = Snapshot::capture(&project);

        let mut buffer = Vec::new();
        snapshot.to_writer(&mut buffer).unwrap();
        let restored = Snapshot::from_reader(buffer.as_slice()).unwrap();

        assert_eq!(restored.created_at, snapshot.created_at);
        assert_relative_eq!(restored.summary.total_costs, snapshot.summary.total_costs);
        assert_eq!(restored.restore().unwrap(), project);
    }

    #[test]
    fn test_restore_recomputes_stale_revenue() {
        let mut project = project();
        let snapshot = Snapshot::capture(&project);

        // Hours edited without recomputing leave revenue stale
        project.employees[0].period_hours.set("P2".into(), 10.0);
        let stale = Snapshot { project, ..snapshot };

        let restored = stale.restore().unwrap();
        assert_relative_eq!(restored.summary().total_direct_labor, 2_000.0);
    }

    #[test]
    fn test_restore_fills_missing_periods() {
        let json = r#"{
            "created_at": "2025-09-01T00:00:00Z",
            "project": {},
            "summary": {
                "completion_percentage": 0.0,
                "billable_hours": 0.0,
                "total_direct_labor": 0.0,
                "total_subcontractor": 0.0,
                "total_odc": 0.0,
                "indirect_costs": {"fringe": 0.0, "overhead": 0.0, "ga": 0.0, "total_indirect": 0.0},
                "total_costs": 0.0,
                "recalculated_revenue": 0.0,
                "profit_loss": 0.0,
                "profit_margin_pct": 0.0
            }
        }"#;
        let project = Snapshot::from_reader(json.as_bytes()).unwrap().restore().unwrap();

        assert_eq!(project.periods.len(), 24);
        assert!(project.employees.is_empty());
    }
}
