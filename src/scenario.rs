//! Scenario runner for what-if summaries
//!
//! Holds one recomputed project, then evaluates the financial summary under
//! many parameter sets without reloading or recomputing the rosters.

use serde::{Deserialize, Serialize};

use crate::engine::{summarize, FinancialSummary};
use crate::params::ProjectParameters;
use crate::project::Project;

/// Named parameter set to evaluate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub parameters: ProjectParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub parameters: ProjectParameters,
    pub summary: FinancialSummary,
}

/// Pre-loaded project for batch what-if evaluation
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(Project::load_dir(path)?);
///
/// for ga in [0.25, 0.275, 0.30] {
///     let params = ProjectParameters { ga_rate: ga, ..runner.project().params().clone() };
///     let summary = runner.run(&params);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: Project,
}

impl ScenarioRunner {
    /// Take ownership of a project, recomputing its revenue once
    pub fn new(mut project: Project) -> Self {
        project.recompute();
        Self { base: project }
    }

    /// Summary of the base project under different parameters
    ///
    /// Rates and contract scalars only; markups are fixed at construction.
    pub fn run(&self, params: &ProjectParameters) -> FinancialSummary {
        summarize(
            &self.base.employees,
            &self.base.subcontractors,
            &self.base.odc,
            params,
        )
    }

    /// Run every scenario in order
    pub fn run_scenarios(&self, scenarios: &[Scenario]) -> Vec<ScenarioResult> {
        scenarios
            .iter()
            .map(|scenario| ScenarioResult {
                name: scenario.name.clone(),
                parameters: scenario.parameters.clone(),
                summary: self.run(&scenario.parameters),
            })
            .collect()
    }

    pub fn project(&self) -> &Project {
        &self.base
    }

    /// Mutable access; call [`Project::recompute`] after editing rosters
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.base
    }
}

/// Cartesian grid of indirect rates over a base parameter set
pub fn rate_grid(
    base: &ProjectParameters,
    fringe_rates: &[f64],
    overhead_rates: &[f64],
    ga_rates: &[f64],
) -> Vec<Scenario> {
    let mut scenarios =
        Vec::with_capacity(fringe_rates.len() * overhead_rates.len() * ga_rates.len());

    for &fringe_rate in fringe_rates {
        for &overhead_rate in overhead_rates {
            for &ga_rate in ga_rates {
                scenarios.push(Scenario {
                    name: format!(
                        "fringe={:.3} overhead={:.3} ga={:.3}",
                        fringe_rate, overhead_rate, ga_rate
                    ),
                    parameters: ProjectParameters {
                        fringe_rate,
                        overhead_rate,
                        ga_rate,
                        ..base.clone()
                    },
                });
            }
        }
    }

    scenarios
}
