//! Project-level financial summary

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::aggregate::{sum_across_roster, Measure, PeriodSelection};
use super::indirect::{allocate, IndirectCostResult};
use crate::params::ProjectParameters;
use crate::roster::{LaborEntry, OdcEntry};

/// Derived financial position of the project
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub completion_percentage: f64,
    pub billable_hours: f64,
    pub total_direct_labor: f64,
    pub total_subcontractor: f64,
    pub total_odc: f64,
    pub indirect_costs: IndirectCostResult,
    pub total_costs: f64,
    pub recalculated_revenue: f64,
    pub profit_loss: f64,
    pub profit_margin_pct: f64,
}

impl FinancialSummary {
    /// Cost lines in display order
    pub fn cost_breakdown(&self) -> [(&'static str, f64); 6] {
        [
            ("Direct Labor", self.total_direct_labor),
            ("ODC", self.total_odc),
            ("Subcontractor", self.total_subcontractor),
            ("Fringe", self.indirect_costs.fringe),
            ("Overhead", self.indirect_costs.overhead),
            ("G&A", self.indirect_costs.ga),
        ]
    }

    /// Margin shortfall (negative) or surplus against the target, in points
    pub fn margin_vs_target_pct(&self, params: &ProjectParameters) -> f64 {
        self.profit_margin_pct - params.target_profit * 100.0
    }
}

/// Combine labor, subcontractor, ODC and indirect costs against the contract
///
/// Revenue figures on the rosters must be current; callers recompute before
/// summarizing. Every ratio with a non-positive denominator is reported as 0.
pub fn summarize(
    roster: &[LaborEntry],
    subcontractors: &[LaborEntry],
    odc_entries: &[OdcEntry],
    params: &ProjectParameters,
) -> FinancialSummary {
    let total_direct_labor = sum_across_roster(roster, Measure::Revenue, PeriodSelection::All);
    let total_subcontractor =
        sum_across_roster(subcontractors, Measure::Revenue, PeriodSelection::All);
    let total_odc: f64 = odc_entries.iter().map(|odc| odc.amount).sum();

    let indirect_costs = allocate(total_direct_labor, params);
    let total_costs =
        total_direct_labor + total_subcontractor + total_odc + indirect_costs.total_indirect;

    let billable_hours = params.billable_hours();

    if params.eac_hours <= 0.0 {
        warn!("EAC hours is {}, completion and revenue reported as 0", params.eac_hours);
    }

    let completion_percentage = if params.eac_hours > 0.0 {
        params.actual_hours / params.eac_hours * 100.0
    } else {
        0.0
    };

    let recalculated_revenue = if params.eac_hours > 0.0 {
        params.revenue_hours() / params.eac_hours * params.total_transaction_price
    } else {
        0.0
    };

    let profit_loss = recalculated_revenue - total_costs;

    let profit_margin_pct = if recalculated_revenue > 0.0 {
        profit_loss / recalculated_revenue * 100.0
    } else {
        0.0
    };

    info!(
        "summary: costs {:.2}, revenue {:.2}, profit/loss {:.2}",
        total_costs, recalculated_revenue, profit_loss
    );

    FinancialSummary {
        completion_percentage,
        billable_hours,
        total_direct_labor,
        total_subcontractor,
        total_odc,
        indirect_costs,
        total_costs,
        recalculated_revenue,
        profit_loss,
        profit_margin_pct,
    }
}
