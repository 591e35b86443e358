//! Indirect cost allocation on direct labor

use serde::{Deserialize, Serialize};

use crate::params::ProjectParameters;

/// Fringe, overhead and G&A allocated on a direct-labor base
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndirectCostResult {
    pub fringe: f64,
    pub overhead: f64,
    pub ga: f64,
    pub total_indirect: f64,
}

/// Apply the three indirect rates to a direct-labor total
///
/// Negative bases and rates outside [0, 1] are carried through as-is.
pub fn allocate(direct_labor: f64, params: &ProjectParameters) -> IndirectCostResult {
    let fringe = direct_labor * params.fringe_rate;
    let overhead = direct_labor * params.overhead_rate;
    let ga = direct_labor * params.ga_rate;

    IndirectCostResult {
        fringe,
        overhead,
        ga,
        total_indirect: fringe + overhead + ga,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_contract_rates() {
        let params = ProjectParameters {
            fringe_rate: 0.326,
            overhead_rate: 0.15,
            ga_rate: 0.275,
            ..Default::default()
        };
        let result = allocate(100_000.0, &params);

        assert_relative_eq!(result.fringe, 32_600.0);
        assert_relative_eq!(result.overhead, 15_000.0);
        assert_relative_eq!(result.ga, 27_500.0);
        assert_relative_eq!(result.total_indirect, 75_100.0);
    }

    #[test]
    fn test_total_is_exact_sum_of_parts() {
        let params = ProjectParameters {
            fringe_rate: 0.3333,
            overhead_rate: 1.7,
            ga_rate: -0.05,
            ..Default::default()
        };
        for &base in &[0.0, 1.0, 12_345.678, -9_999.99, 1e9] {
            let r = allocate(base, &params);
            assert_eq!(r.total_indirect, r.fringe + r.overhead + r.ga);
        }
    }

    #[test]
    fn test_zero_base_allocates_nothing() {
        let result = allocate(0.0, &ProjectParameters::default());
        assert_eq!(result, IndirectCostResult::default());
    }
}
