//! Per-period revenue, roster sums and cumulative burn-rate series

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::roster::{LaborEntry, Period, PeriodSet, PeriodValues};

/// Markup applied to salaried employees
pub const EMPLOYEE_MARKUP: f64 = 1.0;

/// Which per-period field to aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Hours,
    Revenue,
}

impl Measure {
    fn values<'a>(&self, entry: &'a LaborEntry) -> &'a PeriodValues {
        match self {
            Measure::Hours => &entry.period_hours,
            Measure::Revenue => entry.period_revenue(),
        }
    }
}

/// Periods to include in a roster sum
#[derive(Debug, Clone, Copy)]
pub enum PeriodSelection<'a> {
    /// A single period
    One(&'a Period),
    /// Every period in a set
    Set(&'a PeriodSet),
    /// Every period recorded on each entry
    All,
}

/// How category labels are compared when grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// Labels are grouped verbatim
    #[default]
    Exact,
    /// Case-folded with surrounding and repeated whitespace collapsed
    Normalized,
}

impl CategoryPolicy {
    /// Grouping key for a category label
    pub fn key(&self, category: &str) -> String {
        match self {
            CategoryPolicy::Exact => category.to_string(),
            CategoryPolicy::Normalized => category
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase(),
        }
    }
}

/// Recompute an entry's revenue from its hours
///
/// Every period with recorded hours gets `hours * rate * markup`; revenue for
/// periods no longer carrying hours is dropped, so hours and revenue always
/// share the same keys.
pub fn recompute_revenue(entry: &mut LaborEntry, rate: f64, markup: f64) -> &PeriodValues {
    let revenue: PeriodValues = entry
        .period_hours
        .iter()
        .map(|(period, hours)| (period.clone(), hours * rate * markup))
        .collect();

    debug!(
        "recomputed {} at {:.4}/h x {:.2}: {} periods, {:.2} total",
        entry.name,
        rate,
        markup,
        revenue.len(),
        revenue.total()
    );

    *entry.period_revenue_mut() = revenue;
    entry.period_revenue()
}

/// Recompute every entry in a roster at its own effective rate
pub fn recompute_roster(roster: &mut [LaborEntry], markup: f64) {
    for entry in roster.iter_mut() {
        let rate = entry.effective_hourly_rate();
        recompute_revenue(entry, rate, markup);
    }
}

/// Sum hours or revenue across a roster; absent periods count as zero
pub fn sum_across_roster(
    roster: &[LaborEntry],
    measure: Measure,
    selection: PeriodSelection<'_>,
) -> f64 {
    roster
        .iter()
        .map(|entry| {
            let values = measure.values(entry);
            match selection {
                PeriodSelection::One(period) => values.get(period),
                PeriodSelection::Set(periods) => periods.iter().map(|p| values.get(p)).sum(),
                PeriodSelection::All => values.total(),
            }
        })
        .sum()
}

/// Roster-wide total for each period, in period order
pub fn period_totals(roster: &[LaborEntry], measure: Measure, periods: &PeriodSet) -> Vec<f64> {
    periods
        .iter()
        .map(|period| sum_across_roster(roster, measure, PeriodSelection::One(period)))
        .collect()
}

/// Running totals of hours and cost (revenue) by period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeSeries {
    pub hours: Vec<f64>,
    pub costs: Vec<f64>,
}

impl CumulativeSeries {
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn final_hours(&self) -> f64 {
        self.hours.last().copied().unwrap_or(0.0)
    }

    pub fn final_cost(&self) -> f64 {
        self.costs.last().copied().unwrap_or(0.0)
    }
}

/// Burn-rate series: cumulative hours and cost through each period
///
/// The first element is the first period's own total, and the last equals the
/// roster total over the whole set.
pub fn cumulative_series(roster: &[LaborEntry], periods: &PeriodSet) -> CumulativeSeries {
    let period_hours = period_totals(roster, Measure::Hours, periods);
    let period_costs = period_totals(roster, Measure::Revenue, periods);

    let mut series = CumulativeSeries {
        hours: Vec::with_capacity(periods.len()),
        costs: Vec::with_capacity(periods.len()),
    };

    let mut running_hours = 0.0;
    let mut running_costs = 0.0;
    for (hours, cost) in period_hours.into_iter().zip(period_costs) {
        running_hours += hours;
        running_costs += cost;
        series.hours.push(running_hours);
        series.costs.push(running_costs);
    }

    series
}

/// Total revenue per labor category
pub fn group_by_category(roster: &[LaborEntry], policy: CategoryPolicy) -> BTreeMap<String, f64> {
    let mut groups = BTreeMap::new();
    for entry in roster {
        *groups.entry(policy.key(&entry.category)).or_insert(0.0) += entry.total_revenue();
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_period_set() -> PeriodSet {
        PeriodSet::from_labels(["P1", "P2"]).unwrap()
    }

    fn sub(name: &str, category: &str, rate: f64, hours: &[(&str, f64)]) -> LaborEntry {
        let mut entry = LaborEntry::subcontractor(name, "ACME", category, rate);
        for &(p, h) in hours {
            entry.period_hours.set(Period::from(p), h);
        }
        recompute_revenue(&mut entry, rate, 1.0);
        entry
    }

    #[test]
    fn test_single_employee_revenue() {
        let mut emp = LaborEntry::employee("Pat", "PM", 207_600.0, 207_600.0, 173.0)
            .with_hours("P1", 173.0);
        let rate = emp.effective_hourly_rate();
        assert_relative_eq!(rate, 100.0);

        let revenue = recompute_revenue(&mut emp, rate, EMPLOYEE_MARKUP);
        assert_relative_eq!(revenue.get(&Period::from("P1")), 17_300.0);
    }

    #[test]
    fn test_markup_is_applied() {
        let mut entry = LaborEntry::subcontractor("Sam", "FFtC", "Dev", 100.0).with_hours("P1", 10.0);
        recompute_revenue(&mut entry, 100.0, 1.2);
        assert_relative_eq!(entry.revenue(&Period::from("P1")), 1_200.0);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut entry = LaborEntry::employee("Pat", "PM", 0.0, 120_000.0, 160.0)
            .with_hours("P1", 40.0)
            .with_hours("P2", 80.0);
        let rate = entry.effective_hourly_rate();

        let first = recompute_revenue(&mut entry, rate, 1.0).clone();
        let second = recompute_revenue(&mut entry, rate, 1.0).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_revenue_tracks_removed_hours() {
        let mut entry = sub("Sam", "Dev", 50.0, &[("P1", 10.0), ("P2", 5.0)]);
        entry.period_hours = [(Period::from("P1"), 10.0)].into_iter().collect();
        recompute_revenue(&mut entry, 50.0, 1.0);

        assert!(!entry.period_revenue().contains(&Period::from("P2")));
        assert_eq!(entry.total_revenue(), 500.0);
    }

    #[test]
    fn test_sum_of_empty_roster_is_zero() {
        let periods = two_period_set();
        assert_eq!(sum_across_roster(&[], Measure::Hours, PeriodSelection::All), 0.0);
        assert_eq!(sum_across_roster(&[], Measure::Revenue, PeriodSelection::Set(&periods)), 0.0);
    }

    #[test]
    fn test_sum_treats_missing_period_as_zero() {
        let roster = vec![
            sub("A", "Dev", 10.0, &[("P1", 4.0)]),
            sub("B", "Dev", 10.0, &[("P2", 6.0)]),
        ];
        let p1 = Period::from("P1");

        assert_eq!(sum_across_roster(&roster, Measure::Hours, PeriodSelection::One(&p1)), 4.0);
        assert_eq!(sum_across_roster(&roster, Measure::Hours, PeriodSelection::All), 10.0);
        assert_eq!(sum_across_roster(&roster, Measure::Revenue, PeriodSelection::All), 100.0);
    }

    #[test]
    fn test_sum_is_order_independent() {
        let mut roster = vec![
            sub("A", "Dev", 10.0, &[("P1", 4.0), ("P2", 1.0)]),
            sub("B", "Ops", 20.0, &[("P2", 6.0)]),
            sub("C", "PM", 30.0, &[("P1", 2.0)]),
        ];
        let forward = sum_across_roster(&roster, Measure::Revenue, PeriodSelection::All);
        roster.reverse();
        let backward = sum_across_roster(&roster, Measure::Revenue, PeriodSelection::All);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_cumulative_series_two_periods() {
        let roster = vec![sub("A", "Dev", 50.0, &[("P1", 10.0), ("P2", 20.0)])];
        let series = cumulative_series(&roster, &two_period_set());

        assert_eq!(series.hours, vec![10.0, 30.0]);
        assert_eq!(series.costs, vec![500.0, 1_500.0]);
    }

    #[test]
    fn test_cumulative_series_properties() {
        let periods = PeriodSet::from_labels(["P1", "P2", "P3", "P4"]).unwrap();
        let roster = vec![
            sub("A", "Dev", 75.0, &[("P1", 0.0), ("P2", 12.5), ("P4", 3.0)]),
            sub("B", "Ops", 110.0, &[("P1", 8.0), ("P3", 0.0), ("P4", 40.0)]),
        ];
        let series = cumulative_series(&roster, &periods);

        assert_eq!(series.len(), periods.len());
        assert_eq!(series.hours[0], 8.0);
        assert!(series.hours.windows(2).all(|w| w[1] >= w[0]));
        assert!(series.costs.windows(2).all(|w| w[1] >= w[0]));
        assert_relative_eq!(
            series.final_cost(),
            sum_across_roster(&roster, Measure::Revenue, PeriodSelection::All)
        );
        assert_relative_eq!(
            series.final_hours(),
            sum_across_roster(&roster, Measure::Hours, PeriodSelection::All)
        );
    }

    #[test]
    fn test_cumulative_series_of_empty_set() {
        let roster = vec![sub("A", "Dev", 50.0, &[("P1", 10.0)])];
        let series = cumulative_series(&roster, &PeriodSet::default());
        assert!(series.is_empty());
        assert_eq!(series.final_cost(), 0.0);
    }

    #[test]
    fn test_group_by_category_exact() {
        let roster = vec![
            sub("A", "Dev", 10.0, &[("P1", 1.0)]),
            sub("B", "dev", 10.0, &[("P1", 2.0)]),
            sub("C", "Dev", 10.0, &[("P2", 3.0)]),
        ];
        let groups = group_by_category(&roster, CategoryPolicy::Exact);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Dev"], 40.0);
        assert_eq!(groups["dev"], 20.0);
    }

    #[test]
    fn test_group_by_category_normalized() {
        let roster = vec![
            sub("A", "SA/Eng  Lead", 10.0, &[("P1", 1.0)]),
            sub("B", " sa/eng lead", 10.0, &[("P1", 2.0)]),
        ];
        let groups = group_by_category(&roster, CategoryPolicy::Normalized);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups["sa/eng lead"], 30.0);
    }
}
