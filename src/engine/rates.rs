//! Hourly rate derivation from annual salary

/// Months in a salary year
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Effective hourly rate for an annual salary and a monthly-hours baseline
///
/// Zero salary or a non-positive monthly baseline yields a rate of zero. No
/// rounding is applied here.
pub fn derive_hourly_rate(annual_salary: f64, hours_per_month: f64) -> f64 {
    if annual_salary == 0.0 || hours_per_month <= 0.0 {
        return 0.0;
    }
    annual_salary / (hours_per_month * MONTHS_PER_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_rate() {
        // 207,600 / (173 * 12) = 100.00
        assert_relative_eq!(derive_hourly_rate(207_600.0, 173.0), 100.0);
    }

    #[test]
    fn test_rate_matches_formula() {
        for &(salary, hours) in &[(90_000.0, 173.0), (250_000.0, 160.0), (1.0, 0.5)] {
            assert_eq!(derive_hourly_rate(salary, hours), salary / (hours * 12.0));
        }
    }

    #[test]
    fn test_degenerate_inputs_give_zero() {
        assert_eq!(derive_hourly_rate(0.0, 173.0), 0.0);
        assert_eq!(derive_hourly_rate(150_000.0, 0.0), 0.0);
        assert_eq!(derive_hourly_rate(150_000.0, -10.0), 0.0);
    }
}
