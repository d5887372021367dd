//! Shared constants and helpers for the property calculations.

/// Months in a year, used to spread yearly amounts.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Nights in a year for short-term rental revenue, regardless of calendar.
pub const NIGHTS_PER_YEAR: f64 = 365.0;

/// Converts a 0-100 percentage into a fraction.
///
/// Every percent-scaled input passes through here exactly once, at the
/// point where the KPI engine first uses it.
///
/// ```
/// use property_core::calculations::common::percent_to_fraction;
///
/// assert_eq!(percent_to_fraction(80.0), 0.8);
/// assert_eq!(percent_to_fraction(0.0), 0.0);
/// ```
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn percent_to_fraction_divides_by_one_hundred() {
        assert_eq!(percent_to_fraction(5.0), 0.05);
        assert_eq!(percent_to_fraction(100.0), 1.0);
    }

    #[test]
    fn percent_to_fraction_keeps_negative_values() {
        assert_eq!(percent_to_fraction(-20.0), -0.2);
    }

    #[test]
    fn percent_to_fraction_propagates_nan() {
        assert!(percent_to_fraction(f64::NAN).is_nan());
    }
}
