//! Amortized loan payment (the spreadsheet `PMT` function).
//!
//! The payment is returned with the usual annuity sign convention: a
//! positive principal yields a negative payment, i.e. money leaving the
//! borrower each period.
//!
//! # Example
//!
//! ```
//! use property_core::calculations::{PaymentTiming, compute_payment};
//!
//! // $400,000 over 30 years at 6.5% a year, paid monthly.
//! let payment = compute_payment(0.065 / 12.0, 360, 400_000.0, 0.0, PaymentTiming::End);
//!
//! assert!((payment - -2528.27).abs() < 0.005);
//! ```

use serde::{Deserialize, Serialize};

/// When in each period the payment falls due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentTiming {
    /// Ordinary annuity: payment at the end of the period.
    #[default]
    End,
    /// Annuity due: payment at the start of the period.
    Begin,
}

/// Computes the fixed periodic payment that amortizes `present_value` down
/// to `future_value` over `period_count` periods at `periodic_rate`.
///
/// `periodic_rate` is a fraction per period (a 6.5% yearly rate paid
/// monthly is `0.065 / 12`). No input is rejected: a zero period count or
/// other degenerate values yield `NaN` or an infinity.
pub fn compute_payment(
    periodic_rate: f64,
    period_count: i32,
    present_value: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> f64 {
    let periods = f64::from(period_count);

    if periodic_rate == 0.0 {
        return -(present_value + future_value) / periods;
    }

    let growth = (1.0 + periodic_rate).powf(periods);
    let payment = (-periodic_rate * (present_value * growth + future_value)) / (growth - 1.0);

    match timing {
        PaymentTiming::End => payment,
        PaymentTiming::Begin => payment / (1.0 + periodic_rate),
    }
}
