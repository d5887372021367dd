//! KPI derivation for a single rental property.
//!
//! Turns a [`PropertyInput`] into monthly revenue, the monthly expense line
//! items, the mortgage payment and the summary ratios used to judge a deal.
//!
//! | Field | Formula |
//! |-------|---------|
//! | `monthly_rev` | LTR: monthly rent. STR: nightly rent × 365 × occupancy ÷ 12 |
//! | `monthly_taxes` | yearly taxes ÷ 12 |
//! | `monthly_insurance` | yearly insurance ÷ 12 |
//! | `vacancy` | LTR only: revenue × vacancy rate, STR: 0 |
//! | `management`, `capital_expenditures`, `repairs` | revenue × rate |
//! | `monthly_mortgage_payment` | PMT(loan rate ÷ 12, months, price × LTV), negative |
//! | `total_monthly_cost` | expense line items − mortgage payment |
//! | `net_monthly_cash_flow` | revenue − total monthly cost |
//! | `one_percent_rule` | revenue ÷ price |
//! | `cap_rate` | (revenue − taxes − insurance − vacancy − management) × 12 ÷ price |
//! | `cash_flow` | revenue × 0.5 + mortgage payment |
//! | `total_close` | price × (1 − LTV) + closing |
//! | `co_croi` | net monthly cash flow × 12 ÷ total close |
//!
//! Nothing is validated here. A zero purchase price, a zero loan term or a
//! zero cash outlay produce `NaN` or infinities in the affected fields.
//!
//! # Example
//!
//! ```
//! use property_core::calculations::derive_kpis;
//! use property_core::{PropertyDetails, PropertyInput};
//!
//! let input = PropertyInput::from(&PropertyDetails::default());
//! let kpis = derive_kpis(&input);
//!
//! assert_eq!(kpis.monthly_rev, 2500.0);
//! assert!((kpis.total_close - 110_000.0).abs() < 1e-6);
//! assert!(kpis.monthly_mortgage_payment < 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::common::{MONTHS_PER_YEAR, NIGHTS_PER_YEAR, percent_to_fraction};
use crate::calculations::payment::{PaymentTiming, compute_payment};
use crate::calculations::tiers::KpiTiers;
use crate::models::{PropertyInput, RentalMode};

/// Share of gross revenue the "50% rule" assumes goes to operating costs.
const FIFTY_PERCENT_RULE: f64 = 0.5;

/// Every figure derived for a property. Monthly amounts unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiResult {
    /// Gross monthly revenue.
    pub monthly_rev: f64,

    pub monthly_taxes: f64,
    pub monthly_insurance: f64,
    pub vacancy: f64,
    pub management: f64,
    pub capital_expenditures: f64,
    pub repairs: f64,

    /// Negative for a positive loan principal (cash leaving the borrower).
    pub monthly_mortgage_payment: f64,

    /// Expense line items plus the absolute mortgage payment.
    pub total_monthly_cost: f64,
    pub net_monthly_cash_flow: f64,

    /// Ratio, not percent-scaled.
    pub one_percent_rule: f64,
    /// Yearly, as a ratio.
    pub cap_rate: f64,
    /// The "50% rule" figure.
    pub cash_flow: f64,
    /// Cash required at purchase (down payment plus closing costs).
    pub total_close: f64,
    /// Yearly cash-on-cash return, as a ratio.
    pub co_croi: f64,
}

impl KpiResult {
    /// Classifies the tiered metrics.
    pub fn tiers(&self) -> KpiTiers {
        KpiTiers::from(self)
    }

    /// Whether every field is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.monthly_rev,
            self.monthly_taxes,
            self.monthly_insurance,
            self.vacancy,
            self.management,
            self.capital_expenditures,
            self.repairs,
            self.monthly_mortgage_payment,
            self.total_monthly_cost,
            self.net_monthly_cash_flow,
            self.one_percent_rule,
            self.cap_rate,
            self.cash_flow,
            self.total_close,
            self.co_croi,
        ]
        .iter()
        .all(|value| value.is_finite())
    }
}

/// Derives the full KPI set for `input`.
///
/// Pure: the same input always yields a bit-identical result.
pub fn derive_kpis(input: &PropertyInput) -> KpiResult {
    let is_ltr = input.mode == RentalMode::Ltr;

    let monthly_rev = monthly_revenue(input);

    let monthly_taxes = input.taxes_yearly / MONTHS_PER_YEAR;
    let monthly_insurance = input.insurance / MONTHS_PER_YEAR;

    // Occupancy already discounts STR revenue, so it carries no vacancy line.
    let vacancy = if is_ltr {
        monthly_rev * percent_to_fraction(input.vacancy_rate)
    } else {
        0.0
    };
    let management = monthly_rev * percent_to_fraction(input.management_rate);
    let capital_expenditures = monthly_rev * percent_to_fraction(input.capital_expenditures_rate);
    let repairs = monthly_rev * percent_to_fraction(input.repair_rate);

    let ltv = percent_to_fraction(input.ltv);
    let monthly_mortgage_payment = compute_payment(
        percent_to_fraction(input.loan_rate) / MONTHS_PER_YEAR,
        input.months,
        input.purchase_price * ltv,
        0.0,
        PaymentTiming::End,
    );

    let total_monthly_cost = monthly_taxes
        + monthly_insurance
        + vacancy
        + management
        + capital_expenditures
        + repairs
        - monthly_mortgage_payment;
    let net_monthly_cash_flow = monthly_rev - total_monthly_cost;

    let one_percent_rule = monthly_rev / input.purchase_price;
    // Reserves (capex, repairs) stay out of NOI here.
    let cap_rate = (monthly_rev - monthly_taxes - monthly_insurance - vacancy - management)
        * MONTHS_PER_YEAR
        / input.purchase_price;
    let cash_flow = monthly_rev * FIFTY_PERCENT_RULE + monthly_mortgage_payment;
    // Rehab cost is not part of the cash required at close.
    let total_close = input.purchase_price * (1.0 - ltv) + input.closing;
    let co_croi = (net_monthly_cash_flow * MONTHS_PER_YEAR) / total_close;

    KpiResult {
        monthly_rev,
        monthly_taxes,
        monthly_insurance,
        vacancy,
        management,
        capital_expenditures,
        repairs,
        monthly_mortgage_payment,
        total_monthly_cost,
        net_monthly_cash_flow,
        one_percent_rule,
        cap_rate,
        cash_flow,
        total_close,
        co_croi,
    }
}

/// Gross monthly revenue for the property's rental mode.
fn monthly_revenue(input: &PropertyInput) -> f64 {
    match input.mode {
        RentalMode::Ltr => input.monthly_rent,
        RentalMode::Str => {
            (input.average_nightly_rent
                * NIGHTS_PER_YEAR
                * percent_to_fraction(input.occupancy_rate))
                / MONTHS_PER_YEAR
        }
    }
}
