use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::{Property, PropertyDetails, RentalMode};

/// Floating-point view of a property consumed by the KPI engine.
///
/// Rates keep their 0-100 percentage scale here; the engine converts them
/// to fractions itself. Non-finite values are allowed and simply flow
/// through to the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    pub id: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,

    pub purchase_price: f64,
    pub loan_rate: f64,
    pub ltv: f64,
    pub months: i32,

    pub insurance: f64,
    pub taxes_yearly: f64,
    pub closing: f64,

    pub mode: RentalMode,
    pub monthly_rent: f64,
    pub average_nightly_rent: f64,
    pub occupancy_rate: f64,

    pub vacancy_rate: f64,
    pub management_rate: f64,
    pub capital_expenditures_rate: f64,
    pub repair_rate: f64,

    pub total_rehab_cost: Option<f64>,
}

/// Decimal values outside the `f64` range become NaN rather than a
/// silently wrong number.
fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

impl From<&PropertyDetails> for PropertyInput {
    fn from(details: &PropertyDetails) -> Self {
        Self {
            id: None,
            url: details.url.clone(),
            notes: details.notes.clone(),
            purchase_price: to_f64(details.purchase_price),
            loan_rate: to_f64(details.loan_rate),
            ltv: to_f64(details.ltv),
            months: details.months,
            insurance: to_f64(details.insurance),
            taxes_yearly: to_f64(details.taxes_yearly),
            closing: to_f64(details.closing),
            mode: details.mode,
            monthly_rent: to_f64(details.monthly_rent),
            average_nightly_rent: to_f64(details.average_nightly_rent),
            occupancy_rate: to_f64(details.occupancy_rate),
            vacancy_rate: to_f64(details.vacancy_rate),
            management_rate: to_f64(details.management_rate),
            capital_expenditures_rate: to_f64(details.capital_expenditures_rate),
            repair_rate: to_f64(details.repair_rate),
            total_rehab_cost: details.total_rehab_cost.map(to_f64),
        }
    }
}

impl From<&Property> for PropertyInput {
    fn from(property: &Property) -> Self {
        Self {
            id: Some(property.id.clone()),
            ..Self::from(&property.details)
        }
    }
}
