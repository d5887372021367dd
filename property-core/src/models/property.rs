use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RentalMode;

/// The user-editable part of a saved property scenario.
///
/// Money fields are stored at two decimal places; rate fields are
/// percentages on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub url: Option<String>,
    pub notes: Option<String>,

    // Financing
    pub purchase_price: Decimal,
    pub loan_rate: Decimal,
    pub ltv: Decimal,
    pub months: i32,

    // Fixed costs
    pub insurance: Decimal,
    pub taxes_yearly: Decimal,
    pub closing: Decimal,

    // Revenue
    pub mode: RentalMode,
    pub monthly_rent: Decimal,
    pub average_nightly_rent: Decimal,
    pub occupancy_rate: Decimal,

    // Expense rates (percent of monthly revenue)
    pub vacancy_rate: Decimal,
    pub management_rate: Decimal,
    pub capital_expenditures_rate: Decimal,
    pub repair_rate: Decimal,

    // Rehab fields are kept on the record but do not feed the KPIs
    pub total_rehab_cost: Option<Decimal>,
    pub post_rehab_value: Option<Decimal>,
}

impl Default for PropertyDetails {
    fn default() -> Self {
        Self {
            url: None,
            notes: None,
            purchase_price: Decimal::new(500_000, 0),
            loan_rate: Decimal::new(65, 1),
            ltv: Decimal::new(80, 0),
            months: 360,
            insurance: Decimal::new(1_200, 0),
            taxes_yearly: Decimal::new(7_500, 0),
            closing: Decimal::new(10_000, 0),
            mode: RentalMode::Ltr,
            monthly_rent: Decimal::new(2_500, 0),
            average_nightly_rent: Decimal::new(250, 0),
            occupancy_rate: Decimal::new(75, 0),
            vacancy_rate: Decimal::new(5, 0),
            management_rate: Decimal::ZERO,
            capital_expenditures_rate: Decimal::new(5, 0),
            repair_rate: Decimal::new(5, 0),
            total_rehab_cost: Some(Decimal::new(15_000, 0)),
            post_rehab_value: Some(Decimal::new(650_000, 0)),
        }
    }
}

/// A saved property scenario, addressable by its generated identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,

    #[serde(flatten)]
    pub details: PropertyDetails,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
