//! Input checks applied before a property is persisted.
//!
//! The KPI engine accepts any numbers and lets degenerate values propagate
//! as `NaN` or infinities. Records that are stored, however, must fit the
//! storage columns and describe a purchasable property, so the CLI and the
//! CSV loader run [`PropertyDetails::validate`] first.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::warn;

use crate::models::PropertyDetails;

/// Largest amount a NUMERIC(11,2) column holds.
pub const MAX_MONEY: Decimal = dec!(999999999.99);

/// Upper bound for percent-scaled fields.
pub const MAX_PERCENT: Decimal = dec!(100);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PropertyValidationError {
    #[error("purchase price must be positive, got {0}")]
    NonPositivePurchasePrice(Decimal),

    #[error("loan term must be at least one month, got {0}")]
    NonPositiveMonths(i32),

    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: Decimal },

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{field} exceeds the maximum of 999999999.99, got {value}")]
    AmountTooLarge { field: &'static str, value: Decimal },
}

impl PropertyDetails {
    /// Checks the record field by field and returns the first failure.
    ///
    /// ```
    /// use property_core::PropertyDetails;
    /// use property_core::validation::PropertyValidationError;
    /// use rust_decimal_macros::dec;
    ///
    /// let details = PropertyDetails {
    ///     ltv: dec!(120),
    ///     ..PropertyDetails::default()
    /// };
    ///
    /// assert_eq!(
    ///     details.validate(),
    ///     Err(PropertyValidationError::PercentOutOfRange { field: "ltv", value: dec!(120) })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), PropertyValidationError> {
        let result = self.check();
        if let Err(error) = &result {
            warn!(error = %error, url = ?self.url, "Rejected property details");
        }
        result
    }

    fn check(&self) -> Result<(), PropertyValidationError> {
        if self.purchase_price <= Decimal::ZERO {
            return Err(PropertyValidationError::NonPositivePurchasePrice(
                self.purchase_price,
            ));
        }
        if self.months <= 0 {
            return Err(PropertyValidationError::NonPositiveMonths(self.months));
        }

        for (field, value) in self.percent_fields() {
            if value < Decimal::ZERO || value > MAX_PERCENT {
                return Err(PropertyValidationError::PercentOutOfRange { field, value });
            }
        }

        for (field, value) in self.money_fields() {
            if value < Decimal::ZERO {
                return Err(PropertyValidationError::NegativeAmount { field, value });
            }
            if value > MAX_MONEY {
                return Err(PropertyValidationError::AmountTooLarge { field, value });
            }
        }

        Ok(())
    }

    fn percent_fields(&self) -> [(&'static str, Decimal); 7] {
        [
            ("loan_rate", self.loan_rate),
            ("ltv", self.ltv),
            ("occupancy_rate", self.occupancy_rate),
            ("vacancy_rate", self.vacancy_rate),
            ("management_rate", self.management_rate),
            ("capital_expenditures_rate", self.capital_expenditures_rate),
            ("repair_rate", self.repair_rate),
        ]
    }

    fn money_fields(&self) -> Vec<(&'static str, Decimal)> {
        let mut fields = vec![
            ("purchase_price", self.purchase_price),
            ("monthly_rent", self.monthly_rent),
            ("average_nightly_rent", self.average_nightly_rent),
            ("insurance", self.insurance),
            ("taxes_yearly", self.taxes_yearly),
            ("closing", self.closing),
        ];
        if let Some(value) = self.total_rehab_cost {
            fields.push(("total_rehab_cost", value));
        }
        if let Some(value) = self.post_rehab_value {
            fields.push(("post_rehab_value", value));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(PropertyDetails::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_purchase_price() {
        let _guard = init_test_tracing();
        let details = PropertyDetails {
            purchase_price: dec!(0),
            ..PropertyDetails::default()
        };

        assert_eq!(
            details.validate(),
            Err(PropertyValidationError::NonPositivePurchasePrice(dec!(0)))
        );
    }

    #[test]
    fn rejects_zero_months() {
        let details = PropertyDetails {
            months: 0,
            ..PropertyDetails::default()
        };

        assert_eq!(
            details.validate(),
            Err(PropertyValidationError::NonPositiveMonths(0))
        );
    }

    #[test]
    fn purchase_price_is_checked_before_months() {
        let details = PropertyDetails {
            purchase_price: dec!(-1),
            months: -12,
            ..PropertyDetails::default()
        };

        assert_eq!(
            details.validate(),
            Err(PropertyValidationError::NonPositivePurchasePrice(dec!(-1)))
        );
    }

    // =========================================================================
    // percent fields
    // =========================================================================

    #[test]
    fn percent_bounds_are_inclusive() {
        let details = PropertyDetails {
            ltv: dec!(100),
            loan_rate: dec!(0),
            management_rate: dec!(100.00),
            ..PropertyDetails::default()
        };

        assert_eq!(details.validate(), Ok(()));
    }

    #[test]
    fn rejects_negative_vacancy_rate() {
        let details = PropertyDetails {
            vacancy_rate: dec!(-0.5),
            ..PropertyDetails::default()
        };

        assert_eq!(
            details.validate(),
            Err(PropertyValidationError::PercentOutOfRange {
                field: "vacancy_rate",
                value: dec!(-0.5),
            })
        );
    }

    #[test]
    fn rejects_occupancy_above_one_hundred() {
        let details = PropertyDetails {
            occupancy_rate: dec!(100.01),
            ..PropertyDetails::default()
        };

        assert_eq!(
            details.validate(),
            Err(PropertyValidationError::PercentOutOfRange {
                field: "occupancy_rate",
                value: dec!(100.01),
            })
        );
    }

    // =========================================================================
    // money fields
    // =========================================================================

    #[test]
    fn rejects_negative_insurance() {
        let details = PropertyDetails {
            insurance: dec!(-1200),
            ..PropertyDetails::default()
        };

        assert_eq!(
            details.validate(),
            Err(PropertyValidationError::NegativeAmount {
                field: "insurance",
                value: dec!(-1200),
            })
        );
    }

    #[test]
    fn accepts_largest_storable_amount() {
        let details = PropertyDetails {
            purchase_price: MAX_MONEY,
            ..PropertyDetails::default()
        };

        assert_eq!(details.validate(), Ok(()));
    }

    #[test]
    fn rejects_amount_beyond_column_precision() {
        let details = PropertyDetails {
            monthly_rent: dec!(1000000000),
            ..PropertyDetails::default()
        };

        assert_eq!(
            details.validate(),
            Err(PropertyValidationError::AmountTooLarge {
                field: "monthly_rent",
                value: dec!(1000000000),
            })
        );
    }

    #[test]
    fn optional_amounts_are_checked_when_present() {
        let details = PropertyDetails {
            post_rehab_value: Some(dec!(-5)),
            ..PropertyDetails::default()
        };

        assert_eq!(
            details.validate(),
            Err(PropertyValidationError::NegativeAmount {
                field: "post_rehab_value",
                value: dec!(-5),
            })
        );
    }

    #[test]
    fn missing_optional_amounts_are_valid() {
        let details = PropertyDetails {
            total_rehab_cost: None,
            post_rehab_value: None,
            ..PropertyDetails::default()
        };

        assert_eq!(details.validate(), Ok(()));
    }

    #[test]
    fn error_messages_name_the_field() {
        let error = PropertyValidationError::PercentOutOfRange {
            field: "ltv",
            value: dec!(150),
        };

        assert_eq!(error.to_string(), "ltv must be between 0 and 100, got 150");
    }
}
