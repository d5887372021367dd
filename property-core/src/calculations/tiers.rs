//! Good / warning / bad tiers for the headline KPIs.
//!
//! | Metric | Good | Warning | Bad |
//! |--------|------|---------|-----|
//! | net monthly cash flow | > 400 | > 100 | otherwise |
//! | 1% rule | ≥ 0.01 | > 0.008 | otherwise |
//! | cap rate | ≥ 0.08 | > 0.05 | otherwise |
//! | 50% rule cash flow | > 0 | exactly 0 (or NaN) | < 0 |
//! | cash-on-cash return | ≥ 0.08 | > 0 | otherwise |
//!
//! Comparisons against `NaN` are false, so a `NaN` metric lands in the
//! "otherwise" column.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::kpis::KpiResult;

pub const NET_CASH_FLOW_GOOD: f64 = 400.0;
pub const NET_CASH_FLOW_WARNING: f64 = 100.0;
pub const ONE_PERCENT_RULE_GOOD: f64 = 0.01;
pub const ONE_PERCENT_RULE_WARNING: f64 = 0.008;
pub const CAP_RATE_GOOD: f64 = 0.08;
pub const CAP_RATE_WARNING: f64 = 0.05;
pub const CO_CROI_GOOD: f64 = 0.08;
pub const CO_CROI_WARNING: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiLevel {
    Good,
    Warning,
    Bad,
}

impl KpiLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Bad => "bad",
        }
    }
}

impl fmt::Display for KpiLevel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_net_monthly_cash_flow(value: f64) -> KpiLevel {
    if value > NET_CASH_FLOW_GOOD {
        KpiLevel::Good
    } else if value > NET_CASH_FLOW_WARNING {
        KpiLevel::Warning
    } else {
        KpiLevel::Bad
    }
}

pub fn classify_one_percent_rule(value: f64) -> KpiLevel {
    if value >= ONE_PERCENT_RULE_GOOD {
        KpiLevel::Good
    } else if value > ONE_PERCENT_RULE_WARNING {
        KpiLevel::Warning
    } else {
        KpiLevel::Bad
    }
}

pub fn classify_cap_rate(value: f64) -> KpiLevel {
    if value >= CAP_RATE_GOOD {
        KpiLevel::Good
    } else if value > CAP_RATE_WARNING {
        KpiLevel::Warning
    } else {
        KpiLevel::Bad
    }
}

/// Only a strictly negative 50% rule figure is bad; break-even is a warning.
pub fn classify_cash_flow(value: f64) -> KpiLevel {
    if value > 0.0 {
        KpiLevel::Good
    } else if value < 0.0 {
        KpiLevel::Bad
    } else {
        KpiLevel::Warning
    }
}

pub fn classify_co_croi(value: f64) -> KpiLevel {
    if value >= CO_CROI_GOOD {
        KpiLevel::Good
    } else if value > CO_CROI_WARNING {
        KpiLevel::Warning
    } else {
        KpiLevel::Bad
    }
}

/// Tier of each headline metric in a [`KpiResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiTiers {
    pub net_monthly_cash_flow: KpiLevel,
    pub one_percent_rule: KpiLevel,
    pub cap_rate: KpiLevel,
    pub cash_flow: KpiLevel,
    pub co_croi: KpiLevel,
}

impl From<&KpiResult> for KpiTiers {
    fn from(kpis: &KpiResult) -> Self {
        Self {
            net_monthly_cash_flow: classify_net_monthly_cash_flow(kpis.net_monthly_cash_flow),
            one_percent_rule: classify_one_percent_rule(kpis.one_percent_rule),
            cap_rate: classify_cap_rate(kpis.cap_rate),
            cash_flow: classify_cash_flow(kpis.cash_flow),
            co_croi: classify_co_croi(kpis.co_croi),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn net_cash_flow_boundaries_are_exclusive() {
        assert_eq!(classify_net_monthly_cash_flow(400.01), KpiLevel::Good);
        assert_eq!(classify_net_monthly_cash_flow(400.0), KpiLevel::Warning);
        assert_eq!(classify_net_monthly_cash_flow(100.01), KpiLevel::Warning);
        assert_eq!(classify_net_monthly_cash_flow(100.0), KpiLevel::Bad);
        assert_eq!(classify_net_monthly_cash_flow(-50.0), KpiLevel::Bad);
    }

    #[test]
    fn one_percent_rule_good_boundary_is_inclusive() {
        assert_eq!(classify_one_percent_rule(0.01), KpiLevel::Good);
        assert_eq!(classify_one_percent_rule(0.009), KpiLevel::Warning);
        assert_eq!(classify_one_percent_rule(0.008), KpiLevel::Bad);
    }

    #[test]
    fn cap_rate_boundaries() {
        assert_eq!(classify_cap_rate(0.08), KpiLevel::Good);
        assert_eq!(classify_cap_rate(0.06), KpiLevel::Warning);
        assert_eq!(classify_cap_rate(0.05), KpiLevel::Bad);
    }

    #[test]
    fn cash_flow_break_even_is_warning() {
        assert_eq!(classify_cash_flow(0.01), KpiLevel::Good);
        assert_eq!(classify_cash_flow(0.0), KpiLevel::Warning);
        assert_eq!(classify_cash_flow(-0.01), KpiLevel::Bad);
    }

    #[test]
    fn co_croi_any_positive_return_is_at_least_warning() {
        assert_eq!(classify_co_croi(0.08), KpiLevel::Good);
        assert_eq!(classify_co_croi(0.001), KpiLevel::Warning);
        assert_eq!(classify_co_croi(0.0), KpiLevel::Bad);
        assert_eq!(classify_co_croi(-0.2), KpiLevel::Bad);
    }

    #[test]
    fn nan_falls_through_to_last_tier() {
        assert_eq!(classify_net_monthly_cash_flow(f64::NAN), KpiLevel::Bad);
        assert_eq!(classify_one_percent_rule(f64::NAN), KpiLevel::Bad);
        assert_eq!(classify_cap_rate(f64::NAN), KpiLevel::Bad);
        assert_eq!(classify_cash_flow(f64::NAN), KpiLevel::Warning);
        assert_eq!(classify_co_croi(f64::NAN), KpiLevel::Bad);
    }

    #[test]
    fn infinity_is_good() {
        assert_eq!(classify_one_percent_rule(f64::INFINITY), KpiLevel::Good);
        assert_eq!(classify_cap_rate(f64::INFINITY), KpiLevel::Good);
    }

    #[test]
    fn level_labels_are_lowercase() {
        assert_eq!(KpiLevel::Good.to_string(), "good");
        assert_eq!(KpiLevel::Warning.as_str(), "warning");
        assert_eq!(KpiLevel::Bad.as_str(), "bad");
    }
}
