//! Investment calculations for rental properties.
//!
//! [`payment`] is the amortized loan payment primitive; [`kpis`] builds the
//! full metric set on top of it and [`tiers`] grades the headline numbers.

pub mod common;
pub mod kpis;
pub mod payment;
pub mod tiers;

pub use kpis::{KpiResult, derive_kpis};
pub use payment::{PaymentTiming, compute_payment};
pub use tiers::{KpiLevel, KpiTiers};
