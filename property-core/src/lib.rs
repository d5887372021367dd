//! Rental property investment metrics.
//!
//! [`derive_kpis`] turns a [`PropertyInput`] into a [`KpiResult`]; the rest
//! of the crate covers what sits around that engine: the persisted
//! [`PropertyDetails`] record, its validation, display formatting and the
//! storage abstraction implemented by backend crates.

pub mod calculations;
pub mod db;
pub mod format;
pub mod models;
pub mod validation;

pub use calculations::{KpiLevel, KpiResult, KpiTiers, PaymentTiming, compute_payment, derive_kpis};
pub use db::repository::{PropertyRepository, RepositoryError};
pub use models::*;
pub use validation::PropertyValidationError;
