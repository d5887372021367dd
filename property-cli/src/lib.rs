//! Command-line front end for saving, sharing and evaluating rental
//! property scenarios.

pub mod app;
pub mod logging;
pub mod report;
