//! Finarc tracks spending against per-category budgets.
//!
//! Each category may carry a monthly limit and a cycle start day. The
//! [`budget::BudgetMonitor`] resolves the cycle a date falls in, sums the
//! spending recorded in it and records an alert the first time a cycle
//! reaches 90% and 100% of the limit. Storage is reached through the traits
//! in [`stores`]; [`db::Database`] implements them on SQLite.

pub mod budget;
pub mod config;
pub mod db;
mod error;
pub mod logging;
pub mod models;
pub mod stores;

pub use error::{Error, Result};
