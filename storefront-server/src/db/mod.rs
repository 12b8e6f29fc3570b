//! Database access layer
//!
//! Pool-level reads live here as plain functions; multi-write paths take
//! an open transaction so the service layer controls commit/rollback.

pub mod orders;
pub mod products;
pub mod stock;
pub mod users;
