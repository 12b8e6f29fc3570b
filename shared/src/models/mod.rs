//! Data models
//!
//! Shared between the storefront server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes generated app-side; timestamps are unix
//! milliseconds; money is `rust_decimal::Decimal` (NUMERIC in Postgres).

pub mod order;
pub mod product;
pub mod stock;
pub mod user;

// Re-exports
pub use order::*;
pub use product::*;
pub use stock::*;
pub use user::*;
