//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
///
/// Referenced by order line items; price and name feed reporting and
/// email rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Current unit price (currency precision)
    pub price: Decimal,
    pub is_active: bool,
    pub created_at: i64,
}
