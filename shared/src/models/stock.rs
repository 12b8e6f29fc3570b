//! Stock & Stock Transaction Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stock record - on-hand quantity for a product (one-to-one)
///
/// Quantity is never negative; the completion path checks availability
/// before every debit and the schema enforces the floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Stock {
    pub product_id: i64,
    pub quantity: i64,
    pub updated_at: i64,
}

/// Stock movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum StockTransactionType {
    /// Inventory leaving stock (sales-driven debit)
    Export,
    /// Inventory entering stock (restock, correction)
    Import,
}

/// Immutable audit record for every stock movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockTransaction {
    pub id: i64,
    pub product_id: i64,
    /// Unit price of the product at transaction time
    pub price: Decimal,
    pub quantity: i64,
    pub transaction_type: StockTransactionType,
    pub created_at: i64,
}
