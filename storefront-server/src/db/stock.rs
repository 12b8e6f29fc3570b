//! Stock debits and the stock transaction audit trail
//!
//! All functions here run inside the caller's transaction: a stock row
//! is locked with `FOR UPDATE` for the whole completion transition, so
//! concurrent completions serialize per product and the availability
//! check stays valid through the debit.

use shared::models::{Stock, StockTransactionType};
use shared::util::snowflake_id;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Lock and fetch the stock row for a product.
pub async fn lock_for_debit(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: i64,
) -> Result<Option<Stock>, BoxError> {
    let row: Option<Stock> = sqlx::query_as(
        "SELECT product_id, quantity, updated_at FROM stock WHERE product_id = $1 FOR UPDATE",
    )
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

/// Decrement on-hand quantity. The caller has already verified
/// availability under the row lock.
pub async fn debit(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: i64,
    quantity: i64,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query("UPDATE stock SET quantity = quantity - $2, updated_at = $3 WHERE product_id = $1")
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Append one audit record for a stock movement.
pub async fn record_transaction(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: i64,
    price: rust_decimal::Decimal,
    quantity: i64,
    transaction_type: StockTransactionType,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO stock_transactions (id, product_id, price, quantity, transaction_type, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(snowflake_id())
    .bind(product_id)
    .bind(price)
    .bind(quantity)
    .bind(transaction_type)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
