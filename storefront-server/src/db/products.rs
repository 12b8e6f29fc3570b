//! Product lookups

use shared::models::Product;
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub async fn find_by_id(pool: &PgPool, product_id: i64) -> Result<Option<Product>, BoxError> {
    let row: Option<Product> = sqlx::query_as(
        "SELECT id, name, price, is_active, created_at FROM products WHERE id = $1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Transaction-scoped variant used by the completion path, so the price
/// recorded on the stock transaction is read inside the same transaction.
pub async fn find_by_id_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: i64,
) -> Result<Option<Product>, BoxError> {
    let row: Option<Product> = sqlx::query_as(
        "SELECT id, name, price, is_active, created_at FROM products WHERE id = $1",
    )
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}
