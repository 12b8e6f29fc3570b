//! Order, line item and payment queries

use rust_decimal::Decimal;
use shared::models::{Order, OrderItem, OrderStatus, OrderSummary, Payment, PaymentStatus};
use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub async fn insert_order(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order: &Order,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO orders (
            id, user_id, order_date, subtotal_amount, shipping_fee, final_amount,
            shipping_address, shipping_method, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.order_date)
    .bind(order.subtotal_amount)
    .bind(order.shipping_fee)
    .bind(order.final_amount)
    .bind(&order.shipping_address)
    .bind(&order.shipping_method)
    .bind(order.status)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn insert_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    items: &[OrderItem],
) -> Result<(), BoxError> {
    for item in items {
        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, product_id, quantity, original_price, final_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.id)
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.original_price)
        .bind(item.final_price)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

pub async fn insert_payments(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    payments: &[Payment],
) -> Result<(), BoxError> {
    for payment in payments {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, order_id, payment_method, payment_date, transaction_id, amount, transaction_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(payment.id)
        .bind(payment.order_id)
        .bind(&payment.payment_method)
        .bind(payment.payment_date)
        .bind(&payment.transaction_id)
        .bind(payment.amount)
        .bind(payment.transaction_status)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, order_id: i64) -> Result<Option<Order>, BoxError> {
    let row: Option<Order> = sqlx::query_as(
        r#"
        SELECT id, user_id, order_date, subtotal_amount, shipping_fee, final_amount,
               shipping_address, shipping_method, status, created_at, updated_at
        FROM orders
        WHERE id = $1
        "#,
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Lock the order row for the status transition, so concurrent
/// transitions on the same order serialize.
pub async fn find_for_update(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: i64,
) -> Result<Option<Order>, BoxError> {
    let row: Option<Order> = sqlx::query_as(
        r#"
        SELECT id, user_id, order_date, subtotal_amount, shipping_fee, final_amount,
               shipping_address, shipping_method, status, created_at, updated_at
        FROM orders
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(order_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

pub async fn find_items(pool: &PgPool, order_id: i64) -> Result<Vec<OrderItem>, BoxError> {
    let rows: Vec<OrderItem> = sqlx::query_as(
        r#"
        SELECT id, order_id, product_id, quantity, original_price, final_price
        FROM order_items
        WHERE order_id = $1
        ORDER BY id
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_items_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: i64,
) -> Result<Vec<OrderItem>, BoxError> {
    let rows: Vec<OrderItem> = sqlx::query_as(
        r#"
        SELECT id, order_id, product_id, quantity, original_price, final_price
        FROM order_items
        WHERE order_id = $1
        ORDER BY id
        "#,
    )
    .bind(order_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows)
}

pub async fn find_payments(pool: &PgPool, order_id: i64) -> Result<Vec<Payment>, BoxError> {
    let rows: Vec<Payment> = sqlx::query_as(
        r#"
        SELECT id, order_id, payment_method, payment_date, transaction_id, amount, transaction_status
        FROM payments
        WHERE order_id = $1
        ORDER BY id
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn set_status(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: i64,
    status: OrderStatus,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query("UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1")
        .bind(order_id)
        .bind(status)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Mirror the order status onto every payment; returns the number of
/// payment rows touched (zero means the order has no payment).
pub async fn set_payment_status(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: i64,
    status: PaymentStatus,
) -> Result<u64, BoxError> {
    let result = sqlx::query("UPDATE payments SET transaction_status = $2 WHERE order_id = $1")
        .bind(order_id)
        .bind(status)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

/// Order summaries joined with the customer name, newest first.
pub async fn list_summaries(
    pool: &PgPool,
    limit: i32,
    offset: i64,
) -> Result<Vec<OrderSummary>, BoxError> {
    let rows: Vec<OrderSummary> = sqlx::query_as(
        r#"
        SELECT o.id, o.user_id, u.name AS user_name, o.order_date, o.final_amount, o.status,
               COUNT(oi.id) AS item_count
        FROM orders o
        JOIN users u ON u.id = o.user_id
        LEFT JOIN order_items oi ON oi.order_id = o.id
        GROUP BY o.id, u.name
        ORDER BY o.created_at DESC, o.id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Order>, BoxError> {
    let rows: Vec<Order> = sqlx::query_as(
        r#"
        SELECT id, user_id, order_date, subtotal_amount, shipping_fee, final_amount,
               shipping_address, shipping_method, status, created_at, updated_at
        FROM orders
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Total revenue and order count over an inclusive order-date range.
pub async fn revenue_totals(
    pool: &PgPool,
    start: i64,
    end: i64,
) -> Result<(Decimal, i64), BoxError> {
    let row: (Decimal, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(final_amount), 0) AS total_revenue, COUNT(*) AS order_count
        FROM orders
        WHERE order_date BETWEEN $1 AND $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[derive(serde::Serialize, sqlx::FromRow)]
pub struct BestSellingProduct {
    pub product_id: i64,
    pub product_name: String,
    pub total_quantity_sold: i64,
}

/// Quantity sold per product over an inclusive order-date range,
/// best sellers first. Ad-hoc items (no product reference) are
/// excluded by the join.
pub async fn best_selling(
    pool: &PgPool,
    start: i64,
    end: i64,
    limit: i32,
) -> Result<Vec<BestSellingProduct>, BoxError> {
    let rows: Vec<BestSellingProduct> = sqlx::query_as(
        r#"
        SELECT p.id AS product_id, p.name AS product_name,
               SUM(oi.quantity)::BIGINT AS total_quantity_sold
        FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        JOIN products p ON p.id = oi.product_id
        WHERE o.order_date BETWEEN $1 AND $2
        GROUP BY p.id, p.name
        ORDER BY total_quantity_sold DESC, p.id ASC
        LIMIT $3
        "#,
    )
    .bind(start)
    .bind(end)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
