//! Order management core
//!
//! Creation, retrieval, reporting and the status state machine. Every
//! multi-write path runs in one transaction; the confirmation email is
//! dispatched after commit on a spawned task and never affects the
//! response.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Order, OrderCreate, OrderDetail, OrderItem, OrderStatus, OrderSummary, Payment, PaymentStatus,
    Stock, StockTransactionType, User,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use crate::db;
use crate::email::{self, Mailer};
use crate::error::ServiceResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_SHORT_TEXT_LEN, require_field, validate_date_range,
    validate_positive_quantity, validate_required_text,
};

pub use crate::db::orders::BestSellingProduct;

/// Revenue report over an order-date range
#[derive(Debug, Clone, serde::Serialize)]
pub struct RevenueReport {
    pub total_revenue: Decimal,
    pub number_of_orders: i64,
    pub average_order_value: Decimal,
}

/// Order management service: owns the pool and the mail seam
#[derive(Clone)]
pub struct OrderService {
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
}

impl OrderService {
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>) -> Self {
        Self { pool, mailer }
    }

    /// Create an order with its line items and payments in one
    /// transaction, then dispatch the confirmation email.
    pub async fn create_order(&self, payload: OrderCreate) -> ServiceResult<OrderDetail> {
        // 1. Validate required fields
        let user_id = require_field(payload.user_id, "user_id")?;
        let subtotal_amount = require_field(payload.subtotal_amount, "subtotal_amount")?;
        let shipping_address = require_field(payload.shipping_address, "shipping_address")?;
        let shipping_method = require_field(payload.shipping_method, "shipping_method")?;
        let final_amount = require_field(payload.final_amount, "final_amount")?;

        validate_required_text(&shipping_address, "shipping_address", MAX_ADDRESS_LEN)?;
        validate_required_text(&shipping_method, "shipping_method", MAX_SHORT_TEXT_LEN)?;

        if payload.items.is_empty() {
            return Err(AppError::validation_field("items must not be empty", "items").into());
        }
        for item in &payload.items {
            validate_positive_quantity(item.quantity, "quantity")?;
        }

        // 2. Resolve the customer
        let user = db::users::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::UserNotFound,
                    format!("User {user_id} does not exist"),
                )
            })?;

        // 3. Resolve referenced products (ad-hoc items have none)
        let mut product_names: HashMap<i64, String> = HashMap::new();
        for item in &payload.items {
            let Some(product_id) = item.product_id else {
                continue;
            };
            if product_names.contains_key(&product_id) {
                continue;
            }
            let product = db::products::find_by_id(&self.pool, product_id)
                .await?
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::ProductNotFound,
                        format!("Product {product_id} does not exist"),
                    )
                    .with_detail("product_id", product_id)
                })?;
            product_names.insert(product_id, product.name);
        }

        // 4. Build the aggregate
        let now = now_millis();
        let order = Order {
            id: snowflake_id(),
            user_id,
            order_date: payload.order_date.unwrap_or(now),
            subtotal_amount,
            shipping_fee: payload.shipping_fee.unwrap_or(Decimal::ZERO),
            final_amount,
            shipping_address,
            shipping_method,
            status: payload.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let items: Vec<OrderItem> = payload
            .items
            .iter()
            .map(|item| OrderItem {
                id: snowflake_id(),
                order_id: order.id,
                product_id: item.product_id,
                quantity: item.quantity,
                original_price: item.original_price,
                final_price: item.final_price,
            })
            .collect();

        // 5. Validate and build payments (amount and method are mandatory)
        let mut payments: Vec<Payment> = Vec::new();
        for p in payload.payments.unwrap_or_default() {
            let payment_method = require_field(p.payment_method, "payment_method")?;
            let amount = require_field(p.amount, "amount")?;
            payments.push(Payment {
                id: snowflake_id(),
                order_id: order.id,
                payment_method,
                payment_date: p.payment_date.unwrap_or(now),
                transaction_id: p.transaction_id,
                amount,
                transaction_status: p.transaction_status.unwrap_or_default(),
            });
        }

        // 6. Persist atomically
        let mut tx = self.pool.begin().await?;
        db::orders::insert_order(&mut tx, &order).await?;
        db::orders::insert_items(&mut tx, &items).await?;
        db::orders::insert_payments(&mut tx, &payments).await?;
        tx.commit().await?;

        // 7. Best-effort confirmation, off the request path
        self.dispatch_confirmation(order.clone(), items.clone(), product_names, user);

        Ok(OrderDetail {
            order,
            items,
            payments,
        })
    }

    /// Spawn the confirmation send; failures are logged, never surfaced.
    fn dispatch_confirmation(
        &self,
        order: Order,
        items: Vec<OrderItem>,
        product_names: HashMap<i64, String>,
        user: User,
    ) {
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            if let Err(e) = email::send_order_confirmation(
                mailer.as_ref(),
                &order,
                &items,
                &product_names,
                &user,
            )
            .await
            {
                tracing::warn!(order_id = order.id, error = %e, "Order confirmation email failed");
            }
        });
    }

    pub async fn list_orders(&self, limit: i32, offset: i64) -> ServiceResult<Vec<OrderSummary>> {
        Ok(db::orders::list_summaries(&self.pool, limit, offset).await?)
    }

    pub async fn get_order(&self, order_id: i64) -> ServiceResult<OrderDetail> {
        let order = db::orders::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {order_id} does not exist"),
                )
            })?;
        let items = db::orders::find_items(&self.pool, order_id).await?;
        let payments = db::orders::find_payments(&self.pool, order_id).await?;
        Ok(OrderDetail {
            order,
            items,
            payments,
        })
    }

    /// All orders for a user, full aggregates. An unknown or order-less
    /// user yields an empty list, not an error.
    pub async fn orders_for_user(&self, user_id: i64) -> ServiceResult<Vec<OrderDetail>> {
        let orders = db::orders::list_by_user(&self.pool, user_id).await?;
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let items = db::orders::find_items(&self.pool, order.id).await?;
            let payments = db::orders::find_payments(&self.pool, order.id).await?;
            details.push(OrderDetail {
                order,
                items,
                payments,
            });
        }
        Ok(details)
    }

    pub async fn revenue_report(&self, start: i64, end: i64) -> ServiceResult<RevenueReport> {
        validate_date_range(start, end)?;
        let (total_revenue, number_of_orders) =
            db::orders::revenue_totals(&self.pool, start, end).await?;
        Ok(RevenueReport {
            total_revenue,
            number_of_orders,
            average_order_value: average_order_value(total_revenue, number_of_orders),
        })
    }

    pub async fn best_selling_products(
        &self,
        start: i64,
        end: i64,
        limit: i32,
    ) -> ServiceResult<Vec<BestSellingProduct>> {
        validate_date_range(start, end)?;
        Ok(db::orders::best_selling(&self.pool, start, end, limit).await?)
    }

    /// Transition an order to a new status.
    ///
    /// Completion settles the payments and debits stock for every line
    /// item, writing one EXPORT audit record per debit. Any failure
    /// rolls the whole transition back.
    pub async fn update_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        // 1. Lock the order row for the whole transition
        let order = db::orders::find_for_update(&mut tx, order_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {order_id} does not exist"),
                )
            })?;

        // 2. A completed order cannot be completed again (no double debit)
        completion_guard(order.status, new_status)?;

        // 3. The transition requires line items...
        let items = db::orders::find_items_tx(&mut tx, order_id).await?;
        if items.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::OrderEmpty,
                format!("Order {order_id} has no line items"),
            )
            .into());
        }

        // 4. ...and at least one payment; mirror the status onto them
        let touched =
            db::orders::set_payment_status(&mut tx, order_id, payment_status_for(new_status))
                .await?;
        if touched == 0 {
            return Err(AppError::with_message(
                ErrorCode::PaymentNotFound,
                format!("Order {order_id} has no payment"),
            )
            .into());
        }

        // 5. Set the new status
        let now = now_millis();
        db::orders::set_status(&mut tx, order_id, new_status, now).await?;

        // 6. Completion debits stock and writes the audit trail
        if new_status == OrderStatus::Completed {
            for item in &items {
                let product_id = item.product_id.ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::ProductNotFound,
                        "Order item has no product; ad-hoc items cannot be completed",
                    )
                    .with_detail("order_item_id", item.id)
                })?;

                let product = db::products::find_by_id_tx(&mut tx, product_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::with_message(
                            ErrorCode::ProductNotFound,
                            format!("Product {product_id} does not exist"),
                        )
                        .with_detail("product_id", product_id)
                    })?;

                let stock = db::stock::lock_for_debit(&mut tx, product_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::with_message(
                            ErrorCode::StockNotFound,
                            format!("No stock record for product {product_id}"),
                        )
                        .with_detail("product_id", product_id)
                    })?;

                ensure_stock(&stock, item)?;

                db::stock::debit(&mut tx, product_id, item.quantity, now).await?;
                db::stock::record_transaction(
                    &mut tx,
                    product_id,
                    product.price,
                    item.quantity,
                    StockTransactionType::Export,
                    now,
                )
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Payment status mirrored from an order status: completion settles
/// payments, anything else reverts them to unpaid.
fn payment_status_for(status: OrderStatus) -> PaymentStatus {
    if status == OrderStatus::Completed {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Unpaid
    }
}

/// Completing an already-completed order would re-run the stock debit
/// loop; reject it instead.
fn completion_guard(current: OrderStatus, requested: OrderStatus) -> Result<(), AppError> {
    if current == OrderStatus::Completed && requested == OrderStatus::Completed {
        return Err(AppError::new(ErrorCode::OrderAlreadyCompleted));
    }
    Ok(())
}

/// Availability check before a debit. Stock exactly matching the
/// requested quantity passes (and is debited to zero).
fn ensure_stock(stock: &Stock, item: &OrderItem) -> Result<(), AppError> {
    if stock.quantity < item.quantity {
        return Err(AppError::new(ErrorCode::InsufficientStock)
            .with_detail("product_id", stock.product_id)
            .with_detail("available", stock.quantity)
            .with_detail("requested", item.quantity));
    }
    Ok(())
}

/// Average order value: total / count rounded to the nearest whole
/// unit, half away from zero; zero when there are no orders.
fn average_order_value(total: Decimal, count: i64) -> Decimal {
    if count > 0 {
        (total / Decimal::from(count))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::models::OrderItemCreate;

    struct NullMailer;

    #[async_trait]
    impl Mailer for NullMailer {
        async fn send(
            &self,
            _to: &str,
            _subject: &str,
            _body: &str,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }
    }

    /// Lazy pool: validation failures return before any query runs, so
    /// these tests need no database.
    fn service_without_db() -> OrderService {
        let pool = PgPool::connect_lazy("postgres://localhost/unreachable").unwrap();
        OrderService::new(pool, Arc::new(NullMailer))
    }

    fn order_payload() -> OrderCreate {
        OrderCreate {
            user_id: Some(1),
            order_date: None,
            subtotal_amount: Some(Decimal::new(49_900, 2)),
            shipping_address: Some("12 Harbor Road".to_string()),
            shipping_method: Some("Standard".to_string()),
            shipping_fee: None,
            final_amount: Some(Decimal::new(49_900, 2)),
            status: None,
            items: vec![OrderItemCreate {
                product_id: None,
                quantity: 1,
                original_price: Decimal::new(49_900, 2),
                final_price: Decimal::new(49_900, 2),
            }],
            payments: None,
        }
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty_items() {
        let svc = service_without_db();
        let mut payload = order_payload();
        payload.items.clear();

        let err = svc.create_order(payload).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_create_order_requires_user_id() {
        let svc = service_without_db();
        let mut payload = order_payload();
        payload.user_id = None;

        let err = svc.create_order(payload).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_create_order_rejects_zero_quantity() {
        let svc = service_without_db();
        let mut payload = order_payload();
        payload.items[0].quantity = 0;

        let err = svc.create_order(payload).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_create_order_rejects_blank_address() {
        let svc = service_without_db();
        let mut payload = order_payload();
        payload.shipping_address = Some("   ".to_string());

        let err = svc.create_order(payload).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_revenue_report_rejects_inverted_range() {
        let svc = service_without_db();

        let err = svc.revenue_report(10, 5).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_payment_status_mirrors_order_status() {
        assert_eq!(
            payment_status_for(OrderStatus::Completed),
            PaymentStatus::Paid
        );
        assert_eq!(
            payment_status_for(OrderStatus::Pending),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            payment_status_for(OrderStatus::Processing),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            payment_status_for(OrderStatus::Cancelled),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_completion_guard_blocks_repeat_completion() {
        let err = completion_guard(OrderStatus::Completed, OrderStatus::Completed).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAlreadyCompleted);
    }

    #[test]
    fn test_completion_guard_allows_other_transitions() {
        assert!(completion_guard(OrderStatus::Pending, OrderStatus::Completed).is_ok());
        assert!(completion_guard(OrderStatus::Completed, OrderStatus::Cancelled).is_ok());
        assert!(completion_guard(OrderStatus::Pending, OrderStatus::Pending).is_ok());
        assert!(completion_guard(OrderStatus::Processing, OrderStatus::Processing).is_ok());
    }

    fn stock_of(quantity: i64) -> Stock {
        Stock {
            product_id: 7,
            quantity,
            updated_at: 0,
        }
    }

    fn item_requesting(quantity: i64) -> OrderItem {
        OrderItem {
            id: 1,
            order_id: 1,
            product_id: Some(7),
            quantity,
            original_price: Decimal::new(49_900, 2),
            final_price: Decimal::new(49_900, 2),
        }
    }

    #[test]
    fn test_ensure_stock_passes_on_exact_quantity() {
        assert!(ensure_stock(&stock_of(3), &item_requesting(3)).is_ok());
        assert!(ensure_stock(&stock_of(10), &item_requesting(3)).is_ok());
    }

    #[test]
    fn test_ensure_stock_rejects_shortfall() {
        let err = ensure_stock(&stock_of(2), &item_requesting(3)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err = ensure_stock(&stock_of(0), &item_requesting(1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_average_order_value_rounds_half_up() {
        // 100 / 4 = 25 exactly
        assert_eq!(
            average_order_value(Decimal::from(100), 4),
            Decimal::from(25)
        );
        // 100 / 3 = 33.33... rounds down
        assert_eq!(
            average_order_value(Decimal::from(100), 3),
            Decimal::from(33)
        );
        // 250 / 100 = 2.5 rounds up to 3
        assert_eq!(average_order_value(Decimal::from(250), 100), Decimal::from(3));
        // 99.99 / 2 = 49.995 rounds up to 50
        assert_eq!(
            average_order_value(Decimal::new(9999, 2), 2),
            Decimal::from(50)
        );
    }

    #[test]
    fn test_average_order_value_zero_when_no_orders() {
        assert_eq!(average_order_value(Decimal::ZERO, 0), Decimal::ZERO);
        assert_eq!(average_order_value(Decimal::from(500), 0), Decimal::ZERO);
    }
}
