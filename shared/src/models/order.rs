//! Order, Line Item & Payment Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Stored as TEXT (SCREAMING_SNAKE_CASE). Only the transition to
/// `Completed` carries side effects (stock debit, payment settlement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

/// Payment settlement status, mirrored from the order status on
/// transitions: `Completed` settles to `Paid`, anything else `Unpaid`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    /// Order timestamp (unix millis)
    pub order_date: i64,
    pub subtotal_amount: Decimal,
    pub shipping_fee: Decimal,
    pub final_amount: Decimal,
    pub shipping_address: String,
    pub shipping_method: String,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item
///
/// `product_id` is null for ad-hoc/custom items; those cannot pass
/// the completion path (stock resolution fails).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub original_price: Decimal,
    pub final_price: Decimal,
}

/// Payment record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub payment_method: String,
    /// Payment timestamp (unix millis)
    pub payment_date: i64,
    pub transaction_id: Option<String>,
    pub amount: Decimal,
    pub transaction_status: PaymentStatus,
}

/// Create order payload
///
/// Required fields are `Option` so missing values surface as structured
/// validation errors instead of deserialization failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub user_id: Option<i64>,
    /// Order timestamp (unix millis), defaults to now
    pub order_date: Option<i64>,
    pub subtotal_amount: Option<Decimal>,
    pub shipping_address: Option<String>,
    pub shipping_method: Option<String>,
    /// Defaults to 0
    pub shipping_fee: Option<Decimal>,
    pub final_amount: Option<Decimal>,
    /// Defaults to `Pending`
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub items: Vec<OrderItemCreate>,
    pub payments: Option<Vec<PaymentCreate>>,
}

/// Create line item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    /// Null for ad-hoc/custom items
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub original_price: Decimal,
    pub final_price: Decimal,
}

/// Create payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub payment_method: Option<String>,
    /// Defaults to now
    pub payment_date: Option<i64>,
    pub transaction_id: Option<String>,
    pub amount: Option<Decimal>,
    /// Defaults to `Unpaid`
    pub transaction_status: Option<PaymentStatus>,
}

/// Order summary row with joined user data (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub order_date: i64,
    pub final_amount: Decimal,
    pub status: OrderStatus,
    pub item_count: i64,
}

/// Full order aggregate (order + line items + payments)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serde() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );

        let status: OrderStatus = serde_json::from_str("\"PROCESSING\"").unwrap();
        assert_eq!(status, OrderStatus::Processing);

        let status: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_order_status_rejects_unknown() {
        let result: Result<OrderStatus, _> = serde_json::from_str("\"SHIPPED\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_payment_status_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Paid).unwrap(),
            "\"PAID\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Unpaid).unwrap(),
            "\"UNPAID\""
        );
    }

    #[test]
    fn test_order_create_deserialize_minimal() {
        let json = r#"{
            "user_id": 1,
            "subtotal_amount": "25.00",
            "shipping_address": "1 Main St",
            "shipping_method": "STANDARD",
            "final_amount": "30.00",
            "items": [
                {"product_id": 7, "quantity": 2, "original_price": "12.50", "final_price": "12.50"}
            ]
        }"#;

        let payload: OrderCreate = serde_json::from_str(json).unwrap();
        assert_eq!(payload.user_id, Some(1));
        assert!(payload.order_date.is_none());
        assert!(payload.shipping_fee.is_none());
        assert!(payload.status.is_none());
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].quantity, 2);
        assert!(payload.payments.is_none());
    }

    #[test]
    fn test_order_create_deserialize_missing_items() {
        // Missing items deserializes to an empty list; validation catches it
        let json = r#"{"user_id": 1}"#;
        let payload: OrderCreate = serde_json::from_str(json).unwrap();
        assert!(payload.items.is_empty());
    }

    #[test]
    fn test_order_detail_flattens_order() {
        let detail = OrderDetail {
            order: Order {
                id: 10,
                user_id: 1,
                order_date: 1_700_000_000_000,
                subtotal_amount: Decimal::new(2500, 2),
                shipping_fee: Decimal::new(500, 2),
                final_amount: Decimal::new(3000, 2),
                shipping_address: "1 Main St".to_string(),
                shipping_method: "STANDARD".to_string(),
                status: OrderStatus::Pending,
                created_at: 1_700_000_000_000,
                updated_at: 1_700_000_000_000,
            },
            items: vec![],
            payments: vec![],
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], 10);
        assert_eq!(json["status"], "PENDING");
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
