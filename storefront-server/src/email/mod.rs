//! Order confirmation email
//!
//! Delivery goes through the [`Mailer`] trait so the service layer can
//! be exercised without AWS credentials; production wires in SES.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderItem, User};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outbound mail delivery seam
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError>;
}

/// AWS SES delivery
pub struct SesMailer {
    ses: SesClient,
    from: String,
}

impl SesMailer {
    pub fn new(ses: SesClient, from: String) -> Self {
        Self { ses, from }
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError> {
        let subject = Content::builder().data(subject).build()?;

        let body = Body::builder()
            .text(Content::builder().data(body).build()?)
            .build();

        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;

        Ok(())
    }
}

/// Format a money amount as "#,##0.00": two decimals, comma thousands
/// separators.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let raw = rounded.abs().to_string();
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i.to_string(), format!("{f:0<2}")),
        None => (raw, "00".to_string()),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}

/// Format a unix-millis timestamp as "dd/MM/yyyy HH:mm" (UTC)
pub fn format_order_date(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_default()
}

/// Render the plain-text confirmation body from order, line items and
/// resolved product names. Items without a product reference render as
/// "Custom item".
pub fn order_confirmation_body(
    order: &Order,
    items: &[OrderItem],
    product_names: &HashMap<i64, String>,
    user: &User,
) -> String {
    let mut lines = String::new();
    for item in items {
        let name = item
            .product_id
            .and_then(|id| product_names.get(&id))
            .map(String::as_str)
            .unwrap_or("Custom item");
        let line_subtotal = item.final_price * Decimal::from(item.quantity);
        lines.push_str(&format!(
            "  {} x{} @ {} = {}\n",
            name,
            item.quantity,
            format_amount(item.final_price),
            format_amount(line_subtotal),
        ));
    }

    format!(
        "Hello {customer},\n\n\
         Thank you for your order placed on {date}.\n\n\
         Items:\n\
         {lines}\n\
         Shipping address: {address}\n\
         Shipping method: {method}\n\n\
         Subtotal: {subtotal}\n\
         Shipping fee: {fee}\n\
         Total: {total}\n",
        customer = user.name,
        date = format_order_date(order.order_date),
        lines = lines,
        address = order.shipping_address,
        method = order.shipping_method,
        subtotal = format_amount(order.subtotal_amount),
        fee = format_amount(order.shipping_fee),
        total = format_amount(order.final_amount),
    )
}

/// Render and send the confirmation for a freshly created order.
pub async fn send_order_confirmation(
    mailer: &dyn Mailer,
    order: &Order,
    items: &[OrderItem],
    product_names: &HashMap<i64, String>,
    user: &User,
) -> AppResult<()> {
    let subject = format!("Order confirmation #{}", order.id);
    let body = order_confirmation_body(order, items, product_names, user);

    mailer
        .send(&user.email, &subject, &body)
        .await
        .map_err(|e| AppError::with_message(ErrorCode::NotificationFailed, e.to_string()))?;

    tracing::info!(to = %user.email, order_id = order.id, "Order confirmation sent");
    Ok(())
}
