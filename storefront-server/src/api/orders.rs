//! Order endpoints: create, list, detail, per-user history, status transitions

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::{OrderCreate, OrderDetail, OrderStatus, OrderSummary};

use crate::auth::Identity;
use crate::state::AppState;

use super::ApiResult;

/// POST /api/orders
///
/// Customers may only create orders for themselves; admins for anyone.
/// A missing `user_id` falls through to field validation.
pub async fn create_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<OrderCreate>,
) -> ApiResult<OrderDetail> {
    if let Some(user_id) = payload.user_id {
        identity.require_admin_or_self(user_id)?;
    }

    let detail = state.orders.create_order(payload).await?;
    Ok(Json(detail))
}

/// GET /api/orders
#[derive(Deserialize)]
pub struct OrdersQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<Vec<OrderSummary>> {
    identity.require_admin()?;

    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = i64::from(page - 1) * i64::from(per_page);

    let orders = state.orders.list_orders(per_page, offset).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(order_id): Path<i64>,
) -> ApiResult<OrderDetail> {
    identity.require_admin()?;

    let detail = state.orders.get_order(order_id).await?;
    Ok(Json(detail))
}

/// GET /api/users/:user_id/orders
pub async fn list_user_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<i64>,
) -> ApiResult<Vec<OrderDetail>> {
    identity.require_admin_or_self(user_id)?;

    let orders = state.orders.orders_for_user(user_id).await?;
    Ok(Json(orders))
}

/// PUT /api/orders/:id/status
#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(order_id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> ApiResult<ApiResponse<()>> {
    identity.require_admin()?;

    state.orders.update_status(order_id, payload.status).await?;
    Ok(Json(ApiResponse::ok()))
}
