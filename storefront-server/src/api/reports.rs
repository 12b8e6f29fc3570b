//! Reporting endpoints: revenue summary, best-selling products

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::auth::Identity;
use crate::orders::{BestSellingProduct, RevenueReport};
use crate::state::AppState;
use crate::utils::validation::require_field;

use super::ApiResult;

/// GET /api/reports/revenue
#[derive(Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}

pub async fn revenue(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<RevenueReport> {
    identity.require_admin()?;

    let start = require_field(query.start_date, "start_date")?;
    let end = require_field(query.end_date, "end_date")?;

    let report = state.orders.revenue_report(start, end).await?;
    Ok(Json(report))
}

/// GET /api/reports/best-sellers
#[derive(Deserialize)]
pub struct BestSellersQuery {
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub limit: Option<i32>,
}

pub async fn best_sellers(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<BestSellersQuery>,
) -> ApiResult<Vec<BestSellingProduct>> {
    identity.require_admin()?;

    let start = require_field(query.start_date, "start_date")?;
    let end = require_field(query.end_date, "end_date")?;
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let products = state.orders.best_selling_products(start, end, limit).await?;
    Ok(Json(products))
}
