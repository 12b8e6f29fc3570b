//! API routes for storefront-server

pub mod health;
pub mod orders;
pub mod reports;

use axum::routing::{get, post, put};
use axum::{Router, middleware};
use shared::error::AppError;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Order management and reporting (JWT authenticated)
    let protected = Router::new()
        .route(
            "/api/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route("/api/orders/{id}", get(orders::get_order))
        .route("/api/orders/{id}/status", put(orders::update_order_status))
        .route("/api/users/{user_id}/orders", get(orders::list_user_orders))
        .route("/api/reports/revenue", get(reports::revenue))
        .route("/api/reports/best-sellers", get(reports::best_sellers))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
