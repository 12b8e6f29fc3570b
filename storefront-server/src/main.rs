//! storefront-server — Order management service
//!
//! Long-running service that:
//! - Accepts customer orders (line items + payments, one transaction)
//! - Drives the order status lifecycle (stock debit on completion)
//! - Serves revenue and best-seller reports (JWT authenticated)
//! - Sends order confirmation emails via SES

mod api;
mod auth;
mod config;
mod db;
mod email;
mod error;
mod orders;
mod state;
mod utils;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting storefront-server (env: {})", config.environment);

    // Local convenience: mint a token for the seeded admin (user 1)
    if config.environment == "development" {
        match auth::create_token(1, shared::models::UserRole::Admin, &config.jwt_secret) {
            Ok(token) => tracing::info!("Development admin token: {token}"),
            Err(e) => tracing::warn!("Could not mint development token: {e}"),
        }
    }

    // Initialize application state (pool, migrations, SES)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("storefront-server listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
