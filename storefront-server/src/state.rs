//! Application state for storefront-server

use std::sync::Arc;

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::email::{Mailer, SesMailer};
use crate::orders::OrderService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Order management service
    pub orders: OrderService,
    /// JWT secret for request authentication
    pub jwt_secret: String,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };

        let mailer: Arc<dyn Mailer> = Arc::new(SesMailer::new(ses, config.ses_from_email.clone()));
        let orders = OrderService::new(pool, mailer);

        Ok(Self {
            orders,
            jwt_secret: config.jwt_secret.clone(),
        })
    }
}
