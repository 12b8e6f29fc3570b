//! Unified service-layer error type
//!
//! `ServiceError` bridges the gap between DB-layer errors (`sqlx::Error`, `BoxError`)
//! and the API-layer error (`AppError`). It enables `?` propagation without manual
//! `.map_err(|e| { tracing::error!(...); AppError::new(...) })` boilerplate.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer errors
///
/// - `Db`: database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (pass-through to the client)
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Db(BoxError),

    #[error("{0}")]
    App(#[from] AppError),
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_passes_through() {
        let err = ServiceError::App(AppError::new(ErrorCode::OrderNotFound));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::OrderNotFound);
    }

    #[test]
    fn test_db_error_maps_to_internal() {
        let boxed: BoxError = "connection reset".into();
        let err = ServiceError::Db(boxed);
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InternalError);
    }
}
