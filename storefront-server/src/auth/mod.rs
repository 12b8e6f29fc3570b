//! JWT authentication for the storefront API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::UserRole;

use crate::state::AppState;

/// JWT claims for API authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: i64,
    /// User role
    pub role: UserRole,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated identity extracted from JWT
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub role: UserRole,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admin-only operations (listing, detail lookup, status updates, reports)
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::AdminRequired))
        }
    }

    /// Operations a customer may perform on their own data, admins on anyone's
    pub fn require_admin_or_self(&self, user_id: i64) -> Result<(), AppError> {
        if self.is_admin() || self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::forbidden("Access restricted to your own account"))
        }
    }
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a user
pub fn create_token(
    user_id: i64,
    role: UserRole,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id,
        role,
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware that extracts and verifies the JWT from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid or malformed token"),
        }
    })?;

    let identity = Identity {
        user_id: token_data.claims.sub,
        role: token_data.claims.role,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let token = create_token(7, UserRole::Admin, "test-secret").unwrap();

        let data = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, 7);
        assert_eq!(data.claims.role, UserRole::Admin);
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = create_token(7, UserRole::Customer, "secret-a").unwrap();

        let result = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: UserRole::Customer,
            exp: (now - 7200) as usize,
            iat: (now - 10800) as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn test_require_admin() {
        let admin = Identity {
            user_id: 1,
            role: UserRole::Admin,
        };
        let customer = Identity {
            user_id: 2,
            role: UserRole::Customer,
        };

        assert!(admin.require_admin().is_ok());
        let err = customer.require_admin().unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
    }

    #[test]
    fn test_require_admin_or_self() {
        let admin = Identity {
            user_id: 1,
            role: UserRole::Admin,
        };
        let customer = Identity {
            user_id: 2,
            role: UserRole::Customer,
        };

        // Admin may act on anyone
        assert!(admin.require_admin_or_self(99).is_ok());
        // Customer may act on themselves only
        assert!(customer.require_admin_or_self(2).is_ok());
        let err = customer.require_admin_or_self(3).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
