//! Unified error handling system
//!
//! This module provides a centralized error handling system with:
//! - Numeric error codes organized by category
//! - Structured error types with optional details
//! - HTTP status code mapping
//! - Unified API response format
//!
//! # Error Code Ranges
//!
//! - `0`: Success
//! - `1-999`: General errors
//! - `1000-1999`: Authentication errors
//! - `2000-2999`: Permission errors
//! - `3000-3999`: User errors
//! - `4000-4999`: Order errors
//! - `5000-5999`: Payment errors
//! - `6000-6999`: Product and stock errors
//! - `9000+`: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 42 not found")
//!     .with_detail("order_id", 42);
//! assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
