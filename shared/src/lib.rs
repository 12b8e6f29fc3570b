//! Shared types for the storefront platform
//!
//! Common types used across server crates: error codes and the unified
//! API response envelope, domain models, and ID/timestamp helpers.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
