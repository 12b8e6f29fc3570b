//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Postgres TEXT has no built-in length enforcement, so limits are
//! applied here before anything reaches the database.

use shared::error::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Shipping method, payment method and other short labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Shipping addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Unwrap a required field, or fail with a field-tagged validation error.
pub fn require_field<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::validation_field(format!("{field} is required"), field))
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation_field(
            format!("{field} must not be empty"),
            field,
        ));
    }
    if value.len() > max_len {
        return Err(AppError::validation_field(
            format!("{field} is too long ({} chars, max {max_len})", value.len()),
            field,
        ));
    }
    Ok(())
}

/// Validate that a line-item quantity is strictly positive.
pub fn validate_positive_quantity(quantity: i64, field: &str) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::validation_field(
            format!("{field} must be positive (got {quantity})"),
            field,
        ));
    }
    Ok(())
}

/// Validate a report date range: start must not be after end.
pub fn validate_date_range(start: i64, end: i64) -> Result<(), AppError> {
    if start > end {
        return Err(AppError::validation(format!(
            "start_date ({start}) must not be after end_date ({end})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_require_field() {
        assert_eq!(require_field(Some(5), "user_id").unwrap(), 5);

        let err = require_field::<i64>(None, "user_id").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "user_id");
    }

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("1 Main St", "shipping_address", MAX_ADDRESS_LEN).is_ok());
        assert!(validate_required_text("", "shipping_address", MAX_ADDRESS_LEN).is_err());
        assert!(validate_required_text("   ", "shipping_address", MAX_ADDRESS_LEN).is_err());

        let long = "x".repeat(MAX_ADDRESS_LEN + 1);
        let err = validate_required_text(&long, "shipping_address", MAX_ADDRESS_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_validate_positive_quantity() {
        assert!(validate_positive_quantity(1, "quantity").is_ok());
        assert!(validate_positive_quantity(0, "quantity").is_err());
        assert!(validate_positive_quantity(-3, "quantity").is_err());
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(100, 200).is_ok());
        assert!(validate_date_range(200, 200).is_ok());

        let err = validate_date_range(201, 200).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
