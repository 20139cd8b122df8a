//! Input validation helpers
//!
//! Text length limits shared by the category and product handlers.
//! SQLite TEXT has no built-in length enforcement.

use super::AppError;
use shared::ErrorCode;
use shared::util::{MAX_SLUG_LEN, is_valid_slug};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: category, product
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Free-text search queries
pub const MAX_QUERY_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        ));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Validate an explicitly supplied slug.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if !is_valid_slug(slug) {
        return Err(AppError::with_message(
            ErrorCode::InvalidSlug,
            format!(
                "Invalid slug '{slug}': use lowercase letters, digits and single hyphens (max {MAX_SLUG_LEN})"
            ),
        )
        .with_detail("slug", slug));
    }
    Ok(())
}

/// Validate a price: finite and non-negative.
pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("Invalid price: {price}"),
        ));
    }
    Ok(())
}
