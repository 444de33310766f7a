//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! in the handlers before anything hits the store.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity titles: category, menu item
pub const MAX_TITLE_LEN: usize = 200;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 100;
pub const MIN_USERNAME_LEN: usize = 3;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_PASSWORD_LEN: usize = 8;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

/// Validate an optional string against the length limit when present.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_required_text(v, field, max_len),
        None => Ok(()),
    }
}

/// Validate a username: length bounds, no surrounding whitespace.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    validate_required_text(username, "username", MAX_USERNAME_LEN)?;
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AppError::validation(format!(
            "username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    if username.trim() != username {
        return Err(AppError::validation(
            "username must not start or end with whitespace",
        ));
    }
    Ok(())
}

/// Minimal email shape check: one '@' with text on both sides.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::validation("email is not a valid address"));
    }
    Ok(())
}

/// Validate a raw password before hashing.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
