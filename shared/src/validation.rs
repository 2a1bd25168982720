//! Field-level validation shared by the client forms and the server.
//!
//! The client runs these checks before submitting (the equivalent of a
//! disabled submit button) and the server runs them again on every write.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Why a request body was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Implemented by every create/patch input.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub const MAX_TEXT_LEN: usize = 256;
pub const MAX_CONTENT_LEN: usize = 20_000;

/// A required single-line text field.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::invalid(
            field,
            format!("cannot exceed {} characters", MAX_TEXT_LEN),
        ));
    }
    Ok(())
}

/// Patch variant of [`require_text`]: absent is fine, present must be valid.
pub fn optional_text(field: &'static str, value: Option<&String>) -> Result<(), ValidationError> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

pub fn optional_content(field: &'static str, value: Option<&String>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > MAX_CONTENT_LEN => Err(ValidationError::invalid(
            field,
            format!("cannot exceed {} characters", MAX_CONTENT_LEN),
        )),
        _ => Ok(()),
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (a browser datetime-local value)
/// and a bare `YYYY-MM-DD`.
pub fn is_timestamp(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
        || is_date(value)
}

pub fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

pub fn require_timestamp(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    if !is_timestamp(value) {
        return Err(ValidationError::invalid(field, "must be a valid date or timestamp"));
    }
    Ok(())
}

pub fn optional_timestamp(field: &'static str, value: Option<&String>) -> Result<(), ValidationError> {
    match value {
        Some(v) => require_timestamp(field, v),
        None => Ok(()),
    }
}

pub fn require_date(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    if !is_date(value) {
        return Err(ValidationError::invalid(field, "must be in YYYY-MM-DD format"));
    }
    Ok(())
}

pub fn optional_date(field: &'static str, value: Option<&String>) -> Result<(), ValidationError> {
    match value {
        Some(v) => require_date(field, v),
        None => Ok(()),
    }
}

pub fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::invalid(field, "must be a positive number"));
    }
    Ok(())
}

pub fn optional_positive(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) => require_positive(field, v),
        None => Ok(()),
    }
}

/// Empty optional text is stored as absent.
pub fn normalize_optional(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("title", "  "), Err(ValidationError::Required("title")));
        assert!(require_text("title", "First kick").is_ok());
        let long = "a".repeat(MAX_TEXT_LEN + 1);
        assert!(matches!(
            require_text("title", &long),
            Err(ValidationError::Invalid { field: "title", .. })
        ));
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(is_timestamp("2025-03-01T08:30:00Z"));
        assert!(is_timestamp("2025-03-01T08:30:00+08:00"));
        assert!(is_timestamp("2025-03-01T08:30"));
        assert!(is_timestamp("2025-03-01"));
        assert!(!is_timestamp("yesterday"));
        assert!(!is_timestamp("2025-13-01"));
    }

    #[test]
    fn test_positive_numbers() {
        assert!(require_positive("amount_ml", 120.0).is_ok());
        assert!(require_positive("amount_ml", 0.0).is_err());
        assert!(require_positive("amount_ml", f64::NAN).is_err());
        assert!(optional_positive("amount_ml", None).is_ok());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some(&"  ".to_string())), None);
        assert_eq!(normalize_optional(Some(&" ok ".to_string())), Some("ok".to_string()));
        assert_eq!(normalize_optional(None), None);
    }
}
