//! Character-class patterns used by input validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DomainError, DomainResult};

/// Letters plus a few name punctuation marks, 2 to 50 characters.
pub static PERSON_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s'_.-]{2,50}$").expect("person name pattern"));

/// Free text: alphanumerics and common punctuation, 1 to 250 characters.
pub static GENERIC_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s'_.@$#,:/-]{1,250}$").expect("generic text pattern"));

/// MIME type such as `image/png` or `application/vnd.ms-excel`.
pub static MIME_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9!#$&^_.+-]+/[a-zA-Z0-9!#$&^_.+-]+$").expect("mime type pattern")
});

/// Check an optional field against a pattern; absent fields pass.
pub fn check_optional(field: &str, value: Option<&str>, pattern: &Regex) -> DomainResult<()> {
    match value {
        Some(v) if !pattern.is_match(v) => {
            Err(DomainError::invalid_field(field, "contains unsupported characters"))
        }
        _ => Ok(()),
    }
}

/// Check a required field: must be non-blank and match the pattern.
pub fn check_required(field: &str, value: &str, pattern: &Regex) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid_field(field, "is required"));
    }
    check_optional(field, Some(value), pattern)
}
