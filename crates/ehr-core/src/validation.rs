//! Input validation
//!
//! Validation runs before any network call. A failed check produces a
//! `ValidationError` whose message is shown inline on the form.

use serde::{Deserialize, Serialize};

/// Validation error with detailed context
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: ValidationErrorCode,
}

/// Specific validation error codes for programmatic handling
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidationErrorCode {
    Required,
    InvalidFormat,
    TooShort,
}

impl ValidationError {
    pub fn new(field: &str, message: &str, code: ValidationErrorCode) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.to_string(),
            code,
        }
    }
}

/// Validation result that can accumulate multiple errors
#[derive(Clone, Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add_error(&mut self, field: &str, message: &str, code: ValidationErrorCode) {
        self.errors.push(ValidationError::new(field, message, code));
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// Forms surface a single message, so only the first error is kept.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// True when the value has at least one non-whitespace character
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Check an email address has the shape `local@domain.tld`
///
/// - no whitespace anywhere
/// - exactly one `@`, with a non-empty local part
/// - a `.` inside the domain with characters on both sides
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty() {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Validate that every named field is present
pub fn validate_required(fields: &[(&str, &str)], message: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some((field, _)) = fields.iter().find(|(_, value)| !is_present(value)) {
        result.add_error(field, message, ValidationErrorCode::Required);
    }

    result
}

/// Validate an email field
pub fn validate_email(email: &str, field_name: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !is_valid_email(email) {
        result.add_error(
            field_name,
            "Please enter a valid email address",
            ValidationErrorCode::InvalidFormat,
        );
    }

    result
}
