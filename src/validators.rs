/// Input validators
///
/// Every controller requires its fields to be present and non-blank after
/// trimming. A few fields carry an additional format rule (email, phone).
/// Validators return the normalized value so handlers never store raw input.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^.+@.+\..+$").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"^\d{10}$").unwrap();
}

/// Require a present, non-blank field and return it trimmed
pub fn required(field: &str, value: Option<&str>) -> Result<String, ValidationError> {
    let trimmed = value.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Like [`required`] but lower-cases the result
pub fn required_lowercase(field: &str, value: Option<&str>) -> Result<String, ValidationError> {
    required(field, value).map(|v| v.to_lowercase())
}

/// Require a present value for non-string fields
pub fn required_value<T>(field: &str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::EmptyField(field.to_string()))
}

pub fn valid_email(value: Option<&str>) -> Result<String, ValidationError> {
    let email = required("email", value)?;

    if !EMAIL_REGEX.is_match(&email) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(email)
}

/// Phone numbers are exactly ten ASCII digits
pub fn valid_phone(value: Option<&str>) -> Result<String, ValidationError> {
    let phone = required("phone", value)?;

    if !PHONE_REGEX.is_match(&phone) {
        return Err(ValidationError::InvalidFormat("phone".to_string()));
    }

    Ok(phone)
}

/// URL-friendly form of a display name
///
/// Lower-cases, turns whitespace runs into a single `-` and drops every
/// character that is not ASCII alphanumeric, `-` or `_`.
pub fn slugify(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
