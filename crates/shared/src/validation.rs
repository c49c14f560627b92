//! Common validation utilities.

use validator::{ValidateEmail, ValidateUrl, ValidationError};

/// Validates an email address, accepting an empty string as "not set".
pub fn validate_email_or_blank(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        let mut err = ValidationError::new("email");
        err.message = Some("Enter a valid email address".into());
        Err(err)
    }
}

/// Validates an absolute URL, accepting an empty string as "not set".
pub fn validate_url_or_blank(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        Ok(())
    } else {
        let mut err = ValidationError::new("url");
        err.message = Some("Enter a valid URL".into());
        Err(err)
    }
}

/// Validates that `value` is one of `choices`.
pub fn validate_choice(value: &str, choices: &[&str]) -> Result<(), ValidationError> {
    if choices.contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_choice");
        err.message = Some(format!("\"{}\" is not a valid choice", value).into());
        Err(err)
    }
}
