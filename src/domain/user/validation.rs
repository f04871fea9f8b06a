//! User validation rules

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Name cannot be blank")]
    BlankName,

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Email cannot be blank")]
    BlankEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email is not a valid address")]
    InvalidEmailFormat,

    #[error("Password cannot be blank")]
    BlankPassword,

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("Password confirmation does not match")]
    PasswordConfirmationMismatch,
}

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 255;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Address grammar: word characters, `+`, `-`, or `.` in the local part, then
/// dot-separated domain labels of letters, digits, or hyphens, ending in an
/// alphabetic top-level label. Consecutive dots never match.
static EMAIL_FORMAT: Lazy<Regex> = Lazy::new(|| {
    let pattern = r"(?i)^[\w+\-.]+@[a-z\d\-]+(\.[a-z\d\-]+)*\.[a-z]+$";
    Regex::new(pattern)
        .unwrap_or_else(|error| panic!("email format regex failed to compile: {error}"))
});

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate a user's display name
///
/// Rules:
/// - Cannot be blank
/// - Maximum 50 characters
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    if is_blank(name) {
        return Err(UserValidationError::BlankName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address
///
/// Rules:
/// - Cannot be blank
/// - Maximum 255 characters, domain included
/// - Must match the address grammar
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if is_blank(email) {
        return Err(UserValidationError::BlankEmail);
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_FORMAT.is_match(email) {
        return Err(UserValidationError::InvalidEmailFormat);
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Cannot be blank (whitespace-only counts as blank)
/// - Minimum 6 characters
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if is_blank(password) {
        return Err(UserValidationError::BlankPassword);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Validate that the confirmation field repeats the password exactly
pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), UserValidationError> {
    if password != confirmation {
        return Err(UserValidationError::PasswordConfirmationMismatch);
    }

    Ok(())
}

/// Canonical stored form of an email address
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}
