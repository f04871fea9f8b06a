//! Validation rules for micropost content

use thiserror::Error;

/// Maximum micropost content length, in characters
pub const MAX_CONTENT_LENGTH: usize = 140;

/// Micropost validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MicropostValidationError {
    #[error("Content cannot be blank")]
    BlankContent,

    #[error("Content exceeds maximum length of {0} characters")]
    ContentTooLong(usize),
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate micropost content presence and length
pub fn validate_content(content: &str) -> Result<(), MicropostValidationError> {
    if is_blank(content) {
        return Err(MicropostValidationError::BlankContent);
    }

    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(MicropostValidationError::ContentTooLong(MAX_CONTENT_LENGTH));
    }

    Ok(())
}
