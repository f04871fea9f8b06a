//! Domain layer - Core business logic and entities

pub mod error;
pub mod micropost;
pub mod user;

pub use error::DomainError;
pub use micropost::{
    validate_content, Micropost, MicropostId, MicropostRepository, MicropostValidationError,
    MAX_CONTENT_LENGTH,
};
pub use user::{
    normalize_email, validate_email, validate_name, validate_password,
    validate_password_confirmation, User, UserId, UserRepository, UserValidationError,
    MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
