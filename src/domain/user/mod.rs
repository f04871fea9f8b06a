//! User domain
//!
//! This module provides domain types for user records: the entity, the
//! attribute validation rules, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{
    normalize_email, validate_email, validate_name, validate_password,
    validate_password_confirmation, UserValidationError, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH,
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
