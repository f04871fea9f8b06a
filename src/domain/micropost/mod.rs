//! Micropost domain: entity, validation rules and repository trait

mod entity;
mod repository;
mod validation;

pub use entity::{Micropost, MicropostId};
#[cfg(test)]
pub use repository::MockMicropostRepository;
pub use repository::MicropostRepository;
pub use validation::{validate_content, MicropostValidationError, MAX_CONTENT_LENGTH};
