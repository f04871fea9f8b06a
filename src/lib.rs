//! Microblog data layer
//!
//! User accounts and microposts with validation and persistence:
//! - Field validation for names, emails, passwords and post content
//! - Argon2 digests for passwords and remember tokens
//! - Case-insensitive email uniqueness with lowercase normalization
//! - In-memory and PostgreSQL repositories
//! - Cascading removal of a user's microposts on delete

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{DomainError, Micropost, MicropostId, User, UserId};
pub use infrastructure::micropost::{
    InMemoryMicropostRepository, MicropostService, NewMicropostRequest,
    PostgresMicropostRepository,
};
pub use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, RegisterUserRequest,
    UpdatePasswordRequest, UpdateProfileRequest, UserService,
};
