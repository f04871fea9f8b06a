//! Micropost infrastructure module
//!
//! In-memory and PostgreSQL repositories plus the micropost service.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresMicropostRepository;
pub use repository::InMemoryMicropostRepository;
pub use service::{MicropostService, NewMicropostRequest};
