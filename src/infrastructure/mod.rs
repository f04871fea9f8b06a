//! Infrastructure layer - Storage, service and logging implementations

pub mod database;
pub mod logging;
pub mod micropost;
pub mod migrations;
pub mod user;
