//! Micropost repository trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::error::DomainError;
use crate::domain::micropost::{Micropost, MicropostId};
use crate::domain::user::UserId;

/// Storage abstraction for micropost records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MicropostRepository: Send + Sync {
    /// Fetch a micropost by id, or `None` if it does not exist
    async fn get(&self, id: &MicropostId) -> Result<Option<Micropost>, DomainError>;

    /// Persist a new micropost
    async fn create(&self, micropost: Micropost) -> Result<Micropost, DomainError>;

    /// Delete a micropost by id, returning whether a record was removed
    async fn delete(&self, id: &MicropostId) -> Result<bool, DomainError>;

    /// List a user's microposts, newest first
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Micropost>, DomainError>;

    /// Count all microposts
    async fn count(&self) -> Result<usize, DomainError>;

    /// Count a single user's microposts
    async fn count_for_user(&self, user_id: &UserId) -> Result<usize, DomainError>;

    /// Delete every micropost owned by a user, returning how many were removed
    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, DomainError>;
}
