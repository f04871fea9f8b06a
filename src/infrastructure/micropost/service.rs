//! Micropost service for creating and querying posts

use std::sync::Arc;

use tracing::info;

use crate::domain::micropost::{
    validate_content, Micropost, MicropostId, MicropostRepository,
};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;

/// Request for creating a new micropost
#[derive(Debug, Clone)]
pub struct NewMicropostRequest {
    pub user_id: UserId,
    pub content: String,
}

/// Micropost service
///
/// Every post must belong to an existing user.
#[derive(Debug)]
pub struct MicropostService<M: MicropostRepository, R: UserRepository> {
    microposts: Arc<M>,
    users: Arc<R>,
}

impl<M: MicropostRepository, R: UserRepository> MicropostService<M, R> {
    /// Create a new micropost service
    pub fn new(microposts: Arc<M>, users: Arc<R>) -> Self {
        Self { microposts, users }
    }

    /// Create a new micropost for a user
    pub async fn create(&self, request: NewMicropostRequest) -> Result<Micropost, DomainError> {
        info!(user_id = %request.user_id, "Creating micropost");

        validate_content(&request.content)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if !self.users.exists(&request.user_id).await? {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                request.user_id
            )));
        }

        let micropost = Micropost::new(MicropostId::random(), request.user_id, request.content);

        self.microposts.create(micropost).await
    }

    /// Get a micropost by ID
    pub async fn get(&self, id: &MicropostId) -> Result<Option<Micropost>, DomainError> {
        self.microposts.get(id).await
    }

    /// Delete a micropost by ID, returning whether it existed
    pub async fn delete(&self, id: &MicropostId) -> Result<bool, DomainError> {
        info!(id = %id, "Deleting micropost");

        self.microposts.delete(id).await
    }

    /// List a user's microposts, newest first
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Micropost>, DomainError> {
        self.microposts.list_for_user(user_id).await
    }

    /// Count all microposts
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.microposts.count().await
    }

    /// Count a single user's microposts
    pub async fn count_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        self.microposts.count_for_user(user_id).await
    }
}
