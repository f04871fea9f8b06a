//! In-memory micropost repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::micropost::{Micropost, MicropostId, MicropostRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of MicropostRepository
#[derive(Debug, Default)]
pub struct InMemoryMicropostRepository {
    posts: Arc<RwLock<HashMap<Uuid, Micropost>>>,
}

impl InMemoryMicropostRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MicropostRepository for InMemoryMicropostRepository {
    async fn get(&self, id: &MicropostId) -> Result<Option<Micropost>, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts.get(id.as_uuid()).cloned())
    }

    async fn create(&self, micropost: Micropost) -> Result<Micropost, DomainError> {
        let mut posts = self.posts.write().await;

        let id = *micropost.id().as_uuid();

        if posts.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Micropost with ID '{}' already exists",
                id
            )));
        }

        posts.insert(id, micropost.clone());

        Ok(micropost)
    }

    async fn delete(&self, id: &MicropostId) -> Result<bool, DomainError> {
        let mut posts = self.posts.write().await;
        Ok(posts.remove(id.as_uuid()).is_some())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Micropost>, DomainError> {
        let posts = self.posts.read().await;

        let mut result: Vec<Micropost> = posts
            .values()
            .filter(|p| p.user_id() == user_id)
            .cloned()
            .collect();

        // Newest first
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(result)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts.len())
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts.values().filter(|p| p.user_id() == user_id).count())
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let mut posts = self.posts.write().await;

        let before = posts.len();
        posts.retain(|_, p| p.user_id() != user_id);

        Ok(before - posts.len())
    }
}
