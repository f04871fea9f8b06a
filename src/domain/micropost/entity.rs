//! Micropost entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Stable micropost identifier, generated server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MicropostId(Uuid);

impl MicropostId {
    /// Generate a fresh random identifier
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for MicropostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A short user-authored content record, owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Micropost {
    /// Unique identifier for the micropost
    id: MicropostId,
    /// The authoring user
    user_id: UserId,
    /// Post body, at most 140 characters
    content: String,
    /// Creation timestamp; user feeds sort on this, newest first
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Micropost {
    /// Create a new micropost record
    pub fn new(id: MicropostId, user_id: UserId, content: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id,
            user_id,
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reassemble a persisted record from storage columns
    pub fn from_parts(
        id: MicropostId,
        user_id: UserId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            content: content.into(),
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &MicropostId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
