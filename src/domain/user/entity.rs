//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable user identifier, generated server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
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

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User record
///
/// The email is held in its normalized (lowercase) form; the service layer
/// normalizes before construction and on every email change. Credential
/// digests never leave the record through serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    id: UserId,
    /// Display name
    name: String,
    /// Normalized email address, unique case-insensitively
    email: String,
    /// Argon2 digest of the password - never exposed in serialization
    #[serde(skip_serializing)]
    password_digest: String,
    /// Argon2 digest of the current remember token, if one was issued
    #[serde(skip_serializing)]
    remember_digest: Option<String>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        password_digest: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            name: name.into(),
            email: email.into(),
            password_digest: password_digest.into(),
            remember_digest: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reassemble a persisted record from storage columns
    pub fn from_parts(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        password_digest: impl Into<String>,
        remember_digest: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password_digest: password_digest.into(),
            remember_digest,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }

    pub fn remember_digest(&self) -> Option<&str> {
        self.remember_digest.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Update the display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Update the email address; callers pass the normalized form
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.touch();
    }

    /// Update the password digest
    pub fn set_password_digest(&mut self, password_digest: impl Into<String>) {
        self.password_digest = password_digest.into();
        self.touch();
    }

    /// Store the digest of a newly issued remember token
    pub fn set_remember_digest(&mut self, remember_digest: impl Into<String>) {
        self.remember_digest = Some(remember_digest.into());
        self.touch();
    }

    /// Drop the remember digest, revoking any outstanding token
    pub fn clear_remember_digest(&mut self) {
        self.remember_digest = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
