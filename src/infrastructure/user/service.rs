//! User service for registration, authentication and account management

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use tracing::info;

use crate::domain::micropost::MicropostRepository;
use crate::domain::user::{
    normalize_email, validate_email, validate_name, validate_password,
    validate_password_confirmation, User, UserId, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Number of random bytes in a remember token
const REMEMBER_TOKEN_BYTES: usize = 16;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterUserRequest {
    /// Check every field against the user validation rules
    ///
    /// Field checks run in order: name, email, password, confirmation.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(&self.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&self.password).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password_confirmation(&self.password, &self.password_confirmation)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        Ok(())
    }
}

/// Request for updating a user's profile fields
#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Request for updating a user's password
#[derive(Debug, Clone)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

/// User service for registration and account management
///
/// Deleting a user also deletes every micropost the user owns.
#[derive(Debug)]
pub struct UserService<R: UserRepository, M: MicropostRepository, H: PasswordHasher> {
    users: Arc<R>,
    microposts: Arc<M>,
    hasher: Arc<H>,
}

impl<R: UserRepository, M: MicropostRepository, H: PasswordHasher> UserService<R, M, H> {
    /// Create a new user service
    pub fn new(users: Arc<R>, microposts: Arc<M>, hasher: Arc<H>) -> Self {
        Self {
            users,
            microposts,
            hasher,
        }
    }

    /// Register a new user
    ///
    /// The email is lowercased before it is stored, so later lookups see
    /// the normalized form.
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        info!(email = %request.email, "Registering user");

        request.validate()?;

        let email = normalize_email(&request.email);

        // Check first for a friendly error; the repository enforces
        // uniqueness again on insert
        if self.users.email_taken(&email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already taken",
                email
            )));
        }

        let password_digest = self.hasher.digest(&request.password)?;

        let user = User::new(UserId::random(), &request.name, email, password_digest);

        self.users.create(user).await
    }

    /// Get a user by ID
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.users.get(id).await
    }

    /// Get a user by email, matched case-insensitively
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.users.get_by_email(email).await
    }

    /// List all users, oldest first
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.users.list().await
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.users.count().await
    }

    /// Authenticate a user with email and password
    ///
    /// Returns `None` when the email is unknown or the password does not
    /// match the stored digest.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.users.get_by_email(email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password_digest()) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Issue a remember token for a user
    ///
    /// Stores a digest of the token and returns the plaintext token to
    /// the caller. Issuing a new token invalidates the previous one.
    pub async fn remember(&self, id: &UserId) -> Result<String, DomainError> {
        let mut user = self
            .users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        let token = new_remember_token();
        let digest = self.hasher.digest(&token)?;

        user.set_remember_digest(digest);
        self.users.update(&user).await?;

        Ok(token)
    }

    /// Check a remember token against a user's stored digest
    ///
    /// Returns false for any token, including the empty string, when the
    /// user has no remember digest stored.
    pub fn authenticated(&self, user: &User, token: &str) -> bool {
        match user.remember_digest() {
            Some(digest) => self.hasher.verify(token, digest),
            None => false,
        }
    }

    /// Discard a user's remember digest, invalidating outstanding tokens
    pub async fn forget(&self, id: &UserId) -> Result<User, DomainError> {
        let mut user = self
            .users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        user.clear_remember_digest();

        self.users.update(&user).await
    }

    /// Update a user's name and/or email
    pub async fn update_profile(
        &self,
        id: &UserId,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        info!(id = %id, "Updating user profile");

        let mut user = self
            .users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if let Some(name) = request.name {
            validate_name(&name).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_name(name);
        }

        if let Some(email) = request.email {
            validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;

            let email = normalize_email(&email);

            // Stored emails are already normalized, so an unchanged value
            // never conflicts with itself
            if email != user.email() && self.users.email_taken(&email).await? {
                return Err(DomainError::conflict(format!(
                    "Email '{}' is already taken",
                    email
                )));
            }

            user.set_email(email);
        }

        self.users.update(&user).await
    }

    /// Update a user's password
    pub async fn update_password(
        &self,
        id: &UserId,
        request: UpdatePasswordRequest,
    ) -> Result<User, DomainError> {
        info!(id = %id, "Updating user password");

        let mut user = self
            .users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if !self.hasher.verify(&request.current_password, user.password_digest()) {
            return Err(DomainError::validation("Current password is incorrect"));
        }

        validate_password(&request.new_password)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password_confirmation(&request.new_password, &request.new_password_confirmation)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let digest = self.hasher.digest(&request.new_password)?;
        user.set_password_digest(digest);

        self.users.update(&user).await
    }

    /// Delete a user along with all of the user's microposts
    ///
    /// Microposts are removed first so no orphaned posts remain if the
    /// second step fails. Returns whether the user existed.
    pub async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        info!(id = %id, "Deleting user");

        let removed = self.microposts.delete_for_user(id).await?;

        if removed > 0 {
            info!(id = %id, count = removed, "Removed dependent microposts");
        }

        self.users.delete(id).await
    }
}

/// Generate a random URL-safe remember token
fn new_remember_token() -> String {
    let mut bytes = [0u8; REMEMBER_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);

    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::micropost::{Micropost, MicropostId, MockMicropostRepository};
    use crate::infrastructure::micropost::InMemoryMicropostRepository;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service(
    ) -> UserService<InMemoryUserRepository, InMemoryMicropostRepository, Argon2Hasher> {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryMicropostRepository::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn valid_request() -> RegisterUserRequest {
        RegisterUserRequest {
            name: "Example User".to_string(),
            email: "user@example.com".to_string(),
            password: "foobar".to_string(),
            password_confirmation: "foobar".to_string(),
        }
    }

    #[test]
    fn test_request_validate_accepts_fixture() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_request_validate_accepts_valid_emails() {
        let valid_addresses = [
            "user@example.com",
            "USER@foo.COM",
            "A_US-ER@foo.bar.org",
            "first.last@foo.jp",
            "alice+bob@baz.cn",
        ];

        for address in valid_addresses {
            let mut request = valid_request();
            request.email = address.to_string();

            assert!(
                request.validate().is_ok(),
                "{} should be valid",
                address
            );
        }
    }

    #[test]
    fn test_request_validate_rejects_invalid_emails() {
        let invalid_addresses = [
            "user@example,com",
            "user_at_foo.org",
            "user.name@example.",
            "foo@bar_baz.com",
            "foo@bar+baz.com",
            "foo@bar..com",
        ];

        for address in invalid_addresses {
            let mut request = valid_request();
            request.email = address.to_string();

            assert!(
                request.validate().is_err(),
                "{} should be invalid",
                address
            );
        }
    }

    #[tokio::test]
    async fn test_register_user() {
        let service = create_service();

        let user = service.register(valid_request()).await.unwrap();

        assert_eq!(user.name(), "Example User");
        assert_eq!(user.email(), "user@example.com");
        assert_ne!(user.password_digest(), "foobar");
        assert!(user.remember_digest().is_none());

        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let service = create_service();

        let mut request = valid_request();
        request.name = "     ".to_string();

        let result = service.register(request).await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_register_rejects_long_name() {
        let service = create_service();

        let mut request = valid_request();
        request.name = "a".repeat(51);

        let result = service.register(request).await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_register_rejects_blank_email() {
        let service = create_service();

        let mut request = valid_request();
        request.email = "     ".to_string();

        let result = service.register(request).await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_register_rejects_long_email() {
        let service = create_service();

        let mut request = valid_request();
        request.email = format!("{}@example.com", "a".repeat(244));

        let result = service.register(request).await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let service = create_service();

        service.register(valid_request()).await.unwrap();

        let mut duplicate = valid_request();
        duplicate.name = "Other User".to_string();
        duplicate.email = "USER@example.COM".to_string();

        let result = service.register(duplicate).await;
        assert!(result.unwrap_err().is_conflict());
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let service = create_service();

        let mut request = valid_request();
        request.email = "Foo@ExAMPle.CoM".to_string();

        let user = service.register(request).await.unwrap();

        // Reload to observe the stored form
        let reloaded = service.get(user.id()).await.unwrap().unwrap();
        assert_eq!(reloaded.email(), "foo@example.com");
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let service = create_service();

        let mut request = valid_request();
        request.password = "a".repeat(5);
        request.password_confirmation = "a".repeat(5);

        let result = service.register(request).await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_register_rejects_blank_password() {
        let service = create_service();

        let mut request = valid_request();
        request.password = " ".repeat(6);
        request.password_confirmation = " ".repeat(6);

        let result = service.register(request).await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_register_rejects_mismatched_confirmation() {
        let service = create_service();

        let mut request = valid_request();
        request.password_confirmation = "barfoo".to_string();

        let result = service.register(request).await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let service = create_service();

        service.register(valid_request()).await.unwrap();

        let user = service
            .authenticate("user@example.com", "foobar")
            .await
            .unwrap();
        assert!(user.is_some());

        // Email lookup is case-insensitive
        let user = service
            .authenticate("USER@EXAMPLE.COM", "foobar")
            .await
            .unwrap();
        assert!(user.is_some());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = create_service();

        service.register(valid_request()).await.unwrap();

        let user = service
            .authenticate("user@example.com", "wrong_password")
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let service = create_service();

        let user = service
            .authenticate("nobody@example.com", "foobar")
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_remember_then_authenticated() {
        let service = create_service();

        let user = service.register(valid_request()).await.unwrap();

        let token = service.remember(user.id()).await.unwrap();
        assert!(!token.is_empty());

        let reloaded = service.get(user.id()).await.unwrap().unwrap();
        assert!(service.authenticated(&reloaded, &token));
        assert!(!service.authenticated(&reloaded, "wrong_token"));
    }

    #[tokio::test]
    async fn test_remember_rotates_token() {
        let service = create_service();

        let user = service.register(valid_request()).await.unwrap();

        let first = service.remember(user.id()).await.unwrap();
        let second = service.remember(user.id()).await.unwrap();
        assert_ne!(first, second);

        // Only the latest token matches the stored digest
        let reloaded = service.get(user.id()).await.unwrap().unwrap();
        assert!(!service.authenticated(&reloaded, &first));
        assert!(service.authenticated(&reloaded, &second));
    }

    #[tokio::test]
    async fn test_authenticated_without_digest_is_false() {
        let service = create_service();

        let user = service.register(valid_request()).await.unwrap();

        // No remember token was issued, so nothing can match, not even
        // the empty string
        assert!(!service.authenticated(&user, ""));
        assert!(!service.authenticated(&user, "any_token"));
    }

    #[tokio::test]
    async fn test_forget_clears_digest() {
        let service = create_service();

        let user = service.register(valid_request()).await.unwrap();

        let token = service.remember(user.id()).await.unwrap();
        service.forget(user.id()).await.unwrap();

        let reloaded = service.get(user.id()).await.unwrap().unwrap();
        assert!(reloaded.remember_digest().is_none());
        assert!(!service.authenticated(&reloaded, &token));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let service = create_service();

        let user = service.register(valid_request()).await.unwrap();

        let request = UpdateProfileRequest {
            name: Some("Renamed User".to_string()),
            email: Some("Renamed@Example.COM".to_string()),
        };

        service.update_profile(user.id(), request).await.unwrap();

        let reloaded = service.get(user.id()).await.unwrap().unwrap();
        assert_eq!(reloaded.name(), "Renamed User");
        assert_eq!(reloaded.email(), "renamed@example.com");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_email() {
        let service = create_service();

        service.register(valid_request()).await.unwrap();

        let mut other = valid_request();
        other.name = "Other User".to_string();
        other.email = "other@example.com".to_string();
        let other = service.register(other).await.unwrap();

        let request = UpdateProfileRequest {
            name: None,
            email: Some("USER@example.com".to_string()),
        };

        let result = service.update_profile(other.id(), request).await;
        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_update_profile_keeps_own_email() {
        let service = create_service();

        let user = service.register(valid_request()).await.unwrap();

        // Re-submitting the current email is not a conflict
        let request = UpdateProfileRequest {
            name: None,
            email: Some("USER@EXAMPLE.COM".to_string()),
        };

        let updated = service.update_profile(user.id(), request).await.unwrap();
        assert_eq!(updated.email(), "user@example.com");
    }

    #[tokio::test]
    async fn test_update_password() {
        let service = create_service();

        let user = service.register(valid_request()).await.unwrap();

        let request = UpdatePasswordRequest {
            current_password: "foobar".to_string(),
            new_password: "new_password".to_string(),
            new_password_confirmation: "new_password".to_string(),
        };

        service.update_password(user.id(), request).await.unwrap();

        let old = service
            .authenticate("user@example.com", "foobar")
            .await
            .unwrap();
        assert!(old.is_none());

        let new = service
            .authenticate("user@example.com", "new_password")
            .await
            .unwrap();
        assert!(new.is_some());
    }

    #[tokio::test]
    async fn test_update_password_wrong_current() {
        let service = create_service();

        let user = service.register(valid_request()).await.unwrap();

        let request = UpdatePasswordRequest {
            current_password: "wrong_current".to_string(),
            new_password: "new_password".to_string(),
            new_password_confirmation: "new_password".to_string(),
        };

        let result = service.update_password(user.id(), request).await;
        assert!(result.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_delete_removes_dependent_microposts() {
        let users = Arc::new(InMemoryUserRepository::new());
        let microposts = Arc::new(InMemoryMicropostRepository::new());
        let service = UserService::new(
            users.clone(),
            microposts.clone(),
            Arc::new(Argon2Hasher::new()),
        );

        let user = service.register(valid_request()).await.unwrap();

        microposts
            .create(Micropost::new(
                MicropostId::random(),
                *user.id(),
                "Lorem ipsum",
            ))
            .await
            .unwrap();

        let before = microposts.count().await.unwrap();
        assert_eq!(before, 1);

        let deleted = service.delete(user.id()).await.unwrap();
        assert!(deleted);

        assert_eq!(microposts.count().await.unwrap(), before - 1);
        assert!(service.get(user.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let service = create_service();

        let deleted = service.delete(&UserId::random()).await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_delete_clears_microposts_before_user() {
        let users = Arc::new(InMemoryUserRepository::new());
        let mut microposts = MockMicropostRepository::new();

        let user = User::new(UserId::random(), "Example User", "user@example.com", "digest");
        users.create(user.clone()).await.unwrap();

        let owner = *user.id();
        microposts
            .expect_delete_for_user()
            .withf(move |id| *id == owner)
            .times(1)
            .returning(|_| Ok(2));

        let service = UserService::new(users, Arc::new(microposts), Arc::new(Argon2Hasher::new()));

        assert!(service.delete(user.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_oldest_first() {
        let service = create_service();

        let first = service.register(valid_request()).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let mut request = valid_request();
        request.name = "Second User".to_string();
        request.email = "second@example.com".to_string();
        let second = service.register(request).await.unwrap();

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), first.id());
        assert_eq!(all[1].id(), second.id());
    }
}
