//! Secure digest generation using Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for turning secrets into one-way digests
///
/// Used for both passwords and remember tokens; plaintext secrets are
/// never stored, only their digests.
pub trait PasswordHasher: Send + Sync + Debug {
    /// Produce a salted digest of a secret
    fn digest(&self, secret: &str) -> Result<String, DomainError>;

    /// Check a secret against a stored digest
    fn verify(&self, secret: &str, digest: &str) -> bool;
}

/// Argon2-based hasher
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Create a new Argon2 hasher
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn digest(&self, secret: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash secret: {}", e)))
    }

    fn verify(&self, secret: &str, digest: &str) -> bool {
        let parsed_hash = match PasswordHash::new(digest) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_and_verify() {
        let hasher = Argon2Hasher::new();
        let password = "foobar";

        let digest = hasher.digest(password).unwrap();

        assert_ne!(digest, password);
        assert!(hasher.verify(password, &digest));
        assert!(!hasher.verify("wrong_password", &digest));
    }

    #[test]
    fn test_digest_is_salted() {
        let hasher = Argon2Hasher::new();
        let password = "foobar";

        let first = hasher.digest(password).unwrap();
        let second = hasher.digest(password).unwrap();

        // Digests differ due to random salt
        assert_ne!(first, second);

        // But both verify correctly
        assert!(hasher.verify(password, &first));
        assert!(hasher.verify(password, &second));
    }

    #[test]
    fn test_verify_rejects_malformed_digest() {
        let hasher = Argon2Hasher::new();

        assert!(!hasher.verify("foobar", "not_a_digest"));
        assert!(!hasher.verify("foobar", ""));
    }

    #[test]
    fn test_digest_of_remember_token() {
        // Remember tokens are digested the same way as passwords
        let hasher = Argon2Hasher::new();
        let token = "q5lcPYZeHyuuwWTIVGlhJQ";

        let digest = hasher.digest(token).unwrap();
        assert!(hasher.verify(token, &digest));
    }
}
