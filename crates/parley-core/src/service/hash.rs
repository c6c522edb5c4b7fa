//! PasswordHasher trait definition.
//!
//! The concrete Argon2 implementation lives in parley-infra.

use parley_types::error::AccountError;

/// Salted password hashing and verification.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing PHC string.
    fn hash_password(&self, password: &str) -> Result<String, AccountError>;

    /// Verify a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}
