//! Bearer token generation and hashing.
//!
//! Tokens are handed to clients once at login and stored server-side only
//! as lowercase hex SHA-256 digests. Lookup hashes the presented token and
//! matches against the stored digest.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Prefix on every issued bearer token, for easy identification in logs
/// and client configs.
pub const TOKEN_PREFIX: &str = "parley_";

/// Generate a fresh bearer token: prefix plus 32 random bytes hex-encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{TOKEN_PREFIX}{hex}")
}

/// Hash a token for storage or lookup.
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}
