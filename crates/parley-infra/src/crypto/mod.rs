//! Cryptographic implementations: Argon2 password hashing and bearer
//! token generation/hashing.

pub mod password;
pub mod token;
