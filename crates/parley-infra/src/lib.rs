//! Infrastructure implementations for Parley.
//!
//! SQLite repositories (sqlx), Argon2 password hashing, the Bedrock
//! invocation client, and environment configuration.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;
