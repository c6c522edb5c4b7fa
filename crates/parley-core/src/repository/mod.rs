//! Repository trait definitions.
//!
//! Implementations live in parley-infra (SQLite via sqlx). All traits use
//! native async fn in traits (RPITIT, Rust 2024 edition).

pub mod account;
pub mod chat;
pub mod model;

pub use account::AccountRepository;
pub use chat::ChatRepository;
pub use model::ModelRepository;
