//! SQLite persistence layer.

pub mod account;
pub mod chat;
pub mod model;
pub mod pool;
