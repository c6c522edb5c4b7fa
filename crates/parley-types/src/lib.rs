//! Shared domain types for Parley.
//!
//! This crate has no infrastructure dependencies: only serde models,
//! error enums, and small pure helpers shared by core, infra, and api.

pub mod account;
pub mod chat;
pub mod error;
pub mod llm;
pub mod model;
