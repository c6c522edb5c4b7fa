//! Chat session lifecycle and turn orchestration.

pub mod service;
pub mod title;

pub use service::{ChatService, TurnReply};
