//! HTTP request handlers.

pub mod auth;
pub mod model;
pub mod session;
pub mod turn;
