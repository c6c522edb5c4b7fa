//! Inference adapter logic.
//!
//! `provider` defines the trait the Bedrock client in parley-infra
//! implements; `payload` holds the pure request-shaping and
//! response-parsing logic; `routing` holds the inference-profile
//! fallback helpers.

pub mod payload;
pub mod provider;
pub mod routing;

pub use provider::LlmProvider;
