//! LlmProvider trait definition.

use parley_types::llm::{LlmError, Turn};

/// Trait for inference backends (Bedrock in production, mocks in tests).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). One
/// invocation per chat turn; no streaming.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "bedrock").
    fn name(&self) -> &str;

    /// Invoke `model_ref` with the ordered conversation and return the
    /// plain reply text.
    fn invoke(
        &self,
        model_ref: &str,
        turns: &[Turn],
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
