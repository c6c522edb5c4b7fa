//! Inference-profile fallback helpers.
//!
//! Some Bedrock models reject direct invocation and demand an inference
//! profile. The client retries exactly once with a derived profile id
//! when the model ref carries a marker it knows how to rewrite.

/// Marker identifying refs eligible for the derived-profile retry.
const PROFILE_RETRY_MARKER: &str = "claude-opus-4";

/// True when an error body indicates the endpoint wants an inference
/// profile rather than a direct model id.
pub fn is_routing_profile_error(error_text: &str) -> bool {
    error_text.to_lowercase().contains("inference profile")
}

/// Derive a retry profile id from a model ref, when eligible.
///
/// `anthropic.claude-opus-4-v1:0` → `inference-profile-0` (the segment
/// after the last ':'). Refs without the retry marker return `None` and
/// the original error surfaces to the caller.
pub fn derive_profile_ref(model_ref: &str) -> Option<String> {
    if !model_ref.to_lowercase().contains(PROFILE_RETRY_MARKER) {
        return None;
    }
    let tail = model_ref.rsplit(':').next().unwrap_or(model_ref);
    Some(format!("inference-profile-{tail}"))
}
