//! Provider-family request shaping and response parsing.
//!
//! Bedrock hosts models with vendor-specific payload shapes. A marker
//! substring in the model ref selects the family; each family has one
//! body shape and one reply parser. Unknown refs fall back to the
//! generic flattened-transcript shape.

use serde::Serialize;
use serde_json::Value;

use parley_types::llm::{LlmError, Turn};

/// Fixed maximum-output-token ceiling for every invocation.
pub const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Anthropic API version header required by Bedrock.
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Vendor family of a hosted model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFamily {
    Anthropic,
    Generic,
}

/// Marker substrings mapping a model ref to its family. First match wins;
/// refs matching nothing are Generic.
const FAMILY_MARKERS: &[(&str, ProviderFamily)] = &[("anthropic", ProviderFamily::Anthropic)];

impl ProviderFamily {
    /// Detect the family from a model ref (case-insensitive).
    pub fn detect(model_ref: &str) -> Self {
        let lowered = model_ref.to_lowercase();
        FAMILY_MARKERS
            .iter()
            .find(|(marker, _)| lowered.contains(marker))
            .map(|(_, family)| *family)
            .unwrap_or(ProviderFamily::Generic)
    }
}

/// One message in an Anthropic-shaped request.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicTurn {
    pub role: String,
    pub content: String,
}

/// Request body for a Bedrock invocation, shaped per provider family.
///
/// Serialized untagged: the field set itself is the discriminator the
/// remote endpoint expects.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum InvokeBody {
    Anthropic {
        anthropic_version: &'static str,
        max_tokens: u32,
        messages: Vec<AnthropicTurn>,
    },
    Generic {
        prompt: String,
        max_tokens: u32,
    },
}

/// Build the request body for `model_ref` from the ordered conversation.
pub fn build_invoke_body(model_ref: &str, turns: &[Turn]) -> InvokeBody {
    match ProviderFamily::detect(model_ref) {
        ProviderFamily::Anthropic => InvokeBody::Anthropic {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: MAX_OUTPUT_TOKENS,
            messages: turns
                .iter()
                .map(|t| AnthropicTurn {
                    role: t.role.to_string(),
                    content: t.content.clone(),
                })
                .collect(),
        },
        ProviderFamily::Generic => InvokeBody::Generic {
            prompt: turns
                .iter()
                .map(|t| format!("{}: {}", t.role, t.content))
                .collect::<Vec<_>>()
                .join("\n\n"),
            max_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}

type ReplyParser = fn(&Value) -> Result<String, LlmError>;

/// Marker-to-parser table. Families without an entry use the generic parser.
const REPLY_PARSERS: &[(&str, ReplyParser)] = &[("anthropic", parse_anthropic_reply)];

/// Select the reply parser for a model ref.
pub fn reply_parser(model_ref: &str) -> ReplyParser {
    let lowered = model_ref.to_lowercase();
    REPLY_PARSERS
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map(|(_, parser)| *parser)
        .unwrap_or(parse_generic_reply)
}

/// Extract the reply text from a response body for `model_ref`.
pub fn parse_reply(model_ref: &str, body: &Value) -> Result<String, LlmError> {
    reply_parser(model_ref)(body)
}

/// Anthropic replies carry `{"content": [{"type": "text", "text": ...}, ...]}`.
/// All text blocks are concatenated; a reply with none is a decode error.
fn parse_anthropic_reply(body: &Value) -> Result<String, LlmError> {
    let blocks = body
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| LlmError::Deserialization("missing 'content' array".to_string()))?;

    let text: String = blocks
        .iter()
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        return Err(LlmError::Deserialization(
            "no text blocks in 'content'".to_string(),
        ));
    }
    Ok(text)
}

/// Generic replies are probed for `generation`, then `output`, then `text`;
/// when none match, the whole body is stringified as a last resort.
fn parse_generic_reply(body: &Value) -> Result<String, LlmError> {
    for field in ["generation", "output", "text"] {
        if let Some(text) = body.get(field).and_then(Value::as_str) {
            return Ok(text.to_string());
        }
    }
    Ok(body.to_string())
}
