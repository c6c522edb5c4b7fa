//! Model registry types.
//!
//! A `ModelEntry` is a named, addressable reference to a remote Bedrock
//! model (or inference profile). At most one entry carries the default
//! flag at any time; the registry service enforces exactly-one-default
//! whenever the registry is non-empty.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A callable model registered by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: Uuid,
    /// Display name shown in model pickers (e.g., "Claude Sonnet").
    pub name: String,
    /// Bedrock model identifier or inference-profile identifier.
    pub model_ref: String,
    pub is_default: bool,
}

impl ModelEntry {
    pub fn new(name: String, model_ref: String, is_default: bool) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            model_ref,
            is_default,
        }
    }
}
