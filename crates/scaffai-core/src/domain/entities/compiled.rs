//! Compiled prompt value object and cache-key derivation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::context::PromptContext;

/// Result of applying a template to a context and variable set.
///
/// Immutable once produced; the compile cache hands out `Arc<CompiledPrompt>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledPrompt {
    /// Fresh per compile (a cache hit returns the original id).
    pub id: Uuid,
    /// Fully substituted prompt text.
    pub content: String,
    /// Merged context + variables snapshot, including derived fields.
    pub variables: BTreeMap<String, Value>,
    pub metadata: CompiledMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledMetadata {
    pub template_id: String,
    pub compiled_at: DateTime<Utc>,
    pub context: PromptContext,
}

/// Deterministic cache key for a compile request.
///
/// The arguments are serialized canonically (all maps are `BTreeMap`, so key
/// order is stable) and hashed with xxh64. Returned as 16 lowercase hex digits.
pub fn cache_key(
    template_id: &str,
    context: &PromptContext,
    variables: &BTreeMap<String, Value>,
) -> String {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct KeyMaterial<'a> {
        template_id: &'a str,
        context: &'a PromptContext,
        variables: &'a BTreeMap<String, Value>,
    }

    let material = KeyMaterial {
        template_id,
        context,
        variables,
    };
    // Serializing these types cannot fail: every map key is a String.
    let bytes = serde_json::to_vec(&material).unwrap_or_default();
    format!("{:016x}", xxhash_rust::xxh64::xxh64(&bytes, 0))
}
