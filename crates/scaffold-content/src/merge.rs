//! Directed JSON config merge
//!
//! Template upgrades must be able to introduce new default fields without
//! clobbering values the user has customized. This is a *directed* merge,
//! not a generic deep-merge: the incoming template drives the key set, an
//! existing non-sentinel value wins over the template default, and the
//! sentinel literal `"default"` lets the user resync a single field.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Sentinel literal marking "reset this field to the template's default".
pub const MERGE_SENTINEL: &str = "default";

/// What happens to destination-only keys the incoming template never
/// declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Merged output carries exactly the template's key set; keys that only
    /// exist in the destination are dropped.
    #[default]
    TemplateKeys,
    /// Destination-only keys are retained, at every nesting level.
    Preserve,
}

/// Merge an existing config tree with an incoming template tree.
///
/// For each key in `incoming`:
/// - nested object: recurse on `(existing[k] or {}, incoming[k])`
/// - `existing[k]` present and not the sentinel: keep the user's value
/// - otherwise: adopt the template default
///
/// Arrays are atomic and replaced wholesale by whichever branch wins.
pub fn merge(existing: &Value, incoming: &Value, mode: MergeMode) -> Value {
    match (existing, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            Value::Object(merge_objects(existing, incoming, mode))
        }
        _ => incoming.clone(),
    }
}

/// Merge two JSON documents given as text.
///
/// # Errors
///
/// Fails when either side is not valid JSON; the pipeline treats that as a
/// ParseError and falls back to its non-merging path.
pub fn merge_strings(existing: &str, incoming: &str, mode: MergeMode) -> Result<String> {
    let existing: Value = serde_json::from_str(existing)
        .map_err(|e| Error::parse("existing config", e.to_string()))?;
    let incoming: Value = serde_json::from_str(incoming)
        .map_err(|e| Error::parse("incoming config", e.to_string()))?;
    let merged = merge(&existing, &incoming, mode);
    Ok(serde_json::to_string_pretty(&merged)?)
}

fn merge_objects(
    existing: &Map<String, Value>,
    incoming: &Map<String, Value>,
    mode: MergeMode,
) -> Map<String, Value> {
    let mut merged = Map::new();

    for (key, new_value) in incoming {
        let existing_value = existing.get(key);
        let value = if new_value.is_object() {
            // Non-object existing values (including the sentinel) recurse
            // against an empty object, so every template default lands.
            let base = existing_value
                .filter(|v| v.is_object())
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()));
            merge(&base, new_value, mode)
        } else {
            match existing_value {
                Some(value) if !is_sentinel(value) => value.clone(),
                _ => new_value.clone(),
            }
        };
        merged.insert(key.clone(), value);
    }

    if mode == MergeMode::Preserve {
        for (key, value) in existing {
            if !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    merged
}

fn is_sentinel(value: &Value) -> bool {
    value.as_str() == Some(MERGE_SENTINEL)
}
