//! Merging of parsed configuration documents.
//!
//! [`combine_documents`] folds an ordered list of documents into one. All
//! sources must share a root kind: sequences are concatenated in order, and
//! mappings are folded left-to-right under a [`MergePolicy`]. A single source
//! of any root kind is returned unchanged.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{ParamError, ParamResult};

#[cfg(test)]
mod tests;

/// Root kind of a configuration document.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RootKind {
    /// The root is a mapping with string keys.
    Mapping,
    /// The root is a sequence.
    Sequence,
    /// The root is a scalar (number, string, boolean, or null).
    Scalar,
}

impl RootKind {
    /// Classify the root of `value`.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Mapping,
            Value::Array(_) => Self::Sequence,
            _ => Self::Scalar,
        }
    }
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
            Self::Scalar => "scalar",
        };
        f.write_str(label)
    }
}

/// How mapping key collisions are resolved when folding documents.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MergePolicy {
    /// The incoming value replaces the existing value wholesale.
    #[default]
    Clobber,
    /// When both values are mappings, merge them recursively: keys are
    /// unioned, incoming values win on conflicts, and keys present only in
    /// the old value are preserved at every depth. Otherwise clobber.
    Nested,
}

/// Fold an ordered list of documents into one.
///
/// A single document is returned unchanged, whatever its root. When every
/// root is a sequence the sources are concatenated in order. When every root
/// is a mapping the sources are folded left-to-right under `policy`. Key
/// order in merged mappings is first-seen order; replacing a key keeps its
/// original position.
///
/// A warning is logged when a key is clobbered by a value of a different
/// type, and when sequence sources are appended together.
///
/// # Errors
///
/// Returns [`ParamError::MixedRoots`] when sources disagree on their root
/// kind, [`ParamError::ScalarRoots`] when more than one source has a root
/// that is neither a mapping nor a sequence, and [`ParamError::NoSources`]
/// when `documents` is empty.
pub fn combine_documents(documents: Vec<Value>, policy: MergePolicy) -> ParamResult<Value> {
    let count = documents.len();
    let mut sources = documents.into_iter();
    let first = sources.next().ok_or(ParamError::NoSources)?;
    if count == 1 {
        return Ok(first);
    }
    let expected = RootKind::of(&first);
    let rest: Vec<Value> = sources.collect();
    if let Some((index, found)) = rest
        .iter()
        .map(|doc| RootKind::of(doc))
        .enumerate()
        .find(|&(_, kind)| kind != expected)
    {
        // report the position within the original source list
        return Err(ParamError::MixedRoots {
            expected,
            found,
            index: index + 1,
        });
    }
    match first {
        Value::Array(items) => Ok(concat_sequences(items, rest)),
        Value::Object(map) => Ok(Value::Object(fold_mappings(map, rest, policy))),
        _ => Err(ParamError::ScalarRoots { count }),
    }
}

fn concat_sequences(mut items: Vec<Value>, rest: Vec<Value>) -> Value {
    tracing::warn!("source documents are all sequences and will merely be appended together");
    for doc in rest {
        if let Value::Array(more) = doc {
            items.extend(more);
        }
    }
    Value::Array(items)
}

fn fold_mappings(mut acc: Map<String, Value>, rest: Vec<Value>, policy: MergePolicy) -> Map<String, Value> {
    for doc in rest {
        if let Value::Object(incoming) = doc {
            match policy {
                MergePolicy::Clobber => merge_clobber(&mut acc, incoming),
                MergePolicy::Nested => {
                    let mut path = Vec::new();
                    merge_nested(&mut acc, incoming, &mut path);
                }
            }
        }
    }
    acc
}

/// Replace colliding keys wholesale, warning when the replacement changes
/// the value's type.
fn merge_clobber(acc: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        if let Some(existing) = acc.get(&key) {
            if type_label(existing) != type_label(&value) {
                tracing::warn!(key = key.as_str(), "clobbered value is not the same type");
            }
        }
        acc.insert(key, value);
    }
}

/// Union colliding mappings recursively, preserving old keys absent from the
/// incoming mapping at every depth.
fn merge_nested(acc: &mut Map<String, Value>, incoming: Map<String, Value>, path: &mut Vec<String>) {
    for (key, value) in incoming {
        match acc.get_mut(&key) {
            Some(existing) => {
                path.push(key);
                overlay_nested(existing, value, path);
                path.pop();
            }
            None => {
                acc.insert(key, value);
            }
        }
    }
}

fn overlay_nested(existing: &mut Value, incoming: Value, path: &mut Vec<String>) {
    match (existing, incoming) {
        (Value::Object(existing_map), Value::Object(incoming_map)) => {
            merge_nested(existing_map, incoming_map, path);
        }
        (slot, value) => {
            if type_label(slot) != type_label(&value) {
                tracing::warn!(
                    key = path.join(".").as_str(),
                    "clobbered value is not the same type"
                );
            }
            *slot = value;
        }
    }
}

const fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
