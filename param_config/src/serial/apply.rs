//! Whole-set serialization and deserialization.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use super::registry::{DeserializerRegistry, SerializerRegistry};
use super::OnMissing;
use crate::error::{ParamError, ParamResult};
use crate::schema::ParamSet;

/// Options controlling [`serialize_params`].
#[derive(Clone, Debug, Default)]
pub struct SerializeOptions {
    only: Option<BTreeSet<String>>,
    on_missing: Option<OnMissing>,
}

impl SerializeOptions {
    /// Serialize only the named parameters instead of the whole set.
    #[must_use]
    pub fn only(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Policy for `only` names absent from the set. Defaults to
    /// [`OnMissing::Raise`].
    #[must_use]
    pub fn on_missing(mut self, policy: OnMissing) -> Self {
        self.on_missing = Some(policy);
        self
    }

    fn missing_policy(&self) -> OnMissing {
        self.on_missing.unwrap_or(OnMissing::Raise)
    }
}

/// Options controlling [`deserialize_params`].
#[derive(Clone, Debug, Default)]
pub struct DeserializeOptions {
    on_missing: Option<OnMissing>,
}

impl DeserializeOptions {
    /// Policy for document keys absent from the set. Defaults to
    /// [`OnMissing::Warn`].
    #[must_use]
    pub fn on_missing(mut self, policy: OnMissing) -> Self {
        self.on_missing = Some(policy);
        self
    }

    fn missing_policy(&self) -> OnMissing {
        self.on_missing.unwrap_or(OnMissing::Warn)
    }
}

/// Result of serializing a parameter set.
#[derive(Clone, Debug, Default)]
pub struct SerializedParams {
    /// Serialized values, sorted by parameter name.
    pub values: Map<String, Value>,
    /// Help strings gathered from declarations and handlers.
    pub help: BTreeMap<String, String>,
}

fn handle_missing(policy: OnMissing, owner: &str, name: &str, action: &str) -> ParamResult<()> {
    match policy {
        OnMissing::Ignore => Ok(()),
        OnMissing::Warn => {
            tracing::warn!(owner, name, "no parameter to {action}");
            Ok(())
        }
        OnMissing::Raise => Err(ParamError::UnknownParam {
            owner: owner.to_owned(),
            name: name.to_owned(),
        }),
    }
}

fn join_help(doc: Option<&str>, from_handler: Option<String>) -> Option<String> {
    match (doc, from_handler) {
        (Some(text), Some(extra)) => Some(format!(
            "{}. {extra}",
            text.trim_matches(|c: char| c == '.' || c == ' ')
        )),
        (Some(text), None) => Some(text.to_owned()),
        (None, Some(extra)) => Some(extra),
        (None, None) => None,
    }
}

/// Serialize `set` into a mapping, resolving a handler per parameter.
///
/// The output mapping is sorted by parameter name. Help strings combine
/// each declaration's doc string with whatever the resolved handler adds.
///
/// # Errors
///
/// Returns [`ParamError::UnknownParam`] for `only` names absent from the
/// set under [`OnMissing::Raise`], [`ParamError::NoHandler`] when handler
/// resolution fails, and whatever the handlers themselves raise.
pub fn serialize_params(
    set: &ParamSet,
    registry: &SerializerRegistry,
    options: &SerializeOptions,
) -> ParamResult<SerializedParams> {
    let names: BTreeSet<String> = options
        .only
        .clone()
        .unwrap_or_else(|| set.names().map(str::to_owned).collect());
    let mut serialized = SerializedParams::default();
    for name in &names {
        let Some(decl) = set.decl(name) else {
            handle_missing(options.missing_policy(), set.name(), name, "read")?;
            continue;
        };
        let handler = registry.resolve(name, decl.kind())?;
        let value = handler.serialize(name, set)?;
        serialized.values.insert(name.clone(), value);
        if let Some(help) = join_help(decl.doc(), handler.help_string(name, set)) {
            serialized.help.insert(name.clone(), help);
        }
    }
    Ok(serialized)
}

/// Deserialize the keys of `document` into `set`, resolving a handler per
/// parameter.
///
/// # Errors
///
/// Returns [`ParamError::UnknownParam`] for document keys absent from the
/// set under [`OnMissing::Raise`], [`ParamError::NoHandler`] when handler
/// resolution fails, and whatever the handlers themselves raise.
pub fn deserialize_params(
    document: &Map<String, Value>,
    set: &mut ParamSet,
    registry: &DeserializerRegistry,
    options: &DeserializeOptions,
) -> ParamResult<()> {
    for (name, block) in document {
        let Some(decl) = set.decl(name) else {
            handle_missing(options.missing_policy(), set.name(), name, "set")?;
            continue;
        };
        let handler = registry.resolve(name, decl.kind())?;
        handler.deserialize(name, block.clone(), set)?;
    }
    Ok(())
}
