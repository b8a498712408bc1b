//! Per-parameter (de)serialization handlers, registries, and whole-set
//! operations.
//!
//! A handler converts one parameter between its stored value and a
//! document-friendly representation. Handlers are resolved through a
//! registry in a fixed priority order: an explicit per-name override, then
//! an explicit per-kind override, then the built-in default for the kind.
//! Resolving a [`crate::ParamKind::Custom`] kind with no registration is an
//! error.

use serde_json::Value;

use crate::error::ParamResult;
use crate::schema::ParamSet;

mod apply;
mod date;
mod deserializers;
mod files;
mod registry;
mod serializers;

pub use apply::{
    DeserializeOptions, SerializeOptions, SerializedParams, deserialize_params, serialize_params,
};
pub use deserializers::{
    BoolDeserializer, DateDeserializer, DateRangeDeserializer, IntegerDeserializer,
    JsonStringDeserializer, ListDeserializer, ListSelectorDeserializer, NumberDeserializer,
    NumericTupleDeserializer, SelectorDeserializer, StringDeserializer, VerbatimDeserializer,
};
pub use files::{
    deserialize_params_from_ini_file, deserialize_params_from_ini_str,
    deserialize_params_from_json_file, deserialize_params_from_json_str,
    deserialize_params_from_yaml_file, deserialize_params_from_yaml_str,
    deserialize_sections_from_ini_str, serialize_params_to_ini, serialize_params_to_ini_file,
    serialize_params_to_json, serialize_params_to_json_file, serialize_params_to_yaml,
    serialize_params_to_yaml_file, serialize_sections_to_ini,
};
pub use registry::{DeserializerRegistry, SerializerRegistry};
pub use serializers::{
    DateRangeSerializer, DateSerializer, JsonStringSerializer, ListSelectorSerializer,
    SelectorSerializer, VerbatimSerializer,
};

/// Policy for names that do not resolve to a declared parameter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OnMissing {
    /// Skip the name silently.
    Ignore,
    /// Skip the name and log a warning.
    #[default]
    Warn,
    /// Fail with [`crate::ParamError::UnknownParam`].
    Raise,
}

/// Convert one parameter's stored value into a document-friendly value.
pub trait ParamSerializer {
    /// A string that helps explain this serialization to the user, included
    /// in help output alongside the declaration's doc string.
    fn help_string(&self, name: &str, set: &ParamSet) -> Option<String> {
        let (_, _) = (name, set);
        None
    }

    /// Serialize the value of the parameter `name` in `set`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ParamError`] when the stored value cannot be
    /// represented by this handler.
    fn serialize(&self, name: &str, set: &ParamSet) -> ParamResult<Value>;
}

/// Convert a document value into a parameter's stored value.
pub trait ParamDeserializer {
    /// Deserialize `block` into the parameter `name` of `set`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ParamError`] when `block` cannot be converted into a
    /// value fitting the declaration.
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()>;
}
