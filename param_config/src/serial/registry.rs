//! Handler registries with name, kind, and default resolution tiers.

use std::collections::BTreeMap;

use super::deserializers::{
    BoolDeserializer, DateDeserializer, DateRangeDeserializer, IntegerDeserializer,
    JsonStringDeserializer, ListDeserializer, ListSelectorDeserializer, NumberDeserializer,
    NumericTupleDeserializer, SelectorDeserializer, StringDeserializer, VerbatimDeserializer,
};
use super::serializers::{
    DateRangeSerializer, DateSerializer, JsonStringSerializer, ListSelectorSerializer,
    SelectorSerializer, VerbatimSerializer,
};
use super::{ParamDeserializer, ParamSerializer};
use crate::error::{ParamError, ParamResult};
use crate::schema::ParamKind;

/// Registry resolving a [`ParamSerializer`] for a parameter.
///
/// Resolution order: explicit per-name override, explicit per-kind
/// override, then the registry's built-in default. [`ParamKind::Custom`]
/// kinds have no built-in default; resolving one without an override is an
/// error.
pub struct SerializerRegistry {
    by_name: BTreeMap<String, Box<dyn ParamSerializer>>,
    by_kind: BTreeMap<ParamKind, Box<dyn ParamSerializer>>,
    default: Box<dyn ParamSerializer>,
}

impl SerializerRegistry {
    /// Registry with the built-in defaults for dict-like targets (JSON and
    /// YAML): date and selector kinds get their specialized handlers,
    /// everything else serializes verbatim.
    #[must_use]
    pub fn standard() -> Self {
        let mut by_kind: BTreeMap<ParamKind, Box<dyn ParamSerializer>> = BTreeMap::new();
        by_kind.insert(ParamKind::Date, Box::new(DateSerializer::default()));
        by_kind.insert(ParamKind::DateRange, Box::new(DateRangeSerializer::default()));
        by_kind.insert(ParamKind::Selector, Box::new(SelectorSerializer));
        by_kind.insert(ParamKind::ListSelector, Box::new(ListSelectorSerializer));
        Self {
            by_name: BTreeMap::new(),
            by_kind,
            default: Box::new(VerbatimSerializer),
        }
    }

    /// Registry with the built-in defaults for INI targets: container kinds
    /// are re-encoded as JSON strings.
    #[must_use]
    pub fn json_string() -> Self {
        let mut registry = Self::standard();
        for kind in [
            ParamKind::List,
            ParamKind::Dict,
            ParamKind::Tuple,
            ParamKind::NumericTuple,
        ] {
            registry
                .by_kind
                .insert(kind, Box::new(JsonStringSerializer::new(VerbatimSerializer)));
        }
        registry.by_kind.insert(
            ParamKind::ListSelector,
            Box::new(JsonStringSerializer::new(ListSelectorSerializer)),
        );
        registry.by_kind.insert(
            ParamKind::DateRange,
            Box::new(JsonStringSerializer::new(DateRangeSerializer::default())),
        );
        registry.default = Box::new(JsonStringSerializer::new(VerbatimSerializer));
        registry
    }

    /// Override the handler for the parameter called `name`.
    pub fn register_name(
        &mut self,
        name: impl Into<String>,
        handler: impl ParamSerializer + 'static,
    ) -> &mut Self {
        self.by_name.insert(name.into(), Box::new(handler));
        self
    }

    /// Override the handler for every parameter of `kind`.
    pub fn register_kind(
        &mut self,
        kind: ParamKind,
        handler: impl ParamSerializer + 'static,
    ) -> &mut Self {
        self.by_kind.insert(kind, Box::new(handler));
        self
    }

    /// Resolve the handler for the parameter `name` of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::NoHandler`] for a [`ParamKind::Custom`] kind
    /// with no per-name or per-kind override.
    pub fn resolve(&self, name: &str, kind: ParamKind) -> ParamResult<&dyn ParamSerializer> {
        if let Some(handler) = self.by_name.get(name) {
            return Ok(handler.as_ref());
        }
        if let Some(handler) = self.by_kind.get(&kind) {
            return Ok(handler.as_ref());
        }
        if matches!(kind, ParamKind::Custom(_)) {
            return Err(ParamError::NoHandler {
                name: name.to_owned(),
                kind,
            });
        }
        Ok(self.default.as_ref())
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Registry resolving a [`ParamDeserializer`] for a parameter.
///
/// Resolution follows the same order as [`SerializerRegistry`].
pub struct DeserializerRegistry {
    by_name: BTreeMap<String, Box<dyn ParamDeserializer>>,
    by_kind: BTreeMap<ParamKind, Box<dyn ParamDeserializer>>,
    default: Box<dyn ParamDeserializer>,
}

impl DeserializerRegistry {
    /// Registry with the built-in defaults for dict-like sources (JSON and
    /// YAML).
    #[must_use]
    pub fn standard() -> Self {
        let mut by_kind: BTreeMap<ParamKind, Box<dyn ParamDeserializer>> = BTreeMap::new();
        by_kind.insert(ParamKind::Bool, Box::new(BoolDeserializer));
        by_kind.insert(ParamKind::Integer, Box::new(IntegerDeserializer));
        by_kind.insert(ParamKind::Number, Box::new(NumberDeserializer));
        by_kind.insert(ParamKind::String, Box::new(StringDeserializer));
        by_kind.insert(ParamKind::List, Box::new(ListDeserializer));
        by_kind.insert(ParamKind::Tuple, Box::new(ListDeserializer));
        by_kind.insert(ParamKind::NumericTuple, Box::new(NumericTupleDeserializer));
        by_kind.insert(ParamKind::Selector, Box::new(SelectorDeserializer));
        by_kind.insert(ParamKind::ListSelector, Box::new(ListSelectorDeserializer));
        by_kind.insert(ParamKind::Date, Box::new(DateDeserializer::default()));
        by_kind.insert(ParamKind::DateRange, Box::new(DateRangeDeserializer::default()));
        Self {
            by_name: BTreeMap::new(),
            by_kind,
            default: Box::new(VerbatimDeserializer),
        }
    }

    /// Registry with the built-in defaults for INI sources: container kinds
    /// parse their blocks as JSON strings first.
    #[must_use]
    pub fn json_string() -> Self {
        let mut registry = Self::standard();
        registry
            .by_kind
            .insert(ParamKind::List, Box::new(JsonStringDeserializer::new(ListDeserializer)));
        registry.by_kind.insert(
            ParamKind::Dict,
            Box::new(JsonStringDeserializer::new(VerbatimDeserializer)),
        );
        registry.by_kind.insert(
            ParamKind::Tuple,
            Box::new(JsonStringDeserializer::new(ListDeserializer)),
        );
        registry.by_kind.insert(
            ParamKind::NumericTuple,
            Box::new(JsonStringDeserializer::new(NumericTupleDeserializer)),
        );
        registry.by_kind.insert(
            ParamKind::ListSelector,
            Box::new(JsonStringDeserializer::new(ListSelectorDeserializer)),
        );
        registry.by_kind.insert(
            ParamKind::DateRange,
            Box::new(JsonStringDeserializer::new(DateRangeDeserializer::default())),
        );
        registry
    }

    /// Override the handler for the parameter called `name`.
    pub fn register_name(
        &mut self,
        name: impl Into<String>,
        handler: impl ParamDeserializer + 'static,
    ) -> &mut Self {
        self.by_name.insert(name.into(), Box::new(handler));
        self
    }

    /// Override the handler for every parameter of `kind`.
    pub fn register_kind(
        &mut self,
        kind: ParamKind,
        handler: impl ParamDeserializer + 'static,
    ) -> &mut Self {
        self.by_kind.insert(kind, Box::new(handler));
        self
    }

    /// Resolve the handler for the parameter `name` of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::NoHandler`] for a [`ParamKind::Custom`] kind
    /// with no per-name or per-kind override.
    pub fn resolve(&self, name: &str, kind: ParamKind) -> ParamResult<&dyn ParamDeserializer> {
        if let Some(handler) = self.by_name.get(name) {
            return Ok(handler.as_ref());
        }
        if let Some(handler) = self.by_kind.get(&kind) {
            return Ok(handler.as_ref());
        }
        if matches!(kind, ParamKind::Custom(_)) {
            return Err(ParamError::NoHandler {
                name: name.to_owned(),
                kind,
            });
        }
        Ok(self.default.as_ref())
    }
}

impl Default for DeserializerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
