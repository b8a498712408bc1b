//! Built-in serialization handlers.

use serde_json::Value;

use super::date;
use super::ParamSerializer;
use crate::error::{ParamError, ParamResult};
use crate::schema::ParamSet;

fn stored<'a>(name: &str, set: &'a ParamSet) -> ParamResult<&'a Value> {
    set.get(name).ok_or_else(|| ParamError::UnknownParam {
        owner: set.name().to_owned(),
        name: name.to_owned(),
    })
}

fn quoted_names(choices: &[(String, Value)]) -> String {
    choices
        .iter()
        .map(|(choice, _)| format!("\"{choice}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Catch-all serializer. Returns the stored value verbatim.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerbatimSerializer;

impl ParamSerializer for VerbatimSerializer {
    fn serialize(&self, name: &str, set: &ParamSet) -> ParamResult<Value> {
        stored(name, set).cloned()
    }
}

/// Date serializer driven by a format preference list.
///
/// A null value passes through. Otherwise the stored value (a canonical
/// string or integer timestamp) is rendered with the first format in the
/// list that round-trips; when none does, the last format is used and a
/// warning is logged. An empty format list keeps integer timestamps.
#[derive(Clone, Debug)]
pub struct DateSerializer {
    formats: Vec<String>,
}

impl DateSerializer {
    /// Build a serializer preferring `formats`, least precise first.
    #[must_use]
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    /// Build a serializer that keeps integer timestamps untouched.
    #[must_use]
    pub const fn timestamps() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    fn render(&self, name: &str, set: &ParamSet, value: &Value) -> ParamResult<Value> {
        if self.formats.is_empty() {
            return match value {
                Value::Number(_) => Ok(value.clone()),
                _ => Err(ParamError::convert(
                    set.name(),
                    name,
                    format!("cannot render {value} as a timestamp"),
                )),
            };
        }
        let moment = date::parse_stored(value).ok_or_else(|| {
            ParamError::convert(set.name(), name, format!("cannot interpret {value} as a date"))
        })?;
        let (rendered, _, lossless) =
            date::to_formatted(moment, &self.formats).ok_or_else(|| {
                ParamError::convert(set.name(), name, "no usable date format".to_owned())
            })?;
        if !lossless {
            tracing::warn!(
                name,
                rendered = rendered.as_str(),
                "serialized date format loses information"
            );
        }
        Ok(Value::String(rendered))
    }
}

impl Default for DateSerializer {
    fn default() -> Self {
        Self::new(date::SERIALIZE_FORMATS.iter().map(|&f| f.to_owned()).collect())
    }
}

impl ParamSerializer for DateSerializer {
    fn help_string(&self, name: &str, set: &ParamSet) -> Option<String> {
        let value = set.get(name)?;
        if value.is_null() {
            return None;
        }
        if self.formats.is_empty() {
            return Some("Timestamp".to_owned());
        }
        let moment = date::parse_stored(value)?;
        let (_, format, _) = date::to_formatted(moment, &self.formats)?;
        Some(format!("Date format string: {format}"))
    }

    fn serialize(&self, name: &str, set: &ParamSet) -> ParamResult<Value> {
        let value = stored(name, set)?.clone();
        if value.is_null() {
            return Ok(value);
        }
        self.render(name, set, &value)
    }
}

/// Date range serializer. Applies [`DateSerializer`] element-wise.
#[derive(Clone, Debug, Default)]
pub struct DateRangeSerializer {
    inner: DateSerializer,
}

impl DateRangeSerializer {
    /// Build a serializer preferring `formats`, least precise first.
    #[must_use]
    pub fn new(formats: Vec<String>) -> Self {
        Self {
            inner: DateSerializer::new(formats),
        }
    }
}

impl ParamSerializer for DateRangeSerializer {
    fn help_string(&self, name: &str, set: &ParamSet) -> Option<String> {
        self.inner.help_string(name, set)
    }

    fn serialize(&self, name: &str, set: &ParamSet) -> ParamResult<Value> {
        let value = stored(name, set)?.clone();
        if value.is_null() {
            return Ok(value);
        }
        let items = value.as_array().ok_or_else(|| {
            ParamError::convert(set.name(), name, format!("expected a pair of dates, got {value}"))
        })?;
        let mut rendered = Vec::with_capacity(items.len());
        for item in items {
            rendered.push(self.inner.render(name, set, item)?);
        }
        Ok(Value::Array(rendered))
    }
}

/// Selector serializer. Maps the stored value back to its declared choice
/// name where possible, warning and passing the value through otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectorSerializer;

fn choice_or_verbatim(name: &str, set: &ParamSet, value: &Value) -> Value {
    set.decl(name)
        .and_then(|decl| decl.choice_name(value))
        .map_or_else(
            || {
                tracing::warn!(
                    name,
                    "value not found among the declared choices; serializing it directly"
                );
                value.clone()
            },
            |choice| Value::String(choice.to_owned()),
        )
}

impl ParamSerializer for SelectorSerializer {
    fn help_string(&self, name: &str, set: &ParamSet) -> Option<String> {
        let decl = set.decl(name)?;
        if decl.choices().is_empty() {
            return None;
        }
        Some(format!("Choices: {}", quoted_names(decl.choices())))
    }

    fn serialize(&self, name: &str, set: &ParamSet) -> ParamResult<Value> {
        let value = stored(name, set)?.clone();
        if value.is_null() {
            return Ok(value);
        }
        Ok(choice_or_verbatim(name, set, &value))
    }
}

/// List selector serializer. Maps each element back to its declared choice
/// name where possible.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListSelectorSerializer;

impl ParamSerializer for ListSelectorSerializer {
    fn help_string(&self, name: &str, set: &ParamSet) -> Option<String> {
        let decl = set.decl(name)?;
        if decl.choices().is_empty() {
            return None;
        }
        Some(format!("Element choices: {}", quoted_names(decl.choices())))
    }

    fn serialize(&self, name: &str, set: &ParamSet) -> ParamResult<Value> {
        let value = stored(name, set)?.clone();
        let items = value.as_array().ok_or_else(|| {
            ParamError::convert(
                set.name(),
                name,
                format!("expected a sequence of choices, got {value}"),
            )
        })?;
        Ok(Value::Array(
            items
                .iter()
                .map(|item| choice_or_verbatim(name, set, item))
                .collect(),
        ))
    }
}

/// Wrapper that re-encodes container results as JSON strings.
///
/// The default for container kinds when targeting INI, which has no native
/// container syntax. Scalar results pass through untouched.
#[derive(Clone, Debug, Default)]
pub struct JsonStringSerializer<S> {
    inner: S,
}

impl<S: ParamSerializer> JsonStringSerializer<S> {
    /// Wrap `inner`, JSON-encoding any container it produces.
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: ParamSerializer> ParamSerializer for JsonStringSerializer<S> {
    fn help_string(&self, name: &str, set: &ParamSet) -> Option<String> {
        self.inner.help_string(name, set)
    }

    fn serialize(&self, name: &str, set: &ParamSet) -> ParamResult<Value> {
        let value = self.inner.serialize(name, set)?;
        if value.is_array() || value.is_object() {
            let encoded = serde_json::to_string(&value)
                .map_err(|e| ParamError::convert(set.name(), name, e.to_string()))?;
            return Ok(Value::String(encoded));
        }
        Ok(value)
    }
}
