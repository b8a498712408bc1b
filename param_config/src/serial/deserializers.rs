//! Built-in deserialization handlers.
//!
//! Every handler starts with a *none check*: a null block stored into a
//! parameter whose declaration allows none finishes the conversion
//! immediately.

use serde_json::{Number, Value};

use super::ParamDeserializer;
use super::date;
use crate::error::{ParamError, ParamResult};
use crate::schema::ParamSet;

const TRUE_WORDS: [&str; 10] = ["True", "true", "t", "on", "TRUE", "T", "ON", "yes", "YES", "1"];
const FALSE_WORDS: [&str; 10] = [
    "False", "false", "f", "off", "FALSE", "F", "OFF", "no", "NO", "0",
];

/// Store null and report `true` when `block` is null and the declaration
/// for `name` allows none.
fn none_check(name: &str, block: &Value, set: &mut ParamSet) -> ParamResult<bool> {
    let allows = set.decl(name).is_some_and(|decl| decl.allows_none());
    if block.is_null() && allows {
        set.set(name, Value::Null)?;
        return Ok(true);
    }
    Ok(false)
}

fn convert_error(set: &ParamSet, name: &str, message: String) -> ParamError {
    ParamError::convert(set.name(), name, message)
}

/// Catch-all deserializer. Performs a none check, then stores the block
/// verbatim.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerbatimDeserializer;

impl ParamDeserializer for VerbatimDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        set.set(name, block)
    }
}

/// Boolean deserializer accepting the usual truthy and falsy spellings
/// (`true`/`t`/`on`/`yes`/`1` and their counterparts) alongside booleans
/// and the numbers one and zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolDeserializer;

fn as_bool(block: &Value) -> Option<bool> {
    match block {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(word) if TRUE_WORDS.contains(&word.as_str()) => Some(true),
        Value::String(word) if FALSE_WORDS.contains(&word.as_str()) => Some(false),
        _ => None,
    }
}

impl ParamDeserializer for BoolDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        let flag = as_bool(&block)
            .ok_or_else(|| convert_error(set, name, format!("cannot convert {block} to bool")))?;
        set.set(name, Value::Bool(flag))
    }
}

/// Integer deserializer accepting integers and integer-valued strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerDeserializer;

impl ParamDeserializer for IntegerDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        let parsed = match &block {
            Value::Number(number) if number.is_i64() || number.is_u64() => Some(block.clone()),
            Value::String(text) => text.trim().parse::<i64>().ok().map(Value::from),
            _ => None,
        };
        let value = parsed
            .ok_or_else(|| convert_error(set, name, format!("cannot convert {block} to int")))?;
        set.set(name, value)
    }
}

/// Number deserializer accepting numbers and numeric strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumberDeserializer;

fn as_number(block: &Value) -> Option<Value> {
    match block {
        Value::Number(_) => Some(block.clone()),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

impl ParamDeserializer for NumberDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        let value = as_number(&block)
            .ok_or_else(|| convert_error(set, name, format!("cannot convert {block} to float")))?;
        set.set(name, value)
    }
}

/// String deserializer casting scalar blocks to their text form.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringDeserializer;

impl ParamDeserializer for StringDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        let text = match &block {
            Value::String(text) => Some(text.clone()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        };
        let value = text
            .ok_or_else(|| convert_error(set, name, format!("cannot convert {block} to str")))?;
        set.set(name, Value::String(value))
    }
}

/// List deserializer requiring a sequence block.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListDeserializer;

impl ParamDeserializer for ListDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        if !block.is_array() {
            return Err(convert_error(
                set,
                name,
                format!("cannot convert {block} to a sequence"),
            ));
        }
        set.set(name, block)
    }
}

/// Numeric tuple deserializer casting each element to a number.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumericTupleDeserializer;

impl ParamDeserializer for NumericTupleDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        let items = block.as_array().ok_or_else(|| {
            convert_error(set, name, format!("cannot convert {block} to a numeric tuple"))
        })?;
        let mut cast = Vec::with_capacity(items.len());
        for item in items {
            let number = as_number(item).ok_or_else(|| {
                convert_error(set, name, format!("cannot convert element {item} to a number"))
            })?;
            cast.push(number);
        }
        set.set(name, Value::Array(cast))
    }
}

/// Match `block` against the declared choices of `name`: first by value,
/// then by choice name.
fn resolve_choice(name: &str, block: &Value, set: &ParamSet) -> Option<Value> {
    let decl = set.decl(name)?;
    if decl.choices().is_empty() || decl.choice_name(block).is_some() {
        return Some(block.clone());
    }
    block
        .as_str()
        .and_then(|text| decl.choice_value(text))
        .cloned()
}

/// Selector deserializer matching a block to a declared choice by value or
/// name.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectorDeserializer;

impl ParamDeserializer for SelectorDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        let value = resolve_choice(name, &block, set).ok_or_else(|| {
            convert_error(set, name, format!("{block} is not among the declared choices"))
        })?;
        set.set(name, value)
    }
}

/// List selector deserializer matching each element by value or name.
///
/// A list selector is never none, only empty, so no none check is applied.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListSelectorDeserializer;

impl ParamDeserializer for ListSelectorDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        let items = block.as_array().ok_or_else(|| {
            convert_error(set, name, format!("cannot convert {block} to a sequence of choices"))
        })?;
        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            let value = resolve_choice(name, item, set).ok_or_else(|| {
                convert_error(set, name, format!("{item} is not among the declared choices"))
            })?;
            resolved.push(value);
        }
        set.set(name, Value::Array(resolved))
    }
}

/// Date deserializer driven by a format preference list.
///
/// Strings parse with the first matching format; integer blocks are Unix
/// timestamps. The parsed moment is stored in canonical string form.
#[derive(Clone, Debug)]
pub struct DateDeserializer {
    formats: Vec<String>,
}

impl DateDeserializer {
    /// Build a deserializer trying `formats`, most precise first.
    #[must_use]
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    fn parse(&self, block: &Value) -> Option<String> {
        let moment = match block {
            Value::String(text) => date::parse_with_formats(text, &self.formats),
            Value::Number(number) => number.as_i64().and_then(date::from_timestamp),
            _ => None,
        }?;
        date::canonical(moment)
    }
}

impl Default for DateDeserializer {
    fn default() -> Self {
        Self::new(
            date::DESERIALIZE_FORMATS
                .iter()
                .map(|&format| format.to_owned())
                .collect(),
        )
    }
}

impl ParamDeserializer for DateDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        let canonical = self.parse(&block).ok_or_else(|| {
            convert_error(set, name, format!("cannot convert {block} to datetime"))
        })?;
        set.set(name, Value::String(canonical))
    }
}

/// Date range deserializer. Applies [`DateDeserializer`] element-wise.
#[derive(Clone, Debug, Default)]
pub struct DateRangeDeserializer {
    inner: DateDeserializer,
}

impl DateRangeDeserializer {
    /// Build a deserializer trying `formats`, most precise first.
    #[must_use]
    pub fn new(formats: Vec<String>) -> Self {
        Self {
            inner: DateDeserializer::new(formats),
        }
    }
}

impl ParamDeserializer for DateRangeDeserializer {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        let items = block.as_array().ok_or_else(|| {
            convert_error(set, name, format!("cannot convert {block} to a date range"))
        })?;
        let mut range = Vec::with_capacity(items.len());
        for item in items {
            let canonical = self.inner.parse(item).ok_or_else(|| {
                convert_error(
                    set,
                    name,
                    format!("cannot convert {item} from {block} to datetime"),
                )
            })?;
            range.push(Value::String(canonical));
        }
        set.set(name, Value::Array(range))
    }
}

/// Wrapper that parses string blocks as JSON before delegating.
///
/// The default for container kinds when reading INI, where containers
/// arrive as JSON strings. Non-string blocks delegate untouched.
#[derive(Clone, Debug, Default)]
pub struct JsonStringDeserializer<D> {
    inner: D,
}

impl<D: ParamDeserializer> JsonStringDeserializer<D> {
    /// Wrap `inner`, JSON-decoding string blocks first.
    #[must_use]
    pub const fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: ParamDeserializer> ParamDeserializer for JsonStringDeserializer<D> {
    fn deserialize(&self, name: &str, block: Value, set: &mut ParamSet) -> ParamResult<()> {
        if none_check(name, &block, set)? {
            return Ok(());
        }
        let parsed = match &block {
            Value::String(text) => serde_json::from_str(text)
                .map_err(|e| convert_error(set, name, e.to_string()))?,
            _ => block,
        };
        self.inner.deserialize(name, parsed, set)
    }
}
