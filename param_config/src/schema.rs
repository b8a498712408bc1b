//! Parameter declarations and the sets that hold their values.
//!
//! A [`ParamSet`] is a named, ordered collection of [`ParamDecl`]
//! declarations plus current values stored as [`serde_json::Value`]. The
//! declared [`ParamKind`] drives handler resolution during (de)serialization
//! and light validation when values are stored.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{ParamError, ParamResult};

/// Declared kind of a parameter.
///
/// The kind selects the built-in (de)serialization handler when no per-name
/// or per-kind override is registered. [`ParamKind::Custom`] kinds carry no
/// built-in handler; resolving one without an explicit registration is an
/// error.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum ParamKind {
    /// A boolean flag.
    Bool,
    /// An integer.
    Integer,
    /// A floating-point number.
    Number,
    /// A text string.
    String,
    /// A sequence of arbitrary values.
    List,
    /// A mapping of string keys to arbitrary values.
    Dict,
    /// A fixed-shape sequence of arbitrary values.
    Tuple,
    /// A fixed-shape sequence of numbers.
    NumericTuple,
    /// A calendar date and time.
    Date,
    /// A pair of calendar dates and times.
    DateRange,
    /// A single choice from a declared set of named values.
    Selector,
    /// A sequence of choices from a declared set of named values.
    ListSelector,
    /// An application-defined kind with no built-in handler.
    Custom(&'static str),
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Tuple => "tuple",
            Self::NumericTuple => "numeric tuple",
            Self::Date => "date",
            Self::DateRange => "date range",
            Self::Selector => "selector",
            Self::ListSelector => "list selector",
            Self::Custom(tag) => tag,
        };
        f.write_str(label)
    }
}

/// Declaration of a single parameter.
#[derive(Clone, Debug)]
pub struct ParamDecl {
    kind: ParamKind,
    doc: Option<String>,
    allow_none: bool,
    choices: Vec<(String, Value)>,
    default: Value,
}

impl ParamDecl {
    /// Declare a parameter of `kind` with a null default and no doc string.
    #[must_use]
    pub const fn new(kind: ParamKind) -> Self {
        Self {
            kind,
            doc: None,
            allow_none: false,
            choices: Vec::new(),
            default: Value::Null,
        }
    }

    /// Declare a selector over `choices`, each a `(name, value)` pair.
    #[must_use]
    pub fn selector(choices: Vec<(String, Value)>) -> Self {
        Self {
            choices,
            ..Self::new(ParamKind::Selector)
        }
    }

    /// Declare a list selector over `choices`, each a `(name, value)` pair.
    #[must_use]
    pub fn list_selector(choices: Vec<(String, Value)>) -> Self {
        Self {
            choices,
            ..Self::new(ParamKind::ListSelector)
        }
    }

    /// Attach a doc string, surfaced in serialized help output.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the default value stored when the parameter is first declared.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }

    /// Permit null as a stored value.
    #[must_use]
    pub const fn allow_none(mut self) -> Self {
        self.allow_none = true;
        self
    }

    /// Declared kind of the parameter.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Doc string attached to the declaration, if any.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Whether null is a permitted stored value.
    #[must_use]
    pub const fn allows_none(&self) -> bool {
        self.allow_none
    }

    /// Declared `(name, value)` choices for selector kinds.
    #[must_use]
    pub fn choices(&self) -> &[(String, Value)] {
        &self.choices
    }

    /// Default value stored when the parameter is first declared.
    #[must_use]
    pub const fn default(&self) -> &Value {
        &self.default
    }

    /// Reverse-look up the declared name for `value` among the choices.
    #[must_use]
    pub fn choice_name(&self, value: &Value) -> Option<&str> {
        self.choices
            .iter()
            .find(|(_, candidate)| candidate == value)
            .map(|(name, _)| name.as_str())
    }

    /// Look up the declared value for the choice called `name`.
    #[must_use]
    pub fn choice_value(&self, name: &str) -> Option<&Value> {
        self.choices
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| value)
    }
}

/// A named, ordered collection of parameter declarations and values.
///
/// Parameters iterate in name order, which keeps serialized output
/// deterministic.
#[derive(Clone, Debug)]
pub struct ParamSet {
    name: String,
    decls: BTreeMap<String, ParamDecl>,
    values: BTreeMap<String, Value>,
}

impl ParamSet {
    /// Create an empty set called `name`.
    ///
    /// The name labels conversion errors and provides the default INI
    /// section when the set is serialized on its own.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decls: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    /// Declare a parameter, storing its default as the current value.
    ///
    /// Re-declaring a name replaces the previous declaration and value.
    pub fn declare(&mut self, name: impl Into<String>, decl: ParamDecl) -> &mut Self {
        let key = name.into();
        self.values.insert(key.clone(), decl.default.clone());
        self.decls.insert(key, decl);
        self
    }

    /// Name of the set.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaration for `name`, if declared.
    #[must_use]
    pub fn decl(&self, name: &str) -> Option<&ParamDecl> {
        self.decls.get(name)
    }

    /// Current value for `name`, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    /// Declared parameter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decls.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Store `value` for the declared parameter `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::UnknownParam`] when `name` is not declared and
    /// [`ParamError::Convert`] when `value` does not fit the declared kind.
    pub fn set(&mut self, name: &str, value: Value) -> ParamResult<()> {
        let decl = self.decls.get(name).ok_or_else(|| ParamError::UnknownParam {
            owner: self.name.clone(),
            name: name.to_owned(),
        })?;
        if let Err(message) = check_kind(decl, &value) {
            return Err(ParamError::convert(self.name.as_str(), name, message));
        }
        self.values.insert(name.to_owned(), value);
        Ok(())
    }
}

/// Validate `value` against `decl`, returning a message on mismatch.
fn check_kind(decl: &ParamDecl, value: &Value) -> Result<(), String> {
    if value.is_null() {
        if decl.allows_none() {
            return Ok(());
        }
        return Err("null is not permitted".to_owned());
    }
    match decl.kind() {
        ParamKind::Bool => expect(value.is_boolean(), "a boolean", value),
        ParamKind::Integer => expect(value.is_i64() || value.is_u64(), "an integer", value),
        ParamKind::Number => expect(value.is_number(), "a number", value),
        ParamKind::String => expect(value.is_string(), "a string", value),
        ParamKind::List | ParamKind::Tuple => expect(value.is_array(), "a sequence", value),
        ParamKind::Dict => expect(value.is_object(), "a mapping", value),
        ParamKind::NumericTuple => check_numeric_tuple(value),
        ParamKind::Date => expect(
            value.is_string() || value.is_i64() || value.is_u64(),
            "a date string or integer timestamp",
            value,
        ),
        ParamKind::DateRange => check_date_range(value),
        ParamKind::Selector => check_selector(decl, value),
        ParamKind::ListSelector => check_list_selector(decl, value),
        ParamKind::Custom(_) => Ok(()),
    }
}

fn expect(ok: bool, wanted: &str, value: &Value) -> Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("expected {wanted}, got {value}"))
    }
}

fn check_numeric_tuple(value: &Value) -> Result<(), String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected a sequence of numbers, got {value}"))?;
    if items.iter().all(Value::is_number) {
        Ok(())
    } else {
        Err(format!("expected a sequence of numbers, got {value}"))
    }
}

fn check_date_range(value: &Value) -> Result<(), String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected a pair of dates, got {value}"))?;
    if items.len() == 2 {
        Ok(())
    } else {
        Err(format!("expected a pair of dates, got {} elements", items.len()))
    }
}

fn check_selector(decl: &ParamDecl, value: &Value) -> Result<(), String> {
    if decl.choices().is_empty() || decl.choice_name(value).is_some() {
        Ok(())
    } else {
        Err(format!("{value} is not among the declared choices"))
    }
}

fn check_list_selector(decl: &ParamDecl, value: &Value) -> Result<(), String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected a sequence of choices, got {value}"))?;
    if decl.choices().is_empty() {
        return Ok(());
    }
    items
        .iter()
        .find(|item| decl.choice_name(item).is_none())
        .map_or(Ok(()), |item| {
            Err(format!("{item} is not among the declared choices"))
        })
}
