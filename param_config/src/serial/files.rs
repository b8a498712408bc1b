//! File-level compositions of whole-set operations with document I/O.
//!
//! JSON and YAML hold one parameter set per document. INI holds one section
//! per parameter set: a single set serializes into a section named after an
//! override or the set itself, and a group of sets maps sections to sets.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde_json::{Map, Value};

use super::apply::{DeserializeOptions, SerializeOptions, SerializedParams};
use super::registry::{DeserializerRegistry, SerializerRegistry};
use super::{deserialize_params, serialize_params};
use crate::document::{
    DocFormat, HelpMap, JsonStyle, read_ini_file, read_ini_str, read_json_file, read_json_str,
    read_yaml_file, read_yaml_str, write_ini, write_json, write_yaml,
};
use crate::error::{ParamError, ParamResult};
use crate::schema::ParamSet;

fn help_to_map(help: &BTreeMap<String, String>) -> HelpMap {
    help.iter()
        .map(|(name, text)| (name.clone(), Value::String(text.clone())))
        .collect()
}

fn root_object(document: Value, format: DocFormat) -> ParamResult<Map<String, Value>> {
    match document {
        Value::Object(map) => Ok(map),
        other => Err(ParamError::malformed(
            format,
            std::io::Error::other(format!(
                "the document root must be a mapping, got a {} root",
                crate::combine::RootKind::of(&other)
            )),
        )),
    }
}

/// Serialize `set` to `writer` as JSON.
///
/// # Errors
///
/// Propagates [`serialize_params`] and [`write_json`] failures.
pub fn serialize_params_to_json(
    writer: impl Write,
    set: &ParamSet,
    registry: &SerializerRegistry,
    options: &SerializeOptions,
    style: JsonStyle,
) -> ParamResult<()> {
    let serialized = serialize_params(set, registry, options)?;
    write_json(writer, &Value::Object(serialized.values), style)
}

/// Serialize `set` to the file at `path` as JSON.
///
/// # Errors
///
/// Propagates [`serialize_params_to_json`] failures plus file creation
/// errors.
pub fn serialize_params_to_json_file(
    path: &Path,
    set: &ParamSet,
    registry: &SerializerRegistry,
    options: &SerializeOptions,
    style: JsonStyle,
) -> ParamResult<()> {
    let file = std::fs::File::create(path).map_err(|e| ParamError::file(path, e))?;
    let mut writer = std::io::BufWriter::new(file);
    serialize_params_to_json(&mut writer, set, registry, options, style)?;
    writer.flush().map_err(|e| ParamError::file(path, e))
}

/// Serialize `set` to `writer` as YAML, with a help comment block when
/// `include_help` is set.
///
/// # Errors
///
/// Propagates [`serialize_params`] and [`write_yaml`] failures.
pub fn serialize_params_to_yaml(
    writer: impl Write,
    set: &ParamSet,
    registry: &SerializerRegistry,
    options: &SerializeOptions,
    include_help: bool,
) -> ParamResult<()> {
    let serialized = serialize_params(set, registry, options)?;
    let help = include_help.then(|| help_to_map(&serialized.help));
    write_yaml(writer, &Value::Object(serialized.values), help.as_ref())
}

/// Serialize `set` to the file at `path` as YAML.
///
/// # Errors
///
/// Propagates [`serialize_params_to_yaml`] failures plus file creation
/// errors.
pub fn serialize_params_to_yaml_file(
    path: &Path,
    set: &ParamSet,
    registry: &SerializerRegistry,
    options: &SerializeOptions,
    include_help: bool,
) -> ParamResult<()> {
    let file = std::fs::File::create(path).map_err(|e| ParamError::file(path, e))?;
    let mut writer = std::io::BufWriter::new(file);
    serialize_params_to_yaml(&mut writer, set, registry, options, include_help)?;
    writer.flush().map_err(|e| ParamError::file(path, e))
}

fn section_name<'a>(section: Option<&'a str>, set: &'a ParamSet) -> &'a str {
    section.unwrap_or_else(|| set.name())
}

fn sections_document(
    rendered: Vec<(String, SerializedParams)>,
    include_help: bool,
) -> (Value, Option<HelpMap>) {
    let mut sections = Map::new();
    let mut help = HelpMap::new();
    for (section, serialized) in rendered {
        if include_help && !serialized.help.is_empty() {
            help.insert(
                section.clone(),
                Value::Object(help_to_map(&serialized.help)),
            );
        }
        sections.insert(section, Value::Object(serialized.values));
    }
    (Value::Object(sections), include_help.then_some(help))
}

/// Serialize `set` to `writer` as INI, into the section `section` (the
/// set's own name when `None`).
///
/// Callers normally pass [`SerializerRegistry::json_string`] so container
/// values arrive as JSON strings.
///
/// # Errors
///
/// Propagates [`serialize_params`] and [`write_ini`] failures.
pub fn serialize_params_to_ini(
    writer: impl Write,
    set: &ParamSet,
    registry: &SerializerRegistry,
    options: &SerializeOptions,
    include_help: bool,
    section: Option<&str>,
) -> ParamResult<()> {
    let serialized = serialize_params(set, registry, options)?;
    let rendered = vec![(section_name(section, set).to_owned(), serialized)];
    let (document, help) = sections_document(rendered, include_help);
    write_ini(writer, &document, help.as_ref(), "#")
}

/// Serialize `set` to the file at `path` as INI.
///
/// # Errors
///
/// Propagates [`serialize_params_to_ini`] failures plus file creation
/// errors.
pub fn serialize_params_to_ini_file(
    path: &Path,
    set: &ParamSet,
    registry: &SerializerRegistry,
    options: &SerializeOptions,
    include_help: bool,
    section: Option<&str>,
) -> ParamResult<()> {
    let file = std::fs::File::create(path).map_err(|e| ParamError::file(path, e))?;
    let mut writer = std::io::BufWriter::new(file);
    serialize_params_to_ini(&mut writer, set, registry, options, include_help, section)?;
    writer.flush().map_err(|e| ParamError::file(path, e))
}

/// Serialize a group of sets to `writer` as INI, one section per set.
///
/// # Errors
///
/// Propagates [`serialize_params`] and [`write_ini`] failures.
pub fn serialize_sections_to_ini(
    writer: impl Write,
    sections: &BTreeMap<String, ParamSet>,
    registry: &SerializerRegistry,
    options: &SerializeOptions,
    include_help: bool,
) -> ParamResult<()> {
    let mut rendered = Vec::with_capacity(sections.len());
    for (section, set) in sections {
        rendered.push((section.clone(), serialize_params(set, registry, options)?));
    }
    let (document, help) = sections_document(rendered, include_help);
    write_ini(writer, &document, help.as_ref(), "#")
}

/// Deserialize a JSON document in `data` into `set`.
///
/// # Errors
///
/// Propagates parse failures and [`deserialize_params`] failures.
pub fn deserialize_params_from_json_str(
    data: &str,
    set: &mut ParamSet,
    registry: &DeserializerRegistry,
    options: &DeserializeOptions,
) -> ParamResult<()> {
    let document = root_object(read_json_str(data)?, DocFormat::Json)?;
    deserialize_params(&document, set, registry, options)
}

/// Deserialize the JSON file at `path` into `set`.
///
/// # Errors
///
/// Propagates read and parse failures and [`deserialize_params`] failures.
pub fn deserialize_params_from_json_file(
    path: &Path,
    set: &mut ParamSet,
    registry: &DeserializerRegistry,
    options: &DeserializeOptions,
) -> ParamResult<()> {
    let document = root_object(read_json_file(path)?, DocFormat::Json)?;
    deserialize_params(&document, set, registry, options)
}

/// Deserialize a YAML document in `data` into `set`.
///
/// # Errors
///
/// Propagates parse failures and [`deserialize_params`] failures.
pub fn deserialize_params_from_yaml_str(
    data: &str,
    set: &mut ParamSet,
    registry: &DeserializerRegistry,
    options: &DeserializeOptions,
) -> ParamResult<()> {
    let document = root_object(read_yaml_str(data)?, DocFormat::Yaml)?;
    deserialize_params(&document, set, registry, options)
}

/// Deserialize the YAML file at `path` into `set`.
///
/// # Errors
///
/// Propagates read and parse failures and [`deserialize_params`] failures.
pub fn deserialize_params_from_yaml_file(
    path: &Path,
    set: &mut ParamSet,
    registry: &DeserializerRegistry,
    options: &DeserializeOptions,
) -> ParamResult<()> {
    let document = root_object(read_yaml_file(path)?, DocFormat::Yaml)?;
    deserialize_params(&document, set, registry, options)
}

fn ini_section(
    document: Value,
    section: &str,
) -> ParamResult<Map<String, Value>> {
    let mut sections = root_object(document, DocFormat::Ini)?;
    match sections.remove(section) {
        Some(Value::Object(body)) => Ok(body),
        _ => Err(ParamError::MissingSection {
            section: section.to_owned(),
        }),
    }
}

/// Deserialize one section of an INI document in `data` into `set`.
///
/// The section defaults to the set's own name. Callers normally pass
/// [`DeserializerRegistry::json_string`] so container values parse from
/// JSON strings.
///
/// # Errors
///
/// Returns [`ParamError::MissingSection`] when the section is absent, plus
/// parse and [`deserialize_params`] failures.
pub fn deserialize_params_from_ini_str(
    data: &str,
    set: &mut ParamSet,
    registry: &DeserializerRegistry,
    options: &DeserializeOptions,
    section: Option<&str>,
) -> ParamResult<()> {
    let body = ini_section(read_ini_str(data)?, section_name(section, set))?;
    deserialize_params(&body, set, registry, options)
}

/// Deserialize one section of the INI file at `path` into `set`.
///
/// # Errors
///
/// As [`deserialize_params_from_ini_str`], plus read failures.
pub fn deserialize_params_from_ini_file(
    path: &Path,
    set: &mut ParamSet,
    registry: &DeserializerRegistry,
    options: &DeserializeOptions,
    section: Option<&str>,
) -> ParamResult<()> {
    let body = ini_section(read_ini_file(path)?, section_name(section, set))?;
    deserialize_params(&body, set, registry, options)
}

/// Deserialize an INI document in `data` into a group of sets, one section
/// per set.
///
/// Sections with no matching set are warned about and skipped.
///
/// # Errors
///
/// Propagates parse and [`deserialize_params`] failures.
pub fn deserialize_sections_from_ini_str(
    data: &str,
    sets: &mut BTreeMap<String, ParamSet>,
    registry: &DeserializerRegistry,
    options: &DeserializeOptions,
) -> ParamResult<()> {
    let sections = root_object(read_ini_str(data)?, DocFormat::Ini)?;
    for (section, body) in sections {
        let Some(set) = sets.get_mut(&section) else {
            tracing::warn!(section = section.as_str(), "no parameter set for section");
            continue;
        };
        let entries = match body {
            Value::Object(map) => map,
            _ => continue,
        };
        deserialize_params(&entries, set, registry, options)?;
    }
    Ok(())
}
