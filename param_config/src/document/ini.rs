//! INI document reading and writing.
//!
//! INI documents are two levels deep: sections map keys to scalar values.
//! A key with an empty value reads as null, and null writes back as an
//! empty value. `#` and `;` comments are discarded on read.

use std::io::{BufWriter, Write};
use std::path::Path;

use ini::{EscapePolicy, Ini, Properties};
use serde_json::{Map, Value};

use super::{DocFormat, HelpMap};
use crate::error::{ParamError, ParamResult};

/// Parse an INI document from `data` into a sections mapping.
///
/// # Errors
///
/// Returns [`ParamError::Malformed`] when `data` is not valid INI or
/// contains properties outside of any section.
pub fn read_ini_str(data: &str) -> ParamResult<Value> {
    let ini =
        Ini::load_from_str_noescape(data).map_err(|e| ParamError::malformed(DocFormat::Ini, e))?;
    ini_to_value(&ini)
}

/// Read an INI document from the file at `path` into a sections mapping.
///
/// # Errors
///
/// Returns [`ParamError::File`] when the file cannot be read or parsed.
pub fn read_ini_file(path: &Path) -> ParamResult<Value> {
    let data = std::fs::read_to_string(path).map_err(|e| ParamError::file(path, e))?;
    read_ini_str(&data).map_err(|source| ParamError::File {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

fn ini_to_value(ini: &Ini) -> ParamResult<Value> {
    let mut root = Map::new();
    for (section, props) in ini.iter() {
        let Some(name) = section else {
            if props.iter().next().is_some() {
                return Err(ParamError::malformed(
                    DocFormat::Ini,
                    std::io::Error::other("property outside of any section"),
                ));
            }
            continue;
        };
        let mut body = Map::new();
        for (key, raw) in props.iter() {
            let value = if raw.is_empty() {
                Value::Null
            } else {
                Value::String(raw.to_owned())
            };
            body.insert(key.to_owned(), value);
        }
        root.insert(name.to_owned(), Value::Object(body));
    }
    Ok(Value::Object(root))
}

/// Write `value` to `writer` as INI.
///
/// `value` must be a mapping of sections to mappings of scalar values.
/// When `help` is present and non-empty it is rendered first as a
/// `== Help ==` comment block with `help_prefix` starting each line.
///
/// # Errors
///
/// Returns [`ParamError::IniLayout`] when `value` does not fit the
/// sections-to-scalars shape and [`ParamError::Emit`] when the writer
/// fails.
pub fn write_ini(
    mut writer: impl Write,
    value: &Value,
    help: Option<&HelpMap>,
    help_prefix: &str,
) -> ParamResult<()> {
    let sections = value.as_object().ok_or_else(|| ParamError::IniLayout {
        message: "the document root must be a mapping of sections".to_owned(),
    })?;
    if let Some(help_map) = help.filter(|entries| !entries.is_empty()) {
        write_help_block(&mut writer, help_map, help_prefix)?;
    }
    let ini = sections_to_ini(sections)?;
    ini.write_to_policy(&mut writer, EscapePolicy::Nothing)
        .map_err(|e| ParamError::emit(DocFormat::Ini, e))
}

fn sections_to_ini(sections: &Map<String, Value>) -> ParamResult<Ini> {
    let mut ini = Ini::new();
    for (section, body) in sections {
        let entries = body.as_object().ok_or_else(|| ParamError::IniLayout {
            message: format!("section '{section}' must be a mapping of scalar values"),
        })?;
        let props = ini.entry(Some(section.clone())).or_insert(Properties::new());
        for (key, leaf) in entries {
            let text = scalar_text(leaf).ok_or_else(|| ParamError::IniLayout {
                message: format!("value at '{section}.{key}' is not a scalar"),
            })?;
            props.insert(key.clone(), text);
        }
    }
    Ok(ini)
}

fn write_help_block(
    writer: &mut impl Write,
    help_map: &HelpMap,
    help_prefix: &str,
) -> ParamResult<()> {
    let mut block = format!("{help_prefix} == Help ==\n");
    for (section, body) in help_map {
        let Some(entries) = body.as_object().filter(|map| !map.is_empty()) else {
            continue;
        };
        block.push_str(&format!("{help_prefix} [{section}]\n"));
        for (key, text) in entries {
            let line = text.as_str().map_or_else(|| text.to_string(), str::to_owned);
            block.push_str(&format!("{help_prefix} {key}: {line}\n"));
        }
        block.push('\n');
    }
    writer
        .write_all(block.as_bytes())
        .map_err(|e| ParamError::emit(DocFormat::Ini, e))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Write `value` to the file at `path` as INI.
///
/// # Errors
///
/// Returns [`ParamError::File`] when the file cannot be created or flushed,
/// plus the layout and writer errors of [`write_ini`].
pub fn write_ini_file(
    path: &Path,
    value: &Value,
    help: Option<&HelpMap>,
    help_prefix: &str,
) -> ParamResult<()> {
    let file = std::fs::File::create(path).map_err(|e| ParamError::file(path, e))?;
    let mut writer = BufWriter::new(file);
    write_ini(&mut writer, value, help, help_prefix)?;
    writer.flush().map_err(|e| ParamError::file(path, e))
}
