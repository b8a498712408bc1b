//! YAML document reading and writing.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use super::{DocFormat, HelpMap};
use crate::error::{ParamError, ParamResult};

/// Parse a YAML document from `data`.
///
/// An empty (or whitespace-only) document parses as null. Mappings must use
/// string keys.
///
/// # Errors
///
/// Returns [`ParamError::Malformed`] when `data` is not valid YAML.
pub fn read_yaml_str(data: &str) -> ParamResult<Value> {
    if data.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(data).map_err(|e| ParamError::malformed(DocFormat::Yaml, e))
}

/// Read a YAML document from the file at `path`.
///
/// # Errors
///
/// Returns [`ParamError::File`] when the file cannot be read or parsed.
pub fn read_yaml_file(path: &Path) -> ParamResult<Value> {
    let data = std::fs::read_to_string(path).map_err(|e| ParamError::file(path, e))?;
    if data.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(&data).map_err(|e| ParamError::file(path, e))
}

/// Write `value` to `writer` as YAML.
///
/// When `help` is present and non-empty it is rendered first as a
/// `== Help ==` comment block, one `#`-prefixed line per rendered YAML line.
///
/// # Errors
///
/// Returns [`ParamError::Emit`] when serialization or the writer fails.
pub fn write_yaml(mut writer: impl Write, value: &Value, help: Option<&HelpMap>) -> ParamResult<()> {
    if let Some(help_map) = help.filter(|entries| !entries.is_empty()) {
        write_help_block(&mut writer, help_map)?;
    }
    serde_yaml::to_writer(&mut writer, value).map_err(|e| ParamError::emit(DocFormat::Yaml, e))
}

fn write_help_block(writer: &mut impl Write, help_map: &HelpMap) -> ParamResult<()> {
    let rendered = serde_yaml::to_string(&Value::Object(help_map.clone()))
        .map_err(|e| ParamError::emit(DocFormat::Yaml, e))?;
    let mut block = String::from("# == Help ==\n");
    for line in rendered.lines() {
        block.push_str("# ");
        block.push_str(line);
        block.push('\n');
    }
    writer
        .write_all(block.as_bytes())
        .map_err(|e| ParamError::emit(DocFormat::Yaml, e))
}

/// Write `value` to the file at `path` as YAML.
///
/// # Errors
///
/// Returns [`ParamError::File`] when the file cannot be created or flushed
/// and [`ParamError::Emit`] when serialization fails.
pub fn write_yaml_file(path: &Path, value: &Value, help: Option<&HelpMap>) -> ParamResult<()> {
    let file = std::fs::File::create(path).map_err(|e| ParamError::file(path, e))?;
    let mut writer = BufWriter::new(file);
    write_yaml(&mut writer, value, help)?;
    writer.flush().map_err(|e| ParamError::file(path, e))
}
