//! JSON document reading and writing.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use super::DocFormat;
use crate::error::{ParamError, ParamResult};

/// Layout of written JSON output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum JsonStyle {
    /// Newlines and two-space indentation.
    #[default]
    Pretty,
    /// The most compact encoding possible.
    Compact,
}

/// Parse a JSON document from `data`.
///
/// # Errors
///
/// Returns [`ParamError::Malformed`] when `data` is not valid JSON.
pub fn read_json_str(data: &str) -> ParamResult<Value> {
    serde_json::from_str(data).map_err(|e| ParamError::malformed(DocFormat::Json, e))
}

/// Read a JSON document from the file at `path`.
///
/// # Errors
///
/// Returns [`ParamError::File`] when the file cannot be read or parsed.
pub fn read_json_file(path: &Path) -> ParamResult<Value> {
    let data = std::fs::read_to_string(path).map_err(|e| ParamError::file(path, e))?;
    serde_json::from_str(&data).map_err(|e| ParamError::file(path, e))
}

/// Write `value` to `writer` as JSON in the requested `style`.
///
/// # Errors
///
/// Returns [`ParamError::Emit`] when serialization or the writer fails.
pub fn write_json(mut writer: impl Write, value: &Value, style: JsonStyle) -> ParamResult<()> {
    let outcome = match style {
        JsonStyle::Pretty => serde_json::to_writer_pretty(&mut writer, value),
        JsonStyle::Compact => serde_json::to_writer(&mut writer, value),
    };
    outcome.map_err(|e| ParamError::emit(DocFormat::Json, e))?;
    writer
        .write_all(b"\n")
        .map_err(|e| ParamError::emit(DocFormat::Json, e))
}

/// Write `value` to the file at `path` as JSON in the requested `style`.
///
/// # Errors
///
/// Returns [`ParamError::File`] when the file cannot be created or flushed
/// and [`ParamError::Emit`] when serialization fails.
pub fn write_json_file(path: &Path, value: &Value, style: JsonStyle) -> ParamResult<()> {
    let file = std::fs::File::create(path).map_err(|e| ParamError::file(path, e))?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, value, style)?;
    writer.flush().map_err(|e| ParamError::file(path, e))
}
