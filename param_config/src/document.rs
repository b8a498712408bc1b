//! Reading and writing configuration documents in the supported text
//! formats.
//!
//! Documents are [`serde_json::Value`] trees whatever the on-disk format.
//! JSON and YAML map onto the tree directly; INI documents are mappings of
//! sections to mappings of keys to scalar values, where an empty INI value
//! reads as null.

use std::fmt;

mod ini;
mod json;
mod yaml;

pub use ini::{read_ini_file, read_ini_str, write_ini, write_ini_file};
pub use json::{JsonStyle, read_json_file, read_json_str, write_json, write_json_file};
pub use yaml::{read_yaml_file, read_yaml_str, write_yaml, write_yaml_file};

/// Help strings rendered as comment blocks above YAML and INI output.
///
/// Entries are either strings or one further level of mappings to strings
/// (INI sections).
pub type HelpMap = serde_json::Map<String, serde_json::Value>;

/// Text format of a configuration document.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocFormat {
    /// JavaScript Object Notation.
    Json,
    /// YAML Ain't Markup Language.
    Yaml,
    /// INI configuration syntax.
    Ini,
}

impl fmt::Display for DocFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Ini => "INI",
        };
        f.write_str(label)
    }
}
