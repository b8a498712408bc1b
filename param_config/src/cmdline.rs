//! Clap-flattenable argument groups for loading and printing parameter
//! sets.
//!
//! Flatten [`ParamsReadArgs`] into a `clap::Parser` struct to let users
//! point the program at serialized parameter files, and
//! [`ParamsPrintArgs`] to let them dump the effective parameters back out.
//!
//! ```rust
//! use clap::Parser;
//! use param_config::cmdline::ParamsReadArgs;
//!
//! #[derive(Debug, Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     params: ParamsReadArgs,
//! }
//!
//! let cli = Cli::parse_from(["demo", "--read-json", "params.json"]);
//! assert_eq!(cli.params.read_json.len(), 1);
//! ```

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Args;

use crate::document::JsonStyle;
use crate::error::ParamResult;
use crate::schema::ParamSet;
use crate::serial::{
    DeserializeOptions, DeserializerRegistry, SerializeOptions, SerializerRegistry,
    deserialize_params_from_ini_file, deserialize_params_from_json_file,
    deserialize_params_from_yaml_file, serialize_params_to_ini, serialize_params_to_json,
    serialize_params_to_yaml,
};

/// Options for populating a parameter set from serialized files.
///
/// Files are applied in the order JSON, YAML, INI, each list in the order
/// given, so later files override earlier ones.
#[derive(Args, Clone, Debug, Default)]
pub struct ParamsReadArgs {
    /// Paths to JSON files deserialized into the parameter set.
    #[arg(long = "read-json", value_name = "PATH")]
    pub read_json: Vec<Utf8PathBuf>,
    /// Paths to YAML files deserialized into the parameter set.
    #[arg(long = "read-yaml", value_name = "PATH")]
    pub read_yaml: Vec<Utf8PathBuf>,
    /// Paths to INI files deserialized into the parameter set.
    #[arg(long = "read-ini", value_name = "PATH")]
    pub read_ini: Vec<Utf8PathBuf>,
}

impl ParamsReadArgs {
    /// Deserialize every listed file into `set`.
    ///
    /// JSON and YAML files use the standard registry; INI files use the
    /// JSON-string registry and the set's own name as the section. Unknown
    /// keys are warned about rather than rejected.
    ///
    /// # Errors
    ///
    /// Propagates read, parse, and deserialization failures.
    pub fn apply(&self, set: &mut ParamSet) -> ParamResult<()> {
        let standard = DeserializerRegistry::standard();
        let json_string = DeserializerRegistry::json_string();
        let options = DeserializeOptions::default();
        for path in &self.read_json {
            deserialize_params_from_json_file(path.as_std_path(), set, &standard, &options)?;
        }
        for path in &self.read_yaml {
            deserialize_params_from_yaml_file(path.as_std_path(), set, &standard, &options)?;
        }
        for path in &self.read_ini {
            deserialize_params_from_ini_file(
                path.as_std_path(),
                set,
                &json_string,
                &options,
                None,
            )?;
        }
        Ok(())
    }
}

/// Flags for printing a parameter set in a serialized format.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct ParamsPrintArgs {
    /// Print the effective parameters as JSON.
    #[arg(long = "print-json")]
    pub print_json: bool,
    /// Print the effective parameters as YAML.
    #[arg(long = "print-yaml")]
    pub print_yaml: bool,
    /// Print the effective parameters as INI.
    #[arg(long = "print-ini")]
    pub print_ini: bool,
}

impl ParamsPrintArgs {
    /// Write `set` to `writer` in each requested format, reporting whether
    /// anything was written.
    ///
    /// Callers typically exit once a print flag has been honoured.
    ///
    /// # Errors
    ///
    /// Propagates serialization and writer failures.
    pub fn write_requested(&self, set: &ParamSet, writer: &mut dyn Write) -> ParamResult<bool> {
        let standard = SerializerRegistry::standard();
        let options = SerializeOptions::default();
        let mut written = false;
        if self.print_json {
            serialize_params_to_json(&mut *writer, set, &standard, &options, JsonStyle::Pretty)?;
            written = true;
        }
        if self.print_yaml {
            serialize_params_to_yaml(&mut *writer, set, &standard, &options, true)?;
            written = true;
        }
        if self.print_ini {
            let json_string = SerializerRegistry::json_string();
            serialize_params_to_ini(&mut *writer, set, &json_string, &options, true, None)?;
            written = true;
        }
        Ok(written)
    }
}
