//! Command-line interface definitions for `param-config`.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Parsed CLI arguments for `param-config`.
#[derive(Debug, Parser)]
#[command(name = "param-config")]
#[command(about = "Combine structured configuration files")]
#[command(version)]
pub struct Cli {
    /// Suppress warnings.
    #[arg(long, global = true)]
    pub quiet: bool,
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands supported by `param-config`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Combine JSON files.
    ///
    /// If all source files are sequences, they are appended together. If
    /// all are mappings, later values clobber earlier ones on key
    /// collision; with `--nested`, colliding mappings are merged
    /// recursively and keys absent from the newer file persist. Mixing
    /// root kinds is an error.
    CombineJson(CombineJsonArgs),
    /// Combine YAML files.
    ///
    /// Merge semantics match `combine-json`. Whether comments survive
    /// depends on the parsing backend; this one discards them.
    CombineYaml(CombineYamlArgs),
    /// Combine INI files.
    ///
    /// Sections are unioned and keys within a section are clobbered by
    /// later files. Comments (anything after a `#` or `;`) are ignored.
    CombineIni(CombineIniArgs),
}

/// Arguments for `combine-json`.
#[derive(Args, Clone, Debug)]
pub struct CombineJsonArgs {
    /// Paths to read from, then the path to write to (`-` for stdout).
    #[arg(value_name = "PATH", num_args = 2.., required = true)]
    pub paths: Vec<Utf8PathBuf>,
    /// Encode structures in the most compact way possible instead of
    /// pretty-printing with 2-space indentation.
    #[arg(long)]
    pub compact: bool,
    /// Resolve mapping collisions by descending into children.
    #[arg(long)]
    pub nested: bool,
}

/// Arguments for `combine-yaml`.
#[derive(Args, Clone, Debug)]
pub struct CombineYamlArgs {
    /// Paths to read from, then the path to write to (`-` for stdout).
    #[arg(value_name = "PATH", num_args = 2.., required = true)]
    pub paths: Vec<Utf8PathBuf>,
    /// Resolve mapping collisions by descending into children.
    #[arg(long)]
    pub nested: bool,
}

/// Arguments for `combine-ini`.
#[derive(Args, Clone, Debug)]
pub struct CombineIniArgs {
    /// Paths to read from, then the path to write to (`-` for stdout).
    #[arg(value_name = "PATH", num_args = 2.., required = true)]
    pub paths: Vec<Utf8PathBuf>,
}
