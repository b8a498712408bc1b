//! Subcommand implementations.

use std::path::Path;

use camino::Utf8PathBuf;
use param_config::combine::{MergePolicy, combine_documents};
use param_config::document::{
    JsonStyle, read_ini_file, read_json_file, read_yaml_file, write_ini, write_ini_file,
    write_json, write_json_file, write_yaml, write_yaml_file,
};
use param_config::ParamResult;
use serde_json::Value;

use crate::cli::{Cli, Command, CombineIniArgs, CombineJsonArgs, CombineYamlArgs};
use crate::error::CliError;

/// Dispatch the parsed command line.
///
/// # Errors
///
/// Propagates read, merge, and write failures from the selected
/// subcommand.
pub fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::CombineJson(args) => combine_json(&args),
        Command::CombineYaml(args) => combine_yaml(&args),
        Command::CombineIni(args) => combine_ini(&args),
    }
}

/// Split the positional paths into sources and the trailing destination.
fn sources_and_dest(paths: &[Utf8PathBuf]) -> Result<(&[Utf8PathBuf], &Utf8PathBuf), CliError> {
    match paths.split_last() {
        Some((dest, sources)) if !sources.is_empty() => Ok((sources, dest)),
        _ => Err(CliError::Usage),
    }
}

fn read_all(
    paths: &[Utf8PathBuf],
    reader: fn(&Path) -> ParamResult<Value>,
) -> Result<Vec<Value>, CliError> {
    paths
        .iter()
        .map(|path| reader(path.as_std_path()).map_err(CliError::from))
        .collect()
}

const fn policy(nested: bool) -> MergePolicy {
    if nested {
        MergePolicy::Nested
    } else {
        MergePolicy::Clobber
    }
}

fn combine_json(args: &CombineJsonArgs) -> Result<(), CliError> {
    let (sources, dest) = sources_and_dest(&args.paths)?;
    let documents = read_all(sources, read_json_file)?;
    let merged = combine_documents(documents, policy(args.nested))?;
    let style = if args.compact {
        JsonStyle::Compact
    } else {
        JsonStyle::Pretty
    };
    if dest.as_str() == "-" {
        write_json(std::io::stdout().lock(), &merged, style)?;
    } else {
        write_json_file(dest.as_std_path(), &merged, style)?;
    }
    Ok(())
}

fn combine_yaml(args: &CombineYamlArgs) -> Result<(), CliError> {
    let (sources, dest) = sources_and_dest(&args.paths)?;
    let documents = read_all(sources, read_yaml_file)?;
    let merged = combine_documents(documents, policy(args.nested))?;
    if dest.as_str() == "-" {
        write_yaml(std::io::stdout().lock(), &merged, None)?;
    } else {
        write_yaml_file(dest.as_std_path(), &merged, None)?;
    }
    Ok(())
}

fn combine_ini(args: &CombineIniArgs) -> Result<(), CliError> {
    let (sources, dest) = sources_and_dest(&args.paths)?;
    let documents = read_all(sources, read_ini_file)?;
    // INI combination is inherently depth-1 nested: sections union, keys
    // within a section clobber.
    let merged = combine_documents(documents, MergePolicy::Nested)?;
    if dest.as_str() == "-" {
        write_ini(std::io::stdout().lock(), &merged, None, "#")?;
    } else {
        write_ini_file(dest.as_std_path(), &merged, None, "#")?;
    }
    Ok(())
}
