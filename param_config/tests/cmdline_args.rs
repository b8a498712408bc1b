//! Integration tests for the clap-flattenable argument groups.

use anyhow::{Result, ensure};
use clap::Parser;
use param_config::cmdline::{ParamsPrintArgs, ParamsReadArgs};
use param_config::{ParamDecl, ParamKind, ParamSet};
use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

#[derive(Debug, Parser)]
struct TestCli {
    #[command(flatten)]
    read: ParamsReadArgs,
    #[command(flatten)]
    print: ParamsPrintArgs,
}

#[fixture]
fn training() -> ParamSet {
    let mut set = ParamSet::new("training");
    set.declare(
        "lr",
        ParamDecl::new(ParamKind::Number).with_default(json!(0.1)),
    )
    .declare(
        "layers",
        ParamDecl::new(ParamKind::List).with_default(json!([])),
    );
    set
}

#[rstest]
fn read_args_apply_files_in_format_order(training: ParamSet) -> Result<()> {
    let dir = TempDir::new()?;
    let json_path = dir.path().join("a.json");
    let yaml_path = dir.path().join("b.yaml");
    std::fs::write(&json_path, "{\"lr\": 0.5}\n")?;
    std::fs::write(&yaml_path, "lr: 0.25\n")?;

    let cli = TestCli::parse_from([
        "demo",
        "--read-json",
        json_path.to_string_lossy().as_ref(),
        "--read-yaml",
        yaml_path.to_string_lossy().as_ref(),
    ]);
    let mut set = training;
    cli.read.apply(&mut set)?;
    ensure!(
        set.get("lr") == Some(&json!(0.25)),
        "the YAML file must override the JSON file"
    );
    Ok(())
}

#[rstest]
fn read_args_use_the_json_string_registry_for_ini(training: ParamSet) -> Result<()> {
    let dir = TempDir::new()?;
    let ini_path = dir.path().join("params.ini");
    std::fs::write(&ini_path, "[training]\nlayers = [128, 64]\nlr = 0.3\n")?;

    let cli = TestCli::parse_from(["demo", "--read-ini", ini_path.to_string_lossy().as_ref()]);
    let mut set = training;
    cli.read.apply(&mut set)?;
    ensure!(
        set.get("layers") == Some(&json!([128, 64])),
        "INI container values must parse as JSON strings"
    );
    ensure!(set.get("lr") == Some(&json!(0.3)), "lr not applied");
    Ok(())
}

#[rstest]
fn print_args_report_whether_anything_was_written(training: ParamSet) -> Result<()> {
    let quiet = TestCli::parse_from(["demo"]);
    let mut sink = Vec::new();
    ensure!(
        !quiet.print.write_requested(&training, &mut sink)?,
        "nothing requested, nothing written"
    );
    ensure!(sink.is_empty(), "writer must stay untouched");

    let printing = TestCli::parse_from(["demo", "--print-json"]);
    ensure!(
        printing.print.write_requested(&training, &mut sink)?,
        "a requested print must be reported"
    );
    let text = String::from_utf8(sink)?;
    ensure!(text.contains("\"lr\": 0.1"), "output must hold the params: {text}");
    Ok(())
}
