//! Integration tests for the `param-config` binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("param-config"))
}

fn write(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

fn parse_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[test]
fn prints_version() {
    bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("param-config"));
}

#[test]
fn help_lists_the_subcommands() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("combine-json"))
        .stdout(predicate::str::contains("combine-yaml"))
        .stdout(predicate::str::contains("combine-ini"));
}

#[test]
fn combine_json_single_source_is_identity() -> Result<()> {
    let dir = TempDir::new()?;
    let source = write(&dir, "a.json", "{\n  \"a\": {\n    \"b\": 1\n  }\n}\n")?;
    let out = dir.path().join("out.json");
    bin()
        .args(["combine-json", "--quiet"])
        .arg(&source)
        .arg(&out)
        .assert()
        .success();
    ensure!(parse_json(&out)? == parse_json(&source)?, "output must match input");
    Ok(())
}

#[test]
fn combine_json_clobbers_by_default() -> Result<()> {
    let dir = TempDir::new()?;
    let first = write(
        &dir,
        "d.json",
        r#"{"a": {"b": 1, "a": {"c": 2}}, "c": 1}"#,
    )?;
    let second = write(
        &dir,
        "e.json",
        r#"{"d": {"foo": "bar"}, "a": {"a": {"d": null}}}"#,
    )?;
    let out = dir.path().join("out.json");
    bin()
        .args(["combine-json", "--compact", "--quiet"])
        .arg(&first)
        .arg(&second)
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out)?;
    ensure!(
        text.trim() == r#"{"a":{"a":{"d":null}},"c":1,"d":{"foo":"bar"}}"#,
        "unexpected clobber output: {text}"
    );
    Ok(())
}

#[test]
fn combine_json_nested_preserves_old_keys() -> Result<()> {
    let dir = TempDir::new()?;
    let first = write(
        &dir,
        "d.json",
        r#"{"a": {"b": 1, "a": {"c": 2}}, "c": 1}"#,
    )?;
    let second = write(
        &dir,
        "e.json",
        r#"{"d": {"foo": "bar"}, "a": {"a": {"d": null}}}"#,
    )?;
    let out = dir.path().join("out.json");
    bin()
        .args(["combine-json", "--compact", "--quiet", "--nested"])
        .arg(&first)
        .arg(&second)
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out)?;
    ensure!(
        text.trim() == r#"{"a":{"b":1,"a":{"c":2,"d":null}},"c":1,"d":{"foo":"bar"}}"#,
        "unexpected nested output: {text}"
    );
    Ok(())
}

#[test]
fn combine_json_appends_sequences() -> Result<()> {
    let dir = TempDir::new()?;
    let first = write(&dir, "b.json", r#"["foo", {"bar": "baz"}]"#)?;
    let second = write(&dir, "c.json", r#"[{"bar": "bum"}]"#)?;
    let out = dir.path().join("out.json");
    bin()
        .args(["combine-json", "--compact", "--quiet"])
        .arg(&first)
        .arg(&second)
        .arg(&out)
        .assert()
        .success();
    ensure!(
        parse_json(&out)? == json!(["foo", {"bar": "baz"}, {"bar": "bum"}]),
        "sequences must concatenate in order"
    );
    Ok(())
}

#[test]
fn combine_json_rejects_mixed_roots() -> Result<()> {
    let dir = TempDir::new()?;
    let first = write(&dir, "a.json", "null\n")?;
    let second = write(&dir, "b.json", r#"["foo"]"#)?;
    let out = dir.path().join("out.json");
    bin()
        .arg("combine-json")
        .arg(&first)
        .arg(&second)
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot merge"));
    Ok(())
}

#[test]
fn combine_json_writes_to_stdout_with_dash() -> Result<()> {
    let dir = TempDir::new()?;
    let source = write(&dir, "a.json", r#"{"a": 1}"#)?;
    bin()
        .args(["combine-json", "--compact", "--quiet"])
        .arg(&source)
        .arg("-")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"a":1}"#));
    Ok(())
}

#[test]
fn combine_json_fails_on_malformed_sources() -> Result<()> {
    let dir = TempDir::new()?;
    let source = write(&dir, "a.json", "{ not json")?;
    let out = dir.path().join("out.json");
    bin()
        .arg("combine-json")
        .arg(&source)
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("a.json"));
    Ok(())
}

#[test]
fn combine_yaml_appends_sequences() -> Result<()> {
    let dir = TempDir::new()?;
    let first = write(&dir, "b.yaml", "- foo\n- bar: zoop\n")?;
    let second = write(&dir, "c.yaml", "- foo: bar\n- baz\n")?;
    let out = dir.path().join("out.yaml");
    bin()
        .args(["combine-yaml", "--quiet"])
        .arg(&first)
        .arg(&second)
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out)?;
    let merged: Value = serde_yaml::from_str(&text)?;
    ensure!(
        merged == json!(["foo", {"bar": "zoop"}, {"foo": "bar"}, "baz"]),
        "unexpected merged yaml: {text}"
    );
    Ok(())
}

#[test]
fn combine_yaml_nested_merges_mappings() -> Result<()> {
    let dir = TempDir::new()?;
    let first = write(
        &dir,
        "d.yaml",
        "a:\n  b: kept\n  c:\n    d: kept\ne: a\n",
    )?;
    let second = write(&dir, "e.yaml", "e: 1\na:\n  c:\n    f: added\n")?;
    let out = dir.path().join("out.yaml");
    bin()
        .args(["combine-yaml", "--quiet", "--nested"])
        .arg(&first)
        .arg(&second)
        .arg(&out)
        .assert()
        .success();
    let merged: Value = serde_yaml::from_str(&fs::read_to_string(&out)?)?;
    ensure!(
        merged == json!({"a": {"b": "kept", "c": {"d": "kept", "f": "added"}}, "e": 1}),
        "unexpected merged yaml: {merged}"
    );
    Ok(())
}

#[test]
fn combine_yaml_rejects_mixed_roots() -> Result<()> {
    let dir = TempDir::new()?;
    let first = write(&dir, "a.yaml", "1\n")?;
    let second = write(&dir, "b.yaml", "- foo\n")?;
    let out = dir.path().join("out.yaml");
    bin()
        .arg("combine-yaml")
        .arg(&first)
        .arg(&second)
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot merge"));
    Ok(())
}

#[test]
fn combine_ini_unions_sections_and_clobbers_keys() -> Result<()> {
    let dir = TempDir::new()?;
    let first = write(
        &dir,
        "a.ini",
        "; here's a comment up here\n[first]\nfoo = a\nbar = this\nbaz =\n\n[a second]\nfoo = d\n",
    )?;
    let second = write(&dir, "b.ini", "[third]\nfoo = b\nbaz = zoop\n\n[first]\nfoo = another\n")?;
    let out = dir.path().join("c.ini");
    bin()
        .arg("combine-ini")
        .arg(&first)
        .arg(&second)
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out)?;
    ensure!(text.contains("[first]"), "first section missing:\n{text}");
    ensure!(
        text.contains("foo=another"),
        "later file must clobber keys:\n{text}"
    );
    ensure!(
        text.contains("bar=this"),
        "untouched keys must persist:\n{text}"
    );
    ensure!(text.contains("[a second]"), "old sections must persist:\n{text}");
    ensure!(text.contains("[third]"), "new sections must be added:\n{text}");
    ensure!(
        !text.contains("comment"),
        "comments must be dropped:\n{text}"
    );
    Ok(())
}

#[test]
fn combine_ini_single_source_round_trips() -> Result<()> {
    let dir = TempDir::new()?;
    let source = write(&dir, "a.ini", "[first]\nfoo = a\n\n[a second]\nfoo = d\n")?;
    let out = dir.path().join("c.ini");
    bin().arg("combine-ini").arg(&source).arg(&out).assert().success();
    let text = fs::read_to_string(&out)?;
    ensure!(
        text.contains("[first]") && text.contains("[a second]"),
        "sections must survive a single-source combine:\n{text}"
    );
    Ok(())
}
