//! Integration tests for whole-set serialization and handler resolution.

use anyhow::{Result, ensure};
use param_config::serial::{
    OnMissing, ParamSerializer, SerializeOptions, SerializerRegistry, serialize_params,
};
use param_config::{ParamDecl, ParamError, ParamKind, ParamResult, ParamSet};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

/// Serializer that stamps a fixed marker, to make resolution visible.
struct StampSerializer(&'static str);

impl ParamSerializer for StampSerializer {
    fn serialize(&self, _name: &str, _set: &ParamSet) -> ParamResult<Value> {
        Ok(json!(self.0))
    }
}

#[fixture]
fn training() -> ParamSet {
    let mut set = ParamSet::new("training");
    set.declare(
        "seed",
        ParamDecl::new(ParamKind::Integer)
            .with_doc("RNG seed.")
            .allow_none(),
    )
    .declare(
        "lr",
        ParamDecl::new(ParamKind::Number).with_default(json!(0.1)),
    )
    .declare(
        "use_cuda",
        ParamDecl::new(ParamKind::Bool).with_default(json!(false)),
    )
    .declare(
        "layers",
        ParamDecl::new(ParamKind::List).with_default(json!([64, 64])),
    )
    .declare(
        "optimizer",
        ParamDecl::selector(vec![
            ("adam".to_owned(), json!({"optim": "adam"})),
            ("sgd".to_owned(), json!({"optim": "sgd"})),
        ])
        .with_doc("Optimizer preset")
        .with_default(json!({"optim": "adam"})),
    );
    set
}

#[rstest]
fn serialized_output_is_sorted_by_name(training: ParamSet) -> Result<()> {
    let serialized = serialize_params(
        &training,
        &SerializerRegistry::standard(),
        &SerializeOptions::default(),
    )?;
    let keys: Vec<&String> = serialized.values.keys().collect();
    ensure!(
        keys == ["layers", "lr", "optimizer", "seed", "use_cuda"],
        "unexpected key order: {keys:?}"
    );
    Ok(())
}

#[rstest]
fn per_name_override_beats_per_kind_override(training: ParamSet) -> Result<()> {
    let mut registry = SerializerRegistry::standard();
    registry
        .register_kind(ParamKind::Number, StampSerializer("by-kind"))
        .register_name("lr", StampSerializer("by-name"));
    let serialized = serialize_params(&training, &registry, &SerializeOptions::default())?;
    ensure!(
        serialized.values.get("lr") == Some(&json!("by-name")),
        "name override not applied"
    );
    Ok(())
}

#[rstest]
fn per_kind_override_beats_builtin_default(training: ParamSet) -> Result<()> {
    let mut registry = SerializerRegistry::standard();
    registry.register_kind(ParamKind::Number, StampSerializer("by-kind"));
    let serialized = serialize_params(&training, &registry, &SerializeOptions::default())?;
    ensure!(
        serialized.values.get("lr") == Some(&json!("by-kind")),
        "kind override not applied"
    );
    ensure!(
        serialized.values.get("use_cuda") == Some(&json!(false)),
        "unrelated kinds must keep the builtin default"
    );
    Ok(())
}

#[rstest]
fn custom_kind_without_handler_is_an_error() {
    let mut set = ParamSet::new("plugins");
    set.declare("payload", ParamDecl::new(ParamKind::Custom("payload")));
    let outcome = serialize_params(
        &set,
        &SerializerRegistry::standard(),
        &SerializeOptions::default(),
    );
    assert!(matches!(
        outcome,
        Err(ParamError::NoHandler { name, kind: ParamKind::Custom("payload") }) if name == "payload"
    ));
}

#[rstest]
fn custom_kind_with_registered_handler_serializes() -> Result<()> {
    let mut set = ParamSet::new("plugins");
    set.declare("payload", ParamDecl::new(ParamKind::Custom("payload")));
    let mut registry = SerializerRegistry::standard();
    registry.register_kind(ParamKind::Custom("payload"), StampSerializer("custom"));
    let serialized = serialize_params(&set, &registry, &SerializeOptions::default())?;
    ensure!(
        serialized.values.get("payload") == Some(&json!("custom")),
        "custom handler not used"
    );
    Ok(())
}

#[rstest]
fn selectors_serialize_to_their_choice_name(training: ParamSet) -> Result<()> {
    let serialized = serialize_params(
        &training,
        &SerializerRegistry::standard(),
        &SerializeOptions::default(),
    )?;
    ensure!(
        serialized.values.get("optimizer") == Some(&json!("adam")),
        "selector value not mapped back to its name"
    );
    Ok(())
}

#[rstest]
fn help_joins_doc_strings_with_handler_help(training: ParamSet) -> Result<()> {
    let serialized = serialize_params(
        &training,
        &SerializerRegistry::standard(),
        &SerializeOptions::default(),
    )?;
    let optimizer_help = serialized.help.get("optimizer");
    ensure!(
        optimizer_help.is_some_and(|help| {
            help.starts_with("Optimizer preset. Choices:")
                && help.contains("\"adam\"")
                && help.contains("\"sgd\"")
        }),
        "unexpected optimizer help: {optimizer_help:?}"
    );
    ensure!(
        serialized.help.get("seed").map(String::as_str) == Some("RNG seed."),
        "doc-only help must pass through untouched"
    );
    Ok(())
}

#[rstest]
fn dates_serialize_through_the_format_list() -> Result<()> {
    let mut set = ParamSet::new("schedule");
    set.declare("started", ParamDecl::new(ParamKind::Date).allow_none());
    set.set("started", json!("2019-03-01T00:00:00"))?;
    let serialized = serialize_params(
        &set,
        &SerializerRegistry::standard(),
        &SerializeOptions::default(),
    )?;
    ensure!(
        serialized.values.get("started") == Some(&json!("2019-03-01")),
        "midnight dates must pick the date-only format"
    );
    Ok(())
}

#[rstest]
fn json_string_registry_encodes_containers(training: ParamSet) -> Result<()> {
    let serialized = serialize_params(
        &training,
        &SerializerRegistry::json_string(),
        &SerializeOptions::default(),
    )?;
    ensure!(
        serialized.values.get("layers") == Some(&json!("[64,64]")),
        "containers must become JSON strings"
    );
    ensure!(
        serialized.values.get("use_cuda") == Some(&json!(false)),
        "scalars must pass through untouched"
    );
    Ok(())
}

#[rstest]
fn only_subset_limits_the_output(training: ParamSet) -> Result<()> {
    let options = SerializeOptions::default().only(["lr", "use_cuda"]);
    let serialized = serialize_params(&training, &SerializerRegistry::standard(), &options)?;
    let keys: Vec<&String> = serialized.values.keys().collect();
    ensure!(keys == ["lr", "use_cuda"], "unexpected subset: {keys:?}");
    Ok(())
}

#[rstest]
#[case::raising(OnMissing::Raise, true)]
#[case::warning(OnMissing::Warn, false)]
#[case::ignoring(OnMissing::Ignore, false)]
fn missing_only_names_honour_the_policy(
    training: ParamSet,
    #[case] policy: OnMissing,
    #[case] expect_error: bool,
) {
    let options = SerializeOptions::default()
        .only(["lr", "no_such_param"])
        .on_missing(policy);
    let outcome = serialize_params(&training, &SerializerRegistry::standard(), &options);
    if expect_error {
        assert!(matches!(
            outcome,
            Err(ParamError::UnknownParam { name, .. }) if name == "no_such_param"
        ));
    } else {
        assert!(outcome.is_ok_and(|serialized| serialized.values.len() == 1));
    }
}
