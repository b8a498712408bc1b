//! Hyperparameter-search integration.
//!
//! The optimizer stays behind the [`Trial`] trait: anything that can
//! suggest integers, floats, and categorical choices can drive a
//! [`Tunable`]. [`TunableParams`] makes a [`ParamSet`] tunable by attaching
//! a [`TuneSpec`] range per parameter, and [`TunableTree`] groups tunables
//! under dotted name prefixes so a whole configuration can be sampled in
//! one call.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Number, Value};

use crate::error::{ParamError, ParamResult};
use crate::schema::{ParamDecl, ParamSet};


/// Source of suggested parameter values, implemented by the optimizer.
pub trait Trial {
    /// Suggest an integer in `[low, high]` for the parameter `name`.
    fn suggest_int(&mut self, name: &str, low: i64, high: i64) -> i64;

    /// Suggest a float in `[low, high]` for the parameter `name`.
    fn suggest_float(&mut self, name: &str, low: f64, high: f64) -> f64;

    /// Suggest one of `choices` for the parameter `name`.
    fn suggest_categorical(&mut self, name: &str, choices: &[String]) -> String;
}

/// Something whose parameters can be sampled from a [`Trial`].
pub trait Tunable {
    /// Names of the tunable parameters. Names should not contain `.`.
    fn tunable(&self) -> BTreeSet<String>;

    /// Sample values for the parameters named in `only`, prefixing each
    /// name with `prefix` when asking the trial.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] when a suggested value cannot be stored.
    fn suggest(
        &mut self,
        trial: &mut dyn Trial,
        only: &BTreeSet<String>,
        prefix: &str,
    ) -> ParamResult<()>;
}

/// Policy for `.` found inside tree keys or tunable names, where it would
/// make dotted parameter names ambiguous.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OnDecimal {
    /// Accept the name silently.
    Ignore,
    /// Accept the name and log a warning.
    #[default]
    Warn,
    /// Fail with [`ParamError::Tuning`].
    Raise,
}

fn police_decimal(policy: OnDecimal, message: String) -> ParamResult<()> {
    match policy {
        OnDecimal::Ignore => Ok(()),
        OnDecimal::Warn => {
            tracing::warn!("{message}");
            Ok(())
        }
        OnDecimal::Raise => Err(ParamError::Tuning { message }),
    }
}

/// Sampling range attached to one parameter of a [`TunableParams`].
#[derive(Clone, Debug)]
pub enum TuneSpec {
    /// Sample an integer in `[low, high]`.
    IntRange {
        /// Inclusive lower bound.
        low: i64,
        /// Inclusive upper bound.
        high: i64,
    },
    /// Sample a float in `[low, high]`.
    FloatRange {
        /// Inclusive lower bound.
        low: f64,
        /// Inclusive upper bound.
        high: f64,
    },
    /// Sample one of the listed choices.
    Categorical {
        /// Choice names handed to the trial.
        choices: Vec<String>,
    },
}

/// A [`ParamSet`] with sampling ranges attached to some of its parameters.
pub struct TunableParams {
    set: ParamSet,
    specs: BTreeMap<String, TuneSpec>,
}

impl TunableParams {
    /// Wrap `set` with no tunable parameters yet.
    #[must_use]
    pub const fn new(set: ParamSet) -> Self {
        Self {
            set,
            specs: BTreeMap::new(),
        }
    }

    /// Mark the declared parameter `name` as tunable over `spec`.
    pub fn tune(&mut self, name: impl Into<String>, spec: TuneSpec) -> &mut Self {
        self.specs.insert(name.into(), spec);
        self
    }

    /// The wrapped parameter set.
    #[must_use]
    pub const fn params(&self) -> &ParamSet {
        &self.set
    }

    /// Consume the wrapper, returning the parameter set.
    #[must_use]
    pub fn into_params(self) -> ParamSet {
        self.set
    }

    fn sample(&self, trial: &mut dyn Trial, full_name: &str, spec: &TuneSpec) -> ParamResult<Value> {
        match spec {
            TuneSpec::IntRange { low, high } => {
                Ok(Value::from(trial.suggest_int(full_name, *low, *high)))
            }
            TuneSpec::FloatRange { low, high } => {
                let sampled = trial.suggest_float(full_name, *low, *high);
                Number::from_f64(sampled)
                    .map(Value::Number)
                    .ok_or_else(|| ParamError::Tuning {
                        message: format!("trial suggested a non-finite value for '{full_name}'"),
                    })
            }
            TuneSpec::Categorical { choices } => Ok(Value::String(
                trial.suggest_categorical(full_name, choices),
            )),
        }
    }
}

impl Tunable for TunableParams {
    fn tunable(&self) -> BTreeSet<String> {
        self.specs.keys().cloned().collect()
    }

    fn suggest(
        &mut self,
        trial: &mut dyn Trial,
        only: &BTreeSet<String>,
        prefix: &str,
    ) -> ParamResult<()> {
        for (name, spec) in &self.specs {
            if !only.contains(name) {
                continue;
            }
            let full_name = format!("{prefix}{name}");
            let value = self.sample(trial, &full_name, spec)?;
            self.set.set(name, value)?;
        }
        Ok(())
    }
}

/// A nested grouping of [`Tunable`] values under string keys.
///
/// Dotted names address leaves: `"model.lr"` is the parameter `lr` of the
/// tunable under the `model` key.
pub enum TunableTree {
    /// An inner grouping of children by key.
    Node(BTreeMap<String, TunableTree>),
    /// A tunable leaf.
    Leaf(Box<dyn Tunable>),
}

impl TunableTree {
    /// Wrap a tunable as a leaf.
    #[must_use]
    pub fn leaf(tunable: impl Tunable + 'static) -> Self {
        Self::Leaf(Box::new(tunable))
    }

    /// Group children under keys.
    #[must_use]
    pub fn node(children: impl IntoIterator<Item = (String, Self)>) -> Self {
        Self::Node(children.into_iter().collect())
    }
}

fn join_prefix(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Collect the dotted names of every tunable parameter in `tree`.
///
/// # Errors
///
/// Returns [`ParamError::Tuning`] under [`OnDecimal::Raise`] when a tree
/// key or tunable name contains `.`.
pub fn collect_tunable(tree: &TunableTree, on_decimal: OnDecimal) -> ParamResult<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    collect_into(tree, "", on_decimal, &mut names)?;
    Ok(names)
}

fn collect_into(
    tree: &TunableTree,
    prefix: &str,
    on_decimal: OnDecimal,
    names: &mut BTreeSet<String>,
) -> ParamResult<()> {
    match tree {
        TunableTree::Node(children) => {
            for (key, child) in children {
                if key.contains('.') {
                    police_decimal(
                        on_decimal,
                        format!("key '{key}' contains '.', which can lead to ambiguities"),
                    )?;
                }
                collect_into(child, &join_prefix(prefix, key), on_decimal, names)?;
            }
        }
        TunableTree::Leaf(tunable) => {
            for name in tunable.tunable() {
                if name.contains('.') {
                    police_decimal(
                        on_decimal,
                        format!(
                            "tunable parameter '{name}' contains '.', which can lead to ambiguities"
                        ),
                    )?;
                }
                names.insert(join_prefix(prefix, &name));
            }
        }
    }
    Ok(())
}

/// Sample values for every tunable leaf of `tree` from `trial`.
///
/// When `only` is given, just the listed dotted names are sampled; the
/// default is everything [`collect_tunable`] finds. The tree is updated in
/// place. Entries of `only` that match no tunable parameter are warned
/// about unless `warn_extra` is unset.
///
/// # Errors
///
/// Propagates [`collect_tunable`] and [`Tunable::suggest`] failures.
pub fn suggest_tree(
    trial: &mut dyn Trial,
    tree: &mut TunableTree,
    only: Option<&BTreeSet<String>>,
    on_decimal: OnDecimal,
    warn_extra: bool,
) -> ParamResult<()> {
    let mut remaining = match only {
        Some(names) => names.clone(),
        None => collect_tunable(tree, on_decimal)?,
    };
    suggest_into(trial, tree, "", &mut remaining)?;
    if warn_extra && !remaining.is_empty() {
        let extras: Vec<&str> = remaining.iter().map(String::as_str).collect();
        tracing::warn!(extras = ?extras, "'only' contained extra parameters");
    }
    Ok(())
}

fn suggest_into(
    trial: &mut dyn Trial,
    tree: &mut TunableTree,
    prefix: &str,
    remaining: &mut BTreeSet<String>,
) -> ParamResult<()> {
    match tree {
        TunableTree::Node(children) => {
            for (key, child) in children {
                suggest_into(trial, child, &join_prefix(prefix, key), remaining)?;
            }
        }
        TunableTree::Leaf(tunable) => {
            let dotted = if prefix.is_empty() {
                String::new()
            } else {
                format!("{prefix}.")
            };
            let names = tunable.tunable();
            let local: BTreeSet<String> = remaining
                .iter()
                .filter_map(|full| full.strip_prefix(&dotted))
                .filter(|name| names.contains(*name))
                .map(str::to_owned)
                .collect();
            for name in &local {
                remaining.remove(&format!("{dotted}{name}"));
            }
            tunable.suggest(trial, &local, &dotted)?;
        }
    }
    Ok(())
}

/// Build a one-parameter set whose `only` list selector chooses among the
/// collected tunable names.
///
/// Keep it alongside the rest of the configuration so the subset of
/// parameters to optimize is itself configurable.
#[must_use]
pub fn only_param_set(tunable: &BTreeSet<String>, default: &[String]) -> ParamSet {
    let choices = tunable
        .iter()
        .map(|name| (name.clone(), Value::String(name.clone())))
        .collect();
    let default_value = Value::Array(default.iter().cloned().map(Value::String).collect());
    let mut set = ParamSet::new("hyperparameter_optimization");
    set.declare(
        "only",
        ParamDecl::list_selector(choices)
            .with_doc(
                "When performing hyperparameter optimization, only optimize these parameters",
            )
            .with_default(default_value),
    );
    set
}
