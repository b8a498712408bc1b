//! Unit tests for the document merge walk.

use rstest::rstest;
use serde_json::{Value, json};

use super::{MergePolicy, RootKind, combine_documents};
use crate::error::ParamError;

#[rstest]
#[case::null(json!(null))]
#[case::scalar(json!(1))]
#[case::sequence(json!(["foo", {"bar": "baz"}]))]
#[case::mapping(json!({"a": {"b": 1}, "c": 2}))]
fn single_document_is_returned_unchanged(#[case] doc: Value) {
    let merged = combine_documents(vec![doc.clone()], MergePolicy::Clobber);
    assert_eq!(merged.ok(), Some(doc));
}

#[rstest]
fn clobber_of_disjoint_mappings_is_their_union() {
    let merged = combine_documents(
        vec![json!({"a": 1}), json!({"b": 2})],
        MergePolicy::Clobber,
    );
    assert_eq!(merged.ok(), Some(json!({"a": 1, "b": 2})));
}

#[rstest]
fn clobber_replaces_nested_mappings_wholesale() {
    let merged = combine_documents(
        vec![
            json!({"a": {"b": {"c": null}, "d": true}}),
            json!({"a": {"b": {"e": 1}}, "f": "g"}),
        ],
        MergePolicy::Clobber,
    );
    assert_eq!(merged.ok(), Some(json!({"a": {"b": {"e": 1}}, "f": "g"})));
}

#[rstest]
fn nested_merge_preserves_old_keys_at_every_depth() {
    let merged = combine_documents(
        vec![
            json!({"a": {"b": {"c": null}, "d": true}}),
            json!({"a": {"b": {"e": 1}}, "f": "g"}),
        ],
        MergePolicy::Nested,
    );
    assert_eq!(
        merged.ok(),
        Some(json!({"a": {"b": {"c": null, "e": 1}, "d": true}, "f": "g"}))
    );
}

#[rstest]
fn sequences_concatenate_in_order() {
    let merged = combine_documents(
        vec![json!(["foo", {"bar": "baz"}]), json!([{"bar": "bum"}])],
        MergePolicy::Clobber,
    );
    assert_eq!(
        merged.ok(),
        Some(json!(["foo", {"bar": "baz"}, {"bar": "bum"}]))
    );
}

#[rstest]
fn replacing_a_key_keeps_its_original_position() {
    let merged = combine_documents(
        vec![json!({"b": 1, "a": 2}), json!({"a": 3, "c": 4})],
        MergePolicy::Clobber,
    );
    let keys: Vec<String> = merged
        .ok()
        .and_then(|doc| {
            doc.as_object()
                .map(|map| map.keys().cloned().collect())
        })
        .unwrap_or_default();
    assert_eq!(keys, vec!["b", "a", "c"]);
}

#[rstest]
fn mixed_roots_are_rejected() {
    let outcome = combine_documents(
        vec![json!(null), json!(["foo"])],
        MergePolicy::Clobber,
    );
    assert!(matches!(
        outcome,
        Err(ParamError::MixedRoots {
            expected: RootKind::Scalar,
            found: RootKind::Sequence,
            index: 1,
        })
    ));
}

#[rstest]
fn multiple_scalar_roots_are_rejected() {
    let outcome = combine_documents(vec![json!(1), json!(2)], MergePolicy::Clobber);
    assert!(matches!(outcome, Err(ParamError::ScalarRoots { count: 2 })));
}

#[rstest]
fn empty_input_is_rejected() {
    let outcome = combine_documents(Vec::new(), MergePolicy::Clobber);
    assert!(matches!(outcome, Err(ParamError::NoSources)));
}
