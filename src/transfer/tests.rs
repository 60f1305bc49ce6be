// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use super::{available_values, candidate_values, move_value, ContainerRef, ParseContainerRefError};
use crate::config::{Configuration, Parameters};
use crate::model::{Value, ValueId, ValueType};
use crate::store::{Decline, MappingStore};

fn store_with(config: serde_json::Value, params: serde_json::Value) -> MappingStore {
    let config: Configuration = serde_json::from_value(config).expect("configuration");
    let parameters: Parameters = serde_json::from_value(params).expect("parameters");
    MappingStore::new(&config, parameters)
}

fn vid(value: &str) -> ValueId {
    ValueId::new(value).expect("value id")
}

#[rstest]
#[case::pool("pool", ContainerRef::Pool)]
#[case::group("g:g000001", ContainerRef::parse("g:g000001").unwrap())]
fn container_tokens_round_trip(#[case] token: &str, #[case] expected: ContainerRef) {
    let parsed = ContainerRef::parse(token).expect("parse");
    assert_eq!(parsed, expected);
    assert_eq!(parsed.to_string(), token);
}

#[test]
fn container_token_parse_errors() {
    assert_eq!(ContainerRef::parse(""), Err(ParseContainerRefError::Empty));
    assert_eq!(
        ContainerRef::parse("g:"),
        Err(ParseContainerRefError::MissingGroupId)
    );
    assert!(matches!(
        ContainerRef::parse("group-1"),
        Err(ParseContainerRefError::UnknownScheme(_))
    ));
    assert!(matches!(
        ContainerRef::parse("g:a/b"),
        Err(ParseContainerRefError::InvalidGroupId(_))
    ));
}

#[test]
fn tracked_record_moves_with_its_metadata_not_the_payload() {
    let mut store = store_with(
        serde_json::json!({ "creatable": true, "editable": true }),
        serde_json::json!({}),
    );
    let group_id = store.create_group("G").expect("group");
    let value_id = store.create_value("x").expect("value");

    // A stale payload claiming different metadata must be ignored for
    // tracked records.
    let mut stale = Value::new(value_id.clone(), "x".into(), ValueType::String);
    stale.set_is_editable(Some(false));

    let from = ContainerRef::Pool;
    let to = ContainerRef::group(group_id.clone());
    move_value(&mut store, &value_id, &from, &to, Some(stale)).expect("move");

    let record = store.mapping().value(&value_id).expect("record");
    assert_eq!(record.is_editable(), None);
    assert_eq!(store.mapping().location(&value_id), Some(Some(&group_id)));
}

#[test]
fn untracked_candidate_is_materialized_from_payload() {
    let mut store = store_with(
        serde_json::json!({ "creatable": true,
            "value_constraints": { "param": "wells" } }),
        serde_json::json!({ "wells": { "default": ["A1"] } }),
    );
    let group_id = store.create_group("G").expect("group");

    let candidates = candidate_values(&store);
    assert_eq!(candidates.len(), 1);
    let candidate = candidates[0].clone();
    assert_eq!(candidate.id().as_str(), "A1");
    assert_eq!(candidate.is_from_param(), Some(true));
    assert_eq!(candidate.param_source(), Some("wells"));

    let from = ContainerRef::Pool;
    let to = ContainerRef::group(group_id.clone());
    move_value(&mut store, candidate.id(), &from, &to, Some(candidate.clone()))
        .expect("materialize");

    let record = store.mapping().value(candidate.id()).expect("record");
    assert_eq!(record, &candidate);
    // Once tracked, the candidate disappears from the reconciled pool.
    assert!(candidate_values(&store).is_empty());
}

#[test]
fn untracked_id_without_matching_payload_is_a_caller_defect() {
    let mut store = store_with(serde_json::json!({ "creatable": true }), serde_json::json!({}));
    let group_id = store.create_group("G").expect("group");
    let to = ContainerRef::group(group_id);

    assert_eq!(
        move_value(&mut store, &vid("ghost"), &ContainerRef::Pool, &to, None),
        Err(Decline::NotFound)
    );

    let mismatched = Value::new(vid("other"), "x".into(), ValueType::String);
    assert_eq!(
        move_value(
            &mut store,
            &vid("ghost"),
            &ContainerRef::Pool,
            &to,
            Some(mismatched)
        ),
        Err(Decline::NotFound)
    );
    assert_eq!(store.rev(), 1);
}

#[test]
fn same_source_and_target_is_a_pure_no_op() {
    let mut store = store_with(serde_json::json!({ "creatable": true }), serde_json::json!({}));
    let value_id = store.create_value("x").expect("value");
    let rev = store.rev();

    move_value(
        &mut store,
        &value_id,
        &ContainerRef::Pool,
        &ContainerRef::Pool,
        None,
    )
    .expect("no-op");
    assert_eq!(store.rev(), rev);
}

#[test]
fn available_values_union_tracked_then_candidates() {
    let mut store = store_with(
        serde_json::json!({ "creatable": true,
            "value_constraints": { "array": ["a", "b"], "param": "wells" } }),
        serde_json::json!({ "wells": { "default": ["A1", "b"] } }),
    );
    // "b" appears in both sources: the array candidate wins, the parameter
    // duplicate is suppressed by id.
    let ids: Vec<String> = available_values(&store)
        .iter()
        .map(|v| v.id().as_str().to_owned())
        .collect();
    assert_eq!(ids, ["a", "b", "A1"]);

    // A user-created record is tracked and authoritative; its content
    // colliding with nothing, it simply joins the set first.
    let created = store.create_value("a").expect("created");
    let ids: Vec<String> = available_values(&store)
        .iter()
        .map(|v| v.id().as_str().to_owned())
        .collect();
    // The candidate "a" is still offered: dedup keys on id, and the created
    // record carries a minted id.
    assert_eq!(ids, [created.as_str(), "a", "b", "A1"]);
}

#[test]
fn materialized_candidates_stay_suppressed_inside_groups() {
    let mut store = store_with(
        serde_json::json!({ "creatable": true, "value_constraints": { "array": ["a"] } }),
        serde_json::json!({}),
    );
    let group_id = store.create_group("G").expect("group");
    let candidate = candidate_values(&store)[0].clone();

    move_value(
        &mut store,
        candidate.id(),
        &ContainerRef::Pool,
        &ContainerRef::group(group_id.clone()),
        Some(candidate.clone()),
    )
    .expect("drop");

    assert!(available_values(&store).is_empty());

    // Dragging it back to the pool resurfaces it as a tracked record.
    move_value(
        &mut store,
        candidate.id(),
        &ContainerRef::group(group_id),
        &ContainerRef::Pool,
        None,
    )
    .expect("return");
    let available = available_values(&store);
    assert_eq!(available.len(), 1);
    assert_eq!(available[0], candidate);
}
