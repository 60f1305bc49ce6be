// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use amphora::config::{Configuration, Parameters};
use amphora::model::{GroupId, ValueId};
use amphora::store::MappingStore;

pub fn open_configuration() -> Configuration {
    serde_json::from_value(serde_json::json!({
        "editable": true,
        "creatable": true
    }))
    .expect("configuration fixture")
}

pub fn param_configuration() -> Configuration {
    serde_json::from_value(serde_json::json!({
        "creatable": true,
        "value_constraints": { "type": "string", "param": "wells" }
    }))
    .expect("configuration fixture")
}

/// A `wells` parameter with `count` defaults (`P000`, `P001`, ...).
pub fn well_parameters(count: usize) -> Parameters {
    let defaults: Vec<String> = (0..count).map(|i| format!("P{i:03}")).collect();
    serde_json::from_value(serde_json::json!({ "wells": { "default": defaults } }))
        .expect("parameters fixture")
}

/// A store with `groups` empty groups and `pool_values` pool values.
pub fn populated_store(groups: usize, pool_values: usize) -> (MappingStore, Vec<GroupId>, Vec<ValueId>) {
    let mut store = MappingStore::new(&open_configuration(), Parameters::new());
    let group_ids: Vec<GroupId> = (0..groups)
        .map(|i| store.create_group(&format!("group-{i:04}")).expect("bench group"))
        .collect();
    let value_ids: Vec<ValueId> = (0..pool_values)
        .map(|i| store.create_value(&format!("value-{i:05}")).expect("bench value"))
        .collect();
    (store, group_ids, value_ids)
}
