// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![cfg(test)]

use smol_str::SmolStr;

use crate::config::{normalize, Configuration, NormalizedConstraints, Parameters};
use crate::model::{Group, GroupId, Scalar, Value, ValueId, ValueType};

pub(crate) fn constraints_from(json: serde_json::Value) -> NormalizedConstraints {
    let raw: Configuration = serde_json::from_value(json).expect("configuration fixture");
    normalize(&raw)
}

pub(crate) fn parameters_from(json: serde_json::Value) -> Parameters {
    serde_json::from_value(json).expect("parameters fixture")
}

pub(crate) fn gid(value: &str) -> GroupId {
    GroupId::new(value).expect("group id")
}

pub(crate) fn vid(value: &str) -> ValueId {
    ValueId::new(value).expect("value id")
}

pub(crate) fn string_value(id: &str, content: &str) -> Value {
    Value::new(vid(id), Scalar::from(content), ValueType::String)
}

pub(crate) fn group_named(id: &str, name: &str) -> Group {
    Group::new(gid(id), SmolStr::new(name))
}
