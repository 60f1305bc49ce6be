// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tagged normalization of raw configurations.
//!
//! Runs once per configuration change and produces the canonical role-tagged
//! shape; resolver, store and limit code never branch on legacy-vs-nested
//! again. Nested fields win over their legacy equivalents field by field;
//! the two sources merge, they are not mutually exclusive.

use smol_str::SmolStr;

use super::{Configuration, RawSideConstraints, Side};
use crate::model::{Scalar, ValueType};

/// Canonical constraints for one side of the mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideConstraints {
    pub value_type: Option<ValueType>,
    /// Allowed-value enumeration; empty when the side is unconstrained.
    pub array: Vec<Scalar>,
    /// Count cap for this side.
    pub array_len: Option<usize>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub regex: Option<String>,
    /// External default-value source this side draws from.
    pub param: Option<SmolStr>,
    pub editable: Option<bool>,
    pub creatable: Option<bool>,
}

impl SideConstraints {
    /// Declared type, defaulting to string.
    pub fn resolved_type(&self) -> ValueType {
        self.value_type.unwrap_or_default()
    }
}

/// The canonical, role-tagged constraint set.
///
/// `group` constrains the side playing the group-identifier role, `member`
/// the side whose values fill the groups. The legacy `parent` flip is
/// resolved here, so downstream code reasons in roles only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedConstraints {
    pub group: SideConstraints,
    pub member: SideConstraints,
    /// Global fallback applying to both sides.
    pub editable: Option<bool>,
    /// Global fallback applying to both sides.
    pub creatable: Option<bool>,
}

/// Legacy flat fields of one side, viewed uniformly for merging.
struct LegacySide<'a> {
    value_type: Option<&'a str>,
    array: Option<&'a [serde_json::Value]>,
    array_len: Option<usize>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    regex: Option<&'a str>,
    param: Option<&'a str>,
    editable: Option<bool>,
    creatable: Option<bool>,
}

fn legacy_key_side(raw: &Configuration) -> LegacySide<'_> {
    LegacySide {
        value_type: raw.key_type.as_deref(),
        array: raw.key_array.as_deref(),
        array_len: raw.key_array_len,
        min_value: raw.key_min_value,
        max_value: raw.key_max_value,
        min_len: raw.key_min_len,
        max_len: raw.key_max_len,
        regex: raw.key_regex.as_deref(),
        param: raw.key_param.as_deref(),
        editable: raw.editable_key,
        creatable: raw.creatable_key,
    }
}

fn legacy_value_side(raw: &Configuration) -> LegacySide<'_> {
    LegacySide {
        value_type: raw.value_type.as_deref(),
        array: raw.value_array.as_deref(),
        array_len: raw.value_array_len,
        min_value: raw.value_min_value,
        max_value: raw.value_max_value,
        min_len: raw.value_min_len,
        max_len: raw.value_max_len,
        regex: raw.value_regex.as_deref(),
        param: raw.value_param.as_deref(),
        editable: raw.editable_value,
        creatable: raw.creatable_value,
    }
}

fn scalars_from_json(values: Option<&[serde_json::Value]>) -> Vec<Scalar> {
    values
        .map(|entries| entries.iter().filter_map(Scalar::from_json).collect())
        .unwrap_or_default()
}

fn merge_side(nested: Option<&RawSideConstraints>, legacy: LegacySide<'_>) -> SideConstraints {
    let nested_type = nested.and_then(|n| n.value_type.as_deref());
    let nested_array = nested.and_then(|n| n.array.as_deref());
    SideConstraints {
        value_type: nested_type
            .or(legacy.value_type)
            .map(ValueType::from_name),
        array: if nested_array.is_some() {
            scalars_from_json(nested_array)
        } else {
            scalars_from_json(legacy.array)
        },
        array_len: nested.and_then(|n| n.array_len).or(legacy.array_len),
        min_value: nested.and_then(|n| n.min_value).or(legacy.min_value),
        max_value: nested.and_then(|n| n.max_value).or(legacy.max_value),
        min_len: nested.and_then(|n| n.min_len).or(legacy.min_len),
        max_len: nested.and_then(|n| n.max_len).or(legacy.max_len),
        regex: nested
            .and_then(|n| n.regex.as_deref())
            .or(legacy.regex)
            .map(str::to_owned),
        param: nested
            .and_then(|n| n.param.as_deref())
            .or(legacy.param)
            .map(SmolStr::new),
        editable: nested.and_then(|n| n.editable).or(legacy.editable),
        creatable: nested.and_then(|n| n.creatable).or(legacy.creatable),
    }
}

/// Normalize a raw configuration into the canonical role-tagged shape.
pub fn normalize(raw: &Configuration) -> NormalizedConstraints {
    let key = merge_side(raw.key_constraints.as_ref(), legacy_key_side(raw));
    let value = merge_side(raw.value_constraints.as_ref(), legacy_value_side(raw));

    // `parent` is honored for purely legacy configurations only; nested
    // configurations treat keys as groups implicitly.
    let nested_present = raw.key_constraints.is_some() || raw.value_constraints.is_some();
    let parent = if nested_present {
        Side::Key
    } else {
        raw.parent.unwrap_or(Side::Key)
    };

    let (group, member) = match parent {
        Side::Key => (key, value),
        Side::Value => (value, key),
    };

    NormalizedConstraints {
        group,
        member,
        editable: raw.editable,
        creatable: raw.creatable,
    }
}
