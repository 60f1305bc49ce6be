// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Constraint resolution.
//!
//! Pure derivation of effective editability, creatability, type and parameter
//! provenance from the normalized constraint set plus group/value records.
//! The store consults these before every mutation; hosts use the same
//! predicates to decide which affordances to offer.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use crate::config::{NormalizedConstraints, Parameters};
use crate::model::{Group, Scalar, Value, ValueId, ValueType};

/// Effective, derived metadata for one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub is_from_param: bool,
    pub param_source: Option<SmolStr>,
    pub is_editable: bool,
    pub value_type: ValueType,
}

fn truthy(flag: Option<bool>) -> bool {
    flag == Some(true)
}

fn not_false(flag: Option<bool>) -> bool {
    flag != Some(false)
}

/// Whether new groups may be created under this configuration.
pub fn group_creatability(constraints: &NormalizedConstraints) -> bool {
    truthy(constraints.group.creatable) || truthy(constraints.creatable)
}

/// Whether new member values may be created under this configuration.
pub fn member_creatability(constraints: &NormalizedConstraints) -> bool {
    truthy(constraints.member.creatable) || truthy(constraints.creatable)
}

/// Group-side editability ignoring any per-record flag. This is the value
/// frozen onto a group record at creation time.
pub fn derived_group_editability(constraints: &NormalizedConstraints) -> bool {
    if truthy(constraints.group.editable) || truthy(constraints.editable) {
        return true;
    }
    // Creatability implies the capability to modify membership.
    truthy(constraints.group.creatable) || truthy(constraints.creatable)
}

/// Effective editability of a group: the explicit record flag when present,
/// the derived group-side editability otherwise.
pub fn group_editability(group: &Group, constraints: &NormalizedConstraints) -> bool {
    match group.is_editable() {
        Some(flag) => flag,
        None => derived_group_editability(constraints),
    }
}

/// A group is deletable iff it is editable and none of its members is
/// parameter-sourced.
pub fn group_deletability(
    group: &Group,
    constraints: &NormalizedConstraints,
    parameters: &Parameters,
) -> bool {
    group_editability(group, constraints)
        && !group
            .values()
            .iter()
            .any(|value| param_provenance(value, constraints, parameters).0)
}

/// The parameter source matching this content, if the member side names one.
fn content_param_source(
    string_form: &str,
    constraints: &NormalizedConstraints,
    parameters: &Parameters,
) -> Option<SmolStr> {
    let name = constraints.member.param.as_ref()?;
    let spec = parameters.get(name.as_str())?;
    spec.matches(string_form).then(|| name.clone())
}

/// Effective parameter provenance of a record.
///
/// The explicit record flag wins over a content match, including an
/// explicit `false`, which strips provenance even when the content equals a
/// parameter default (policy recorded in DESIGN.md).
pub fn param_provenance(
    value: &Value,
    constraints: &NormalizedConstraints,
    parameters: &Parameters,
) -> (bool, Option<SmolStr>) {
    match value.is_from_param() {
        Some(false) => (false, None),
        Some(true) => {
            let source = value
                .param_source()
                .map(SmolStr::new)
                .or_else(|| content_param_source(&value.string_form(), constraints, parameters));
            (true, source)
        }
        None => match content_param_source(&value.string_form(), constraints, parameters) {
            Some(source) => (true, Some(source)),
            None => (false, None),
        },
    }
}

/// Member-side editability fallback when no record flag and no group context
/// decide: creatability grants editability; otherwise permissive unless
/// either the member side or the global flag is explicitly `false`.
fn fallback_member_editability(constraints: &NormalizedConstraints) -> bool {
    if member_creatability(constraints) {
        return true;
    }
    not_false(constraints.member.editable) && not_false(constraints.editable)
}

fn editability_after_param(
    is_from_param: bool,
    explicit: Option<bool>,
    group: Option<&Group>,
    constraints: &NormalizedConstraints,
) -> bool {
    if is_from_param {
        return false;
    }
    if let Some(flag) = explicit {
        return flag;
    }
    if let Some(group) = group {
        if !group_editability(group, constraints) {
            return false;
        }
    }
    fallback_member_editability(constraints)
}

/// Effective editability of a value record, with optional owning-group
/// context. Precedence: parameter override, explicit record flag, group
/// read-only inheritance, creatability, permissive default.
pub fn value_editability(
    value: &Value,
    group: Option<&Group>,
    constraints: &NormalizedConstraints,
    parameters: &Parameters,
) -> bool {
    let (is_from_param, _) = param_provenance(value, constraints, parameters);
    editability_after_param(is_from_param, value.is_editable(), group, constraints)
}

/// Derive metadata for raw content not yet backed by a record (pool
/// candidates, fresh input).
pub fn derive_metadata(
    scalar: &Scalar,
    constraints: &NormalizedConstraints,
    parameters: &Parameters,
) -> Metadata {
    let string_form = scalar.string_form();
    let param_source = content_param_source(&string_form, constraints, parameters);
    let is_from_param = param_source.is_some();
    Metadata {
        is_from_param,
        param_source,
        is_editable: !is_from_param && fallback_member_editability(constraints),
        value_type: constraints.member.resolved_type(),
    }
}

/// Three-tier metadata lookup: explicit per-record flags, then
/// derived-and-cached by id, then derived-and-cached by content.
///
/// Record flags are never cached: they overlay the cached derivation on
/// every query, so a host-stamped flag can never be shadowed by a stale
/// entry. The by-id tier is invalidated when a record's content is
/// rewritten; both tiers are dropped on configuration change.
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    by_id: BTreeMap<ValueId, Metadata>,
    by_content: BTreeMap<String, Metadata>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
        self.by_content.clear();
    }

    pub fn invalidate_id(&mut self, value_id: &ValueId) {
        self.by_id.remove(value_id);
    }

    fn derived_base(
        &mut self,
        value: &Value,
        constraints: &NormalizedConstraints,
        parameters: &Parameters,
    ) -> Metadata {
        if let Some(cached) = self.by_id.get(value.id()) {
            return cached.clone();
        }
        let content = value.string_form();
        let derived = match self.by_content.get(&content) {
            Some(cached) => cached.clone(),
            None => {
                let derived = derive_metadata(value.value(), constraints, parameters);
                self.by_content.insert(content, derived.clone());
                derived
            }
        };
        self.by_id.insert(value.id().clone(), derived.clone());
        derived
    }

    /// Effective metadata for a record, record flags overlaid on the cached
    /// derivation.
    pub fn metadata(
        &mut self,
        value: &Value,
        group: Option<&Group>,
        constraints: &NormalizedConstraints,
        parameters: &Parameters,
    ) -> Metadata {
        let base = self.derived_base(value, constraints, parameters);

        let is_from_param = value.is_from_param().unwrap_or(base.is_from_param);
        let param_source = if is_from_param {
            value.param_source().map(SmolStr::new).or(base.param_source)
        } else {
            None
        };
        let is_editable =
            editability_after_param(is_from_param, value.is_editable(), group, constraints);

        Metadata {
            is_from_param,
            param_source,
            is_editable,
            value_type: base.value_type,
        }
    }
}
