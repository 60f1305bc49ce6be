// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Raw configuration and parameter shapes as supplied by the host.
//!
//! Configurations arrive either in the preferred nested
//! `key_constraints`/`value_constraints` shape or as legacy flat prefixed
//! fields; both are accepted and merged by [`normalize::normalize`] into the
//! single canonical form the rest of the crate operates on.

pub mod normalize;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::model::Scalar;

pub use normalize::{normalize, NormalizedConstraints, SideConstraints};

/// Which side of the mapping plays the group-identifier role.
///
/// Legacy-only: when either nested constraint sub-object is present, keys are
/// groups regardless of `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Key,
    Value,
}

/// One side of the nested constraint shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSideConstraints {
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub array: Option<Vec<serde_json::Value>>,
    pub array_len: Option<usize>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub regex: Option<String>,
    pub param: Option<String>,
    pub editable: Option<bool>,
    pub creatable: Option<bool>,
}

/// The full raw configuration of one mapping parameter.
///
/// Nested and legacy sources are both representable at once; merging is the
/// normalizer's job, not the deserializer's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub parent: Option<Side>,

    pub key_constraints: Option<RawSideConstraints>,
    pub value_constraints: Option<RawSideConstraints>,

    // Legacy flat fields, key side.
    pub key_type: Option<String>,
    pub key_array: Option<Vec<serde_json::Value>>,
    pub key_array_len: Option<usize>,
    pub key_min_value: Option<f64>,
    pub key_max_value: Option<f64>,
    pub key_min_len: Option<usize>,
    pub key_max_len: Option<usize>,
    pub key_regex: Option<String>,
    pub key_param: Option<String>,
    pub editable_key: Option<bool>,
    pub creatable_key: Option<bool>,

    // Legacy flat fields, value side.
    pub value_type: Option<String>,
    pub value_array: Option<Vec<serde_json::Value>>,
    pub value_array_len: Option<usize>,
    pub value_min_value: Option<f64>,
    pub value_max_value: Option<f64>,
    pub value_min_len: Option<usize>,
    pub value_max_len: Option<usize>,
    pub value_regex: Option<String>,
    pub value_param: Option<String>,
    pub editable_value: Option<bool>,
    pub creatable_value: Option<bool>,

    // Global fallbacks applying to both sides.
    pub editable: Option<bool>,
    pub creatable: Option<bool>,
}

/// External parameter lookup: name → default value(s).
///
/// Used only to decide parameter provenance (`is_from_param`/`param_source`);
/// fetching the definitions is the host's job.
pub type Parameters = BTreeMap<SmolStr, ParamSpec>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamSpec {
    pub default: Option<ParamDefault>,
}

/// A parameter default: one scalar or a list of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamDefault {
    Many(Vec<serde_json::Value>),
    One(serde_json::Value),
}

impl ParamSpec {
    /// The default entries as scalars, non-scalar JSON filtered out.
    pub fn default_scalars(&self) -> Vec<Scalar> {
        match &self.default {
            None => Vec::new(),
            Some(ParamDefault::One(value)) => Scalar::from_json(value).into_iter().collect(),
            Some(ParamDefault::Many(values)) => {
                values.iter().filter_map(Scalar::from_json).collect()
            }
        }
    }

    /// Whether any default entry's string form equals `string_form`.
    pub fn matches(&self, string_form: &str) -> bool {
        self.default_scalars()
            .iter()
            .any(|scalar| scalar.string_form() == string_form)
    }
}
