// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;

use super::ids::{GroupId, ValueId};
use super::value::Value;

/// Per-group value storage. Most groups hold a handful of values.
pub type ValueList = SmallVec<[Value; 4]>;

/// A named container of values.
///
/// `id` is the stable storage key; `name` is the user-facing, renamable
/// label. Invariant: `values` never holds two entries with the same id;
/// [`Group::push_value`] refuses duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: SmolStr,
    values: ValueList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_editable: Option<bool>,
}

impl Group {
    pub fn new(id: GroupId, name: impl Into<SmolStr>) -> Self {
        Self {
            id,
            name: name.into(),
            values: ValueList::new(),
            is_editable: None,
        }
    }

    pub fn new_with(id: GroupId, name: impl Into<SmolStr>, is_editable: Option<bool>) -> Self {
        Self {
            id,
            name: name.into(),
            values: ValueList::new(),
            is_editable,
        }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<SmolStr>) {
        self.name = name.into();
    }

    pub fn is_editable(&self) -> Option<bool> {
        self.is_editable
    }

    pub fn set_is_editable(&mut self, is_editable: Option<bool>) {
        self.is_editable = is_editable;
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_value(&self, value_id: &ValueId) -> bool {
        self.values.iter().any(|v| v.id() == value_id)
    }

    pub fn value(&self, value_id: &ValueId) -> Option<&Value> {
        self.values.iter().find(|v| v.id() == value_id)
    }

    pub fn value_mut(&mut self, value_id: &ValueId) -> Option<&mut Value> {
        self.values.iter_mut().find(|v| v.id() == value_id)
    }

    /// Append a value, preserving the no-duplicate-id invariant.
    /// Returns `false` (and drops nothing) when the id is already present.
    pub fn push_value(&mut self, value: Value) -> bool {
        if self.contains_value(value.id()) {
            return false;
        }
        self.values.push(value);
        true
    }

    /// Remove and return the value with the given id, keeping order.
    pub fn remove_value(&mut self, value_id: &ValueId) -> Option<Value> {
        let index = self.values.iter().position(|v| v.id() == value_id)?;
        Some(self.values.remove(index))
    }
}
