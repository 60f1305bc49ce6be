// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::group::Group;
use super::ids::{GroupId, ValueId};
use super::value::Value;

/// The canonical nested structure the editor runs against.
///
/// `locations` is the side index enforcing the uniqueness invariant: a value
/// id is tracked in exactly one place, one group (`Some(group_id)`) or the
/// unassigned pool (`None`): never both, never neither once created. All
/// mutation goes through the targeted helpers below so maps and index cannot
/// diverge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    groups: BTreeMap<GroupId, Group>,
    pool: BTreeMap<ValueId, Value>,
    locations: BTreeMap<ValueId, Option<GroupId>>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &BTreeMap<GroupId, Group> {
        &self.groups
    }

    pub fn group(&self, group_id: &GroupId) -> Option<&Group> {
        self.groups.get(group_id)
    }

    pub fn group_mut(&mut self, group_id: &GroupId) -> Option<&mut Group> {
        self.groups.get_mut(group_id)
    }

    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups.values().find(|g| g.name() == name)
    }

    pub fn pool(&self) -> &BTreeMap<ValueId, Value> {
        &self.pool
    }

    pub fn locations(&self) -> &BTreeMap<ValueId, Option<GroupId>> {
        &self.locations
    }

    /// Where a value currently lives: `Some(None)` = pool,
    /// `Some(Some(group_id))` = that group, `None` = not tracked at all.
    pub fn location(&self, value_id: &ValueId) -> Option<Option<&GroupId>> {
        self.locations.get(value_id).map(Option::as_ref)
    }

    pub fn tracks_value(&self, value_id: &ValueId) -> bool {
        self.locations.contains_key(value_id)
    }

    pub fn value(&self, value_id: &ValueId) -> Option<&Value> {
        match self.locations.get(value_id)? {
            None => self.pool.get(value_id),
            Some(group_id) => self.groups.get(group_id)?.value(value_id),
        }
    }

    pub fn value_mut(&mut self, value_id: &ValueId) -> Option<&mut Value> {
        match self.locations.get(value_id)? {
            None => self.pool.get_mut(value_id),
            Some(group_id) => {
                let group_id = group_id.clone();
                self.groups.get_mut(&group_id)?.value_mut(value_id)
            }
        }
    }

    /// Number of values currently assigned to groups (the pool is excluded).
    pub fn total_assigned(&self) -> usize {
        self.groups.values().map(Group::len).sum()
    }

    pub fn insert_group(&mut self, group: Group) -> bool {
        if self.groups.contains_key(group.id()) {
            return false;
        }
        self.groups.insert(group.id().clone(), group);
        true
    }

    /// Remove a group together with its values. The values are untracked,
    /// not moved to the pool.
    pub fn remove_group(&mut self, group_id: &GroupId) -> Option<Group> {
        let group = self.groups.remove(group_id)?;
        for value in group.values() {
            self.locations.remove(value.id());
        }
        Some(group)
    }

    /// Track a value at the given location. Refuses (and returns the value
    /// back) when the id is already tracked anywhere or the target group is
    /// missing.
    pub fn insert_value(&mut self, location: Option<&GroupId>, value: Value) -> Result<(), Value> {
        if self.locations.contains_key(value.id()) {
            return Err(value);
        }
        match location {
            None => {
                let value_id = value.id().clone();
                self.pool.insert(value_id.clone(), value);
                self.locations.insert(value_id, None);
            }
            Some(group_id) => {
                let Some(group) = self.groups.get_mut(group_id) else {
                    return Err(value);
                };
                if group.contains_value(value.id()) {
                    return Err(value);
                }
                let value_id = value.id().clone();
                group.push_value(value);
                self.locations.insert(value_id, Some(group_id.clone()));
            }
        }
        Ok(())
    }

    /// Untrack and return a value from wherever it currently lives.
    pub fn remove_value(&mut self, value_id: &ValueId) -> Option<Value> {
        let location = self.locations.remove(value_id)?;
        match location {
            None => self.pool.remove(value_id),
            Some(group_id) => self
                .groups
                .get_mut(&group_id)
                .and_then(|group| group.remove_value(value_id)),
        }
    }
}
