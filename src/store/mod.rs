// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The mapping store.
//!
//! Exclusive owner of the canonical structure. Every mutating operation
//! checks constraints and limits first and returns `Result<_, Decline>`;
//! `Err` guarantees that neither the structure nor the revision counter
//! changed. The revision counter is the change notification: hosts re-render
//! when it moves.

use std::cell::RefCell;
use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::config::{normalize, Configuration, NormalizedConstraints, Parameters, SideConstraints};
use crate::limits::LimitGuard;
use crate::model::{Group, GroupId, Mapping, Scalar, Value, ValueId};
use crate::resolve::{self, Metadata, MetadataCache};

/// Why an operation was declined. Declines are expected, user-triggerable
/// conditions and never carry partial state: the store is exactly as it was.
///
/// `NotFound` is the exception: it flags a dangling id coming out of the
/// caller's id-tracking (typically a stale drag payload) and should be
/// treated as a defect there, not as a user condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decline {
    PermissionDenied,
    CapacityExceeded,
    DuplicateValue,
    InvalidInput,
    NotFound,
}

impl fmt::Display for Decline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => f.write_str("operation not permitted by resolved constraints"),
            Self::CapacityExceeded => f.write_str("capacity limit reached"),
            Self::DuplicateValue => f.write_str("duplicate value in target container"),
            Self::InvalidInput => f.write_str("invalid input"),
            Self::NotFound => f.write_str("record or container not found"),
        }
    }
}

impl std::error::Error for Decline {}

/// Immutable view handed to the host after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub rev: u64,
    pub groups: Vec<Group>,
    pub unassigned: Vec<Value>,
}

#[derive(Debug)]
pub struct MappingStore {
    mapping: Mapping,
    constraints: NormalizedConstraints,
    parameters: Parameters,
    limits: LimitGuard,
    group_regex: Option<Regex>,
    member_regex: Option<Regex>,
    cache: RefCell<MetadataCache>,
    rev: u64,
    next_group: u64,
    next_value: u64,
}

fn compile_side_regex(side: &SideConstraints) -> Option<Regex> {
    // Invalid host-supplied patterns disable the check rather than poisoning
    // the whole configuration.
    side.regex.as_deref().and_then(|pattern| Regex::new(pattern).ok())
}

impl MappingStore {
    pub fn new(config: &Configuration, parameters: Parameters) -> Self {
        let constraints = normalize(config);
        let limits = LimitGuard::from_constraints(&constraints);
        let group_regex = compile_side_regex(&constraints.group);
        let member_regex = compile_side_regex(&constraints.member);
        Self {
            mapping: Mapping::new(),
            constraints,
            parameters,
            limits,
            group_regex,
            member_regex,
            cache: RefCell::new(MetadataCache::new()),
            rev: 0,
            next_group: 0,
            next_value: 0,
        }
    }

    /// Swap in a hot-reloaded configuration. Derived caches are rebuilt;
    /// existing records (including frozen per-record flags) stay as they are.
    pub fn set_configuration(&mut self, config: &Configuration) {
        self.constraints = normalize(config);
        self.limits = LimitGuard::from_constraints(&self.constraints);
        self.group_regex = compile_side_regex(&self.constraints.group);
        self.member_regex = compile_side_regex(&self.constraints.member);
        self.cache.get_mut().clear();
    }

    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters = parameters;
        self.cache.get_mut().clear();
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn constraints(&self) -> &NormalizedConstraints {
        &self.constraints
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn limits(&self) -> &LimitGuard {
        &self.limits
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rev: self.rev,
            groups: self.mapping.groups().values().cloned().collect(),
            unassigned: self.mapping.pool().values().cloned().collect(),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn group(&self, group_id: &GroupId) -> Option<&Group> {
        self.mapping.group(group_id)
    }

    pub fn is_group_editable(&self, group_id: &GroupId) -> bool {
        self.mapping
            .group(group_id)
            .is_some_and(|group| resolve::group_editability(group, &self.constraints))
    }

    pub fn is_group_deletable(&self, group_id: &GroupId) -> bool {
        self.mapping.group(group_id).is_some_and(|group| {
            resolve::group_deletability(group, &self.constraints, &self.parameters)
        })
    }

    pub fn is_group_full(&self, group_id: &GroupId) -> bool {
        self.mapping
            .group(group_id)
            .is_some_and(|group| self.limits.is_group_full(group))
    }

    pub fn has_reached_max_values(&self) -> bool {
        self.limits
            .has_reached_max_values(self.mapping.total_assigned())
    }

    pub fn has_reached_max_groups(&self) -> bool {
        self.limits
            .has_reached_max_groups(self.mapping.groups().len())
    }

    /// Effective metadata of a tracked value, owning-group context included.
    pub fn value_metadata(&self, value_id: &ValueId) -> Option<Metadata> {
        let location = self.mapping.location(value_id)?;
        let group = location.and_then(|group_id| self.mapping.group(group_id));
        let value = self.mapping.value(value_id)?;
        Some(self.cache.borrow_mut().metadata(
            value,
            group,
            &self.constraints,
            &self.parameters,
        ))
    }

    /// Whether a *different* id in the same container already holds this
    /// parsed content (the duplicate guard used at commit time).
    pub(crate) fn container_has_duplicate(
        &self,
        location: Option<&GroupId>,
        value_id: &ValueId,
        scalar: &Scalar,
    ) -> bool {
        match location {
            None => self
                .mapping
                .pool()
                .values()
                .any(|v| v.id() != value_id && v.value() == scalar),
            Some(group_id) => self.mapping.group(group_id).is_some_and(|group| {
                group
                    .values()
                    .iter()
                    .any(|v| v.id() != value_id && v.value() == scalar)
            }),
        }
    }

    // ------------------------------------------------------------------
    // Validation helpers
    // ------------------------------------------------------------------

    fn validate_group_name(&self, name: &str) -> bool {
        let side = &self.constraints.group;
        if !side.array.is_empty() && !side.array.iter().any(|a| a.string_form() == name) {
            return false;
        }
        let len = name.chars().count();
        if side.min_len.is_some_and(|min| len < min) || side.max_len.is_some_and(|max| len > max) {
            return false;
        }
        if let Some(regex) = &self.group_regex {
            if !regex.is_match(name) {
                return false;
            }
        }
        true
    }

    pub(crate) fn validate_member_scalar(&self, scalar: &Scalar) -> bool {
        let side = &self.constraints.member;
        let string_form = scalar.string_form();
        if !side.array.is_empty()
            && !side.array.iter().any(|a| a.string_form() == string_form)
        {
            return false;
        }
        if let Scalar::Number(n) = scalar {
            if side.min_value.is_some_and(|min| *n < min)
                || side.max_value.is_some_and(|max| *n > max)
            {
                return false;
            }
        }
        if let Scalar::Str(s) = scalar {
            let len = s.chars().count();
            if side.min_len.is_some_and(|min| len < min)
                || side.max_len.is_some_and(|max| len > max)
            {
                return false;
            }
            if let Some(regex) = &self.member_regex {
                if !regex.is_match(s) {
                    return false;
                }
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    fn mint_group_id(&mut self) -> GroupId {
        loop {
            self.next_group += 1;
            let candidate = format!("g{:06}", self.next_group);
            if self.mapping.groups().contains_key(candidate.as_str()) {
                continue;
            }
            if let Ok(id) = GroupId::new(candidate) {
                return id;
            }
        }
    }

    fn mint_value_id(&mut self) -> ValueId {
        loop {
            self.next_value += 1;
            let candidate = format!("v{:06}", self.next_value);
            if let Ok(id) = ValueId::new(candidate) {
                if !self.mapping.tracks_value(&id) {
                    return id;
                }
            }
        }
    }

    /// Create a named group. The resolved group-side editability is frozen
    /// onto the record so later constraint changes do not retroactively
    /// alter it.
    pub fn create_group(&mut self, name: &str) -> Result<GroupId, Decline> {
        if !resolve::group_creatability(&self.constraints) {
            return Err(Decline::PermissionDenied);
        }
        if self.has_reached_max_groups() {
            return Err(Decline::CapacityExceeded);
        }
        if name.trim().is_empty() || !self.validate_group_name(name) {
            return Err(Decline::InvalidInput);
        }
        if self.mapping.group_by_name(name).is_some() {
            return Err(Decline::DuplicateValue);
        }

        let group_id = self.mint_group_id();
        let frozen = resolve::derived_group_editability(&self.constraints);
        self.mapping
            .insert_group(Group::new_with(group_id.clone(), name, Some(frozen)));
        self.bump_rev();
        Ok(group_id)
    }

    pub fn rename_group(&mut self, group_id: &GroupId, new_name: &str) -> Result<(), Decline> {
        let Some(group) = self.mapping.group(group_id) else {
            return Err(Decline::NotFound);
        };
        if !resolve::group_editability(group, &self.constraints) {
            return Err(Decline::PermissionDenied);
        }
        if new_name.trim().is_empty() || !self.validate_group_name(new_name) {
            return Err(Decline::InvalidInput);
        }
        if let Some(existing) = self.mapping.group_by_name(new_name) {
            if existing.id() == group_id {
                // Renaming to the current name is a no-op, not a conflict.
                return Ok(());
            }
            return Err(Decline::DuplicateValue);
        }

        if let Some(group) = self.mapping.group_mut(group_id) {
            group.set_name(new_name);
        }
        self.bump_rev();
        Ok(())
    }

    /// Delete a group and its values permanently. Values are not moved to
    /// the pool.
    pub fn delete_group(&mut self, group_id: &GroupId) -> Result<(), Decline> {
        let Some(group) = self.mapping.group(group_id) else {
            return Err(Decline::NotFound);
        };
        if !resolve::group_deletability(group, &self.constraints, &self.parameters) {
            return Err(Decline::PermissionDenied);
        }

        if let Some(removed) = self.mapping.remove_group(group_id) {
            let cache = self.cache.get_mut();
            for value in removed.values() {
                cache.invalidate_id(value.id());
            }
        }
        self.bump_rev();
        Ok(())
    }

    /// Create a value in the unassigned pool. The pool is unbounded, so no
    /// limit check applies; assignment into a group is checked at move time.
    pub fn create_value(&mut self, raw: &str) -> Result<ValueId, Decline> {
        if !resolve::member_creatability(&self.constraints) {
            return Err(Decline::PermissionDenied);
        }
        let value_type = self.constraints.member.resolved_type();
        let scalar = Scalar::coerce(raw, value_type);
        if !self.validate_member_scalar(&scalar) {
            return Err(Decline::InvalidInput);
        }
        if self
            .mapping
            .pool()
            .values()
            .any(|existing| existing.value() == &scalar)
        {
            return Err(Decline::DuplicateValue);
        }

        let value_id = self.mint_value_id();
        let mut value = Value::new(value_id.clone(), scalar, value_type);
        let metadata = resolve::derive_metadata(value.value(), &self.constraints, &self.parameters);
        if metadata.is_from_param {
            // Stamp provenance so it survives later parameter-list changes.
            value.set_is_from_param(Some(true));
            value.set_param_source(metadata.param_source);
        }
        self.mapping
            .insert_value(None, value)
            .map_err(|_| Decline::DuplicateValue)?;
        self.bump_rev();
        Ok(value_id)
    }

    /// Delete a value from a group.
    pub fn delete_value(&mut self, group_id: &GroupId, value_id: &ValueId) -> Result<(), Decline> {
        let Some(group) = self.mapping.group(group_id) else {
            return Err(Decline::NotFound);
        };
        let Some(value) = group.value(value_id) else {
            return Err(Decline::NotFound);
        };
        if !resolve::value_editability(value, Some(group), &self.constraints, &self.parameters) {
            return Err(Decline::PermissionDenied);
        }
        if !resolve::group_editability(group, &self.constraints) {
            return Err(Decline::PermissionDenied);
        }

        self.mapping.remove_value(value_id);
        self.cache.get_mut().invalidate_id(value_id);
        self.bump_rev();
        Ok(())
    }

    /// Move a tracked value to `to` (`None` = pool). The record travels
    /// unmodified; only its location changes. Moving to the current
    /// container is a no-op that does not bump the revision.
    pub fn move_value(
        &mut self,
        value_id: &ValueId,
        to: Option<&GroupId>,
    ) -> Result<(), Decline> {
        let Some(current) = self.mapping.location(value_id) else {
            return Err(Decline::NotFound);
        };
        if current == to {
            return Ok(());
        }
        let origin: Option<GroupId> = current.cloned();
        let from_pool = origin.is_none();

        if let Some(target_id) = to {
            let Some(target) = self.mapping.group(target_id) else {
                return Err(Decline::NotFound);
            };
            if self.limits.is_group_full(target) {
                return Err(Decline::CapacityExceeded);
            }
            // Only pool→group moves grow the assigned total; moves between
            // groups at max total stay legal.
            if from_pool && self.has_reached_max_values() {
                return Err(Decline::CapacityExceeded);
            }
        }

        let Some(record) = self.mapping.remove_value(value_id) else {
            return Err(Decline::NotFound);
        };
        match self.mapping.insert_value(to, record) {
            Ok(()) => {
                self.bump_rev();
                Ok(())
            }
            Err(record) => {
                // The target was checked above, so this cannot happen in the
                // synchronous flow; never drop the record regardless.
                let _ = self.mapping.insert_value(origin.as_ref(), record);
                Err(Decline::NotFound)
            }
        }
    }

    /// Materialize an untracked record (a pool candidate carried in a drag
    /// payload) directly into `to`. Capacity checks match a pool→group move.
    pub fn adopt_value(&mut self, to: Option<&GroupId>, value: Value) -> Result<ValueId, Decline> {
        if self.mapping.tracks_value(value.id()) {
            return Err(Decline::DuplicateValue);
        }
        if let Some(target_id) = to {
            let Some(target) = self.mapping.group(target_id) else {
                return Err(Decline::NotFound);
            };
            if self.limits.is_group_full(target) {
                return Err(Decline::CapacityExceeded);
            }
            if self.has_reached_max_values() {
                return Err(Decline::CapacityExceeded);
            }
        }

        let value_id = value.id().clone();
        self.mapping
            .insert_value(to, value)
            .map_err(|_| Decline::NotFound)?;
        self.bump_rev();
        Ok(value_id)
    }

    /// Rewrite a tracked value's content in place, preserving id, type and
    /// metadata. Used by the edit-session commit only.
    pub(crate) fn write_value(&mut self, value_id: &ValueId, scalar: Scalar) -> Result<(), Decline> {
        let Some(value) = self.mapping.value_mut(value_id) else {
            return Err(Decline::NotFound);
        };
        value.set_value(scalar);
        self.cache.get_mut().invalidate_id(value_id);
        self.bump_rev();
        Ok(())
    }
}
