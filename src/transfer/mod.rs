// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Drag-and-drop transfer protocol.
//!
//! Containers are addressed by opaque host tokens with a canonical form:
//! `pool` for the unassigned pool and `g:<group_id>` for a group. The move
//! protocol resolves the value's record from its *current* container whenever
//! one exists; the drag payload is consulted only for untracked pool
//! candidates, so accumulated metadata is never lost to a re-derived guess.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use crate::model::{GroupId, IdError, Scalar, Value, ValueId, ValueType};
use crate::store::{Decline, MappingStore};

/// A drop location: the unassigned pool or a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerRef {
    Pool,
    Group(GroupId),
}

impl ContainerRef {
    pub fn group(group_id: GroupId) -> Self {
        Self::Group(group_id)
    }

    /// The location form used by the store: `None` = pool.
    pub fn as_location(&self) -> Option<&GroupId> {
        match self {
            Self::Pool => None,
            Self::Group(group_id) => Some(group_id),
        }
    }

    /// Parse a canonical container token (`pool` or `g:<group_id>`).
    pub fn parse(input: &str) -> Result<Self, ParseContainerRefError> {
        if input.is_empty() {
            return Err(ParseContainerRefError::Empty);
        }
        if input == "pool" {
            return Ok(Self::Pool);
        }
        let Some(rest) = input.strip_prefix("g:") else {
            return Err(ParseContainerRefError::UnknownScheme(input.to_owned()));
        };
        if rest.is_empty() {
            return Err(ParseContainerRefError::MissingGroupId);
        }
        let group_id =
            GroupId::new(rest.to_owned()).map_err(ParseContainerRefError::InvalidGroupId)?;
        Ok(Self::Group(group_id))
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool => f.write_str("pool"),
            Self::Group(group_id) => write!(f, "g:{group_id}"),
        }
    }
}

impl FromStr for ContainerRef {
    type Err = ParseContainerRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseContainerRefError {
    Empty,
    UnknownScheme(String),
    MissingGroupId,
    InvalidGroupId(IdError),
}

impl fmt::Display for ParseContainerRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("container token must not be empty"),
            Self::UnknownScheme(token) => write!(f, "unknown container token '{token}'"),
            Self::MissingGroupId => f.write_str("container token 'g:' is missing a group id"),
            Self::InvalidGroupId(source) => write!(f, "invalid group id in container token: {source}"),
        }
    }
}

impl std::error::Error for ParseContainerRefError {}

/// One drag interaction as reported by the host sensor layer.
///
/// `target: None` is the no-valid-target sentinel: the item was dropped
/// outside any registered container and the drag resolves to a pure no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEvent {
    pub value_id: ValueId,
    /// The item's original metadata payload, used only when the id is not
    /// tracked by the store (a pool candidate being materialized).
    pub payload: Option<Value>,
    pub target: Option<ContainerRef>,
}

/// The (at most one) drag currently in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    active: Option<ActiveDrag>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag {
    value_id: ValueId,
    origin: ContainerRef,
}

impl ActiveDrag {
    pub fn value_id(&self) -> &ValueId {
        &self.value_id
    }

    pub fn origin(&self) -> &ContainerRef {
        &self.origin
    }
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    /// Establish a new drag; an already-active drag is replaced.
    pub fn begin(&mut self, value_id: ValueId, origin: ContainerRef) {
        self.active = Some(ActiveDrag { value_id, origin });
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Execute the move protocol.
///
/// Same source and target is a no-op. A tracked record is moved through the
/// store entry point (metadata travels with it); an untracked id is
/// materialized from the payload, provided the payload matches the id.
pub fn move_value(
    store: &mut MappingStore,
    value_id: &ValueId,
    from: &ContainerRef,
    to: &ContainerRef,
    payload: Option<Value>,
) -> Result<(), Decline> {
    if from == to {
        return Ok(());
    }
    if store.mapping().tracks_value(value_id) {
        return store.move_value(value_id, to.as_location());
    }
    match payload {
        Some(payload) if payload.id() == value_id => store
            .adopt_value(to.as_location(), payload)
            .map(|_| ()),
        _ => Err(Decline::NotFound),
    }
}

/// The reconciled "available" set the host renders as the pool.
///
/// Tracked pool records come first and are authoritative; constraint-declared
/// candidates (member-side `array` entries, then parameter defaults) follow,
/// each under a content-derived id and suppressed when that id is already
/// tracked anywhere. Dedup is id-keyed, not content-keyed: a user-created
/// record with a minted id never shadows a candidate.
pub fn available_values(store: &MappingStore) -> Vec<Value> {
    let mut out: Vec<Value> = store.mapping().pool().values().cloned().collect();
    out.extend(candidate_values(store));
    out
}

/// Constraint-declared pool candidates not yet materialized as records.
pub fn candidate_values(store: &MappingStore) -> Vec<Value> {
    let member = &store.constraints().member;
    let value_type = member.resolved_type();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::new();

    for scalar in &member.array {
        push_candidate(&mut out, &mut seen, store, scalar, None, value_type);
    }
    if let Some(name) = member.param.clone() {
        if let Some(spec) = store.parameters().get(name.as_str()) {
            for scalar in spec.default_scalars() {
                push_candidate(&mut out, &mut seen, store, &scalar, Some(&name), value_type);
            }
        }
    }
    out
}

fn push_candidate(
    out: &mut Vec<Value>,
    seen: &mut BTreeSet<String>,
    store: &MappingStore,
    scalar: &Scalar,
    param: Option<&SmolStr>,
    value_type: ValueType,
) {
    let content = scalar.string_form();
    // Content that is not a valid id segment cannot be offered as a
    // candidate; it can still be created explicitly.
    let Ok(value_id) = ValueId::new(content.clone()) else {
        return;
    };
    if store.mapping().tracks_value(&value_id) || !seen.insert(content) {
        return;
    }
    let mut value = Value::new(value_id, scalar.clone(), value_type);
    if let Some(name) = param {
        value.set_is_from_param(Some(true));
        value.set_param_source(Some(name.clone()));
    }
    out.push(value);
}

#[cfg(test)]
mod tests;
