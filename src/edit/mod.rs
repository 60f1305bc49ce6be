// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The inline-edit state machine.
//!
//! At most one value is under edit at a time: `Idle → Editing → Idle` via
//! commit or cancel. `update` only touches the local buffer; the store is
//! written exactly once, at a successful commit, and a commit whose parsed
//! buffer equals the parsed original never reaches the store at all.

use crate::model::{Scalar, ValueId};
use crate::store::{Decline, MappingStore};
use crate::transfer::{ContainerRef, DragState};

/// The value currently under edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEdit {
    value_id: ValueId,
    container: ContainerRef,
    buffer: String,
    original: String,
}

impl ActiveEdit {
    pub fn value_id(&self) -> &ValueId {
        &self.value_id
    }

    pub fn container(&self) -> &ContainerRef {
        &self.container
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn original(&self) -> &str {
        &self.original
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The parsed buffer was written to the store.
    Applied,
    /// Parsed buffer equals the parsed original: no write, no notification.
    Unchanged,
    /// The commit was rejected; the store is untouched.
    Declined(Decline),
    /// There was no active session to commit.
    Idle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSession {
    active: Option<ActiveEdit>,
    committing: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveEdit> {
        self.active.as_ref()
    }

    /// Begin editing a tracked value. No-op (returns `false`) unless the
    /// value lives in the given container, its resolved metadata marks it
    /// editable, and no drag is in flight. A prior session is implicitly
    /// cancelled.
    pub fn start(
        &mut self,
        store: &MappingStore,
        drag: &DragState,
        value_id: &ValueId,
        container: &ContainerRef,
    ) -> bool {
        if drag.is_active() {
            return false;
        }
        let Some(actual) = store.mapping().location(value_id) else {
            return false;
        };
        if actual != container.as_location() {
            return false;
        }
        let editable = store
            .value_metadata(value_id)
            .is_some_and(|metadata| metadata.is_editable);
        if !editable {
            return false;
        }
        let Some(record) = store.mapping().value(value_id) else {
            return false;
        };

        let original = record.string_form();
        self.active = Some(ActiveEdit {
            value_id: value_id.clone(),
            container: container.clone(),
            buffer: original.clone(),
            original,
        });
        true
    }

    /// Replace the local buffer. Never writes to the store.
    pub fn update(&mut self, buffer: impl Into<String>) {
        if let Some(active) = &mut self.active {
            active.buffer = buffer.into();
        }
    }

    /// Discard the session; the record is left unchanged.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Commit the buffer: coerce to the declared type, drop no-op edits,
    /// reject duplicates in the target container, validate, then write in
    /// place. The session ends on every outcome.
    pub fn commit(&mut self, store: &mut MappingStore) -> CommitOutcome {
        // Blur and Enter may both fire for one interaction; only the first
        // commit runs.
        if self.committing {
            return CommitOutcome::Idle;
        }
        self.committing = true;
        let outcome = self.commit_active(store);
        self.committing = false;
        outcome
    }

    fn commit_active(&mut self, store: &mut MappingStore) -> CommitOutcome {
        let Some(active) = self.active.take() else {
            return CommitOutcome::Idle;
        };
        let Some(record) = store.mapping().value(&active.value_id) else {
            return CommitOutcome::Declined(Decline::NotFound);
        };

        let value_type = record.value_type();
        let parsed = Scalar::coerce(&active.buffer, value_type);
        let original = Scalar::coerce(&active.original, value_type);
        if parsed == original {
            return CommitOutcome::Unchanged;
        }

        let location = active.container.as_location();
        if store.container_has_duplicate(location, &active.value_id, &parsed) {
            return CommitOutcome::Declined(Decline::DuplicateValue);
        }
        if !store.validate_member_scalar(&parsed) {
            return CommitOutcome::Declined(Decline::InvalidInput);
        }

        match store.write_value(&active.value_id, parsed) {
            Ok(()) => CommitOutcome::Applied,
            Err(decline) => CommitOutcome::Declined(decline),
        }
    }
}
