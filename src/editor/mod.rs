// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The editor context.
//!
//! Owns the store plus the two transient singletons (active edit, active
//! drag) with a mount/reset lifecycle. Cross-cutting rules live here as
//! single explicit transitions: drag-start cancels the active edit, and any
//! mutation that removes or relocates the value under edit ends its session.

use crate::config::{Configuration, Parameters};
use crate::edit::{CommitOutcome, EditSession};
use crate::model::{GroupId, Value, ValueId};
use crate::resolve::Metadata;
use crate::store::{Decline, MappingStore, Snapshot};
use crate::transfer::{self, ContainerRef, DragEvent, DragState};

#[derive(Debug)]
pub struct Editor {
    store: MappingStore,
    edit: EditSession,
    drag: DragState,
}

impl Editor {
    /// Initialize the context at editor mount.
    pub fn new(config: &Configuration, parameters: Parameters) -> Self {
        Self {
            store: MappingStore::new(config, parameters),
            edit: EditSession::new(),
            drag: DragState::new(),
        }
    }

    /// Reset at unmount: the transient edit/drag singletons are dropped, the
    /// canonical data stays.
    pub fn reset(&mut self) {
        self.edit.cancel();
        self.drag.clear();
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn rev(&self) -> u64 {
        self.store.rev()
    }

    /// Hot-reload the configuration. The active edit is cancelled: its
    /// affordance may no longer exist under the new constraints.
    pub fn set_configuration(&mut self, config: &Configuration) {
        self.edit.cancel();
        self.store.set_configuration(config);
    }

    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.edit.cancel();
        self.store.set_parameters(parameters);
    }

    /// Cancel the edit session when its value is gone or has moved away
    /// from the container the session was opened on.
    fn sync_edit_session(&mut self) {
        let Some(active) = self.edit.active() else {
            return;
        };
        let location = self.store.mapping().location(active.value_id());
        if location != Some(active.container().as_location()) {
            self.edit.cancel();
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn create_group(&mut self, name: &str) -> Result<GroupId, Decline> {
        self.store.create_group(name)
    }

    pub fn rename_group(&mut self, group_id: &GroupId, new_name: &str) -> Result<(), Decline> {
        self.store.rename_group(group_id, new_name)
    }

    pub fn delete_group(&mut self, group_id: &GroupId) -> Result<(), Decline> {
        let result = self.store.delete_group(group_id);
        self.sync_edit_session();
        result
    }

    pub fn create_value(&mut self, raw: &str) -> Result<ValueId, Decline> {
        self.store.create_value(raw)
    }

    pub fn delete_value(&mut self, group_id: &GroupId, value_id: &ValueId) -> Result<(), Decline> {
        let result = self.store.delete_value(group_id, value_id);
        self.sync_edit_session();
        result
    }

    /// Move a value between containers addressed by canonical tokens
    /// (`pool`, `g:<group_id>`). Unparseable tokens are caller defects.
    pub fn move_value(
        &mut self,
        value_id: &ValueId,
        from_token: &str,
        to_token: &str,
    ) -> Result<(), Decline> {
        let Ok(from) = ContainerRef::parse(from_token) else {
            return Err(Decline::NotFound);
        };
        let Ok(to) = ContainerRef::parse(to_token) else {
            return Err(Decline::NotFound);
        };
        let result = transfer::move_value(&mut self.store, value_id, &from, &to, None);
        self.sync_edit_session();
        result
    }

    // ------------------------------------------------------------------
    // Inline editing
    // ------------------------------------------------------------------

    pub fn begin_edit(&mut self, value_id: &ValueId, container_token: &str) -> bool {
        let Ok(container) = ContainerRef::parse(container_token) else {
            return false;
        };
        self.edit.start(&self.store, &self.drag, value_id, &container)
    }

    pub fn edit_input(&mut self, buffer: impl Into<String>) {
        self.edit.update(buffer);
    }

    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }

    pub fn commit_edit(&mut self) -> CommitOutcome {
        self.edit.commit(&mut self.store)
    }

    pub fn editing_value(&self) -> Option<&ValueId> {
        self.edit.active().map(|active| active.value_id())
    }

    /// One-shot edit: start a session on the value in its current container,
    /// buffer `new_raw` and commit. Never mutates the record directly.
    pub fn edit_value(&mut self, value_id: &ValueId, new_raw: &str) -> CommitOutcome {
        let Some(location) = self.store.mapping().location(value_id) else {
            return CommitOutcome::Declined(Decline::NotFound);
        };
        let container = match location {
            None => ContainerRef::Pool,
            Some(group_id) => ContainerRef::Group(group_id.clone()),
        };
        if !self.edit.start(&self.store, &self.drag, value_id, &container) {
            return CommitOutcome::Declined(Decline::PermissionDenied);
        }
        self.edit.update(new_raw);
        self.edit.commit(&mut self.store)
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    /// Establish a drag. Editing and dragging are mutually exclusive: this
    /// is the one transition that enforces it.
    pub fn begin_drag(&mut self, value_id: ValueId, origin_token: &str) -> bool {
        let Ok(origin) = ContainerRef::parse(origin_token) else {
            return false;
        };
        self.edit.cancel();
        self.drag.begin(value_id, origin);
        true
    }

    /// Abandon the drag: all state is left exactly as it was.
    pub fn cancel_drag(&mut self) {
        self.drag.clear();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Resolve a drop. `target: None` (dropped outside every container) is a
    /// pure no-op beyond clearing the drag state.
    pub fn complete_drag(&mut self, event: DragEvent) -> Result<(), Decline> {
        let from = self
            .drag
            .active()
            .filter(|active| active.value_id() == &event.value_id)
            .map(|active| active.origin().clone())
            .or_else(|| {
                self.store
                    .mapping()
                    .location(&event.value_id)
                    .map(|location| match location {
                        None => ContainerRef::Pool,
                        Some(group_id) => ContainerRef::Group(group_id.clone()),
                    })
            })
            .unwrap_or(ContainerRef::Pool);
        self.drag.clear();

        let Some(target) = event.target else {
            return Ok(());
        };
        let result = transfer::move_value(
            &mut self.store,
            &event.value_id,
            &from,
            &target,
            event.payload,
        );
        self.sync_edit_session();
        result
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The reconciled unassigned set: tracked pool records plus
    /// constraint-declared candidates.
    pub fn available_values(&self) -> Vec<Value> {
        transfer::available_values(&self.store)
    }

    pub fn value_metadata(&self, value_id: &ValueId) -> Option<Metadata> {
        self.store.value_metadata(value_id)
    }

    pub fn is_group_editable(&self, group_id: &GroupId) -> bool {
        self.store.is_group_editable(group_id)
    }

    pub fn is_group_deletable(&self, group_id: &GroupId) -> bool {
        self.store.is_group_deletable(group_id)
    }

    pub fn is_group_full(&self, group_id: &GroupId) -> bool {
        self.store.is_group_full(group_id)
    }

    pub fn has_reached_max_values(&self) -> bool {
        self.store.has_reached_max_values()
    }

    pub fn has_reached_max_groups(&self) -> bool {
        self.store.has_reached_max_groups()
    }
}
