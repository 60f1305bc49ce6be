// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Capacity limits derived from the constraint configuration.
//!
//! Advisory gates consulted before mutation. They never invalidate existing
//! state: when constraints tighten below what is already stored, the stored
//! values stay and only new additions are blocked.

use crate::config::NormalizedConstraints;
use crate::model::Group;

/// Capacity caps; `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitGuard {
    max_groups: Option<usize>,
    max_values_per_group: Option<usize>,
    max_total_values: Option<usize>,
}

impl LimitGuard {
    pub fn from_constraints(constraints: &NormalizedConstraints) -> Self {
        let max_groups = constraints.group.array_len;
        let max_values_per_group = constraints.member.array_len;
        let max_total_values = match (max_groups, max_values_per_group) {
            (Some(groups), Some(per_group)) => Some(groups.saturating_mul(per_group)),
            (Some(cap), None) | (None, Some(cap)) => Some(cap),
            (None, None) => None,
        };
        Self {
            max_groups,
            max_values_per_group,
            max_total_values,
        }
    }

    pub fn max_groups(&self) -> Option<usize> {
        self.max_groups
    }

    pub fn max_values_per_group(&self) -> Option<usize> {
        self.max_values_per_group
    }

    pub fn max_total_values(&self) -> Option<usize> {
        self.max_total_values
    }

    pub fn is_group_full(&self, group: &Group) -> bool {
        self.max_values_per_group
            .is_some_and(|cap| group.len() >= cap)
    }

    pub fn has_reached_max_groups(&self, group_count: usize) -> bool {
        self.max_groups.is_some_and(|cap| group_count >= cap)
    }

    /// Whether the assigned total (pool excluded) is at or over the cap.
    pub fn has_reached_max_values(&self, total_assigned: usize) -> bool {
        self.max_total_values
            .is_some_and(|cap| total_assigned >= cap)
    }
}
