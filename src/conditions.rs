// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status condition ledger.
//!
//! A [`ConditionList`] holds at most one [`Condition`] per type, in insertion
//! order. Writes are upserts following the usual Kubernetes conventions:
//!
//! - `lastTransitionTime` moves only when `status` changes
//! - `lastHeartbeatTime` moves on every upsert, even when nothing changed
//!
//! The heartbeat lets readers judge how fresh a report is even when its
//! content has been stable for a long time.
//!
//! # Example
//!
//! ```rust
//! use axiom::conditions::{ConditionList, ConditionStatus};
//!
//! let mut conditions = ConditionList::default();
//! conditions.set("Available", ConditionStatus::True, "SuccessfullyConfigured", "1/1 nodes");
//! assert!(conditions.find("Available").is_some());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// One observation of an aspect of a resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub r#type: String,
    pub status: ConditionStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub last_heartbeat_time: DateTime<Utc>,
    #[serde(default)]
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    /// Create a condition whose heartbeat and transition times are both `now`.
    #[must_use]
    pub fn new(
        condition_type: &str,
        status: ConditionStatus,
        reason: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            r#type: condition_type.to_string(),
            status,
            reason: reason.to_string(),
            message: message.to_string(),
            last_heartbeat_time: now,
            last_transition_time: now,
        }
    }
}

/// Ordered list of conditions, unique by type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionList(Vec<Condition>);

impl ConditionList {
    /// Upsert a condition using the current time.
    pub fn set(&mut self, condition_type: &str, status: ConditionStatus, reason: &str, message: &str) {
        self.set_at(condition_type, status, reason, message, Utc::now());
    }

    /// Upsert a condition as observed at `now`.
    ///
    /// Appends when no condition of this type exists. Otherwise updates
    /// status, reason and message in place, moves the transition time only if
    /// the status changed, and always moves the heartbeat.
    pub fn set_at(
        &mut self,
        condition_type: &str,
        status: ConditionStatus,
        reason: &str,
        message: &str,
        now: DateTime<Utc>,
    ) {
        let Some(existing) = self.find_mut(condition_type) else {
            self.0
                .push(Condition::new(condition_type, status, reason, message, now));
            return;
        };

        if existing.status != status || existing.reason != reason || existing.message != message {
            if existing.status != status {
                existing.last_transition_time = now;
            }
            existing.status = status;
            reason.clone_into(&mut existing.reason);
            message.clone_into(&mut existing.message);
        }
        existing.last_heartbeat_time = now;
    }

    /// First condition of the given type, if any.
    #[must_use]
    pub fn find(&self, condition_type: &str) -> Option<&Condition> {
        self.0.iter().find(|c| c.r#type == condition_type)
    }

    fn find_mut(&mut self, condition_type: &str) -> Option<&mut Condition> {
        self.0.iter_mut().find(|c| c.r#type == condition_type)
    }

    /// Whether a condition of this type exists with status `True`.
    #[must_use]
    pub fn is_true(&self, condition_type: &str) -> bool {
        self.find(condition_type)
            .is_some_and(|c| c.status == ConditionStatus::True)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.0.iter()
    }
}

#[cfg(test)]
#[path = "conditions_tests.rs"]
mod conditions_tests;
