// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Conflict-safe, idempotent status updates.
//!
//! [`update_if_changed`] commits a freshly collected status only when it
//! differs from the stored one, ignoring the order of set-like fields. The
//! write is conditional on the `resourceVersion` returned by the read, so a
//! concurrent writer makes it fail with a conflict instead of being silently
//! overwritten. Conflicts restart the cycle at the read after a short backoff.
//!
//! # Example
//!
//! ```rust,no_run
//! use axiom::crd::ClusterInfoStatus;
//! use axiom::reconcilers::status::{update_if_changed, KubeClusterInfoStore, UpdateOutcome};
//!
//! # async fn example(client: kube::Client, status: ClusterInfoStatus) -> anyhow::Result<()> {
//! let store = KubeClusterInfoStore::new(client);
//! match update_if_changed(&store, "clusterinfo", &status).await? {
//!     UpdateOutcome::Unchanged => println!("nothing to write"),
//!     UpdateOutcome::Updated { attempts } => println!("written after {attempts} attempt(s)"),
//! }
//! # Ok(())
//! # }
//! ```

use crate::constants::FIELD_MANAGER;
use crate::crd::{ClusterInfo, ClusterInfoStatus};
use crate::errors::StatusError;
use crate::metrics;
use crate::reconcilers::retry::conflict_backoff;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use tracing::{debug, info, warn};

/// Result of a successful [`update_if_changed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The stored status already carried the same facts; nothing was written.
    Unchanged,
    /// The status was written. `attempts` counts writes, the successful one included.
    Updated { attempts: u32 },
}

/// Read and conditional-write access to `ClusterInfo` records.
#[async_trait::async_trait]
pub trait ClusterInfoStore: Send + Sync {
    /// Fetch the current record, including its `resourceVersion`.
    async fn get(&self, name: &str) -> Result<ClusterInfo, StatusError>;

    /// Replace the record's status, provided it is still at `resource_version`.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::Conflict`] when the record moved past
    /// `resource_version`.
    async fn replace_status(
        &self,
        name: &str,
        resource_version: &str,
        status: &ClusterInfoStatus,
    ) -> Result<(), StatusError>;
}

/// [`ClusterInfoStore`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeClusterInfoStore {
    api: Api<ClusterInfo>,
}

impl KubeClusterInfoStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

#[async_trait::async_trait]
impl ClusterInfoStore for KubeClusterInfoStore {
    async fn get(&self, name: &str) -> Result<ClusterInfo, StatusError> {
        self.api
            .get(name)
            .await
            .map_err(|e| StatusError::from_kube(name, e))
    }

    async fn replace_status(
        &self,
        name: &str,
        resource_version: &str,
        status: &ClusterInfoStatus,
    ) -> Result<(), StatusError> {
        // A resourceVersion in the patch body is a precondition: the API
        // server answers 409 when the stored object has moved on.
        let patch = json!({
            "metadata": { "resourceVersion": resource_version },
            "status": status
        });

        self.api
            .patch_status(
                name,
                &PatchParams {
                    field_manager: Some(FIELD_MANAGER.to_string()),
                    ..Default::default()
                },
                &Patch::Merge(&patch),
            )
            .await
            .map_err(|e| StatusError::from_kube(name, e))?;
        Ok(())
    }
}

/// Commit `new_status` to the named record if it carries different facts.
///
/// Both the stored and the new status are compared in normalized form; the
/// value written is `new_status` exactly as given. On a write conflict the
/// record is read again and the comparison repeated, up to five retries with
/// exponential backoff (10ms initial, doubling, capped at 1s, ±10% jitter).
///
/// # Errors
///
/// - [`StatusError::ConflictRetriesExhausted`] when every attempt conflicted
/// - [`StatusError::MissingResourceVersion`] when the record carries no version
/// - any other [`StatusError`] from the store, returned without retrying
pub async fn update_if_changed(
    store: &dyn ClusterInfoStore,
    name: &str,
    new_status: &ClusterInfoStatus,
) -> Result<UpdateOutcome, StatusError> {
    let desired = new_status.normalized();
    let mut backoff = conflict_backoff();
    let mut attempts: u32 = 0;

    loop {
        let current = store.get(name).await?;
        let stored = current
            .status
            .as_ref()
            .map(ClusterInfoStatus::normalized)
            .unwrap_or_default();

        if current.status.is_some() && stored == desired {
            debug!(name = %name, attempts, "ClusterInfo status unchanged, skipping update");
            return Ok(UpdateOutcome::Unchanged);
        }

        let resource_version =
            current
                .resource_version()
                .ok_or_else(|| StatusError::MissingResourceVersion {
                    name: name.to_string(),
                })?;

        attempts += 1;
        match store
            .replace_status(name, &resource_version, new_status)
            .await
        {
            Ok(()) => {
                info!(
                    name = %name,
                    attempts,
                    cluster_id = %new_status.cluster_id,
                    "Updated ClusterInfo status"
                );
                return Ok(UpdateOutcome::Updated { attempts });
            }
            Err(e) if e.is_conflict() => {
                metrics::record_status_conflict();
                let Some(delay) = backoff.next_backoff() else {
                    warn!(name = %name, attempts, "Conflict retries exhausted");
                    return Err(StatusError::ConflictRetriesExhausted {
                        name: name.to_string(),
                        attempts,
                    });
                };
                debug!(
                    name = %name,
                    attempt = attempts,
                    retry_after = ?delay,
                    "ClusterInfo modified concurrently, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
