// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `ClusterInfo` reconciliation.
//!
//! One cycle collects every fact, commits the status if it changed, then
//! hands the status to the mirror on a detached task. The mirror runs after
//! every successful cycle, written or not, so the secondary store catches up
//! after an earlier mirror failure.

use crate::context::Context;
use crate::crd::ClusterInfo;
use crate::errors::{ReconcileError, StatusError};
use crate::metrics;
use crate::reconcilers::collector::collect_cluster_status;
use crate::reconcilers::status::{update_if_changed, UpdateOutcome};
use kube::runtime::controller::Action;
use kube::ResourceExt;
use std::sync::Arc;
use tracing::{debug, info};

/// Run one reconciliation cycle for a `ClusterInfo`.
///
/// A record deleted while the cycle ran is not an error; the cycle simply
/// waits for the next change.
///
/// # Errors
///
/// Returns [`ReconcileError::Collect`] when a fact provider fails and
/// [`ReconcileError::Update`] when the status cannot be committed.
pub async fn reconcile_clusterinfo(
    ctx: Arc<Context>,
    clusterinfo: Arc<ClusterInfo>,
) -> Result<Action, ReconcileError> {
    let name = clusterinfo.name_any();
    info!(name = %name, hosted = clusterinfo.spec.hosted_cluster, "Reconciling ClusterInfo");

    let status = collect_cluster_status(ctx.facts.as_ref(), &clusterinfo.spec).await?;

    match update_if_changed(ctx.store.as_ref(), &name, &status).await {
        Ok(UpdateOutcome::Unchanged) => metrics::record_status_update("unchanged"),
        Ok(UpdateOutcome::Updated { attempts }) => {
            debug!(name = %name, attempts, "ClusterInfo status committed");
            metrics::record_status_update("updated");
        }
        Err(StatusError::NotFound { .. }) => {
            debug!(name = %name, "ClusterInfo deleted during reconciliation");
            return Ok(Action::await_change());
        }
        Err(e) => return Err(e.into()),
    }

    // Detached; the handle is dropped on purpose.
    drop(ctx.mirror.dispatch(status));

    Ok(Action::requeue(ctx.requeue_interval))
}

#[cfg(test)]
#[path = "clusterinfo_tests.rs"]
mod clusterinfo_tests;
