// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes reconciliation for `ClusterInfo` resources.
//!
//! # Reconciliation Architecture
//!
//! Every cycle follows the same pipeline:
//!
//! 1. **Collect** - Ask each fact provider in turn, stopping at the first failure
//! 2. **Compare** - Normalize the collected and stored status and compare them
//! 3. **Update** - Write the status only when it changed, retrying on conflicts
//! 4. **Mirror** - Hand the status to the `MongoDB` mirror on a detached task
//!
//! # Modules
//!
//! - [`clusterinfo`] - The reconcile entry point wired into the controller
//! - [`collector`] - Builds a [`crate::crd::ClusterInfoStatus`] from fact providers
//! - [`status`] - Idempotent, conflict-retrying status updates
//! - [`retry`] - Exponential backoff for conflicting writes
//!
//! # Example
//!
//! ```rust,no_run
//! use axiom::context::Context;
//! use axiom::crd::ClusterInfo;
//! use axiom::reconcilers::reconcile_clusterinfo;
//! use std::sync::Arc;
//!
//! async fn reconcile_once(ctx: Arc<Context>, clusterinfo: Arc<ClusterInfo>) -> anyhow::Result<()> {
//!     reconcile_clusterinfo(ctx, clusterinfo).await?;
//!     Ok(())
//! }
//! ```

pub mod clusterinfo;
pub mod collector;
pub mod retry;
pub mod status;

pub use clusterinfo::reconcile_clusterinfo;
pub use collector::collect_cluster_status;
pub use status::{update_if_changed, UpdateOutcome};
