// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for the `ClusterInfo` controller.
//!
//! The controller receives an `Arc<Context>` holding everything one
//! reconciliation cycle needs. Each collaborator sits behind a trait object so
//! the cycle can be driven against fakes in tests.

use crate::config::OperatorConfig;
use crate::facts::{ClusterFacts, KubeFacts};
use crate::mirror::Mirror;
use crate::reconcilers::status::{ClusterInfoStore, KubeClusterInfoStore};
use kube::Client;
use std::sync::Arc;
use std::time::Duration;

/// Shared context passed to the controller.
#[derive(Clone)]
pub struct Context {
    /// Source of cluster facts
    pub facts: Arc<dyn ClusterFacts>,

    /// Read and conditional-write access to `ClusterInfo` records
    pub store: Arc<dyn ClusterInfoStore>,

    /// Best-effort `MongoDB` mirror
    pub mirror: Arc<Mirror>,

    /// Resync interval after a successful cycle
    pub requeue_interval: Duration,
}

impl Context {
    /// Build the production context from a client and the parsed configuration.
    #[must_use]
    pub fn new(client: Client, config: &OperatorConfig) -> Self {
        Self {
            facts: Arc::new(KubeFacts::new(client.clone(), config.facts.clone())),
            store: Arc::new(KubeClusterInfoStore::new(client)),
            mirror: Arc::new(Mirror::from_config(&config.mirror)),
            requeue_interval: config.requeue_interval(),
        }
    }
}
