// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Aggregation of fact provider answers into one status value.

use crate::crd::{ClusterInfoSpec, ClusterInfoStatus};
use crate::errors::FactError;
use crate::facts::nodes::{cluster_resources, node_info};
use crate::facts::ClusterFacts;
use tracing::debug;

/// Build a complete status from the fact providers.
///
/// Providers are called in a fixed order: nodes, version and ID, DNS, route
/// addresses, identity providers, storage provisioners, webhooks. The first
/// failure aborts collection and later providers are not called.
///
/// # Errors
///
/// Returns the first [`FactError`] raised by a provider.
pub async fn collect_cluster_status(
    facts: &dyn ClusterFacts,
    spec: &ClusterInfoSpec,
) -> Result<ClusterInfoStatus, FactError> {
    let nodes = facts.nodes().await?;
    let node_info = node_info(&nodes);
    let cluster_resources = cluster_resources(&nodes)?;

    let (kubernetes_version, cluster_id) = facts.version_and_id().await?;
    let cluster_dns_config = facts.dns_config(spec.hosted_cluster).await?;
    let routes = facts.route_addresses().await?;
    let identity_providers = facts.identity_providers().await?;
    let storage_provisioners = facts.storage_provisioners().await?;
    let webhooks = facts.webhooks().await?;

    debug!(
        nodes = node_info.len(),
        cluster_id = %cluster_id,
        hosted = spec.hosted_cluster,
        "Collected cluster facts"
    );

    Ok(ClusterInfoStatus {
        name: routes.cluster_name,
        cluster_id,
        kubernetes_version,
        cluster_dns_config,
        cluster_resources,
        node_info,
        router_lb_addresses: routes.router_lb,
        api_server_addresses: routes.api_server,
        identity_providers,
        storage_provisioners,
        mutating_webhooks: webhooks.mutating,
        validating_webhooks: webhooks.validating,
    })
}

#[cfg(test)]
#[path = "collector_tests.rs"]
mod collector_tests;
