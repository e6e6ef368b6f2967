// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Node facts: per-node info and summed capacity.
//!
//! Both are derived from a single node listing so they always describe the
//! same set of nodes.

use crate::constants::{GPU_RESOURCE_NAME, NODE_ADDRESS_HOSTNAME, NODE_ADDRESS_INTERNAL_IP};
use crate::crd::{ClusterResources, NodeInfo};
use crate::errors::FactError;
use crate::quantity::Quantity;
use k8s_openapi::api::core::v1::{Node, NodeAddress};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity as ResourceQuantity;
use kube::api::ListParams;
use kube::{Api, Client, ResourceExt};
use std::collections::BTreeMap;
use tracing::debug;

/// List every node in the cluster.
///
/// # Errors
///
/// Returns [`FactError::Api`] when the list request fails.
pub async fn list_nodes(client: &Client) -> Result<Vec<Node>, FactError> {
    let api: Api<Node> = Api::all(client.clone());
    let nodes = api
        .list(&ListParams::default())
        .await
        .map_err(|e| FactError::api("nodes", e))?;
    debug!(count = nodes.items.len(), "Listed nodes");
    Ok(nodes.items)
}

/// First address of the given type, or an empty string.
fn address_of_type(addresses: &[NodeAddress], address_type: &str) -> String {
    addresses
        .iter()
        .find(|a| a.type_ == address_type)
        .map(|a| a.address.clone())
        .unwrap_or_default()
}

/// Describe each node.
#[must_use]
pub fn node_info(nodes: &[Node]) -> Vec<NodeInfo> {
    nodes
        .iter()
        .map(|node| {
            let status = node.status.as_ref();
            let addresses = status
                .and_then(|s| s.addresses.as_deref())
                .unwrap_or_default();
            let system = status.and_then(|s| s.node_info.as_ref());

            NodeInfo {
                name: node.name_any(),
                internal_ip: address_of_type(addresses, NODE_ADDRESS_INTERNAL_IP),
                hostname: address_of_type(addresses, NODE_ADDRESS_HOSTNAME),
                os_image: system.map(|s| s.os_image.clone()).unwrap_or_default(),
                kubelet_version: system
                    .map(|s| s.kubelet_version.clone())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

fn sum_resource<'a>(
    maps: impl Iterator<Item = Option<&'a BTreeMap<String, ResourceQuantity>>>,
    resource: &str,
) -> Result<Quantity, FactError> {
    maps.filter_map(|m| m.and_then(|m| m.get(resource)))
        .map(|q| Quantity::parse(&q.0))
        .sum::<Result<Quantity, FactError>>()
}

/// Sum capacity across all nodes.
///
/// CPU, memory, ephemeral storage and GPUs come from each node's capacity;
/// pods come from its allocatable resources. Nodes that do not report a
/// resource contribute nothing to it.
///
/// # Errors
///
/// Returns [`FactError::InvalidQuantity`] when a node reports a malformed quantity.
pub fn cluster_resources(nodes: &[Node]) -> Result<ClusterResources, FactError> {
    let capacity = || {
        nodes
            .iter()
            .map(|n| n.status.as_ref().and_then(|s| s.capacity.as_ref()))
    };
    let allocatable = nodes
        .iter()
        .map(|n| n.status.as_ref().and_then(|s| s.allocatable.as_ref()));

    Ok(ClusterResources {
        cpu: sum_resource(capacity(), "cpu")?.to_cpu_string(),
        memory: sum_resource(capacity(), "memory")?.to_mib_string(),
        pods: sum_resource(allocatable, "pods")?.to_count_string(),
        storage: sum_resource(capacity(), "ephemeral-storage")?.to_mib_string(),
        gpu: sum_resource(capacity(), GPU_RESOURCE_NAME)?.to_count_string(),
    })
}

#[cfg(test)]
#[path = "nodes_tests.rs"]
mod nodes_tests;
