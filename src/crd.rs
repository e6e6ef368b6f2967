// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definition for the cluster inventory record.
//!
//! [`ClusterInfo`] is a cluster-scoped resource whose status is owned by the
//! operator. Its status is the aggregate of facts gathered from the cluster on
//! every reconciliation cycle.
//!
//! # Example
//!
//! ```yaml
//! apiVersion: axiom.dana.io/v1alpha1
//! kind: ClusterInfo
//! metadata:
//!   name: clusterinfo
//! spec:
//!   hostedCluster: false
//! status:
//!   clusterID: 0b6e0f3a-7a2e-4e0e-9a53-5f0b1c8d9e10
//!   kubernetesVersion: 4.16.8
//!   clusterResources:
//!     cpu: "48"
//!     memory: 196608Mi
//!     pods: "750"
//!     storage: 1536000Mi
//!     gpu: "0"
//! ```
//!
//! # Normalization
//!
//! Several status fields are sets rendered as sequences. Their order comes from
//! whatever the underlying queries returned and carries no meaning, so two
//! statuses must be compared through [`ClusterInfoStatus::normalized`].

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `ClusterInfo` spec: immutable input describing how the cluster is hosted.
#[derive(CustomResource, Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[kube(
    group = "axiom.dana.io",
    version = "v1alpha1",
    kind = "ClusterInfo",
    plural = "clusterinfo",
    shortname = "ci",
    doc = "ClusterInfo aggregates facts about the running cluster (nodes, DNS, addresses, identity providers, storage, webhooks, version) into its status."
)]
#[kube(status = "ClusterInfoStatus")]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfoSpec {
    /// Whether the control plane is externally hosted.
    ///
    /// Hosted clusters have no nmstate policy for the node resolver, so the DNS
    /// configuration is read from a node's live `/etc/resolv.conf` instead.
    #[serde(default)]
    pub hosted_cluster: bool,
}

/// Information about a single node.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeInfo {
    pub name: String,
    #[serde(rename = "internalIP")]
    pub internal_ip: String,
    pub hostname: String,
    pub os_image: String,
    pub kubelet_version: String,
}

/// Resource totals summed across all nodes.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct ClusterResources {
    /// Total CPU capacity (`"6"`, `"2500m"`)
    pub cpu: String,
    /// Total memory capacity in MiB (`"12288Mi"`)
    pub memory: String,
    /// Total allocatable pod slots
    pub pods: String,
    /// Total ephemeral storage capacity in MiB
    pub storage: String,
    /// Total number of GPUs
    pub gpu: String,
}

/// A storage class and the provisioner backing it.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord)]
#[serde(default)]
pub struct StorageProvisioner {
    pub name: String,
    pub provisioner: String,
}

/// Resolver configuration shared by the cluster nodes.
///
/// Both lists keep the order they were declared in; resolver order matters.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterDnsConfig {
    pub search_domains: Vec<String>,
    pub servers: Vec<String>,
}

/// Observed state of the cluster.
///
/// Every field is always serialized, empty or not, so that a status write
/// replaces the stored status as a whole.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterInfoStatus {
    /// Cluster name derived from the console route host
    pub name: String,
    #[serde(rename = "clusterID")]
    pub cluster_id: String,
    pub kubernetes_version: String,
    pub cluster_dns_config: ClusterDnsConfig,
    pub cluster_resources: ClusterResources,
    pub node_info: Vec<NodeInfo>,
    #[serde(rename = "routerLBAddress")]
    pub router_lb_addresses: Vec<String>,
    pub api_server_addresses: Vec<String>,
    pub identity_providers: Vec<String>,
    pub storage_provisioners: Vec<StorageProvisioner>,
    pub mutating_webhooks: Vec<String>,
    pub validating_webhooks: Vec<String>,
}

impl ClusterInfoStatus {
    /// Sort every set-like field into its canonical order, in place.
    ///
    /// Node info and storage provisioners sort by name; plain string sets sort
    /// by value. Ties on the name fall back to the remaining fields so the
    /// order is total. The DNS configuration is left untouched.
    ///
    /// Idempotent: normalizing twice yields the same value as normalizing once.
    pub fn normalize(&mut self) {
        self.router_lb_addresses.sort();
        self.api_server_addresses.sort();
        self.identity_providers.sort();
        self.mutating_webhooks.sort();
        self.validating_webhooks.sort();

        self.node_info
            .sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.cmp(b)));
        self.storage_provisioners
            .sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.cmp(b)));
    }

    /// Return a normalized deep copy, leaving `self` as produced.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut copy = self.clone();
        copy.normalize();
        copy
    }

    /// Whether two statuses carry the same facts, ignoring set ordering.
    #[must_use]
    pub fn same_facts_as(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}
