// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Fact providers.
//!
//! Each method of [`ClusterFacts`] answers one category of question about the
//! running cluster. The collector calls them in a fixed order and stops at the
//! first failure, so providers never need to coordinate with each other.
//!
//! [`KubeFacts`] answers from the Kubernetes API. OpenShift and nmstate types
//! are read as [`kube::api::DynamicObject`]s so no generated bindings are
//! needed for them.
//!
//! # Modules
//!
//! - [`nodes`] - node info and summed resource capacity
//! - [`dns`] - resolver configuration from nmstate or a node's `resolv.conf`
//! - [`probe`] - the short-lived pod used to read a node's `resolv.conf`
//! - [`routes`] - router and API server addresses from the console route
//! - [`cluster`] - version, identity providers, storage and webhooks

pub mod cluster;
pub mod dns;
pub mod nodes;
pub mod probe;
pub mod routes;

use crate::config::FactsConfig;
use crate::crd::{ClusterDnsConfig, StorageProvisioner};
use crate::errors::FactError;
use k8s_openapi::api::core::v1::Node;
use kube::Client;

/// Addresses derived from the console route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteAddresses {
    /// Route host without the ingress prefix
    pub cluster_name: String,
    /// Resolved addresses of the route host, deduplicated
    pub router_lb: Vec<String>,
    /// Resolved addresses of the API host, deduplicated
    pub api_server: Vec<String>,
}

/// Names of the admission webhook configurations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Webhooks {
    pub mutating: Vec<String>,
    pub validating: Vec<String>,
}

/// One method per fact category.
#[async_trait::async_trait]
pub trait ClusterFacts: Send + Sync {
    /// All nodes of the cluster.
    async fn nodes(&self) -> Result<Vec<Node>, FactError>;

    /// Desired cluster version and cluster ID, empty when absent.
    async fn version_and_id(&self) -> Result<(String, String), FactError>;

    /// Resolver configuration shared by the nodes.
    async fn dns_config(&self, hosted_cluster: bool) -> Result<ClusterDnsConfig, FactError>;

    async fn route_addresses(&self) -> Result<RouteAddresses, FactError>;

    async fn identity_providers(&self) -> Result<Vec<String>, FactError>;

    async fn storage_provisioners(&self) -> Result<Vec<StorageProvisioner>, FactError>;

    async fn webhooks(&self) -> Result<Webhooks, FactError>;
}

/// [`ClusterFacts`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeFacts {
    client: Client,
    config: FactsConfig,
}

impl KubeFacts {
    #[must_use]
    pub fn new(client: Client, config: FactsConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl ClusterFacts for KubeFacts {
    async fn nodes(&self) -> Result<Vec<Node>, FactError> {
        nodes::list_nodes(&self.client).await
    }

    async fn version_and_id(&self) -> Result<(String, String), FactError> {
        cluster::version_and_id(&self.client).await
    }

    async fn dns_config(&self, hosted_cluster: bool) -> Result<ClusterDnsConfig, FactError> {
        if hosted_cluster {
            dns::from_probe_pod(&self.client, &self.config).await
        } else {
            dns::from_node_resolver_policy(&self.client).await
        }
    }

    async fn route_addresses(&self) -> Result<RouteAddresses, FactError> {
        routes::route_addresses(&self.client, &self.config).await
    }

    async fn identity_providers(&self) -> Result<Vec<String>, FactError> {
        cluster::identity_providers(&self.client).await
    }

    async fn storage_provisioners(&self) -> Result<Vec<StorageProvisioner>, FactError> {
        cluster::storage_provisioners(&self.client).await
    }

    async fn webhooks(&self) -> Result<Webhooks, FactError> {
        cluster::webhooks(&self.client).await
    }
}
