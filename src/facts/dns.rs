// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cluster resolver configuration.
//!
//! Self-managed clusters declare their resolver in the nmstate
//! `node-resolver` policy. Hosted clusters have no such policy, so a probe
//! pod reads `/etc/resolv.conf` from a node instead.

use crate::config::FactsConfig;
use crate::constants::{DEFAULT_SEARCH_DOMAIN, NODE_RESOLVER_POLICY_NAME};
use crate::crd::ClusterDnsConfig;
use crate::errors::FactError;
use crate::facts::probe::{build_probe_pod, ProbePod};
use crate::nmstate::{
    dns_config_from_policy, policy_api_resource, policy_conditions, CONDITION_AVAILABLE,
    CONDITION_DEGRADED,
};
use k8s_openapi::api::core::v1::Pod;
use kube::api::DynamicObject;
use kube::{Api, Client};
use tracing::{debug, warn};

/// Parse `resolv.conf` content.
///
/// `nameserver` lines contribute their address when they have exactly one
/// argument. `search` lines contribute all their domains, in order. When no
/// search domain is declared, `cluster.local` is used.
#[must_use]
pub fn parse_resolv_conf(content: &str) -> ClusterDnsConfig {
    let mut servers = Vec::new();
    let mut search_domains = Vec::new();

    for line in content.lines() {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("nameserver") => {
                let args: Vec<&str> = fields.collect();
                if let [server] = args.as_slice() {
                    servers.push((*server).to_string());
                }
            }
            Some("search") => search_domains.extend(fields.map(str::to_string)),
            _ => {}
        }
    }

    if search_domains.is_empty() {
        search_domains.push(DEFAULT_SEARCH_DOMAIN.to_string());
    }

    ClusterDnsConfig {
        search_domains,
        servers,
    }
}

/// Read the resolver configuration through the probe pod.
///
/// The pod is deleted before returning, whatever the outcome.
///
/// # Errors
///
/// Returns a [`FactError`] when the pod cannot be created, does not finish in
/// time, or its log cannot be read.
pub async fn from_probe_pod(
    client: &Client,
    config: &FactsConfig,
) -> Result<ClusterDnsConfig, FactError> {
    let api: Api<Pod> = Api::namespaced(client.clone(), &config.namespace);
    let probe = ProbePod::launch(api, &build_probe_pod(config)).await?;

    let content = match probe
        .wait_until_finished(config.probe_timeout(), config.probe_poll_interval())
        .await
    {
        Ok(()) => probe.logs().await,
        Err(e) => Err(e),
    };
    probe.release().await;

    let dns = parse_resolv_conf(&content?);
    debug!(
        servers = ?dns.servers,
        search_domains = ?dns.search_domains,
        "Read resolver configuration from probe pod"
    );
    Ok(dns)
}

/// Read the resolver configuration from the nmstate `node-resolver` policy.
///
/// # Errors
///
/// Returns [`FactError::Api`] when the policy cannot be read and
/// [`FactError::InvalidPayload`] when its desired state is malformed.
pub async fn from_node_resolver_policy(client: &Client) -> Result<ClusterDnsConfig, FactError> {
    let api: Api<DynamicObject> = Api::all_with(client.clone(), &policy_api_resource());
    let policy = api.get(NODE_RESOLVER_POLICY_NAME).await.map_err(|e| {
        FactError::api(
            format!("NodeNetworkConfigurationPolicy {NODE_RESOLVER_POLICY_NAME}"),
            e,
        )
    })?;

    let conditions = policy_conditions(&policy);
    if conditions.is_true(CONDITION_DEGRADED) || !conditions.is_true(CONDITION_AVAILABLE) {
        let reason = conditions
            .find(CONDITION_DEGRADED)
            .or_else(|| conditions.find(CONDITION_AVAILABLE))
            .map(|c| c.message.clone())
            .unwrap_or_default();
        warn!(
            policy = NODE_RESOLVER_POLICY_NAME,
            message = %reason,
            "Node resolver policy is not fully applied; reporting its desired state"
        );
    }

    dns_config_from_policy(&policy)
}

#[cfg(test)]
#[path = "dns_tests.rs"]
mod dns_tests;
