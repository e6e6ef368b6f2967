// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Typed view of nmstate `NodeNetworkConfigurationPolicy` resources.
//!
//! Only the parts the operator reads are modelled: the `dns-resolver` section
//! of the desired state and the status conditions. The desired state is an
//! nmstate document that is normally stored as an object but may also be
//! embedded as a YAML string.

use crate::conditions::ConditionList;
use crate::crd::ClusterDnsConfig;
use crate::errors::FactError;
use kube::api::{ApiResource, DynamicObject};
use kube::core::GroupVersionKind;
use serde::Deserialize;
use serde_json::Value;

/// Condition type reported once a policy is applied on all matching nodes.
pub const CONDITION_AVAILABLE: &str = "Available";

/// Condition type reported when a policy failed on some node.
pub const CONDITION_DEGRADED: &str = "Degraded";

/// API resource of `nmstate.io/v1` `NodeNetworkConfigurationPolicy`.
#[must_use]
pub fn policy_api_resource() -> ApiResource {
    let gvk = GroupVersionKind::gvk("nmstate.io", "v1", "NodeNetworkConfigurationPolicy");
    ApiResource::from_gvk_with_plural(&gvk, "nodenetworkconfigurationpolicies")
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PolicySpec {
    desired_state: Value,
}

/// Status block of a policy.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyStatus {
    pub conditions: ConditionList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DesiredState {
    #[serde(rename = "dns-resolver")]
    dns_resolver: Option<DnsResolver>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DnsResolver {
    config: DnsResolverConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DnsResolverConfig {
    server: Vec<String>,
    search: Vec<String>,
}

/// Extract the resolver configuration from a policy object.
///
/// A policy without a `dns-resolver` section yields an empty configuration.
///
/// # Errors
///
/// Returns [`FactError::InvalidPayload`] when the spec or the desired state
/// cannot be decoded.
pub fn dns_config_from_policy(policy: &DynamicObject) -> Result<ClusterDnsConfig, FactError> {
    let what = || {
        format!(
            "desiredState of NodeNetworkConfigurationPolicy {}",
            policy.metadata.name.as_deref().unwrap_or_default()
        )
    };

    let spec = match policy.data.get("spec") {
        Some(spec) => PolicySpec::deserialize(spec).map_err(|e| FactError::invalid(what(), e.to_string()))?,
        None => PolicySpec::default(),
    };

    let state: DesiredState = match spec.desired_state {
        Value::Null => DesiredState::default(),
        Value::String(raw) => {
            serde_yaml::from_str(&raw).map_err(|e| FactError::invalid(what(), e.to_string()))?
        }
        other => serde_json::from_value(other).map_err(|e| FactError::invalid(what(), e.to_string()))?,
    };

    let config = state.dns_resolver.unwrap_or_default().config;
    Ok(ClusterDnsConfig {
        search_domains: config.search,
        servers: config.server,
    })
}

/// Status conditions of a policy; an unreadable status yields an empty list.
#[must_use]
pub fn policy_conditions(policy: &DynamicObject) -> ConditionList {
    policy
        .data
        .get("status")
        .and_then(|status| PolicyStatus::deserialize(status).ok())
        .map(|status| status.conditions)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "nmstate_tests.rs"]
mod nmstate_tests;
