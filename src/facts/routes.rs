// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Router and API server addresses.
//!
//! The console route host (`console-openshift-console.apps.<cluster>`) is the
//! one well-known name that always points at the ingress routers. Swapping its
//! ingress prefix for `api.` yields the API server host, and dropping the
//! prefix yields the cluster name.

use crate::config::FactsConfig;
use crate::constants::API_HOST_PREFIX;
use crate::errors::FactError;
use crate::facts::RouteAddresses;
use kube::api::{ApiResource, DynamicObject};
use kube::core::GroupVersionKind;
use kube::{Api, Client};
use std::collections::HashSet;
use tracing::debug;

/// API resource of `route.openshift.io/v1` `Route`.
#[must_use]
pub fn route_api_resource() -> ApiResource {
    let gvk = GroupVersionKind::gvk("route.openshift.io", "v1", "Route");
    ApiResource::from_gvk_with_plural(&gvk, "routes")
}

/// `spec.host` of a route, empty when absent.
#[must_use]
pub fn route_host(route: &DynamicObject) -> String {
    route
        .data
        .get("spec")
        .and_then(|spec| spec.get("host"))
        .and_then(|host| host.as_str())
        .unwrap_or_default()
        .to_string()
}

/// API server host: the first occurrence of the ingress prefix replaced by `api.`.
#[must_use]
pub fn api_host(route_host: &str, ingress_prefix: &str) -> String {
    route_host.replacen(ingress_prefix, API_HOST_PREFIX, 1)
}

/// Cluster name: the first occurrence of the ingress prefix removed.
#[must_use]
pub fn cluster_name(route_host: &str, ingress_prefix: &str) -> String {
    route_host.replacen(ingress_prefix, "", 1)
}

/// Keep the first occurrence of each address.
#[must_use]
pub fn dedup_addresses(addresses: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    addresses
        .into_iter()
        .filter(|a| seen.insert(a.clone()))
        .collect()
}

/// Resolve a host name to its IP addresses, deduplicated.
///
/// # Errors
///
/// Returns [`FactError::Lookup`] when resolution fails.
pub async fn lookup_host(host: &str) -> Result<Vec<String>, FactError> {
    let addrs = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|source| FactError::Lookup {
            host: host.to_string(),
            source,
        })?;
    Ok(dedup_addresses(addrs.map(|a| a.ip().to_string())))
}

/// Resolve the router and API server addresses from the console route.
///
/// # Errors
///
/// Returns [`FactError::Api`] when the route cannot be read and
/// [`FactError::Lookup`] when either host does not resolve.
pub async fn route_addresses(
    client: &Client,
    config: &FactsConfig,
) -> Result<RouteAddresses, FactError> {
    let api: Api<DynamicObject> = Api::namespaced_with(
        client.clone(),
        &config.console_route_namespace,
        &route_api_resource(),
    );
    let route = api.get(&config.console_route_name).await.map_err(|e| {
        FactError::api(
            format!(
                "route {}/{}",
                config.console_route_namespace, config.console_route_name
            ),
            e,
        )
    })?;

    let host = route_host(&route);
    if host.is_empty() {
        return Err(FactError::invalid(
            format!(
                "route {}/{}",
                config.console_route_namespace, config.console_route_name
            ),
            "spec.host is empty",
        ));
    }

    let api_server_host = api_host(&host, &config.ingress_prefix);
    let router_lb = lookup_host(&host).await?;
    let api_server = lookup_host(&api_server_host).await?;

    debug!(
        host = %host,
        api_host = %api_server_host,
        router_lb = ?router_lb,
        api_server = ?api_server,
        "Resolved route addresses"
    );

    Ok(RouteAddresses {
        cluster_name: cluster_name(&host, &config.ingress_prefix),
        router_lb,
        api_server,
    })
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod routes_tests;
