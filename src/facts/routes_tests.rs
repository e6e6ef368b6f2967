// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `routes.rs`

#[cfg(test)]
mod tests {
    use super::super::{
        api_host, cluster_name, dedup_addresses, lookup_host, route_api_resource, route_host,
    };
    use crate::constants::DEFAULT_INGRESS_PREFIX;
    use crate::errors::FactError;
    use kube::api::DynamicObject;
    use serde_json::json;

    const HOST: &str = "console-openshift-console.apps.prod-east.example.com";

    #[test]
    fn test_api_host_swaps_prefix() {
        assert_eq!(
            api_host(HOST, DEFAULT_INGRESS_PREFIX),
            "api.prod-east.example.com"
        );
    }

    #[test]
    fn test_cluster_name_drops_prefix() {
        assert_eq!(
            cluster_name(HOST, DEFAULT_INGRESS_PREFIX),
            "prod-east.example.com"
        );
    }

    #[test]
    fn test_unprefixed_host_is_kept() {
        assert_eq!(
            api_host("console.example.com", DEFAULT_INGRESS_PREFIX),
            "console.example.com"
        );
        assert_eq!(
            cluster_name("console.example.com", DEFAULT_INGRESS_PREFIX),
            "console.example.com"
        );
    }

    #[test]
    fn test_prefix_replaced_once() {
        let prefix = "a.";
        assert_eq!(api_host("a.a.example", prefix), "api.a.example");
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let deduped = dedup_addresses(
            ["10.0.0.2", "10.0.0.1", "10.0.0.2", "10.0.0.1"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(deduped, vec!["10.0.0.2", "10.0.0.1"]);
    }

    #[test]
    fn test_route_host() {
        let mut route = DynamicObject::new("console", &route_api_resource());
        route.data = json!({ "spec": { "host": HOST } });
        assert_eq!(route_host(&route), HOST);

        route.data = json!({});
        assert!(route_host(&route).is_empty());
    }

    #[tokio::test]
    async fn test_lookup_ip_literal() {
        let addrs = lookup_host("127.0.0.1").await.unwrap();
        assert_eq!(addrs, vec!["127.0.0.1"]);
    }

    #[tokio::test]
    async fn test_lookup_failure_names_the_host() {
        let err = lookup_host("does-not-exist.invalid").await.unwrap_err();
        match err {
            FactError::Lookup { host, .. } => assert_eq!(host, "does-not-exist.invalid"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
