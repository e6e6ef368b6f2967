// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `nmstate.rs`

#[cfg(test)]
mod tests {
    use super::super::{
        dns_config_from_policy, policy_api_resource, policy_conditions, CONDITION_AVAILABLE,
        CONDITION_DEGRADED,
    };
    use kube::api::DynamicObject;
    use serde_json::json;

    fn policy(data: serde_json::Value) -> DynamicObject {
        let mut obj = DynamicObject::new("node-resolver", &policy_api_resource());
        obj.data = data;
        obj
    }

    #[test]
    fn test_api_resource_coordinates() {
        let ar = policy_api_resource();
        assert_eq!(ar.group, "nmstate.io");
        assert_eq!(ar.version, "v1");
        assert_eq!(ar.plural, "nodenetworkconfigurationpolicies");
    }

    #[test]
    fn test_dns_config_from_object_desired_state() {
        let obj = policy(json!({
            "spec": {
                "desiredState": {
                    "dns-resolver": {
                        "config": {
                            "server": ["10.0.0.10", "10.0.0.11"],
                            "search": ["corp.example.com", "example.com"]
                        }
                    }
                }
            }
        }));

        let config = dns_config_from_policy(&obj).unwrap();
        assert_eq!(config.servers, vec!["10.0.0.10", "10.0.0.11"]);
        assert_eq!(
            config.search_domains,
            vec!["corp.example.com", "example.com"]
        );
    }

    #[test]
    fn test_dns_config_from_embedded_yaml() {
        let obj = policy(json!({
            "spec": {
                "desiredState": "dns-resolver:\n  config:\n    server:\n    - 192.168.1.1\n    search:\n    - lab.local\n"
            }
        }));

        let config = dns_config_from_policy(&obj).unwrap();
        assert_eq!(config.servers, vec!["192.168.1.1"]);
        assert_eq!(config.search_domains, vec!["lab.local"]);
    }

    #[test]
    fn test_missing_dns_resolver_section_is_empty() {
        let obj = policy(json!({
            "spec": {
                "desiredState": {
                    "interfaces": [{"name": "eth0", "type": "ethernet"}]
                }
            }
        }));

        let config = dns_config_from_policy(&obj).unwrap();
        assert!(config.servers.is_empty());
        assert!(config.search_domains.is_empty());
    }

    #[test]
    fn test_missing_spec_is_empty() {
        let config = dns_config_from_policy(&policy(json!({}))).unwrap();
        assert_eq!(config, Default::default());
    }

    #[test]
    fn test_malformed_desired_state_is_an_error() {
        let obj = policy(json!({
            "spec": {
                "desiredState": {
                    "dns-resolver": {"config": {"server": "not-a-list"}}
                }
            }
        }));

        let err = dns_config_from_policy(&obj).unwrap_err();
        assert!(err.to_string().contains("node-resolver"));
    }

    #[test]
    fn test_policy_conditions() {
        let obj = policy(json!({
            "status": {
                "conditions": [
                    {"type": "Available", "status": "True", "reason": "SuccessfullyConfigured"},
                    {"type": "Degraded", "status": "False", "reason": "SuccessfullyConfigured"}
                ]
            }
        }));

        let conditions = policy_conditions(&obj);
        assert!(conditions.is_true(CONDITION_AVAILABLE));
        assert!(!conditions.is_true(CONDITION_DEGRADED));
    }

    #[test]
    fn test_policy_conditions_absent() {
        assert!(policy_conditions(&policy(json!({}))).is_empty());
    }
}
