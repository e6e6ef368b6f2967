// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `nodes.rs`

#[cfg(test)]
mod tests {
    use super::super::{cluster_resources, node_info};
    use crate::errors::FactError;
    use k8s_openapi::api::core::v1::Node;
    use serde_json::json;

    fn node(name: &str, capacity: serde_json::Value) -> Node {
        serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "Node",
            "metadata": { "name": name },
            "status": {
                "capacity": capacity,
                "allocatable": { "pods": "250" },
                "addresses": [
                    { "type": "Hostname", "address": format!("{name}.example.com") },
                    { "type": "InternalIP", "address": "10.0.0.1" }
                ],
                "nodeInfo": {
                    "architecture": "amd64",
                    "bootID": "b",
                    "containerRuntimeVersion": "cri-o://1.29.7",
                    "kernelVersion": "5.14.0",
                    "kubeProxyVersion": "v1.29.7",
                    "kubeletVersion": "v1.29.7",
                    "machineID": "m",
                    "operatingSystem": "linux",
                    "osImage": "Red Hat Enterprise Linux CoreOS 416",
                    "systemUUID": "u"
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_two_nodes_without_gpu() {
        let nodes = vec![
            node("worker-1", json!({ "cpu": "2", "memory": "4Gi" })),
            node("worker-2", json!({ "cpu": "4", "memory": "8Gi" })),
        ];

        let resources = cluster_resources(&nodes).unwrap();

        assert_eq!(resources.cpu, "6");
        assert_eq!(resources.memory, "12288Mi");
        assert_eq!(resources.gpu, "0");
        assert_eq!(resources.pods, "500");
        assert_eq!(resources.storage, "0Mi");
    }

    #[test]
    fn test_fractional_cpu_and_gpus() {
        let nodes = vec![
            node(
                "gpu-1",
                json!({ "cpu": "1500m", "memory": "16262568Ki", "nvidia.com/gpu": "2",
                        "ephemeral-storage": "125293548Ki" }),
            ),
            node("gpu-2", json!({ "cpu": "1", "nvidia.com/gpu": "4" })),
        ];

        let resources = cluster_resources(&nodes).unwrap();

        assert_eq!(resources.cpu, "2500m");
        assert_eq!(resources.memory, "15881Mi");
        assert_eq!(resources.gpu, "6");
        assert_eq!(resources.storage, "122357Mi");
    }

    #[test]
    fn test_no_nodes() {
        let resources = cluster_resources(&[]).unwrap();
        assert_eq!(resources.cpu, "0");
        assert_eq!(resources.memory, "0Mi");
        assert_eq!(resources.pods, "0");
        assert_eq!(resources.gpu, "0");
    }

    #[test]
    fn test_malformed_capacity_is_an_error() {
        let nodes = vec![node("worker-1", json!({ "cpu": "lots" }))];
        let err = cluster_resources(&nodes).unwrap_err();
        assert!(matches!(err, FactError::InvalidQuantity { .. }));
    }

    #[test]
    fn test_node_info_resolves_addresses_by_type() {
        let info = node_info(&[node("worker-1", json!({}))]);

        assert_eq!(info.len(), 1);
        assert_eq!(info[0].name, "worker-1");
        assert_eq!(info[0].hostname, "worker-1.example.com");
        assert_eq!(info[0].internal_ip, "10.0.0.1");
        assert_eq!(info[0].os_image, "Red Hat Enterprise Linux CoreOS 416");
        assert_eq!(info[0].kubelet_version, "v1.29.7");
    }

    #[test]
    fn test_node_info_address_order_does_not_matter() {
        let mut n = node("worker-1", json!({}));
        if let Some(addresses) = n.status.as_mut().and_then(|s| s.addresses.as_mut()) {
            addresses.reverse();
        }

        let info = node_info(&[n]);
        assert_eq!(info[0].hostname, "worker-1.example.com");
        assert_eq!(info[0].internal_ip, "10.0.0.1");
    }

    #[test]
    fn test_node_info_without_status() {
        let bare: Node = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "Node",
            "metadata": { "name": "new-node" }
        }))
        .unwrap();

        let info = node_info(&[bare]);
        assert_eq!(info[0].name, "new-node");
        assert!(info[0].hostname.is_empty());
        assert!(info[0].internal_ip.is_empty());
        assert!(info[0].os_image.is_empty());
    }
}
