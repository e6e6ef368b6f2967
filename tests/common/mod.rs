// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

use axiom::crd::{ClusterInfo, ClusterInfoSpec};
use kube::api::{Api, DeleteParams, PostParams};
use kube::client::Client;

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => {
            println!("✓ Successfully connected to Kubernetes cluster");
            Some(client)
        }
        Err(e) => {
            eprintln!("⊘ Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// Create a `ClusterInfo`, tolerating one left over from an earlier run
pub async fn create_clusterinfo(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let api: Api<ClusterInfo> = Api::all(client.clone());
    let clusterinfo = ClusterInfo::new(name, ClusterInfoSpec::default());

    match api.create(&PostParams::default(), &clusterinfo).await {
        Ok(_) => {
            println!("✓ Created ClusterInfo: {name}");
            Ok(())
        }
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            println!("  ClusterInfo already exists: {name}");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Delete a `ClusterInfo`, ignoring one that is already gone
pub async fn delete_clusterinfo(client: &Client, name: &str) {
    let api: Api<ClusterInfo> = Api::all(client.clone());

    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => println!("✓ Deleted ClusterInfo: {name}"),
        Err(kube::Error::Api(ae)) if ae.code == 404 => {
            println!("  ClusterInfo already deleted: {name}");
        }
        Err(e) => eprintln!("⚠ Failed to delete ClusterInfo {name}: {e}"),
    }
}
