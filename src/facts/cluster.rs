// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cluster-wide facts: version, identity providers, storage and webhooks.

use crate::constants::{CLUSTER_VERSION_NAME, OAUTH_NAME};
use crate::crd::StorageProvisioner;
use crate::errors::FactError;
use crate::facts::Webhooks;
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};
use k8s_openapi::api::storage::v1::StorageClass;
use kube::api::{ApiResource, DynamicObject, ListParams};
use kube::core::GroupVersionKind;
use kube::{Api, Client, ResourceExt};
use serde_json::Value;
use tracing::{debug, warn};

/// API resource of `config.openshift.io/v1` `ClusterVersion`.
#[must_use]
pub fn cluster_version_api_resource() -> ApiResource {
    let gvk = GroupVersionKind::gvk("config.openshift.io", "v1", "ClusterVersion");
    ApiResource::from_gvk_with_plural(&gvk, "clusterversions")
}

/// API resource of `config.openshift.io/v1` `OAuth`.
#[must_use]
pub fn oauth_api_resource() -> ApiResource {
    let gvk = GroupVersionKind::gvk("config.openshift.io", "v1", "OAuth");
    ApiResource::from_gvk_with_plural(&gvk, "oauths")
}

fn str_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Desired version and cluster ID of a `ClusterVersion` object.
#[must_use]
pub fn version_and_id_of(cluster_version: &DynamicObject) -> (String, String) {
    (
        str_at(&cluster_version.data, "/status/desired/version"),
        str_at(&cluster_version.data, "/spec/clusterID"),
    )
}

/// Names of the identity providers configured on an `OAuth` object.
#[must_use]
pub fn identity_provider_names(oauth: &DynamicObject) -> Vec<String> {
    oauth
        .data
        .pointer("/spec/identityProviders")
        .and_then(Value::as_array)
        .map(|providers| {
            providers
                .iter()
                .filter_map(|p| p.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Read version and cluster ID from the `version` `ClusterVersion`.
///
/// # Errors
///
/// Returns [`FactError::Api`] when the object cannot be read.
pub async fn version_and_id(client: &Client) -> Result<(String, String), FactError> {
    let api: Api<DynamicObject> = Api::all_with(client.clone(), &cluster_version_api_resource());
    let cluster_version = api
        .get(CLUSTER_VERSION_NAME)
        .await
        .map_err(|e| FactError::api(format!("ClusterVersion {CLUSTER_VERSION_NAME}"), e))?;
    Ok(version_and_id_of(&cluster_version))
}

/// Names of the identity providers of the `cluster` `OAuth` object.
///
/// A missing `OAuth` object means no identity providers.
///
/// # Errors
///
/// Returns [`FactError::Api`] for any failure other than not found.
pub async fn identity_providers(client: &Client) -> Result<Vec<String>, FactError> {
    let api: Api<DynamicObject> = Api::all_with(client.clone(), &oauth_api_resource());
    match api.get_opt(OAUTH_NAME).await {
        Ok(Some(oauth)) => Ok(identity_provider_names(&oauth)),
        Ok(None) => {
            warn!(name = OAUTH_NAME, "OAuth configuration not found; reporting no identity providers");
            Ok(Vec::new())
        }
        Err(e) => Err(FactError::api(format!("OAuth {OAUTH_NAME}"), e)),
    }
}

/// Every storage class and its provisioner.
///
/// # Errors
///
/// Returns [`FactError::Api`] when the list request fails.
pub async fn storage_provisioners(client: &Client) -> Result<Vec<StorageProvisioner>, FactError> {
    let api: Api<StorageClass> = Api::all(client.clone());
    let classes = api
        .list(&ListParams::default())
        .await
        .map_err(|e| FactError::api("storageclasses", e))?;

    let provisioners: Vec<StorageProvisioner> = classes
        .items
        .iter()
        .map(|sc| StorageProvisioner {
            name: sc.name_any(),
            provisioner: sc.provisioner.clone(),
        })
        .collect();
    debug!(count = provisioners.len(), "Listed storage classes");
    Ok(provisioners)
}

/// Names of every mutating and validating webhook configuration.
///
/// # Errors
///
/// Returns [`FactError::Api`] when either list request fails.
pub async fn webhooks(client: &Client) -> Result<Webhooks, FactError> {
    let mutating: Api<MutatingWebhookConfiguration> = Api::all(client.clone());
    let validating: Api<ValidatingWebhookConfiguration> = Api::all(client.clone());
    let lp = ListParams::default();

    let mutating = mutating
        .list(&lp)
        .await
        .map_err(|e| FactError::api("mutatingwebhookconfigurations", e))?
        .items
        .iter()
        .map(ResourceExt::name_any)
        .collect();
    let validating = validating
        .list(&lp)
        .await
        .map_err(|e| FactError::api("validatingwebhookconfigurations", e))?
        .items
        .iter()
        .map(ResourceExt::name_any)
        .collect();

    Ok(Webhooks {
        mutating,
        validating,
    })
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod cluster_tests;
