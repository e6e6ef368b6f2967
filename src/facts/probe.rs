// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Short-lived probe pod that prints a node's `/etc/resolv.conf`.
//!
//! The pod runs on the host network with the host file mounted read-only and
//! simply `cat`s it; its log is the file content. A [`ProbePod`] owns the pod
//! for the duration of one DNS lookup and deletes it when released. If the
//! owning future is dropped before release, the guard schedules the delete on
//! the current runtime instead.

use crate::config::FactsConfig;
use crate::constants::{
    DNS_READER_CONTAINER_NAME, DNS_READER_POD_NAME, DNS_READER_VOLUME_NAME, RESOLV_CONF_HOST_PATH,
    RESOLV_CONF_MOUNT_PATH,
};
use crate::errors::FactError;
use crate::metrics;
use k8s_openapi::api::core::v1::{
    Container, HostPathVolumeSource, Pod, PodSpec, SecurityContext, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{DeleteParams, LogParams, PostParams};
use kube::Api;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pod phases after which the container will not run again.
const TERMINAL_PHASES: [&str; 2] = ["Succeeded", "Failed"];

/// Build the probe pod definition.
#[must_use]
pub fn build_probe_pod(config: &FactsConfig) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(DNS_READER_POD_NAME.to_string()),
            namespace: Some(config.namespace.clone()),
            ..Default::default()
        },
        spec: Some(PodSpec {
            service_account_name: Some(config.service_account.clone()),
            restart_policy: Some("Never".to_string()),
            host_network: Some(true),
            containers: vec![Container {
                name: DNS_READER_CONTAINER_NAME.to_string(),
                image: Some(config.dns_reader_image.clone()),
                command: Some(vec!["cat".to_string(), RESOLV_CONF_MOUNT_PATH.to_string()]),
                volume_mounts: Some(vec![VolumeMount {
                    name: DNS_READER_VOLUME_NAME.to_string(),
                    mount_path: RESOLV_CONF_MOUNT_PATH.to_string(),
                    read_only: Some(true),
                    ..Default::default()
                }]),
                security_context: Some(SecurityContext {
                    run_as_user: Some(0),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            volumes: Some(vec![Volume {
                name: DNS_READER_VOLUME_NAME.to_string(),
                host_path: Some(HostPathVolumeSource {
                    path: RESOLV_CONF_HOST_PATH.to_string(),
                    type_: Some("File".to_string()),
                }),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Whether a pod has reached a phase it will not leave.
#[must_use]
pub fn is_finished(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        .is_some_and(|phase| TERMINAL_PHASES.contains(&phase))
}

/// Scoped ownership of the probe pod.
pub struct ProbePod {
    api: Api<Pod>,
    namespace: String,
    name: String,
    armed: bool,
}

impl ProbePod {
    /// Reuse the probe pod if it already exists, otherwise create it.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::Api`] when the lookup or the create fails.
    pub async fn launch(api: Api<Pod>, pod: &Pod) -> Result<Self, FactError> {
        let namespace = pod.metadata.namespace.clone().unwrap_or_default();
        let name = pod.metadata.name.clone().unwrap_or_default();
        let resource = format!("pod {namespace}/{name}");

        let existing = api
            .get_opt(&name)
            .await
            .map_err(|e| FactError::api(resource.clone(), e))?;

        if existing.is_some() {
            debug!(namespace = %namespace, name = %name, "Reusing existing probe pod");
        } else {
            api.create(&PostParams::default(), pod)
                .await
                .map_err(|e| FactError::api(resource, e))?;
            info!(namespace = %namespace, name = %name, "Created probe pod");
        }

        Ok(Self {
            api,
            namespace,
            name,
            armed: true,
        })
    }

    /// Poll until the pod finishes or `timeout` elapses.
    ///
    /// A pod that cannot be found yet is polled again; any other read error
    /// ends the wait.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::ProbeTimeout`] on timeout, [`FactError::Api`] on a
    /// failed read.
    pub async fn wait_until_finished(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<(), FactError> {
        let poll = async {
            loop {
                match self.api.get_opt(&self.name).await {
                    Ok(Some(pod)) if is_finished(&pod) => return Ok(()),
                    Ok(_) => {}
                    Err(e) => return Err(FactError::api(self.resource(), e)),
                }
                tokio::time::sleep(poll_interval).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| FactError::ProbeTimeout {
                namespace: self.namespace.clone(),
                name: self.name.clone(),
                timeout,
            })?
    }

    /// Full log of the pod's container.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::Api`] when the log cannot be read.
    pub async fn logs(&self) -> Result<String, FactError> {
        self.api
            .logs(&self.name, &LogParams::default())
            .await
            .map_err(|e| FactError::api(self.resource(), e))
    }

    /// Delete the pod. Failures are logged and counted, never returned.
    ///
    /// The guard stays armed until the delete returns, so a release that is
    /// cancelled midway still hands the pod to [`Drop`].
    pub async fn release(mut self) {
        delete_probe_pod(&self.api, &self.namespace, &self.name).await;
        self.armed = false;
    }

    fn resource(&self) -> String {
        format!("pod {}/{}", self.namespace, self.name)
    }
}

impl Drop for ProbePod {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // Dropped before release, e.g. the reconcile future was cancelled.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let api = self.api.clone();
            let namespace = std::mem::take(&mut self.namespace);
            let name = std::mem::take(&mut self.name);
            handle.spawn(async move {
                delete_probe_pod(&api, &namespace, &name).await;
            });
        } else {
            warn!(
                namespace = %self.namespace,
                name = %self.name,
                "No runtime available to delete probe pod"
            );
            metrics::record_probe_cleanup_failure();
        }
    }
}

async fn delete_probe_pod(api: &Api<Pod>, namespace: &str, name: &str) {
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => debug!(namespace = %namespace, name = %name, "Deleted probe pod"),
        Err(kube::Error::Api(ae)) if ae.code == 404 => {
            debug!(namespace = %namespace, name = %name, "Probe pod already gone");
        }
        Err(e) => {
            warn!(
                namespace = %namespace,
                name = %name,
                error = %e,
                "Failed to delete probe pod"
            );
            metrics::record_probe_cleanup_failure();
        }
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod probe_tests;
