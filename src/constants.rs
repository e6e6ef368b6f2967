// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Axiom operator.
//!
//! This module contains the well-known resource names, API coordinates and
//! timing defaults used throughout the codebase. Constants are organized by
//! category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for the `ClusterInfo` CRD
pub const API_GROUP: &str = "axiom.dana.io";

/// Kind name for `ClusterInfo` resource
pub const KIND_CLUSTER_INFO: &str = "ClusterInfo";

/// Field manager used for status writes
pub const FIELD_MANAGER: &str = "axiom-operator";

// ============================================================================
// Well-Known Cluster Resources
// ============================================================================

/// Name of the singleton `ClusterVersion` resource
pub const CLUSTER_VERSION_NAME: &str = "version";

/// Name of the singleton `OAuth` configuration resource
pub const OAUTH_NAME: &str = "cluster";

/// Name of the `NodeNetworkConfigurationPolicy` carrying the node resolver settings
pub const NODE_RESOLVER_POLICY_NAME: &str = "node-resolver";

/// Capacity key used by the NVIDIA device plugin
pub const GPU_RESOURCE_NAME: &str = "nvidia.com/gpu";

/// Node address type for the internal IP
pub const NODE_ADDRESS_INTERNAL_IP: &str = "InternalIP";

/// Node address type for the hostname
pub const NODE_ADDRESS_HOSTNAME: &str = "Hostname";

// ============================================================================
// Console Route Defaults
// ============================================================================

/// Default name of the web console route
pub const DEFAULT_CONSOLE_ROUTE_NAME: &str = "console";

/// Default namespace of the web console route
pub const DEFAULT_CONSOLE_ROUTE_NAMESPACE: &str = "openshift-console";

/// Default host prefix of the console route, replaced by `api.` for the API server
pub const DEFAULT_INGRESS_PREFIX: &str = "console-openshift-console.apps.";

/// Prefix substituted for the ingress prefix to build the API server host
pub const API_HOST_PREFIX: &str = "api.";

// ============================================================================
// DNS Probe Constants
// ============================================================================

/// Name of the transient pod that reads the node resolver file
pub const DNS_READER_POD_NAME: &str = "dns-reader";

/// Name of the reader container inside the probe pod
pub const DNS_READER_CONTAINER_NAME: &str = "reader";

/// Name of the host path volume mounting the resolver file
pub const DNS_READER_VOLUME_NAME: &str = "host-resolv";

/// Resolver file path on the node
pub const RESOLV_CONF_HOST_PATH: &str = "/etc/resolv.conf";

/// Mount path of the resolver file inside the probe pod
pub const RESOLV_CONF_MOUNT_PATH: &str = "/host/resolv.conf";

/// Search domain reported when the resolver file declares none
pub const DEFAULT_SEARCH_DOMAIN: &str = "cluster.local";

/// Default service account of the operator, reused by the probe pod
pub const DEFAULT_SERVICE_ACCOUNT: &str = "axiom-operator-controller-manager";

/// Default image used by the probe pod
pub const DEFAULT_DNS_READER_IMAGE: &str = "registry.access.redhat.com/ubi9/ubi-minimal:latest";

/// Default namespace the operator (and its probe pod) runs in
pub const DEFAULT_OPERATOR_NAMESPACE: &str = "axiom-operator-system";

/// Poll interval while waiting for the probe pod to finish (1 second)
pub const PROBE_POLL_INTERVAL_SECS: u64 = 1;

/// Upper bound on how long a cycle waits for the probe pod (30 seconds)
pub const MAX_PROBE_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Mirror Constants
// ============================================================================

/// Default `MongoDB` database for mirrored records
pub const DEFAULT_MIRROR_DATABASE: &str = "axiom";

/// Default `MongoDB` collection for mirrored records
pub const DEFAULT_MIRROR_COLLECTION: &str = "clusterInfo";

/// Document field the mirror upserts on
pub const MIRROR_KEY_FIELD: &str = "clusterID";

/// Default bound on one mirror attempt, connection included (5 seconds)
pub const DEFAULT_MIRROR_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// Controller Error Handling Constants
// ============================================================================

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Default periodic resync of a healthy `ClusterInfo` (5 minutes)
pub const DEFAULT_REQUEUE_INTERVAL_SECS: u64 = 300;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Path for the liveness endpoint
pub const HEALTH_SERVER_PATH: &str = "/healthz";

/// Default bind address for the metrics HTTP server
pub const DEFAULT_METRICS_BIND_ADDRESS: &str = "0.0.0.0:8080";
