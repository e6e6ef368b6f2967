// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Operator configuration.
//!
//! All settings are parsed once at startup from command-line flags, with an
//! environment variable fallback for each, and passed down explicitly. Fact
//! providers and the mirror writer never read the environment themselves.
//!
//! # Example
//!
//! ```rust
//! use axiom::config::OperatorConfig;
//! use clap::Parser;
//!
//! let config = OperatorConfig::parse_from(["axiom-operator", "--namespace", "axiom"]);
//! assert_eq!(config.facts.namespace, "axiom");
//! ```

use crate::constants::{
    DEFAULT_CONSOLE_ROUTE_NAME, DEFAULT_CONSOLE_ROUTE_NAMESPACE, DEFAULT_DNS_READER_IMAGE,
    DEFAULT_INGRESS_PREFIX, DEFAULT_METRICS_BIND_ADDRESS, DEFAULT_MIRROR_COLLECTION,
    DEFAULT_MIRROR_DATABASE, DEFAULT_MIRROR_TIMEOUT_SECS, DEFAULT_OPERATOR_NAMESPACE,
    DEFAULT_REQUEUE_INTERVAL_SECS, DEFAULT_SERVICE_ACCOUNT, MAX_PROBE_TIMEOUT_SECS,
    PROBE_POLL_INTERVAL_SECS,
};
use clap::{Args, Parser};
use std::net::SocketAddr;
use std::time::Duration;

/// Top-level operator configuration.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "axiom-operator",
    version,
    about = "Aggregates cluster facts into the ClusterInfo status and mirrors it to MongoDB"
)]
pub struct OperatorConfig {
    #[command(flatten)]
    pub facts: FactsConfig,

    #[command(flatten)]
    pub mirror: MirrorConfig,

    /// Periodic resync interval for a successfully reconciled `ClusterInfo`, in seconds
    #[arg(long, env = "REQUEUE_INTERVAL_SECS", default_value_t = DEFAULT_REQUEUE_INTERVAL_SECS)]
    pub requeue_interval_secs: u64,

    /// Address the metrics and health endpoints listen on
    #[arg(long, env = "METRICS_BIND_ADDRESS", default_value = DEFAULT_METRICS_BIND_ADDRESS)]
    pub metrics_bind_address: SocketAddr,

    /// Log output format: `text` or `json`
    #[arg(long, env = "RUST_LOG_FORMAT", default_value = "text")]
    pub log_format: String,
}

impl OperatorConfig {
    #[must_use]
    pub fn requeue_interval(&self) -> Duration {
        Duration::from_secs(self.requeue_interval_secs)
    }
}

/// Settings consumed by the fact providers.
#[derive(Args, Debug, Clone)]
pub struct FactsConfig {
    /// Namespace the operator runs in; the DNS probe pod is created here
    #[arg(long, env = "POD_NAMESPACE", default_value = DEFAULT_OPERATOR_NAMESPACE)]
    pub namespace: String,

    /// Image of the DNS probe pod; must provide `cat`
    #[arg(long, env = "DNS_READER_IMAGE", default_value = DEFAULT_DNS_READER_IMAGE)]
    pub dns_reader_image: String,

    /// Service account the DNS probe pod runs as
    #[arg(long, env = "SERVICE_ACCOUNT_NAME", default_value = DEFAULT_SERVICE_ACCOUNT)]
    pub service_account: String,

    /// Name of the console route used to resolve router and API addresses
    #[arg(long, env = "CONSOLE_ROUTE_NAME", default_value = DEFAULT_CONSOLE_ROUTE_NAME)]
    pub console_route_name: String,

    /// Namespace of the console route
    #[arg(long, env = "CONSOLE_ROUTE_NAMESPACE", default_value = DEFAULT_CONSOLE_ROUTE_NAMESPACE)]
    pub console_route_namespace: String,

    /// Host prefix of the console route, swapped for `api.` to reach the API server
    #[arg(long, env = "INGRESS_PREFIX", default_value = DEFAULT_INGRESS_PREFIX)]
    pub ingress_prefix: String,

    /// How long to wait for the DNS probe pod, in seconds (capped at 30)
    #[arg(long, env = "DNS_PROBE_TIMEOUT_SECS", default_value_t = MAX_PROBE_TIMEOUT_SECS)]
    pub probe_timeout_secs: u64,
}

impl FactsConfig {
    /// Probe wait bound, never above 30 seconds.
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.min(MAX_PROBE_TIMEOUT_SECS))
    }

    /// Interval between probe pod status polls.
    #[must_use]
    pub fn probe_poll_interval(&self) -> Duration {
        Duration::from_secs(PROBE_POLL_INTERVAL_SECS)
    }
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_OPERATOR_NAMESPACE.to_string(),
            dns_reader_image: DEFAULT_DNS_READER_IMAGE.to_string(),
            service_account: DEFAULT_SERVICE_ACCOUNT.to_string(),
            console_route_name: DEFAULT_CONSOLE_ROUTE_NAME.to_string(),
            console_route_namespace: DEFAULT_CONSOLE_ROUTE_NAMESPACE.to_string(),
            ingress_prefix: DEFAULT_INGRESS_PREFIX.to_string(),
            probe_timeout_secs: MAX_PROBE_TIMEOUT_SECS,
        }
    }
}

/// Settings for the `MongoDB` mirror.
#[derive(Args, Debug, Clone)]
pub struct MirrorConfig {
    /// `MongoDB` connection string; mirroring fails (and is logged) when unset
    #[arg(long, env = "MONGO_URI", hide_env_values = true)]
    pub mongo_uri: Option<String>,

    /// Database holding mirrored records
    #[arg(long, env = "MONGO_DATABASE", default_value = DEFAULT_MIRROR_DATABASE)]
    pub database: String,

    /// Collection holding mirrored records
    #[arg(long, env = "MONGO_COLLECTION", default_value = DEFAULT_MIRROR_COLLECTION)]
    pub collection: String,

    /// Bound on one mirror attempt, connection included, in seconds
    #[arg(long, env = "MONGO_TIMEOUT_SECS", default_value_t = DEFAULT_MIRROR_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl MirrorConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            mongo_uri: None,
            database: DEFAULT_MIRROR_DATABASE.to_string(),
            collection: DEFAULT_MIRROR_COLLECTION.to_string(),
            timeout_secs: DEFAULT_MIRROR_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
