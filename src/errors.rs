// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the reconciliation cycle.
//!
//! The taxonomy follows how each failure is handled:
//!
//! - [`FactError`] - a fact provider could not answer; the cycle aborts
//! - [`StatusError`] - the status write failed; conflicts are retried first
//! - [`MirrorError`] - the secondary store write failed; logged only
//! - [`ReconcileError`] - what a failed cycle reports to the controller
//!
//! Probe cleanup failures have no type of their own: they are logged where
//! they happen and never leave the DNS provider.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the fact providers.
#[derive(Error, Debug)]
pub enum FactError {
    /// A Kubernetes API request failed
    #[error("Kubernetes API request for {resource} failed: {source}")]
    Api {
        /// The resource being read (e.g., "nodes", "route openshift-console/console")
        resource: String,
        #[source]
        source: kube::Error,
    },

    /// Host name resolution failed
    #[error("DNS lookup for host '{host}' failed: {source}")]
    Lookup {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// A resource carried a payload that could not be interpreted
    #[error("Invalid {what}: {reason}")]
    InvalidPayload {
        /// What was being parsed (e.g., "desiredState of node-resolver")
        what: String,
        reason: String,
    },

    /// A resource quantity string could not be parsed
    #[error("Invalid quantity '{value}': {reason}")]
    InvalidQuantity { value: String, reason: String },

    /// The probe pod did not finish in time
    #[error("Timed out after {timeout:?} waiting for pod {namespace}/{name} to complete")]
    ProbeTimeout {
        namespace: String,
        name: String,
        timeout: Duration,
    },
}

impl FactError {
    /// Wrap a Kubernetes error with the resource it was reading.
    pub fn api(resource: impl Into<String>, source: kube::Error) -> Self {
        Self::Api {
            resource: resource.into(),
            source,
        }
    }

    /// Build an invalid payload error.
    pub fn invalid(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while committing the status record.
#[derive(Error, Debug)]
pub enum StatusError {
    /// The record changed between read and write (HTTP 409)
    #[error("ClusterInfo '{name}' was modified concurrently")]
    Conflict { name: String },

    /// The record does not exist
    #[error("ClusterInfo '{name}' not found")]
    NotFound { name: String },

    /// The record was read without a resource version, so no conditional write is possible
    #[error("ClusterInfo '{name}' has no resourceVersion")]
    MissingResourceVersion { name: String },

    /// Every retry lost the race
    #[error("Gave up updating ClusterInfo '{name}' after {attempts} conflicting attempts")]
    ConflictRetriesExhausted { name: String, attempts: u32 },

    /// Any other API failure
    #[error("Kubernetes API request for ClusterInfo '{name}' failed: {source}")]
    Api {
        name: String,
        #[source]
        source: kube::Error,
    },
}

impl StatusError {
    /// Classify a Kubernetes error raised for the named record.
    #[must_use]
    pub fn from_kube(name: &str, err: kube::Error) -> Self {
        match &err {
            kube::Error::Api(ae) if ae.code == 409 => Self::Conflict {
                name: name.to_string(),
            },
            kube::Error::Api(ae) if ae.code == 404 => Self::NotFound {
                name: name.to_string(),
            },
            _ => Self::Api {
                name: name.to_string(),
                source: err,
            },
        }
    }

    /// Whether the error is an optimistic-concurrency conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Errors raised by the mirror writer. Never surfaced to the reconciler.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// No connection string was configured
    #[error("MONGO_URI is not set")]
    MissingUri,

    /// Connecting to the store failed
    #[error("Failed to connect to MongoDB: {0}")]
    Connect(#[source] mongodb::error::Error),

    /// The status could not be converted into a document
    #[error("Failed to encode status as BSON: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    /// The upsert was rejected
    #[error("Failed to upsert cluster info for '{cluster_id}': {source}")]
    Write {
        cluster_id: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// The attempt did not finish in time
    #[error("Mirror attempt timed out after {0:?}")]
    Timeout(Duration),
}

/// A failed reconciliation cycle.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Failed to collect cluster facts: {0}")]
    Collect(#[from] FactError),

    #[error("Failed to update ClusterInfo status: {0}")]
    Update(#[from] StatusError),
}

impl ReconcileError {
    /// Short label used for metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Collect(_) => "collect",
            Self::Update(StatusError::ConflictRetriesExhausted { .. }) => "conflict",
            Self::Update(_) => "update",
        }
    }
}
