// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Best-effort mirror of the committed status to `MongoDB`.
//!
//! After a status write the reconciler hands the committed status to
//! [`Mirror::dispatch`], which upserts it into the `clusterInfo` collection
//! keyed by `clusterID` on a detached task. Mirror failures are logged and
//! counted; they never fail or delay a reconciliation.
//!
//! Each attempt opens its own session, bounded by a timeout that covers the
//! connection as well as the write, and closes it whatever the outcome.
//! Detached tasks are neither joined nor cancelled, and there is no limit on
//! how many may be in flight.

use crate::config::MirrorConfig;
use crate::constants::MIRROR_KEY_FIELD;
use crate::crd::ClusterInfoStatus;
use crate::errors::MirrorError;
use crate::metrics;
use async_trait::async_trait;
use mongodb::bson::{doc, to_document, Document};
use mongodb::{Client, Collection};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::error::Elapsed;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

/// Opens sessions against the mirror store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MirrorBackend: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn MirrorSession>, MirrorError>;
}

/// One open session against the mirror store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MirrorSession: Send + Sync {
    /// Insert or replace the record keyed by `cluster_id`.
    async fn upsert(&self, cluster_id: &str, status: &ClusterInfoStatus) -> Result<(), MirrorError>;

    /// Release the session's connections.
    async fn close(&self);
}

/// [`MirrorBackend`] for a `MongoDB` deployment.
#[derive(Clone, Debug)]
pub struct MongoBackend {
    uri: Option<String>,
    database: String,
    collection: String,
}

impl MongoBackend {
    #[must_use]
    pub fn new(config: &MirrorConfig) -> Self {
        Self {
            uri: config.mongo_uri.clone(),
            database: config.database.clone(),
            collection: config.collection.clone(),
        }
    }
}

#[async_trait]
impl MirrorBackend for MongoBackend {
    async fn connect(&self) -> Result<Box<dyn MirrorSession>, MirrorError> {
        let uri = self.uri.as_deref().ok_or(MirrorError::MissingUri)?;
        let client = Client::with_uri_str(uri)
            .await
            .map_err(MirrorError::Connect)?;
        let collection = client
            .database(&self.database)
            .collection::<Document>(&self.collection);
        Ok(Box::new(MongoSession { client, collection }))
    }
}

struct MongoSession {
    client: Client,
    collection: Collection<Document>,
}

#[async_trait]
impl MirrorSession for MongoSession {
    async fn upsert(&self, cluster_id: &str, status: &ClusterInfoStatus) -> Result<(), MirrorError> {
        let document = to_document(status)?;
        let mut filter = Document::new();
        filter.insert(MIRROR_KEY_FIELD, cluster_id);

        self.collection
            .update_one(filter, doc! { "$set": document })
            .upsert(true)
            .await
            .map_err(|source| MirrorError::Write {
                cluster_id: cluster_id.to_string(),
                source,
            })?;
        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}

/// What a mirror attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// The status had no cluster ID; no session was opened.
    Skipped,
    /// The record was upserted.
    Written,
}

impl MirrorOutcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Written => "written",
        }
    }
}

/// Mirror writer.
pub struct Mirror {
    backend: Arc<dyn MirrorBackend>,
    timeout: Duration,
}

impl Mirror {
    #[must_use]
    pub fn new(backend: Arc<dyn MirrorBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Mirror writer for the configured `MongoDB` deployment.
    #[must_use]
    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(Arc::new(MongoBackend::new(config)), config.timeout())
    }

    /// Upsert `status` keyed by its cluster ID.
    ///
    /// A status without a cluster ID is skipped before any connection is
    /// attempted. Once connected, the session is closed whatever the write
    /// did, including when it ran past the deadline.
    ///
    /// # Errors
    ///
    /// Returns a [`MirrorError`] when connecting or writing fails, or when the
    /// attempt exceeds its timeout.
    pub async fn mirror(&self, status: &ClusterInfoStatus) -> Result<MirrorOutcome, MirrorError> {
        if status.cluster_id.is_empty() {
            debug!("Status has no clusterID, skipping mirror");
            return Ok(MirrorOutcome::Skipped);
        }

        // Connect and write share one deadline; close runs outside it.
        let deadline = Instant::now() + self.timeout;
        let timed_out = |_: Elapsed| MirrorError::Timeout(self.timeout);

        let session = timeout_at(deadline, self.backend.connect())
            .await
            .map_err(timed_out)??;
        let result = timeout_at(deadline, session.upsert(&status.cluster_id, status))
            .await
            .map_err(timed_out)
            .and_then(|written| written);

        if timeout(self.timeout, session.close()).await.is_err() {
            warn!(cluster_id = %status.cluster_id, "Timed out closing MongoDB session");
        }

        result.map(|()| MirrorOutcome::Written)
    }

    /// Mirror `status` on a detached task.
    ///
    /// The returned handle may be dropped; the task runs to completion on its
    /// own and reports its outcome through logs and metrics only.
    pub fn dispatch(self: &Arc<Self>, status: ClusterInfoStatus) -> JoinHandle<()> {
        let mirror = Arc::clone(self);
        tokio::spawn(async move {
            match mirror.mirror(&status).await {
                Ok(outcome) => {
                    if outcome == MirrorOutcome::Written {
                        info!(cluster_id = %status.cluster_id, "Mirrored cluster info to MongoDB");
                    }
                    metrics::record_mirror(outcome.as_str());
                }
                Err(e) => {
                    warn!(
                        cluster_id = %status.cluster_id,
                        error = %e,
                        "Failed to mirror cluster info to MongoDB"
                    );
                    metrics::record_mirror("failed");
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "mirror_tests.rs"]
mod mirror_tests;
