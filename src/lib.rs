// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # Axiom - ClusterInfo Operator for Kubernetes
//!
//! Axiom is a Kubernetes operator that gathers facts about the cluster it runs
//! in and publishes them as the status of a cluster-scoped `ClusterInfo`
//! resource, mirroring every committed status into `MongoDB`.
//!
//! ## Overview
//!
//! This library provides the core functionality for the operator, including:
//!
//! - The `ClusterInfo` Custom Resource Definition
//! - Fact providers for nodes, DNS, routes, identity providers, storage and webhooks
//! - Idempotent, conflict-retrying status updates
//! - A best-effort `MongoDB` mirror running on detached tasks
//!
//! ## Modules
//!
//! - [`crd`] - Custom Resource Definition types
//! - [`facts`] - Fact providers backed by the Kubernetes API
//! - [`reconcilers`] - Collection, comparison and status update logic
//! - [`mirror`] - `MongoDB` mirror writer
//! - [`context`] - Shared context handed to the controller
//! - [`config`] - Command-line and environment configuration
//! - [`metrics`] - Prometheus metrics
//! - [`http`] - Metrics and health endpoints
//!
//! ## Example
//!
//! ```rust
//! use axiom::crd::{ClusterInfoStatus, NodeInfo};
//!
//! let mut status = ClusterInfoStatus {
//!     node_info: vec![
//!         NodeInfo { name: "worker-2".into(), internal_ip: "10.0.0.2".into(), ..Default::default() },
//!         NodeInfo { name: "worker-1".into(), internal_ip: "10.0.0.1".into(), ..Default::default() },
//!     ],
//!     ..Default::default()
//! };
//! status.normalize();
//! assert_eq!(status.node_info[0].name, "worker-1");
//! ```

pub mod conditions;
pub mod config;
pub mod constants;
pub mod context;
pub mod crd;
pub mod errors;
pub mod facts;
pub mod http;
pub mod metrics;
pub mod mirror;
pub mod nmstate;
pub mod quantity;
pub mod reconcilers;
