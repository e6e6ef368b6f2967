// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use axiom::{
    config::OperatorConfig,
    constants::{ERROR_REQUEUE_DURATION_SECS, KIND_CLUSTER_INFO, TOKIO_WORKER_THREADS},
    context::Context,
    crd::ClusterInfo,
    errors::ReconcileError,
    http, metrics,
    reconcilers::reconcile_clusterinfo,
};
use clap::Parser;
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, watcher::Config, Controller},
    Api, Client, ResourceExt,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let config = OperatorConfig::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("axiom-operator")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: OperatorConfig) -> Result<()> {
    // Respects RUST_LOG if set, otherwise defaults to INFO level.
    // RUST_LOG_FORMAT (or --log-format) selects text or json output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match config.log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!("Starting Axiom ClusterInfo operator");
    debug!(
        namespace = %config.facts.namespace,
        requeue_interval_secs = config.requeue_interval_secs,
        metrics_bind_address = %config.metrics_bind_address,
        "Configuration loaded"
    );

    if config.mirror.mongo_uri.is_none() {
        info!("MONGO_URI is not set; mirror attempts will fail and be logged");
    }

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let ctx = Arc::new(Context::new(client.clone(), &config));

    // Neither task should ever exit; if one does, the process exits with it
    tokio::select! {
        result = run_clusterinfo_controller(client, ctx) => {
            error!("CRITICAL: ClusterInfo controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("ClusterInfo controller exited unexpectedly without error")
        }
        result = http::serve(config.metrics_bind_address) => {
            error!("CRITICAL: Metrics server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Metrics server exited unexpectedly without error")
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, stopping");
        }
    }

    Ok(())
}

/// Resolve on SIGINT, or SIGTERM on Unix platforms.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Run the `ClusterInfo` controller
async fn run_clusterinfo_controller(client: Client, ctx: Arc<Context>) -> Result<()> {
    info!("Starting ClusterInfo controller");

    let api = Api::<ClusterInfo>::all(client);

    Controller::new(api, Config::default())
        .run(reconcile_clusterinfo_wrapper, error_policy, ctx)
        .for_each(|_| futures::future::ready(()))
        .await;

    Ok(())
}

/// Reconcile wrapper for `ClusterInfo`
async fn reconcile_clusterinfo_wrapper(
    clusterinfo: Arc<ClusterInfo>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    let name = clusterinfo.name_any();

    match reconcile_clusterinfo(ctx, clusterinfo).await {
        Ok(action) => {
            info!("Successfully reconciled ClusterInfo: {}", name);
            metrics::record_reconciliation_success(KIND_CLUSTER_INFO, start.elapsed());
            Ok(action)
        }
        Err(e) => {
            error!("Failed to reconcile ClusterInfo {}: {}", name, e);
            metrics::record_reconciliation_error(KIND_CLUSTER_INFO, start.elapsed());
            metrics::record_error(KIND_CLUSTER_INFO, e.kind());
            Err(e)
        }
    }
}

/// Error policy for controller
fn error_policy(_resource: Arc<ClusterInfo>, _err: &ReconcileError, _ctx: Arc<Context>) -> Action {
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_DURATION_SECS))
}
