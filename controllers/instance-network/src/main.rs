//! Instance Network Controller
//!
//! Reads the addresses OpenStack Compute reports for one instance, reconciles
//! them against the declared networks and prints the resulting attachments
//! and access addresses as JSON:
//! - Declared networks are resolved to a uuid and name through Networking
//! - Observed addresses are grouped per network and per NIC
//! - Attachments follow the declared order, or the observed order when
//!   nothing is declared
//!
//! With `WAIT_FOR_NETWORKS` set, the controller keeps re-reading the instance
//! until every declared network has reported addresses.

mod backoff;
mod config;
mod error;
mod sync;

use std::sync::Arc;

use anyhow::Context;
use backoff::FibonacciBackoff;
use config::Config;
use instance_networks::{NetworkReconciler, RequestContext};
use openstack_client::OpenStackClient;
use sync::SyncSettings;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Instance Network Controller");

    let config = Config::from_env()?;

    info!("Configuration:");
    info!("  Networking endpoint: {}", config.network_endpoint);
    info!("  Compute endpoint: {}", config.compute_endpoint);
    info!("  Instance: {}", config.instance_id);
    info!(
        "  Declared networks: {}",
        config
            .declared_networks_file
            .as_deref()
            .map_or_else(|| "none (use every observed NIC)".to_string(), |p| p.display().to_string())
    );
    info!("  Reconcile timeout: {:?}", config.reconcile_timeout);
    if config.wait_for_networks {
        info!("  Waiting for networks: up to {} attempts", config.wait_max_attempts);
    }

    let declared = match &config.declared_networks_file {
        Some(path) => config::load_declared_networks(path)
            .with_context(|| format!("loading declared networks from {}", path.display()))?,
        None => Vec::new(),
    };

    let client = Arc::new(OpenStackClient::new(
        config.network_endpoint.clone(),
        config.compute_endpoint.clone(),
        config.token.clone(),
    )?);

    if let Err(e) = client.validate_token().await {
        error!("OpenStack token validation failed: {}", e);
        return Err(e.into());
    }

    let reconciler = NetworkReconciler::new(client.clone(), client.clone(), client);

    let (ctx, cancel) = RequestContext::cancellable();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling reconciliation");
            cancel.cancel();
        }
    });

    let settings = SyncSettings {
        attempt_timeout: config.reconcile_timeout,
        wait_for_networks: config.wait_for_networks,
        max_attempts: config.wait_max_attempts,
    };

    let output = sync::sync_instance(
        &reconciler,
        &ctx,
        &declared,
        &config.instance_id,
        &settings,
        FibonacciBackoff::default(),
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
