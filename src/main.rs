//! # Broker Proxy
//!
//! Process hosting the Service Catalog broker adapter.
//!
//! ## Startup
//!
//! 1. Install the rustls crypto provider and the tracing subscriber
//! 2. Load and validate [`AdapterConfig`] from the environment
//! 3. Connect to the cluster and build the [`PlatformAdapter`]
//! 4. List brokers once to prove connectivity and permissions
//!
//! The adapter is then held for the lifetime of the process; its in-progress
//! catalog fetch state lives only in memory and is reset on restart.

use anyhow::{Context, Result};
use broker_proxy::observability::{self, metrics};
use broker_proxy::{AdapterConfig, BrokerPlatformClient, PlatformAdapter};
use tracing::{info, warn};

const BUILD_GIT_HASH: &str = env!("BUILD_GIT_HASH");
const BUILD_DATETIME: &str = env!("BUILD_DATETIME");

#[tokio::main]
async fn main() -> Result<()> {
    // Configure rustls crypto provider FIRST, before any other operations
    // Required for rustls 0.23+ when no default provider is set via features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        anyhow::bail!("Failed to install rustls crypto provider");
    }

    observability::init_logging("broker_proxy=info");

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = BUILD_GIT_HASH,
        built = BUILD_DATETIME,
        "Starting broker proxy"
    );

    let config = AdapterConfig::from_env();
    config
        .validate()
        .context("Adapter configuration is invalid")?;

    if config.metrics_enabled {
        metrics::register_metrics().context("Failed to register metrics")?;
    }

    let adapter = PlatformAdapter::connect(config)
        .await
        .context("Failed to build broker adapter")?;

    let capabilities = adapter.capabilities();
    info!(
        scope = %adapter.scope(),
        secret_namespace = %adapter.config().secret_namespace,
        catalog_fetch = capabilities.catalog_fetch,
        visibility = capabilities.visibility,
        "Broker adapter ready"
    );

    let brokers = adapter
        .get_brokers()
        .await
        .context("Failed to list brokers during startup check")?;
    info!(count = brokers.len(), "Startup broker listing succeeded");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    if adapter.config().metrics_enabled {
        match metrics::gather_metrics() {
            Ok(text) => info!(metrics = %text, "Final metrics"),
            Err(e) => warn!(error = %e, "Failed to gather metrics"),
        }
    }

    Ok(())
}
