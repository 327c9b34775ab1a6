//! # Configuration
//!
//! Adapter configuration and the cluster-connection factory.

mod adapter;

pub use adapter::AdapterConfig;

use crate::error::{AdapterError, Result};
use kube::Client;

/// Build a Kubernetes client honoring the configured request timeout
///
/// Uses the in-cluster config when running in a pod, otherwise the local kubeconfig.
pub async fn connect(config: &AdapterConfig) -> Result<Client> {
    let mut kube_config = kube::Config::infer().await.map_err(|e| {
        AdapterError::Configuration(format!("unable to infer kubernetes config: {e}"))
    })?;
    kube_config.read_timeout = Some(config.request_timeout);
    kube_config.write_timeout = Some(config.request_timeout);

    Client::try_from(kube_config).map_err(AdapterError::Client)
}
