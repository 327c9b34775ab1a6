//! # Resource API Seams
//!
//! Raw cluster verbs the adapter is built on. [`crate::kube_api`] implements
//! them over `kube::Api`; tests substitute in-memory fakes.
//!
//! Scope selection does not happen here: both the cluster-scoped and the
//! namespaced verbs are exposed and `BrokerResourceClient` picks one.

use crate::crd::{ClusterServiceBroker, ServiceBroker};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;

/// Verbs against `ClusterServiceBroker` and `ServiceBroker` resources
#[async_trait]
pub trait BrokerApi: Send + Sync {
    async fn create_cluster_broker(
        &self,
        broker: &ClusterServiceBroker,
    ) -> Result<ClusterServiceBroker, kube::Error>;

    async fn get_cluster_broker(&self, name: &str) -> Result<ClusterServiceBroker, kube::Error>;

    async fn list_cluster_brokers(&self) -> Result<Vec<ClusterServiceBroker>, kube::Error>;

    /// Replace the broker; `broker.metadata.resource_version` guards against lost updates
    async fn update_cluster_broker(
        &self,
        broker: &ClusterServiceBroker,
    ) -> Result<ClusterServiceBroker, kube::Error>;

    async fn delete_cluster_broker(&self, name: &str) -> Result<(), kube::Error>;

    async fn create_broker(
        &self,
        namespace: &str,
        broker: &ServiceBroker,
    ) -> Result<ServiceBroker, kube::Error>;

    async fn get_broker(&self, namespace: &str, name: &str) -> Result<ServiceBroker, kube::Error>;

    async fn list_brokers(&self, namespace: &str) -> Result<Vec<ServiceBroker>, kube::Error>;

    async fn update_broker(
        &self,
        namespace: &str,
        broker: &ServiceBroker,
    ) -> Result<ServiceBroker, kube::Error>;

    async fn delete_broker(&self, namespace: &str, name: &str) -> Result<(), kube::Error>;
}

/// Verbs against `core/v1` secrets
#[async_trait]
pub trait SecretApi: Send + Sync {
    async fn create_secret(&self, namespace: &str, secret: &Secret) -> Result<Secret, kube::Error>;

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, kube::Error>;

    async fn replace_secret(&self, namespace: &str, secret: &Secret)
        -> Result<Secret, kube::Error>;
}
