//! # Kubernetes API Backend
//!
//! [`BrokerApi`] and [`SecretApi`] implemented over `kube::Api`.

use crate::crd::{ClusterServiceBroker, ServiceBroker};
use crate::platform::api::{BrokerApi, SecretApi};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::{Client, ResourceExt};

/// Broker verbs backed by a live cluster
#[derive(Clone)]
pub struct KubeBrokerApi {
    client: Client,
}

impl KubeBrokerApi {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn cluster_brokers(&self) -> Api<ClusterServiceBroker> {
        Api::all(self.client.clone())
    }

    fn brokers(&self, namespace: &str) -> Api<ServiceBroker> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl std::fmt::Debug for KubeBrokerApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeBrokerApi").finish_non_exhaustive()
    }
}

#[async_trait]
impl BrokerApi for KubeBrokerApi {
    async fn create_cluster_broker(
        &self,
        broker: &ClusterServiceBroker,
    ) -> Result<ClusterServiceBroker, kube::Error> {
        self.cluster_brokers()
            .create(&PostParams::default(), broker)
            .await
    }

    async fn get_cluster_broker(&self, name: &str) -> Result<ClusterServiceBroker, kube::Error> {
        self.cluster_brokers().get(name).await
    }

    async fn list_cluster_brokers(&self) -> Result<Vec<ClusterServiceBroker>, kube::Error> {
        let list = self.cluster_brokers().list(&ListParams::default()).await?;
        Ok(list.items)
    }

    async fn update_cluster_broker(
        &self,
        broker: &ClusterServiceBroker,
    ) -> Result<ClusterServiceBroker, kube::Error> {
        self.cluster_brokers()
            .replace(&broker.name_any(), &PostParams::default(), broker)
            .await
    }

    async fn delete_cluster_broker(&self, name: &str) -> Result<(), kube::Error> {
        self.cluster_brokers()
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }

    async fn create_broker(
        &self,
        namespace: &str,
        broker: &ServiceBroker,
    ) -> Result<ServiceBroker, kube::Error> {
        self.brokers(namespace)
            .create(&PostParams::default(), broker)
            .await
    }

    async fn get_broker(&self, namespace: &str, name: &str) -> Result<ServiceBroker, kube::Error> {
        self.brokers(namespace).get(name).await
    }

    async fn list_brokers(&self, namespace: &str) -> Result<Vec<ServiceBroker>, kube::Error> {
        let list = self.brokers(namespace).list(&ListParams::default()).await?;
        Ok(list.items)
    }

    async fn update_broker(
        &self,
        namespace: &str,
        broker: &ServiceBroker,
    ) -> Result<ServiceBroker, kube::Error> {
        self.brokers(namespace)
            .replace(&broker.name_any(), &PostParams::default(), broker)
            .await
    }

    async fn delete_broker(&self, namespace: &str, name: &str) -> Result<(), kube::Error> {
        self.brokers(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }
}

/// Secret verbs backed by a live cluster
#[derive(Clone)]
pub struct KubeSecretApi {
    client: Client,
}

impl KubeSecretApi {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl std::fmt::Debug for KubeSecretApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSecretApi").finish_non_exhaustive()
    }
}

#[async_trait]
impl SecretApi for KubeSecretApi {
    async fn create_secret(&self, namespace: &str, secret: &Secret) -> Result<Secret, kube::Error> {
        self.secrets(namespace)
            .create(&PostParams::default(), secret)
            .await
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, kube::Error> {
        self.secrets(namespace).get(name).await
    }

    async fn replace_secret(
        &self,
        namespace: &str,
        secret: &Secret,
    ) -> Result<Secret, kube::Error> {
        self.secrets(namespace)
            .replace(&secret.name_any(), &PostParams::default(), secret)
            .await
    }
}
