//! # Platform Adapter
//!
//! Implements the broker registry contract on top of the Service Catalog.
//!
//! Ordering on create: the credential secret is written first and the broker
//! is only created once the secret exists. On update the two writes are
//! independent; when exactly one of them fails the caller gets
//! [`AdapterError::InconsistentState`] and the next reconciliation pass heals it.

use crate::config::{self, AdapterConfig};
use crate::error::{AdapterError, Result};
use crate::kube_api::{KubeBrokerApi, KubeSecretApi};
use crate::observability::metrics;
use crate::platform::api::{BrokerApi, SecretApi};
use crate::platform::broker_client::{resource_name, BrokerResource, BrokerResourceClient};
use crate::platform::credentials::{CredentialSecretManager, CredentialSecretRef};
use crate::platform::scope::Scope;
use crate::platform::sync_guard::SyncGuard;
use crate::platform::types::{
    BrokerRegistration, CreateServiceBrokerRequest, DeleteServiceBrokerRequest,
    ModifyPlanAccessRequest, PlatformCapabilities, UpdateServiceBrokerRequest, Visibility,
};
use crate::platform::BrokerPlatformClient;
use async_trait::async_trait;
use kube::Client;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub struct PlatformAdapter {
    config: AdapterConfig,
    brokers: BrokerResourceClient,
    secrets: CredentialSecretManager,
    // Owned by this adapter only
    sync_guard: SyncGuard,
}

impl PlatformAdapter {
    /// Build an adapter over the given resource APIs.
    ///
    /// Fails with [`AdapterError::Configuration`] when `config` is invalid.
    pub fn new(
        config: AdapterConfig,
        broker_api: Arc<dyn BrokerApi>,
        secret_api: Arc<dyn SecretApi>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, broker_api, secret_api))
    }

    /// Build an adapter talking to the cluster behind `client`
    pub fn with_client(config: AdapterConfig, client: Client) -> Result<Self> {
        config.validate()?;
        Ok(Self::build_with_client(config, client))
    }

    /// Connect to the cluster and build the adapter.
    ///
    /// `config` is validated once, before the cluster connection is built.
    pub async fn connect(config: AdapterConfig) -> Result<Self> {
        config.validate()?;
        let client = config::connect(&config).await?;
        Ok(Self::build_with_client(config, client))
    }

    fn build_with_client(config: AdapterConfig, client: Client) -> Self {
        Self::build(
            config,
            Arc::new(KubeBrokerApi::new(client.clone())),
            Arc::new(KubeSecretApi::new(client)),
        )
    }

    fn build(
        config: AdapterConfig,
        broker_api: Arc<dyn BrokerApi>,
        secret_api: Arc<dyn SecretApi>,
    ) -> Self {
        Self {
            brokers: BrokerResourceClient::new(config.scope(), broker_api),
            secrets: CredentialSecretManager::new(secret_api),
            sync_guard: SyncGuard::new(),
            config,
        }
    }

    #[must_use]
    pub fn scope(&self) -> &Scope {
        self.brokers.scope()
    }

    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Whether a catalog fetch for the broker is currently in flight
    #[must_use]
    pub fn is_sync_in_progress(&self, broker_name: &str) -> bool {
        self.sync_guard.is_in_progress(&resource_name(broker_name))
    }

    /// Credential secret of the registration with external id `id`.
    ///
    /// Namespaced brokers can only reference secrets in their own namespace.
    fn credential_secret_ref(&self, id: &str) -> CredentialSecretRef {
        let namespace = match self.brokers.scope() {
            Scope::Cluster => &self.config.secret_namespace,
            Scope::Namespace(namespace) => namespace,
        };
        CredentialSecretRef {
            namespace: namespace.clone(),
            name: id.to_string(),
        }
    }
}

fn to_registration(resource: BrokerResource) -> BrokerRegistration {
    BrokerRegistration {
        guid: resource.uid,
        name: resource.name,
        broker_url: resource.url,
    }
}

#[async_trait]
impl BrokerPlatformClient for PlatformAdapter {
    fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities {
            catalog_fetch: true,
            visibility: false,
        }
    }

    async fn get_brokers(&self) -> Result<Vec<BrokerRegistration>> {
        let brokers = self.brokers.list_brokers().await?;
        Ok(brokers.into_iter().map(to_registration).collect())
    }

    #[instrument(skip(self))]
    async fn get_broker_by_name(&self, name: &str) -> Result<BrokerRegistration> {
        self.brokers
            .get_broker_by_name(name)
            .await
            .map(to_registration)
    }

    #[instrument(skip(self, request), fields(broker = %request.name, id = %request.id))]
    async fn create_broker(
        &self,
        request: &CreateServiceBrokerRequest,
    ) -> Result<BrokerRegistration> {
        let secret = self.credential_secret_ref(&request.id);
        self.secrets
            .ensure_credential_secret(&secret, &request.credentials)
            .await?;

        let created = self
            .brokers
            .create_broker(&request.name, &request.broker_url, &secret)
            .await?;

        Ok(to_registration(created))
    }

    #[instrument(skip(self, request), fields(broker = %request.name, guid = %request.guid))]
    async fn update_broker(
        &self,
        request: &UpdateServiceBrokerRequest,
    ) -> Result<BrokerRegistration> {
        let secret_ref = self.credential_secret_ref(&request.id);
        let secret_result = self
            .secrets
            .ensure_credential_secret(&secret_ref, &request.credentials)
            .await;

        let broker_result = self
            .brokers
            .update_broker(&request.name, &request.broker_url, &secret_ref)
            .await;

        match (secret_result, broker_result) {
            (Ok(()), Ok(updated)) => Ok(to_registration(updated)),
            (Ok(()), Err(broker_err)) => {
                warn!(error = %broker_err, "Credentials updated but broker update failed");
                Err(AdapterError::InconsistentState {
                    broker: request.name.clone(),
                    written: "credentials",
                    failed: "broker",
                    source: Box::new(broker_err),
                })
            }
            (Err(secret_err), Ok(updated)) => {
                warn!(
                    error = %secret_err,
                    broker = %updated.name,
                    "Broker updated but its credentials were not"
                );
                Err(AdapterError::InconsistentState {
                    broker: request.name.clone(),
                    written: "broker",
                    failed: "credentials",
                    source: Box::new(secret_err),
                })
            }
            (Err(secret_err), Err(broker_err)) => {
                warn!(error = %broker_err, "Broker update failed after credential update failed");
                Err(secret_err)
            }
        }
    }

    #[instrument(skip(self, request), fields(broker = %request.name, guid = %request.guid))]
    async fn delete_broker(&self, request: &DeleteServiceBrokerRequest) -> Result<()> {
        // The credential secret stays in place for re-registration under the same id
        self.brokers.delete_broker(&request.name).await
    }

    #[instrument(skip(self, request), fields(broker = %request.name))]
    async fn fetch_catalog(&self, request: &UpdateServiceBrokerRequest) -> Result<()> {
        let name = resource_name(&request.name);

        let Some(_permit) = self.sync_guard.try_acquire(&name) else {
            metrics::increment_catalog_relists_coalesced();
            debug!(broker = %name, "Catalog fetch already in progress, skipping relist");
            return Ok(());
        };

        self.brokers.relist_broker(&name).await?;
        info!(broker = %name, "Catalog fetch completed");
        Ok(())
    }

    async fn get_visibilities_by_brokers(&self, _broker_names: &[String]) -> Result<Vec<Visibility>> {
        Ok(Vec::new())
    }

    async fn enable_access_for_plan(&self, _request: &ModifyPlanAccessRequest) -> Result<()> {
        Err(AdapterError::Unsupported("enabling plan access"))
    }

    async fn disable_access_for_plan(&self, _request: &ModifyPlanAccessRequest) -> Result<()> {
        Err(AdapterError::Unsupported("disabling plan access"))
    }
}
