//! # Broker Platform
//!
//! Scope-aware broker registration on Kubernetes.
//!
//! ## Module Structure
//!
//! - `scope.rs` - Cluster vs. namespace scope selection
//! - `api.rs` - Raw resource verbs the adapter is built on
//! - `broker_client.rs` - Broker CRUD and relist in the selected scope
//! - `credentials.rs` - Credential secret create-or-update
//! - `sync_guard.rs` - Per-broker catalog fetch deduplication
//! - `adapter.rs` - [`PlatformAdapter`], the registry contract implementation
//! - `types.rs` - Platform-agnostic registration types

pub mod adapter;
pub mod api;
pub mod broker_client;
pub mod credentials;
pub mod scope;
pub mod sync_guard;
pub mod types;

pub use adapter::PlatformAdapter;
pub use api::{BrokerApi, SecretApi};
pub use broker_client::{resource_name, BrokerResource, BrokerResourceClient};
pub use credentials::{CredentialSecretManager, CredentialSecretRef};
pub use scope::Scope;
pub use sync_guard::{SyncGuard, SyncPermit};
pub use types::{
    BasicCredentials, BrokerRegistration, CreateServiceBrokerRequest, DeleteServiceBrokerRequest,
    ModifyPlanAccessRequest, PlatformCapabilities, UpdateServiceBrokerRequest, Visibility,
};

use crate::error::Result;
use async_trait::async_trait;

/// Broker registry contract consumed by the reconciliation loop
///
/// Implementations report what they support through [`BrokerPlatformClient::capabilities`];
/// callers check it instead of probing.
#[async_trait]
pub trait BrokerPlatformClient: Send + Sync {
    fn capabilities(&self) -> PlatformCapabilities;

    /// Registered brokers; empty (never an error) when none exist
    async fn get_brokers(&self) -> Result<Vec<BrokerRegistration>>;

    async fn get_broker_by_name(&self, name: &str) -> Result<BrokerRegistration>;

    async fn create_broker(&self, request: &CreateServiceBrokerRequest)
        -> Result<BrokerRegistration>;

    /// Only the url and credentials change; uid and name are kept
    async fn update_broker(&self, request: &UpdateServiceBrokerRequest)
        -> Result<BrokerRegistration>;

    /// Idempotent: deleting an absent broker succeeds
    async fn delete_broker(&self, request: &DeleteServiceBrokerRequest) -> Result<()>;

    /// Refresh the broker's catalog.
    ///
    /// Returns `Ok(())` without contacting the cluster when a fetch for the
    /// same broker is already in flight.
    async fn fetch_catalog(&self, request: &UpdateServiceBrokerRequest) -> Result<()>;

    async fn get_visibilities_by_brokers(&self, broker_names: &[String])
        -> Result<Vec<Visibility>>;

    async fn enable_access_for_plan(&self, request: &ModifyPlanAccessRequest) -> Result<()>;

    async fn disable_access_for_plan(&self, request: &ModifyPlanAccessRequest) -> Result<()>;
}
