//! # Broker Proxy for Kubernetes
//!
//! Registers Open Service Broker API brokers with the Kubernetes Service
//! Catalog on behalf of an external reconciliation loop.
//!
//! The loop talks to [`platform::BrokerPlatformClient`]. [`platform::PlatformAdapter`]
//! implements it by:
//!
//! 1. **Selecting a scope** - `ClusterServiceBroker` when no target namespace is
//!    configured, `ServiceBroker` in the target namespace otherwise
//! 2. **Managing credentials** - basic-auth credentials live in a secret named
//!    after the broker's external id, written before the broker itself
//! 3. **Deduplicating catalog fetches** - at most one relist per broker is in
//!    flight; concurrent fetches for the same broker return immediately
//!
//! Retries and backoff are left to the reconciliation loop.

pub mod config;
pub mod constants;
pub mod crd;
pub mod error;
pub mod kube_api;
pub mod observability;
pub mod platform;

pub use config::AdapterConfig;
pub use error::{AdapterError, Result};
pub use platform::{BrokerPlatformClient, PlatformAdapter, Scope};
