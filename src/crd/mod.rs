//! # Custom Resource Definitions
//!
//! Service Catalog resource types the adapter reads and writes.
//!
//! ## Module Structure
//!
//! - `broker.rs` - `ClusterServiceBroker` and `ServiceBroker`
//! - `auth.rs` - Basic-auth secret references

mod auth;
mod broker;

// Re-export all public types
pub use auth::{
    BasicAuthConfig, ClusterBasicAuthConfig, ClusterServiceBrokerAuthInfo, LocalObjectReference,
    ObjectReference, ServiceBrokerAuthInfo,
};
pub use broker::{
    ClusterServiceBroker, ClusterServiceBrokerSpec, CommonServiceBrokerSpec, ServiceBroker,
    ServiceBrokerSpec,
};
