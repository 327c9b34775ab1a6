//! # Service Catalog Brokers
//!
//! `ClusterServiceBroker` and `ServiceBroker` resources of the Kubernetes
//! Service Catalog (`servicecatalog.k8s.io/v1beta1`).
//!
//! Both kinds share the same broker fields and differ only in scope and in
//! how their basic-auth secret is referenced.
//!
//! # Example
//!
//! ```yaml
//! apiVersion: servicecatalog.k8s.io/v1beta1
//! kind: ClusterServiceBroker
//! metadata:
//!   name: my-broker
//! spec:
//!   url: https://my-broker.example.com
//!   relistBehavior: Manual
//!   relistRequests: 3
//!   authInfo:
//!     basic:
//!       secretRef:
//!         namespace: kube-system
//!         name: 0c5a4e2c-my-broker-id
//! ```

use crate::crd::auth::{ClusterServiceBrokerAuthInfo, ServiceBrokerAuthInfo};
use serde::{Deserialize, Serialize};

/// Fields common to cluster-scoped and namespaced brokers
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommonServiceBrokerSpec {
    /// Broker endpoint (Open Service Broker API)
    pub url: String,
    /// `Duration` or `Manual`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relist_behavior: Option<String>,
    /// Incremented to ask the catalog controller for a relist
    #[serde(default)]
    pub relist_requests: i64,
}

/// Cluster-wide broker registration
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ClusterServiceBroker",
    group = "servicecatalog.k8s.io",
    version = "v1beta1",
    shortname = "csb"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterServiceBrokerSpec {
    #[serde(flatten)]
    pub common: CommonServiceBrokerSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_info: Option<ClusterServiceBrokerAuthInfo>,
}

/// Broker registration visible in a single namespace
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ServiceBroker",
    group = "servicecatalog.k8s.io",
    version = "v1beta1",
    namespaced,
    shortname = "sb"
)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBrokerSpec {
    #[serde(flatten)]
    pub common: CommonServiceBrokerSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_info: Option<ServiceBrokerAuthInfo>,
}
