//! # Broker Authentication
//!
//! Basic-auth secret references carried by broker resources.

use serde::{Deserialize, Serialize};

/// Authentication of a cluster-scoped broker
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterServiceBrokerAuthInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<ClusterBasicAuthConfig>,
}

/// Basic-auth configuration of a cluster-scoped broker
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBasicAuthConfig {
    /// Secret holding `username` and `password`.
    /// Cluster-scoped brokers may reference a secret in any namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<ObjectReference>,
}

/// Authentication of a namespaced broker
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBrokerAuthInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<BasicAuthConfig>,
}

/// Basic-auth configuration of a namespaced broker
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BasicAuthConfig {
    /// Secret in the broker's own namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<LocalObjectReference>,
}

/// Reference to a namespaced object
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ObjectReference {
    pub namespace: String,
    pub name: String,
}

/// Reference to an object in the referencing resource's namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct LocalObjectReference {
    pub name: String,
}

impl ClusterServiceBrokerAuthInfo {
    /// Basic auth backed by the secret `namespace/name`
    #[must_use]
    pub fn basic_secret(namespace: &str, name: &str) -> Self {
        Self {
            basic: Some(ClusterBasicAuthConfig {
                secret_ref: Some(ObjectReference {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                }),
            }),
        }
    }
}

impl ServiceBrokerAuthInfo {
    /// Basic auth backed by the secret `name` in the broker's namespace
    #[must_use]
    pub fn basic_secret(name: &str) -> Self {
        Self {
            basic: Some(BasicAuthConfig {
                secret_ref: Some(LocalObjectReference {
                    name: name.to_string(),
                }),
            }),
        }
    }
}
