//! # Registry Types
//!
//! Platform-agnostic broker representations exchanged with the
//! reconciliation loop.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A registered broker as seen by the reconciliation loop
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerRegistration {
    /// Cluster-assigned uid of the broker resource
    pub guid: String,
    pub name: String,
    #[serde(rename = "brokerURL")]
    pub broker_url: String,
}

/// Basic-auth credentials of a broker
///
/// Wiped from memory on drop. `Debug` never prints the values.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateServiceBrokerRequest {
    /// External id, also the name of the credential secret
    pub id: String,
    pub name: String,
    pub broker_url: String,
    pub credentials: BasicCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateServiceBrokerRequest {
    /// Cluster uid of the existing broker
    pub guid: String,
    /// External id, also the name of the credential secret
    pub id: String,
    pub name: String,
    pub broker_url: String,
    pub credentials: BasicCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteServiceBrokerRequest {
    pub guid: String,
    pub name: String,
}

/// Operations the platform supports besides broker CRUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCapabilities {
    /// Catalog refresh through `fetch_catalog`
    pub catalog_fetch: bool,
    /// Service/plan visibility management
    pub visibility: bool,
}

/// Plan visibility on the platform
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Visibility {
    pub public: bool,
    pub catalog_plan_id: String,
    pub platform_broker_name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, Vec<String>>,
}

/// Request to enable or disable access to a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyPlanAccessRequest {
    pub broker_name: String,
    pub catalog_plan_id: String,
    pub labels: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = BasicCredentials::new("admin", "s3cret");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_registration_json_field_names() {
        let registration = BrokerRegistration {
            guid: "1234".to_string(),
            name: "fake-broker".to_string(),
            broker_url: "http://fake.broker.url".to_string(),
        };
        let json = serde_json::to_value(&registration).unwrap();
        assert_eq!(json["guid"], "1234");
        assert_eq!(json["brokerURL"], "http://fake.broker.url");
    }
}
