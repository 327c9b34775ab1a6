//! # Broker Resource Client
//!
//! Create/get/list/update/delete of broker resources in the configured scope.
//!
//! Every operation switches on [`Scope`] in exactly one place and then uses
//! either the cluster-scoped (`ClusterServiceBroker`) or the namespaced
//! (`ServiceBroker`) verbs. Semantics are identical across both.
//!
//! Names are canonicalized with [`resource_name`] before any call so that a
//! registration name always resolves to the same resource.

use crate::constants::{MANAGED_BY_LABEL, MANAGED_BY_VALUE, RELIST_BEHAVIOR_MANUAL};
use crate::crd::{
    ClusterServiceBroker, ClusterServiceBrokerAuthInfo, ClusterServiceBrokerSpec,
    CommonServiceBrokerSpec, ServiceBroker, ServiceBrokerAuthInfo, ServiceBrokerSpec,
};
use crate::error::{api_status_code, AdapterError, Result};
use crate::observability::metrics;
use crate::platform::api::BrokerApi;
use crate::platform::credentials::CredentialSecretRef;
use crate::platform::scope::Scope;
use kube::core::ObjectMeta;
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Canonical resource name of a broker registration name.
///
/// Lower-cases the name and replaces every `_` with `-`. Idempotent.
#[must_use]
pub fn resource_name(registration_name: &str) -> String {
    registration_name.to_lowercase().replace('_', "-")
}

/// Scope-independent view of a broker resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerResource {
    pub name: String,
    pub uid: String,
    pub url: String,
    pub relist_requests: i64,
}

impl From<ClusterServiceBroker> for BrokerResource {
    fn from(broker: ClusterServiceBroker) -> Self {
        Self {
            name: broker.name_any(),
            uid: broker.uid().unwrap_or_default(),
            url: broker.spec.common.url,
            relist_requests: broker.spec.common.relist_requests,
        }
    }
}

impl From<ServiceBroker> for BrokerResource {
    fn from(broker: ServiceBroker) -> Self {
        Self {
            name: broker.name_any(),
            uid: broker.uid().unwrap_or_default(),
            url: broker.spec.common.url,
            relist_requests: broker.spec.common.relist_requests,
        }
    }
}

/// Broker CRUD against the resource kind selected by the scope
#[derive(Clone)]
pub struct BrokerResourceClient {
    scope: Scope,
    api: Arc<dyn BrokerApi>,
}

impl std::fmt::Debug for BrokerResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerResourceClient")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl BrokerResourceClient {
    pub fn new(scope: Scope, api: Arc<dyn BrokerApi>) -> Self {
        Self { scope, api }
    }

    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Create a broker named after `registration_name`, authenticated with `secret`
    pub async fn create_broker(
        &self,
        registration_name: &str,
        url: &str,
        secret: &CredentialSecretRef,
    ) -> Result<BrokerResource> {
        let name = resource_name(registration_name);
        let common = CommonServiceBrokerSpec {
            url: url.to_string(),
            relist_behavior: Some(RELIST_BEHAVIOR_MANUAL.to_string()),
            relist_requests: 0,
        };

        let start = Instant::now();
        let result = match &self.scope {
            Scope::Cluster => {
                let broker = ClusterServiceBroker {
                    metadata: managed_metadata(&name, None),
                    spec: ClusterServiceBrokerSpec {
                        common,
                        auth_info: Some(ClusterServiceBrokerAuthInfo::basic_secret(
                            &secret.namespace,
                            &secret.name,
                        )),
                    },
                };
                self.api
                    .create_cluster_broker(&broker)
                    .await
                    .map(BrokerResource::from)
            }
            Scope::Namespace(namespace) => {
                let broker = ServiceBroker {
                    metadata: managed_metadata(&name, Some(namespace)),
                    spec: ServiceBrokerSpec {
                        common,
                        auth_info: Some(ServiceBrokerAuthInfo::basic_secret(&secret.name)),
                    },
                };
                self.api
                    .create_broker(namespace, &broker)
                    .await
                    .map(BrokerResource::from)
            }
        };
        record("create_broker", start, result.is_ok());

        let created = result.map_err(|e| self.error("create", &name, e))?;
        info!(broker = %created.name, uid = %created.uid, scope = %self.scope, "Created broker");
        Ok(created)
    }

    pub async fn get_broker_by_name(&self, registration_name: &str) -> Result<BrokerResource> {
        let name = resource_name(registration_name);

        let start = Instant::now();
        let result = match &self.scope {
            Scope::Cluster => self
                .api
                .get_cluster_broker(&name)
                .await
                .map(BrokerResource::from),
            Scope::Namespace(namespace) => self
                .api
                .get_broker(namespace, &name)
                .await
                .map(BrokerResource::from),
        };
        record("get_broker", start, result.is_ok());

        result.map_err(|e| self.error("get", &name, e))
    }

    /// All brokers of the configured scope, in the order the API server returned them
    pub async fn list_brokers(&self) -> Result<Vec<BrokerResource>> {
        let start = Instant::now();
        let result = match &self.scope {
            Scope::Cluster => self.api.list_cluster_brokers().await.map(|brokers| {
                brokers.into_iter().map(BrokerResource::from).collect::<Vec<_>>()
            }),
            Scope::Namespace(namespace) => self.api.list_brokers(namespace).await.map(|brokers| {
                brokers.into_iter().map(BrokerResource::from).collect::<Vec<_>>()
            }),
        };
        record("list_brokers", start, result.is_ok());

        let brokers = result.map_err(|e| {
            let target = match &self.scope {
                Scope::Cluster => "cluster-scoped brokers".to_string(),
                Scope::Namespace(namespace) => format!("brokers in namespace {namespace}"),
            };
            AdapterError::upstream("list", target, e)
        })?;
        debug!(count = brokers.len(), scope = %self.scope, "Listed brokers");
        Ok(brokers)
    }

    /// Point an existing broker at a new url and credential secret.
    ///
    /// The resource is read first so that its uid and name are carried over
    /// unchanged; only the url and the secret reference are rewritten.
    pub async fn update_broker(
        &self,
        registration_name: &str,
        url: &str,
        secret: &CredentialSecretRef,
    ) -> Result<BrokerResource> {
        let name = resource_name(registration_name);

        let start = Instant::now();
        let result = match &self.scope {
            Scope::Cluster => match self.api.get_cluster_broker(&name).await {
                Ok(mut broker) => {
                    url.clone_into(&mut broker.spec.common.url);
                    broker.spec.auth_info = Some(ClusterServiceBrokerAuthInfo::basic_secret(
                        &secret.namespace,
                        &secret.name,
                    ));
                    self.api
                        .update_cluster_broker(&broker)
                        .await
                        .map(BrokerResource::from)
                }
                Err(e) => Err(e),
            },
            Scope::Namespace(namespace) => match self.api.get_broker(namespace, &name).await {
                Ok(mut broker) => {
                    url.clone_into(&mut broker.spec.common.url);
                    broker.spec.auth_info =
                        Some(ServiceBrokerAuthInfo::basic_secret(&secret.name));
                    self.api
                        .update_broker(namespace, &broker)
                        .await
                        .map(BrokerResource::from)
                }
                Err(e) => Err(e),
            },
        };
        record("update_broker", start, result.is_ok());

        let updated = result.map_err(|e| self.error("update", &name, e))?;
        info!(broker = %updated.name, uid = %updated.uid, scope = %self.scope, "Updated broker");
        Ok(updated)
    }

    /// Delete a broker. A broker that is already gone is not an error.
    pub async fn delete_broker(&self, registration_name: &str) -> Result<()> {
        let name = resource_name(registration_name);

        let start = Instant::now();
        let result = match &self.scope {
            Scope::Cluster => self.api.delete_cluster_broker(&name).await,
            Scope::Namespace(namespace) => self.api.delete_broker(namespace, &name).await,
        };

        match result {
            Ok(()) => {
                record("delete_broker", start, true);
                info!(broker = %name, scope = %self.scope, "Deleted broker");
                Ok(())
            }
            Err(e) if api_status_code(&e) == Some(404) => {
                record("delete_broker", start, true);
                debug!(broker = %name, scope = %self.scope, "Broker already absent, nothing to delete");
                Ok(())
            }
            Err(e) => {
                record("delete_broker", start, false);
                Err(self.error("delete", &name, e))
            }
        }
    }

    /// Ask the catalog controller to relist the broker by bumping `relistRequests`
    pub async fn relist_broker(&self, registration_name: &str) -> Result<BrokerResource> {
        let name = resource_name(registration_name);

        let start = Instant::now();
        let result = match &self.scope {
            Scope::Cluster => match self.api.get_cluster_broker(&name).await {
                Ok(mut broker) => {
                    broker.spec.common.relist_requests += 1;
                    self.api
                        .update_cluster_broker(&broker)
                        .await
                        .map(BrokerResource::from)
                }
                Err(e) => Err(e),
            },
            Scope::Namespace(namespace) => match self.api.get_broker(namespace, &name).await {
                Ok(mut broker) => {
                    broker.spec.common.relist_requests += 1;
                    self.api
                        .update_broker(namespace, &broker)
                        .await
                        .map(BrokerResource::from)
                }
                Err(e) => Err(e),
            },
        };
        record("relist_broker", start, result.is_ok());

        let relisted = result.map_err(|e| self.error("relist", &name, e))?;
        metrics::increment_catalog_relists();
        info!(
            broker = %relisted.name,
            relist_requests = relisted.relist_requests,
            scope = %self.scope,
            "Requested catalog relist"
        );
        Ok(relisted)
    }

    fn error(&self, operation: &'static str, name: &str, source: kube::Error) -> AdapterError {
        let target = match &self.scope {
            Scope::Cluster => format!("cluster-scoped broker {name}"),
            Scope::Namespace(namespace) => format!("broker {namespace}/{name}"),
        };
        AdapterError::upstream(operation, target, source)
    }
}

fn managed_metadata(name: &str, namespace: Option<&str>) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: namespace.map(str::to_string),
        labels: Some(BTreeMap::from([(
            MANAGED_BY_LABEL.to_string(),
            MANAGED_BY_VALUE.to_string(),
        )])),
        ..ObjectMeta::default()
    }
}

fn record(operation: &str, start: Instant, succeeded: bool) {
    metrics::record_broker_operation(operation, succeeded, start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name_lowercases_and_replaces_underscores() {
        assert_eq!(resource_name("My_Fake_Broker"), "my-fake-broker");
        assert_eq!(resource_name("fake-broker"), "fake-broker");
        assert_eq!(resource_name("UPPER"), "upper");
        assert_eq!(resource_name(""), "");
    }

    #[test]
    fn test_resource_name_is_idempotent() {
        for name in ["My_Broker", "a__b", "already-canonical", "MiXeD_CaSe_123", "_edge_"] {
            let once = resource_name(name);
            assert_eq!(resource_name(&once), once, "not idempotent for '{name}'");
            assert!(!once.contains('_'));
        }
    }

    #[test]
    fn test_broker_resource_from_cluster_broker() {
        let mut broker = ClusterServiceBroker::new(
            "fake-broker",
            ClusterServiceBrokerSpec {
                common: CommonServiceBrokerSpec {
                    url: "http://fake.broker.url".to_string(),
                    relist_behavior: None,
                    relist_requests: 4,
                },
                auth_info: None,
            },
        );
        broker.metadata.uid = Some("1234".to_string());

        let resource = BrokerResource::from(broker);
        assert_eq!(resource.name, "fake-broker");
        assert_eq!(resource.uid, "1234");
        assert_eq!(resource.url, "http://fake.broker.url");
        assert_eq!(resource.relist_requests, 4);
    }
}
