//! Common test utilities for adapter integration tests
//!
//! In-memory stand-ins for the cluster API. Every verb call is recorded so
//! tests can assert which resource kind and namespace an operation touched.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use async_trait::async_trait;
use broker_proxy::crd::{ClusterServiceBroker, ServiceBroker};
use broker_proxy::platform::{BrokerApi, SecretApi};
use broker_proxy::{AdapterConfig, PlatformAdapter};
use k8s_openapi::api::core::v1::Secret;
use kube::core::ErrorResponse;
use kube::ResourceExt;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// One recorded verb call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub verb: &'static str,
    pub namespace: Option<String>,
    pub name: String,
}

/// API server error response with the given status code
pub fn api_error(code: u16) -> kube::Error {
    let reason = match code {
        404 => "NotFound",
        409 => "AlreadyExists",
        403 => "Forbidden",
        _ => "InternalError",
    };
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("injected {reason}"),
        reason: reason.to_string(),
        code,
    })
}

/// Holds broker updates until released
#[derive(Debug, Default)]
pub struct Gate {
    /// Notified when an update reaches the gate
    pub entered: Notify,
    /// Notify to let the held update through
    pub release: Notify,
}

#[derive(Default)]
struct BrokerState {
    cluster: BTreeMap<String, ClusterServiceBroker>,
    namespaced: BTreeMap<(String, String), ServiceBroker>,
    calls: Vec<Call>,
    failures: HashMap<&'static str, u16>,
    next_uid: u32,
    update_response_suffix: Option<String>,
}

/// In-memory broker API
#[derive(Default)]
pub struct FakeBrokerApi {
    state: Mutex<BrokerState>,
    gate: Mutex<Option<Arc<Gate>>>,
}

impl FakeBrokerApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, verb: &str) -> usize {
        self.calls().iter().filter(|call| call.verb == verb).count()
    }

    /// Make every call of `verb` fail with `code`
    pub fn fail(&self, verb: &'static str, code: u16) {
        self.state.lock().unwrap().failures.insert(verb, code);
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    /// Hold every update until the gate is released
    pub fn set_gate(&self, gate: Arc<Gate>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub fn clear_gate(&self) {
        *self.gate.lock().unwrap() = None;
    }

    /// Have the server answer updates with the name plus `suffix`
    pub fn set_update_response_suffix(&self, suffix: &str) {
        self.state.lock().unwrap().update_response_suffix = Some(suffix.to_string());
    }

    pub fn insert_cluster_broker(&self, mut broker: ClusterServiceBroker) {
        let mut state = self.state.lock().unwrap();
        if broker.metadata.uid.is_none() {
            state.next_uid += 1;
            broker.metadata.uid = Some(format!("uid-{}", state.next_uid));
        }
        state.cluster.insert(broker.name_any(), broker);
    }

    pub fn insert_broker(&self, namespace: &str, mut broker: ServiceBroker) {
        let mut state = self.state.lock().unwrap();
        if broker.metadata.uid.is_none() {
            state.next_uid += 1;
            broker.metadata.uid = Some(format!("uid-{}", state.next_uid));
        }
        broker.metadata.namespace = Some(namespace.to_string());
        state
            .namespaced
            .insert((namespace.to_string(), broker.name_any()), broker);
    }

    pub fn cluster_broker(&self, name: &str) -> Option<ClusterServiceBroker> {
        self.state.lock().unwrap().cluster.get(name).cloned()
    }

    pub fn broker(&self, namespace: &str, name: &str) -> Option<ServiceBroker> {
        self.state
            .lock()
            .unwrap()
            .namespaced
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Record the call and return the injected failure for `verb`, if any
    fn enter(&self, verb: &'static str, namespace: Option<&str>, name: &str) -> Result<(), kube::Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            verb,
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
        });
        match state.failures.get(verb) {
            Some(code) => Err(api_error(*code)),
            None => Ok(()),
        }
    }

    async fn wait_at_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }
}

#[async_trait]
impl BrokerApi for FakeBrokerApi {
    async fn create_cluster_broker(
        &self,
        broker: &ClusterServiceBroker,
    ) -> Result<ClusterServiceBroker, kube::Error> {
        let name = broker.name_any();
        self.enter("create_cluster_broker", None, &name)?;
        let mut state = self.state.lock().unwrap();
        if state.cluster.contains_key(&name) {
            return Err(api_error(409));
        }
        state.next_uid += 1;
        let mut created = broker.clone();
        created.metadata.uid = Some(format!("uid-{}", state.next_uid));
        state.cluster.insert(name, created.clone());
        Ok(created)
    }

    async fn get_cluster_broker(&self, name: &str) -> Result<ClusterServiceBroker, kube::Error> {
        self.enter("get_cluster_broker", None, name)?;
        self.cluster_broker(name).ok_or_else(|| api_error(404))
    }

    async fn list_cluster_brokers(&self) -> Result<Vec<ClusterServiceBroker>, kube::Error> {
        self.enter("list_cluster_brokers", None, "")?;
        Ok(self.state.lock().unwrap().cluster.values().cloned().collect())
    }

    async fn update_cluster_broker(
        &self,
        broker: &ClusterServiceBroker,
    ) -> Result<ClusterServiceBroker, kube::Error> {
        let name = broker.name_any();
        self.enter("update_cluster_broker", None, &name)?;
        self.wait_at_gate().await;
        let mut state = self.state.lock().unwrap();
        if !state.cluster.contains_key(&name) {
            return Err(api_error(404));
        }
        state.cluster.insert(name, broker.clone());
        let mut response = broker.clone();
        if let Some(suffix) = &state.update_response_suffix {
            response.metadata.name = Some(format!("{}{suffix}", broker.name_any()));
        }
        Ok(response)
    }

    async fn delete_cluster_broker(&self, name: &str) -> Result<(), kube::Error> {
        self.enter("delete_cluster_broker", None, name)?;
        match self.state.lock().unwrap().cluster.remove(name) {
            Some(_) => Ok(()),
            None => Err(api_error(404)),
        }
    }

    async fn create_broker(
        &self,
        namespace: &str,
        broker: &ServiceBroker,
    ) -> Result<ServiceBroker, kube::Error> {
        let name = broker.name_any();
        self.enter("create_broker", Some(namespace), &name)?;
        let key = (namespace.to_string(), name);
        let mut state = self.state.lock().unwrap();
        if state.namespaced.contains_key(&key) {
            return Err(api_error(409));
        }
        state.next_uid += 1;
        let mut created = broker.clone();
        created.metadata.uid = Some(format!("uid-{}", state.next_uid));
        state.namespaced.insert(key, created.clone());
        Ok(created)
    }

    async fn get_broker(&self, namespace: &str, name: &str) -> Result<ServiceBroker, kube::Error> {
        self.enter("get_broker", Some(namespace), name)?;
        self.broker(namespace, name).ok_or_else(|| api_error(404))
    }

    async fn list_brokers(&self, namespace: &str) -> Result<Vec<ServiceBroker>, kube::Error> {
        self.enter("list_brokers", Some(namespace), "")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .namespaced
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, broker)| broker.clone())
            .collect())
    }

    async fn update_broker(
        &self,
        namespace: &str,
        broker: &ServiceBroker,
    ) -> Result<ServiceBroker, kube::Error> {
        let name = broker.name_any();
        self.enter("update_broker", Some(namespace), &name)?;
        self.wait_at_gate().await;
        let key = (namespace.to_string(), name);
        let mut state = self.state.lock().unwrap();
        if !state.namespaced.contains_key(&key) {
            return Err(api_error(404));
        }
        state.namespaced.insert(key, broker.clone());
        let mut response = broker.clone();
        if let Some(suffix) = &state.update_response_suffix {
            response.metadata.name = Some(format!("{}{suffix}", broker.name_any()));
        }
        Ok(response)
    }

    async fn delete_broker(&self, namespace: &str, name: &str) -> Result<(), kube::Error> {
        self.enter("delete_broker", Some(namespace), name)?;
        match self
            .state
            .lock()
            .unwrap()
            .namespaced
            .remove(&(namespace.to_string(), name.to_string()))
        {
            Some(_) => Ok(()),
            None => Err(api_error(404)),
        }
    }
}

#[derive(Default)]
struct SecretState {
    secrets: BTreeMap<(String, String), Secret>,
    calls: Vec<Call>,
    failures: HashMap<&'static str, u16>,
}

/// In-memory secret API
#[derive(Default)]
pub struct FakeSecretApi {
    state: Mutex<SecretState>,
}

impl FakeSecretApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fail(&self, verb: &'static str, code: u16) {
        self.state.lock().unwrap().failures.insert(verb, code);
    }

    pub fn insert(&self, namespace: &str, mut secret: Secret) {
        secret.metadata.namespace = Some(namespace.to_string());
        self.state
            .lock()
            .unwrap()
            .secrets
            .insert((namespace.to_string(), secret.name_any()), secret);
    }

    pub fn secret(&self, namespace: &str, name: &str) -> Option<Secret> {
        self.state
            .lock()
            .unwrap()
            .secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Decoded value of `key` in secret `namespace/name`
    pub fn value(&self, namespace: &str, name: &str, key: &str) -> Option<String> {
        let secret = self.secret(namespace, name)?;
        let bytes = secret.data?.get(key)?.0.clone();
        String::from_utf8(bytes).ok()
    }

    fn enter(&self, verb: &'static str, namespace: &str, name: &str) -> Result<(), kube::Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            verb,
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
        });
        match state.failures.get(verb) {
            Some(code) => Err(api_error(*code)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SecretApi for FakeSecretApi {
    async fn create_secret(&self, namespace: &str, secret: &Secret) -> Result<Secret, kube::Error> {
        let name = secret.name_any();
        self.enter("create_secret", namespace, &name)?;
        let key = (namespace.to_string(), name);
        let mut state = self.state.lock().unwrap();
        if state.secrets.contains_key(&key) {
            return Err(api_error(409));
        }
        state.secrets.insert(key, secret.clone());
        Ok(secret.clone())
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, kube::Error> {
        self.enter("get_secret", namespace, name)?;
        self.secret(namespace, name).ok_or_else(|| api_error(404))
    }

    async fn replace_secret(&self, namespace: &str, secret: &Secret) -> Result<Secret, kube::Error> {
        let name = secret.name_any();
        self.enter("replace_secret", namespace, &name)?;
        let key = (namespace.to_string(), name);
        let mut state = self.state.lock().unwrap();
        if !state.secrets.contains_key(&key) {
            return Err(api_error(404));
        }
        state.secrets.insert(key, secret.clone());
        Ok(secret.clone())
    }
}

/// Adapter wired to fresh fakes
pub struct TestAdapter {
    pub adapter: Arc<PlatformAdapter>,
    pub brokers: Arc<FakeBrokerApi>,
    pub secrets: Arc<FakeSecretApi>,
}

pub fn cluster_config() -> AdapterConfig {
    AdapterConfig {
        target_namespace: String::new(),
        secret_namespace: "broker-secrets".to_string(),
        ..AdapterConfig::default()
    }
}

pub fn namespace_config(namespace: &str) -> AdapterConfig {
    AdapterConfig {
        target_namespace: namespace.to_string(),
        secret_namespace: "broker-secrets".to_string(),
        ..AdapterConfig::default()
    }
}

pub fn test_adapter(config: AdapterConfig) -> TestAdapter {
    let brokers = FakeBrokerApi::new();
    let secrets = FakeSecretApi::new();
    let adapter = PlatformAdapter::new(
        config,
        Arc::clone(&brokers) as Arc<dyn BrokerApi>,
        Arc::clone(&secrets) as Arc<dyn SecretApi>,
    )
    .expect("test config is valid");

    TestAdapter {
        adapter: Arc::new(adapter),
        brokers,
        secrets,
    }
}
