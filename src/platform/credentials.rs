//! # Credential Secret Manager
//!
//! Creates or updates the secret carrying a broker's basic-auth credentials.
//!
//! The secret is named after the registration's external id and holds exactly
//! two data entries, `username` and `password`. Secrets are never deleted by
//! the adapter; a broker registered again under the same id reuses its secret.

use crate::constants::{
    MANAGED_BY_LABEL, MANAGED_BY_VALUE, SECRET_PASSWORD_KEY, SECRET_USERNAME_KEY,
};
use crate::error::{api_status_code, AdapterError, Result};
use crate::observability::metrics;
use crate::platform::api::SecretApi;
use crate::platform::types::BasicCredentials;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::core::ObjectMeta;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Location of a credential secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSecretRef {
    pub namespace: String,
    pub name: String,
}

#[derive(Clone)]
pub struct CredentialSecretManager {
    api: Arc<dyn SecretApi>,
}

impl std::fmt::Debug for CredentialSecretManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSecretManager").finish_non_exhaustive()
    }
}

impl CredentialSecretManager {
    pub fn new(api: Arc<dyn SecretApi>) -> Self {
        Self { api }
    }

    /// Create the secret at `secret_ref`, or overwrite its credentials if it exists.
    ///
    /// Data keys other than `username` and `password` on an existing secret are kept.
    pub async fn ensure_credential_secret(
        &self,
        secret_ref: &CredentialSecretRef,
        credentials: &BasicCredentials,
    ) -> Result<()> {
        let CredentialSecretRef {
            namespace,
            name: id,
        } = secret_ref;

        let secret = Secret {
            metadata: ObjectMeta {
                name: Some(id.clone()),
                namespace: Some(namespace.clone()),
                labels: Some(BTreeMap::from([(
                    MANAGED_BY_LABEL.to_string(),
                    MANAGED_BY_VALUE.to_string(),
                )])),
                ..ObjectMeta::default()
            },
            data: Some(credential_data(credentials)),
            ..Secret::default()
        };

        let start = Instant::now();
        match self.api.create_secret(namespace, &secret).await {
            Ok(_) => {
                record("create_secret", start, true);
                info!(secret = %id, namespace = %namespace, "Created credential secret");
                return Ok(());
            }
            Err(e) if api_status_code(&e) == Some(409) => {
                record("create_secret", start, true);
                debug!(secret = %id, namespace = %namespace, "Credential secret exists, updating");
            }
            Err(e) => {
                record("create_secret", start, false);
                return Err(secret_error("create", namespace, id, e));
            }
        }

        self.update_credential_secret(namespace, id, credentials)
            .await
    }

    async fn update_credential_secret(
        &self,
        namespace: &str,
        id: &str,
        credentials: &BasicCredentials,
    ) -> Result<()> {
        let start = Instant::now();
        let mut existing = match self.api.get_secret(namespace, id).await {
            Ok(secret) => secret,
            Err(e) => {
                record("update_secret", start, false);
                return Err(secret_error("get", namespace, id, e));
            }
        };

        existing
            .data
            .get_or_insert_with(BTreeMap::new)
            .extend(credential_data(credentials));

        let result = self.api.replace_secret(namespace, &existing).await;
        record("update_secret", start, result.is_ok());
        result.map_err(|e| secret_error("update", namespace, id, e))?;

        info!(secret = %id, namespace = %namespace, "Updated credential secret");
        Ok(())
    }
}

fn credential_data(credentials: &BasicCredentials) -> BTreeMap<String, ByteString> {
    BTreeMap::from([
        (
            SECRET_USERNAME_KEY.to_string(),
            ByteString(credentials.username.as_bytes().to_vec()),
        ),
        (
            SECRET_PASSWORD_KEY.to_string(),
            ByteString(credentials.password.as_bytes().to_vec()),
        ),
    ])
}

fn secret_error(
    operation: &'static str,
    namespace: &str,
    name: &str,
    source: kube::Error,
) -> AdapterError {
    AdapterError::upstream(operation, format!("secret {namespace}/{name}"), source)
}

fn record(operation: &str, start: Instant, succeeded: bool) {
    metrics::record_broker_operation(operation, succeeded, start.elapsed().as_secs_f64());
}
