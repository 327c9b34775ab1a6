//! # Adapter Configuration
//!
//! Adapter-level settings loaded from environment variables.

use crate::constants::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SECRET_NAMESPACE, ENV_METRICS_ENABLED,
    ENV_POD_NAMESPACE, ENV_REQUEST_TIMEOUT_SECS, ENV_SECRET_NAMESPACE, ENV_TARGET_NAMESPACE,
};
use crate::error::{AdapterError, Result};
use crate::platform::scope::Scope;
use regex::Regex;
use std::time::Duration;

/// Adapter configuration
///
/// All settings have defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Namespace brokers are registered in.
    /// Empty selects cluster-scoped brokers.
    pub target_namespace: String,
    /// Namespace holding credential secrets of cluster-scoped brokers
    pub secret_namespace: String,
    /// Timeout applied to every request against the API server
    pub request_timeout: Duration,
    /// Register the prometheus registry and report it on shutdown.
    /// Operation counters are process-global and are updated either way.
    pub metrics_enabled: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            target_namespace: String::new(),
            secret_namespace: DEFAULT_SECRET_NAMESPACE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            metrics_enabled: true,
        }
    }
}

impl AdapterConfig {
    /// Load configuration from environment variables with defaults
    ///
    /// Values are not validated here; call [`AdapterConfig::validate`].
    pub fn from_env() -> Self {
        let secret_namespace = std::env::var(ENV_SECRET_NAMESPACE)
            .or_else(|_| std::env::var(ENV_POD_NAMESPACE))
            .unwrap_or_else(|_| DEFAULT_SECRET_NAMESPACE.to_string());

        Self {
            target_namespace: env_var_or_default_str(ENV_TARGET_NAMESPACE, "")
                .trim()
                .to_string(),
            secret_namespace: secret_namespace.trim().to_string(),
            request_timeout: Duration::from_secs(env_var_or_default(
                ENV_REQUEST_TIMEOUT_SECS,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            metrics_enabled: env_var_or_default_bool(ENV_METRICS_ENABLED, true),
        }
    }

    /// Scope brokers are registered in
    #[must_use]
    pub fn scope(&self) -> Scope {
        Scope::select(&self.target_namespace)
    }

    /// Reject configurations the adapter cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.target_namespace.is_empty() {
            validate_namespace(&self.target_namespace, "target namespace")?;
        }
        validate_namespace(&self.secret_namespace, "secret namespace")?;

        if self.request_timeout.is_zero() {
            return Err(AdapterError::Configuration(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validate a Kubernetes namespace (RFC 1123 label)
/// Format: lowercase alphanumeric, hyphens
/// Length: 1-63 characters
/// Cannot start or end with hyphen
fn validate_namespace(namespace: &str, field_name: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(AdapterError::Configuration(format!(
            "{field_name} cannot be empty"
        )));
    }

    if namespace.len() > 63 {
        return Err(AdapterError::Configuration(format!(
            "{field_name} '{namespace}' exceeds maximum length of 63 characters (got {})",
            namespace.len()
        )));
    }

    // RFC 1123 label: [a-z0-9]([-a-z0-9]*[a-z0-9])?
    let namespace_regex = Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$")
        .map_err(|e| AdapterError::Configuration(format!("failed to compile regex: {e}")))?;

    if !namespace_regex.is_match(namespace) {
        return Err(AdapterError::Configuration(format!(
            "{field_name} '{namespace}' must be a valid Kubernetes namespace (lowercase alphanumeric, hyphens; cannot start/end with hyphen)"
        )));
    }

    Ok(())
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as boolean or return default
fn env_var_or_default_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| {
            let v_lower = v.trim().to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
        })
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
