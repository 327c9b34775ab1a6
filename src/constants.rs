//! # Constants
//!
//! Shared constants used throughout the adapter.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Service Catalog API group that owns the broker resources
pub const SERVICE_CATALOG_GROUP: &str = "servicecatalog.k8s.io";

/// Service Catalog API version
pub const SERVICE_CATALOG_VERSION: &str = "v1beta1";

/// Relist behavior written on every broker this adapter creates.
/// Catalog refreshes are driven explicitly through `relistRequests`.
pub const RELIST_BEHAVIOR_MANUAL: &str = "Manual";

/// Data key holding the basic-auth username in a credential secret
pub const SECRET_USERNAME_KEY: &str = "username";

/// Data key holding the basic-auth password in a credential secret
pub const SECRET_PASSWORD_KEY: &str = "password";

/// Label put on every resource the adapter creates
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Value of [`MANAGED_BY_LABEL`]
pub const MANAGED_BY_VALUE: &str = "broker-proxy";

/// Default client request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Secret namespace used when neither the adapter config nor `POD_NAMESPACE` names one
pub const DEFAULT_SECRET_NAMESPACE: &str = "kube-system";

/// Environment variable names read by `AdapterConfig::from_env`
pub const ENV_TARGET_NAMESPACE: &str = "BROKER_PROXY_TARGET_NAMESPACE";
pub const ENV_SECRET_NAMESPACE: &str = "BROKER_PROXY_SECRET_NAMESPACE";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "BROKER_PROXY_REQUEST_TIMEOUT_SECS";
pub const ENV_METRICS_ENABLED: &str = "BROKER_PROXY_METRICS_ENABLED";
pub const ENV_POD_NAMESPACE: &str = "POD_NAMESPACE";
