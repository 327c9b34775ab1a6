//! # Resource Scope
//!
//! Selects whether brokers are registered cluster-wide or in one namespace.

use std::fmt;

/// Where broker resources live
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `ClusterServiceBroker` resources
    Cluster,
    /// `ServiceBroker` resources in the given namespace
    Namespace(String),
}

impl Scope {
    /// Map a configured target namespace to a scope.
    /// Empty selects the cluster scope.
    #[must_use]
    pub fn select(target_namespace: &str) -> Self {
        if target_namespace.is_empty() {
            Self::Cluster
        } else {
            Self::Namespace(target_namespace.to_string())
        }
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Cluster => None,
            Self::Namespace(namespace) => Some(namespace),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster => write!(f, "cluster"),
            Self::Namespace(namespace) => write!(f, "namespace/{namespace}"),
        }
    }
}
