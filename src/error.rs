//! # Errors
//!
//! Error taxonomy for the broker adapter.
//!
//! - [`AdapterError::Configuration`] is only produced while building the adapter.
//! - [`AdapterError::Upstream`] wraps every cluster API failure with the
//!   operation and the entity it targeted. The original `kube::Error` is kept
//!   as the source.
//! - [`AdapterError::InconsistentState`] reports an update where only one of
//!   the credential secret and the broker was written. `written` and `failed`
//!   name the two sides. The reconciliation loop observes it and retries on its
//!   next pass.

use thiserror::Error;

pub type Result<T, E = AdapterError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid adapter configuration: {0}")]
    Configuration(String),

    #[error("unable to {operation} {target}: {source}")]
    Upstream {
        operation: &'static str,
        target: String,
        #[source]
        source: kube::Error,
    },

    #[error("inconsistent state for broker {broker}: {written} updated but {failed} update failed: {source}")]
    InconsistentState {
        broker: String,
        written: &'static str,
        failed: &'static str,
        #[source]
        source: Box<AdapterError>,
    },

    #[error("{0} is not supported by this platform")]
    Unsupported(&'static str),

    #[error("unable to create kubernetes client: {0}")]
    Client(#[source] kube::Error),
}

impl AdapterError {
    pub(crate) fn upstream(
        operation: &'static str,
        target: impl Into<String>,
        source: kube::Error,
    ) -> Self {
        Self::Upstream {
            operation,
            target: target.into(),
            source,
        }
    }

    /// The API server answered 404 for the targeted entity
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.api_code() == Some(404)
    }

    /// The API server answered 409 (already exists or stale resource version)
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.api_code() == Some(409)
    }

    fn api_code(&self) -> Option<u16> {
        match self {
            Self::Upstream { source, .. } | Self::Client(source) => api_status_code(source),
            Self::InconsistentState { source, .. } => source.api_code(),
            Self::Configuration(_) | Self::Unsupported(_) => None,
        }
    }
}

/// HTTP status code of an API server error response, if the error is one
pub(crate) fn api_status_code(err: &kube::Error) -> Option<u16> {
    match err {
        kube::Error::Api(response) => Some(response.code),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("{reason} for test"),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn test_upstream_error_message_names_operation_and_target() {
        let err = AdapterError::upstream(
            "list",
            "cluster-scoped brokers",
            api_error(403, "Forbidden"),
        );
        let message = err.to_string();
        assert!(
            message.starts_with("unable to list cluster-scoped brokers: "),
            "unexpected message: {message}"
        );
        assert!(message.contains("Forbidden"));
    }

    #[test]
    fn test_status_code_helpers() {
        assert!(AdapterError::upstream("get", "broker a", api_error(404, "NotFound")).is_not_found());
        assert!(AdapterError::upstream("create", "secret a", api_error(409, "AlreadyExists")).is_conflict());
        assert!(!AdapterError::Configuration("bad".to_string()).is_not_found());
    }

    #[test]
    fn test_inconsistent_state_keeps_cause() {
        let cause = AdapterError::upstream("update", "broker a", api_error(409, "Conflict"));
        let err = AdapterError::InconsistentState {
            broker: "a".to_string(),
            written: "credentials",
            failed: "broker",
            source: Box::new(cause),
        };
        assert!(err.is_conflict());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_inconsistent_state_message_names_written_side() {
        let cause = AdapterError::upstream("create", "secret ns/a", api_error(403, "Forbidden"));
        let err = AdapterError::InconsistentState {
            broker: "a".to_string(),
            written: "broker",
            failed: "credentials",
            source: Box::new(cause),
        };
        let message = err.to_string();
        assert!(
            message.starts_with("inconsistent state for broker a: broker updated but credentials update failed: "),
            "unexpected message: {message}"
        );
        assert!(message.contains("unable to create secret ns/a"));
    }
}
