//! Reconciliation error types.

use openstack_client::OpenStackError;
use thiserror::Error;

/// Errors that can occur while reconciling instance networks.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A declared network has none of uuid, name or port set
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A network or port lookup matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// A network or port lookup matched more than one resource
    #[error("Ambiguous result: {0}")]
    AmbiguousResult(String),

    /// Transport or service failure from an OpenStack API
    #[error("{context}: {source}")]
    Lookup {
        context: String,
        #[source]
        source: OpenStackError,
    },

    /// The request context was cancelled
    #[error("Reconciliation cancelled")]
    Cancelled,

    /// The request context deadline passed
    #[error("Reconciliation deadline exceeded")]
    DeadlineExceeded,
}

impl ReconcileError {
    /// Classify a collaborator error, adding which lookup was being attempted.
    pub fn from_lookup(context: impl Into<String>, err: OpenStackError) -> Self {
        let context = context.into();
        match err {
            OpenStackError::NotFound(msg) => ReconcileError::NotFound(format!("{}: {}", context, msg)),
            OpenStackError::Ambiguous(msg) => ReconcileError::AmbiguousResult(format!("{}: {}", context, msg)),
            source => ReconcileError::Lookup { context, source },
        }
    }

    /// True for errors raised by the request context rather than by a lookup
    pub fn is_context_error(&self) -> bool {
        matches!(self, ReconcileError::Cancelled | ReconcileError::DeadlineExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup_classifies() {
        let not_found = ReconcileError::from_lookup(
            "looking up network name=a",
            OpenStackError::NotFound("no network".to_string()),
        );
        assert!(matches!(not_found, ReconcileError::NotFound(ref m) if m.contains("name=a")));

        let ambiguous = ReconcileError::from_lookup("x", OpenStackError::Ambiguous("2 results".to_string()));
        assert!(matches!(ambiguous, ReconcileError::AmbiguousResult(_)));

        let api = ReconcileError::from_lookup("looking up port p", OpenStackError::Api("500".to_string()));
        assert_eq!(api.to_string(), "looking up port p: OpenStack API error: 500");
        assert!(!api.is_context_error());
    }
}
