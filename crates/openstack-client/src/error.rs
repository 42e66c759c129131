//! OpenStack client errors

use thiserror::Error;

/// Errors that can occur when interacting with the OpenStack APIs
#[derive(Debug, Error)]
pub enum OpenStackError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// OpenStack API returned an error
    #[error("OpenStack API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid or expired token)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found, or a filtered query matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// A filtered query matched more than one resource
    #[error("Ambiguous result: {0}")]
    Ambiguous(String),

    /// Invalid request (e.g., empty identifier)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
