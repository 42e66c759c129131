//! Common utilities for the OpenStack API client
//!
//! Provides shared functionality used by the networking and compute calls.

pub mod query;

use crate::error::OpenStackError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client wrapper with token authentication
pub struct HttpClient {
    client: Client,
    token: String,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, token: String) -> Self {
        Self { client, token }
    }

    /// Build a full URL from an endpoint and a path
    pub fn build_url(&self, endpoint: &str, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", endpoint.trim_end_matches('/'), path)
        }
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Make an authenticated GET request and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, OpenStackError> {
        debug!("GET {}", url);

        let response = self.client
            .get(url)
            .header("X-Auth-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(OpenStackError::Http)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenStackError::Authentication(format!(
                "GET {} rejected: {} - {}",
                url, status, body
            )));
        }

        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenStackError::NotFound(format!(
                "Resource not found: {} - {}",
                url, body
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenStackError::Api(format!(
                "GET {} failed: {} - {}",
                url, status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            OpenStackError::Api(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Build query string from filters
    pub fn build_query_string(&self, filters: &[(&str, &str)]) -> String {
        filters
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Reduce a filtered listing to exactly one result.
///
/// `what` describes the query for error messages, e.g. `network name=private`.
pub fn expect_single<T>(mut items: Vec<T>, what: &str) -> Result<T, OpenStackError> {
    match items.len() {
        0 => Err(OpenStackError::NotFound(format!("no {} found", what))),
        1 => Ok(items.remove(0)),
        n => Err(OpenStackError::Ambiguous(format!(
            "{} matched {} results, expected exactly one",
            what, n
        ))),
    }
}
