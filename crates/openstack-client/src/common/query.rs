//! Query utilities for the Networking API
//!
//! Neutron wraps listings in an envelope keyed by the collection name
//! (`{"networks": [...], "networks_links": [...]}`).

use crate::common::HttpClient;
use crate::error::OpenStackError;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Query a Neutron collection with optional filtering
pub async fn query_resources<T: DeserializeOwned>(
    http: &HttpClient,
    endpoint: &str,
    collection: &str,
    filters: &[(&str, &str)],
) -> Result<Vec<T>, OpenStackError> {
    let mut path = format!("/v2.0/{}", collection);

    if !filters.is_empty() {
        path = format!("{}?{}", path, http.build_query_string(filters));
    }

    let mut envelope: BTreeMap<String, serde_json::Value> =
        http.get(&http.build_url(endpoint, &path)).await?;

    let items = envelope.remove(collection).ok_or_else(|| {
        OpenStackError::Api(format!("response for {} is missing the '{}' key", path, collection))
    })?;

    Ok(serde_json::from_value(items)?)
}
