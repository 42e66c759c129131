//! OpenStack API client
//!
//! Implements the Networking and Compute calls needed to reconcile an
//! instance's network attachments:
//! - `GET /v2.0/networks?{id|name}=..&status=ACTIVE`
//! - `GET /v2.0/ports?id=..`
//! - `GET /servers/{id}`

use crate::common::query::query_resources;
use crate::common::{expect_single, HttpClient};
use crate::error::OpenStackError;
use crate::models::*;
use crate::openstack_trait::{InstanceAddressFetcher, NetworkLookup, PortLookup};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// OpenStack API client
pub struct OpenStackClient {
    http: HttpClient,
    network_endpoint: String,
    compute_endpoint: String,
}

impl OpenStackClient {
    /// Create a new OpenStack client
    ///
    /// # Arguments
    /// * `network_endpoint` - Networking endpoint (e.g., "http://neutron:9696")
    /// * `compute_endpoint` - Compute endpoint including version (e.g., "http://nova:8774/v2.1")
    /// * `token` - Pre-issued Keystone token sent as `X-Auth-Token`
    pub fn new(
        network_endpoint: String,
        compute_endpoint: String,
        token: String,
    ) -> Result<Self, OpenStackError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(OpenStackError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, token),
            network_endpoint: network_endpoint.trim_end_matches('/').to_string(),
            compute_endpoint: compute_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Get the Networking endpoint
    pub fn network_endpoint(&self) -> &str {
        &self.network_endpoint
    }

    /// Get the Compute endpoint
    pub fn compute_endpoint(&self) -> &str {
        &self.compute_endpoint
    }

    /// Validate the token by making a lightweight authenticated request.
    ///
    /// # Returns
    /// * `Ok(())` - Token is valid and the Networking API is reachable
    /// * `Err(OpenStackError)` - Token is invalid or the API is unreachable
    pub async fn validate_token(&self) -> Result<(), OpenStackError> {
        debug!("Validating OpenStack token and connectivity");
        let _: Vec<Network> =
            query_resources(&self.http, &self.network_endpoint, "networks", &[("limit", "1")]).await?;
        debug!("Token validated successfully");
        Ok(())
    }

    /// Query networks with filters
    pub async fn query_networks(&self, filters: &[(&str, &str)]) -> Result<Vec<Network>, OpenStackError> {
        query_resources(&self.http, &self.network_endpoint, "networks", filters).await
    }

    /// Query ports with filters
    pub async fn query_ports(&self, filters: &[(&str, &str)]) -> Result<Vec<Port>, OpenStackError> {
        query_resources(&self.http, &self.network_endpoint, "ports", filters).await
    }

    /// Get a server by ID
    ///
    /// # Returns
    /// * `Ok(Server)` - The server, with its address map in upstream order
    /// * `Err(OpenStackError::NotFound)` - If the server does not exist
    pub async fn get_server(&self, id: &str) -> Result<Server, OpenStackError> {
        if id.is_empty() {
            return Err(OpenStackError::InvalidRequest("server ID is empty".to_string()));
        }

        debug!("Fetching server {} from Compute", id);
        let path = format!("/servers/{}", urlencoding::encode(id));
        let response: ServerResponse = self.http.get(&self.http.build_url(&self.compute_endpoint, &path)).await?;
        Ok(response.server)
    }
}

#[async_trait::async_trait]
impl NetworkLookup for OpenStackClient {
    async fn lookup_network(&self, query: &NetworkQuery) -> Result<NetworkRef, OpenStackError> {
        debug!("Looking up network by {}", query);
        let networks = self
            .query_networks(&[(query.field(), query.term()), ("status", ACTIVE_STATUS)])
            .await?;
        let network = expect_single(networks, &format!("ACTIVE network with {}", query))?;
        Ok(network.into())
    }
}

#[async_trait::async_trait]
impl PortLookup for OpenStackClient {
    async fn lookup_port_network(&self, port_id: &str) -> Result<String, OpenStackError> {
        debug!("Looking up network of port {}", port_id);
        let ports = self.query_ports(&[("id", port_id)]).await?;
        let port = expect_single(ports, &format!("port with id={}", port_id))?;
        Ok(port.network_id)
    }
}

#[async_trait::async_trait]
impl InstanceAddressFetcher for OpenStackClient {
    async fn get_instance_addresses(&self, instance_id: &str) -> Result<InstanceAddresses, OpenStackError> {
        let server = self.get_server(instance_id).await?;
        debug!(
            "Server {} reports addresses on {} network(s)",
            instance_id,
            server.addresses.len()
        );
        Ok(server.into())
    }
}
