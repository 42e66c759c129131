//! Mock OpenStackClient for unit testing
//!
//! This module provides a mock implementation of the collaborator traits that
//! can be used in unit tests without a running OpenStack deployment.
//!
//! The mock is organized into domain-specific modules:
//! - `networking.rs` - Network and port lookups
//! - `compute.rs` - Server address reads
//! - `helpers.rs` - Fixture builders for model types

pub mod helpers;
mod compute;
mod networking;

use crate::error::OpenStackError;
use crate::models::*;
use crate::openstack_trait::{InstanceAddressFetcher, NetworkLookup, PortLookup};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use helpers::{fixed_address, floating_address};

/// Mock OpenStackClient for testing
///
/// This mock stores resources in memory and records every call it receives,
/// so tests can assert both on results and on which lookups were issued.
#[derive(Clone, Default)]
pub struct MockOpenStackClient {
    pub(crate) networks: Arc<Mutex<Vec<Network>>>,
    pub(crate) ports: Arc<Mutex<Vec<Port>>>,
    pub(crate) servers: Arc<Mutex<HashMap<String, Server>>>,
    pub(crate) network_failure: Arc<Mutex<Option<String>>>,
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockOpenStackClient {
    /// Create a new, empty mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a network to the mock store (for test setup)
    pub fn add_network(&self, network: Network) {
        lock(&self.networks).push(network);
    }

    /// Add an ACTIVE network with a generated UUID, returning it
    pub fn add_active_network(&self, name: &str) -> Network {
        let network = helpers::network(&uuid::Uuid::new_v4().to_string(), name, ACTIVE_STATUS);
        self.add_network(network.clone());
        network
    }

    /// Add a port on the given network (for test setup)
    pub fn add_port(&self, port_id: &str, network_id: &str) -> Port {
        let port = helpers::port(port_id, network_id);
        lock(&self.ports).push(port.clone());
        port
    }

    /// Set the address map a server reports (for test setup)
    pub fn set_server_addresses(&self, instance_id: &str, addresses: AddressMap) {
        lock(&self.servers).insert(instance_id.to_string(), helpers::server(instance_id, addresses));
    }

    /// Set the access addresses a server reports; the server must already exist
    pub fn set_server_access_ips(&self, instance_id: &str, access_ipv4: &str, access_ipv6: &str) {
        if let Some(server) = lock(&self.servers).get_mut(instance_id) {
            server.access_ipv4 = Some(access_ipv4.to_string());
            server.access_ipv6 = Some(access_ipv6.to_string());
        }
    }

    /// Make every subsequent network lookup fail with an API error
    pub fn fail_network_lookups(&self, message: impl Into<String>) {
        *lock(&self.network_failure) = Some(message.into());
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Number of network or port lookups received so far
    pub fn lookup_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.starts_with("lookup_"))
            .count()
    }

    pub(crate) fn record(&self, call: String) {
        lock(&self.calls).push(call);
    }

    pub(crate) fn check_network_failure(&self) -> Result<(), OpenStackError> {
        match lock(&self.network_failure).as_ref() {
            Some(message) => Err(OpenStackError::Api(message.clone())),
            None => Ok(()),
        }
    }

    pub(crate) fn networks(&self) -> MutexGuard<'_, Vec<Network>> {
        lock(&self.networks)
    }

    pub(crate) fn ports(&self) -> MutexGuard<'_, Vec<Port>> {
        lock(&self.ports)
    }

    pub(crate) fn servers(&self) -> MutexGuard<'_, HashMap<String, Server>> {
        lock(&self.servers)
    }
}

#[async_trait::async_trait]
impl NetworkLookup for MockOpenStackClient {
    async fn lookup_network(&self, query: &NetworkQuery) -> Result<NetworkRef, OpenStackError> {
        networking::lookup_network(self, query).await
    }
}

#[async_trait::async_trait]
impl PortLookup for MockOpenStackClient {
    async fn lookup_port_network(&self, port_id: &str) -> Result<String, OpenStackError> {
        networking::lookup_port_network(self, port_id).await
    }
}

#[async_trait::async_trait]
impl InstanceAddressFetcher for MockOpenStackClient {
    async fn get_instance_addresses(&self, instance_id: &str) -> Result<InstanceAddresses, OpenStackError> {
        compute::get_instance_addresses(self, instance_id).await
    }
}
