//! Collaborator traits for mocking
//!
//! The reconciler depends on three narrow lookups rather than on a whole
//! client. The concrete `OpenStackClient` implements all of them, and tests
//! can use `MockOpenStackClient` or their own stubs.

use crate::error::OpenStackError;
use crate::models::{InstanceAddresses, NetworkQuery, NetworkRef};

/// Network directory: resolves a network by ID or name.
///
/// Implementations only consider networks in `ACTIVE` status and must return
/// `OpenStackError::NotFound` for zero matches and
/// `OpenStackError::Ambiguous` for more than one.
#[async_trait::async_trait]
pub trait NetworkLookup: Send + Sync {
    async fn lookup_network(&self, query: &NetworkQuery) -> Result<NetworkRef, OpenStackError>;
}

/// Port directory: resolves a port ID to the ID of its network.
#[async_trait::async_trait]
pub trait PortLookup: Send + Sync {
    async fn lookup_port_network(&self, port_id: &str) -> Result<String, OpenStackError>;
}

/// Compute service: reports the current addresses of an instance.
#[async_trait::async_trait]
pub trait InstanceAddressFetcher: Send + Sync {
    async fn get_instance_addresses(&self, instance_id: &str) -> Result<InstanceAddresses, OpenStackError>;
}
