//! OpenStack REST API Client
//!
//! A small Rust client for the OpenStack Networking and Compute APIs, scoped
//! to what instance network reconciliation needs: resolving networks by ID or
//! name, resolving a port to its network, and reading a server's addresses.
//!
//! # Example
//!
//! ```no_run
//! use openstack_client::{NetworkLookup, NetworkQuery, OpenStackClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenStackClient::new(
//!     "http://neutron:9696".to_string(),
//!     "http://nova:8774/v2.1".to_string(),
//!     "your-keystone-token".to_string(),
//! )?;
//!
//! let network = client
//!     .lookup_network(&NetworkQuery::Name("private".to_string()))
//!     .await?;
//! println!("{} -> {}", network.name, network.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod openstack_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::OpenStackClient;
pub use common::HttpClient;
pub use error::OpenStackError;
pub use models::*;
pub use openstack_trait::{InstanceAddressFetcher, NetworkLookup, PortLookup};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockOpenStackClient;
