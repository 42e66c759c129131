//! Instance network reconciliation
//!
//! Matches the networks a user declared for a compute instance against the
//! addresses OpenStack Compute reports for it, producing the ordered list of
//! attachments to persist and the instance's access addresses.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use instance_networks::{DeclaredNetwork, NetworkReconciler, RequestContext};
//! use openstack_client::OpenStackClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(OpenStackClient::new(
//!     "http://neutron:9696".to_string(),
//!     "http://nova:8774/v2.1".to_string(),
//!     "your-keystone-token".to_string(),
//! )?);
//! let reconciler = NetworkReconciler::new(client.clone(), client.clone(), client);
//!
//! let declared = vec![DeclaredNetwork::by_name("private")];
//! let output = reconciler
//!     .reconcile(&RequestContext::background(), &declared, "instance-id")
//!     .await?;
//! println!("access address: {}", output.access_v4);
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod context;
pub mod declared;
pub mod error;
pub mod merge;
pub mod observed;
pub mod reconciler;

pub use access::AccessAddresses;
pub use context::{CancelHandle, RequestContext};
pub use declared::{normalize_declared, validate_declared, DeclaredNetwork, LookupTarget, ResolvedNetwork};
pub use error::ReconcileError;
pub use merge::{merge, FinalAttachment, Merged};
pub use observed::{network_order, normalize_observed, NetworkAddressGroup, Nic};
pub use reconciler::{NetworkReconciler, ReconcileOutput};
