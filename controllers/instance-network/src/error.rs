//! Controller-specific error types.
//!
//! This module defines the errors the instance network controller reports
//! on top of the client and reconciler errors.

use instance_networks::ReconcileError;
use openstack_client::OpenStackError;
use thiserror::Error;

/// Errors that can occur in the instance network controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// OpenStack API error outside reconciliation (client setup, token check)
    #[error("OpenStack error: {0}")]
    OpenStack(#[from] OpenStackError),

    /// Reconciliation failed
    #[error("Reconciliation failed: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Declared networks still had no addresses after every attempt
    #[error("instance {instance_id} has no addresses yet on: {}", .networks.join(", "))]
    NetworksPending {
        instance_id: String,
        networks: Vec<String>,
    },
}
