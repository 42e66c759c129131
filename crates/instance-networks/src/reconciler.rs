//! Reconciliation entry point.
//!
//! This module wires the collaborators together:
//! 1. Reads the instance's addresses from Compute
//! 2. Resolves the declared networks through Networking
//! 3. Normalizes the observed addresses
//! 4. Merges both sides and derives the access addresses

use crate::access::AccessAddresses;
use crate::context::RequestContext;
use crate::declared::{normalize_declared, validate_declared, DeclaredNetwork};
use crate::error::ReconcileError;
use crate::merge::{merge, FinalAttachment};
use crate::observed::normalize_observed;
use chrono::{DateTime, Utc};
use openstack_client::{InstanceAddressFetcher, NetworkLookup, PortLookup};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of reconciling one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutput {
    pub instance_id: String,
    pub attachments: Vec<FinalAttachment>,
    pub access_v4: String,
    pub access_v6: String,
    /// Declared networks that did not have observed addresses yet
    pub pending_networks: Vec<String>,
    pub reconciled_at: DateTime<Utc>,
}

impl ReconcileOutput {
    /// True when every declared network produced an attachment
    pub fn is_complete(&self) -> bool {
        self.pending_networks.is_empty()
    }

    pub fn access_addresses(&self) -> AccessAddresses {
        AccessAddresses {
            v4: self.access_v4.clone(),
            v6: self.access_v6.clone(),
        }
    }
}

/// Reconciles declared instance networks against what Compute reports.
#[derive(Clone)]
pub struct NetworkReconciler {
    networks: Arc<dyn NetworkLookup>,
    ports: Arc<dyn PortLookup>,
    compute: Arc<dyn InstanceAddressFetcher>,
}

impl std::fmt::Debug for NetworkReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkReconciler").finish_non_exhaustive()
    }
}

impl NetworkReconciler {
    /// Creates a new reconciler from its three collaborators.
    pub fn new(
        networks: Arc<dyn NetworkLookup>,
        ports: Arc<dyn PortLookup>,
        compute: Arc<dyn InstanceAddressFetcher>,
    ) -> Self {
        Self {
            networks,
            ports,
            compute,
        }
    }

    /// Reconciles the networks of one instance.
    ///
    /// The declared list is validated before any service call. Errors from
    /// normalizing it are fatal. A declared network with no observed
    /// addresses is reported in `pending_networks` rather than as an error.
    pub async fn reconcile(
        &self,
        ctx: &RequestContext,
        declared: &[DeclaredNetwork],
        instance_id: &str,
    ) -> Result<ReconcileOutput, ReconcileError> {
        info!("Reconciling networks of instance {}", instance_id);
        validate_declared(declared)?;

        let instance = ctx
            .call(
                &format!("reading addresses of instance {}", instance_id),
                self.compute.get_instance_addresses(instance_id),
            )
            .await?;
        debug!("Instance {} addresses: {:?}", instance_id, instance.addresses);

        let resolved = normalize_declared(ctx, self.networks.as_ref(), self.ports.as_ref(), declared).await?;
        let observed = normalize_observed(&instance.addresses);
        let merged = merge(ctx, self.networks.as_ref(), &resolved, observed).await?;

        let access = AccessAddresses::derive(&merged.attachments).or_server_declared(
            instance.access_ipv4.as_deref(),
            instance.access_ipv6.as_deref(),
        );

        info!(
            "Instance {} has {} attachment(s), access v4 '{}' v6 '{}'",
            instance_id,
            merged.attachments.len(),
            access.v4,
            access.v6
        );

        Ok(ReconcileOutput {
            instance_id: instance_id.to_string(),
            attachments: merged.attachments,
            access_v4: access.v4,
            access_v6: access.v6,
            pending_networks: merged.unmatched,
            reconciled_at: Utc::now(),
        })
    }
}
