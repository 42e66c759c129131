//! Declared-network normalization.
//!
//! Turns the user's ordered list of network blocks into fully identified
//! networks, filling in a missing UUID or name through the Networking API.

use crate::context::RequestContext;
use crate::error::ReconcileError;
use openstack_client::{NetworkLookup, NetworkQuery, NetworkRef, PortLookup};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One network block as the user declared it. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredNetwork {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub fixed_ip_v4: String,
    #[serde(default)]
    pub access_network: bool,
}

impl DeclaredNetwork {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn by_uuid(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            ..Self::default()
        }
    }

    pub fn by_port(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    /// At least one of uuid, name or port must be set.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.uuid.is_empty() && self.name.is_empty() && self.port.is_empty() {
            return Err(ReconcileError::InvalidConfiguration(
                "a network block must set one of uuid, name or port".to_string(),
            ));
        }
        Ok(())
    }

    /// The single lookup needed to identify this network, if any.
    ///
    /// A port wins over a UUID, which wins over a name.
    pub fn lookup_target(&self) -> Option<LookupTarget> {
        if !self.uuid.is_empty() && !self.name.is_empty() {
            return None;
        }
        if !self.port.is_empty() {
            Some(LookupTarget::Port(self.port.clone()))
        } else if !self.uuid.is_empty() {
            Some(LookupTarget::Network(NetworkQuery::Id(self.uuid.clone())))
        } else {
            Some(LookupTarget::Network(NetworkQuery::Name(self.name.clone())))
        }
    }
}

/// What a declared network has to be resolved through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupTarget {
    /// Resolve the port to its network, then look that network up by ID
    Port(String),
    Network(NetworkQuery),
}

/// A declared network with both UUID and name known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNetwork {
    pub uuid: String,
    pub name: String,
    pub port: String,
    pub fixed_ip_v4: String,
    pub access_network: bool,
}

impl ResolvedNetwork {
    fn from_declared(declared: &DeclaredNetwork, found: Option<NetworkRef>) -> Self {
        let mut resolved = Self {
            uuid: declared.uuid.clone(),
            name: declared.name.clone(),
            port: declared.port.clone(),
            fixed_ip_v4: declared.fixed_ip_v4.clone(),
            access_network: declared.access_network,
        };
        if let Some(found) = found {
            if resolved.uuid.is_empty() {
                resolved.uuid = found.id;
            }
            if resolved.name.is_empty() {
                resolved.name = found.name;
            }
        }
        resolved
    }
}

/// Check every declared network without touching any service.
pub fn validate_declared(declared: &[DeclaredNetwork]) -> Result<(), ReconcileError> {
    for (index, network) in declared.iter().enumerate() {
        network.validate().map_err(|e| match e {
            ReconcileError::InvalidConfiguration(msg) => {
                ReconcileError::InvalidConfiguration(format!("network #{}: {}", index, msg))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// Resolve every declared network, in order.
///
/// The whole list is validated before the first lookup. Any failure aborts
/// the whole list.
pub async fn normalize_declared(
    ctx: &RequestContext,
    networks: &dyn NetworkLookup,
    ports: &dyn PortLookup,
    declared: &[DeclaredNetwork],
) -> Result<Vec<ResolvedNetwork>, ReconcileError> {
    validate_declared(declared)?;
    let mut resolved = Vec::with_capacity(declared.len());

    for (index, network) in declared.iter().enumerate() {
        let found = match network.lookup_target() {
            None => {
                debug!("Network #{} already has uuid {} and name {}", index, network.uuid, network.name);
                None
            }
            Some(target) => Some(resolve_target(ctx, networks, ports, &target).await?),
        };

        let entry = ResolvedNetwork::from_declared(network, found);
        debug!("Resolved network #{}: {:?}", index, entry);
        resolved.push(entry);
    }

    Ok(resolved)
}

async fn resolve_target(
    ctx: &RequestContext,
    networks: &dyn NetworkLookup,
    ports: &dyn PortLookup,
    target: &LookupTarget,
) -> Result<NetworkRef, ReconcileError> {
    let query = match target {
        LookupTarget::Port(port_id) => {
            let network_id = ctx
                .call(
                    &format!("looking up port {}", port_id),
                    ports.lookup_port_network(port_id),
                )
                .await?;
            debug!("Port {} belongs to network {}", port_id, network_id);
            NetworkQuery::Id(network_id)
        }
        LookupTarget::Network(query) => query.clone(),
    };

    ctx.call(
        &format!("looking up network {}", query),
        networks.lookup_network(&query),
    )
    .await
}

#[cfg(test)]
#[path = "declared_test.rs"]
mod declared_test;
