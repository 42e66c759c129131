//! Merging resolved declarations with observed NICs.

use crate::context::RequestContext;
use crate::declared::ResolvedNetwork;
use crate::error::ReconcileError;
use crate::observed::{NetworkAddressGroup, Nic};
use openstack_client::{NetworkLookup, NetworkQuery};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// One network attachment as it should be persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalAttachment {
    pub uuid: String,
    pub name: String,
    pub port: String,
    pub fixed_ip_v4: String,
    pub fixed_ip_v6: String,
    pub mac: String,
    pub access_network: bool,
}

impl FinalAttachment {
    fn new(network: &ResolvedNetwork, nic: Nic) -> Self {
        Self {
            uuid: network.uuid.clone(),
            name: network.name.clone(),
            port: network.port.clone(),
            fixed_ip_v4: nic.fixed_ip_v4,
            fixed_ip_v6: nic.fixed_ip_v6,
            mac: nic.mac,
            access_network: network.access_network,
        }
    }
}

/// Result of a merge: the attachments, plus declared networks left without one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Merged {
    pub attachments: Vec<FinalAttachment>,
    /// Names of declared networks that had no unconsumed NIC
    pub unmatched: Vec<String>,
}

/// Merge resolved declarations with observed groups.
///
/// With no declarations every observed NIC becomes an attachment and network
/// UUIDs are filled in on a best-effort basis. Otherwise each declaration
/// takes the next unconsumed NIC of the group with the same name; a
/// declaration with no such NIC produces nothing.
pub async fn merge(
    ctx: &RequestContext,
    networks: &dyn NetworkLookup,
    resolved: &[ResolvedNetwork],
    observed: Vec<NetworkAddressGroup>,
) -> Result<Merged, ReconcileError> {
    if resolved.is_empty() {
        return merge_observed_only(ctx, networks, observed).await;
    }
    Ok(merge_declared(resolved, observed))
}

fn merge_declared(resolved: &[ResolvedNetwork], observed: Vec<NetworkAddressGroup>) -> Merged {
    let mut queues: Vec<(String, VecDeque<Nic>)> = observed
        .into_iter()
        .map(|g| (g.network_name, VecDeque::from(g.nics)))
        .collect();

    let mut merged = Merged::default();
    for network in resolved {
        let next = queues
            .iter_mut()
            .filter(|(name, _)| *name == network.name)
            .find_map(|(_, nics)| nics.pop_front());

        match next {
            Some(nic) => {
                debug!("Network {} matched NIC {:?}", network.name, nic);
                merged.attachments.push(FinalAttachment::new(network, nic));
            }
            None => {
                debug!("Network {} has no observed addresses yet", network.name);
                merged.unmatched.push(network.name.clone());
            }
        }
    }

    merged
}

async fn merge_observed_only(
    ctx: &RequestContext,
    networks: &dyn NetworkLookup,
    observed: Vec<NetworkAddressGroup>,
) -> Result<Merged, ReconcileError> {
    let mut merged = Merged::default();

    for group in observed {
        if group.nics.is_empty() {
            continue;
        }

        let query = NetworkQuery::Name(group.network_name.clone());
        let uuid = match ctx
            .call(&format!("looking up network {}", query), networks.lookup_network(&query))
            .await
        {
            Ok(found) => found.id,
            Err(e) if e.is_context_error() => return Err(e),
            Err(e) => {
                warn!("Unable to determine the uuid of network {}: {}", group.network_name, e);
                String::new()
            }
        };

        let network = ResolvedNetwork {
            uuid,
            name: group.network_name,
            ..ResolvedNetwork::default()
        };
        merged
            .attachments
            .extend(group.nics.into_iter().map(|nic| FinalAttachment::new(&network, nic)));
    }

    Ok(merged)
}
