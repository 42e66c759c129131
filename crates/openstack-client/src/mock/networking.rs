//! Networking operations for MockOpenStackClient
//!
//! Handles network and port lookups

use super::MockOpenStackClient;
use crate::common::expect_single;
use crate::error::OpenStackError;
use crate::models::*;

pub async fn lookup_network(client: &MockOpenStackClient, query: &NetworkQuery) -> Result<NetworkRef, OpenStackError> {
    client.record(format!("lookup_network {}", query));
    client.check_network_failure()?;

    let matches: Vec<Network> = client
        .networks()
        .iter()
        .filter(|n| n.status == ACTIVE_STATUS)
        .filter(|n| match query {
            NetworkQuery::Id(id) => &n.id == id,
            NetworkQuery::Name(name) => &n.name == name,
        })
        .cloned()
        .collect();

    expect_single(matches, &format!("ACTIVE network with {}", query)).map(NetworkRef::from)
}

pub async fn lookup_port_network(client: &MockOpenStackClient, port_id: &str) -> Result<String, OpenStackError> {
    client.record(format!("lookup_port_network {}", port_id));

    let matches: Vec<Port> = client
        .ports()
        .iter()
        .filter(|p| p.id == port_id)
        .cloned()
        .collect();

    expect_single(matches, &format!("port with id={}", port_id)).map(|p| p.network_id)
}
