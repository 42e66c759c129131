//! Helper functions for building OpenStack model fixtures

use crate::models::*;

/// Build a fixed address record as the compute service reports it
pub fn fixed_address(mac: Option<&str>, version: u8, addr: &str) -> ServerAddress {
    ServerAddress {
        mac_addr: mac.map(str::to_string),
        ip_type: Some("fixed".to_string()),
        version,
        addr: addr.to_string(),
    }
}

/// Build a floating address record
pub fn floating_address(mac: Option<&str>, addr: &str) -> ServerAddress {
    ServerAddress {
        mac_addr: mac.map(str::to_string),
        ip_type: Some("floating".to_string()),
        version: 4,
        addr: addr.to_string(),
    }
}

/// Build a network with the given status
pub fn network(id: &str, name: &str, status: &str) -> Network {
    Network {
        id: id.to_string(),
        name: name.to_string(),
        status: status.to_string(),
        admin_state_up: true,
        shared: false,
        tenant_id: String::new(),
        subnets: vec![],
    }
}

/// Build a port attached to a network
pub fn port(id: &str, network_id: &str) -> Port {
    Port {
        id: id.to_string(),
        network_id: network_id.to_string(),
        name: String::new(),
        mac_address: String::new(),
        status: ACTIVE_STATUS.to_string(),
        device_id: String::new(),
        fixed_ips: vec![],
    }
}

/// Build a server with an address map
pub fn server(id: &str, addresses: AddressMap) -> Server {
    Server {
        id: id.to_string(),
        name: format!("server-{}", id),
        status: ACTIVE_STATUS.to_string(),
        addresses,
        access_ipv4: None,
        access_ipv6: None,
    }
}
