//! OpenStack API models
//!
//! These models match the Networking (Neutron v2.0) and Compute (Nova v2.1)
//! JSON bodies used by instance network reconciliation. Only the fields the
//! reconciler reads are modelled; unknown fields are ignored.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Status filter applied to every network lookup
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// Network model matching the Neutron network resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub admin_state_up: bool,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub subnets: Vec<String>,
}

/// Port model matching the Neutron port resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub network_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub fixed_ips: Vec<PortFixedIp>,
}

/// Fixed IP entry on a port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortFixedIp {
    pub subnet_id: String,
    pub ip_address: String,
}

/// Server model (subset of the Nova server resource)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub addresses: AddressMap,
    /// Empty or null when unset
    #[serde(rename = "accessIPv4", default)]
    pub access_ipv4: Option<String>,
    #[serde(rename = "accessIPv6", default)]
    pub access_ipv6: Option<String>,
}

/// Envelope for `GET /servers/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerResponse {
    pub server: Server,
}

/// One address record from a server's `addresses` map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAddress {
    #[serde(rename = "OS-EXT-IPS-MAC:mac_addr", default, skip_serializing_if = "Option::is_none")]
    pub mac_addr: Option<String>,
    /// `fixed`, `floating`, or absent on older deployments
    #[serde(rename = "OS-EXT-IPS:type", default, skip_serializing_if = "Option::is_none")]
    pub ip_type: Option<String>,
    #[serde(default)]
    pub version: u8,
    pub addr: String,
}

impl ServerAddress {
    /// True when the record describes a fixed address (or carries no type)
    pub fn is_fixed(&self) -> bool {
        matches!(self.ip_type.as_deref(), None | Some("fixed"))
    }
}

/// A server's address map: network name to address records.
///
/// Entries keep the order in which the compute service returned them, so the
/// reconciler sees exactly the upstream iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressMap(Vec<(String, Vec<ServerAddress>)>);

impl AddressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the records for a network
    pub fn push(&mut self, network_name: impl Into<String>, addresses: Vec<ServerAddress>) {
        self.0.push((network_name.into(), addresses));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ServerAddress])> {
        self.0.iter().map(|(name, addrs)| (name.as_str(), addrs.as_slice()))
    }

    pub fn network_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<(String, Vec<ServerAddress>)>> for AddressMap {
    fn from(entries: Vec<(String, Vec<ServerAddress>)>) -> Self {
        Self(entries)
    }
}

impl Serialize for AddressMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, addrs) in &self.0 {
            map.serialize_entry(name, addrs)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AddressMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AddressMapVisitor;

        impl<'de> Visitor<'de> for AddressMapVisitor {
            type Value = AddressMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of network name to address records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, addrs)) = access.next_entry::<String, Vec<ServerAddress>>()? {
                    entries.push((name, addrs));
                }
                Ok(AddressMap(entries))
            }
        }

        deserializer.deserialize_map(AddressMapVisitor)
    }
}

/// Network lookup query, keyed by the Neutron filter it maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkQuery {
    Id(String),
    Name(String),
}

impl NetworkQuery {
    /// Neutron query-string field for this query
    pub fn field(&self) -> &'static str {
        match self {
            NetworkQuery::Id(_) => "id",
            NetworkQuery::Name(_) => "name",
        }
    }

    pub fn term(&self) -> &str {
        match self {
            NetworkQuery::Id(term) | NetworkQuery::Name(term) => term,
        }
    }
}

impl fmt::Display for NetworkQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field(), self.term())
    }
}

/// The `{uuid, name}` pair a network lookup resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRef {
    pub id: String,
    pub name: String,
}

impl From<Network> for NetworkRef {
    fn from(network: Network) -> Self {
        Self {
            id: network.id,
            name: network.name,
        }
    }
}

/// Address information the compute service reports for an instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceAddresses {
    pub addresses: AddressMap,
    pub access_ipv4: Option<String>,
    pub access_ipv6: Option<String>,
}

impl From<Server> for InstanceAddresses {
    fn from(server: Server) -> Self {
        Self {
            addresses: server.addresses,
            access_ipv4: server.access_ipv4.filter(|a| !a.is_empty()),
            access_ipv6: server.access_ipv6.filter(|a| !a.is_empty()),
        }
    }
}
