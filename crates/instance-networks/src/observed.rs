//! Observed-address normalization.
//!
//! Converts a server's raw address map into per-network NIC lists, joining
//! the IPv4 and IPv6 records of one interface on its MAC address.

use openstack_client::{AddressMap, ServerAddress};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One interface as observed on the instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nic {
    pub fixed_ip_v4: String,
    pub fixed_ip_v6: String,
    pub mac: String,
}

impl Nic {
    fn from_record(record: &ServerAddress) -> Self {
        let mut nic = Nic {
            mac: record.mac_addr.clone().unwrap_or_default(),
            ..Nic::default()
        };
        if record.version == 6 {
            nic.fixed_ip_v6 = record.addr.clone();
        } else {
            nic.fixed_ip_v4 = record.addr.clone();
        }
        nic
    }

    /// Fill whichever addresses this NIC is still missing.
    fn absorb(&mut self, other: Nic) {
        if self.fixed_ip_v4.is_empty() {
            self.fixed_ip_v4 = other.fixed_ip_v4;
        }
        if self.fixed_ip_v6.is_empty() {
            self.fixed_ip_v6 = other.fixed_ip_v6;
        }
    }
}

/// The NICs an instance has on one network, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAddressGroup {
    pub network_name: String,
    pub nics: Vec<Nic>,
}

/// Address map entries in processing order.
///
/// Compute returns addresses keyed by network name with no meaningful order.
/// The one pairing that is pinned is `private` followed by `public`, which is
/// processed as `public` first.
fn ordered_entries(addresses: &AddressMap) -> Vec<(&str, &[ServerAddress])> {
    let mut entries: Vec<(&str, &[ServerAddress])> = addresses.iter().collect();
    if entries.len() == 2 && entries[0].0 == "private" && entries[1].0 == "public" {
        entries.swap(0, 1);
    }
    entries
}

/// Network names in processing order.
pub fn network_order(addresses: &AddressMap) -> Vec<&str> {
    ordered_entries(addresses).into_iter().map(|(name, _)| name).collect()
}

/// Build one NIC list per network name.
pub fn normalize_observed(addresses: &AddressMap) -> Vec<NetworkAddressGroup> {
    ordered_entries(addresses)
        .into_iter()
        .map(|(name, records)| {
            let group = NetworkAddressGroup {
                network_name: name.to_string(),
                nics: merge_records(records),
            };
            debug!("Observed {} NIC(s) on network {}", group.nics.len(), group.network_name);
            group
        })
        .collect()
}

fn merge_records(records: &[ServerAddress]) -> Vec<Nic> {
    let mut nics: Vec<Nic> = Vec::new();

    for record in records.iter().filter(|r| r.is_fixed()) {
        let nic = Nic::from_record(record);
        let existing = if nic.mac.is_empty() {
            None
        } else {
            nics.iter_mut().find(|n| n.mac == nic.mac)
        };

        match existing {
            Some(existing) => existing.absorb(nic),
            None => nics.push(nic),
        }
    }

    nics
}

#[cfg(test)]
mod tests {
    use super::*;
    use openstack_client::mock::{fixed_address, floating_address};

    fn map(entries: Vec<(&str, Vec<ServerAddress>)>) -> AddressMap {
        let mut addresses = AddressMap::new();
        for (name, records) in entries {
            addresses.push(name, records);
        }
        addresses
    }

    fn names(groups: &[NetworkAddressGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.network_name.as_str()).collect()
    }

    #[test]
    fn test_private_public_is_swapped() {
        let addresses = map(vec![
            ("private", vec![fixed_address(None, 4, "10.0.0.2")]),
            ("public", vec![fixed_address(None, 4, "203.0.113.2")]),
        ]);
        assert_eq!(names(&normalize_observed(&addresses)), vec!["public", "private"]);
    }

    #[test]
    fn test_other_orders_are_untouched() {
        let public_first = map(vec![("public", vec![]), ("private", vec![])]);
        assert_eq!(network_order(&public_first), vec!["public", "private"]);

        let dmz = map(vec![("private", vec![]), ("dmz", vec![])]);
        assert_eq!(network_order(&dmz), vec!["private", "dmz"]);

        let three = map(vec![("private", vec![]), ("public", vec![]), ("dmz", vec![])]);
        assert_eq!(network_order(&three), vec!["private", "public", "dmz"]);
    }

    #[test]
    fn test_mac_merge_is_order_independent() {
        let v4 = fixed_address(Some("fa:16:3e:aa:bb:cc"), 4, "10.0.0.5");
        let v6 = fixed_address(Some("fa:16:3e:aa:bb:cc"), 6, "fd00::5");

        let forward = normalize_observed(&map(vec![("net", vec![v4.clone(), v6.clone()])]));
        let reverse = normalize_observed(&map(vec![("net", vec![v6, v4])]));

        let expected = vec![Nic {
            fixed_ip_v4: "10.0.0.5".to_string(),
            fixed_ip_v6: "fd00::5".to_string(),
            mac: "fa:16:3e:aa:bb:cc".to_string(),
        }];
        assert_eq!(forward[0].nics, expected);
        assert_eq!(reverse[0].nics, expected);
    }

    #[test]
    fn test_distinct_macs_stay_separate_in_order() {
        let groups = normalize_observed(&map(vec![(
            "net",
            vec![
                fixed_address(Some("aa:01"), 4, "10.0.0.1"),
                fixed_address(Some("aa:02"), 4, "10.0.0.2"),
                fixed_address(Some("aa:01"), 6, "fd00::1"),
            ],
        )]));

        let nics = &groups[0].nics;
        assert_eq!(nics.len(), 2);
        assert_eq!(nics[0].mac, "aa:01");
        assert_eq!(nics[0].fixed_ip_v6, "fd00::1");
        assert_eq!(nics[1].fixed_ip_v4, "10.0.0.2");
        assert_eq!(nics[1].fixed_ip_v6, "");
    }

    #[test]
    fn test_floating_records_are_skipped() {
        let groups = normalize_observed(&map(vec![(
            "net",
            vec![
                floating_address(Some("aa:01"), "203.0.113.9"),
                fixed_address(Some("aa:01"), 4, "10.0.0.1"),
            ],
        )]));

        assert_eq!(groups[0].nics.len(), 1);
        assert_eq!(groups[0].nics[0].fixed_ip_v4, "10.0.0.1");
    }

    #[test]
    fn test_records_without_mac_never_merge() {
        let groups = normalize_observed(&map(vec![(
            "net",
            vec![fixed_address(None, 4, "10.0.0.1"), fixed_address(None, 6, "fd00::1")],
        )]));

        assert_eq!(groups[0].nics.len(), 2);
    }

    #[test]
    fn test_network_without_fixed_records_has_no_nics() {
        let groups = normalize_observed(&map(vec![("ext", vec![floating_address(None, "198.51.100.1")])]));
        assert_eq!(groups.len(), 1);
        assert!(groups[0].nics.is_empty());
    }
}
