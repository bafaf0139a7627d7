//! Reconciliation of extracted entries
//!
//! Turns the raw extractor output for one query into the final address list:
//!
//! 1. router references are resolved against address resources by name
//! 2. references that match nothing are dropped with a warning
//! 3. entries of implicitly queried kinds are removed
//! 4. entries are deduplicated by IP, with address resources taking precedence
//!
//! Implicit kinds are removed before deduplication so a resolved router entry
//! is never displaced by the address resource it was resolved from.

use super::address::{Address, AddressType, Entry, Reference};
use super::kind::AssetKind;
use std::collections::hash_map::{self, HashMap};
use std::net::IpAddr;

/// Build the final, reference-free and IP-unique address list
pub fn reconcile(entries: Vec<Entry>, implicit: &[AssetKind]) -> Vec<Address> {
    let index = index_addresses(&entries);

    let resolved = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Address(address) => Some(address),
            Entry::Reference(reference) => resolve(reference, &index),
        })
        .filter(|address| !implicit.contains(&address.resource_type));

    dedup_by_ip(resolved)
}

/// Address resources by resource name
fn index_addresses(entries: &[Entry]) -> HashMap<String, (IpAddr, AddressType)> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            Entry::Address(a) if a.resource_type == AssetKind::ComputeAddress => {
                Some((a.resource_name.clone(), (a.address, a.address_type)))
            }
            _ => None,
        })
        .collect()
}

fn resolve(
    reference: Reference,
    index: &HashMap<String, (IpAddr, AddressType)>,
) -> Option<Address> {
    let Some(&(address, address_type)) = index.get(&reference.target) else {
        tracing::warn!(
            "Dropping NAT IP on {}: address resource {} was not found",
            reference.resource_name,
            reference.target
        );
        return None;
    };

    Some(Address {
        address,
        address_type,
        resource_name: reference.resource_name,
        resource_type: AssetKind::ComputeRouter,
    })
}

/// Keep one entry per IP in first-seen order
///
/// A later address resource replaces an earlier entry of any other kind,
/// taking over its position.
fn dedup_by_ip(addresses: impl IntoIterator<Item = Address>) -> Vec<Address> {
    let mut slots: HashMap<IpAddr, usize> = HashMap::new();
    let mut unique: Vec<Address> = Vec::new();

    for address in addresses {
        match slots.entry(address.address) {
            hash_map::Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(address);
            }
            hash_map::Entry::Occupied(slot) => {
                let current = &mut unique[*slot.get()];
                if address.resource_type == AssetKind::ComputeAddress
                    && current.resource_type != AssetKind::ComputeAddress
                {
                    tracing::debug!(
                        "{} is owned by {}, replacing {}",
                        address.address,
                        address.resource_name,
                        current.resource_name
                    );
                    *current = address;
                } else {
                    tracing::debug!(
                        "Skipping duplicate {} on {}",
                        address.address,
                        address.resource_name
                    );
                }
            }
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAT_ADDRESS: &str = "//compute.googleapis.com/projects/p/regions/us-west1/addresses/nat";
    const ROUTER: &str = "//compute.googleapis.com/projects/p/regions/us-west1/routers/r";

    fn address(ip: &str, name: &str, kind: AssetKind) -> Address {
        Address::parse(ip, name, kind).unwrap()
    }

    fn reference(target: &str) -> Entry {
        Entry::Reference(Reference {
            target: target.to_string(),
            resource_name: ROUTER.to_string(),
        })
    }

    #[test]
    fn test_router_reference_resolves_and_implicit_address_is_dropped() {
        let entries = vec![
            reference(NAT_ADDRESS),
            address("34.19.80.22", NAT_ADDRESS, AssetKind::ComputeAddress).into(),
        ];

        let result = reconcile(entries, &[AssetKind::ComputeAddress]);

        assert_eq!(
            result,
            vec![Address {
                address: "34.19.80.22".parse().unwrap(),
                address_type: AddressType::Public,
                resource_name: ROUTER.to_string(),
                resource_type: AssetKind::ComputeRouter,
            }]
        );
    }

    #[test]
    fn test_explicit_address_wins_over_resolved_router() {
        let entries = vec![
            reference(NAT_ADDRESS),
            address("34.19.80.22", NAT_ADDRESS, AssetKind::ComputeAddress).into(),
        ];

        let result = reconcile(entries, &[]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].resource_type, AssetKind::ComputeAddress);
        assert_eq!(result[0].resource_name, NAT_ADDRESS);
    }

    #[test]
    fn test_unresolved_reference_is_dropped() {
        let entries = vec![
            reference("//compute.googleapis.com/projects/p/regions/us-west1/addresses/gone"),
            address("10.0.3.2", "//vm", AssetKind::ComputeInstance).into(),
        ];

        let result = reconcile(entries, &[AssetKind::ComputeAddress]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].resource_name, "//vm");
    }

    #[test]
    fn test_address_resource_supersedes_forwarding_rule() {
        let entries = vec![
            address("34.54.244.120", "//rule", AssetKind::ComputeForwardingRule).into(),
            address("34.54.243.87", "//other-rule", AssetKind::ComputeForwardingRule).into(),
            address("34.54.244.120", "//static", AssetKind::ComputeAddress).into(),
        ];

        let result = reconcile(entries, &[]);

        let names: Vec<&str> = result.iter().map(|a| a.resource_name.as_str()).collect();
        assert_eq!(names, vec!["//static", "//other-rule"]);
    }

    #[test]
    fn test_first_non_address_entry_wins() {
        let entries = vec![
            address("34.54.244.120", "//static", AssetKind::ComputeAddress).into(),
            address("34.54.244.120", "//rule", AssetKind::ComputeForwardingRule).into(),
            address("10.0.0.5", "//vm-a", AssetKind::ComputeInstance).into(),
            address("10.0.0.5", "//vm-b", AssetKind::ComputeInstance).into(),
        ];

        let result = reconcile(entries, &[]);

        let names: Vec<&str> = result.iter().map(|a| a.resource_name.as_str()).collect();
        assert_eq!(names, vec!["//static", "//vm-a"]);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let entries = vec![
            address("34.83.128.26", "//vm", AssetKind::ComputeInstance).into(),
            address("10.0.3.2", "//vm", AssetKind::ComputeInstance).into(),
            address("34.54.244.120", "//static", AssetKind::ComputeAddress).into(),
        ];

        let once = reconcile(entries, &[]);
        let twice = reconcile(once.iter().cloned().map(Entry::from).collect(), &[]);
        assert_eq!(once, twice);
    }
}
