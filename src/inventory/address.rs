//! Normalized address model

use super::kind::AssetKind;
use crate::error::{Error, Result};
use ipnetwork::IpNetwork;
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::sync::OnceLock;

/// RFC 1918, IPv4 link-local, IPv6 unique local and IPv6 link-local
const PRIVATE_CIDRS: [&str; 6] = [
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "169.254.0.0/16",
    "fc00::/7",
    "fe80::/10",
];

static PRIVATE_NETWORKS: OnceLock<Vec<IpNetwork>> = OnceLock::new();

fn private_networks() -> &'static [IpNetwork] {
    PRIVATE_NETWORKS.get_or_init(|| {
        PRIVATE_CIDRS
            .iter()
            .map(|cidr| cidr.parse().expect("private CIDR literals are valid"))
            .collect()
    })
}

/// Whether an address is routable from the internet
///
/// Variant order matters: sorting descending puts `Public` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Private,
    Public,
}

impl AddressType {
    pub fn as_str(self) -> &'static str {
        match self {
            AddressType::Private => "private",
            AddressType::Public => "public",
        }
    }

    /// Classify an IP by range membership
    ///
    /// IPv4-mapped IPv6 addresses are classified as the IPv4 address they carry.
    pub fn of(ip: IpAddr) -> Self {
        let ip = match ip {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(ip, IpAddr::V4),
            IpAddr::V4(_) => ip,
        };

        if private_networks().iter().any(|network| network.contains(ip)) {
            AddressType::Private
        } else {
            AddressType::Public
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An IP address attached to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub address: IpAddr,
    #[serde(rename = "type")]
    pub address_type: AddressType,
    pub resource_name: String,
    #[serde(rename = "asset_type")]
    pub resource_type: AssetKind,
}

impl Address {
    /// Parse and classify an IP found on a resource
    pub fn parse(ip: &str, resource_name: &str, resource_type: AssetKind) -> Result<Self> {
        let address: IpAddr = ip.parse().map_err(|_| Error::MalformedAddress {
            address: ip.to_string(),
            resource_name: resource_name.to_string(),
        })?;

        Ok(Self {
            address,
            address_type: AddressType::of(address),
            resource_name: resource_name.to_string(),
            resource_type,
        })
    }
}

/// A router NAT IP that names an address resource instead of holding an IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Resource name of the referenced address resource
    pub target: String,
    /// Resource name of the router holding the reference
    pub resource_name: String,
}

/// Output of an extractor: a concrete address or a reference awaiting resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Address(Address),
    Reference(Reference),
}

impl From<Address> for Entry {
    fn from(address: Address) -> Self {
        Entry::Address(address)
    }
}
