//! Post-query filtering and ordering

use super::address::{Address, AddressType};

/// Which addresses to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    All,
    PublicOnly,
    PrivateOnly,
}

impl Visibility {
    pub fn apply(self, addresses: Vec<Address>) -> Vec<Address> {
        match self {
            Visibility::All => addresses,
            Visibility::PublicOnly => keep_public_only(addresses),
            Visibility::PrivateOnly => keep_private_only(addresses),
        }
    }
}

pub fn keep_public_only(addresses: Vec<Address>) -> Vec<Address> {
    keep_type(addresses, AddressType::Public)
}

pub fn keep_private_only(addresses: Vec<Address>) -> Vec<Address> {
    keep_type(addresses, AddressType::Private)
}

fn keep_type(mut addresses: Vec<Address>, address_type: AddressType) -> Vec<Address> {
    addresses.retain(|a| a.address_type == address_type);
    addresses
}

/// Stable sort: public before private, then by asset type, then by resource name
pub fn sort_addresses(addresses: &mut [Address]) {
    addresses.sort_by(|a, b| {
        b.address_type
            .cmp(&a.address_type)
            .then_with(|| a.resource_type.as_str().cmp(b.resource_type.as_str()))
            .then_with(|| a.resource_name.cmp(&b.resource_name))
    });
}
