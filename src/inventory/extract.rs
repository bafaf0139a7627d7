//! Per-asset-type address extraction
//!
//! Each extractor knows where one asset type keeps its IPs. Missing fields at
//! any depth mean "no address", never an error. The only failure is an IP
//! string that does not parse.

use super::address::{Address, Entry, Reference};
use super::kind::AssetKind;
use super::source::ResourceRecord;
use crate::error::Result;
use serde_json::Value;

/// Router NAT IPs are URLs of this form; address resource names use the short form
const COMPUTE_API_PREFIX: &str = "https://www.googleapis.com/compute/v1/";
const COMPUTE_RESOURCE_PREFIX: &str = "//compute.googleapis.com/";

/// Extracts addresses from records of one asset type
pub trait Extractor: Send + Sync {
    fn kind(&self) -> AssetKind;

    fn extract(&self, record: &ResourceRecord) -> Result<Vec<Entry>>;
}

/// Non-empty strings in a JSON list; anything else yields nothing
fn string_list(value: Option<&Value>) -> impl Iterator<Item = &str> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn addresses<'a>(
    ips: impl IntoIterator<Item = &'a str>,
    record: &ResourceRecord,
    kind: AssetKind,
) -> Result<Vec<Entry>> {
    ips.into_iter()
        .map(|ip| Address::parse(ip, &record.name, kind).map(Entry::from))
        .collect()
}

/// GCE VMs: `externalIPs` and `internalIPs` attribute lists
pub struct ComputeInstanceExtractor;

impl Extractor for ComputeInstanceExtractor {
    fn kind(&self) -> AssetKind {
        AssetKind::ComputeInstance
    }

    fn extract(&self, record: &ResourceRecord) -> Result<Vec<Entry>> {
        let external = string_list(record.attribute("externalIPs"));
        let internal = string_list(record.attribute("internalIPs"));
        addresses(external.chain(internal), record, self.kind())
    }
}

/// Reserved addresses, only while `IN_USE`
pub struct ComputeAddressExtractor;

impl Extractor for ComputeAddressExtractor {
    fn kind(&self) -> AssetKind {
        AssetKind::ComputeAddress
    }

    fn extract(&self, record: &ResourceRecord) -> Result<Vec<Entry>> {
        if record.state != "IN_USE" {
            return Ok(Vec::new());
        }
        addresses(non_empty_str(record.attribute("address")), record, self.kind())
    }
}

/// Cloud SQL instances; `OUTGOING` addresses belong to the egress path, not the instance
pub struct CloudSqlInstanceExtractor;

impl Extractor for CloudSqlInstanceExtractor {
    fn kind(&self) -> AssetKind {
        AssetKind::CloudSqlInstance
    }

    fn extract(&self, record: &ResourceRecord) -> Result<Vec<Entry>> {
        let Some(body) = record.versioned_body() else {
            return Ok(Vec::new());
        };

        let ips = body
            .get("ipAddresses")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter(|ip| ip.get("type").and_then(Value::as_str) != Some("OUTGOING"))
            .filter_map(|ip| non_empty_str(ip.get("ipAddress")));

        addresses(ips, record, self.kind())
    }
}

/// GKE control plane endpoints
pub struct ContainerClusterExtractor;

impl Extractor for ContainerClusterExtractor {
    fn kind(&self) -> AssetKind {
        AssetKind::ContainerCluster
    }

    fn extract(&self, record: &ResourceRecord) -> Result<Vec<Entry>> {
        let Some(config) = record
            .versioned_body()
            .and_then(|body| body.get("privateClusterConfig"))
        else {
            return Ok(Vec::new());
        };

        let endpoints = ["publicEndpoint", "privateEndpoint"]
            .into_iter()
            .filter_map(|field| non_empty_str(config.get(field)));

        addresses(endpoints, record, self.kind())
    }
}

/// Load balancer frontends
pub struct ForwardingRuleExtractor;

impl Extractor for ForwardingRuleExtractor {
    fn kind(&self) -> AssetKind {
        AssetKind::ComputeForwardingRule
    }

    fn extract(&self, record: &ResourceRecord) -> Result<Vec<Entry>> {
        let ip = record
            .versioned_body()
            .and_then(|body| non_empty_str(body.get("IPAddress")));
        addresses(ip, record, self.kind())
    }
}

/// Cloud NAT gateways; their IPs are references to address resources
pub struct RouterExtractor;

impl Extractor for RouterExtractor {
    fn kind(&self) -> AssetKind {
        AssetKind::ComputeRouter
    }

    fn extract(&self, record: &ResourceRecord) -> Result<Vec<Entry>> {
        let Some(nats) = record
            .versioned_body()
            .and_then(|body| body.get("nats"))
            .and_then(Value::as_array)
        else {
            return Ok(Vec::new());
        };

        let references = nats
            .iter()
            .flat_map(|nat| string_list(nat.get("natIps")))
            .map(|ip| {
                Entry::Reference(Reference {
                    target: ip.replacen(COMPUTE_API_PREFIX, COMPUTE_RESOURCE_PREFIX, 1),
                    resource_name: record.name.clone(),
                })
            })
            .collect();

        Ok(references)
    }
}
