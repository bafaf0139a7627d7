//! Supported asset types

use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A Cloud Asset Inventory asset type that can carry IP addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetKind {
    #[serde(rename = "compute.googleapis.com/Instance")]
    ComputeInstance,
    #[serde(rename = "compute.googleapis.com/Address")]
    ComputeAddress,
    #[serde(rename = "sqladmin.googleapis.com/Instance")]
    CloudSqlInstance,
    #[serde(rename = "container.googleapis.com/Cluster")]
    ContainerCluster,
    #[serde(rename = "compute.googleapis.com/ForwardingRule")]
    ComputeForwardingRule,
    #[serde(rename = "compute.googleapis.com/Router")]
    ComputeRouter,
}

impl AssetKind {
    pub const ALL: [AssetKind; 6] = [
        AssetKind::ComputeInstance,
        AssetKind::ComputeAddress,
        AssetKind::CloudSqlInstance,
        AssetKind::ContainerCluster,
        AssetKind::ComputeForwardingRule,
        AssetKind::ComputeRouter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::ComputeInstance => "compute.googleapis.com/Instance",
            AssetKind::ComputeAddress => "compute.googleapis.com/Address",
            AssetKind::CloudSqlInstance => "sqladmin.googleapis.com/Instance",
            AssetKind::ContainerCluster => "container.googleapis.com/Cluster",
            AssetKind::ComputeForwardingRule => "compute.googleapis.com/ForwardingRule",
            AssetKind::ComputeRouter => "compute.googleapis.com/Router",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnsupportedKind(s.to_string()))
    }
}
