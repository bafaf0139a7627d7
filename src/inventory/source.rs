//! Inventory source abstraction
//!
//! Raw search results as returned by Cloud Asset Inventory, and the trait the
//! query orchestrator reads them through.

use super::kind::AssetKind;
use anyhow::Result;
use futures::stream::BoxStream;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One resource search result
///
/// Only the fields used for address extraction are modelled. Everything else
/// in the payload is ignored, and every modelled field defaults when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Full resource name, e.g. `//compute.googleapis.com/projects/p/zones/z/instances/vm`
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub asset_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    /// Free-form attribute bag, different for each asset type
    #[serde(default)]
    pub additional_attributes: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub versioned_resources: Vec<VersionedResource>,
}

/// A versioned view of the underlying resource body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionedResource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default)]
    pub resource: Value,
}

/// Treat an explicit JSON `null` the same as an absent field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResourceRecord {
    /// Look up a key in the attribute bag
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.additional_attributes.get(key)
    }

    /// Body of the first versioned resource, if it is an object
    pub fn versioned_body(&self) -> Option<&Map<String, Value>> {
        self.versioned_resources.first()?.resource.as_object()
    }
}

/// Something that can search an inventory for resources of the given kinds
///
/// The returned stream is lazy; implementations page through results as it is
/// polled. Errors end the query.
pub trait InventorySource {
    fn search<'a>(
        &'a self,
        scope: &'a str,
        kinds: &'a [AssetKind],
    ) -> BoxStream<'a, Result<ResourceRecord>>;
}
