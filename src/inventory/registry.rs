//! Extractor Registry
//!
//! Maps each supported asset type to its extractor, and records which asset
//! types must be queried alongside others so their references can be resolved.

use super::extract::{
    CloudSqlInstanceExtractor, ComputeAddressExtractor, ComputeInstanceExtractor,
    ContainerClusterExtractor, Extractor, ForwardingRuleExtractor, RouterExtractor,
};
use super::kind::AssetKind;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Global registry, built on first access
static REGISTRY: OnceLock<HashMap<AssetKind, Box<dyn Extractor>>> = OnceLock::new();

/// Get the extractor registry
pub fn get_registry() -> &'static HashMap<AssetKind, Box<dyn Extractor>> {
    REGISTRY.get_or_init(|| {
        let extractors: Vec<Box<dyn Extractor>> = vec![
            Box::new(ComputeInstanceExtractor),
            Box::new(ComputeAddressExtractor),
            Box::new(CloudSqlInstanceExtractor),
            Box::new(ContainerClusterExtractor),
            Box::new(ForwardingRuleExtractor),
            Box::new(RouterExtractor),
        ];

        extractors
            .into_iter()
            .map(|extractor| (extractor.kind(), extractor))
            .collect()
    })
}

/// Get the extractor for an asset type
pub fn get_extractor(kind: AssetKind) -> Result<&'static dyn Extractor> {
    get_registry()
        .get(&kind)
        .map(|extractor| &**extractor)
        .ok_or_else(|| Error::UnsupportedKind(kind.to_string()))
}

/// All asset types with a registered extractor, in a stable order
pub fn supported_kinds() -> Vec<AssetKind> {
    AssetKind::ALL
        .into_iter()
        .filter(|kind| get_registry().contains_key(kind))
        .collect()
}

/// Asset types whose records must also be fetched to resolve `kind`'s references
pub fn dependencies(kind: AssetKind) -> &'static [AssetKind] {
    match kind {
        AssetKind::ComputeRouter => &[AssetKind::ComputeAddress],
        _ => &[],
    }
}

/// The kinds actually queried for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub kinds: Vec<AssetKind>,
    /// Kinds fetched only to resolve references; their own entries are dropped
    pub implicit: Vec<AssetKind>,
}

impl QueryPlan {
    pub fn is_implicit(&self, kind: AssetKind) -> bool {
        self.implicit.contains(&kind)
    }
}

/// Collapse duplicates and add any dependency the request is missing
pub fn plan(requested: &[AssetKind]) -> QueryPlan {
    let mut kinds: Vec<AssetKind> = Vec::with_capacity(requested.len());
    for kind in requested {
        if !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }

    let mut implicit = Vec::new();
    for kind in kinds.clone() {
        for dependency in dependencies(kind) {
            if !kinds.contains(dependency) {
                tracing::debug!("Adding {} to resolve {} references", dependency, kind);
                kinds.push(*dependency);
                implicit.push(*dependency);
            }
        }
    }

    QueryPlan { kinds, implicit }
}
