//! Query orchestration
//!
//! Validates the request, drains the inventory stream, dispatches each record
//! to its extractor and reconciles the result. The stream is read to the end
//! before reconciling: references can only be resolved against the full set.

use super::address::{Address, Entry};
use super::kind::AssetKind;
use super::reconcile::reconcile;
use super::registry::{self, get_extractor};
use super::source::InventorySource;
use crate::error::{Error, Result};
use futures::TryStreamExt;
use std::fmt;
use std::future::Future;
use std::str::FromStr;

/// The organization, folder, or project a query is restricted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope(String);

impl Scope {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let valid = match s.split_once('/') {
            Some(("organizations" | "folders", id)) => {
                !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
            }
            Some(("projects", id)) => !id.is_empty() && !id.chars().any(char::is_whitespace),
            _ => false,
        };

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::InvalidScope {
                scope: s.to_string(),
            })
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse asset type names, failing on the first one without an extractor
pub fn parse_kinds<S: AsRef<str>>(names: &[S]) -> Result<Vec<AssetKind>> {
    names
        .iter()
        .map(|name| {
            let kind: AssetKind = name.as_ref().parse()?;
            get_extractor(kind)?;
            Ok(kind)
        })
        .collect()
}

/// Query every supported asset type
pub async fn query_all<S>(source: &S, scope: &Scope) -> Result<Vec<Address>>
where
    S: InventorySource + ?Sized,
{
    query(source, scope, &registry::supported_kinds()).await
}

/// Query the given asset types and return reconciled addresses
pub async fn query<S>(source: &S, scope: &Scope, requested: &[AssetKind]) -> Result<Vec<Address>>
where
    S: InventorySource + ?Sized,
{
    let plan = registry::plan(requested);
    tracing::info!(
        "Searching {} for {}",
        scope,
        plan.kinds
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut records = source.search(scope.as_str(), &plan.kinds);
    let mut entries: Vec<Entry> = Vec::new();
    let mut record_count = 0usize;

    while let Some(record) = records
        .try_next()
        .await
        .map_err(|e| Error::from_transport(&e))?
    {
        record_count += 1;

        let kind = record
            .asset_type
            .parse::<AssetKind>()
            .ok()
            .filter(|kind| plan.kinds.contains(kind))
            .ok_or_else(|| Error::UnexpectedKind(record.asset_type.clone()))?;

        entries.extend(get_extractor(kind)?.extract(&record)?);
    }

    let addresses = reconcile(entries, &plan.implicit);
    tracing::info!(
        "Found {} addresses across {} resources",
        addresses.len(),
        record_count
    );

    Ok(addresses)
}

/// Run [`query`] until `cancel` completes
///
/// Cancellation drops the in-flight request and returns [`Error::Interrupted`];
/// no partial result is ever returned.
pub async fn query_until<S, F>(
    source: &S,
    scope: &Scope,
    requested: &[AssetKind],
    cancel: F,
) -> Result<Vec<Address>>
where
    S: InventorySource + ?Sized,
    F: Future<Output = ()>,
{
    tokio::select! {
        result = query(source, scope, requested) => result,
        _ = cancel => {
            tracing::warn!("Search of {} cancelled", scope);
            Err(Error::Interrupted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::source::ResourceRecord;
    use futures::future;
    use futures::stream::{self, BoxStream, StreamExt};
    use serde_json::json;

    /// Yields its records, then either ends or hangs forever
    struct FixedSource {
        records: Vec<ResourceRecord>,
        hang: bool,
    }

    impl InventorySource for FixedSource {
        fn search<'a>(
            &'a self,
            _scope: &'a str,
            _kinds: &'a [AssetKind],
        ) -> BoxStream<'a, anyhow::Result<ResourceRecord>> {
            let records = stream::iter(self.records.clone().into_iter().map(Ok::<_, anyhow::Error>));
            if self.hang {
                records.chain(stream::pending()).boxed()
            } else {
                records.boxed()
            }
        }
    }

    fn vm() -> ResourceRecord {
        serde_json::from_value(json!({
            "name": "//compute.googleapis.com/vm",
            "assetType": "compute.googleapis.com/Instance",
            "additionalAttributes": {"externalIPs": ["34.83.128.26"]}
        }))
        .unwrap()
    }

    fn project() -> Scope {
        "projects/fuzzy-pickles-428115".parse().unwrap()
    }

    #[tokio::test]
    async fn test_cancel_discards_records_already_read() {
        let source = FixedSource {
            records: vec![vm()],
            hang: true,
        };

        let err = query_until(&source, &project(), &[AssetKind::ComputeInstance], async {
            tokio::task::yield_now().await;
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Interrupted), "{err:?}");
    }

    #[tokio::test]
    async fn test_query_until_without_cancel() {
        let source = FixedSource {
            records: vec![vm()],
            hang: false,
        };

        let addresses = query_until(
            &source,
            &project(),
            &[AssetKind::ComputeInstance],
            future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].address.to_string(), "34.83.128.26");
    }

    #[test]
    fn test_valid_scopes() {
        for scope in [
            "organizations/123456",
            "folders/987",
            "projects/fuzzy-pickles-428115",
            "projects/123456789",
        ] {
            assert_eq!(scope.parse::<Scope>().unwrap().as_str(), scope);
        }
    }

    #[test]
    fn test_invalid_scopes() {
        for scope in [
            "",
            "projects/",
            "projects/has space",
            "organizations/abc",
            "organizations/",
            "folders/12a",
            "billingAccounts/123",
            "fuzzy-pickles-428115",
        ] {
            let err = scope.parse::<Scope>().unwrap_err();
            assert!(matches!(err, Error::InvalidScope { .. }), "{scope}");
        }
    }

    #[test]
    fn test_parse_kinds() {
        let kinds = parse_kinds(&["compute.googleapis.com/Router", "sqladmin.googleapis.com/Instance"])
            .unwrap();
        assert_eq!(
            kinds,
            vec![AssetKind::ComputeRouter, AssetKind::CloudSqlInstance]
        );

        let err = parse_kinds(&["compute.googleapis.com/Disk"]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind(_)));
    }
}
