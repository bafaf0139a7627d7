//! Cloud Asset Inventory search
//!
//! Pages through `searchAllResources` and exposes the results as a lazy stream.

use super::client::GcpClient;
use crate::inventory::source::null_as_default;
use crate::inventory::{AssetKind, InventorySource, ResourceRecord};
use anyhow::{Context, Result};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::Deserialize;
use std::collections::HashSet;

/// One page of search results
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<ResourceRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl GcpClient {
    /// Fetch one page of resources of the given types
    pub async fn search_resources_page(
        &self,
        scope: &str,
        kinds: &[AssetKind],
        page_token: Option<&str>,
    ) -> Result<SearchPage> {
        let mut url = self.search_all_resources_url(scope)?;
        {
            let mut query = url.query_pairs_mut();
            for kind in kinds {
                query.append_pair("assetTypes", kind.as_str());
            }
            query.append_pair("readMask", "*");
            query.append_pair("pageSize", &self.page_size.to_string());
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        let response = self.get(url.as_str()).await?;
        let page: SearchPage = serde_json::from_value(response)
            .context("Failed to decode searchAllResources response")?;

        tracing::debug!(
            "Fetched {} resources (more pages: {})",
            page.results.len(),
            page.next_page_token.as_deref().is_some_and(|t| !t.is_empty())
        );

        Ok(page)
    }
}

impl InventorySource for GcpClient {
    fn search<'a>(
        &'a self,
        scope: &'a str,
        kinds: &'a [AssetKind],
    ) -> BoxStream<'a, Result<ResourceRecord>> {
        // None = exhausted, Some(None) = first page, Some(Some(token)) = next page.
        // Tokens already followed are remembered so a looping server ends the stream.
        let pages = stream::try_unfold(
            (Some(None::<String>), HashSet::new()),
            move |(cursor, mut seen)| async move {
                let Some(page_token) = cursor else {
                    return Ok(None);
                };

                let page = self
                    .search_resources_page(scope, kinds, page_token.as_deref())
                    .await
                    .with_context(|| format!("Failed to search resources in {}", scope))?;

                let next = match page.next_page_token.filter(|token| !token.is_empty()) {
                    Some(token) if !seen.insert(token.clone()) => {
                        anyhow::bail!(
                            "Failed to search resources in {}: page token {:?} was returned twice",
                            scope,
                            token
                        );
                    }
                    Some(token) => Some(Some(token)),
                    None => None,
                };

                Ok::<_, anyhow::Error>(Some((page.results, (next, seen))))
            },
        );

        pages
            .map_ok(|results| stream::iter(results.into_iter().map(Ok::<_, anyhow::Error>)))
            .try_flatten()
            .boxed()
    }
}
