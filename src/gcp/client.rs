//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Public Cloud Asset Inventory endpoint
pub const DEFAULT_ENDPOINT: &str = "https://cloudasset.googleapis.com";

/// Page size requested from searchAllResources (the API maximum)
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    endpoint: Url,
    pub page_size: u32,
}

impl GcpClient {
    /// Create a new GCP client using Application Default Credentials
    pub async fn new(endpoint: &str) -> Result<Self> {
        let credentials = GcpCredentials::new()
            .await
            .context("Failed to initialize GCP credentials")?;

        Self::with_credentials(credentials, endpoint)
    }

    /// Create a client with explicit credentials
    pub fn with_credentials(credentials: GcpCredentials, endpoint: &str) -> Result<Self> {
        let http = GcpHttpClient::new()?;

        // A trailing slash makes Url::join append instead of replacing the last segment
        let normalized = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{}/", endpoint)
        };
        let endpoint = Url::parse(&normalized)
            .with_context(|| format!("Invalid API endpoint: {}", endpoint))?;

        Ok(Self {
            credentials,
            http,
            endpoint,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override the page size used for inventory searches
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.get(url, &token).await
    }

    // =========================================================================
    // Cloud Asset Inventory API helpers
    // =========================================================================

    /// Build the searchAllResources URL for a scope, without query parameters
    pub fn search_all_resources_url(&self, scope: &str) -> Result<Url> {
        self.endpoint
            .join(&format!("v1/{}:searchAllResources", scope))
            .with_context(|| format!("Failed to build search URL for {}", scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> GcpClient {
        GcpClient::with_credentials(GcpCredentials::from_token("t"), endpoint).unwrap()
    }

    #[test]
    fn test_search_url_for_default_endpoint() {
        let url = client(DEFAULT_ENDPOINT)
            .search_all_resources_url("projects/fuzzy-pickles-428115")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://cloudasset.googleapis.com/v1/projects/fuzzy-pickles-428115:searchAllResources"
        );
    }

    #[test]
    fn test_search_url_keeps_endpoint_path() {
        let url = client("http://localhost:8080/proxy")
            .search_all_resources_url("organizations/123456")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/proxy/v1/organizations/123456:searchAllResources"
        );
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        assert!(GcpClient::with_credentials(GcpCredentials::from_token("t"), "not a url").is_err());
    }
}
