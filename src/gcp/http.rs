//! HTTP utilities for GCP REST API calls

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// A GCP API call that completed with a non-success status
#[derive(Debug, thiserror::Error)]
#[error("API request failed: {status}")]
pub struct ApiStatusError {
    pub status: StatusCode,
}

/// HTTP client wrapper for GCP API calls
#[derive(Clone)]
pub struct GcpHttpClient {
    client: Client,
}

impl GcpHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gcp-ip-list/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str, token: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiStatusError { status }.into());
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Turn a failed inventory search into an operator-facing message
///
/// The hint is chosen from the HTTP status alone. Without a status (DNS,
/// connection, or decode failures) the message is returned as is.
pub fn format_gcp_error(status: Option<StatusCode>, message: &str) -> String {
    let message: String = message
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();

    let hint = match status.map(|s| s.as_u16()) {
        Some(400) => "Invalid request. Check the scope and asset types.",
        Some(401) => "Authentication failed. Run 'gcloud auth application-default login'.",
        Some(403) => {
            "Permission denied. The caller needs cloudasset.assets.searchAllResources on the scope."
        }
        Some(404) => "Scope not found. Check the organization, folder, or project identifier.",
        Some(429) => "Rate limit exceeded. Please try again later.",
        Some(500..=599) => "Cloud Asset Inventory temporarily unavailable. Please try again.",
        _ => return message,
    };

    format!("{}\n{}", message, hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.ends_with("[truncated, 500 bytes total]"));
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("bad\nbody\t!"), "badbody!");
    }

    #[test]
    fn test_format_gcp_error_maps_status_codes() {
        let forbidden = format_gcp_error(Some(StatusCode::FORBIDDEN), "API request failed: 403 Forbidden");
        assert!(forbidden.ends_with("on the scope."), "{forbidden}");
        assert!(forbidden.starts_with("API request failed: 403 Forbidden\n"));

        let unauthorized = format_gcp_error(Some(StatusCode::UNAUTHORIZED), "API request failed");
        assert!(unauthorized.contains("Authentication failed"), "{unauthorized}");
    }

    #[test]
    fn test_format_gcp_error_ignores_digits_in_the_message() {
        let message = "Failed to search resources in projects/app-4030: API request failed: 503 Service Unavailable";
        let formatted = format_gcp_error(Some(StatusCode::SERVICE_UNAVAILABLE), message);
        assert!(formatted.contains("temporarily unavailable"), "{formatted}");
        assert!(!formatted.contains("Permission denied"), "{formatted}");
    }

    #[test]
    fn test_format_gcp_error_without_status_returns_message() {
        let message = "error sending request for url (http://127.0.0.1:9/v1/projects/app-403:searchAllResources?pageSize=500): Connection refused";
        assert_eq!(format_gcp_error(None, message), message);
    }

    #[test]
    fn test_api_status_error_display() {
        let err = ApiStatusError {
            status: StatusCode::FORBIDDEN,
        };
        assert_eq!(err.to_string(), "API request failed: 403 Forbidden");
    }
}
