//! Configuration Management
//!
//! Optional defaults read from `<config_dir>/gcp-ip-list/config.json`.
//! Command-line flags always win over the file.

use crate::gcp::client::{DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE};
use crate::output::OutputFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Default scope, e.g. `organizations/123456`
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Asset types to query when none are given on the command line
    #[serde(default)]
    pub asset_types: Vec<String>,
    /// Cloud Asset Inventory endpoint override
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcp-ip-list").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a file; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Get effective scope (CLI > config > gcloud default project)
    pub fn effective_scope(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.scope.clone())
            .or_else(|| {
                crate::gcp::auth::get_default_project().map(|p| format!("projects/{}", p))
            })
    }

    pub fn effective_format(&self, cli: Option<OutputFormat>) -> OutputFormat {
        cli.or(self.format).unwrap_or_default()
    }

    /// Asset types from the CLI, else from config; empty means "all supported"
    pub fn effective_asset_types(&self, cli: &[String]) -> Vec<String> {
        if cli.is_empty() {
            self.asset_types.clone()
        } else {
            cli.to_vec()
        }
    }

    pub fn effective_endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.effective_endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.effective_page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.effective_format(None), OutputFormat::Table);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "scope": "organizations/123456",
                "format": "csv",
                "asset_types": ["compute.googleapis.com/Router"],
                "page_size": 100
            }}"#
        )
        .unwrap();

        let config = Config::load_from(file.path());
        assert_eq!(config.scope.as_deref(), Some("organizations/123456"));
        assert_eq!(config.effective_format(None), OutputFormat::Csv);
        assert_eq!(config.effective_format(Some(OutputFormat::List)), OutputFormat::List);
        assert_eq!(config.effective_page_size(), 100);
        assert_eq!(
            config.effective_asset_types(&[]),
            vec!["compute.googleapis.com/Router".to_string()]
        );
        assert_eq!(
            config.effective_asset_types(&["compute.googleapis.com/Address".to_string()]),
            vec!["compute.googleapis.com/Address".to_string()]
        );
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert_eq!(Config::load_from(file.path()), Config::default());
    }

    #[test]
    fn test_cli_scope_wins() {
        let config = Config {
            scope: Some("folders/42".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.effective_scope(Some("projects/from-cli")).as_deref(),
            Some("projects/from-cli")
        );
        assert_eq!(config.effective_scope(None).as_deref(), Some("folders/42"));
    }
}
