//! List the IP addresses attached to GCP resources.
//!
//! Addresses are collected from Cloud Asset Inventory for an organization,
//! folder, or project, normalized into [`inventory::Address`] values and
//! rendered by [`output`].

pub mod config;
pub mod error;
pub mod gcp;
pub mod inventory;
pub mod output;

pub use error::{Error, Result};

/// Version injected at compile time via GCP_IP_LIST_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("GCP_IP_LIST_VERSION") {
    Some(v) => v,
    None => "dev",
};
