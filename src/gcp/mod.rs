//! GCP API interaction module
//!
//! # Module Structure
//!
//! - [`auth`] - GCP authentication using Application Default Credentials
//! - [`client`] - Main GCP client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//! - [`asset_inventory`] - Paged Cloud Asset Inventory search

pub mod asset_inventory;
pub mod auth;
pub mod client;
pub mod http;
