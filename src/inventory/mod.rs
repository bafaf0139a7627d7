//! Address inventory
//!
//! Turns Cloud Asset Inventory search results into a flat list of IP
//! addresses, one per IP, each attributed to the resource that owns it.
//!
//! # Architecture
//!
//! - [`source`] - Raw search results and the [`InventorySource`] trait
//! - [`extract`] - One extractor per asset type
//! - [`registry`] - Asset type to extractor mapping and query planning
//! - [`reconcile`] - Reference resolution and deduplication
//! - [`query`] - Drives a search end to end
//! - [`filter`] - Public/private filtering and output ordering
//!
//! # Example
//!
//! ```ignore
//! use gcp_ip_list::gcp::client::GcpClient;
//! use gcp_ip_list::inventory::{query_all, Scope};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = GcpClient::new("https://cloudasset.googleapis.com").await?;
//!     let scope: Scope = "projects/my-project".parse()?;
//!     let addresses = query_all(&client, &scope).await?;
//!     Ok(())
//! }
//! ```

pub mod address;
pub mod extract;
pub mod filter;
pub mod kind;
pub mod query;
pub mod reconcile;
pub mod registry;
pub mod source;

pub use address::{Address, AddressType, Entry, Reference};
pub use filter::{keep_private_only, keep_public_only, sort_addresses, Visibility};
pub use kind::AssetKind;
pub use query::{parse_kinds, query, query_all, query_until, Scope};
pub use reconcile::reconcile;
pub use source::{InventorySource, ResourceRecord, VersionedResource};
