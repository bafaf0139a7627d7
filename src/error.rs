//! Error types for address queries
//!
//! Every variant is terminal for the query that raised it. Missing fields on
//! individual records are never errors; they simply produce no addresses.

use crate::gcp::http::ApiStatusError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while querying and reconciling addresses
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid scope: {scope}, scope must be organizations/1234, folders/1234, or projects/my-project")]
    InvalidScope { scope: String },

    #[error("unsupported asset type: {0}")]
    UnsupportedKind(String),

    /// The inventory returned a record of a kind that was never requested
    #[error("unexpected asset type: {0}")]
    UnexpectedKind(String),

    #[error("error searching for resources: {message}")]
    Source {
        message: String,
        /// HTTP status of the failed call, when the API answered at all
        status: Option<StatusCode>,
    },

    #[error("interrupted before the search completed, no output written")]
    Interrupted,

    #[error("malformed IP address {address:?} on {resource_name}")]
    MalformedAddress {
        address: String,
        resource_name: String,
    },
}

impl Error {
    /// Wrap a transport failure, keeping the whole context chain in the message
    pub fn from_transport(err: &anyhow::Error) -> Self {
        let status = err
            .chain()
            .find_map(|e| e.downcast_ref::<ApiStatusError>())
            .map(|e| e.status);

        Self::Source {
            message: format!("{err:#}"),
            status,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
